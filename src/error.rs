use thiserror::Error;

/// Unified error type for reckoning operations
#[derive(Error, Debug)]
pub enum ReckonError {
    #[error("Reckoned version {version} has already been released.")]
    AlreadyReleased { version: semver::Version },

    #[error("Stage '{stage}' is not one of {known:?}")]
    UnknownStage { stage: String, known: Vec<String> },

    #[error("Pre-release stages must be in alphabetical order: '{previous}' comes before '{next}'")]
    StageOrder { previous: String, next: String },

    #[error("The stage name '{0}' is already in use.")]
    StageInUse(String),

    #[error("The pre-release part strategy for the final stage '{0}' cannot be changed.")]
    FinalStageImmutable(String),

    #[error("The stage '{0}' is not defined.")]
    UndefinedStage(String),

    #[error("A similar version of {normal} with an identical timestamp ({candidate}) already exists in the VCS inventory.")]
    TimestampExhausted {
        normal: semver::Version,
        candidate: String,
    },

    #[error("No strategy configured for {0} and no 'normally' fallback defined")]
    UnsetStrategy(String),

    #[error("Invalid inventory: {0}")]
    Inventory(String),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-reckon
pub type Result<T> = std::result::Result<T, ReckonError>;

impl ReckonError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReckonError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReckonError::Version(msg.into())
    }

    /// Create an inventory error with context
    pub fn inventory(msg: impl Into<String>) -> Self {
        ReckonError::Inventory(msg.into())
    }
}

impl From<semver::Error> for ReckonError {
    fn from(err: semver::Error) -> Self {
        ReckonError::Version(err.to_string())
    }
}
