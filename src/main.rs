use anyhow::Result;
use clap::Parser;
use git_reckon::config::load_config;
use git_reckon::domain::{same_precedence, Scope};
use git_reckon::git::{GitInventorySupplier, InventorySupplier};
use git_reckon::{reckoner, ui};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(clap::Parser)]
#[command(
    name = "git-reckon",
    version,
    about = "Reckon the next semantic version of a git repository from its tags"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, default_value = ".", help = "Path inside the repository")]
    repo: PathBuf,

    #[arg(short, long, help = "Stage to reckon instead of the branch rules")]
    stage: Option<String>,

    #[arg(long, help = "Increment the base normal by major, minor or patch")]
    scope: Option<Scope>,

    #[arg(long, help = "Show the configured stages and exit")]
    list_stages: bool,

    #[arg(short, long, help = "Tag HEAD with the reckoned version")]
    tag: bool,

    #[arg(long, help = "Preview the tag without creating it")]
    dry_run: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Log reckoning decisions to stderr")]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .ok();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    if args.list_stages {
        let strategy = config.stage_strategy(Arc::new(|| None))?;
        ui::display_stages(strategy.registry());
        return Ok(());
    }

    let supplier = GitInventorySupplier::open(&args.repo)?.with_selector(config.tag_selector()?);

    let stage = match args.stage {
        Some(stage) => Some(stage),
        None => {
            let branch = supplier.current_branch()?;
            config.branches.stage_for(branch.as_deref())?
        }
    };
    debug!(stage = ?stage, "resolved stage");

    let normal = config.normal_strategy(args.scope)?;
    let pre_release = config.stage_strategy(Arc::new(move || stage.clone()))?;

    let inventory = supplier.inventory()?;
    let version = reckoner::reckon(&inventory, normal.as_ref(), &pre_release)?;
    ui::display_version(&version);

    if args.tag {
        let already_tagged = inventory
            .current_version()
            .is_some_and(|current| same_precedence(current, &version));
        let name = supplier.selector().format(&version);

        if already_tagged {
            ui::display_status(&format!("HEAD already carries {}", version));
        } else if args.dry_run {
            ui::display_status(&format!("Dry run: would create tag {}", name));
        } else {
            let name = supplier.tag_head(&version)?;
            ui::display_success(&format!("Created tag {}", name));
        }
    }

    Ok(())
}
