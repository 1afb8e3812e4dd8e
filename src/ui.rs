//! Console output
//!
//! Stdout is reserved for reckoned versions and stage listings so the binary
//! can be used in scripts; every other message goes to stderr.

use crate::strategy::{StageKind, StageRegistry};
use console::style;

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

pub fn display_version(version: &semver::Version) {
    println!("{}", version);
}

/// One line per stage, in release order
pub fn format_stages(registry: &StageRegistry) -> Vec<String> {
    registry
        .stage_names()
        .into_iter()
        .map(|stage| {
            let kind = match registry.kind_of(&stage) {
                Some(StageKind::Development) => "development",
                Some(StageKind::PreRelease) => "pre-release",
                Some(StageKind::Final) => "final",
                None => "unknown",
            };
            let name = if stage.is_empty() {
                "(blank)".to_string()
            } else {
                stage
            };
            format!("{:<16} {}", name, kind)
        })
        .collect()
}

pub fn display_stages(registry: &StageRegistry) {
    for line in format_stages(registry) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::CompoundStagePreReleaseStrategy;

    #[test]
    fn test_format_stages() {
        let strategy = CompoundStagePreReleaseStrategy::builder()
            .pre_release_stages(["beta"])
            .build()
            .unwrap();
        let lines = format_stages(strategy.registry());
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("(blank)"));
        assert!(lines[0].ends_with("development"));
        assert!(lines[1].starts_with("beta"));
        assert!(lines[1].ends_with("pre-release"));
        assert!(lines[2].ends_with("final"));
    }
}
