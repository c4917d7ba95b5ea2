//! # fieldval CLI entry point
//!
//! Parses command-line arguments, installs logging, locates the rule
//! document and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fieldval_cli::check::{run_check, CheckArgs};
use fieldval_cli::rules::{run_rules, RulesArgs};

/// fieldval — declarative field validation.
///
/// Checks records against per-class field rules (required, min_length,
/// range, regex) declared in a YAML or JSON rule document.
#[derive(Parser, Debug)]
#[command(name = "fieldval", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Rule document. Defaults to the nearest fieldval.yaml/.yml/.json
    /// found walking up from the current directory.
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate records against the rules of one class.
    Check(CheckArgs),

    /// List the classes, fields and rules a document declares.
    Rules(RulesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    let rules_path = resolve_rules_path(cli.rules)?;
    tracing::debug!(rules = %rules_path.display(), "resolved rule document");

    match cli.command {
        Commands::Check(args) => run_check(&args, &rules_path),
        Commands::Rules(args) => run_rules(&args, &rules_path),
    }
}

/// Use `--rules` if given, otherwise search upward from the current directory.
fn resolve_rules_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    let cwd = std::env::current_dir()?;
    fieldval_cli::discover_rules_file(&cwd).ok_or_else(|| {
        anyhow::anyhow!(
            "no rule document found; pass --rules or create one of {}",
            fieldval_cli::RULES_FILE_NAMES.join(", ")
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_check() {
        let cli = Cli::try_parse_from([
            "fieldval",
            "--rules",
            "rules.yaml",
            "check",
            "--class",
            "Address",
            "records.json",
        ])
        .unwrap();
        assert_eq!(cli.rules, Some(PathBuf::from("rules.yaml")));
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.class, "Address");
                assert!(!args.json);
                assert_eq!(args.records, PathBuf::from("records.json"));
            }
            other => panic!("expected check, got {other:?}"),
        }
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["fieldval", "rules", "-vv", "--rules", "r.json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.rules, Some(PathBuf::from("r.json")));
        assert!(matches!(cli.command, Commands::Rules(RulesArgs { class: None })));
    }

    #[test]
    fn cli_check_requires_class() {
        assert!(Cli::try_parse_from(["fieldval", "check", "records.json"]).is_err());
    }

    #[test]
    fn explicit_rules_path_wins() {
        let path = resolve_rules_path(Some(PathBuf::from("x.yaml"))).unwrap();
        assert_eq!(path, PathBuf::from("x.yaml"));
    }
}
