//! # fieldval-cli — Field Rule Command-Line Interface
//!
//! ## Subcommands
//!
//! - `check` — validate JSON/YAML records against one class of a rule document
//! - `rules` — list the classes, fields and rule messages a document declares
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers here delegate to
//!   `fieldval-schema` and only format output.
//! - Handlers return an exit code: 0 success, 1 validation failure,
//!   2 operational error (the binary maps `Err` to 2).

pub mod check;
pub mod rules;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fieldval_schema::{Registry, RuleDocument};

/// File names searched for when `--rules` is not given, in order.
pub const RULES_FILE_NAMES: [&str; 3] = ["fieldval.yaml", "fieldval.yml", "fieldval.json"];

/// Walk up from `start` looking for a rule document.
pub fn discover_rules_file(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        for name in RULES_FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        dir = dir.parent()?;
    }
}

/// Load a rule document and replay it into a registry.
pub fn load_registry(path: &Path) -> Result<(RuleDocument, Registry)> {
    let document = RuleDocument::from_path(path)
        .with_context(|| format!("failed to load rule document {}", path.display()))?;
    let registry = document
        .to_registry()
        .with_context(|| format!("invalid rule declarations in {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        classes = registry.len(),
        "loaded rules"
    );
    Ok((document, registry))
}
