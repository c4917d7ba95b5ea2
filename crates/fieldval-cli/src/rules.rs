//! # Rules Subcommand
//!
//! Lists what a rule document declares: each class, each field carrying
//! rules, and the bound message of every rule.

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Args;
use fieldval_core::ClassId;
use fieldval_schema::{ClassConstraints, Registry};

/// Arguments for the `fieldval rules` subcommand.
#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Only list this class.
    #[arg(long)]
    pub class: Option<String>,
}

/// Execute the rules subcommand. Always returns exit code 0 on success.
pub fn run_rules(args: &RulesArgs, rules_path: &Path) -> Result<u8> {
    let (_, registry) = crate::load_registry(rules_path)?;

    match &args.class {
        Some(name) => {
            let class = ClassId::new(name.as_str()).context("invalid --class")?;
            let Some(constraints) = registry.constraints(&class) else {
                bail!("class '{}' is not declared in {}", class, rules_path.display());
            };
            print!("{}", render_class(constraints));
        }
        None => print!("{}", render_registry(&registry)),
    }
    Ok(0)
}

fn render_registry(registry: &Registry) -> String {
    registry
        .classes()
        .map(|(_, constraints)| render_class(constraints))
        .collect()
}

fn render_class(constraints: &ClassConstraints) -> String {
    let mut out = format!(
        "{} ({} rule(s))\n",
        constraints.class(),
        constraints.rule_count()
    );
    for (field, rules) in constraints.fields() {
        out.push_str(&format!("  {field}\n"));
        for rule in rules {
            out.push_str(&format!("    - [{}] {}\n", rule.name(), rule.message()));
        }
    }
    out
}
