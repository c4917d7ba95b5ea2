//! # Check Subcommand
//!
//! Validates every record in a JSON/YAML file against the rules one class
//! declares in the rule document, and prints a summary report.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use fieldval_core::ClassId;
use fieldval_schema::{load_records, JsonRecord, ValidationResult};

/// Arguments for the `fieldval check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Class whose rules apply to the records.
    #[arg(long)]
    pub class: String,

    /// Print one JSON validation result per record instead of a report.
    #[arg(long)]
    pub json: bool,

    /// File holding one record (an object) or many (an array of objects).
    #[arg(value_name = "RECORDS")]
    pub records: PathBuf,
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 if every record is valid, 1 otherwise.
pub fn run_check(args: &CheckArgs, rules_path: &Path) -> Result<u8> {
    let (_, registry) = crate::load_registry(rules_path)?;

    let class = ClassId::new(args.class.as_str()).context("invalid --class")?;
    if !registry.contains(&class) {
        bail!(
            "class '{}' is not declared in {}",
            class,
            rules_path.display()
        );
    }

    let records = load_records(&args.records)
        .with_context(|| format!("failed to load records from {}", args.records.display()))?;

    let results: Vec<ValidationResult> = records
        .into_iter()
        .map(|fields| registry.validate(&JsonRecord::new(class.clone(), fields)))
        .collect();

    let failed = results.iter().filter(|r| !r.valid).count();
    tracing::info!(
        class = %class,
        total = results.len(),
        failed,
        "checked records"
    );

    if args.json {
        let out = serde_json::to_string_pretty(&results).context("failed to encode results")?;
        println!("{out}");
    } else {
        print_report(&results);
    }

    Ok(if failed > 0 { 1 } else { 0 })
}

fn print_report(results: &[ValidationResult]) {
    let passed = results.iter().filter(|r| r.valid).count();
    println!("Records: {}/{} passed", passed, results.len());

    for (index, result) in results.iter().enumerate() {
        for error in &result.errors {
            println!("  FAIL: #{index} — {error}");
        }
    }

    let failed = results.len() - passed;
    if failed > 0 {
        println!(
            "\n{} record(s) failed validation out of {} total.",
            failed,
            results.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = r#"
classes:
  - name: Address
    fields:
      - name: city
        rules: [required, { min_length: 3 }]
      - name: zip
        rules: [{ regex: "^[0-9]{5}$" }]
"#;

    fn setup(records: &str) -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let rules = dir.path().join("fieldval.yaml");
        std::fs::write(&rules, RULES).unwrap();
        let data = dir.path().join("records.json");
        std::fs::write(&data, records).unwrap();
        (dir, rules, data)
    }

    fn args(class: &str, records: PathBuf) -> CheckArgs {
        CheckArgs {
            class: class.to_string(),
            json: false,
            records,
        }
    }

    #[test]
    fn valid_records_exit_zero() {
        let (_dir, rules, data) = setup(r#"[{"city": "StL", "zip": "12345"}]"#);
        assert_eq!(run_check(&args("Address", data), &rules).unwrap(), 0);
    }

    #[test]
    fn violations_exit_one() {
        let (_dir, rules, data) =
            setup(r#"[{"city": "StL", "zip": "12345"}, {"city": "St", "zip": "foo"}]"#);
        assert_eq!(run_check(&args("Address", data), &rules).unwrap(), 1);
    }

    #[test]
    fn json_output_exit_code_matches() {
        let (_dir, rules, data) = setup(r#"{"zip": "12345"}"#);
        let mut a = args("Address", data);
        a.json = true;
        assert_eq!(run_check(&a, &rules).unwrap(), 1);
    }

    #[test]
    fn undeclared_class_is_an_error() {
        let (_dir, rules, data) = setup("[]");
        let err = run_check(&args("Adress", data), &rules).unwrap_err();
        assert!(err.to_string().contains("not declared"));
    }

    #[test]
    fn unreadable_records_is_an_error() {
        let (dir, rules, _data) = setup("[]");
        let missing = dir.path().join("missing.json");
        assert!(run_check(&args("Address", missing), &rules).is_err());
    }
}
