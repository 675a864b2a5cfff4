//! Checks run before any resolution.

mod bangumi;

use crate::models::config::Config;
use colored::Colorize;

/// Outcome of one check. A failed check carries a hint.
#[derive(Debug)]
pub struct CheckResult {
    pub name: &'static str,
    pub message: String,
    pub hint: Option<&'static str>,
}

impl CheckResult {
    pub fn passed(&self) -> bool {
        self.hint.is_none()
    }
}

/// Run all preflight checks.
pub async fn run_preflight_checks(config: &Config) -> Vec<CheckResult> {
    vec![bangumi::check(&config.bangumi).await]
}

/// Print results to stderr. Returns whether every check passed.
pub fn report(results: &[CheckResult]) -> bool {
    for result in results {
        match result.hint {
            None => eprintln!("{} {}: {}", "[OK]".green(), result.name.bold(), result.message),
            Some(hint) => {
                eprintln!("{} {}: {}", "[FAIL]".red(), result.name.bold(), result.message);
                eprintln!("  {} {}", "->".yellow(), hint);
            }
        }
    }
    results.iter().all(CheckResult::passed)
}
