//! Episode number reconciliation.
//!
//! Merges the number already known for a file (host metadata or an
//! earlier lookup) with the number guessed from its file name.

use super::filename::FilenameSignal;

/// Which rule produced the final number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileRule {
    /// The external extractor supplied the number.
    Extracted,
    /// The file name is authoritative by configuration.
    AlwaysReplace,
    /// Both sources agree.
    Agreed,
    /// The existing number is larger than anything in the catalog.
    OutOfRange,
    /// The existing number was missing or non-positive.
    RecoveredFromFilename,
    /// The existing number is kept over the file name guess.
    KeepExisting,
}

/// Outcome of a reconciliation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reconciled {
    pub value: f64,
    pub rule: ReconcileRule,
}

/// Reconcile the existing episode number with a filename signal.
///
/// A number from the external extractor is taken as is; otherwise this is
/// [`reconcile`] on the signal's guess.
pub fn reconcile_signal(
    file_name: &str,
    current: Option<f64>,
    signal: &FilenameSignal,
    max_bound: Option<f64>,
    always_replace: bool,
) -> Reconciled {
    match signal.guessed_number {
        Some(value) if signal.external => {
            tracing::info!("use extracted episode number {} for {}", value, file_name);
            Reconciled {
                value,
                rule: ReconcileRule::Extracted,
            }
        }
        guessed => reconcile(file_name, current, guessed, max_bound, always_replace),
    }
}

/// Reconcile the existing episode number with the file name guess.
///
/// `current` and `from_filename` count as zero when absent. `max_bound` is
/// the largest `order` in the catalog slice; without it nothing is out of
/// range. The first matching rule wins and some rule always matches.
pub fn reconcile(
    file_name: &str,
    current: Option<f64>,
    from_filename: Option<f64>,
    max_bound: Option<f64>,
    always_replace: bool,
) -> Reconciled {
    let current = current.unwrap_or(0.0);
    let from_filename = from_filename.unwrap_or(0.0);
    let max_bound = max_bound.unwrap_or(f64::INFINITY);

    if always_replace {
        tracing::warn!(
            "use episode index {} from filename {}",
            from_filename,
            file_name
        );
        return Reconciled {
            value: from_filename,
            rule: ReconcileRule::AlwaysReplace,
        };
    }

    if from_filename == current {
        tracing::info!("use exists episode number {} for {}", current, file_name);
        return Reconciled {
            value: current,
            rule: ReconcileRule::Agreed,
        };
    }

    if current > max_bound {
        tracing::warn!(
            "file {} has incorrect episode index {} (max {}), set to {}",
            file_name,
            current,
            max_bound,
            from_filename
        );
        return Reconciled {
            value: from_filename,
            rule: ReconcileRule::OutOfRange,
        };
    }

    if from_filename > 0.0 && current <= 0.0 {
        tracing::warn!(
            "file {} may have incorrect episode index {}, should be {}",
            file_name,
            current,
            from_filename
        );
        return Reconciled {
            value: from_filename,
            rule: ReconcileRule::RecoveredFromFilename,
        };
    }

    tracing::info!(
        "use exists episode number {} over {} from file name {}",
        current,
        from_filename,
        file_name
    );
    Reconciled {
        value: current,
        rule: ReconcileRule::KeepExisting,
    }
}
