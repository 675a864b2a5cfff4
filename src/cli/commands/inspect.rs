//! Inspect command implementation.

use crate::core::filename::FilenameSignal;
use crate::services::anitomy::{NumberExtractor, TokenExtractor};
use crate::Result;
use colored::Colorize;

/// Print the signals extracted from each file name.
pub fn inspect(file_names: &[String], anitomy: bool) -> Result<()> {
    let extractor = TokenExtractor::new();
    let extractor = anitomy.then_some(&extractor as &dyn NumberExtractor);

    for file_name in file_names {
        let signal = FilenameSignal::extract(file_name, extractor);

        println!("{}", file_name.bold());
        println!("  {} {}", "Stripped:".dimmed(), signal.stripped_name);
        println!(
            "  {} {}",
            "Type:".dimmed(),
            signal
                .guessed_type
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
        println!(
            "  {} {}",
            "Number:".dimmed(),
            signal
                .guessed_number
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
        println!();
    }

    Ok(())
}
