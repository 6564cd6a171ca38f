//! Spreadsheet schema check

use std::path::Path;

use colored::Colorize;
use sentinel_core::{validate_columns, workbook, CampaignError};

use crate::output::OutputFormat;

pub fn handle(file: &Path, _format: OutputFormat) -> Result<(), String> {
    let set = workbook::load_records(file).map_err(|e| e.to_string())?;

    match validate_columns(&set) {
        Ok(()) => {
            println!(
                "{} {} rows, all required columns present",
                "valid:".green().bold(),
                set.len()
            );
            Ok(())
        }
        Err(CampaignError::MissingColumns(missing)) => {
            eprintln!("{} missing required columns:", "invalid:".red().bold());
            for column in &missing {
                eprintln!("  - {column}");
            }
            Err(format!("{} column(s) missing", missing.len()))
        }
        Err(other) => Err(other.to_string()),
    }
}
