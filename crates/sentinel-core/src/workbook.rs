//! Spreadsheet input
//!
//! Loads the first worksheet of an Excel file into a [`RecordSet`]: first
//! row as trimmed column names, remaining rows as cell strings. Excel
//! datetime cells are rendered as ISO dates so the tolerant date parser
//! picks them up unchanged.

use std::collections::HashMap;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::debug;

use crate::records::RecordSet;
use crate::CampaignError;

/// Load the first worksheet of `path` as a record set.
pub fn load_records(path: &Path) -> Result<RecordSet, CampaignError> {
    debug!(path = %path.display(), "loading workbook");

    let mut workbook =
        open_workbook_auto(path).map_err(|e| CampaignError::Workbook(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CampaignError::Workbook("workbook has no sheets".into()))?
        .map_err(|e| CampaignError::Workbook(e.to_string()))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| CampaignError::Workbook("worksheet is empty".into()))?;
    let columns: Vec<String> = header.iter().map(cell_to_string).collect();

    let records: Vec<HashMap<String, String>> = rows
        .map(|row| {
            columns
                .iter()
                .zip(row.iter())
                .map(|(name, cell)| (name.trim().to_string(), cell_to_string(cell)))
                .collect()
        })
        .collect();

    debug!(rows = records.len(), "workbook loaded");
    Ok(RecordSet::new(columns, records))
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.date().to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_rendering() {
        assert_eq!(cell_to_string(&Data::String("  Acme  ".into())), "Acme");
        assert_eq!(cell_to_string(&Data::Int(3)), "3");
        assert_eq!(cell_to_string(&Data::Float(2.0)), "2");
        assert_eq!(cell_to_string(&Data::Float(19.99)), "19.99");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }

    #[test]
    fn test_missing_file_is_workbook_error() {
        let err = load_records(Path::new("/nonexistent/data.xlsx")).unwrap_err();
        assert!(matches!(err, CampaignError::Workbook(_)));
    }
}
