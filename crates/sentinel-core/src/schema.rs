//! Record-set schema validation
//!
//! Runs once per load, before any row-level logic. A set missing required
//! columns is rejected whole; the error names every missing column.

use crate::records::{columns, RecordSet};
use crate::CampaignError;

/// Columns that must be present for a record set to be processed.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    columns::RESELLER,
    columns::SUBSCRIPTION,
    columns::STATUS,
    columns::EXPIRATION,
    columns::CUSTOMER,
    columns::QUANTITY,
    columns::CONTACT,
];

/// Validate that every required column is present. Extra columns are fine.
pub fn validate_columns(set: &RecordSet) -> Result<(), CampaignError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !set.columns().iter().any(|c| c == *required))
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CampaignError::MissingColumns(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_with(columns: &[&str]) -> RecordSet {
        RecordSet::new(columns.iter().map(|c| c.to_string()).collect(), vec![])
    }

    #[test]
    fn test_all_required_present() {
        let mut cols: Vec<&str> = REQUIRED_COLUMNS.to_vec();
        cols.push("Some Extra Column");
        assert!(validate_columns(&set_with(&cols)).is_ok());
    }

    #[test]
    fn test_missing_column_is_named() {
        let cols: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| *c != "Quantity")
            .collect();
        let err = validate_columns(&set_with(&cols)).unwrap_err();
        match err {
            CampaignError::MissingColumns(missing) => {
                assert_eq!(missing, vec!["Quantity".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_every_missing_column_is_reported() {
        let err = validate_columns(&set_with(&["Status"])).unwrap_err();
        match err {
            CampaignError::MissingColumns(missing) => {
                assert_eq!(missing.len(), REQUIRED_COLUMNS.len() - 1);
                assert!(missing.iter().all(|c| c != "Status"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
