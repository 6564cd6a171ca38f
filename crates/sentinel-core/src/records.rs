//! Subscription records
//!
//! One [`SubscriptionRecord`] per spreadsheet row. Construction is tolerant:
//! numeric fields that are absent or malformed become zero, date fields
//! become `None` and fail closed in the billing clock. Rows never reject.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Column names understood by the record builder. The first seven are
/// required (see [`crate::schema::REQUIRED_COLUMNS`]); the rest are optional
/// and default when absent.
pub mod columns {
    /// Reseller that owns the subscription.
    pub const RESELLER: &str = "Reseller name";
    /// Product / subscription name.
    pub const SUBSCRIPTION: &str = "Subscription name";
    /// Contract term, display only.
    pub const SUBSCRIPTION_PERIOD: &str = "Subscription period";
    /// Reminder frequency: daily, monthly or annually.
    pub const BILLING_PERIOD: &str = "Billing period";
    /// Record status; only ACTIVE rows are evaluated.
    pub const STATUS: &str = "Status";
    /// Last day the subscription is in force.
    pub const EXPIRATION: &str = "Expiration date";
    /// Anchor date for monthly / annual matching.
    pub const RENEWAL: &str = "Renewal date";
    /// End customer the reminder is addressed to.
    pub const CUSTOMER: &str = "EndCustomerName";
    /// Number of licensed units.
    pub const QUANTITY: &str = "Quantity";
    /// Unit price.
    pub const AMOUNT: &str = "Amount";
    /// Email address or opaque contact string.
    pub const CONTACT: &str = "Client Contact";
}

/// A loaded record set: trimmed column names plus raw cell strings, exactly
/// as they came out of the spreadsheet.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    columns: Vec<String>,
    rows: Vec<HashMap<String, String>>,
}

impl RecordSet {
    /// Build a record set from column names and rows. Column names are
    /// whitespace-trimmed, mirroring the trim applied on load.
    pub fn new(columns: Vec<String>, rows: Vec<HashMap<String, String>>) -> Self {
        let columns = columns.into_iter().map(|c| c.trim().to_string()).collect();
        Self { columns, rows }
    }

    /// Column names present in the set.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the set has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Materialize every row as a [`SubscriptionRecord`]. Never fails; bad
    /// cells degrade per-field.
    pub fn records(&self) -> Vec<SubscriptionRecord> {
        self.rows.iter().map(SubscriptionRecord::from_row).collect()
    }
}

/// One subscription / license row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    /// Reseller name.
    pub reseller: String,
    /// Subscription / product name.
    pub subscription: String,
    /// Contract term (e.g. "1 Year"), display only.
    pub subscription_period: String,
    /// Raw billing period cell; parsed by the billing clock.
    pub billing_period: String,
    /// Raw status cell; compared case-insensitively against ACTIVE.
    pub status: String,
    /// Expiration date, `None` when absent or unparseable.
    pub expiration: Option<NaiveDate>,
    /// Renewal anchor date, `None` when absent or unparseable.
    pub renewal: Option<NaiveDate>,
    /// End customer name.
    pub customer: String,
    /// Client contact (email address or opaque string).
    pub contact: String,
    /// Licensed quantity; zero when absent or malformed.
    pub quantity: Decimal,
    /// Unit price; zero when absent or malformed.
    pub unit_amount: Decimal,
}

impl SubscriptionRecord {
    /// Build a record from one row of cell strings, keyed by trimmed column
    /// name.
    pub fn from_row(row: &HashMap<String, String>) -> Self {
        let cell = |name: &str| row.get(name).map(|v| v.trim().to_string()).unwrap_or_default();

        Self {
            reseller: cell(columns::RESELLER),
            subscription: cell(columns::SUBSCRIPTION),
            subscription_period: cell(columns::SUBSCRIPTION_PERIOD),
            billing_period: cell(columns::BILLING_PERIOD),
            status: cell(columns::STATUS),
            expiration: parse_date(&cell(columns::EXPIRATION)),
            renewal: parse_date(&cell(columns::RENEWAL)),
            customer: cell(columns::CUSTOMER),
            contact: cell(columns::CONTACT),
            quantity: parse_decimal(&cell(columns::QUANTITY)),
            unit_amount: parse_decimal(&cell(columns::AMOUNT)),
        }
    }

    /// True when the status cell reads ACTIVE, ignoring case and
    /// surrounding whitespace.
    pub fn is_active(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("ACTIVE")
    }

    /// Stable identity used for duplicate suppression: customer,
    /// subscription and renewal date. Identical rows collide on purpose,
    /// they describe the same obligation.
    pub fn key(&self) -> String {
        let renewal = self
            .renewal
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into());
        format!("{}|{}|{}", self.customer, self.subscription, renewal)
    }
}

/// Tolerant money/quantity parser: strips currency noise (`$`, thousands
/// separators, whitespace) and falls back to zero.
pub(crate) fn parse_decimal(raw: &str) -> Decimal {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return Decimal::ZERO;
    }
    cleaned.parse().unwrap_or(Decimal::ZERO)
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y"];

/// Tolerant date parser. Accepts the common spreadsheet spellings and an
/// optional trailing time component; anything else is `None`.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    // Cells exported as datetimes carry a time suffix; the date part is
    // everything before the first space.
    let date_part = raw.split_whitespace().next().unwrap_or(raw);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_record_from_row() {
        let r = SubscriptionRecord::from_row(&row(&[
            (columns::RESELLER, "Acme Distribution"),
            (columns::SUBSCRIPTION, "CloudSuite"),
            (columns::STATUS, " active "),
            (columns::EXPIRATION, "2099-01-01"),
            (columns::RENEWAL, "2024-03-15"),
            (columns::CUSTOMER, "Globex"),
            (columns::QUANTITY, "2"),
            (columns::AMOUNT, "$1,250.50"),
            (columns::CONTACT, "billing@globex.example"),
        ]));

        assert!(r.is_active());
        assert_eq!(r.expiration, NaiveDate::from_ymd_opt(2099, 1, 1));
        assert_eq!(r.renewal, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(r.quantity, dec!(2));
        assert_eq!(r.unit_amount, dec!(1250.50));
    }

    #[test]
    fn test_malformed_cells_degrade() {
        let r = SubscriptionRecord::from_row(&row(&[
            (columns::STATUS, "ACTIVE"),
            (columns::EXPIRATION, "someday"),
            (columns::QUANTITY, "a few"),
            (columns::AMOUNT, ""),
        ]));

        assert_eq!(r.expiration, None);
        assert_eq!(r.renewal, None);
        assert_eq!(r.quantity, Decimal::ZERO);
        assert_eq!(r.unit_amount, Decimal::ZERO);
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(parse_date("2024-03-15"), NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(parse_date("2024/03/15"), NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(parse_date("15/03/2024"), NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(
            parse_date("2024-03-15 00:00:00"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("n/a"), None);
    }

    #[test]
    fn test_record_key_is_stable() {
        let a = SubscriptionRecord::from_row(&row(&[
            (columns::CUSTOMER, "Globex"),
            (columns::SUBSCRIPTION, "CloudSuite"),
            (columns::RENEWAL, "2024-03-15"),
        ]));
        let b = a.clone();
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key(), "Globex|CloudSuite|2024-03-15");
    }

    #[test]
    fn test_column_names_trimmed() {
        let set = RecordSet::new(vec!["  Status ".into(), "Quantity".into()], vec![]);
        assert_eq!(set.columns(), ["Status", "Quantity"]);
    }
}
