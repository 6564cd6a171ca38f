//! Billing clock
//!
//! The pure decision at the heart of the system: does a reminder fire for
//! this record on this calendar date? No I/O, no side effects, never
//! panics.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::records::SubscriptionRecord;

/// Reminder recurrence frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillingPeriod {
    /// Fires every day the record is active and unexpired.
    Daily,
    /// Fires on the renewal date's day-of-month, every month.
    Monthly,
    /// Fires on the exact renewal date, once.
    Annually,
}

impl BillingPeriod {
    /// Parse a billing-period cell, ignoring case and surrounding
    /// whitespace. Unknown values are `None` and never fire.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "monthly" => Some(Self::Monthly),
            "annually" => Some(Self::Annually),
            _ => None,
        }
    }
}

/// Decide whether a reminder is due for `record` on `today`.
///
/// Rules, in order:
/// 1. status must be ACTIVE (case-insensitive, trimmed)
/// 2. `today` must not be past the expiration date
/// 3. the renewal date must parse; without an anchor nothing fires
/// 4. daily always fires; monthly fires when the day-of-month matches the
///    renewal day; annually fires only on the exact renewal date, year
///    included
///
/// A renewal day that a month does not have (e.g. day 31 in April) simply
/// does not match that month.
pub fn is_due(record: &SubscriptionRecord, today: NaiveDate) -> bool {
    if !record.is_active() {
        return false;
    }

    let Some(expiration) = record.expiration else {
        return false;
    };
    if today > expiration {
        return false;
    }

    let Some(renewal) = record.renewal else {
        return false;
    };

    match BillingPeriod::parse(&record.billing_period) {
        Some(BillingPeriod::Daily) => true,
        Some(BillingPeriod::Monthly) => today.day() == renewal.day(),
        Some(BillingPeriod::Annually) => today == renewal,
        None => false,
    }
}
