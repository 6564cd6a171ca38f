//! Amount calculation
//!
//! Total due is quantity times unit price, computed in `Decimal` so
//! currency totals never drift. The tolerant field parsing upstream means
//! this can never fail: a missing or malformed operand is already zero.

use rust_decimal::Decimal;

use crate::records::SubscriptionRecord;

/// Monetary total due for one record.
pub fn total_due(record: &SubscriptionRecord) -> Decimal {
    record.quantity * record.unit_amount
}
