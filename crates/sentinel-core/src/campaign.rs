//! Reminder campaign orchestration
//!
//! One campaign run is a single sequential pass: validate columns, filter
//! to ACTIVE rows, ask the billing clock, compute totals and dispatch.
//! Exactly one dispatch attempt per record per channel per run; repeated
//! runs are deduplicated through the pluggable [`ReminderLedger`].

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::info;

use crate::clock::{is_due, BillingPeriod};
use crate::config::NotifierConfig;
use crate::dispatch::{
    Channel, ChannelSelection, DispatchOutcome, NotificationDispatcher, ReminderNote,
};
use crate::records::{RecordSet, SubscriptionRecord};
use crate::schema::validate_columns;
use crate::CampaignError;

/// Identity of one notification within one billing cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CycleKey {
    /// Record identity (customer, subscription, renewal date).
    pub record: String,
    /// Cycle id: the date for daily, year-month for monthly, year for
    /// annual reminders.
    pub cycle: String,
}

impl CycleKey {
    /// Key for a due record on `today`. `None` when the billing period does
    /// not parse, which cannot happen for a record the clock marked due.
    pub fn for_record(record: &SubscriptionRecord, today: NaiveDate) -> Option<Self> {
        let cycle = match BillingPeriod::parse(&record.billing_period)? {
            BillingPeriod::Daily => today.to_string(),
            BillingPeriod::Monthly => format!("{:04}-{:02}", today.year(), today.month()),
            BillingPeriod::Annually => format!("{:04}", today.year()),
        };
        Some(Self {
            record: record.key(),
            cycle,
        })
    }
}

/// Caller-pluggable "already notified this cycle" check.
pub trait ReminderLedger: Send + Sync {
    /// Was a reminder already sent for this key?
    fn already_sent(&self, key: &CycleKey) -> bool;
    /// Record that a reminder went out for this key.
    fn mark_sent(&self, key: &CycleKey);
}

/// Reference behavior: no suppression. A trigger firing several times on a
/// matching day re-sends every time.
#[derive(Debug, Default)]
pub struct NoSuppression;

impl ReminderLedger for NoSuppression {
    fn already_sent(&self, _key: &CycleKey) -> bool {
        false
    }

    fn mark_sent(&self, _key: &CycleKey) {}
}

/// Process-local ledger: one send per record per cycle for the lifetime of
/// the process. Used by the unattended engine so a short poll interval does
/// not hammer clients.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    sent: RwLock<HashSet<CycleKey>>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReminderLedger for MemoryLedger {
    fn already_sent(&self, key: &CycleKey) -> bool {
        self.sent.read().contains(key)
    }

    fn mark_sent(&self, key: &CycleKey) {
        self.sent.write().insert(key.clone());
    }
}

/// Outcome of one record's dispatch within a run.
#[derive(Debug, Clone)]
pub struct RecordDispatch {
    /// End customer name.
    pub customer: String,
    /// Subscription name.
    pub subscription: String,
    /// Total amount due.
    pub total_due: Decimal,
    /// Per-channel results.
    pub outcomes: Vec<DispatchOutcome>,
}

/// Aggregate result of one campaign run.
#[derive(Debug, Clone, Default)]
pub struct CampaignResult {
    /// Active records evaluated.
    pub evaluated: usize,
    /// Records the clock marked due today.
    pub due: usize,
    /// Due records skipped because the ledger saw them this cycle.
    pub suppressed: usize,
    /// Dispatch details for every record that reached the dispatcher.
    pub dispatches: Vec<RecordDispatch>,
}

impl CampaignResult {
    /// Successful deliveries on `channel`.
    pub fn sent(&self, channel: Channel) -> usize {
        self.count(channel, true)
    }

    /// Failed deliveries on `channel`.
    pub fn failed(&self, channel: Channel) -> usize {
        self.count(channel, false)
    }

    fn count(&self, channel: Channel, ok: bool) -> usize {
        self.dispatches
            .iter()
            .flat_map(|d| &d.outcomes)
            .filter(|o| o.channel == channel && o.result.is_ok() == ok)
            .count()
    }
}

/// Evaluate a record set without dispatching: the records that are due on
/// `today`. Shared by the due-preview and dry runs.
pub fn due_records(
    set: &RecordSet,
    today: NaiveDate,
) -> Result<Vec<SubscriptionRecord>, CampaignError> {
    validate_columns(set)?;
    Ok(set
        .records()
        .into_iter()
        .filter(|r| r.is_active() && is_due(r, today))
        .collect())
}

/// The campaign core. Both triggers (interactive CLI and unattended
/// engine) drive this same object.
pub struct ReminderCampaign {
    dispatcher: NotificationDispatcher,
    ledger: Arc<dyn ReminderLedger>,
}

impl ReminderCampaign {
    /// Campaign with the reference duplicate behavior (no suppression).
    pub fn new(dispatcher: NotificationDispatcher) -> Self {
        Self {
            dispatcher,
            ledger: Arc::new(NoSuppression),
        }
    }

    /// Replace the duplicate-suppression ledger.
    pub fn with_ledger(mut self, ledger: Arc<dyn ReminderLedger>) -> Self {
        self.ledger = ledger;
        self
    }

    /// Run one full pass over `set` for `today`.
    ///
    /// Fails fast on missing configuration or missing columns; after that
    /// point nothing aborts the pass, per-record delivery failures are
    /// collected in the result.
    pub async fn run(
        &self,
        set: &RecordSet,
        today: NaiveDate,
        config: &NotifierConfig,
        selection: ChannelSelection,
    ) -> Result<CampaignResult, CampaignError> {
        if !config.is_configured() {
            return Err(CampaignError::ConfigMissing);
        }
        validate_columns(set)?;

        let mut result = CampaignResult::default();

        for record in set.records() {
            if !record.is_active() {
                continue;
            }
            result.evaluated += 1;

            if !is_due(&record, today) {
                continue;
            }
            result.due += 1;

            let key = CycleKey::for_record(&record, today);
            if let Some(key) = &key {
                if self.ledger.already_sent(key) {
                    result.suppressed += 1;
                    continue;
                }
            }

            let note = ReminderNote::from_record(&record);
            info!(customer = %note.customer, total = %note.total_due, "reminder due");

            let outcomes = self.dispatcher.dispatch(&note, config, selection).await;

            // A cycle counts as notified once any channel got through.
            if let Some(key) = &key {
                if outcomes.iter().any(|o| o.result.is_ok()) {
                    self.ledger.mark_sent(key);
                }
            }

            result.dispatches.push(RecordDispatch {
                customer: note.customer,
                subscription: note.subscription,
                total_due: note.total_due,
                outcomes,
            });
        }

        info!(
            evaluated = result.evaluated,
            due = result.due,
            suppressed = result.suppressed,
            "campaign pass complete"
        );
        Ok(result)
    }
}
