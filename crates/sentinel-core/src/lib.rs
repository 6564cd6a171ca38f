//! License Sentinel Core
//!
//! Decision engine and campaign orchestration for subscription billing
//! reminders.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     REMINDER CAMPAIGN                         │
//! │                                                               │
//! │  RecordSet ─► Schema Check ─► Active Filter ─► Billing Clock   │
//! │                                                    │          │
//! │                                              due records      │
//! │                                                    ▼          │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐  │
//! │  │   Amount     │   │   Reminder   │   │   Notification   │  │
//! │  │  Calculator  │   │    Ledger    │   │    Dispatcher    │  │
//! │  └──────────────┘   └──────────────┘   └──────────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! The campaign takes records, a calendar date and a [`NotifierConfig`] and
//! produces a [`CampaignResult`]. Outbound channels are abstract
//! [`Notifier`] implementations supplied by the caller; the core never
//! performs I/O of its own beyond the optional workbook loader.

#![warn(missing_docs)]

pub mod amount;
pub mod campaign;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod records;
pub mod schema;
pub mod workbook;

use thiserror::Error;

pub use amount::total_due;
pub use campaign::{
    CampaignResult, CycleKey, MemoryLedger, NoSuppression, RecordDispatch, ReminderCampaign,
    ReminderLedger,
};
pub use clock::{is_due, BillingPeriod};
pub use config::NotifierConfig;
pub use dispatch::{
    Channel, ChannelSelection, DispatchOutcome, NotificationDispatcher, Notifier, ReminderNote,
};
pub use records::{RecordSet, SubscriptionRecord};
pub use schema::{validate_columns, REQUIRED_COLUMNS};

/// Fatal campaign-level errors. A run that fails with one of these performed
/// no deliveries at all.
#[derive(Debug, Error)]
pub enum CampaignError {
    /// The record set is missing one or more required columns. Lists every
    /// missing column, not just the first.
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// No notification settings have been saved yet; the run is skipped and
    /// should be retried once configuration exists.
    #[error("notification settings are not configured")]
    ConfigMissing,

    /// The configuration file could not be read or written.
    #[error("config error: {0}")]
    Config(String),

    /// The input spreadsheet could not be opened or read.
    #[error("workbook error: {0}")]
    Workbook(String),
}

/// Per-channel, per-record delivery failures. These are recorded in the
/// campaign result and never abort the remaining deliveries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The contact string does not look like an email address.
    #[error("recipient {0:?} is not an email address")]
    InvalidRecipient(String),

    /// The channel rejected the configured credentials.
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// Transport-level failure (connection, protocol, non-success response).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The channel did not answer within its timeout.
    #[error("request timed out")]
    Timeout,
}
