//! License Sentinel Notification Channels
//!
//! Transport adapters behind the core's [`Notifier`] port: SMTP email via
//! lettre and Telegram via the Bot API, plus the pure message composition
//! they share. Both adapters convert every failure into a
//! [`sentinel_core::DeliveryError`]; nothing escapes past the port.

#![warn(missing_docs)]

pub mod email;
pub mod message;
pub mod telegram;

use std::sync::Arc;

use sentinel_core::{DeliveryError, Notifier};

pub use email::{send_summary, SmtpNotifier};
pub use telegram::TelegramNotifier;

/// The standard channel set, in the order the campaign drives them:
/// Telegram first, then email, matching the reference dispatch order.
pub fn standard_notifiers() -> Result<Vec<Arc<dyn Notifier>>, DeliveryError> {
    Ok(vec![
        Arc::new(TelegramNotifier::new()?),
        Arc::new(SmtpNotifier::new()),
    ])
}
