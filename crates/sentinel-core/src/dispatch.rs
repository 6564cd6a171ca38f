//! Notification dispatch
//!
//! The campaign talks to outbound channels through the [`Notifier`] port;
//! the transport adapters live outside the core crate. One delivery failure
//! is recorded and never aborts the remaining channels or records.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::amount::total_due;
use crate::config::NotifierConfig;
use crate::records::SubscriptionRecord;
use crate::DeliveryError;

/// Outbound channel kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// SMTP email to the record's client contact.
    Email,
    /// Telegram bot message to the configured chat.
    Telegram,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::Telegram => write!(f, "telegram"),
        }
    }
}

/// Which channels a campaign run drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelSelection {
    /// Email only.
    EmailOnly,
    /// Telegram only.
    TelegramOnly,
    /// Both channels.
    Both,
}

impl ChannelSelection {
    /// Whether this selection includes `channel`.
    pub fn includes(&self, channel: Channel) -> bool {
        match (self, channel) {
            (Self::Both, _) => true,
            (Self::EmailOnly, Channel::Email) => true,
            (Self::TelegramOnly, Channel::Telegram) => true,
            _ => false,
        }
    }
}

/// Everything a channel needs to compose one reminder, precomputed from the
/// record so adapters stay free of business logic.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderNote {
    /// End customer name.
    pub customer: String,
    /// Subscription / product name.
    pub subscription: String,
    /// Contract term, as it appeared in the sheet.
    pub contract_term: String,
    /// Billing cycle cell, as it appeared in the sheet.
    pub billing_cycle: String,
    /// Licensed quantity.
    pub quantity: Decimal,
    /// Unit price.
    pub unit_amount: Decimal,
    /// Quantity × unit price.
    pub total_due: Decimal,
    /// Next renewal date, when known.
    pub renewal: Option<NaiveDate>,
    /// Client contact string (email address for the mail channel).
    pub contact: String,
}

impl ReminderNote {
    /// Build a note from a due record.
    pub fn from_record(record: &SubscriptionRecord) -> Self {
        Self {
            customer: record.customer.clone(),
            subscription: record.subscription.clone(),
            contract_term: record.subscription_period.clone(),
            billing_cycle: record.billing_period.clone(),
            quantity: record.quantity,
            unit_amount: record.unit_amount,
            total_due: total_due(record),
            renewal: record.renewal,
            contact: record.contact.clone(),
        }
    }
}

/// Outbound channel capability. Implementations must convert every failure
/// into a [`DeliveryError`]; nothing may escape past this boundary.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// The channel this notifier serves.
    fn channel(&self) -> Channel;

    /// Deliver one reminder.
    async fn send(
        &self,
        note: &ReminderNote,
        config: &NotifierConfig,
    ) -> Result<(), DeliveryError>;
}

/// Result of one delivery attempt on one channel.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    /// Channel attempted.
    pub channel: Channel,
    /// Delivery result.
    pub result: Result<(), DeliveryError>,
}

/// Fans one due record out to the selected channels, sequentially, at most
/// one attempt per channel.
pub struct NotificationDispatcher {
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl NotificationDispatcher {
    /// Create a dispatcher over the given channel adapters.
    pub fn new(notifiers: Vec<Arc<dyn Notifier>>) -> Self {
        Self { notifiers }
    }

    /// Deliver `note` on every selected channel. The email channel is only
    /// attempted when the contact looks like an address (contains `@`, the
    /// reference's crude shape check); otherwise the attempt is recorded as
    /// an invalid-recipient failure.
    pub async fn dispatch(
        &self,
        note: &ReminderNote,
        config: &NotifierConfig,
        selection: ChannelSelection,
    ) -> Vec<DispatchOutcome> {
        let mut outcomes = Vec::new();

        for notifier in &self.notifiers {
            let channel = notifier.channel();
            if !selection.includes(channel) {
                continue;
            }

            if channel == Channel::Email && !note.contact.contains('@') {
                outcomes.push(DispatchOutcome {
                    channel,
                    result: Err(DeliveryError::InvalidRecipient(note.contact.clone())),
                });
                continue;
            }

            let result = notifier.send(note, config).await;
            if let Err(err) = &result {
                warn!(customer = %note.customer, %channel, error = %err, "delivery failed");
            }
            outcomes.push(DispatchOutcome { channel, result });
        }

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct StubNotifier {
        channel: Channel,
        fail: bool,
        sent: Mutex<Vec<String>>,
    }

    impl StubNotifier {
        fn new(channel: Channel, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                channel,
                fail,
                sent: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Notifier for StubNotifier {
        fn channel(&self) -> Channel {
            self.channel
        }

        async fn send(
            &self,
            note: &ReminderNote,
            _config: &NotifierConfig,
        ) -> Result<(), DeliveryError> {
            if self.fail {
                return Err(DeliveryError::Transport("stub down".into()));
            }
            self.sent.lock().push(note.customer.clone());
            Ok(())
        }
    }

    fn note(customer: &str, contact: &str) -> ReminderNote {
        ReminderNote {
            customer: customer.into(),
            subscription: "CloudSuite".into(),
            contract_term: "1 Year".into(),
            billing_cycle: "monthly".into(),
            quantity: Decimal::from(2),
            unit_amount: Decimal::from(50),
            total_due: Decimal::from(100),
            renewal: None,
            contact: contact.into(),
        }
    }

    #[tokio::test]
    async fn test_selection_limits_channels() {
        let email = StubNotifier::new(Channel::Email, false);
        let tg = StubNotifier::new(Channel::Telegram, false);
        let notifiers: Vec<Arc<dyn Notifier>> = vec![email.clone(), tg.clone()];
        let dispatcher = NotificationDispatcher::new(notifiers);

        let config = NotifierConfig::default();
        let outcomes = dispatcher
            .dispatch(&note("Globex", "a@b.c"), &config, ChannelSelection::TelegramOnly)
            .await;

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].channel, Channel::Telegram);
        assert!(email.sent.lock().is_empty());
        assert_eq!(tg.sent.lock().as_slice(), ["Globex"]);
    }

    #[tokio::test]
    async fn test_email_requires_address_shape() {
        let email = StubNotifier::new(Channel::Email, false);
        let notifiers: Vec<Arc<dyn Notifier>> = vec![email.clone()];
        let dispatcher = NotificationDispatcher::new(notifiers);

        let config = NotifierConfig::default();
        let outcomes = dispatcher
            .dispatch(&note("Globex", "call the office"), &config, ChannelSelection::Both)
            .await;

        assert!(matches!(
            outcomes[0].result,
            Err(DeliveryError::InvalidRecipient(_))
        ));
        assert!(email.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_other_channels() {
        let email = StubNotifier::new(Channel::Email, false);
        let tg = StubNotifier::new(Channel::Telegram, true);
        let notifiers: Vec<Arc<dyn Notifier>> = vec![tg, email.clone()];
        let dispatcher = NotificationDispatcher::new(notifiers);

        let config = NotifierConfig::default();
        let outcomes = dispatcher
            .dispatch(&note("Globex", "a@b.c"), &config, ChannelSelection::Both)
            .await;

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].result.is_err());
        assert!(outcomes[1].result.is_ok());
        assert_eq!(email.sent.lock().as_slice(), ["Globex"]);
    }
}
