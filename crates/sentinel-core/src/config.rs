//! Notification settings
//!
//! A [`NotifierConfig`] is a plain value handed to each campaign run. The
//! campaign never reads a file itself; the binaries load the config fresh
//! at the start of every run and pass it in. Persistence is TOML at an
//! explicit path.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::CampaignError;

/// Channel credentials for one campaign run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Sender mailbox address. Also receives summary reports.
    #[serde(default)]
    pub email_user: String,
    /// Sender mailbox secret (app password).
    #[serde(default)]
    pub email_pass: String,
    /// SMTP submission host, contacted over implicit TLS on port 465.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// Telegram bot token.
    #[serde(default)]
    pub tg_token: String,
    /// Telegram chat id the alerts are posted to.
    #[serde(default)]
    pub tg_chat_id: String,
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".into()
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            email_user: String::new(),
            email_pass: String::new(),
            smtp_host: default_smtp_host(),
            tg_token: String::new(),
            tg_chat_id: String::new(),
        }
    }
}

impl NotifierConfig {
    /// True when at least one channel has usable credentials. A config that
    /// can drive neither channel is treated as missing.
    pub fn is_configured(&self) -> bool {
        self.email_configured() || self.telegram_configured()
    }

    /// True when the mail channel has credentials.
    pub fn email_configured(&self) -> bool {
        !self.email_user.is_empty() && !self.email_pass.is_empty()
    }

    /// True when the Telegram channel has credentials.
    pub fn telegram_configured(&self) -> bool {
        !self.tg_token.is_empty() && !self.tg_chat_id.is_empty()
    }

    /// Load settings from a TOML file. A missing file is
    /// [`CampaignError::ConfigMissing`]; the caller skips the run and
    /// retries on the next trigger.
    pub fn load(path: &Path) -> Result<Self, CampaignError> {
        if !path.exists() {
            return Err(CampaignError::ConfigMissing);
        }
        let content = fs::read_to_string(path).map_err(|e| CampaignError::Config(e.to_string()))?;
        toml::from_str(&content).map_err(|e| CampaignError::Config(e.to_string()))
    }

    /// Persist settings as TOML, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), CampaignError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| CampaignError::Config(e.to_string()))?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CampaignError::Config(e.to_string()))?;
        fs::write(path, content).map_err(|e| CampaignError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_flags() {
        let mut c = NotifierConfig::default();
        assert!(!c.is_configured());

        c.email_user = "billing@example.com".into();
        assert!(!c.email_configured());
        c.email_pass = "app-password".into();
        assert!(c.email_configured());
        assert!(c.is_configured());
        assert!(!c.telegram_configured());

        c.tg_token = "12345:token".into();
        c.tg_chat_id = "-100200300".into();
        assert!(c.telegram_configured());
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = NotifierConfig {
            email_user: "billing@example.com".into(),
            email_pass: "secret".into(),
            smtp_host: "smtp.example.com".into(),
            tg_token: "12345:token".into(),
            tg_chat_id: "-100200300".into(),
        };
        config.save(&path).unwrap();

        let loaded = NotifierConfig::load(&path).unwrap();
        assert_eq!(loaded.email_user, config.email_user);
        assert_eq!(loaded.smtp_host, config.smtp_host);
        assert_eq!(loaded.tg_chat_id, config.tg_chat_id);
    }

    #[test]
    fn test_missing_file_is_config_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = NotifierConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, CampaignError::ConfigMissing));
    }

    #[test]
    fn test_smtp_host_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "email_user = \"a@b.c\"\nemail_pass = \"x\"\n").unwrap();

        let loaded = NotifierConfig::load(&path).unwrap();
        assert_eq!(loaded.smtp_host, "smtp.gmail.com");
    }
}
