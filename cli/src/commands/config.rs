//! Notification settings management

use std::path::Path;

use colored::Colorize;
use sentinel_core::{CampaignError, NotifierConfig};

use crate::ConfigCommands;

pub fn handle(action: ConfigCommands, path: &Path) -> Result<(), String> {
    match action {
        ConfigCommands::Set {
            email_user,
            email_pass,
            smtp_host,
            tg_token,
            tg_chat_id,
        } => {
            // Start from whatever is already saved so partial updates work.
            let mut config = match NotifierConfig::load(path) {
                Ok(existing) => existing,
                Err(CampaignError::ConfigMissing) => NotifierConfig::default(),
                Err(e) => return Err(e.to_string()),
            };

            if let Some(v) = email_user {
                config.email_user = v;
            }
            if let Some(v) = email_pass {
                config.email_pass = v;
            }
            if let Some(v) = smtp_host {
                config.smtp_host = v;
            }
            if let Some(v) = tg_token {
                config.tg_token = v;
            }
            if let Some(v) = tg_chat_id {
                config.tg_chat_id = v;
            }

            config.save(path).map_err(|e| e.to_string())?;
            println!("{} settings saved to {}", "ok:".green().bold(), path.display());
            Ok(())
        }
        ConfigCommands::Show => {
            let config = NotifierConfig::load(path).map_err(|e| e.to_string())?;
            println!("email_user  = {}", display(&config.email_user));
            println!("email_pass  = {}", mask(&config.email_pass));
            println!("smtp_host   = {}", display(&config.smtp_host));
            println!("tg_token    = {}", mask(&config.tg_token));
            println!("tg_chat_id  = {}", display(&config.tg_chat_id));
            Ok(())
        }
    }
}

fn display(value: &str) -> String {
    if value.is_empty() {
        "(unset)".dimmed().to_string()
    } else {
        value.to_string()
    }
}

fn mask(value: &str) -> String {
    if value.is_empty() {
        "(unset)".dimmed().to_string()
    } else {
        "********".to_string()
    }
}
