//! Due-record preview

use std::path::Path;

use chrono::{Local, NaiveDate};
use sentinel_core::{campaign, total_due, workbook, SubscriptionRecord};
use serde::Serialize;
use tabled::Tabled;

use crate::output::OutputFormat;

#[derive(Serialize, Tabled)]
pub struct DueRow {
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Subscription")]
    subscription: String,
    #[tabled(rename = "Billing")]
    billing: String,
    #[tabled(rename = "Total Due")]
    total: String,
    #[tabled(rename = "Renewal")]
    renewal: String,
}

impl DueRow {
    pub fn from_record(record: &SubscriptionRecord) -> Self {
        Self {
            customer: record.customer.clone(),
            subscription: record.subscription.clone(),
            billing: record.billing_period.clone(),
            total: format!("${}", sentinel_notify::message::format_money(total_due(record))),
            renewal: record
                .renewal
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".into()),
        }
    }
}

pub fn handle(file: &Path, date: Option<NaiveDate>, format: OutputFormat) -> Result<(), String> {
    let today = date.unwrap_or_else(|| Local::now().date_naive());
    let set = workbook::load_records(file).map_err(|e| e.to_string())?;
    let due = campaign::due_records(&set, today).map_err(|e| e.to_string())?;

    let rows: Vec<DueRow> = due.iter().map(DueRow::from_record).collect();
    format.print(&rows);
    println!("{} record(s) due on {}", due.len(), today);
    Ok(())
}
