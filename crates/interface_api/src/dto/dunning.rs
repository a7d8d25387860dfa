//! Dunning DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{InvoiceId, Timezone};
use domain_dunning::{
    DunningAction, Escalation, InvoiceSnapshot, MainStatus, PlannedReminder, ReminderRecord,
    ReminderStepPolicy, StatusReport, StatusTone,
};

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub invoice: InvoiceSnapshot,
    /// Defaults to today in the request or configured timezone
    pub as_of: Option<NaiveDate>,
    pub timezone: Option<Timezone>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub invoice_id: InvoiceId,
    pub as_of: NaiveDate,
    pub label: String,
    pub tone: StatusTone,
    pub sort_rank: u8,
    #[serde(flatten)]
    pub report: StatusReport,
}

impl StatusResponse {
    pub fn new(invoice_id: InvoiceId, as_of: NaiveDate, report: StatusReport) -> Self {
        let status: MainStatus = report.main_status;
        Self {
            invoice_id,
            as_of,
            label: status.label().to_string(),
            tone: status.tone(),
            sort_rank: status.sort_rank(),
            report,
        }
    }
}

/// Body shared by the next-reminder and plan endpoints
#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub invoice: InvoiceSnapshot,
    #[serde(default)]
    pub history: Vec<ReminderRecord>,
    /// Defaults to the configured policy
    pub policy: Option<ReminderStepPolicy>,
    pub as_of: Option<NaiveDate>,
    pub timezone: Option<Timezone>,
}

#[derive(Debug, Serialize)]
pub struct NextReminderResponse {
    pub invoice_id: InvoiceId,
    pub as_of: NaiveDate,
    pub next_reminder: Option<PlannedReminder>,
    pub escalation: Escalation,
}

#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    pub invoice: InvoiceSnapshot,
    pub policy: Option<ReminderStepPolicy>,
    pub target_date: NaiveDate,
    pub timezone: Option<Timezone>,
}

#[derive(Debug, Serialize)]
pub struct SimulateResponse {
    pub invoice_id: InvoiceId,
    pub target_date: NaiveDate,
    /// Status the invoice would show on the target date
    pub main_status: MainStatus,
    pub reminders: Vec<PlannedReminder>,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub invoice_id: InvoiceId,
    pub as_of: NaiveDate,
    pub actions: Vec<DunningAction>,
    pub escalation: Escalation,
}
