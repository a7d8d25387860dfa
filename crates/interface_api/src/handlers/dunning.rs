//! Dunning preview handlers
//!
//! Stateless: every request carries the invoice snapshot and, where needed,
//! its reminder history. Nothing is written.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::{NaiveDate, Utc};
use tracing::debug;

use core_kernel::Timezone;
use domain_dunning::{
    derive_status, escalation_decision, next_pending_reminder, plan_actions, simulate_schedule,
    ReminderStepPolicy,
};

use crate::dto::dunning::*;
use crate::{error::ApiError, AppState};

/// Derives the status report of an invoice
pub async fn derive_invoice_status(
    State(state): State<AppState>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(request) = payload?;
    let tz = request.timezone.unwrap_or(state.config.timezone);
    let as_of = request.as_of.unwrap_or_else(|| today(&tz));

    let report = derive_status(&request.invoice, as_of);
    Ok(Json(StatusResponse::new(request.invoice.id, as_of, report)))
}

/// Reports the next reminder and the escalation state
pub async fn next_reminder(
    State(state): State<AppState>,
    payload: Result<Json<ScheduleRequest>, JsonRejection>,
) -> Result<Json<NextReminderResponse>, ApiError> {
    let Json(request) = payload?;
    let tz = request.timezone.unwrap_or(state.config.timezone);
    let as_of = request.as_of.unwrap_or_else(|| today(&tz));
    let policy = resolve_policy(request.policy, &state)?;

    let next = next_pending_reminder(&request.invoice, &policy, &request.history, as_of, &tz);
    let escalation = escalation_decision(&request.invoice, &policy, &request.history, as_of);

    Ok(Json(NextReminderResponse {
        invoice_id: request.invoice.id,
        as_of,
        next_reminder: next,
        escalation,
    }))
}

/// Projects the reminders that would exist on a target date
pub async fn simulate(
    State(state): State<AppState>,
    payload: Result<Json<SimulateRequest>, JsonRejection>,
) -> Result<Json<SimulateResponse>, ApiError> {
    let Json(request) = payload?;
    let tz = request.timezone.unwrap_or(state.config.timezone);
    let policy = resolve_policy(request.policy, &state)?;

    let reminders: Vec<_> =
        simulate_schedule(&request.invoice, &policy, request.target_date, &tz).collect();
    debug!(
        invoice_id = %request.invoice.id,
        target_date = %request.target_date,
        count = reminders.len(),
        "Schedule simulated"
    );

    Ok(Json(SimulateResponse {
        invoice_id: request.invoice.id,
        target_date: request.target_date,
        main_status: derive_status(&request.invoice, request.target_date).main_status,
        reminders,
    }))
}

/// Lists what a background run would do for the invoice today
pub async fn plan(
    State(state): State<AppState>,
    payload: Result<Json<ScheduleRequest>, JsonRejection>,
) -> Result<Json<PlanResponse>, ApiError> {
    let Json(request) = payload?;
    let tz = request.timezone.unwrap_or(state.config.timezone);
    let as_of = request.as_of.unwrap_or_else(|| today(&tz));
    let policy = resolve_policy(request.policy, &state)?;

    Ok(Json(PlanResponse {
        invoice_id: request.invoice.id,
        as_of,
        actions: plan_actions(&request.invoice, &policy, &request.history, as_of, &tz),
        escalation: escalation_decision(&request.invoice, &policy, &request.history, as_of),
    }))
}

/// Uses the request policy when present, validated, else the configured one
fn resolve_policy(
    requested: Option<ReminderStepPolicy>,
    state: &AppState,
) -> Result<ReminderStepPolicy, ApiError> {
    match requested {
        Some(policy) if policy.is_well_formed() => Ok(policy),
        Some(policy) => {
            // Rebuilding through the validating constructor yields the reason
            let rebuilt = ReminderStepPolicy::new(
                policy.steps().to_vec(),
                policy.litigation_delay_days(),
            )?;
            Ok(rebuilt)
        }
        None => Ok(state.config.default_policy.clone()),
    }
}

/// The only clock read in the workspace
fn today(tz: &Timezone) -> NaiveDate {
    tz.local_date(Utc::now())
}
