//! Reminder scheduling
//!
//! Decides which reminder is next for an invoice, when automated dunning is
//! exhausted and the invoice must go to manual follow-up, and what reminders
//! would exist on a hypothetical date. Every function here is a pure read over
//! a snapshot: writing records or advancing `reminder_status` is left to the
//! caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_dunning::scheduler::{next_pending_reminder, simulate_schedule};
//!
//! if let Some(reminder) = next_pending_reminder(&invoice, &policy, &history, today, &tz) {
//!     store.insert(reminder.to_pending_record())?;
//! }
//!
//! let preview: Vec<_> = simulate_schedule(&invoice, &policy, target, &tz).collect();
//! ```

use std::iter::FusedIterator;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use core_kernel::temporal::add_days;
use core_kernel::{InvoiceId, Timezone};

use crate::invoice::{InvoiceSnapshot, ReminderStatus};
use crate::policy::{ReminderChannel, ReminderStep, ReminderStepPolicy, StepSlot};
use crate::reminder::{PlannedReminder, ReminderOrigin, ReminderRecord};
use crate::status::derive_status;

/// Returns the reminder to act on next, if any
///
/// An existing pending record always wins (the earliest one when several
/// exist), so repeated calls never produce a second reminder for a step that
/// is already waiting to be sent. Otherwise the next configured step is
/// synthesized once `as_of` reaches `due_date + delay_days`.
pub fn next_pending_reminder(
    invoice: &InvoiceSnapshot,
    policy: &ReminderStepPolicy,
    history: &[ReminderRecord],
    as_of: NaiveDate,
    tz: &Timezone,
) -> Option<PlannedReminder> {
    if let Some(record) = earliest_pending(invoice.id, history) {
        debug!(
            invoice_id = %invoice.id,
            reminder_id = %record.id,
            step = ?record.reminder_status,
            "Pending reminder already recorded"
        );
        return Some(recorded_reminder(record, policy, tz));
    }

    let report = derive_status(invoice, as_of);
    if !report.main_status.accepts_reminders() {
        debug!(invoice_id = %invoice.id, status = ?report.main_status, "Invoice not eligible for reminders");
        return None;
    }

    if !policy.is_well_formed() {
        warn!(invoice_id = %invoice.id, "Malformed reminder policy; no reminder scheduled");
        return None;
    }

    let reached = reached_index(invoice, policy, history);
    match policy.step_for_index(reached + 1) {
        Some(StepSlot::Automated { status, step }) => {
            let due_on = step_date(invoice, step);
            if as_of < due_on {
                debug!(invoice_id = %invoice.id, step = ?status, %due_on, "Next reminder not yet due");
                return None;
            }
            debug!(invoice_id = %invoice.id, step = ?status, %due_on, "Reminder due");
            Some(planned(invoice, status, step, tz, ReminderOrigin::Synthesized))
        }
        Some(StepSlot::ManualFollowup) | None => None,
    }
}

/// Projects the reminders that would exist as of `target_date`
///
/// Starts after the invoice's current step and yields every configured step
/// whose date is on or before `target_date`. The returned iterator is lazy and
/// can be cloned to restart the projection. Nothing is yielded when the
/// invoice would not accept reminders on `target_date`.
pub fn simulate_schedule<'a>(
    invoice: &'a InvoiceSnapshot,
    policy: &'a ReminderStepPolicy,
    target_date: NaiveDate,
    tz: &Timezone,
) -> SimulatedSchedule<'a> {
    let eligible = derive_status(invoice, target_date)
        .main_status
        .accepts_reminders()
        && policy.is_well_formed();

    SimulatedSchedule {
        invoice,
        policy,
        target_date,
        tz: *tz,
        next_index: policy.index_for_reminder_status(invoice.reminder_status) + 1,
        exhausted: !eligible,
    }
}

/// Lazy projection returned by [`simulate_schedule`]
#[derive(Debug, Clone)]
pub struct SimulatedSchedule<'a> {
    invoice: &'a InvoiceSnapshot,
    policy: &'a ReminderStepPolicy,
    target_date: NaiveDate,
    tz: Timezone,
    next_index: usize,
    exhausted: bool,
}

impl<'a> SimulatedSchedule<'a> {
    pub fn target_date(&self) -> NaiveDate {
        self.target_date
    }
}

impl<'a> Iterator for SimulatedSchedule<'a> {
    type Item = PlannedReminder;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        match self.policy.step_for_index(self.next_index) {
            Some(StepSlot::Automated { status, step })
                if step_date(self.invoice, step) <= self.target_date =>
            {
                self.next_index += 1;
                Some(planned(self.invoice, status, step, &self.tz, ReminderOrigin::Simulated))
            }
            // Delays increase with the index, so the first step past the
            // target ends the projection.
            _ => {
                self.exhausted = true;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.exhausted {
            return (0, Some(0));
        }
        let remaining = self.policy.len().saturating_sub(self.next_index.saturating_sub(1));
        (0, Some(remaining))
    }
}

impl<'a> FusedIterator for SimulatedSchedule<'a> {}

/// Where an invoice stands with respect to manual follow-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Escalation {
    /// Not dunnable (unsent, paid, pending payment, already manual)
    NotApplicable,
    /// Automated steps are still ahead
    StepsRemaining,
    /// A reminder is still pending; escalation waits for it to settle
    AwaitingSettlement,
    /// Steps exhausted; the litigation delay has not elapsed
    Waiting { escalates_on: NaiveDate },
    /// The caller should move the invoice to manual follow-up
    Due,
}

/// Reports whether the invoice has exhausted automated dunning
///
/// Escalation is due once the last configured step has been reached and
/// settled, and `as_of` is at least `due_date + last delay + litigation delay`.
/// With no configured steps the invoice escalates once overdue and past the
/// litigation delay.
pub fn escalation_decision(
    invoice: &InvoiceSnapshot,
    policy: &ReminderStepPolicy,
    history: &[ReminderRecord],
    as_of: NaiveDate,
) -> Escalation {
    let report = derive_status(invoice, as_of);
    if !report.main_status.accepts_reminders() {
        return Escalation::NotApplicable;
    }

    if !policy.is_well_formed() {
        warn!(invoice_id = %invoice.id, "Malformed reminder policy; escalation not evaluated");
        return Escalation::NotApplicable;
    }

    if earliest_pending(invoice.id, history).is_some() {
        return Escalation::AwaitingSettlement;
    }

    let litigation = i64::from(policy.litigation_delay_days().unwrap_or(0));
    let escalates_on = match policy.last_step() {
        None => add_days(invoice.due_date, litigation.max(1)),
        Some(last) => {
            if reached_index(invoice, policy, history) < policy.len() {
                return Escalation::StepsRemaining;
            }
            add_days(step_date(invoice, last), litigation)
        }
    };

    if as_of >= escalates_on {
        debug!(invoice_id = %invoice.id, %escalates_on, "Escalation to manual follow-up due");
        Escalation::Due
    } else {
        Escalation::Waiting { escalates_on }
    }
}

/// Work item for a background dunning run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DunningAction {
    SendEmail { reminder: PlannedReminder },
    CreatePhoneTask { reminder: PlannedReminder },
    EscalateToManualFollowup {
        invoice_id: InvoiceId,
        escalated_on: NaiveDate,
    },
}

impl DunningAction {
    pub fn invoice_id(&self) -> InvoiceId {
        match self {
            DunningAction::SendEmail { reminder } => reminder.invoice_id,
            DunningAction::CreatePhoneTask { reminder } => reminder.invoice_id,
            DunningAction::EscalateToManualFollowup { invoice_id, .. } => *invoice_id,
        }
    }
}

/// Lists what must happen for one invoice on `as_of`
///
/// Holds at most one action: a reminder due now, or an escalation. A pending
/// reminder scheduled after `as_of` blocks both. An invoice that no longer
/// accepts reminders (paid, payment clearing, manual follow-up) gets nothing,
/// even when a stale pending record is still in its history.
pub fn plan_actions(
    invoice: &InvoiceSnapshot,
    policy: &ReminderStepPolicy,
    history: &[ReminderRecord],
    as_of: NaiveDate,
    tz: &Timezone,
) -> Vec<DunningAction> {
    let status = derive_status(invoice, as_of).main_status;
    if !status.accepts_reminders() {
        debug!(invoice_id = %invoice.id, ?status, "Invoice not eligible; nothing planned");
        return Vec::new();
    }

    if let Some(reminder) = next_pending_reminder(invoice, policy, history, as_of, tz) {
        if reminder.due_on > as_of {
            return Vec::new();
        }
        let action = match reminder.reminder_type {
            ReminderChannel::Email => DunningAction::SendEmail { reminder },
            ReminderChannel::Phone => DunningAction::CreatePhoneTask { reminder },
        };
        return vec![action];
    }

    match escalation_decision(invoice, policy, history, as_of) {
        Escalation::Due => vec![DunningAction::EscalateToManualFollowup {
            invoice_id: invoice.id,
            escalated_on: as_of,
        }],
        _ => Vec::new(),
    }
}

/// Plans a run over many invoices sharing one policy
pub fn plan_batch<'a, I>(
    invoices: I,
    policy: &ReminderStepPolicy,
    as_of: NaiveDate,
    tz: &Timezone,
) -> Vec<DunningAction>
where
    I: IntoIterator<Item = (&'a InvoiceSnapshot, &'a [ReminderRecord])>,
{
    let actions: Vec<DunningAction> = invoices
        .into_iter()
        .flat_map(|(invoice, history)| plan_actions(invoice, policy, history, as_of, tz))
        .collect();

    debug!(count = actions.len(), %as_of, "Dunning run planned");
    actions
}

fn earliest_pending(invoice_id: InvoiceId, history: &[ReminderRecord]) -> Option<&ReminderRecord> {
    history
        .iter()
        .filter(|r| r.invoice_id == invoice_id && r.is_pending())
        .min_by_key(|r| (r.scheduled_at, r.id))
}

/// Highest step index reached, from the invoice status or settled history
///
/// History counts too so that a step whose record settled before the caller
/// advanced `reminder_status` is not generated a second time.
fn reached_index(
    invoice: &InvoiceSnapshot,
    policy: &ReminderStepPolicy,
    history: &[ReminderRecord],
) -> usize {
    let from_history = history
        .iter()
        .filter(|r| r.invoice_id == invoice.id)
        .filter_map(|r| r.reminder_status.step_number())
        .max()
        .unwrap_or(0);

    policy
        .index_for_reminder_status(invoice.reminder_status)
        .max(from_history)
}

fn step_date(invoice: &InvoiceSnapshot, step: &ReminderStep) -> NaiveDate {
    add_days(invoice.due_date, i64::from(step.delay_days))
}

fn planned(
    invoice: &InvoiceSnapshot,
    status: ReminderStatus,
    step: &ReminderStep,
    tz: &Timezone,
    origin: ReminderOrigin,
) -> PlannedReminder {
    let due_on = step_date(invoice, step);
    PlannedReminder {
        invoice_id: invoice.id,
        reminder_status: status,
        reminder_type: step.channel,
        due_on,
        scheduled_at: tz.start_of_day(due_on),
        content_ref: step.content_ref.clone(),
        origin,
    }
}

fn recorded_reminder(
    record: &ReminderRecord,
    policy: &ReminderStepPolicy,
    tz: &Timezone,
) -> PlannedReminder {
    let content_ref = record
        .reminder_status
        .step_number()
        .and_then(|i| policy.step_for_index(i))
        .and_then(|slot| match slot {
            StepSlot::Automated { step, .. } => step.content_ref.clone(),
            StepSlot::ManualFollowup => None,
        });

    PlannedReminder {
        invoice_id: record.invoice_id,
        reminder_status: record.reminder_status,
        reminder_type: record.reminder_type,
        due_on: tz.local_date(record.scheduled_at),
        scheduled_at: record.scheduled_at,
        content_ref,
        origin: ReminderOrigin::Recorded(record.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{PaymentStatus, SendStatus};
    use crate::policy::ReminderStep;
    use chrono::{TimeZone, Utc};
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn policy() -> ReminderStepPolicy {
        ReminderStepPolicy::new(
            vec![
                ReminderStep::email(15).with_content("first-notice"),
                ReminderStep::email(30),
                ReminderStep::phone(45),
            ],
            Some(10),
        )
        .unwrap()
    }

    fn overdue_invoice() -> InvoiceSnapshot {
        let mut inv = InvoiceSnapshot::new(
            InvoiceId::new(),
            date(2025, 12, 1),
            date(2026, 1, 1),
            dec!(1000),
            Currency::EUR,
        );
        inv.send_status = SendStatus::Sent;
        inv
    }

    fn at(d: NaiveDate) -> chrono::DateTime<Utc> {
        Utc.from_utc_datetime(&d.and_hms_opt(8, 0, 0).unwrap())
    }

    #[test]
    fn test_synthesizes_first_step_once_threshold_passed() {
        let inv = overdue_invoice();
        let next = next_pending_reminder(&inv, &policy(), &[], date(2026, 1, 20), &Timezone::default())
            .expect("reminder_1 should be due");

        assert_eq!(next.reminder_status, ReminderStatus::Reminder1);
        assert_eq!(next.reminder_type, ReminderChannel::Email);
        assert_eq!(next.due_on, date(2026, 1, 16));
        assert_eq!(next.content_ref.as_deref(), Some("first-notice"));
        assert_eq!(next.origin, ReminderOrigin::Synthesized);
    }

    #[test]
    fn test_nothing_before_threshold() {
        let inv = overdue_invoice();
        let tz = Timezone::default();

        assert!(next_pending_reminder(&inv, &policy(), &[], date(2026, 1, 15), &tz).is_none());
        assert!(next_pending_reminder(&inv, &policy(), &[], date(2026, 1, 16), &tz).is_some());
    }

    #[test]
    fn test_existing_pending_record_wins() {
        let inv = overdue_invoice();
        let later = ReminderRecord::pending(inv.id, ReminderStatus::Reminder2, ReminderChannel::Email, at(date(2026, 2, 2)));
        let earlier = ReminderRecord::pending(inv.id, ReminderStatus::Reminder1, ReminderChannel::Email, at(date(2026, 1, 16)));
        let history = vec![later, earlier.clone()];

        let next = next_pending_reminder(&inv, &policy(), &history, date(2026, 3, 1), &Timezone::default()).unwrap();
        assert_eq!(next.origin, ReminderOrigin::Recorded(earlier.id));
        assert_eq!(next.reminder_status, ReminderStatus::Reminder1);
        assert_eq!(next.content_ref.as_deref(), Some("first-notice"));
    }

    #[test]
    fn test_other_invoices_history_is_ignored() {
        let inv = overdue_invoice();
        let foreign = ReminderRecord::pending(InvoiceId::new(), ReminderStatus::Reminder3, ReminderChannel::Phone, at(date(2026, 1, 2)));

        let next = next_pending_reminder(&inv, &policy(), &[foreign], date(2026, 1, 20), &Timezone::default()).unwrap();
        assert_eq!(next.reminder_status, ReminderStatus::Reminder1);
        assert_eq!(next.origin, ReminderOrigin::Synthesized);
    }

    #[test]
    fn test_failed_record_does_not_block_next_step() {
        let mut inv = overdue_invoice();
        inv.reminder_status = ReminderStatus::Reminder1;
        let failed = ReminderRecord::pending(inv.id, ReminderStatus::Reminder1, ReminderChannel::Email, at(date(2026, 1, 16)))
            .fail(at(date(2026, 1, 16)));

        let tz = Timezone::default();
        assert!(next_pending_reminder(&inv, &policy(), &[failed.clone()], date(2026, 1, 25), &tz).is_none());

        let next = next_pending_reminder(&inv, &policy(), &[failed], date(2026, 1, 31), &tz).unwrap();
        assert_eq!(next.reminder_status, ReminderStatus::Reminder2);
    }

    #[test]
    fn test_settled_record_ahead_of_status_is_not_regenerated() {
        let inv = overdue_invoice();
        let done = ReminderRecord::pending(inv.id, ReminderStatus::Reminder1, ReminderChannel::Email, at(date(2026, 1, 16)))
            .complete(at(date(2026, 1, 16)));

        let next = next_pending_reminder(&inv, &policy(), &[done], date(2026, 1, 20), &Timezone::default());
        assert!(next.is_none());
    }

    #[test]
    fn test_ineligible_invoices_get_nothing() {
        let tz = Timezone::default();
        let as_of = date(2026, 6, 1);

        let mut unsent = overdue_invoice();
        unsent.send_status = SendStatus::Pending;
        assert!(next_pending_reminder(&unsent, &policy(), &[], as_of, &tz).is_none());

        let mut clearing = overdue_invoice();
        clearing.payment_status = PaymentStatus::PendingPayment;
        assert!(next_pending_reminder(&clearing, &policy(), &[], as_of, &tz).is_none());

        let mut manual = overdue_invoice();
        manual.reminder_status = ReminderStatus::ManualFollowup;
        assert!(next_pending_reminder(&manual, &policy(), &[], as_of, &tz).is_none());
    }

    #[test]
    fn test_malformed_policy_yields_nothing() {
        let json = r#"{"steps":[{"delay_days":30,"channel":"email"},{"delay_days":10,"channel":"email"}]}"#;
        let broken: ReminderStepPolicy = serde_json::from_str(json).unwrap();

        let inv = overdue_invoice();
        assert!(next_pending_reminder(&inv, &broken, &[], date(2026, 6, 1), &Timezone::default()).is_none());
        assert_eq!(simulate_schedule(&inv, &broken, date(2026, 6, 1), &Timezone::default()).count(), 0);
    }

    #[test]
    fn test_simulation_stops_at_target() {
        let inv = overdue_invoice();
        let policy = policy();
        let schedule = simulate_schedule(&inv, &policy, date(2026, 2, 10), &Timezone::default());

        let statuses: Vec<_> = schedule.clone().map(|r| r.reminder_status).collect();
        assert_eq!(statuses, vec![ReminderStatus::Reminder1, ReminderStatus::Reminder2]);
        // Restartable from the clone
        assert_eq!(schedule.count(), 2);
    }

    #[test]
    fn test_simulation_starts_after_current_step() {
        let mut inv = overdue_invoice();
        inv.reminder_status = ReminderStatus::Reminder2;

        let projected: Vec<_> = simulate_schedule(&inv, &policy(), date(2026, 12, 31), &Timezone::default()).collect();
        assert_eq!(projected.len(), 1);
        assert_eq!(projected[0].reminder_status, ReminderStatus::Reminder3);
        assert_eq!(projected[0].reminder_type, ReminderChannel::Phone);
        assert_eq!(projected[0].origin, ReminderOrigin::Simulated);
    }

    #[test]
    fn test_escalation_waits_for_litigation_delay() {
        let mut inv = overdue_invoice();
        inv.reminder_status = ReminderStatus::Reminder3;
        let policy = policy();

        assert_eq!(
            escalation_decision(&inv, &policy, &[], date(2026, 2, 20)),
            Escalation::Waiting { escalates_on: date(2026, 2, 25) }
        );
        assert_eq!(escalation_decision(&inv, &policy, &[], date(2026, 2, 25)), Escalation::Due);
    }

    #[test]
    fn test_escalation_waits_for_pending_last_step() {
        let mut inv = overdue_invoice();
        inv.reminder_status = ReminderStatus::Reminder3;
        let pending = ReminderRecord::pending(inv.id, ReminderStatus::Reminder3, ReminderChannel::Phone, at(date(2026, 2, 15)));

        assert_eq!(
            escalation_decision(&inv, &policy(), &[pending], date(2026, 4, 1)),
            Escalation::AwaitingSettlement
        );
    }

    #[test]
    fn test_escalation_with_steps_remaining() {
        let mut inv = overdue_invoice();
        inv.reminder_status = ReminderStatus::Reminder1;
        assert_eq!(
            escalation_decision(&inv, &policy(), &[], date(2026, 4, 1)),
            Escalation::StepsRemaining
        );
    }

    #[test]
    fn test_manual_only_policy_escalates_after_litigation_delay() {
        let inv = overdue_invoice();
        let manual = ReminderStepPolicy::manual_only(Some(20));
        let tz = Timezone::default();

        assert!(next_pending_reminder(&inv, &manual, &[], date(2026, 6, 1), &tz).is_none());
        assert_eq!(
            escalation_decision(&inv, &manual, &[], date(2026, 1, 5)),
            Escalation::Waiting { escalates_on: date(2026, 1, 21) }
        );
        assert_eq!(escalation_decision(&inv, &manual, &[], date(2026, 1, 21)), Escalation::Due);
    }

    #[test]
    fn test_plan_actions_routes_by_channel() {
        let mut inv = overdue_invoice();
        inv.reminder_status = ReminderStatus::Reminder2;
        let tz = Timezone::default();

        let actions = plan_actions(&inv, &policy(), &[], date(2026, 2, 15), &tz);
        assert!(matches!(
            actions.as_slice(),
            [DunningAction::CreatePhoneTask { reminder }] if reminder.reminder_status == ReminderStatus::Reminder3
        ));
    }

    #[test]
    fn test_plan_actions_future_pending_blocks_everything() {
        let mut inv = overdue_invoice();
        inv.reminder_status = ReminderStatus::Reminder3;
        let scheduled = ReminderRecord::pending(inv.id, ReminderStatus::Reminder3, ReminderChannel::Phone, at(date(2026, 5, 1)));

        assert!(plan_actions(&inv, &policy(), &[scheduled], date(2026, 4, 1), &Timezone::default()).is_empty());
    }

    #[test]
    fn test_plan_actions_ignores_stale_pending_record_on_settled_invoice() {
        let tz = Timezone::default();

        for payment in [PaymentStatus::Paid, PaymentStatus::PendingPayment] {
            let mut inv = overdue_invoice();
            inv.reminder_status = ReminderStatus::Reminder1;
            inv.payment_status = payment;
            let stale = ReminderRecord::pending(inv.id, ReminderStatus::Reminder2, ReminderChannel::Email, at(date(2026, 1, 31)));

            assert!(
                plan_actions(&inv, &policy(), &[stale], date(2026, 2, 5), &tz).is_empty(),
                "{payment:?} invoice must not be dunned"
            );
        }
    }

    #[test]
    fn test_plan_actions_ignores_stale_pending_record_in_manual_followup() {
        let mut inv = overdue_invoice();
        inv.reminder_status = ReminderStatus::ManualFollowup;
        let stale = ReminderRecord::pending(inv.id, ReminderStatus::Reminder3, ReminderChannel::Phone, at(date(2026, 2, 15)));

        assert!(plan_actions(&inv, &policy(), &[stale], date(2026, 4, 1), &Timezone::default()).is_empty());
    }

    #[test]
    fn test_plan_batch_escalates_exhausted_invoice() {
        let mut exhausted = overdue_invoice();
        exhausted.reminder_status = ReminderStatus::Reminder3;
        let fresh = overdue_invoice();
        let empty: Vec<ReminderRecord> = Vec::new();

        let actions = plan_batch(
            vec![(&exhausted, empty.as_slice()), (&fresh, empty.as_slice())],
            &policy(),
            date(2026, 3, 1),
            &Timezone::default(),
        );

        assert_eq!(actions.len(), 2);
        assert!(matches!(actions[0], DunningAction::EscalateToManualFollowup { invoice_id, .. } if invoice_id == exhausted.id));
        assert_eq!(actions[1].invoice_id(), fresh.id);
    }
}
