//! Reminder step policy
//!
//! An organization configures between zero and [`MAX_REMINDER_STEPS`]
//! automated reminder steps, each fired a number of days after the due date.
//! Past the last configured step sits the fixed manual follow-up state, which
//! is never scheduled automatically.

use serde::{Deserialize, Serialize};

use crate::error::DunningError;
use crate::invoice::ReminderStatus;

/// Number of numbered reminder statuses (reminder_1..reminder_4)
pub const MAX_REMINDER_STEPS: usize = ReminderStatus::NUMBERED.len();

/// Index reported for `manual_followup`: past every numbered step
pub const MANUAL_FOLLOWUP_INDEX: usize = MAX_REMINDER_STEPS + 1;

/// How a reminder reaches the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderChannel {
    Email,
    /// A call task for a person on the team
    Phone,
}

/// One configured reminder step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderStep {
    /// Days after the due date
    pub delay_days: u32,
    pub channel: ReminderChannel,
    /// Email template key or call script key, resolved by the sending collaborator
    #[serde(default)]
    pub content_ref: Option<String>,
}

impl ReminderStep {
    pub fn email(delay_days: u32) -> Self {
        Self {
            delay_days,
            channel: ReminderChannel::Email,
            content_ref: None,
        }
    }

    pub fn phone(delay_days: u32) -> Self {
        Self {
            delay_days,
            channel: ReminderChannel::Phone,
            content_ref: None,
        }
    }

    pub fn with_content(mut self, content_ref: impl Into<String>) -> Self {
        self.content_ref = Some(content_ref.into());
        self
    }
}

/// What sits at a given step index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepSlot<'a> {
    /// A configured, schedulable step
    Automated {
        status: ReminderStatus,
        step: &'a ReminderStep,
    },
    /// Beyond the last configured step
    ManualFollowup,
}

/// The ordered reminder steps of one organization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderStepPolicy {
    steps: Vec<ReminderStep>,
    /// Extra days after the last step before escalation to manual follow-up
    #[serde(default)]
    litigation_delay_days: Option<u32>,
}

impl ReminderStepPolicy {
    /// Builds a validated policy
    ///
    /// Delays must be strictly increasing and at most [`MAX_REMINDER_STEPS`]
    /// steps may be configured.
    pub fn new(
        steps: Vec<ReminderStep>,
        litigation_delay_days: Option<u32>,
    ) -> Result<Self, DunningError> {
        validate_steps(&steps)?;
        Ok(Self {
            steps,
            litigation_delay_days,
        })
    }

    /// Email at 15 and 30 days, phone call at 45, escalation 15 days later
    pub fn standard() -> Self {
        Self {
            steps: vec![
                ReminderStep::email(15),
                ReminderStep::email(30),
                ReminderStep::phone(45),
            ],
            litigation_delay_days: Some(15),
        }
    }

    /// A policy with no automated steps: dunning is entirely manual
    pub fn manual_only(litigation_delay_days: Option<u32>) -> Self {
        Self {
            steps: Vec::new(),
            litigation_delay_days,
        }
    }

    pub fn steps(&self) -> &[ReminderStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn litigation_delay_days(&self) -> Option<u32> {
        self.litigation_delay_days
    }

    pub fn last_step(&self) -> Option<&ReminderStep> {
        self.steps.last()
    }

    /// Re-checks the invariants `new` enforces
    ///
    /// A policy that arrived through deserialization skipped `new`; the
    /// scheduler treats a malformed one as having no automated steps.
    pub fn is_well_formed(&self) -> bool {
        validate_steps(&self.steps).is_ok()
    }

    /// Looks up the slot at a 1-based step index
    ///
    /// Index 0 means "no step reached yet" and is not a slot. Indexes past
    /// the configured steps are manual follow-up.
    pub fn step_for_index(&self, index: usize) -> Option<StepSlot<'_>> {
        if index == 0 {
            return None;
        }

        match (self.steps.get(index - 1), ReminderStatus::from_step_number(index)) {
            (Some(step), Some(status)) => Some(StepSlot::Automated { status, step }),
            _ => Some(StepSlot::ManualFollowup),
        }
    }

    /// Maps a reminder status to its step index
    pub fn index_for_reminder_status(&self, status: ReminderStatus) -> usize {
        match status {
            ReminderStatus::None => 0,
            ReminderStatus::ManualFollowup => MANUAL_FOLLOWUP_INDEX,
            numbered => numbered.step_number().unwrap_or(0),
        }
    }
}

fn validate_steps(steps: &[ReminderStep]) -> Result<(), DunningError> {
    if steps.len() > MAX_REMINDER_STEPS {
        return Err(DunningError::TooManySteps {
            count: steps.len(),
            max: MAX_REMINDER_STEPS,
        });
    }

    for (i, pair) in steps.windows(2).enumerate() {
        if pair[1].delay_days <= pair[0].delay_days {
            return Err(DunningError::NonIncreasingDelay {
                index: i + 2,
                delay_days: pair[1].delay_days,
                previous_days: pair[0].delay_days,
            });
        }
    }

    Ok(())
}
