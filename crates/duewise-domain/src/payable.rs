//! Domain model for recurring payables and their lifecycle flags.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cycle::{next_due_date, BillingCycle};
use crate::dates;

/// Opaque stable identifier for a payable. Assigned at creation, never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayableId(String);

impl PayableId {
    /// Mints a fresh random identifier.
    pub fn new() -> Self {
        PayableId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PayableId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for PayableId {
    fn from(value: &str) -> Self {
        PayableId(value.to_string())
    }
}

impl From<String> for PayableId {
    fn from(value: String) -> Self {
        PayableId(value)
    }
}

impl fmt::Display for PayableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A recurring bill tracked by the app.
///
/// `is_paused` and `is_finished` are independent flags: pausing hides a
/// payable from day-to-day views while keeping its reminders alive, and only
/// finishing switches reminders off. `anchor_date` never moves after
/// creation; every due date is derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payable {
    pub id: PayableId,
    pub name: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(with = "dates::epoch_day")]
    pub anchor_date: NaiveDate,
    #[serde(default)]
    pub cycle: BillingCycle,
    #[serde(default, with = "dates::epoch_day_opt", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_paused: bool,
    #[serde(default)]
    pub is_finished: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payable {
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        anchor_date: NaiveDate,
        cycle: BillingCycle,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: PayableId::new(),
            name: name.into(),
            amount,
            currency: None,
            notes: None,
            anchor_date,
            cycle,
            end_date: None,
            is_paused: false,
            is_finished: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// True while reminders may be planned for this payable. Only finishing
    /// suppresses reminders; a paused payable keeps them.
    pub fn is_schedulable(&self) -> bool {
        !self.is_finished
    }

    /// Next due date on this payable's cadence, on or after `reference`.
    pub fn next_due(&self, reference: NaiveDate) -> NaiveDate {
        next_due_date(self.anchor_date, self.cycle, reference)
    }

    pub fn pause(&mut self) {
        self.is_paused = true;
        self.touch();
    }

    pub fn unpause(&mut self) {
        self.is_paused = false;
        self.touch();
    }

    pub fn finish(&mut self) {
        self.is_finished = true;
        self.touch();
    }

    pub fn unfinish(&mut self) {
        self.is_finished = false;
        self.touch();
    }

    /// Finishes the payable once its end date lies strictly in the past.
    /// Returns whether a transition happened; an end date equal to `today`
    /// is still current. The only transition applied without a user action.
    pub fn auto_finish_if_stale(&mut self, today: NaiveDate) -> bool {
        if self.is_finished {
            return false;
        }
        match self.end_date {
            Some(end) if end < today => {
                self.finish();
                true
            }
            _ => false,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
