//! User-level reminder timing preferences.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// When reminders fire relative to a due date: `lead_days` before it, at
/// `hour:minute` wall-clock. One preference applies to every enrolled
/// payable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderPreference {
    pub lead_days: u32,
    pub hour: u32,
    pub minute: u32,
}

impl ReminderPreference {
    /// Builds a preference, clamping the time of day into a valid range.
    pub fn new(lead_days: u32, hour: u32, minute: u32) -> Self {
        Self {
            lead_days,
            hour: hour.min(23),
            minute: minute.min(59),
        }
    }

    /// Time of day reminders fire. Out-of-range stored values clamp rather
    /// than fail, so snapshots written by other frontends stay readable.
    pub fn fire_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour.min(23), self.minute.min(59), 0).unwrap()
    }
}

impl Default for ReminderPreference {
    fn default() -> Self {
        Self::new(1, 9, 0)
    }
}
