//! Derives the next reminder instant for an enrolled payable.

use std::collections::HashSet;

use chrono::{Days, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};

use duewise_domain::{Payable, PayableId, ReminderPreference};

/// A concrete reminder derived from a payable's cadence and the user's
/// reminder preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderPlan {
    pub payable_id: PayableId,
    pub due_date: NaiveDate,
    pub reminder_date: NaiveDate,
    pub fire_at: NaiveDateTime,
}

/// Computes the next reminder for `payable`, or `None` when the payable is
/// finished or not enrolled. Paused payables still plan.
///
/// This is a pure projection: a fire instant that already passed wall-clock
/// time is returned as-is and left to the gateway's own late-fire semantics.
/// A lead window that underflows the calendar collapses to the due date.
pub fn plan_next_reminder(
    payable: &Payable,
    preference: &ReminderPreference,
    enrolled: &HashSet<PayableId>,
    today: NaiveDate,
) -> Option<ReminderPlan> {
    if !payable.is_schedulable() || !enrolled.contains(&payable.id) {
        return None;
    }
    let due_date = payable.next_due(today);
    let reminder_date = due_date
        .checked_sub_days(Days::new(u64::from(preference.lead_days)))
        .unwrap_or(due_date);
    let fire_at = reminder_date.and_time(preference.fire_time());
    Some(ReminderPlan {
        payable_id: payable.id.clone(),
        due_date,
        reminder_date,
        fire_at,
    })
}

/// Resolves a naive wall-clock instant to epoch milliseconds in the system
/// timezone. Ambiguous readings (DST fall-back) take the earlier instant;
/// readings inside a spring-forward gap roll one hour ahead, with a last
/// resort of interpreting the instant as UTC.
pub fn local_epoch_millis(fire_at: NaiveDateTime) -> i64 {
    match Local.from_local_datetime(&fire_at) {
        LocalResult::Single(instant) => instant.timestamp_millis(),
        LocalResult::Ambiguous(earliest, _) => earliest.timestamp_millis(),
        LocalResult::None => {
            let shifted = fire_at + Duration::hours(1);
            match Local.from_local_datetime(&shifted) {
                LocalResult::Single(instant) => instant.timestamp_millis(),
                LocalResult::Ambiguous(earliest, _) => earliest.timestamp_millis(),
                LocalResult::None => Utc.from_utc_datetime(&fire_at).timestamp_millis(),
            }
        }
    }
}
