use std::collections::HashSet;

use chrono::{Local, LocalResult, NaiveDate, TimeZone};

use duewise_domain::{BillingCycle, Payable, PayableId, ReminderPreference};

use crate::planner::{local_epoch_millis, plan_next_reminder};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn electricity(anchor: NaiveDate) -> Payable {
    Payable::new("Electricity", 80.0, anchor, BillingCycle::Monthly)
}

fn enrolled_for(payable: &Payable) -> HashSet<PayableId> {
    HashSet::from([payable.id.clone()])
}

#[test]
fn planner_skips_unenrolled_payables() {
    let payable = electricity(date(2024, 5, 10));
    let preference = ReminderPreference::default();
    let today = date(2024, 5, 1);

    assert!(plan_next_reminder(&payable, &preference, &HashSet::new(), today).is_none());
    assert!(plan_next_reminder(&payable, &preference, &enrolled_for(&payable), today).is_some());
}

#[test]
fn planner_skips_finished_but_not_paused() {
    let mut payable = electricity(date(2024, 5, 10));
    let preference = ReminderPreference::default();
    let enrolled = enrolled_for(&payable);
    let today = date(2024, 5, 1);

    payable.pause();
    assert!(plan_next_reminder(&payable, &preference, &enrolled, today).is_some());

    payable.finish();
    assert!(plan_next_reminder(&payable, &preference, &enrolled, today).is_none());
}

#[test]
fn planner_subtracts_the_lead_window() {
    let payable = electricity(date(2024, 5, 10));
    let preference = ReminderPreference::new(3, 9, 0);
    let today = date(2024, 5, 1);

    let plan = plan_next_reminder(&payable, &preference, &enrolled_for(&payable), today)
        .expect("plan for enrolled payable");

    assert_eq!(plan.due_date, date(2024, 5, 10));
    assert_eq!(plan.reminder_date, date(2024, 5, 7));
    assert_eq!(
        plan.fire_at,
        date(2024, 5, 7).and_hms_opt(9, 0, 0).unwrap()
    );
    assert_eq!(plan.reminder_date + chrono::Days::new(3), plan.due_date);
}

#[test]
fn planner_with_zero_lead_fires_on_the_due_date() {
    let payable = electricity(date(2024, 5, 10));
    let preference = ReminderPreference::new(0, 20, 30);
    let today = date(2024, 5, 10);

    let plan = plan_next_reminder(&payable, &preference, &enrolled_for(&payable), today)
        .expect("plan for enrolled payable");

    assert_eq!(plan.reminder_date, plan.due_date);
    assert_eq!(
        plan.fire_at,
        date(2024, 5, 10).and_hms_opt(20, 30, 0).unwrap()
    );
}

#[test]
fn planner_keeps_past_reminder_instants() {
    // Reminder date already behind today is passed through untouched; the
    // gateway decides what a late registration means.
    let payable = electricity(date(2024, 5, 10));
    let preference = ReminderPreference::new(3, 9, 0);
    let today = date(2024, 5, 9);

    let plan = plan_next_reminder(&payable, &preference, &enrolled_for(&payable), today)
        .expect("plan for enrolled payable");

    assert_eq!(plan.due_date, date(2024, 5, 10));
    assert_eq!(plan.reminder_date, date(2024, 5, 7));
    assert!(plan.reminder_date < today);
}

#[test]
fn planner_collapses_calendar_underflow_to_the_due_date() {
    let payable = electricity(date(2024, 5, 10));
    let preference = ReminderPreference::new(u32::MAX, 9, 0);
    let today = date(2024, 5, 1);

    let plan = plan_next_reminder(&payable, &preference, &enrolled_for(&payable), today)
        .expect("plan for enrolled payable");

    assert_eq!(plan.reminder_date, plan.due_date);
}

#[test]
fn planner_projects_the_due_date_forward() {
    let payable = electricity(date(2024, 1, 31));
    let preference = ReminderPreference::new(1, 9, 0);
    let today = date(2024, 3, 1);

    let plan = plan_next_reminder(&payable, &preference, &enrolled_for(&payable), today)
        .expect("plan for enrolled payable");

    assert_eq!(plan.due_date, date(2024, 3, 31));
    assert_eq!(plan.reminder_date, date(2024, 3, 30));
}

#[test]
fn local_epoch_millis_matches_unambiguous_resolution() {
    let naive = date(2024, 1, 15).and_hms_opt(9, 0, 0).unwrap();
    if let LocalResult::Single(expected) = Local.from_local_datetime(&naive) {
        assert_eq!(local_epoch_millis(naive), expected.timestamp_millis());
    }
}

#[test]
fn local_epoch_millis_is_monotonic_across_days() {
    let morning = date(2024, 1, 15).and_hms_opt(9, 0, 0).unwrap();
    let next_morning = date(2024, 1, 16).and_hms_opt(9, 0, 0).unwrap();
    assert!(local_epoch_millis(next_morning) > local_epoch_millis(morning));
}

#[test]
fn init_does_not_panic() {
    crate::init();
}
