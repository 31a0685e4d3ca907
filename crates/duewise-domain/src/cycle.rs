//! Billing cadence arithmetic: cycle advancement and relative due labels.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{de::Deserializer, Deserialize, Serialize};

/// Enumerates supported billing cadences.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl BillingCycle {
    fn from_value(value: Option<String>) -> Self {
        value
            .map(|v| BillingCycle::from_str(v.trim()))
            .unwrap_or_default()
    }

    /// Parses a stored cadence label. Unknown values fall back to `Monthly`.
    pub fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "weekly" => BillingCycle::Weekly,
            "quarterly" => BillingCycle::Quarterly,
            "yearly" => BillingCycle::Yearly,
            _ => BillingCycle::Monthly,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BillingCycle::Weekly => "Weekly",
            BillingCycle::Monthly => "Monthly",
            BillingCycle::Quarterly => "Quarterly",
            BillingCycle::Yearly => "Yearly",
        }
    }

    /// Returns `anchor` advanced by `steps` whole cycles. Month-based cycles
    /// keep the anchor's day-of-month, clamped to the target month's length.
    pub fn advance(self, anchor: NaiveDate, steps: i32) -> NaiveDate {
        match self {
            BillingCycle::Weekly => anchor + Duration::weeks(steps as i64),
            BillingCycle::Monthly => shift_month(anchor, steps),
            BillingCycle::Quarterly => shift_month(anchor, steps * 3),
            BillingCycle::Yearly => shift_year(anchor, steps),
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for BillingCycle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(BillingCycle::from_value(value))
    }
}

/// Returns the next date on the cadence that is not before `reference`.
///
/// Candidates are always a whole number of cycles after `anchor`, so a
/// payable anchored on Jan 31 keeps targeting the 31st and clamps per target
/// month instead of drifting after February. While the anchor is still on or
/// after `reference` it is returned unchanged; a payable due exactly today
/// is due today, not next cycle.
pub fn next_due_date(anchor: NaiveDate, cycle: BillingCycle, reference: NaiveDate) -> NaiveDate {
    if anchor >= reference {
        return anchor;
    }
    let mut steps = estimate_steps(anchor, cycle, reference);
    let mut candidate = cycle.advance(anchor, steps);
    while candidate < reference {
        steps += 1;
        candidate = cycle.advance(anchor, steps);
    }
    candidate
}

// Floor estimate of the step count. Lands at most one cycle short, so the
// caller's bump loop settles after a single pass even across clamped months.
fn estimate_steps(anchor: NaiveDate, cycle: BillingCycle, reference: NaiveDate) -> i32 {
    match cycle {
        BillingCycle::Weekly => (reference - anchor).num_days().div_euclid(7) as i32,
        BillingCycle::Monthly => month_index(reference) - month_index(anchor),
        BillingCycle::Quarterly => (month_index(reference) - month_index(anchor)).div_euclid(3),
        BillingCycle::Yearly => reference.year() - anchor.year(),
    }
}

fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month() as i32 - 1
}

fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    let mut day = date.day();
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    day = day.min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).unwrap()
}

fn shift_year(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    let mut day = date.day();
    let month = date.month();
    day = day.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    let last_current = first_next - Duration::days(1);
    last_current.day()
}

/// Describes how far away a due date is, in display buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueLabel {
    Today,
    Tomorrow,
    InDays(i64),
    InWeeks(i64),
    InMonths(i64),
    InYears(i64),
}

/// Buckets the distance from `reference` to `due` for display.
///
/// Buckets are nominal divisions (7-day weeks, 30-day months, 365-day
/// years), matched top to bottom; day counts that fall between buckets,
/// such as 28 or 360 days, stay plain day counts.
pub fn classify_relative(due: NaiveDate, reference: NaiveDate) -> DueLabel {
    let days = (due - reference).num_days();
    let weeks = days / 7;
    let months = days / 30;
    let years = days / 365;

    if days <= 0 {
        DueLabel::Today
    } else if days == 1 {
        DueLabel::Tomorrow
    } else if days <= 6 {
        DueLabel::InDays(days)
    } else if (1..=3).contains(&weeks) {
        DueLabel::InWeeks(weeks)
    } else if (1..=11).contains(&months) {
        DueLabel::InMonths(months)
    } else if years >= 1 {
        DueLabel::InYears(years)
    } else {
        DueLabel::InDays(days)
    }
}

impl fmt::Display for DueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueLabel::Today => f.write_str("Today"),
            DueLabel::Tomorrow => f.write_str("Tomorrow"),
            DueLabel::InDays(n) => write!(f, "In {} day{}", n, if *n == 1 { "" } else { "s" }),
            DueLabel::InWeeks(n) => write!(f, "In {} week{}", n, if *n == 1 { "" } else { "s" }),
            DueLabel::InMonths(n) => {
                write!(f, "In {} month{}", n, if *n == 1 { "" } else { "s" })
            }
            DueLabel::InYears(n) => write!(f, "In {} year{}", n, if *n == 1 { "" } else { "s" }),
        }
    }
}
