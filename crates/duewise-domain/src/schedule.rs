//! Read-side projection of upcoming due dates.

use chrono::NaiveDate;

use crate::cycle::{classify_relative, DueLabel};
use crate::payable::Payable;

/// One row of the upcoming-payments view.
#[derive(Debug, Clone)]
pub struct UpcomingPayable {
    pub payable: Payable,
    pub due_date: NaiveDate,
    pub label: DueLabel,
}

/// Projects unfinished payables onto their next due dates, sorted by due
/// date and then name. Paused payables stay listed so hosts can grey them
/// out instead of losing them.
pub fn upcoming_schedule(payables: &[Payable], today: NaiveDate) -> Vec<UpcomingPayable> {
    let mut rows: Vec<UpcomingPayable> = payables
        .iter()
        .filter(|payable| !payable.is_finished)
        .map(|payable| {
            let due_date = payable.next_due(today);
            UpcomingPayable {
                label: classify_relative(due_date, today),
                due_date,
                payable: payable.clone(),
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        a.due_date
            .cmp(&b.due_date)
            .then_with(|| a.payable.name.cmp(&b.payable.name))
    });
    rows
}
