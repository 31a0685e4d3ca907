//! Periodic reconciliation between stored payables and registered alarms.

use std::sync::Arc;

use tracing::{debug, warn};

use duewise_domain::PayableId;

use crate::{
    alarm::AlarmGateway,
    notify::Notifier,
    planner::{local_epoch_millis, plan_next_reminder},
    store::{PayablesStore, PreferenceStore},
    time::Clock,
    CoreError,
};

/// Counters describing what one reconciliation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub scheduled: usize,
    pub cancelled: usize,
    pub failed: usize,
    pub auto_finished: usize,
}

/// Drives the reminder reconciliation sweep over the full payable set.
///
/// The sweep is stateless: every run re-derives each payable's alarm from
/// stored state and re-registers it, relying on the gateway's replace
/// semantics. Running it twice with unchanged data issues the same calls
/// and leaves the same alarms. Hosts run at most one sweep at a time.
pub struct Reconciler {
    payables: Arc<dyn PayablesStore>,
    preferences: Arc<dyn PreferenceStore>,
    alarms: Arc<dyn AlarmGateway>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl Reconciler {
    pub fn new(
        payables: Arc<dyn PayablesStore>,
        preferences: Arc<dyn PreferenceStore>,
        alarms: Arc<dyn AlarmGateway>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            payables,
            preferences,
            alarms,
            notifier,
            clock,
        }
    }

    /// Runs one full reconciliation pass.
    ///
    /// Returns `Err` only when the stores cannot be read at all, which
    /// aborts the run for the host to retry. Failures on individual
    /// payables are logged, counted in `failed`, and skipped so one bad
    /// row never blocks the rest.
    pub fn run(&self) -> Result<SweepReport, CoreError> {
        let snapshot = self.payables.list_all()?;
        let preference = self.preferences.reminder_preference()?;
        let enrolled = self.preferences.enrolled_ids()?;
        let today = self.clock.today();

        let mut report = SweepReport::default();
        for mut payable in snapshot {
            if payable.auto_finish_if_stale(today) {
                if let Err(err) = self.payables.update(&payable) {
                    warn!(
                        "failed to persist auto-finish for payable `{}`: {}",
                        payable.id, err
                    );
                    report.failed += 1;
                    continue;
                }
                debug!("payable `{}` auto-finished, end date passed", payable.id);
                report.auto_finished += 1;
            }
            if payable.is_finished {
                self.alarms.cancel(&payable.id);
                report.cancelled += 1;
                continue;
            }
            if !enrolled.contains(&payable.id) {
                continue;
            }
            if let Some(plan) = plan_next_reminder(&payable, &preference, &enrolled, today) {
                if self
                    .alarms
                    .schedule(&plan.payable_id, local_epoch_millis(plan.fire_at))
                {
                    report.scheduled += 1;
                } else {
                    warn!("alarm registration refused for payable `{}`", payable.id);
                    report.failed += 1;
                }
            }
        }
        Ok(report)
    }

    /// Handles one alarm firing.
    ///
    /// Re-reads the payable and notifies only when it still exists, is not
    /// finished, and is still enrolled; alarms left behind by stale state
    /// fall out silently. Returns whether a notification went out. The next
    /// reminder is not registered here: the due date has not advanced at
    /// fire time, so re-registration stays with the periodic sweep.
    pub fn on_alarm_fired(&self, id: &PayableId) -> Result<bool, CoreError> {
        let payable = match self.payables.get_by_id(id)? {
            Some(payable) => payable,
            None => {
                debug!("alarm fired for unknown payable `{}`", id);
                return Ok(false);
            }
        };
        if payable.is_finished {
            return Ok(false);
        }
        let enrolled = self.preferences.enrolled_ids()?;
        if !enrolled.contains(&payable.id) {
            return Ok(false);
        }
        self.notifier.notify_due(&payable);
        Ok(true)
    }
}
