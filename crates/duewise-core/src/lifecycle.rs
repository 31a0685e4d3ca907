//! By-id lifecycle operations that keep stored state and alarms in step.

use tracing::warn;

use duewise_domain::{Payable, PayableId};

use crate::{
    alarm::AlarmGateway,
    planner::{local_epoch_millis, plan_next_reminder},
    store::{PayablesStore, PreferenceStore},
    time::Clock,
    CoreError,
};

/// Applies user-triggered lifecycle transitions.
///
/// Every operation persists the flag change first and then re-derives the
/// payable's alarm from the freshly written state, keeping the stored row
/// the single source of truth for what the alarm should be.
pub struct LifecycleService;

impl LifecycleService {
    pub fn pause(
        store: &dyn PayablesStore,
        preferences: &dyn PreferenceStore,
        alarms: &dyn AlarmGateway,
        clock: &dyn Clock,
        id: &PayableId,
    ) -> Result<Payable, CoreError> {
        Self::apply(store, preferences, alarms, clock, id, Payable::pause)
    }

    pub fn unpause(
        store: &dyn PayablesStore,
        preferences: &dyn PreferenceStore,
        alarms: &dyn AlarmGateway,
        clock: &dyn Clock,
        id: &PayableId,
    ) -> Result<Payable, CoreError> {
        Self::apply(store, preferences, alarms, clock, id, Payable::unpause)
    }

    pub fn finish(
        store: &dyn PayablesStore,
        preferences: &dyn PreferenceStore,
        alarms: &dyn AlarmGateway,
        clock: &dyn Clock,
        id: &PayableId,
    ) -> Result<Payable, CoreError> {
        Self::apply(store, preferences, alarms, clock, id, Payable::finish)
    }

    pub fn unfinish(
        store: &dyn PayablesStore,
        preferences: &dyn PreferenceStore,
        alarms: &dyn AlarmGateway,
        clock: &dyn Clock,
        id: &PayableId,
    ) -> Result<Payable, CoreError> {
        Self::apply(store, preferences, alarms, clock, id, Payable::unfinish)
    }

    /// Re-derives and applies the alarm for one payable from its stored
    /// state. Hosts call this after editing enrollment, so a payable that
    /// just left the enrolled set also loses its alarm.
    pub fn sync_alarm(
        store: &dyn PayablesStore,
        preferences: &dyn PreferenceStore,
        alarms: &dyn AlarmGateway,
        clock: &dyn Clock,
        id: &PayableId,
    ) -> Result<(), CoreError> {
        let payable = store
            .get_by_id(id)?
            .ok_or_else(|| CoreError::PayableNotFound(id.clone()))?;
        Self::apply_alarm(&payable, preferences, alarms, clock)
    }

    fn apply(
        store: &dyn PayablesStore,
        preferences: &dyn PreferenceStore,
        alarms: &dyn AlarmGateway,
        clock: &dyn Clock,
        id: &PayableId,
        mutate: impl FnOnce(&mut Payable),
    ) -> Result<Payable, CoreError> {
        let mut payable = store
            .get_by_id(id)?
            .ok_or_else(|| CoreError::PayableNotFound(id.clone()))?;
        mutate(&mut payable);
        store.update(&payable)?;
        Self::apply_alarm(&payable, preferences, alarms, clock)?;
        Ok(payable)
    }

    fn apply_alarm(
        payable: &Payable,
        preferences: &dyn PreferenceStore,
        alarms: &dyn AlarmGateway,
        clock: &dyn Clock,
    ) -> Result<(), CoreError> {
        let preference = preferences.reminder_preference()?;
        let enrolled = preferences.enrolled_ids()?;
        match plan_next_reminder(payable, &preference, &enrolled, clock.today()) {
            Some(plan) => {
                if !alarms.schedule(&plan.payable_id, local_epoch_millis(plan.fire_at)) {
                    warn!("alarm registration refused for payable `{}`", payable.id);
                }
            }
            None => alarms.cancel(&payable.id),
        }
        Ok(())
    }
}
