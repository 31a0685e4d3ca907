//! duewise-core
//!
//! Reminder planning, lifecycle orchestration, and the reconciliation sweep
//! for recurring payables. Depends on duewise-domain. No UI, no storage
//! engine; persistence, alarms, and notifications are injected ports.

pub mod alarm;
pub mod error;
pub mod lifecycle;
pub mod notify;
pub mod planner;
pub mod store;
pub mod sweep;
pub mod time;

pub use alarm::AlarmGateway;
pub use error::CoreError;
pub use lifecycle::LifecycleService;
pub use notify::Notifier;
pub use planner::{local_epoch_millis, plan_next_reminder, ReminderPlan};
pub use store::{PayablesStore, PreferenceStore};
pub use sweep::{Reconciler, SweepReport};
pub use time::{Clock, SystemClock};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("duewise_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
        tracing::info!("duewise core tracing initialized.");
    });
}

#[cfg(test)]
mod tests;
