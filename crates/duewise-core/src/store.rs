use std::collections::HashSet;

use duewise_domain::{Payable, PayableId, ReminderPreference};

use crate::CoreError;

/// Abstraction over the record store that owns payable rows.
///
/// Implementations are free to serve reads from memory; `update` must make
/// the new state durable before returning, since reminder reconciliation
/// re-derives alarms from whatever the store reports.
pub trait PayablesStore: Send + Sync {
    /// Returns a snapshot of every stored payable.
    fn list_all(&self) -> Result<Vec<Payable>, CoreError>;

    /// Looks up one payable. `Ok(None)` means the id no longer exists,
    /// which callers tolerate: rows can vanish between a read and a write.
    fn get_by_id(&self, id: &PayableId) -> Result<Option<Payable>, CoreError>;

    /// Persists the new state of an existing payable.
    fn update(&self, payable: &Payable) -> Result<(), CoreError>;
}

/// Read-only access to the reminder preference and the enrolled id set.
/// Both are owned by the host's settings surface; the core never writes them.
pub trait PreferenceStore: Send + Sync {
    fn reminder_preference(&self) -> Result<ReminderPreference, CoreError>;

    /// Ids the user opted into reminders for. A payable outside this set is
    /// never scheduled, whatever its status.
    fn enrolled_ids(&self) -> Result<HashSet<PayableId>, CoreError>;
}
