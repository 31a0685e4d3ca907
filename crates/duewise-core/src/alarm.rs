use duewise_domain::PayableId;

/// Abstraction over the platform's wake-alarm scheduler.
///
/// The platform keeps at most one alarm per payable id; scheduling again for
/// the same id replaces the previous registration. Callers lean on that and
/// re-register from scratch instead of diffing against what is already set.
pub trait AlarmGateway: Send + Sync {
    /// Registers (or replaces) the alarm for `id` at an epoch-millis
    /// instant. Returns whether the platform accepted the registration.
    fn schedule(&self, id: &PayableId, fire_at_millis: i64) -> bool;

    /// Removes any registered alarm for `id`. Unknown ids are a no-op.
    fn cancel(&self, id: &PayableId);
}
