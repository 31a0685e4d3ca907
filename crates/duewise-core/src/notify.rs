use duewise_domain::Payable;

/// Delivery port for due notifications. Implementations render and post the
/// notification however the host platform does; the core only decides
/// whether one should go out.
pub trait Notifier: Send + Sync {
    fn notify_due(&self, payable: &Payable);
}
