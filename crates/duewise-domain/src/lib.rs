//! duewise-domain
//!
//! Domain models and calendar arithmetic for recurring payables.
//! Pure data and pure functions. No I/O, no clocks, no storage.

pub mod cycle;
pub mod dates;
pub mod payable;
pub mod preference;
pub mod schedule;

pub use cycle::*;
pub use payable::*;
pub use preference::*;
pub use schedule::*;
