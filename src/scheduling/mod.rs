pub mod availability;
pub mod conflict;
pub mod interval;
pub mod locks;

pub use availability::{Resource, available_resources};
pub use conflict::{Booked, Candidate, Conflict, ResourceClaim, ResourceKind, find_conflict};
pub use interval::{DayKey, Interval, IntervalError, TimeSlot};
pub use locks::{ClaimGuard, ResourceLocks};
