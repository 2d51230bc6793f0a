//! Invert the conflict check over a whole resource set.

use std::collections::HashSet;

use crate::scheduling::conflict::{Booked, ResourceKind};
use crate::scheduling::interval::Interval;

/// Something that can be booked and is addressed by id.
pub trait Resource {
    fn resource_id(&self) -> &str;
}

/// Returns the resources of `kind` with no booking overlapping `candidate`.
///
/// Bookings on a different day key never block. Input order of `resources` is kept.
pub fn available_resources<R, B>(
    candidate: &Interval,
    kind: ResourceKind,
    resources: Vec<R>,
    bookings: &[B],
) -> Vec<R>
where
    R: Resource,
    B: Booked,
{
    let blocked: HashSet<&str> = bookings
        .iter()
        .filter(|booking| booking.interval().overlaps(candidate))
        .filter_map(|booking| booking.resource_id(kind))
        .collect();

    resources
        .into_iter()
        .filter(|resource| !blocked.contains(resource.resource_id()))
        .collect()
}
