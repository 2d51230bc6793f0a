//! Detect a candidate interval colliding with bookings already held by a resource.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scheduling::interval::{Interval, format_hhmm};

/// The kinds of resource a booking can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Classroom,
    Faculty,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Classroom => f.write_str("Classroom"),
            ResourceKind::Faculty => f.write_str("Faculty"),
        }
    }
}

/// One resource a booking holds for its interval.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceClaim {
    pub kind: ResourceKind,
    pub id: String,
}

impl ResourceClaim {
    pub fn classroom(id: impl Into<String>) -> Self {
        Self { kind: ResourceKind::Classroom, id: id.into() }
    }

    pub fn faculty(id: impl Into<String>) -> Self {
        Self { kind: ResourceKind::Faculty, id: id.into() }
    }
}

/// Anything that occupies resources over an interval.
pub trait Booked {
    fn booking_id(&self) -> &str;

    fn interval(&self) -> Interval;

    /// The id of the resource of `kind` this booking holds, if it holds one.
    fn resource_id(&self, kind: ResourceKind) -> Option<&str>;
}

/// Returns the first booking in `existing` whose interval overlaps `candidate`.
///
/// `existing` is expected to be pre-filtered to one resource. Scan order is the
/// slice order; the first hit wins. `exclude` skips the booking being updated.
pub fn find_conflict<'a, B: Booked>(
    candidate: &Interval,
    existing: &'a [B],
    exclude: Option<&str>,
) -> Option<&'a B> {
    existing
        .iter()
        .filter(|booking| exclude != Some(booking.booking_id()))
        .find(|booking| booking.interval().overlaps(candidate))
}

/// Which booking blocks a candidate, and on which resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub booking_id: String,
    pub resource: ResourceKind,
    pub resource_id: String,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

impl Conflict {
    pub fn new<B: Booked>(claim: &ResourceClaim, blocking: &B) -> Self {
        let interval = blocking.interval();
        Self {
            booking_id: blocking.booking_id().to_string(),
            resource: claim.kind,
            resource_id: claim.id.clone(),
            day: interval.day().to_string(),
            start_time: format_hhmm(interval.start()),
            end_time: format_hhmm(interval.end()),
        }
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.resource {
            ResourceKind::Classroom => "booked",
            ResourceKind::Faculty => "scheduled",
        };
        write!(
            f,
            "{} is already {} from {} to {} on {}",
            self.resource, verb, self.start_time, self.end_time, self.day
        )
    }
}

/// A validated booking request: the interval it wants and the resources it holds.
pub trait Candidate {
    fn interval(&self) -> &Interval;

    fn claims(&self) -> Vec<ResourceClaim>;
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::scheduling::interval::DayKey;

    struct Slot {
        id: &'static str,
        room: &'static str,
        interval: Interval,
    }

    impl Booked for Slot {
        fn booking_id(&self) -> &str {
            self.id
        }

        fn interval(&self) -> Interval {
            self.interval
        }

        fn resource_id(&self, kind: ResourceKind) -> Option<&str> {
            match kind {
                ResourceKind::Classroom => Some(self.room),
                ResourceKind::Faculty => None,
            }
        }
    }

    fn may_first(start: &str, end: &str) -> Interval {
        let day = DayKey::Date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        Interval::parse(day, start, end).unwrap()
    }

    fn slot(id: &'static str, start: &str, end: &str) -> Slot {
        Slot { id, room: "c101", interval: may_first(start, end) }
    }

    #[test]
    fn touching_is_not_a_conflict() {
        let existing = vec![slot("a", "09:00", "10:00")];
        assert!(find_conflict(&may_first("10:00", "11:00"), &existing, None).is_none());
        assert!(find_conflict(&may_first("08:00", "09:00"), &existing, None).is_none());
    }

    #[test]
    fn partial_overlap_and_containment_conflict() {
        let existing = vec![slot("a", "09:00", "10:00")];
        for (start, end) in [("09:30", "10:30"), ("08:30", "09:01"), ("09:15", "09:45"), ("08:00", "11:00")] {
            let hit = find_conflict(&may_first(start, end), &existing, None);
            assert_eq!(hit.map(|b| b.id), Some("a"), "{start}-{end}");
        }
    }

    #[test]
    fn first_overlapping_booking_wins() {
        let existing = vec![
            slot("a", "08:00", "09:00"),
            slot("b", "09:30", "10:30"),
            slot("c", "09:00", "12:00"),
        ];
        let hit = find_conflict(&may_first("10:00", "11:00"), &existing, None);
        assert_eq!(hit.map(|b| b.id), Some("b"));
    }

    #[test]
    fn excluded_booking_is_skipped() {
        let existing = vec![slot("a", "09:00", "10:00"), slot("b", "10:00", "11:00")];
        let candidate = may_first("09:30", "10:00");
        assert!(find_conflict(&candidate, &existing, Some("a")).is_none());
        assert_eq!(find_conflict(&candidate, &existing, Some("b")).map(|b| b.id), Some("a"));
    }

    #[test]
    fn conflict_message_names_the_blocking_range() {
        let blocking = slot("a", "09:00", "10:00");
        let conflict = Conflict::new(&ResourceClaim::classroom("c101"), &blocking);
        assert_eq!(
            conflict.to_string(),
            "Classroom is already booked from 09:00 to 10:00 on 2024-05-01"
        );

        let conflict = Conflict::new(&ResourceClaim::faculty("f1"), &blocking);
        assert_eq!(
            conflict.to_string(),
            "Faculty is already scheduled from 09:00 to 10:00 on 2024-05-01"
        );
    }
}
