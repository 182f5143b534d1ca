//! Pure admission rules. The database enforces the same rule atomically; these
//! helpers describe it for responses and callers that only need a preview.

use alumni_database::Event;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Seat,
    Waitlist,
}

/// Decide where the next registrant lands given the current counters.
pub fn decide(capacity: Option<i64>, current_registrations: i64) -> Admission {
    match capacity {
        None => Admission::Seat,
        Some(capacity) if current_registrations < capacity => Admission::Seat,
        Some(_) => Admission::Waitlist,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Availability {
    /// `None` when the event has no capacity limit.
    pub spots_remaining: Option<i64>,
    pub is_full: bool,
}

impl Availability {
    pub fn of(event: &Event) -> Self {
        let spots_remaining = event
            .capacity
            .map(|capacity| (capacity - event.current_registrations).max(0));
        Self {
            spots_remaining,
            is_full: decide(event.capacity, event.current_registrations) == Admission::Waitlist,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_events_always_seat() {
        assert_eq!(decide(None, 0), Admission::Seat);
        assert_eq!(decide(None, 10_000), Admission::Seat);
    }

    #[test]
    fn full_events_waitlist() {
        assert_eq!(decide(Some(2), 0), Admission::Seat);
        assert_eq!(decide(Some(2), 1), Admission::Seat);
        assert_eq!(decide(Some(2), 2), Admission::Waitlist);
    }
}
