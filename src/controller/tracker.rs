//! Lookup tickets
//!
//! Every reverse-geocode request gets a ticket carrying the generation of
//! its target at issue time. Only a ticket matching the latest generation may
//! be applied, so a slow early response can never overwrite a newer one.

use crate::coord::LonLat;
use crate::marker::MarkerKind;

/// Identifies one issued lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub target: MarkerKind,
    pub generation: u64,
}

/// A lookup the controller wants performed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookupRequest {
    pub ticket: Ticket,
    pub at: LonLat,
}

/// Latest issued generation per marker kind
#[derive(Debug, Default)]
pub struct RequestTracker {
    self_location: u64,
    selected_point: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, target: MarkerKind) -> &mut u64 {
        match target {
            MarkerKind::SelfLocation => &mut self.self_location,
            MarkerKind::SelectedPoint => &mut self.selected_point,
        }
    }

    /// Issue a ticket, superseding every earlier ticket for the same target
    pub fn issue(&mut self, target: MarkerKind) -> Ticket {
        let slot = self.slot(target);
        *slot += 1;
        Ticket {
            target,
            generation: *slot,
        }
    }

    /// Latest generation issued for a target (0 if none)
    pub fn latest(&self, target: MarkerKind) -> u64 {
        match target {
            MarkerKind::SelfLocation => self.self_location,
            MarkerKind::SelectedPoint => self.selected_point,
        }
    }

    /// Whether no newer ticket has been issued for this ticket's target
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest(ticket.target) == ticket.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes() {
        let mut tracker = RequestTracker::new();
        let a = tracker.issue(MarkerKind::SelectedPoint);
        let b = tracker.issue(MarkerKind::SelectedPoint);

        assert!(!tracker.is_current(&a));
        assert!(tracker.is_current(&b));
        assert_eq!(tracker.latest(MarkerKind::SelectedPoint), 2);
    }

    #[test]
    fn test_targets_are_independent() {
        let mut tracker = RequestTracker::new();
        let own = tracker.issue(MarkerKind::SelfLocation);
        tracker.issue(MarkerKind::SelectedPoint);
        tracker.issue(MarkerKind::SelectedPoint);

        assert!(tracker.is_current(&own));
        assert_eq!(tracker.latest(MarkerKind::SelfLocation), 1);
    }
}
