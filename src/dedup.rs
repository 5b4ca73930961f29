//! Per-node sequence deduplication.
//!
//! Nodes attach an 8-bit counter to every application event and repeat
//! transmissions on the mesh, so the same event can arrive several times.
//! The filter keeps the last accepted counter per node and drops anything
//! that is not strictly newer, while still letting the counter wrap back
//! to near zero after 255.

use std::collections::HashMap;

use crate::protocol::ApplicationEvent;

/// How far backwards a counter must jump before it is read as a wraparound
/// rather than a stale repeat.
const WRAP_THRESHOLD: u8 = 100;

/// Per-node last-accepted counter state.
///
/// Owned exclusively by the ingestion path; mutated only when an event is
/// accepted.
#[derive(Debug, Default)]
pub struct DedupFilter {
    last_counter: HashMap<u8, u8>,
}

impl DedupFilter {
    /// Create an empty filter. Unseen nodes start from counter 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether an incoming event is new.
    ///
    /// Accepts when the counter moved forward, or when it jumped backwards
    /// by more than [`WRAP_THRESHOLD`] (a fresh cycle of the 8-bit counter).
    /// The node's state is updated on acceptance only; rejection is silent.
    pub fn accept(&mut self, event: &ApplicationEvent) -> bool {
        let last = self.last_counter.get(&event.node).copied().unwrap_or(0);

        let fresh = event.counter > last || last.wrapping_sub(event.counter) > WRAP_THRESHOLD;
        if fresh {
            self.last_counter.insert(event.node, event.counter);
        }
        fresh
    }

    /// Number of nodes with recorded state.
    pub fn tracked_nodes(&self) -> usize {
        self.last_counter.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(node: u8, counter: u8) -> ApplicationEvent {
        ApplicationEvent {
            node,
            status: 0,
            class_id: 0x2B,
            unknown1: 0,
            counter,
            sub_node: 1,
        }
    }

    #[test]
    fn test_first_event_from_node_accepted() {
        let mut filter = DedupFilter::new();
        assert!(filter.accept(&event(5, 1)));
        assert_eq!(filter.tracked_nodes(), 1);
    }

    #[test]
    fn test_repeat_rejected() {
        let mut filter = DedupFilter::new();
        assert!(filter.accept(&event(5, 1)));
        assert!(!filter.accept(&event(5, 1)));
    }

    #[test]
    fn test_forward_and_wraparound_rules() {
        let mut filter = DedupFilter::new();
        assert!(filter.accept(&event(5, 250)));

        // Small backward jump: a stale repeat.
        assert!(!filter.accept(&event(5, 245)));
        // Forward movement: accepted.
        assert!(filter.accept(&event(5, 251)));
        // Large backward jump: the counter wrapped, accepted.
        assert!(filter.accept(&event(5, 10)));
    }

    #[test]
    fn test_rejection_leaves_state_untouched() {
        let mut filter = DedupFilter::new();
        assert!(filter.accept(&event(5, 250)));
        assert!(!filter.accept(&event(5, 200)));
        // 251 is still newer than the recorded 250.
        assert!(filter.accept(&event(5, 251)));
    }

    #[test]
    fn test_nodes_are_independent() {
        let mut filter = DedupFilter::new();
        assert!(filter.accept(&event(1, 10)));
        assert!(filter.accept(&event(2, 10)));
        assert!(!filter.accept(&event(1, 10)));
        assert_eq!(filter.tracked_nodes(), 2);
    }

    #[test]
    fn test_counter_zero_rejected_for_unseen_node() {
        // Unseen nodes default to 0 and 0 is not greater than 0, while the
        // backward distance is 0 as well.
        let mut filter = DedupFilter::new();
        assert!(!filter.accept(&event(9, 0)));
        assert_eq!(filter.tracked_nodes(), 0);
    }
}
