//! Per-query memory metering.

/// A running estimate of bytes attributed to search-result construction for
/// one query.
///
/// This is a metering primitive, not a quota enforcer: `add` never fails and
/// no upper bound is enforced here. The caller samples `usage` during
/// iteration and decides whether to abort or backpressure the query. The
/// counter is monotonically increasing; it tracks attributed construction
/// cost, not live heap occupancy.
#[derive(Debug, Default)]
pub struct MemTracker {
    bytes: u64,
}

impl MemTracker {
    /// Create a new tracker with zero usage.
    pub fn new() -> Self {
        MemTracker::default()
    }

    /// Add `add` bytes to the running total.
    pub fn add(&mut self, add: u64) {
        self.bytes += add;
    }

    /// Get the current cumulative total.
    pub fn usage(&self) -> u64 {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mem_tracker_accumulates() {
        let mut tracker = MemTracker::new();
        assert_eq!(tracker.usage(), 0);

        tracker.add(10);
        tracker.add(20);
        tracker.add(30);
        assert_eq!(tracker.usage(), 60);
    }

    #[test]
    fn test_mem_trackers_are_independent() {
        let mut a = MemTracker::new();
        let mut b = MemTracker::new();

        a.add(5);
        b.add(7);
        a.add(5);

        assert_eq!(a.usage(), 10);
        assert_eq!(b.usage(), 7);
    }
}
