//! Coalesces refresh requests so at most one display read runs at a time.
//!
//! A request that arrives while a read is running is remembered, not queued: any
//! number of them collapse into one follow-up read.

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RefreshGate {
    in_flight: bool,
    pending: bool,
}

impl RefreshGate {
    /// Returns `true` when the caller should start a read now.
    pub fn request(&mut self) -> bool {
        if self.in_flight {
            self.pending = true;
            false
        } else {
            self.in_flight = true;
            true
        }
    }

    /// Marks the running read done. Returns `true` when a follow-up read must start
    /// now; the gate then stays in flight for it.
    pub fn complete(&mut self) -> bool {
        if self.pending {
            self.pending = false;
            true
        } else {
            self.in_flight = false;
            false
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_request_starts_immediately() {
        let mut gate = RefreshGate::default();
        assert!(gate.request());
        assert!(gate.is_in_flight());
        assert!(!gate.complete());
        assert!(!gate.is_in_flight());
    }

    #[test]
    fn test_requests_during_read_collapse_into_one() {
        let mut gate = RefreshGate::default();
        assert!(gate.request());
        assert!(!gate.request());
        assert!(!gate.request());
        assert!(gate.is_pending());

        // One follow-up, then idle
        assert!(gate.complete());
        assert!(gate.is_in_flight());
        assert!(!gate.is_pending());
        assert!(!gate.complete());
        assert!(gate.request());
    }
}
