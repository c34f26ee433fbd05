use crate::core::PacingPolicy;
use std::time::Duration;

/// Waits the same interval after every contact, the last one included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay {
    interval: Duration,
}

impl FixedDelay {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_secs(seconds: u64) -> Self {
        Self::new(Duration::from_secs(seconds))
    }
}

impl PacingPolicy for FixedDelay {
    fn delay_after(&self, _position: usize, _total: usize) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_delay_applies_after_last_contact() {
        let pacing = FixedDelay::from_secs(3);
        assert_eq!(pacing.delay_after(0, 2), Duration::from_secs(3));
        assert_eq!(pacing.delay_after(1, 2), Duration::from_secs(3));
    }
}
