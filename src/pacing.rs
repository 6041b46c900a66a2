//! Minimum-interval pacing between upstream requests.

use std::time::{Duration, Instant};

/// Enforces a minimum interval between consecutive operations.
///
/// The delay policy is a pure function of the current instant, so it can be
/// tested without sleeping; only [`MinInterval::pace`] actually awaits.
#[derive(Debug)]
pub struct MinInterval {
    interval: Duration,
    last: Option<Instant>,
}

impl MinInterval {
    /// Create a pacer with the given minimum interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Delay required before the next operation may start at `now`.
    ///
    /// Zero before the first operation and whenever the interval has already
    /// elapsed.
    pub fn required_delay(&self, now: Instant) -> Duration {
        match self.last {
            Some(last) => self.interval.saturating_sub(now.duration_since(last)),
            None => Duration::ZERO,
        }
    }

    /// Record that an operation started at `now`.
    pub fn mark(&mut self, now: Instant) {
        self.last = Some(now);
    }

    /// Wait out the remainder of the interval, then mark the next operation
    /// as started.
    pub async fn pace(&mut self) {
        let delay = self.required_delay(Instant::now());
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.mark(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_call_needs_no_delay() {
        let pacer = MinInterval::new(Duration::from_millis(500));
        assert_eq!(pacer.required_delay(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn enforces_minimum_spacing() {
        let mut pacer = MinInterval::new(Duration::from_millis(500));
        let start = Instant::now();
        pacer.mark(start);

        let delay = pacer.required_delay(start + Duration::from_millis(100));
        assert_eq!(delay, Duration::from_millis(400));
    }

    #[test]
    fn elapsed_interval_needs_no_delay() {
        let mut pacer = MinInterval::new(Duration::from_millis(200));
        let start = Instant::now();
        pacer.mark(start);

        assert_eq!(
            pacer.required_delay(start + Duration::from_millis(200)),
            Duration::ZERO
        );
        assert_eq!(
            pacer.required_delay(start + Duration::from_secs(5)),
            Duration::ZERO
        );
    }

    #[test]
    fn zero_interval_never_delays() {
        let mut pacer = MinInterval::new(Duration::ZERO);
        let start = Instant::now();
        pacer.mark(start);
        assert_eq!(pacer.required_delay(start), Duration::ZERO);
    }
}
