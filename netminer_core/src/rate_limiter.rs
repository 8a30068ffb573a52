use std::time::{Duration, Instant};

/// Sliding-window call gate, usable to throttle computer moves or outbound
/// calls. Not game-specific.
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: usize,
    window: Duration,
    calls: Vec<Instant>,
}

impl RateLimiter {
    pub fn new(max_calls: usize, window: Duration) -> Self {
        RateLimiter {
            max_calls,
            window,
            calls: vec![],
        }
    }

    /// Records and admits the call if fewer than `max_calls` happened within
    /// the window.
    pub fn is_allowed(&mut self) -> bool {
        self.allow_at(Instant::now())
    }

    /// How long until the next call would be admitted.
    pub fn remaining_time(&self) -> Duration {
        self.remaining_at(Instant::now())
    }

    fn allow_at(&mut self, now: Instant) -> bool {
        self.calls
            .retain(|&call| now.duration_since(call) < self.window);
        if self.calls.len() < self.max_calls {
            self.calls.push(now);
            true
        } else {
            false
        }
    }

    fn remaining_at(&self, now: Instant) -> Duration {
        if self.calls.len() < self.max_calls {
            return Duration::ZERO;
        }
        match self.calls.iter().min() {
            Some(&oldest) => self.window.saturating_sub(now.duration_since(oldest)),
            None => Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::rate_limiter::RateLimiter;

    #[test]
    fn calls_within_the_limit_should_be_allowed() {
        let base = Instant::now();
        let mut limiter = RateLimiter::new(2, Duration::from_secs(10));

        assert!(limiter.allow_at(base));
        assert!(limiter.allow_at(base + Duration::from_secs(1)));
        assert!(!limiter.allow_at(base + Duration::from_secs(2)));
    }

    #[test]
    fn the_window_should_slide() {
        let base = Instant::now();
        let mut limiter = RateLimiter::new(1, Duration::from_secs(10));

        assert!(limiter.allow_at(base));
        assert!(!limiter.allow_at(base + Duration::from_secs(9)));
        assert!(limiter.allow_at(base + Duration::from_secs(11)));
    }

    #[test]
    fn remaining_time_should_count_down_to_the_oldest_call() {
        let base = Instant::now();
        let mut limiter = RateLimiter::new(1, Duration::from_secs(10));
        assert_eq!(limiter.remaining_at(base), Duration::ZERO);

        limiter.allow_at(base);

        assert_eq!(
            limiter.remaining_at(base + Duration::from_secs(4)),
            Duration::from_secs(6)
        );
        assert_eq!(
            limiter.remaining_at(base + Duration::from_secs(12)),
            Duration::ZERO
        );
    }
}
