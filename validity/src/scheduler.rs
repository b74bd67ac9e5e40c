//! Staggering of tooltip appearances.

use std::time::{Duration, Instant};

/// Window within which consecutive tooltips are pushed further back.
pub const TOOLTIP_STAGGER: Duration = Duration::from_millis(100);

/// Spaces out tooltips that are requested close together so they appear one
/// after another instead of all at once.
#[derive(Debug, Clone, Default)]
pub struct TooltipScheduler {
    last_shown_at: Option<Instant>,
    pending_delay: Duration,
}

impl TooltipScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay before the next tooltip should appear.
    ///
    /// Within `TOOLTIP_STAGGER` of the previous request the delay grows by
    /// one threshold; otherwise it resets to one threshold.
    pub fn next_delay(&mut self, now: Instant) -> Duration {
        let close = self
            .last_shown_at
            .is_some_and(|last| now.saturating_duration_since(last) < TOOLTIP_STAGGER);

        self.pending_delay = if close {
            self.pending_delay + TOOLTIP_STAGGER
        } else {
            TOOLTIP_STAGGER
        };
        self.last_shown_at = Some(now);

        log::debug!("[scheduler] next tooltip in {:?}", self.pending_delay);
        self.pending_delay
    }

    pub fn last_shown_at(&self) -> Option<Instant> {
        self.last_shown_at
    }

    pub fn pending_delay(&self) -> Duration {
        self.pending_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_first_delay_is_threshold() {
        let mut scheduler = TooltipScheduler::new();
        assert_eq!(scheduler.next_delay(Instant::now()), TOOLTIP_STAGGER);
    }

    #[test]
    fn test_burst_accumulates() {
        let mut scheduler = TooltipScheduler::new();
        let t0 = Instant::now();
        assert_eq!(scheduler.next_delay(t0), ms(100));
        assert_eq!(scheduler.next_delay(t0 + ms(10)), ms(200));
        assert_eq!(scheduler.next_delay(t0 + ms(60)), ms(300));
    }

    #[test]
    fn test_gap_resets() {
        let mut scheduler = TooltipScheduler::new();
        let t0 = Instant::now();
        scheduler.next_delay(t0);
        scheduler.next_delay(t0 + ms(50));
        assert_eq!(scheduler.next_delay(t0 + ms(200)), ms(100));
    }

    #[test]
    fn test_exact_threshold_resets() {
        let mut scheduler = TooltipScheduler::new();
        let t0 = Instant::now();
        scheduler.next_delay(t0);
        assert_eq!(scheduler.next_delay(t0 + ms(100)), ms(100));
        assert_eq!(scheduler.last_shown_at(), Some(t0 + ms(100)));
    }
}
