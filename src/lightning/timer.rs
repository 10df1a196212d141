use crate::config::IntervalRange;
use crate::util::RandomSource;

/// Decides when the next strike fires.
///
/// The first wait is drawn from its own range; every later wait comes from
/// `interval`. The threshold only changes at the instant a strike fires.
#[derive(Debug, Clone)]
pub struct StrikeTimer {
    elapsed_since_last_strike: f32,
    next_strike_threshold: f32,
    interval: IntervalRange,
}

impl StrikeTimer {
    pub fn new(
        first_interval: IntervalRange,
        interval: IntervalRange,
        rng: &mut impl RandomSource,
    ) -> Self {
        Self {
            elapsed_since_last_strike: 0.0,
            next_strike_threshold: first_interval.sample(rng),
            interval,
        }
    }

    /// Accumulate `delta_seconds`; returns true when a strike is due.
    pub fn advance(&mut self, delta_seconds: f32, rng: &mut impl RandomSource) -> bool {
        self.elapsed_since_last_strike += delta_seconds;
        if self.elapsed_since_last_strike > self.next_strike_threshold {
            self.rearm(rng);
            true
        } else {
            false
        }
    }

    /// Fire now regardless of the elapsed time
    pub fn force(&mut self, rng: &mut impl RandomSource) {
        self.rearm(rng);
    }

    fn rearm(&mut self, rng: &mut impl RandomSource) {
        self.elapsed_since_last_strike = 0.0;
        self.next_strike_threshold = self.interval.sample(rng);
    }

    pub fn threshold(&self) -> f32 {
        self.next_strike_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::{FixedRandom, Rng};

    const FIRST: IntervalRange = IntervalRange::new(2.0, 7.0);
    const LATER: IntervalRange = IntervalRange::new(3.0, 11.0);

    #[test]
    fn test_first_threshold_drawn_from_first_range() {
        let timer = StrikeTimer::new(FIRST, LATER, &mut FixedRandom(0.0));
        assert_eq!(timer.threshold(), 2.0);
        assert_eq!(timer.elapsed_since_last_strike, 0.0);
    }

    #[test]
    fn test_fires_only_after_exceeding_threshold() {
        let mut rng = FixedRandom(0.0);
        let mut timer = StrikeTimer::new(FIRST, LATER, &mut rng);
        assert!(!timer.advance(1.0, &mut rng));
        // elapsed == threshold is not enough
        assert!(!timer.advance(1.0, &mut rng));
        assert!(timer.advance(0.5, &mut rng));
    }

    #[test]
    fn test_fire_resets_elapsed_and_redraws_from_later_range() {
        let mut rng = Rng::new(99);
        let mut timer = StrikeTimer::new(FIRST, LATER, &mut rng);
        for _ in 0..200 {
            if timer.advance(0.25, &mut rng) {
                assert_eq!(timer.elapsed_since_last_strike, 0.0);
                let t = timer.threshold();
                assert!(t >= LATER.min && t <= LATER.max, "{}", t);
            }
        }
    }

    #[test]
    fn test_large_step_fires_once() {
        let mut rng = FixedRandom(0.0);
        let mut timer = StrikeTimer::new(FIRST, LATER, &mut rng);
        // One call can only report one strike, however much time it covers
        assert!(timer.advance(100.0, &mut rng));
        assert_eq!(timer.elapsed_since_last_strike, 0.0);
        assert!(!timer.advance(0.0, &mut rng));
    }

    #[test]
    fn test_threshold_stable_between_strikes() {
        let mut rng = Rng::new(5);
        let mut timer = StrikeTimer::new(FIRST, LATER, &mut rng);
        let threshold = timer.threshold();
        for _ in 0..10 {
            assert!(!timer.advance(0.1, &mut rng));
            assert_eq!(timer.threshold(), threshold);
        }
    }

    #[test]
    fn test_force_rearms_like_a_timed_strike() {
        let mut rng = FixedRandom(0.5);
        let mut timer = StrikeTimer::new(FIRST, LATER, &mut rng);
        timer.advance(1.0, &mut rng);
        timer.force(&mut rng);
        assert_eq!(timer.elapsed_since_last_strike, 0.0);
        assert_eq!(timer.threshold(), 7.0);
    }
}
