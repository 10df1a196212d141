use crate::config::IntervalRange;
use crate::util::RandomSource;

/// Flash brightness: jumps to a random peak on a strike, then drains linearly
#[derive(Debug, Clone, Default)]
pub struct IntensityDecay {
    intensity: f32,
}

impl IntensityDecay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to a fresh peak, interrupting any decay in progress
    pub fn on_strike(&mut self, peak_range: IntervalRange, rng: &mut impl RandomSource) {
        self.intensity = peak_range.sample(rng);
    }

    pub fn tick(&mut self, delta_seconds: f32, decay_rate: f32) {
        self.intensity = (self.intensity - decay_rate * delta_seconds).max(0.0);
    }

    pub fn value(&self) -> f32 {
        self.intensity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::FixedRandom;

    const PEAK: IntervalRange = IntervalRange::new(3.0, 6.0);

    #[test]
    fn test_starts_dark() {
        assert_eq!(IntensityDecay::new().value(), 0.0);
    }

    #[test]
    fn test_strike_sets_peak_from_range() {
        let mut decay = IntensityDecay::new();
        decay.on_strike(PEAK, &mut FixedRandom(0.5));
        assert_eq!(decay.value(), 4.5);
    }

    #[test]
    fn test_linear_decay() {
        let mut decay = IntensityDecay::new();
        decay.on_strike(PEAK, &mut FixedRandom(0.0));
        decay.tick(0.25, 4.0);
        assert_eq!(decay.value(), 2.0);
    }

    #[test]
    fn test_clamps_at_zero_for_any_step() {
        for dt in [0.5, 10.0, 1.0e6, f32::MAX] {
            let mut decay = IntensityDecay::new();
            decay.on_strike(PEAK, &mut FixedRandom(0.9));
            decay.tick(dt, 12.0);
            assert_eq!(decay.value(), 0.0, "dt = {}", dt);
        }
    }

    #[test]
    fn test_monotonic_between_strikes() {
        let mut decay = IntensityDecay::new();
        decay.on_strike(PEAK, &mut FixedRandom(1.0));
        let mut last = decay.value();
        for _ in 0..100 {
            decay.tick(1.0 / 60.0, 12.0);
            assert!(decay.value() <= last);
            last = decay.value();
        }
        assert_eq!(last, 0.0);
    }

    #[test]
    fn test_new_strike_interrupts_decay() {
        let mut decay = IntensityDecay::new();
        decay.on_strike(PEAK, &mut FixedRandom(0.0));
        decay.tick(0.1, 12.0);
        decay.on_strike(PEAK, &mut FixedRandom(1.0));
        assert_eq!(decay.value(), 6.0);
    }
}
