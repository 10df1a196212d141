//! Shared utilities

use std::collections::VecDeque;
use std::time::Instant;

/// Source of uniform random numbers threaded through the simulation.
///
/// Everything that needs randomness takes `&mut impl RandomSource`; there is
/// no global generator.
pub trait RandomSource {
    /// Next value in [0, 1)
    fn next_f32(&mut self) -> f32;

    /// Next value in [min, max)
    #[inline]
    fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }
}

/// Simple deterministic RNG using xorshift64
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) } // Ensure non-zero
    }

    /// Seed from the wall clock, for runs that don't ask for reproducibility
    pub fn from_entropy() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0x5707_3CE1, |d| d.as_nanos() as u64);
        Self::new(nanos)
    }

    /// Get the next random u64
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }
}

impl RandomSource for Rng {
    #[inline]
    fn next_f32(&mut self) -> f32 {
        (self.next_u64() & 0xFFFFFF) as f32 / 0x1000000 as f32
    }
}

/// Returns the same value for every draw
#[cfg(test)]
pub struct FixedRandom(pub f32);

#[cfg(test)]
impl RandomSource for FixedRandom {
    fn next_f32(&mut self) -> f32 {
        self.0
    }
}

/// Cycles through a fixed list of draws
#[cfg(test)]
pub struct SequenceRandom {
    values: Vec<f32>,
    cursor: usize,
}

#[cfg(test)]
impl SequenceRandom {
    pub fn new(values: Vec<f32>) -> Self {
        assert!(!values.is_empty());
        Self { values, cursor: 0 }
    }
}

#[cfg(test)]
impl RandomSource for SequenceRandom {
    fn next_f32(&mut self) -> f32 {
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}

// ============================================================================
// Frame clock
// ============================================================================

/// Longest step a wall-clock frame may report
const MAX_WALL_CLOCK_STEP: f32 = 0.1;

/// How the render loop derives `dt` for each simulation tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepMode {
    /// Constant step, reproducible regardless of frame pacing
    Fixed(f32),
    /// Measured time since the previous frame
    WallClock,
}

/// Frame timer with rolling FPS average
pub struct FrameClock {
    mode: StepMode,
    frame_times: VecDeque<f32>,
    last_frame: Instant,
    sample_count: usize,
}

impl FrameClock {
    pub fn new(mode: StepMode, sample_count: usize) -> Self {
        Self {
            mode,
            frame_times: VecDeque::with_capacity(sample_count),
            last_frame: Instant::now(),
            sample_count: sample_count.max(1),
        }
    }

    /// Call once per frame. Returns the simulation step in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let measured = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.frame_times.push_back(measured);
        if self.frame_times.len() > self.sample_count {
            self.frame_times.pop_front();
        }

        match self.mode {
            StepMode::Fixed(dt) => dt,
            StepMode::WallClock => measured.min(MAX_WALL_CLOCK_STEP),
        }
    }

    /// Average frames per second over the sample window
    pub fn avg_fps(&self) -> f32 {
        let avg_dt: f32 =
            self.frame_times.iter().sum::<f32>() / self.frame_times.len().max(1) as f32;
        if avg_dt > 0.0 {
            1.0 / avg_dt
        } else {
            0.0
        }
    }

    /// Get min/max FPS from sample window
    pub fn min_max_fps(&self) -> (f32, f32) {
        if self.frame_times.is_empty() {
            return (0.0, 0.0);
        }
        let min_dt = self.frame_times.iter().copied().fold(f32::INFINITY, f32::min);
        let max_dt = self.frame_times.iter().copied().fold(0.0, f32::max);
        let max_fps = if min_dt > 0.0 { 1.0 / min_dt } else { 0.0 };
        let min_fps = if max_dt > 0.0 { 1.0 / max_dt } else { 0.0 };
        (min_fps, max_fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_is_deterministic_per_seed() {
        let mut a = Rng::new(42);
        let mut b = Rng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_rng_zero_seed_still_advances() {
        let mut rng = Rng::new(0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn test_range_f32_stays_in_bounds() {
        let mut rng = Rng::new(7);
        for _ in 0..1000 {
            let v = rng.range_f32(-2.5, 3.0);
            assert!((-2.5..3.0).contains(&v), "out of range: {}", v);
        }
    }

    #[test]
    fn test_sequence_random_cycles() {
        let mut seq = SequenceRandom::new(vec![0.1, 0.9]);
        assert_eq!(seq.next_f32(), 0.1);
        assert_eq!(seq.next_f32(), 0.9);
        assert_eq!(seq.next_f32(), 0.1);
    }

    #[test]
    fn test_fixed_step_clock_ignores_frame_pacing() {
        let mut clock = FrameClock::new(StepMode::Fixed(1.0 / 60.0), 10);
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(clock.tick(), 1.0 / 60.0);
    }

    #[test]
    fn test_wall_clock_step_is_clamped() {
        let mut clock = FrameClock::new(StepMode::WallClock, 10);
        std::thread::sleep(std::time::Duration::from_millis(150));
        assert!(clock.tick() <= MAX_WALL_CLOCK_STEP);
    }
}
