use super::bolt::{BoltPathBuilder, BoltSegmentList};
use super::intensity::IntensityDecay;
use super::timer::StrikeTimer;
use crate::config::LightningConfig;
use crate::math3d::Point3;
use crate::util::{RandomSource, Rng};
use std::sync::Arc;

/// Read-only view of the generator after a step
#[derive(Debug, Clone)]
pub struct LightningSnapshot {
    pub segments: BoltSegmentList,
    /// Indices into `segments` where the strip jumps back from a branch tip;
    /// the pair ending at such an index is not drawn
    pub jumps: Arc<[usize]>,
    pub intensity: f32,
    /// Peak drawn for the latest strike, before any decay
    pub peak: f32,
    /// True only on the step where a new bolt was built
    pub struck: bool,
    /// Number of strikes so far; changes exactly once per strike
    pub strike_id: u64,
}

/// Owns the strike timer, bolt builder and flash intensity for one scene.
///
/// Driven by exactly one render loop: call [`step`](Self::step) once per
/// frame and hand the snapshot to whatever draws it.
pub struct LightningGenerator<R: RandomSource = Rng> {
    config: LightningConfig,
    rng: R,
    timer: StrikeTimer,
    builder: BoltPathBuilder,
    intensity: IntensityDecay,
    segments: BoltSegmentList,
    jumps: Arc<[usize]>,
    peak: f32,
    strike_id: u64,
    pending_strike: bool,
}

impl<R: RandomSource> LightningGenerator<R> {
    pub fn new(config: LightningConfig, mut rng: R) -> Self {
        let timer = StrikeTimer::new(config.first_interval, config.interval, &mut rng);
        let builder = BoltPathBuilder::new(config.bolt.clone());
        Self {
            config,
            rng,
            timer,
            builder,
            intensity: IntensityDecay::new(),
            segments: Arc::from(Vec::new()),
            jumps: Arc::from(Vec::new()),
            peak: 0.0,
            strike_id: 0,
            pending_strike: false,
        }
    }

    /// Advance one simulation tick
    pub fn step(&mut self, delta_seconds: f32) -> LightningSnapshot {
        let struck = if self.pending_strike {
            self.pending_strike = false;
            self.timer.force(&mut self.rng);
            true
        } else {
            self.timer.advance(delta_seconds, &mut self.rng)
        };

        if struck {
            self.strike();
        }
        self.intensity.tick(delta_seconds, self.config.decay_rate);

        LightningSnapshot {
            struck,
            ..self.snapshot()
        }
    }

    /// Current state without advancing time
    pub fn snapshot(&self) -> LightningSnapshot {
        LightningSnapshot {
            segments: Arc::clone(&self.segments),
            jumps: Arc::clone(&self.jumps),
            intensity: self.intensity.value(),
            peak: self.peak,
            struck: false,
            strike_id: self.strike_id,
        }
    }

    /// Fire on the next step instead of waiting for the timer
    pub fn strike_now(&mut self) {
        self.pending_strike = true;
    }

    /// Highest intensity any strike can produce
    pub fn peak_max(&self) -> f32 {
        self.config.peak_intensity.max
    }

    fn strike(&mut self) {
        let (start, end) = self.pick_endpoints();
        let path = self.builder.build(start, end, &mut self.rng);
        let mut points = Vec::with_capacity(path.points.len() + 1);
        points.push(start);
        points.extend(path.points);
        self.segments = Arc::from(points);
        // Shifted past the leading start point
        self.jumps = path.jumps.iter().map(|i| i + 1).collect();

        self.intensity
            .on_strike(self.config.peak_intensity, &mut self.rng);
        self.peak = self.intensity.value();
        self.strike_id += 1;

        tracing::debug!(
            strike = self.strike_id,
            points = self.segments.len(),
            jumps = self.jumps.len(),
            peak = self.peak,
            next_in = self.timer.threshold(),
            "lightning strike"
        );
    }

    fn pick_endpoints(&mut self) -> (Point3, Point3) {
        let zone = &self.config.zone;
        let w = zone.half_width;
        let start = Point3::new(
            self.rng.range_f32(-w, w),
            zone.sky_height,
            self.rng.range_f32(-w, w),
        );
        let end = Point3::new(
            self.rng.range_f32(-w, w),
            zone.ground_height,
            self.rng.range_f32(-w, w),
        );
        (start, end)
    }
}
