//! Lightning Storm — fractal bolts with a sky flash
//!
//! Render side of the lightning generator: draws the current bolt as a
//! projected strip with a soft glow, tints the sky with the flash intensity,
//! and hands out one strike event per bolt for side effects.

use super::Effect;
use crate::camera::{OrbitCamera, Projected};
use crate::config::LightningConfig;
use crate::display::{Frame, Rgba};
use crate::lightning::{LightningGenerator, LightningSnapshot};
use crate::util::{RandomSource, Rng};
use serde::Serialize;

const CORE_COLOR: Rgba = Rgba::opaque(235, 240, 255);
const GLOW_COLOR: Rgba = Rgba::new(140, 150, 255, 110);
const SKY_FLASH: Rgba = Rgba::opaque(70, 60, 120);
const GLOW_OFFSET: f32 = 1.5; // pixels either side of the core
const MIN_VISIBLE_FLASH: f32 = 0.01;

/// Announced once per strike
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrikeEvent {
    pub strike: u64,
    pub peak: f32,
    pub start: [f32; 3],
    pub end: [f32; 3],
    pub points: usize,
}

pub struct LightningStorm<R: RandomSource = Rng> {
    generator: LightningGenerator<R>,
    snapshot: LightningSnapshot,
    last_announced: u64,
    pending_event: Option<StrikeEvent>,
}

impl LightningStorm<Rng> {
    pub fn new(config: &LightningConfig, seed: u64) -> Self {
        Self::with_source(config, Rng::new(seed))
    }
}

impl<R: RandomSource> LightningStorm<R> {
    pub fn with_source(config: &LightningConfig, rng: R) -> Self {
        let generator = LightningGenerator::new(config.clone(), rng);
        let snapshot = generator.snapshot();
        Self {
            generator,
            snapshot,
            last_announced: 0,
            pending_event: None,
        }
    }

    /// Force a bolt on the next update
    pub fn strike_now(&mut self) {
        self.generator.strike_now();
    }

    /// The strike that fired since the last call, if any
    pub fn take_strike_event(&mut self) -> Option<StrikeEvent> {
        self.pending_event.take()
    }

    /// Flash brightness normalised to [0, 1]
    pub fn flash(&self) -> f32 {
        let peak = self.generator.peak_max();
        if peak > 0.0 {
            (self.snapshot.intensity / peak).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    fn announce(&mut self) {
        if self.snapshot.strike_id == self.last_announced {
            return;
        }
        self.last_announced = self.snapshot.strike_id;

        let segments = &self.snapshot.segments;
        let (Some(&start), Some(&end)) = (segments.first(), segments.last()) else {
            return;
        };
        self.pending_event = Some(StrikeEvent {
            strike: self.snapshot.strike_id,
            peak: self.snapshot.peak,
            start: start.into(),
            end: end.into(),
            points: segments.len(),
        });
    }
}

impl<R: RandomSource> Effect for LightningStorm<R> {
    fn update(&mut self, dt: f32) {
        self.snapshot = self.generator.step(dt);
        self.announce();
    }

    fn render(&self, camera: &OrbitCamera, frame: &mut Frame) {
        let flash = self.flash();
        if flash < MIN_VISIBLE_FLASH {
            return;
        }

        let (w, h) = (frame.width(), frame.height());
        let core = CORE_COLOR.scaled(0.4 + 0.6 * flash);
        let glow = Rgba {
            a: (GLOW_COLOR.a as f32 * flash) as u8,
            ..GLOW_COLOR
        };

        let projected: Vec<Option<Projected>> = self
            .snapshot
            .segments
            .iter()
            .map(|p| camera.project(*p, w, h))
            .collect();

        let jumps = &self.snapshot.jumps;
        for (i, pair) in projected.windows(2).enumerate() {
            // Jump indices are ascending
            if jumps.binary_search(&(i + 1)).is_ok() {
                continue;
            }
            let (Some(a), Some(b)) = (pair[0], pair[1]) else {
                continue;
            };
            let dx = b.x - a.x;
            let dy = b.y - a.y;
            let len = (dx * dx + dy * dy).sqrt().max(0.001);
            let nx = -dy / len * GLOW_OFFSET;
            let ny = dx / len * GLOW_OFFSET;

            frame.line(a.x + nx, a.y + ny, b.x + nx, b.y + ny, glow);
            frame.line(a.x - nx, a.y - ny, b.x - nx, b.y - ny, glow);
            frame.line(a.x, a.y, b.x, b.y, core);
        }
    }

    fn name(&self) -> &str {
        "Lightning Storm"
    }

    fn sky_light(&self) -> Rgba {
        SKY_FLASH.scaled(self.flash())
    }
}
