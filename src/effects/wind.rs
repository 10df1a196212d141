//! Wind — drifting motes swirling along +X

use super::Effect;
use crate::camera::OrbitCamera;
use crate::config::WindConfig;
use crate::display::{Frame, Rgba};
use crate::math3d::Vec3;
use crate::util::{RandomSource, Rng};

/// Motion constants are per frame at this rate; `update` rescales by `dt`
const REFERENCE_HZ: f32 = 60.0;
const MOTE_COLOR: Rgba = Rgba::new(255, 255, 255, 102);
/// Screen pixels per world unit of mote size at unit depth
const MOTE_SCALE: f32 = 400.0;

struct Mote {
    pos: Vec3,
    size: f32,
}

pub struct WindField {
    motes: Vec<Mote>,
    config: WindConfig,
    time: f32,
}

impl WindField {
    pub fn new(config: &WindConfig, seed: u64) -> Self {
        let mut rng = Rng::new(seed);
        let e = config.extent;
        let motes = (0..config.count)
            .map(|_| Mote {
                pos: Vec3::new(
                    rng.range_f32(-e, e),
                    rng.next_f32() * config.height,
                    rng.range_f32(-e, e),
                ),
                size: rng.next_f32() * 0.1 + 0.05,
            })
            .collect();

        Self {
            motes,
            config: config.clone(),
            time: 0.0,
        }
    }
}

impl Effect for WindField {
    fn update(&mut self, dt: f32) {
        self.time += dt;
        let frames = dt * REFERENCE_HZ;
        let c = &self.config;

        for (i, mote) in self.motes.iter_mut().enumerate() {
            let phase = self.time * c.swirl_rate + i as f32 * c.phase_step;
            mote.pos.x += (phase.sin() * c.swirl + c.drift) * frames;
            mote.pos.z += phase.cos() * c.swirl * frames;

            if mote.pos.x > c.extent {
                mote.pos.x = -c.extent;
            }
        }
    }

    fn render(&self, camera: &OrbitCamera, frame: &mut Frame) {
        let (w, h) = (frame.width(), frame.height());
        for mote in &self.motes {
            if let Some(p) = camera.project(mote.pos, w, h) {
                let size = (mote.size * MOTE_SCALE / p.depth).clamp(1.0, 4.0);
                frame.dot(p.x, p.y, size, MOTE_COLOR);
            }
        }
    }

    fn name(&self) -> &str {
        "Wind"
    }
}
