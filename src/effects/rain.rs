//! Rain — falling grey streaks recycled from floor to ceiling

use super::Effect;
use crate::camera::OrbitCamera;
use crate::config::RainConfig;
use crate::display::{Frame, Rgba};
use crate::math3d::Vec3;
use crate::util::{RandomSource, Rng};

const STREAK_GREY: u8 = 0xaa;

struct Streak {
    /// Top of the streak
    pos: Vec3,
    length: f32,
    opacity: f32,
}

pub struct RainField {
    streaks: Vec<Streak>,
    config: RainConfig,
    rng: Rng,
}

impl RainField {
    pub fn new(config: &RainConfig, seed: u64) -> Self {
        let mut rng = Rng::new(seed);
        let half = config.size * 0.5;
        // Spread the initial streaks through the whole column so the first
        // frames aren't a single sheet of rain
        let streaks = (0..config.count)
            .map(|_| Streak {
                pos: Vec3::new(
                    rng.range_f32(-half, half),
                    config.spawn_base + rng.next_f32() * config.size * 2.0,
                    rng.range_f32(-half, half),
                ),
                length: 0.4 + rng.next_f32() * 0.5,
                opacity: 0.3 + rng.next_f32() * 0.4,
            })
            .collect();

        Self {
            streaks,
            config: config.clone(),
            rng,
        }
    }
}

impl Effect for RainField {
    fn update(&mut self, dt: f32) {
        let fall = self.config.speed * dt;
        let half = self.config.size * 0.5;
        for streak in &mut self.streaks {
            streak.pos.y -= fall;
            if streak.pos.y < self.config.floor {
                streak.pos.y = self.config.ceiling;
                streak.pos.x = self.rng.range_f32(-half, half);
                streak.pos.z = self.rng.range_f32(-half, half);
            }
        }
    }

    fn render(&self, camera: &OrbitCamera, frame: &mut Frame) {
        let (w, h) = (frame.width(), frame.height());
        for streak in &self.streaks {
            let bottom = streak.pos - Vec3::new(0.0, streak.length, 0.0);
            let (Some(a), Some(b)) = (camera.project(streak.pos, w, h), camera.project(bottom, w, h))
            else {
                continue;
            };
            let alpha = (streak.opacity * 255.0) as u8;
            frame.line(
                a.x,
                a.y,
                b.x,
                b.y,
                Rgba::new(STREAK_GREY, STREAK_GREY, STREAK_GREY, alpha),
            );
        }
    }

    fn name(&self) -> &str {
        "Rain"
    }
}
