//! Storm configuration
//!
//! Every tunable of the simulation lives here as a named field. The whole
//! tree (de)serializes to JSON; missing sections and fields fall back to the
//! defaults below, so a config file only needs the values it changes.

use crate::error::ConfigError;
use crate::math3d::Vec3;
use crate::util::{RandomSource, StepMode};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_4, PI};
use std::fs;
use std::path::Path;

/// Largest recursion ceiling accepted from a config file
const MAX_DEPTH_CEILING: u32 = 16;
const MAX_PARTICLES: usize = 100_000;

/// Closed range sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalRange {
    pub min: f32,
    pub max: f32,
}

impl IntervalRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn sample(&self, rng: &mut impl RandomSource) -> f32 {
        rng.range_f32(self.min, self.max)
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(invalid(format!("{name} must be finite")));
        }
        if self.min > self.max {
            return Err(invalid(format!(
                "{name}: min ({}) exceeds max ({})",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Midpoint-displacement parameters for a single bolt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoltConfig {
    /// Initial perpendicular jitter of the first midpoint
    pub displacement_scale: f32,
    /// Multiplier applied to the jitter at each recursion level
    pub scale_falloff: f32,
    /// Segments shorter than this are emitted as-is
    pub min_segment_length: f32,
    /// Branch budget; each branch recurses with one less
    pub max_branch_depth: u32,
    /// Hard recursion bound, independent of the branch budget
    pub depth_ceiling: u32,
    /// Base branch chance, divided by `depth + 1`
    pub branch_probability: f32,
    /// Max deflection of a branch from the parent direction, radians
    pub branch_spread: f32,
    /// Branch length as a fraction of the parent segment
    pub branch_length_factor: f32,
}

impl Default for BoltConfig {
    fn default() -> Self {
        Self {
            displacement_scale: 0.5,
            scale_falloff: 0.7,
            min_segment_length: 0.2,
            max_branch_depth: 5,
            depth_ceiling: 10,
            branch_probability: 0.4,
            branch_spread: FRAC_PI_4,
            branch_length_factor: 0.6,
        }
    }
}

/// Where bolts start and land
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrikeZone {
    /// Endpoints are jittered in X and Z within +/- this
    pub half_width: f32,
    pub sky_height: f32,
    pub ground_height: f32,
}

impl Default for StrikeZone {
    fn default() -> Self {
        Self {
            half_width: 4.0,
            sky_height: 10.0,
            ground_height: -1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightningConfig {
    /// Wait before the very first strike, seconds
    pub first_interval: IntervalRange,
    /// Wait between subsequent strikes, seconds
    pub interval: IntervalRange,
    pub peak_intensity: IntervalRange,
    /// Intensity lost per second
    pub decay_rate: f32,
    pub bolt: BoltConfig,
    pub zone: StrikeZone,
}

impl Default for LightningConfig {
    fn default() -> Self {
        Self {
            first_interval: IntervalRange::new(2.0, 7.0),
            interval: IntervalRange::new(3.0, 11.0),
            peak_intensity: IntervalRange::new(3.0, 6.0),
            decay_rate: 12.0,
            bolt: BoltConfig::default(),
            zone: StrikeZone::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RainConfig {
    pub count: usize,
    /// Width of the rain cube in X and Z
    pub size: f32,
    /// Fall speed, units per second
    pub speed: f32,
    /// Streaks below this height respawn at `ceiling`
    pub floor: f32,
    pub ceiling: f32,
    /// Lowest height of the initial distribution
    pub spawn_base: f32,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            count: 2000,
            size: 20.0,
            speed: 36.0,
            floor: -10.0,
            ceiling: 15.0,
            spawn_base: -5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    pub count: usize,
    /// Particles live in x, z within +/- extent and wrap at +extent
    pub extent: f32,
    pub height: f32,
    /// Constant push along +X per 60 Hz frame
    pub drift: f32,
    /// Amplitude of the sin/cos swirl per 60 Hz frame
    pub swirl: f32,
    /// Swirl angular speed, radians per second
    pub swirl_rate: f32,
    /// Per-particle phase offset of the swirl
    pub phase_step: f32,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            count: 500,
            extent: 10.0,
            height: 15.0,
            drift: 0.03,
            swirl: 0.02,
            swirl_rate: 0.1,
            phase_step: 0.01,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub target: Vec3,
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Horizontal orbit angle, radians
    pub azimuth: f32,
    /// Angle from the +Y axis, radians
    pub polar: f32,
    pub min_polar: f32,
    pub max_polar: f32,
    pub fov_degrees: f32,
    pub near: f32,
    /// Radians per pixel of mouse drag
    pub orbit_sensitivity: f32,
    /// Fraction of the distance moved per wheel notch
    pub zoom_step: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            target: Vec3::new(0.0, 3.0, 0.0),
            distance: 22.0,
            min_distance: 2.0,
            max_distance: 60.0,
            azimuth: FRAC_PI_4,
            polar: PI * 0.42,
            min_polar: PI * 0.1,
            max_polar: PI * 0.5,
            fov_degrees: 50.0,
            near: 0.001,
            orbit_sensitivity: 0.005,
            zoom_step: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Timestep {
    Fixed { hz: f32 },
    WallClock,
}

impl Default for Timestep {
    fn default() -> Self {
        Self::Fixed { hz: 60.0 }
    }
}

impl Timestep {
    pub fn step_mode(self) -> StepMode {
        match self {
            Self::Fixed { hz } => StepMode::Fixed(1.0 / hz),
            Self::WallClock => StepMode::WallClock,
        }
    }
}

/// Root of the configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StormConfig {
    pub lightning: LightningConfig,
    pub rain: RainConfig,
    pub wind: WindConfig,
    pub camera: CameraConfig,
    pub timestep: Timestep,
}

impl StormConfig {
    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_lightning()?;
        self.validate_particles()?;
        self.validate_camera()?;
        if let Timestep::Fixed { hz } = self.timestep {
            if !(hz.is_finite() && hz > 0.0) {
                return Err(invalid(format!("timestep.hz must be positive, got {hz}")));
            }
        }
        Ok(())
    }

    fn validate_lightning(&self) -> Result<(), ConfigError> {
        let l = &self.lightning;
        l.first_interval.validate("lightning.first_interval")?;
        l.interval.validate("lightning.interval")?;
        l.peak_intensity.validate("lightning.peak_intensity")?;
        if l.first_interval.min < 0.0 || l.interval.min < 0.0 || l.peak_intensity.min < 0.0 {
            return Err(invalid("lightning ranges must be non-negative"));
        }
        non_negative("lightning.decay_rate", l.decay_rate)?;

        let b = &l.bolt;
        non_negative("lightning.bolt.displacement_scale", b.displacement_scale)?;
        non_negative("lightning.bolt.min_segment_length", b.min_segment_length)?;
        non_negative("lightning.bolt.branch_length_factor", b.branch_length_factor)?;
        non_negative("lightning.bolt.branch_spread", b.branch_spread)?;
        if !(b.scale_falloff > 0.0 && b.scale_falloff <= 1.0) {
            return Err(invalid("lightning.bolt.scale_falloff must be in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&b.branch_probability) {
            return Err(invalid("lightning.bolt.branch_probability must be in [0, 1]"));
        }
        if b.depth_ceiling == 0 || b.depth_ceiling > MAX_DEPTH_CEILING {
            return Err(invalid(format!(
                "lightning.bolt.depth_ceiling must be in 1..={MAX_DEPTH_CEILING}"
            )));
        }

        let z = &l.zone;
        non_negative("lightning.zone.half_width", z.half_width)?;
        if !(z.sky_height.is_finite() && z.ground_height.is_finite())
            || z.sky_height <= z.ground_height
        {
            return Err(invalid("lightning.zone.sky_height must be above ground_height"));
        }
        Ok(())
    }

    fn validate_particles(&self) -> Result<(), ConfigError> {
        let r = &self.rain;
        if r.count > MAX_PARTICLES || self.wind.count > MAX_PARTICLES {
            return Err(invalid(format!("particle counts are capped at {MAX_PARTICLES}")));
        }
        non_negative("rain.size", r.size)?;
        non_negative("rain.speed", r.speed)?;
        if !(r.floor.is_finite() && r.ceiling.is_finite()) || r.floor >= r.ceiling {
            return Err(invalid("rain.floor must be below rain.ceiling"));
        }

        let w = &self.wind;
        if !(w.extent.is_finite() && w.extent > 0.0) {
            return Err(invalid("wind.extent must be positive"));
        }
        non_negative("wind.height", w.height)?;
        Ok(())
    }

    fn validate_camera(&self) -> Result<(), ConfigError> {
        let c = &self.camera;
        if !(c.min_distance > 0.0 && c.min_distance <= c.max_distance) {
            return Err(invalid("camera distance bounds are inverted or non-positive"));
        }
        if !(c.min_polar > 0.0 && c.min_polar <= c.max_polar && c.max_polar < PI) {
            return Err(invalid("camera polar bounds must satisfy 0 < min <= max < pi"));
        }
        if !(c.fov_degrees > 0.0 && c.fov_degrees < 180.0) {
            return Err(invalid("camera.fov_degrees must be in (0, 180)"));
        }
        if !(c.near > 0.0) {
            return Err(invalid("camera.near must be positive"));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

fn non_negative(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be a non-negative number, got {value}")))
    }
}
