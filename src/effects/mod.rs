mod lightning;
mod rain;
mod wind;

pub use lightning::{LightningStorm, StrikeEvent};
pub use rain::RainField;
pub use wind::WindField;

use crate::camera::OrbitCamera;
use crate::display::{Frame, Rgba};

/// A piece of the storm scene
pub trait Effect {
    /// Advance simulation state (called each frame)
    fn update(&mut self, dt: f32);

    /// Push this effect's primitives into the frame
    fn render(&self, camera: &OrbitCamera, frame: &mut Frame);

    /// Effect name for UI/debugging
    fn name(&self) -> &str;

    /// Light this effect adds to the sky this frame (default: none)
    fn sky_light(&self) -> Rgba {
        Rgba::default()
    }
}
