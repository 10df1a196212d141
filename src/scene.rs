//! The storm scene: lightning over rain and wind, lit by the flash

use crate::camera::OrbitCamera;
use crate::config::StormConfig;
use crate::display::{Frame, Rgba};
use crate::effects::{Effect, LightningStorm, RainField, StrikeEvent, WindField};

/// Night sky before any flash is added
const BASE_SKY: Rgba = Rgba::opaque(6, 7, 14);

pub struct StormScene {
    lightning: LightningStorm,
    /// Drawn back to front, before the bolt
    layers: Vec<Box<dyn Effect>>,
}

impl StormScene {
    pub fn new(config: &StormConfig, seed: u64) -> Self {
        let layers: Vec<Box<dyn Effect>> = vec![
            Box::new(RainField::new(&config.rain, seed ^ 0x5A1A)),
            Box::new(WindField::new(&config.wind, seed ^ 0x0A1D)),
        ];
        Self {
            lightning: LightningStorm::new(&config.lightning, seed),
            layers,
        }
    }

    /// Advance everything one tick. Returns the strike that fired, if any.
    pub fn update(&mut self, dt: f32) -> Option<StrikeEvent> {
        for layer in &mut self.layers {
            layer.update(dt);
        }
        self.lightning.update(dt);
        self.lightning.take_strike_event()
    }

    pub fn render(&self, camera: &OrbitCamera, frame: &mut Frame) {
        let sky = self
            .layers
            .iter()
            .map(|l| l.sky_light())
            .fold(BASE_SKY.saturating_add(self.lightning.sky_light()), Rgba::saturating_add);
        frame.clear(sky);

        for layer in &self.layers {
            layer.render(camera, frame);
        }
        self.lightning.render(camera, frame);
    }

    pub fn strike_now(&mut self) {
        self.lightning.strike_now();
    }

    pub fn names(&self) -> Vec<&str> {
        self.layers
            .iter()
            .map(|l| l.name())
            .chain(std::iter::once(self.lightning.name()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light_config() -> StormConfig {
        let mut config = StormConfig::default();
        config.rain.count = 50;
        config.wind.count = 50;
        config
    }

    #[test]
    fn test_layers_in_draw_order() {
        let scene = StormScene::new(&light_config(), 1);
        assert_eq!(scene.names(), vec!["Rain", "Wind", "Lightning Storm"]);
    }

    #[test]
    fn test_forced_strike_reported_once_and_brightens_sky() {
        let config = light_config();
        let camera = OrbitCamera::new(&config.camera);
        let mut scene = StormScene::new(&config, 9);
        let mut frame = Frame::new(320, 240);

        scene.update(1.0 / 60.0);
        scene.render(&camera, &mut frame);
        let dark = frame.background;

        scene.strike_now();
        assert!(scene.update(1.0 / 60.0).is_some());
        assert!(scene.update(1.0 / 60.0).is_none());
        scene.render(&camera, &mut frame);
        assert!(frame.background.b > dark.b);
    }

    #[test]
    fn test_same_seed_same_storm() {
        let config = light_config();
        let mut a = StormScene::new(&config, 77);
        let mut b = StormScene::new(&config, 77);
        for _ in 0..(60 * 15) {
            assert_eq!(a.update(1.0 / 60.0), b.update(1.0 / 60.0));
        }
    }
}
