//! Procedural lightning
//!
//! A strike timer decides when a bolt fires, the path builder grows a fractal
//! polyline from sky to ground, and the intensity decay turns each strike
//! into a flash that drains back to dark. [`LightningGenerator`] ties the
//! three together behind a per-frame `step`.

mod bolt;
mod generator;
mod intensity;
mod timer;

pub use generator::{LightningGenerator, LightningSnapshot};
