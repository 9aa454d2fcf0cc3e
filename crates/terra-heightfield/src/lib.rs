//! 2D heightfield generation: multi-octave fractal noise maps, remapping
//! curves, edge falloff, and grayscale previews.
//!
//! The pipeline is configuration → raw fBm noise map → optional falloff
//! attenuation → remap-curve-and-multiplier pass → [`HeightMap`] with exact
//! min/max bounds, ready for the mesh builder.

mod config;
mod curve;
mod falloff;
mod heightmap;
mod preview;

pub use config::{HeightfieldSettings, NoiseConfig, NormalizeMode};
pub use curve::{CurveKey, HeightCurve, HeightCurveError};
pub use falloff::generate_falloff_map;
pub use heightmap::{HeightMap, generate_height_map, generate_noise_map};
pub use preview::PreviewImage;
