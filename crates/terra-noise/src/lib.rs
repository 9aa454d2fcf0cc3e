//! Layered 3D gradient-noise filters for planetary elevation.
//!
//! A noise filter evaluates a scalar at a point in 3D space by compositing
//! octaves of simplex noise. Two variants exist: a smooth layered filter for
//! rolling continents and a ridged filter whose sharpened, weight-damped
//! octaves produce mountain ridges.

mod filter;
mod ridged;
mod settings;
mod simple;

pub use filter::{NoiseFilter, make_noise_filter};
pub use ridged::RidgedNoiseFilter;
pub use settings::{FilterVariant, NoiseLayerSettings};
pub use simple::SimpleNoiseFilter;
