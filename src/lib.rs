//! City block massing generator
//!
//! Re-exports modules for use by binaries and tools.

pub mod city;
pub mod error;
pub mod export;
pub mod geometry;
pub mod render;
pub mod seeds;

pub use city::{generate_city, params::CityParams, CityModel, CityStats};
pub use error::{CityError, RenderError};
pub use render::{CameraConfig, LineRenderer, ProjectedPaths, RenderAdapter};
pub use seeds::{RandomStream, SeedChoice, SeedSource};
