//! Error types for city generation and rendering

use std::path::PathBuf;

use thiserror::Error;

use crate::geometry::Vec3;

/// Errors raised while configuring or generating a city model
#[derive(Debug, Error)]
pub enum CityError {
    #[error("invalid volume: max {max:?} must exceed min {min:?} on every axis")]
    InvalidVolume { min: Vec3, max: Vec3 },

    #[error("block footprint of width {width} yields zero facade stripes")]
    ZeroStripes { width: f64 },

    #[error("invalid area: ({min_x}, {min_y}) -> ({max_x}, {max_y}) is empty")]
    EmptyArea {
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while projecting or writing a view
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid camera: {0}")]
    InvalidCamera(String),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
