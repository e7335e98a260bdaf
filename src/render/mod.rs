//! Turning a finished city model into line-art images
//!
//! A [`RenderAdapter`] takes the read-only model and one [`CameraConfig`] and
//! returns the visible lines in pixel space. The result can be written as a
//! PNG or an SVG any number of times.

pub mod camera;
pub mod occlusion;
pub mod renderer;

use std::path::Path;

use crate::city::CityModel;
use crate::error::RenderError;
use crate::export;

pub use camera::CameraConfig;
pub use renderer::LineRenderer;

/// A 2D line in image coordinates (origin top-left, y down)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line2 {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// The contract between the generator and whatever draws it
pub trait RenderAdapter {
    fn render(&self, model: &CityModel, camera: &CameraConfig) -> Result<ProjectedPaths, RenderError>;
}

/// Visible lines of one view, in the pixel space of the camera that made them
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectedPaths {
    /// Width of the canvas the lines were projected onto
    pub width: f64,
    /// Height of the canvas the lines were projected onto
    pub height: f64,
    pub lines: Vec<Line2>,
}

impl ProjectedPaths {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines rescaled onto a `width` x `height` canvas
    pub fn scaled_to(&self, width: f64, height: f64) -> Vec<Line2> {
        let sx = if self.width > 0.0 { width / self.width } else { 1.0 };
        let sy = if self.height > 0.0 { height / self.height } else { 1.0 };
        self.lines
            .iter()
            .map(|l| Line2 {
                x0: l.x0 * sx,
                y0: l.y0 * sy,
                x1: l.x1 * sx,
                y1: l.y1 * sy,
            })
            .collect()
    }

    pub fn write_to_png(&self, path: &Path, width: u32, height: u32) -> Result<(), RenderError> {
        export::write_png(&self.scaled_to(f64::from(width), f64::from(height)), path, width, height)
    }

    pub fn write_to_svg(&self, path: &Path, width: u32, height: u32) -> Result<(), RenderError> {
        export::write_svg(&self.scaled_to(f64::from(width), f64::from(height)), path, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_to() {
        let paths = ProjectedPaths {
            width: 100.0,
            height: 50.0,
            lines: vec![Line2 { x0: 10.0, y0: 10.0, x1: 100.0, y1: 50.0 }],
        };
        let scaled = paths.scaled_to(200.0, 200.0);
        assert_eq!(scaled[0], Line2 { x0: 20.0, y0: 40.0, x1: 200.0, y1: 200.0 });
        assert_eq!(paths.len(), 1);
        assert!(!paths.is_empty());
    }
}
