//! City generation parameters and configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CityError;

/// Lowest band height for which a block still has one floor line above its base
pub const MIN_LEVEL_HEIGHT: f64 = 0.5;

/// Global city generation parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityParams {
    // =========================================================================
    // Site
    // =========================================================================

    /// Lower X bound of the block footprint
    pub area_min_x: f64,
    /// Lower Y bound of the block footprint
    pub area_min_y: f64,
    /// Upper X bound of the block footprint
    pub area_max_x: f64,
    /// Upper Y bound of the block footprint
    pub area_max_y: f64,

    /// Height of the ground slab and of the first partitioned band
    pub level_height: f64,

    /// Facade stripes per unit of width on the ground slab
    pub ground_stripe_density: f64,

    /// Facade stripes per unit of width on partitioned blocks
    pub block_stripe_density: f64,

    // =========================================================================
    // Partitioning
    // =========================================================================

    /// Cells whose top reaches this elevation are capped instead of split
    pub max_height: f64,

    /// Cells this narrow or narrower are capped instead of split
    pub min_cell_width: f64,

    /// A quadrant draw at or below this value is subdivided further,
    /// above it a block is built
    pub slice_threshold: f64,

    /// After building, a draw at or below this value grows the block upward,
    /// above it the block gets a roof
    pub continue_threshold: f64,

    /// Smallest extra height for an upward extension
    pub extension_min: u32,
    /// Number of distinct extension heights (`extension_min..extension_min + span`)
    pub extension_span: u32,

    // =========================================================================
    // Geometry
    // =========================================================================

    /// A style draw at or below this value picks the plain grid facade,
    /// above it the banded facade with beams
    pub plain_style_threshold: f64,

    /// Half the thickness of a doubled mullion, and the inset of band gaps
    pub beam_half_width: f64,

    /// Thickness of the slab placed on terminal footprints
    pub rooftop_thickness: f64,
}

impl Default for CityParams {
    fn default() -> Self {
        Self {
            area_min_x: -50.0,
            area_min_y: -50.0,
            area_max_x: 50.0,
            area_max_y: 50.0,
            level_height: 1.0,
            ground_stripe_density: 3.0,
            block_stripe_density: 4.0,
            max_height: 600.0,
            min_cell_width: 1.0,
            slice_threshold: 0.5,
            continue_threshold: 0.8,
            extension_min: 2,
            extension_span: 10,
            plain_style_threshold: 0.5,
            beam_half_width: 0.03,
            rooftop_thickness: 0.1,
        }
    }
}

impl CityParams {
    /// Load parameters from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, CityError> {
        let text = std::fs::read_to_string(path).map_err(|source| CityError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let params: CityParams =
            serde_json::from_str(&text).map_err(|source| CityError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        params.validate()?;
        Ok(params)
    }

    pub fn area_width(&self) -> f64 {
        self.area_max_x - self.area_min_x
    }

    pub fn area_depth(&self) -> f64 {
        self.area_max_y - self.area_min_y
    }

    /// Reject settings that would produce degenerate geometry
    pub fn validate(&self) -> Result<(), CityError> {
        let finite = [
            self.area_min_x,
            self.area_min_y,
            self.area_max_x,
            self.area_max_y,
            self.level_height,
        ];
        if finite.iter().any(|v| !v.is_finite())
            || self.area_width() <= 0.0
            || self.area_depth() <= 0.0
        {
            return Err(CityError::EmptyArea {
                min_x: self.area_min_x,
                min_y: self.area_min_y,
                max_x: self.area_max_x,
                max_y: self.area_max_y,
            });
        }

        if self.level_height < MIN_LEVEL_HEIGHT {
            return Err(invalid("level_height", "must be at least 0.5 so blocks get a floor line"));
        }
        if !(self.ground_stripe_density > 0.0) {
            return Err(invalid("ground_stripe_density", "must be positive"));
        }
        if !(self.block_stripe_density > 0.0) {
            return Err(invalid("block_stripe_density", "must be positive"));
        }
        if !(self.max_height > self.level_height) {
            return Err(invalid("max_height", "must exceed level_height"));
        }
        if !(self.min_cell_width > 0.0) {
            return Err(invalid("min_cell_width", "must be positive"));
        }
        for (name, value) in [
            ("slice_threshold", self.slice_threshold),
            ("continue_threshold", self.continue_threshold),
            ("plain_style_threshold", self.plain_style_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(name, "must lie in [0, 1]"));
            }
        }
        if self.extension_min == 0 || self.extension_span == 0 {
            return Err(invalid("extension_min/extension_span", "must both be at least 1"));
        }
        if !(self.beam_half_width >= 0.0) {
            return Err(invalid("beam_half_width", "must not be negative"));
        }
        if !(self.rooftop_thickness > 0.0) {
            return Err(invalid("rooftop_thickness", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: &str) -> CityError {
    CityError::InvalidParameter {
        name,
        reason: reason.to_string(),
    }
}
