//! Building element types
//!
//! A city model is an ordered list of [`Element`]s. Both kinds wrap a
//! [`Volume`]; a block adds its facade description on top.

use crate::error::CityError;
use crate::geometry::{Vec3, Volume};
use crate::seeds::RandomStream;

/// Facade treatment of a block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FacadeStyle {
    /// Doubled mullions and perforated window bands
    BandedWithBeams,
    /// Single mullions and solid floor lines
    PlainGrid,
}

impl FacadeStyle {
    /// One uniform draw: at or below `plain_threshold` gives a plain grid
    pub fn draw<R: RandomStream>(rng: &mut R, plain_threshold: f64) -> Self {
        if rng.next_float() <= plain_threshold {
            FacadeStyle::PlainGrid
        } else {
            FacadeStyle::BandedWithBeams
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FacadeStyle::BandedWithBeams => "Banded",
            FacadeStyle::PlainGrid => "Plain grid",
        }
    }
}

/// Number of facade stripes for a width at a given density
pub fn stripe_count(width: f64, density: f64) -> Result<u32, CityError> {
    let stripes = (width * density).floor();
    if stripes >= 1.0 && stripes.is_finite() {
        Ok(stripes as u32)
    } else {
        Err(CityError::ZeroStripes { width })
    }
}

/// One building mass. Immutable once created.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    volume: Volume,
    stripes: u32,
    style: FacadeStyle,
}

impl Block {
    pub fn new(volume: Volume, stripes: u32, style: FacadeStyle) -> Result<Self, CityError> {
        if stripes == 0 {
            return Err(CityError::ZeroStripes {
                width: volume.width(),
            });
        }
        Ok(Self {
            volume,
            stripes,
            style,
        })
    }

    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    pub fn stripes(&self) -> u32 {
        self.stripes
    }

    pub fn style(&self) -> FacadeStyle {
        self.style
    }

    /// Elevation of the block's roof line
    pub fn top(&self) -> f64 {
        self.volume.max().z
    }
}

/// Thin slab marking where a building branch stops growing
#[derive(Clone, Debug, PartialEq)]
pub struct RooftopCap {
    volume: Volume,
}

impl RooftopCap {
    /// Cap covering `footprint`, resting at `elevation`
    pub fn on_footprint(footprint: &Volume, elevation: f64, thickness: f64) -> Result<Self, CityError> {
        let min = footprint.min();
        let max = footprint.max();
        let volume = Volume::new(
            Vec3::new(min.x, min.y, elevation),
            Vec3::new(max.x, max.y, elevation + thickness),
        )?;
        Ok(Self { volume })
    }

    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    /// Elevation the cap rests on
    pub fn base(&self) -> f64 {
        self.volume.min().z
    }
}

/// An entry of the city model
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    Block(Block),
    Rooftop(RooftopCap),
}

impl Element {
    pub fn volume(&self) -> &Volume {
        match self {
            Element::Block(block) => block.volume(),
            Element::Rooftop(cap) => cap.volume(),
        }
    }
}
