//! City block massing generation
//!
//! This module turns one seed into an architectural massing model:
//! - A ground slab spanning the whole site
//! - Nested building masses from recursive quadrant partitioning
//! - Roof slabs where a building branch stops growing
//!
//! The finished [`CityModel`] is read-only and can be flattened into line
//! segments for any number of renders.

pub mod generation;
pub mod params;
pub mod types;

use crate::error::CityError;
use crate::geometry::{Segment, Vec3, Volume};
use crate::seeds::{RandomStream, SeedSource};

use generation::{facade::block_segments, partition::partition_footprint, rooftop::rooftop_segments};
use params::CityParams;
use types::{stripe_count, Block, Element, FacadeStyle, RooftopCap};

/// Summary figures kept up to date while the model is built
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CityStats {
    /// Highest block roof line
    pub max_height: f64,
    pub block_count: usize,
    pub rooftop_count: usize,
}

/// Ordered blocks and roof caps. Insertion order is render order.
#[derive(Clone, Debug, PartialEq)]
pub struct CityModel {
    elements: Vec<Element>,
    stats: CityStats,
    beam_half_width: f64,
}

impl CityModel {
    /// Empty model whose banded facades use `beam_half_width`
    pub fn new(beam_half_width: f64) -> Self {
        Self {
            elements: Vec::new(),
            stats: CityStats::default(),
            beam_half_width,
        }
    }

    /// Generate the model for `seed` with the given parameters
    pub fn from_seed(seed: i64, params: &CityParams) -> Result<Self, CityError> {
        let mut rng = SeedSource::new(seed);
        log::debug!("generating city from seed {}", rng.seed());
        generate_city(params, &mut rng)
    }

    pub(crate) fn push_block(&mut self, block: Block) {
        if block.top() > self.stats.max_height {
            self.stats.max_height = block.top();
        }
        self.stats.block_count += 1;
        self.elements.push(Element::Block(block));
    }

    pub(crate) fn push_rooftop(&mut self, cap: RooftopCap) {
        self.stats.rooftop_count += 1;
        self.elements.push(Element::Rooftop(cap));
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn stats(&self) -> CityStats {
        self.stats
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.elements.iter().filter_map(|e| match e {
            Element::Block(block) => Some(block),
            Element::Rooftop(_) => None,
        })
    }

    pub fn rooftops(&self) -> impl Iterator<Item = &RooftopCap> {
        self.elements.iter().filter_map(|e| match e {
            Element::Rooftop(cap) => Some(cap),
            Element::Block(_) => None,
        })
    }

    /// Number of blocks dressed in `style`
    pub fn style_count(&self, style: FacadeStyle) -> usize {
        self.blocks().filter(|b| b.style() == style).count()
    }

    /// Every element's volume, for occlusion tests
    pub fn volumes(&self) -> Vec<Volume> {
        self.elements.iter().map(|e| *e.volume()).collect()
    }

    /// Number of segments [`CityModel::segments`] yields
    pub fn segment_count(&self) -> usize {
        self.elements
            .iter()
            .map(|element| match element {
                Element::Block(block) => block_segments(block, self.beam_half_width).len(),
                Element::Rooftop(cap) => rooftop_segments(cap).len(),
            })
            .sum()
    }

    /// Flattened wireframe of the whole model, in element order
    pub fn segments(&self) -> Vec<Segment> {
        let mut segments = Vec::new();
        for element in &self.elements {
            match element {
                Element::Block(block) => segments.extend(block_segments(block, self.beam_half_width)),
                Element::Rooftop(cap) => segments.extend(rooftop_segments(cap)),
            }
        }
        segments
    }
}

/// Build a city model from a random stream.
///
/// The ground slab always comes first; its facade style is the first draw.
/// The partitioner then runs once over the whole site, one level up.
pub fn generate_city<R: RandomStream>(params: &CityParams, rng: &mut R) -> Result<CityModel, CityError> {
    params.validate()?;

    let mut model = CityModel::new(params.beam_half_width);

    let ground = Volume::new(
        Vec3::new(params.area_min_x, params.area_min_y, 0.0),
        Vec3::new(params.area_max_x, params.area_max_y, params.level_height),
    )?;
    let stripes = stripe_count(params.area_width(), params.ground_stripe_density)?;
    let style = FacadeStyle::draw(rng, params.plain_style_threshold);
    model.push_block(Block::new(ground, stripes, style)?);

    let first_level = Volume::new(
        Vec3::new(params.area_min_x, params.area_min_y, params.level_height),
        Vec3::new(params.area_max_x, params.area_max_y, 2.0 * params.level_height),
    )?;
    partition_footprint(first_level, params, rng, &mut model)?;

    let stats = model.stats();
    log::debug!(
        "generated {} blocks, {} rooftops, max height {:.1}",
        stats.block_count,
        stats.rooftop_count,
        stats.max_height
    );

    Ok(model)
}
