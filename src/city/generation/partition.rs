//! Recursive quadrant partitioning of a footprint into building masses
//!
//! Each cell is split 2x2. Every quadrant is either subdivided again, or gets
//! a block that then either grows upward into a taller cell on the same
//! footprint or receives a roof. Width halves on every split and heights are
//! bounded, so the recursion always bottoms out in a rooftop cap.

use crate::city::params::CityParams;
use crate::city::types::{Block, FacadeStyle, RooftopCap};
use crate::city::CityModel;
use crate::error::CityError;
use crate::geometry::{Vec3, Volume};
use crate::seeds::RandomStream;

/// Partition `cell` (footprint plus vertical band) into blocks and caps.
///
/// Draws are consumed depth-first in quadrant order, so the same stream
/// always yields the same model.
pub fn partition_footprint<R: RandomStream>(
    cell: Volume,
    params: &CityParams,
    rng: &mut R,
    model: &mut CityModel,
) -> Result<(), CityError> {
    let min = cell.min();
    let max = cell.max();

    if max.z >= params.max_height || cell.width() <= params.min_cell_width {
        if max.z >= params.max_height {
            log::warn!("Reached max height at ({:.2}, {:.2})", min.x, min.y);
        }
        model.push_rooftop(RooftopCap::on_footprint(&cell, min.z, params.rooftop_thickness)?);
        return Ok(());
    }

    // Same count for all four quadrants, taken from the parent cell
    let stripes = (cell.width() / 2.0 * params.block_stripe_density).floor();
    if stripes < 1.0 {
        return Err(CityError::ZeroStripes { width: cell.width() / 2.0 });
    }
    let stripes = stripes as u32;

    for quadrant in quadrants(&cell)? {
        if rng.next_float() <= params.slice_threshold {
            partition_footprint(quadrant, params, rng, model)?;
            continue;
        }

        let style = FacadeStyle::draw(rng, params.plain_style_threshold);
        let block = Block::new(quadrant, stripes, style)?;
        let top = block.top();
        model.push_block(block);

        if rng.next_float() <= params.continue_threshold {
            let extra = params.extension_min + rng.next_int(params.extension_span);
            let q_min = quadrant.min();
            let q_max = quadrant.max();
            let grown = Volume::new(
                Vec3::new(q_min.x, q_min.y, top),
                Vec3::new(q_max.x, q_max.y, top + f64::from(extra)),
            )?;
            partition_footprint(grown, params, rng, model)?;
        } else {
            model.push_rooftop(RooftopCap::on_footprint(&quadrant, top, params.rooftop_thickness)?);
        }
    }

    Ok(())
}

/// The 2x2 split of a cell, each quadrant keeping the cell's band.
///
/// Order: lower-left, upper-right, upper-left, lower-right.
fn quadrants(cell: &Volume) -> Result<[Volume; 4], CityError> {
    let min = cell.min();
    let max = cell.max();
    let mid_x = (max.x - min.x) / 2.0 + min.x;
    let mid_y = (max.y - min.y) / 2.0 + min.y;

    Ok([
        Volume::new(Vec3::new(min.x, min.y, min.z), Vec3::new(mid_x, mid_y, max.z))?,
        Volume::new(Vec3::new(mid_x, mid_y, min.z), Vec3::new(max.x, max.y, max.z))?,
        Volume::new(Vec3::new(min.x, mid_y, min.z), Vec3::new(mid_x, max.y, max.z))?,
        Volume::new(Vec3::new(mid_x, min.y, min.z), Vec3::new(max.x, mid_y, max.z))?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::types::Element;
    use crate::seeds::ScriptedStream;

    const BUILD: f64 = 0.9;
    const SLICE: f64 = 0.1;
    const PLAIN: f64 = 0.2;
    const BANDED: f64 = 0.7;
    const CONTINUE: f64 = 0.3;
    const CAP: f64 = 0.95;

    fn cell(x1: f64, y1: f64, z1: f64, x2: f64, y2: f64, z2: f64) -> Volume {
        Volume::new(Vec3::new(x1, y1, z1), Vec3::new(x2, y2, z2)).unwrap()
    }

    #[test]
    fn test_narrow_cell_caps_without_drawing() {
        let params = CityParams::default();
        let mut rng = ScriptedStream::new(&[], &[]);
        let mut model = CityModel::new(params.beam_half_width);

        partition_footprint(cell(0.0, 0.0, 3.0, 0.9, 0.9, 4.0), &params, &mut rng, &mut model).unwrap();

        assert_eq!(model.elements().len(), 1);
        match &model.elements()[0] {
            Element::Rooftop(cap) => {
                assert_eq!(cap.base(), 3.0);
                assert_eq!(cap.volume().width(), 0.9);
            }
            other => panic!("expected a rooftop, got {:?}", other),
        }
        assert_eq!(model.stats().block_count, 0);
        assert_eq!(model.stats().rooftop_count, 1);
    }

    #[test]
    fn test_height_guard_caps_cell() {
        let params = CityParams::default();
        let mut rng = ScriptedStream::new(&[], &[]);
        let mut model = CityModel::new(params.beam_half_width);

        partition_footprint(cell(0.0, 0.0, 595.0, 8.0, 8.0, 600.0), &params, &mut rng, &mut model).unwrap();

        assert_eq!(model.stats().rooftop_count, 1);
        assert_eq!(model.rooftops().next().unwrap().base(), 595.0);
    }

    #[test]
    fn test_quadrant_order() {
        let q = quadrants(&cell(0.0, 0.0, 1.0, 4.0, 4.0, 2.0)).unwrap();
        let corners: Vec<(f64, f64, f64, f64)> = q
            .iter()
            .map(|v| (v.min().x, v.min().y, v.max().x, v.max().y))
            .collect();
        assert_eq!(
            corners,
            vec![
                (0.0, 0.0, 2.0, 2.0),
                (2.0, 2.0, 4.0, 4.0),
                (0.0, 2.0, 2.0, 4.0),
                (2.0, 0.0, 4.0, 2.0),
            ]
        );
        assert!(q.iter().all(|v| v.min().z == 1.0 && v.max().z == 2.0));
    }

    #[test]
    fn test_build_then_continue_grows_same_footprint() {
        let params = CityParams::default();
        // Cell of width 8 -> quadrants of width 4.
        // Quadrant 1: build, continue, extension draw 3 -> height 5.
        //   Grown cell [0,0,2]->[4,4,7] is split; its four quadrants build and cap.
        // Quadrants 2-4 of the outer cell: build and cap.
        let mut floats = vec![BUILD, BANDED, CONTINUE];
        for _ in 0..4 {
            floats.extend_from_slice(&[BUILD, PLAIN, CAP]);
        }
        for _ in 0..3 {
            floats.extend_from_slice(&[BUILD, PLAIN, CAP]);
        }
        let mut rng = ScriptedStream::new(&floats, &[3]);
        let mut model = CityModel::new(params.beam_half_width);

        partition_footprint(cell(0.0, 0.0, 1.0, 8.0, 8.0, 2.0), &params, &mut rng, &mut model).unwrap();
        assert!(rng.is_exhausted());

        let blocks: Vec<&Block> = model.blocks().collect();
        let first = blocks[0];
        assert_eq!(first.volume().min(), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(first.volume().max(), Vec3::new(4.0, 4.0, 2.0));
        assert_eq!(first.style(), FacadeStyle::BandedWithBeams);
        assert_eq!(first.stripes(), 16);

        // The next block comes from the grown cell: band [2, 7] over a quadrant of [0,4]^2
        let grown = blocks[1];
        assert_eq!(grown.volume().min(), Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(grown.volume().max(), Vec3::new(2.0, 2.0, 7.0));
        assert_eq!(grown.stripes(), 8);
        assert_eq!(grown.style(), FacadeStyle::PlainGrid);

        let grown_blocks = blocks.iter().filter(|b| b.volume().min().z == 2.0).count();
        assert_eq!(grown_blocks, 4);
        assert!(blocks
            .iter()
            .filter(|b| b.volume().min().z == 2.0)
            .all(|b| b.top() == 7.0));

        assert_eq!(model.stats().block_count, 8);
        assert_eq!(model.stats().rooftop_count, 7);
        assert_eq!(model.stats().max_height, 7.0);
    }

    #[test]
    fn test_slice_recurses_without_block() {
        let params = CityParams::default();
        // Cell width 2: quadrants of width 1 are capped by the width guard when sliced.
        let mut rng = ScriptedStream::new(&[SLICE, SLICE, SLICE, SLICE], &[]);
        let mut model = CityModel::new(params.beam_half_width);

        partition_footprint(cell(0.0, 0.0, 1.0, 2.0, 2.0, 2.0), &params, &mut rng, &mut model).unwrap();

        assert_eq!(model.stats().block_count, 0);
        assert_eq!(model.stats().rooftop_count, 4);
        assert!(model.rooftops().all(|cap| cap.base() == 1.0 && cap.volume().width() == 1.0));
    }
}
