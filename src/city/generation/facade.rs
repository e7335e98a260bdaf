//! Facade wireframe for a block
//!
//! Vertical mullions run floor to roof at every stripe position on all four
//! sides. Horizontal floor lines are laid roughly every half unit of height.
//! The banded style doubles interior mullions into beams and perforates the
//! interior floor lines where they cross a beam.

use crate::city::types::{Block, FacadeStyle};
use crate::geometry::{Segment, Vec3};

/// Number of floor lines above the bottom outline.
///
/// Generated blocks are never shorter than half a unit, which gives at least
/// one. Thinner hand-built blocks are clamped to one so they keep a top outline.
pub fn band_count(height: f64) -> u32 {
    ((height / 2.0 * 4.0).floor() as u32).max(1)
}

/// All line segments describing `block`'s facades
pub fn block_segments(block: &Block, beam: f64) -> Vec<Segment> {
    let mut segments = Vec::new();
    push_mullions(block, beam, &mut segments);
    push_floor_lines(block, beam, &mut segments);
    segments
}

fn push_mullions(block: &Block, beam: f64, out: &mut Vec<Segment>) {
    let min = block.volume().min();
    let max = block.volume().max();
    let (x1, y1, z1) = (min.x, min.y, min.z);
    let (x2, y2, z2) = (max.x, max.y, max.z);
    let n = block.stripes();

    let mut upright = |x: f64, y: f64| {
        out.push(Segment::new(Vec3::new(x, y, z1), Vec3::new(x, y, z2)));
    };

    for i in 0..=n {
        let p = f64::from(i) / f64::from(n);
        let x = x1 + (x2 - x1) * p;
        let y = y1 + (y2 - y1) * p;

        let edge = i == 0 || i == n;
        if edge || block.style() == FacadeStyle::PlainGrid {
            upright(x, y1);
            upright(x, y2);
            upright(x1, y);
            upright(x2, y);
        } else {
            upright(x - beam, y1);
            upright(x + beam, y1);
            upright(x - beam, y2);
            upright(x + beam, y2);
            upright(x1, y - beam);
            upright(x1, y + beam);
            upright(x2, y - beam);
            upright(x2, y + beam);
        }
    }
}

fn push_floor_lines(block: &Block, beam: f64, out: &mut Vec<Segment>) {
    let min = block.volume().min();
    let max = block.volume().max();
    let (x1, y1, z1) = (min.x, min.y, min.z);
    let (x2, y2, z2) = (max.x, max.y, max.z);
    let bands = band_count(z2 - z1);
    let n = block.stripes();

    for i in 0..=bands {
        let z = z1 + (z2 - z1) * (f64::from(i) / f64::from(bands));
        let outline = i == 0 || i == bands || block.style() == FacadeStyle::PlainGrid;

        if outline {
            out.push(Segment::new(Vec3::new(x1, y1, z), Vec3::new(x1, y2, z)));
            out.push(Segment::new(Vec3::new(x2, y1, z), Vec3::new(x2, y2, z)));
            out.push(Segment::new(Vec3::new(x1, y1, z), Vec3::new(x2, y1, z)));
            out.push(Segment::new(Vec3::new(x1, y2, z), Vec3::new(x2, y2, z)));
            continue;
        }

        // Sides running along Y at x1 and x2
        for x in [x1, x2] {
            for (a, b) in perforated_run(y1, y2, n, beam) {
                out.push(Segment::new(Vec3::new(x, a, z), Vec3::new(x, b, z)));
            }
        }
        // Sides running along X at y1 and y2
        for y in [y1, y2] {
            for (a, b) in perforated_run(x1, x2, n, beam) {
                out.push(Segment::new(Vec3::new(a, y, z), Vec3::new(b, y, z)));
            }
        }
    }
}

/// Pieces of an edge from `start` to `end` with a gap around every column.
///
/// The two corner pieces come first, then one piece after each interior
/// column. Pieces of non-positive length are dropped.
fn perforated_run(start: f64, end: f64, stripes: u32, beam: f64) -> Vec<(f64, f64)> {
    let gap = (end - start) / f64::from(stripes);
    let mut pieces = Vec::with_capacity(stripes as usize + 1);

    pieces.push((start, start + gap - beam));
    pieces.push((end - gap + beam, end));
    for k in 1..stripes {
        let column = start + (end - start) * (f64::from(k) / f64::from(stripes));
        pieces.push((column + beam, column + gap - beam));
    }

    pieces.retain(|(a, b)| b > a);
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Volume;

    fn block(style: FacadeStyle) -> Block {
        let volume = Volume::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 1.0)).unwrap();
        Block::new(volume, 4, style).unwrap()
    }

    fn is_vertical(s: &Segment) -> bool {
        s.a.x == s.b.x && s.a.y == s.b.y
    }

    #[test]
    fn test_band_count() {
        assert_eq!(band_count(1.0), 2);
        assert_eq!(band_count(5.0), 10);
        assert_eq!(band_count(0.5), 1);
        assert_eq!(band_count(0.1), 1);
    }

    #[test]
    fn test_plain_grid_counts() {
        let segments = block_segments(&block(FacadeStyle::PlainGrid), 0.03);
        let vertical = segments.iter().filter(|s| is_vertical(s)).count();
        // 4 uprights per stripe position, 5 positions
        assert_eq!(vertical, 20);
        // 3 full outlines (bands = 2)
        assert_eq!(segments.len() - vertical, 12);
    }

    #[test]
    fn test_banded_counts() {
        let segments = block_segments(&block(FacadeStyle::BandedWithBeams), 0.03);
        let vertical = segments.iter().filter(|s| is_vertical(s)).count();
        // Corners: 2 positions x 4, interior: 3 positions x 8
        assert_eq!(vertical, 32);
        // Two outlines plus one perforated band: 4 sides x (2 corners + 3 interior)
        assert_eq!(segments.len() - vertical, 8 + 20);
    }

    #[test]
    fn test_beams_straddle_stripe_positions() {
        let segments = block_segments(&block(FacadeStyle::BandedWithBeams), 0.03);
        let on_south_face: Vec<f64> = segments
            .iter()
            .filter(|s| is_vertical(s) && s.a.y == 0.0)
            .map(|s| s.a.x)
            .collect();
        let near = |target: f64| on_south_face.iter().any(|x| (x - target).abs() < 1e-9);
        assert!(near(0.0));
        assert!(near(0.47) && near(0.53));
        assert!(near(1.47) && near(1.53));
        assert!(near(2.0));
        assert!(!near(0.5));
    }

    #[test]
    fn test_uprights_span_full_height() {
        let segments = block_segments(&block(FacadeStyle::PlainGrid), 0.03);
        assert!(segments
            .iter()
            .filter(|s| is_vertical(s))
            .all(|s| s.a.z == 0.0 && s.b.z == 1.0));
    }

    #[test]
    fn test_perforated_run_leaves_gaps() {
        let pieces = perforated_run(0.0, 2.0, 4, 0.03);
        assert_eq!(pieces.len(), 5);
        // Corner pieces
        assert!((pieces[0].0 - 0.0).abs() < 1e-12 && (pieces[0].1 - 0.47).abs() < 1e-12);
        assert!((pieces[1].0 - 1.53).abs() < 1e-12 && (pieces[1].1 - 2.0).abs() < 1e-12);
        // First interior piece starts just past column 1
        assert!((pieces[2].0 - 0.53).abs() < 1e-12 && (pieces[2].1 - 0.97).abs() < 1e-12);
        // No piece covers a column position
        for k in 1..4 {
            let column = 0.5 * k as f64;
            assert!(pieces.iter().all(|(a, b)| !(*a < column && column < *b)));
        }
    }

    #[test]
    fn test_non_square_block_spaces_each_side_by_its_own_length() {
        let volume = Volume::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0)).unwrap();
        let block = Block::new(volume, 4, FacadeStyle::BandedWithBeams).unwrap();
        let segments = block_segments(&block, 0.03);

        // Perforated band at z = 0.5 on the west side (x = 0, running along Y)
        let mut west: Vec<(f64, f64)> = segments
            .iter()
            .filter(|s| s.a.x == 0.0 && s.b.x == 0.0 && s.a.z == 0.5 && s.b.z == 0.5)
            .map(|s| (s.a.y, s.b.y))
            .collect();
        west.sort_by(|a, b| a.0.total_cmp(&b.0));
        assert_eq!(west.len(), 5);
        // Gap is depth / stripes = 0.25, not width / stripes = 0.5
        assert!((west[0].1 - 0.22).abs() < 1e-12);
        assert!((west[1].0 - 0.28).abs() < 1e-12 && (west[1].1 - 0.47).abs() < 1e-12);
        assert!(west
            .iter()
            .any(|(a, b)| (a - 0.78).abs() < 1e-12 && (b - 1.0).abs() < 1e-12));

        // South side (y = 0, running along X) uses width / stripes = 0.5
        let south_first = segments
            .iter()
            .filter(|s| s.a.y == 0.0 && s.b.y == 0.0 && s.a.z == 0.5 && s.a.x == 0.0)
            .map(|s| s.b.x)
            .next()
            .unwrap();
        assert!((south_first - 0.47).abs() < 1e-12);

        // Mullions on the west side sit at the same quarter-depth positions
        let west_uprights: Vec<f64> = segments
            .iter()
            .filter(|s| is_vertical(s) && s.a.x == 0.0)
            .map(|s| s.a.y)
            .collect();
        assert!(west_uprights.iter().any(|y| (y - 0.22).abs() < 1e-12));
        assert!(west_uprights.iter().any(|y| (y - 0.28).abs() < 1e-12));
    }

    #[test]
    fn test_perforated_run_drops_degenerate_pieces() {
        // Gap smaller than two beams leaves nothing between columns
        let pieces = perforated_run(0.0, 0.5, 10, 0.03);
        assert!(pieces.iter().all(|(a, b)| b > a));
        assert!(pieces.len() < 11);
    }
}
