//! Uniform XY grid over the model's volumes for occlusion queries
//!
//! Every occluder is an axis-aligned box standing on the site, so a 2D grid
//! over the footprint is enough. A ray is walked cell by cell with a DDA and
//! only the volumes registered in the cells it crosses are slab-tested. Each
//! column also remembers the highest roof inside it, which lets the walk skip
//! cells the ray passes above and stop once it climbs over the whole model.

use crate::geometry::{Vec3, Volume};

/// Default cell edge, about the width of the smallest partitioned footprint
pub const DEFAULT_CELL_SIZE: f64 = 1.0;

/// Slack added around footprints so hits on cell borders are never missed
const PAD: f64 = 1e-3;

#[derive(Clone, Debug)]
pub struct OcclusionGrid {
    volumes: Vec<Volume>,
    origin_x: f64,
    origin_y: f64,
    cell: f64,
    nx: usize,
    ny: usize,
    /// Indices into `volumes`, one list per cell, row-major in y
    cells: Vec<Vec<u32>>,
    /// Highest volume top per cell
    column_top: Vec<f64>,
    top: f64,
}

impl OcclusionGrid {
    pub fn new(volumes: Vec<Volume>, cell: f64) -> Self {
        let cell = if cell > 0.0 { cell } else { DEFAULT_CELL_SIZE };

        let mut lo = (f64::INFINITY, f64::INFINITY);
        let mut hi = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        let mut top = f64::NEG_INFINITY;
        for v in &volumes {
            lo = (lo.0.min(v.min().x), lo.1.min(v.min().y));
            hi = (hi.0.max(v.max().x), hi.1.max(v.max().y));
            top = top.max(v.max().z);
        }
        if volumes.is_empty() {
            lo = (0.0, 0.0);
            hi = (0.0, 0.0);
        }

        let origin_x = lo.0 - PAD;
        let origin_y = lo.1 - PAD;
        let nx = (((hi.0 + PAD - origin_x) / cell).ceil() as usize).max(1);
        let ny = (((hi.1 + PAD - origin_y) / cell).ceil() as usize).max(1);

        let mut grid = Self {
            volumes: Vec::new(),
            origin_x,
            origin_y,
            cell,
            nx,
            ny,
            cells: vec![Vec::new(); nx * ny],
            column_top: vec![f64::NEG_INFINITY; nx * ny],
            top,
        };

        for (index, v) in volumes.iter().enumerate() {
            let (ix0, iy0) = grid.cell_of(v.min().x - PAD, v.min().y - PAD);
            let (ix1, iy1) = grid.cell_of(v.max().x + PAD, v.max().y + PAD);
            for iy in iy0..=iy1 {
                for ix in ix0..=ix1 {
                    let c = iy * nx + ix;
                    grid.cells[c].push(index as u32);
                    grid.column_top[c] = grid.column_top[c].max(v.max().z);
                }
            }
        }
        grid.volumes = volumes;
        grid
    }

    /// Grid cell holding a point, clamped to the grid
    fn cell_of(&self, x: f64, y: f64) -> (usize, usize) {
        let clamp = |v: f64, n: usize| (v.floor().max(0.0) as usize).min(n - 1);
        (
            clamp((x - self.origin_x) / self.cell, self.nx),
            clamp((y - self.origin_y) / self.cell, self.ny),
        )
    }

    /// True when some volume lies between `point` and `eye`
    pub fn is_blocked(&self, point: Vec3, eye: Vec3) -> bool {
        let to_eye = eye - point;
        let distance = to_eye.length();
        if distance == 0.0 || self.volumes.is_empty() {
            return false;
        }
        let dir = to_eye.normalize();

        let Some((t_start, t_end)) = self.clip_xy(point, dir, distance) else {
            return false;
        };

        let entry = point + dir * t_start;
        let (cx, cy) = self.cell_of(entry.x, entry.y);
        let (mut ix, mut iy) = (cx as isize, cy as isize);

        let (step_x, mut next_x, delta_x) = self.axis_walk(point.x, dir.x, ix, self.origin_x);
        let (step_y, mut next_y, delta_y) = self.axis_walk(point.y, dir.y, iy, self.origin_y);

        let z_at = |t: f64| point.z + dir.z * t;
        let mut t = t_start;

        loop {
            let t_exit = next_x.min(next_y).min(t_end);
            let c = iy as usize * self.nx + ix as usize;

            if z_at(t).min(z_at(t_exit)) <= self.column_top[c] + PAD {
                for &v in &self.cells[c] {
                    if matches!(self.volumes[v as usize].intersect_ray(point, dir), Some(hit) if hit < distance) {
                        return true;
                    }
                }
            }

            if t_exit >= t_end {
                return false;
            }
            // Climbing and already above every roof
            if dir.z >= 0.0 && z_at(t_exit) > self.top + PAD {
                return false;
            }

            if next_x < next_y {
                ix += step_x;
                t = next_x;
                next_x += delta_x;
            } else {
                iy += step_y;
                t = next_y;
                next_y += delta_y;
            }
            if ix < 0 || iy < 0 || ix >= self.nx as isize || iy >= self.ny as isize {
                return false;
            }
        }
    }

    /// Step direction, distance to the first cell border and distance
    /// between borders along one axis
    fn axis_walk(&self, start: f64, dir: f64, index: isize, origin: f64) -> (isize, f64, f64) {
        if dir > 0.0 {
            let border = origin + (index + 1) as f64 * self.cell;
            (1, (border - start) / dir, self.cell / dir)
        } else if dir < 0.0 {
            let border = origin + index as f64 * self.cell;
            (-1, (border - start) / dir, -self.cell / dir)
        } else {
            (0, f64::INFINITY, f64::INFINITY)
        }
    }

    /// Parameter range of the ray `[0, distance]` inside the grid's footprint
    fn clip_xy(&self, origin: Vec3, dir: Vec3, distance: f64) -> Option<(f64, f64)> {
        let mut t0: f64 = 0.0;
        let mut t1 = distance;
        let bounds = [
            (origin.x, dir.x, self.origin_x, self.origin_x + self.nx as f64 * self.cell),
            (origin.y, dir.y, self.origin_y, self.origin_y + self.ny as f64 * self.cell),
        ];
        for (start, d, lo, hi) in bounds {
            if d == 0.0 {
                if start < lo || start > hi {
                    return None;
                }
                continue;
            }
            let a = (lo - start) / d;
            let b = (hi - start) / d;
            t0 = t0.max(a.min(b));
            t1 = t1.min(a.max(b));
        }
        (t0 <= t1).then_some((t0, t1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::params::CityParams;
    use crate::city::CityModel;

    fn boxed(min: (f64, f64, f64), max: (f64, f64, f64)) -> Volume {
        Volume::new(Vec3::new(min.0, min.1, min.2), Vec3::new(max.0, max.1, max.2)).unwrap()
    }

    fn blocked_brute_force(point: Vec3, eye: Vec3, volumes: &[Volume]) -> bool {
        let to_eye = eye - point;
        let distance = to_eye.length();
        let dir = to_eye.normalize();
        volumes
            .iter()
            .any(|v| matches!(v.intersect_ray(point, dir), Some(t) if t < distance))
    }

    #[test]
    fn test_volume_registered_in_every_covered_cell() {
        let grid = OcclusionGrid::new(vec![boxed((0.0, 0.0, 0.0), (3.0, 2.0, 1.0))], 1.0);
        assert!(grid.nx >= 3 && grid.ny >= 2);
        let covered = grid.cells.iter().filter(|c| !c.is_empty()).count();
        assert!(covered >= 6);
        assert!(grid.column_top.iter().all(|t| *t == 1.0));
    }

    #[test]
    fn test_tower_blocks_view_across_it() {
        let grid = OcclusionGrid::new(
            vec![
                boxed((-10.0, -10.0, 0.0), (10.0, 10.0, 1.0)),
                boxed((-1.0, -1.0, 1.0), (1.0, 1.0, 20.0)),
            ],
            1.0,
        );
        let eye = Vec3::new(-30.0, 0.0, 5.0);
        assert!(grid.is_blocked(Vec3::new(5.0, 0.0, 3.0), eye));
        assert!(!grid.is_blocked(Vec3::new(5.0, 5.0, 3.0), eye));
        // Above the tower the walk ends early and finds nothing
        assert!(!grid.is_blocked(Vec3::new(5.0, 0.0, 25.0), Vec3::new(-30.0, 0.0, 30.0)));
    }

    #[test]
    fn test_vertical_ray_stays_in_one_column() {
        let grid = OcclusionGrid::new(vec![boxed((0.0, 0.0, 5.0), (2.0, 2.0, 6.0))], 1.0);
        assert!(grid.is_blocked(Vec3::new(1.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 10.0)));
        assert!(!grid.is_blocked(Vec3::new(3.0, 3.0, 0.0), Vec3::new(3.0, 3.0, 10.0)));
    }

    #[test]
    fn test_eye_outside_grid() {
        let grid = OcclusionGrid::new(vec![boxed((0.0, 0.0, 0.0), (1.0, 1.0, 1.0))], 0.5);
        assert!(grid.is_blocked(Vec3::new(2.0, 0.5, 0.5), Vec3::new(-5.0, 0.5, 0.5)));
        assert!(!grid.is_blocked(Vec3::new(2.0, 0.5, 0.5), Vec3::new(5.0, 0.5, 0.5)));
        assert!(!OcclusionGrid::new(Vec::new(), 1.0).is_blocked(Vec3::default(), Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_grid_agrees_with_testing_every_volume() {
        let params = CityParams {
            area_min_x: -6.0,
            area_min_y: -6.0,
            area_max_x: 6.0,
            area_max_y: 6.0,
            ..CityParams::default()
        };
        let eyes = [
            Vec3::new(-20.0, -20.0, 30.0),
            Vec3::new(-5.0, -5.0, 12.0),
            Vec3::new(15.0, -3.0, 2.5),
        ];
        for seed in [3, 8, 21] {
            let model = CityModel::from_seed(seed, &params).unwrap();
            let volumes = model.volumes();
            let grid = OcclusionGrid::new(volumes.clone(), DEFAULT_CELL_SIZE);
            for segment in model.segments().iter().step_by(7) {
                let mid = segment.a.lerp(segment.b, 0.5);
                for eye in eyes {
                    assert_eq!(
                        grid.is_blocked(mid, eye),
                        blocked_brute_force(mid, eye, &volumes),
                        "seed {} point {:?} eye {:?}",
                        seed,
                        mid,
                        eye
                    );
                }
            }
        }
    }
}
