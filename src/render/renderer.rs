//! Built-in line renderer
//!
//! Projects every wireframe segment through a look-at perspective camera.
//! With hidden-line removal on, each segment that reaches the image is
//! chopped into `step`-long pieces and a piece survives only when the ray
//! from its midpoint to the eye is not blocked by any element volume.
//! Occluders are looked up through an [`OcclusionGrid`].

use rayon::prelude::*;

use crate::city::CityModel;
use crate::error::RenderError;
use crate::geometry::{Segment, Vec3};

use super::camera::{CameraConfig, Projector};
use super::occlusion::{OcclusionGrid, DEFAULT_CELL_SIZE};
use super::{Line2, ProjectedPaths, RenderAdapter};

#[derive(Clone, Copy, Debug)]
pub struct LineRenderer {
    pub hidden_line_removal: bool,
}

impl Default for LineRenderer {
    fn default() -> Self {
        Self {
            hidden_line_removal: true,
        }
    }
}

impl LineRenderer {
    pub fn new(hidden_line_removal: bool) -> Self {
        Self { hidden_line_removal }
    }
}

impl RenderAdapter for LineRenderer {
    fn render(&self, model: &CityModel, camera: &CameraConfig) -> Result<ProjectedPaths, RenderError> {
        let projector = Projector::new(camera)?;
        let segments = model.segments();

        let lines: Vec<Line2> = if self.hidden_line_removal {
            let grid = OcclusionGrid::new(model.volumes(), DEFAULT_CELL_SIZE);
            segments
                .par_iter()
                .filter(|s| projector.project(s).is_some())
                .flat_map_iter(|s| visible_runs(s, camera.eye, camera.step, &grid))
                .filter_map(|s| projector.project(&s))
                .collect()
        } else {
            segments.par_iter().filter_map(|s| projector.project(s)).collect()
        };

        log::debug!("projected {} of {} segments", lines.len(), segments.len());

        Ok(ProjectedPaths {
            width: camera.width,
            height: camera.height,
            lines,
        })
    }
}

/// Sub-segments of `segment` that can be seen from `eye`, consecutive visible
/// pieces merged back together
fn visible_runs(segment: &Segment, eye: Vec3, step: f64, grid: &OcclusionGrid) -> Vec<Segment> {
    let pieces = (segment.length() / step).ceil().max(1.0) as usize;
    let mut runs = Vec::new();
    let mut run_start: Option<f64> = None;

    for i in 0..pieces {
        let t0 = i as f64 / pieces as f64;
        let t1 = (i + 1) as f64 / pieces as f64;
        let mid = segment.a.lerp(segment.b, (t0 + t1) / 2.0);

        if !grid.is_blocked(mid, eye) {
            run_start.get_or_insert(t0);
        } else if let Some(start) = run_start.take() {
            runs.push(Segment::new(segment.a.lerp(segment.b, start), segment.a.lerp(segment.b, t0)));
        }
    }
    if let Some(start) = run_start {
        runs.push(Segment::new(segment.a.lerp(segment.b, start), segment.b));
    }
    runs
}
