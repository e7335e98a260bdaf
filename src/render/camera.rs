//! Camera description and perspective projection

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::geometry::{Segment, Vec3};

use super::Line2;

/// Everything a renderer needs to know about one view
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub eye: Vec3,
    /// Point the camera looks at
    pub center: Vec3,
    pub up: Vec3,
    /// Image width in pixels
    pub width: f64,
    /// Image height in pixels
    pub height: f64,
    /// Vertical field of view, degrees
    pub fovy: f64,
    /// Near clip plane distance
    pub znear: f64,
    /// Far clip plane distance
    pub zfar: f64,
    /// How finely to chop paths for visibility testing
    pub step: f64,
}

impl CameraConfig {
    /// High oblique view across the block toward the far corner
    pub fn overview(max_height: f64) -> Self {
        Self {
            eye: Vec3::new(-20.0, -20.0, max_height + 2.0),
            center: Vec3::new(45.0, 45.0, 5.0),
            up: Vec3::new(0.0, 0.0, 1.0),
            width: 800.0,
            height: 1600.0,
            fovy: 60.0,
            znear: 0.1,
            zfar: 100.0,
            step: 0.01,
        }
    }

    /// Steep view down into the middle of the block
    pub fn downtown(max_height: f64) -> Self {
        Self {
            eye: Vec3::new(-5.0, -5.0, max_height + 5.0),
            center: Vec3::new(0.0, 0.0, 10.0),
            up: Vec3::new(0.0, 0.0, 1.0),
            width: 1024.0,
            height: 1024.0,
            fovy: 60.0,
            znear: 0.1,
            zfar: 100.0,
            step: 0.01,
        }
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        let fail = |msg: &str| Err(RenderError::InvalidCamera(msg.to_string()));
        if !(self.width > 0.0 && self.height > 0.0) {
            return fail("image size must be positive");
        }
        if !(self.fovy > 0.0 && self.fovy < 180.0) {
            return fail("field of view must lie in (0, 180) degrees");
        }
        if !(self.znear > 0.0 && self.zfar > self.znear) {
            return fail("clip planes must satisfy 0 < near < far");
        }
        if !(self.step > 0.0) {
            return fail("visibility step must be positive");
        }
        let forward = self.center - self.eye;
        if forward.length() < 1e-12 {
            return fail("eye and center coincide");
        }
        if forward.normalize().cross(self.up.normalize()).length() < 1e-9 {
            return fail("up vector is parallel to the view direction");
        }
        Ok(())
    }
}

/// Look-at basis plus lens, ready to map model points onto the image
#[derive(Clone, Debug)]
pub(crate) struct Projector {
    eye: Vec3,
    right: Vec3,
    up: Vec3,
    forward: Vec3,
    near: f64,
    far: f64,
    tan_half_fovy: f64,
    aspect: f64,
    width: f64,
    height: f64,
}

impl Projector {
    pub(crate) fn new(camera: &CameraConfig) -> Result<Self, RenderError> {
        camera.validate()?;
        let forward = (camera.center - camera.eye).normalize();
        let right = forward.cross(camera.up).normalize();
        let up = right.cross(forward);
        Ok(Self {
            eye: camera.eye,
            right,
            up,
            forward,
            near: camera.znear,
            far: camera.zfar,
            tan_half_fovy: (camera.fovy.to_radians() / 2.0).tan(),
            aspect: camera.width / camera.height,
            width: camera.width,
            height: camera.height,
        })
    }

    /// Camera-space coordinates: x right, y up, z distance in front
    fn to_view(&self, p: Vec3) -> Vec3 {
        let d = p - self.eye;
        Vec3::new(d.dot(self.right), d.dot(self.up), d.dot(self.forward))
    }

    fn to_pixel(&self, v: Vec3) -> (f64, f64) {
        let ndc_x = v.x / (v.z * self.tan_half_fovy * self.aspect);
        let ndc_y = v.y / (v.z * self.tan_half_fovy);
        ((ndc_x + 1.0) / 2.0 * self.width, (1.0 - ndc_y) / 2.0 * self.height)
    }

    /// Project a segment, clipped to the depth range and the image.
    pub(crate) fn project(&self, segment: &Segment) -> Option<Line2> {
        let mut a = self.to_view(segment.a);
        let mut b = self.to_view(segment.b);

        // Clip against near and far planes; depth is linear along the segment
        for (plane, keep_greater) in [(self.near, true), (self.far, false)] {
            let inside = |v: &Vec3| if keep_greater { v.z >= plane } else { v.z <= plane };
            match (inside(&a), inside(&b)) {
                (true, true) => {}
                (false, false) => return None,
                (a_in, _) => {
                    let t = (plane - a.z) / (b.z - a.z);
                    let cut = a.lerp(b, t);
                    if a_in {
                        b = cut;
                    } else {
                        a = cut;
                    }
                }
            }
        }

        let (x0, y0) = self.to_pixel(a);
        let (x1, y1) = self.to_pixel(b);
        clip_to_rect(Line2 { x0, y0, x1, y1 }, self.width, self.height)
    }
}

/// Liang-Barsky clip of a 2D line to `[0, width] x [0, height]`
pub(crate) fn clip_to_rect(line: Line2, width: f64, height: f64) -> Option<Line2> {
    let dx = line.x1 - line.x0;
    let dy = line.y1 - line.y0;
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;

    let checks = [
        (-dx, line.x0),
        (dx, width - line.x0),
        (-dy, line.y0),
        (dy, height - line.y0),
    ];
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some(Line2 {
        x0: line.x0 + t0 * dx,
        y0: line.y0 + t0 * dy,
        x1: line.x0 + t1 * dx,
        y1: line.y0 + t1 * dy,
    })
}
