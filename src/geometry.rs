//! Basic 3D primitives shared by the generator and the renderer

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::error::CityError;

/// A point or direction in model space. Z is up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero-length input
    pub fn normalize(self) -> Vec3 {
        let len = self.length();
        if len > 1e-12 {
            self * (1.0 / len)
        } else {
            Vec3::default()
        }
    }

    pub fn lerp(self, other: Vec3, t: f64) -> Vec3 {
        self + (other - self) * t
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// A straight 3D line segment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a: Vec3,
    pub b: Vec3,
}

impl Segment {
    pub const fn new(a: Vec3, b: Vec3) -> Self {
        Self { a, b }
    }

    pub fn length(&self) -> f64 {
        (self.b - self.a).length()
    }
}

/// Axis-aligned rectangular prism.
///
/// Every axis of `max` strictly exceeds the same axis of `min`; the only way
/// to build one is through [`Volume::new`], which enforces it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Volume {
    min: Vec3,
    max: Vec3,
}

impl Volume {
    pub fn new(min: Vec3, max: Vec3) -> Result<Self, CityError> {
        if max.x > min.x && max.y > min.y && max.z > min.z {
            Ok(Self { min, max })
        } else {
            Err(CityError::InvalidVolume { min, max })
        }
    }

    pub fn min(&self) -> Vec3 {
        self.min
    }

    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// Extent along X
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Extent along Y
    pub fn depth(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Extent along Z
    pub fn height(&self) -> f64 {
        self.max.z - self.min.z
    }

    /// True when this volume's footprint covers `other`'s footprint
    pub fn footprint_contains(&self, other: &Volume) -> bool {
        const EPS: f64 = 1e-9;
        self.min.x <= other.min.x + EPS
            && self.min.y <= other.min.y + EPS
            && self.max.x >= other.max.x - EPS
            && self.max.y >= other.max.y - EPS
    }

    /// The twelve edges of the box
    pub fn edges(&self) -> [Segment; 12] {
        let (x1, y1, z1) = (self.min.x, self.min.y, self.min.z);
        let (x2, y2, z2) = (self.max.x, self.max.y, self.max.z);
        let c = |x, y, z| Vec3::new(x, y, z);
        [
            // bottom ring
            Segment::new(c(x1, y1, z1), c(x2, y1, z1)),
            Segment::new(c(x2, y1, z1), c(x2, y2, z1)),
            Segment::new(c(x2, y2, z1), c(x1, y2, z1)),
            Segment::new(c(x1, y2, z1), c(x1, y1, z1)),
            // top ring
            Segment::new(c(x1, y1, z2), c(x2, y1, z2)),
            Segment::new(c(x2, y1, z2), c(x2, y2, z2)),
            Segment::new(c(x2, y2, z2), c(x1, y2, z2)),
            Segment::new(c(x1, y2, z2), c(x1, y1, z2)),
            // uprights
            Segment::new(c(x1, y1, z1), c(x1, y1, z2)),
            Segment::new(c(x2, y1, z1), c(x2, y1, z2)),
            Segment::new(c(x2, y2, z1), c(x2, y2, z2)),
            Segment::new(c(x1, y2, z1), c(x1, y2, z2)),
        ]
    }

    /// Ray/box slab test.
    ///
    /// Returns the distance along `direction` to the first surface hit ahead of
    /// `origin`. Hits closer than `1e-3` are ignored so a ray leaving a face it
    /// starts on does not count as blocked by that face.
    pub fn intersect_ray(&self, origin: Vec3, direction: Vec3) -> Option<f64> {
        let n = Vec3::new(
            (self.min.x - origin.x) / direction.x,
            (self.min.y - origin.y) / direction.y,
            (self.min.z - origin.z) / direction.z,
        );
        let f = Vec3::new(
            (self.max.x - origin.x) / direction.x,
            (self.max.y - origin.y) / direction.y,
            (self.max.z - origin.z) / direction.z,
        );
        let t0 = n.x.min(f.x).max(n.y.min(f.y)).max(n.z.min(f.z));
        let t1 = n.x.max(f.x).min(n.y.max(f.y)).min(n.z.max(f.z));

        const TOLERANCE: f64 = 1e-3;
        if t0 < TOLERANCE && t1 > TOLERANCE {
            Some(t1)
        } else if t0 >= TOLERANCE && t0 < t1 {
            Some(t0)
        } else {
            None
        }
    }
}
