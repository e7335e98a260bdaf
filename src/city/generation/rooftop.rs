//! Roof slabs

use crate::city::types::RooftopCap;
use crate::geometry::Segment;

/// The closed box outline of a cap: no internal structure
pub fn rooftop_segments(cap: &RooftopCap) -> Vec<Segment> {
    cap.volume().edges().to_vec()
}
