//! Procedural generation algorithms for city blocks
//!
//! - Quadrant partitioning that decides where masses go
//! - Facade wireframes for blocks
//! - Roof slabs for terminal footprints

pub mod facade;
pub mod partition;
pub mod rooftop;
