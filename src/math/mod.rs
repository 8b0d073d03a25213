//! Mathematical utilities and data structures

pub mod aabb;
pub mod frustum;
pub mod hull;

pub use aabb::Aabb;
pub use frustum::{Plane, Frustum};
pub use hull::{convex_hull, clip_unit_square, polygon_area, projected_area};
