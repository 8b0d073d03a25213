//! Utility metrics: how desirable is streaming this object next
//!
//! Five interchangeable scoring functions over (object, viewpoint),
//! selected at runtime. Scoring never mutates the object or the
//! caller's camera; retargeted cameras are temporary values dropped
//! after the pass.

use crate::camera::ViewpointSnapshot;
use crate::core::types::Vec2;
use crate::math::{hull::projected_area, Aabb};
use crate::streaming::object::StreamableObject;

/// Stand-in for the unbounded score of an object at zero distance
const POINT_BLANK: f32 = 1e12;

/// Utility metric selector
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MetricKind {
    /// Inverse squared distance to the viewpoint
    #[default]
    Distance,
    /// Inverse squared distance weighted by world surface area
    Surface,
    /// On-screen area of the projected bounding box
    Visible,
    /// On-screen area under a camera retargeted straight at the object
    Potential,
    /// Visible area, or a negative potential-ordered fallback when
    /// the object is off screen
    VisiblePotential,
}

impl MetricKind {
    /// Score one object against one viewpoint.
    pub fn score(&self, object: &StreamableObject, viewpoint: &ViewpointSnapshot) -> f32 {
        match self {
            MetricKind::Distance => distance_score(object, viewpoint),
            MetricKind::Surface => surface_score(object, viewpoint),
            MetricKind::Visible => visible_score(object, viewpoint),
            MetricKind::Potential => potential_score(object, viewpoint),
            MetricKind::VisiblePotential => {
                let visible = visible_score(object, viewpoint);
                if visible > 0.0 {
                    visible
                } else {
                    // Negative so it never collides with a positive
                    // visible score, still ordered by potential
                    -potential_score(object, viewpoint).cos()
                }
            }
        }
    }
}

fn inverse_square(distance_squared: f32) -> f32 {
    if distance_squared <= f32::EPSILON {
        POINT_BLANK
    } else {
        1.0 / distance_squared
    }
}

fn distance_score(object: &StreamableObject, viewpoint: &ViewpointSnapshot) -> f32 {
    inverse_square((object.position() - viewpoint.position).length_squared())
}

fn surface_score(object: &StreamableObject, viewpoint: &ViewpointSnapshot) -> f32 {
    let area = object.world_surface_area().unwrap_or(0.0);
    area * inverse_square((object.position() - viewpoint.position).length_squared())
}

fn visible_score(object: &StreamableObject, viewpoint: &ViewpointSnapshot) -> f32 {
    match object.world_bounds() {
        Some(bounds) => screen_coverage(&bounds, viewpoint),
        None => 0.0,
    }
}

fn potential_score(object: &StreamableObject, viewpoint: &ViewpointSnapshot) -> f32 {
    let Some(bounds) = object.world_bounds() else {
        return 0.0;
    };
    let retargeted = viewpoint.looking_at(bounds.center());
    screen_coverage(&bounds, &retargeted)
}

/// Fraction of the unit screen rectangle covered by the box's projected
/// convex hull. Corners behind the camera are dropped; fewer than 3
/// surviving corners cover nothing.
fn screen_coverage(bounds: &Aabb, viewpoint: &ViewpointSnapshot) -> f32 {
    let vp = viewpoint.view_projection();
    let mut points = Vec::with_capacity(8);
    for corner in bounds.corners() {
        let clip = vp * corner.extend(1.0);
        if clip.w <= 1e-6 {
            continue;
        }
        let ndc = clip.truncate() / clip.w;
        points.push(Vec2::new(ndc.x * 0.5 + 0.5, ndc.y * 0.5 + 0.5));
    }
    projected_area(&points)
}
