//! View frustum for visibility partitioning
//!
//! The visible/invisible partition needs exactly one question answered:
//! does an object's displayed world box reach into the camera volume.
//! Planes come out of the view-projection matrix in Gribb/Hartmann
//! half-space form; containment is the p-vertex test against each.

use crate::core::types::{Mat4, Vec3, Vec4};
use super::aabb::Aabb;

/// One clip plane in `normal · p + distance >= 0` half-space form
#[derive(Clone, Copy, Debug)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    /// Normalize raw `ax + by + cz + d` coefficients into a unit-normal
    /// plane.
    fn from_coefficients(row: Vec4) -> Self {
        let normal = Vec3::new(row.x, row.y, row.z);
        let inv_len = normal.length().recip();
        Self {
            normal: normal * inv_len,
            distance: row.w * inv_len,
        }
    }

    /// Corner of `aabb` farthest along the plane normal (p-vertex).
    fn support_point(&self, aabb: &Aabb) -> Vec3 {
        Vec3::select(self.normal.cmpge(Vec3::ZERO), aabb.max, aabb.min)
    }
}

/// Camera volume as six inward-facing planes
#[derive(Clone, Copy, Debug)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extract the six planes of a view-projection matrix: the w row
    /// plus and minus each of the z/x/y rows gives near/far, left/right
    /// and bottom/top in turn.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let w = vp.row(3);
        let mut planes = [Plane { normal: Vec3::Z, distance: 0.0 }; 6];
        for (pair, row) in [vp.row(2), vp.row(0), vp.row(1)].into_iter().enumerate() {
            planes[2 * pair] = Plane::from_coefficients(w + row);
            planes[2 * pair + 1] = Plane::from_coefficients(w - row);
        }
        Self { planes }
    }

    /// Conservative box-vs-volume test: the box is out only when its
    /// farthest corner along some plane normal still lies behind that
    /// plane.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.planes.iter().all(|plane| {
            plane.normal.dot(plane.support_point(aabb)) + plane.distance >= 0.0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_frustum() -> Frustum {
        let proj = Mat4::perspective_rh(60.0_f32.to_radians(), 1.0, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        Frustum::from_view_projection(&(proj * view))
    }

    fn unit_box_at(center: Vec3) -> Aabb {
        Aabb::from_center_half_extent(center, Vec3::splat(0.5))
    }

    #[test]
    fn test_box_in_front_vs_behind() {
        let frustum = camera_frustum();
        assert!(frustum.intersects_aabb(&unit_box_at(Vec3::ZERO)));
        assert!(!frustum.intersects_aabb(&unit_box_at(Vec3::new(0.0, 0.0, 50.0))));
    }

    #[test]
    fn test_box_beyond_far_plane_is_culled() {
        let frustum = camera_frustum();
        assert!(!frustum.intersects_aabb(&unit_box_at(Vec3::new(0.0, 0.0, -120.0))));
    }

    #[test]
    fn test_box_outside_side_planes_is_culled() {
        let frustum = camera_frustum();
        // Well off to the side at a depth that is otherwise in range
        assert!(!frustum.intersects_aabb(&unit_box_at(Vec3::new(40.0, 0.0, -5.0))));
        assert!(!frustum.intersects_aabb(&unit_box_at(Vec3::new(0.0, -40.0, -5.0))));
    }

    #[test]
    fn test_box_straddling_a_side_plane_intersects() {
        let frustum = camera_frustum();
        // At z = -5 (10 in front of the camera) the half-FOV covers
        // roughly x in [-5.8, 5.8]; a wide box centered outside still
        // pokes its near corner in
        let straddling = Aabb::from_center_half_extent(
            Vec3::new(7.0, 0.0, -5.0),
            Vec3::new(2.0, 0.5, 0.5),
        );
        assert!(frustum.intersects_aabb(&straddling));
    }

    #[test]
    fn test_planes_are_normalized() {
        let frustum = camera_frustum();
        for plane in &frustum.planes {
            assert!((plane.normal.length() - 1.0).abs() < 1e-5);
        }
    }
}
