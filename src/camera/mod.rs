//! Camera rigs and viewpoint snapshots
//!
//! Two rigs are supported: the desktop free-look camera stores its
//! orientation as Euler angles, the immersive headset rig stores a
//! quaternion in a convention rotated half a turn in yaw. All consumers
//! work on [`ViewpointSnapshot`] values, which expose a uniform
//! position/orientation/frustum capability over both rigs.

pub mod predictor;

pub use predictor::ViewpointPredictor;

use crate::core::types::{Mat3, Mat4, Quat, Vec3};
use crate::math::Frustum;

/// Half-turn yaw aligning the immersive rig's native orientation with
/// the shared convention.
pub(crate) fn yaw_flip() -> Quat {
    Quat::from_rotation_y(std::f32::consts::PI)
}

/// Orientation storage for the two supported camera kinds
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraRig {
    /// Desktop free-look camera, Euler angles in radians (YXZ order)
    Desktop { yaw: f32, pitch: f32, roll: f32 },
    /// Headset camera; the quaternion convention is yaw-flipped
    /// relative to the desktop rig
    Immersive { rotation: Quat },
}

/// Immutable record of a viewpoint at one instant
///
/// Snapshots are plain values: predicted and retargeted snapshots are
/// created, scored, and dropped without touching the live camera.
#[derive(Clone, Copy, Debug)]
pub struct ViewpointSnapshot {
    pub rig: CameraRig,
    pub position: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl ViewpointSnapshot {
    /// Snapshot of a desktop camera
    pub fn desktop(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            rig: CameraRig::Desktop { yaw, pitch, roll: 0.0 },
            position,
            fov_y: 60.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.01,
            far: 1000.0,
        }
    }

    /// Snapshot of an immersive camera, `rotation` in the rig's native
    /// (yaw-flipped) convention
    pub fn immersive(position: Vec3, rotation: Quat) -> Self {
        Self {
            rig: CameraRig::Immersive { rotation },
            position,
            fov_y: 90.0_f32.to_radians(),
            aspect: 1.0,
            near: 0.01,
            far: 1000.0,
        }
    }

    /// Orientation in the shared convention, regardless of rig
    pub fn orientation(&self) -> Quat {
        match self.rig {
            CameraRig::Desktop { yaw, pitch, roll } => {
                Quat::from_euler(glam::EulerRot::YXZ, yaw, pitch, roll)
            }
            CameraRig::Immersive { rotation } => yaw_flip() * rotation,
        }
    }

    /// Orientation exactly as the rig stores it
    fn native_orientation(&self) -> Quat {
        match self.rig {
            CameraRig::Desktop { yaw, pitch, roll } => {
                Quat::from_euler(glam::EulerRot::YXZ, yaw, pitch, roll)
            }
            CameraRig::Immersive { rotation } => rotation,
        }
    }

    /// Get forward direction (negative Z in camera space)
    pub fn forward(&self) -> Vec3 {
        self.orientation() * -Vec3::Z
    }

    /// Get view matrix (world to camera space)
    pub fn view_matrix(&self) -> Mat4 {
        let rotation_matrix = Mat4::from_quat(self.orientation().conjugate());
        let translation_matrix = Mat4::from_translation(-self.position);
        rotation_matrix * translation_matrix
    }

    /// Get projection matrix (camera to clip space)
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Get combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Frustum planes as the rig authors them
    ///
    /// The immersive rig's planes come out half a turn off in yaw;
    /// visibility code must counter-rotate first (see
    /// [`gaze_aligned`](Self::gaze_aligned)).
    pub fn frustum(&self) -> Frustum {
        let view = Mat4::from_quat(self.native_orientation().conjugate())
            * Mat4::from_translation(-self.position);
        Frustum::from_view_projection(&(self.projection_matrix() * view))
    }

    /// Copy of this snapshot whose authored frustum matches the true
    /// gaze direction. The desktop rig already does; the immersive copy
    /// gets the yaw counter-rotation baked in.
    pub fn gaze_aligned(&self) -> ViewpointSnapshot {
        let mut aligned = *self;
        if let CameraRig::Immersive { rotation } = self.rig {
            aligned.rig = CameraRig::Immersive {
                rotation: yaw_flip() * rotation,
            };
        }
        aligned
    }

    /// Copy of this snapshot retargeted to look straight at `target`
    ///
    /// Used to score how large an object would appear under direct
    /// gaze. The copy keeps the rig's native storage convention.
    pub fn looking_at(&self, target: Vec3) -> ViewpointSnapshot {
        let to_target = target - self.position;
        if to_target.length_squared() < 1e-12 {
            return *self;
        }
        let forward = to_target.normalize();
        let up_hint = if forward.y.abs() > 0.999 { Vec3::X } else { Vec3::Y };
        let right = forward.cross(up_hint).normalize();
        let up = right.cross(forward);
        let rotation = Quat::from_mat3(&Mat3::from_cols(right, up, -forward));

        let mut retargeted = *self;
        retargeted.rig = match self.rig {
            CameraRig::Desktop { roll, .. } => {
                let yaw = (-forward.x).atan2(-forward.z);
                let pitch = forward.y.asin();
                CameraRig::Desktop { yaw, pitch, roll }
            }
            CameraRig::Immersive { .. } => CameraRig::Immersive {
                rotation: yaw_flip().inverse() * rotation,
            },
        };
        retargeted
    }
}
