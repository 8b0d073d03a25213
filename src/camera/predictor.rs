//! Viewpoint prediction by linear extrapolation of camera motion

use crate::camera::{yaw_flip, CameraRig, ViewpointSnapshot};
use crate::core::types::Quat;

/// Minimum frame delta accepted as a prediction baseline
const MIN_FRAME_DELTA: f32 = 1e-6;

fn wrap_angle(angle: f32) -> f32 {
    let tau = std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(tau);
    if wrapped > std::f32::consts::PI {
        wrapped - tau
    } else {
        wrapped
    }
}

/// Predicts future viewpoints from the last two tracked snapshots.
///
/// [`track`](Self::track) must be called exactly once per render tick,
/// after all camera mutation for the frame; the tracked pose becomes
/// the "previous" sample for the next tick. Tracking before movement is
/// applied leaves predictions one tick stale.
pub struct ViewpointPredictor {
    current: Option<ViewpointSnapshot>,
    previous: Option<ViewpointSnapshot>,
    frame_delta: f32,
}

impl ViewpointPredictor {
    pub fn new() -> Self {
        Self {
            current: None,
            previous: None,
            frame_delta: 1.0 / 60.0,
        }
    }

    /// Record the viewpoint rendered this tick.
    pub fn track(&mut self, snapshot: ViewpointSnapshot, frame_delta: f32) {
        self.previous = self.current.replace(snapshot);
        self.frame_delta = frame_delta.max(MIN_FRAME_DELTA);
    }

    /// The live viewpoint, if one was tracked.
    pub fn current(&self) -> Option<&ViewpointSnapshot> {
        self.current.as_ref()
    }

    /// New, independent snapshot of where the viewpoint will be after
    /// `delta_seconds`, by linear extrapolation of the last frame step.
    ///
    /// Returns `None` until two snapshots have been tracked. The result
    /// is a disposable value; dropping it releases everything.
    pub fn predict(&self, delta_seconds: f32) -> Option<ViewpointSnapshot> {
        let current = self.current?;
        let previous = self.previous?;
        let factor = delta_seconds / self.frame_delta;

        let mut predicted = current;
        predicted.position =
            current.position + (current.position - previous.position) * factor;
        predicted.rig = match (current.rig, previous.rig) {
            (
                CameraRig::Desktop { yaw, pitch, roll },
                CameraRig::Desktop {
                    yaw: prev_yaw,
                    pitch: prev_pitch,
                    roll: prev_roll,
                },
            ) => CameraRig::Desktop {
                yaw: yaw + wrap_angle(yaw - prev_yaw) * factor,
                pitch: pitch + wrap_angle(pitch - prev_pitch) * factor,
                roll: roll + wrap_angle(roll - prev_roll) * factor,
            },
            (
                CameraRig::Immersive { rotation },
                CameraRig::Immersive { rotation: prev_rotation },
            ) => CameraRig::Immersive {
                rotation: extrapolate_headset(rotation, prev_rotation, factor),
            },
            // Rig changed between ticks; no motion baseline to extend
            (rig, _) => rig,
        };

        Some(predicted)
    }
}

/// Scale the incremental headset rotation by `factor`.
///
/// Both samples are moved into the shared convention before the delta
/// is taken and the result moved back, so the yaw-flipped storage does
/// not bend the extrapolation axis.
fn extrapolate_headset(rotation: Quat, prev_rotation: Quat, factor: f32) -> Quat {
    let flip = yaw_flip();
    let current = flip * rotation;
    let previous = flip * prev_rotation;

    let delta = current * previous.inverse();
    let (axis, mut angle) = delta.to_axis_angle();
    if angle > std::f32::consts::PI {
        angle -= std::f32::consts::TAU;
    }
    let step = Quat::from_axis_angle(axis, angle * factor);

    flip.inverse() * (step * current).normalize()
}

impl Default for ViewpointPredictor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec3;

    #[test]
    fn test_no_history_no_prediction() {
        let mut predictor = ViewpointPredictor::new();
        assert!(predictor.predict(0.5).is_none());

        predictor.track(ViewpointSnapshot::desktop(Vec3::ZERO, 0.0, 0.0), 1.0 / 60.0);
        assert!(predictor.predict(0.5).is_none());
        assert!(predictor.current().is_some());
    }

    #[test]
    fn test_position_extrapolation() {
        let mut predictor = ViewpointPredictor::new();

        // 10 m/s along X at 1s frames
        predictor.track(ViewpointSnapshot::desktop(Vec3::ZERO, 0.0, 0.0), 1.0);
        predictor.track(
            ViewpointSnapshot::desktop(Vec3::new(10.0, 0.0, 0.0), 0.0, 0.0),
            1.0,
        );

        let predicted = predictor.predict(0.5).unwrap();
        assert!((predicted.position.x - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_desktop_yaw_extrapolation() {
        let mut predictor = ViewpointPredictor::new();

        predictor.track(ViewpointSnapshot::desktop(Vec3::ZERO, 0.0, 0.0), 1.0);
        predictor.track(ViewpointSnapshot::desktop(Vec3::ZERO, 0.1, 0.0), 1.0);

        let predicted = predictor.predict(2.0).unwrap();
        match predicted.rig {
            CameraRig::Desktop { yaw, .. } => assert!((yaw - 0.3).abs() < 1e-5),
            _ => panic!("rig changed during prediction"),
        }
    }

    #[test]
    fn test_desktop_yaw_wraps_across_pi() {
        let mut predictor = ViewpointPredictor::new();
        let pi = std::f32::consts::PI;

        // Crossing the -pi/+pi seam must not spin the long way round
        predictor.track(ViewpointSnapshot::desktop(Vec3::ZERO, pi - 0.05, 0.0), 1.0);
        predictor.track(ViewpointSnapshot::desktop(Vec3::ZERO, -pi + 0.05, 0.0), 1.0);

        let predicted = predictor.predict(1.0).unwrap();
        match predicted.rig {
            CameraRig::Desktop { yaw, .. } => {
                assert!((wrap_angle(yaw - (-pi + 0.15))).abs() < 1e-4, "yaw {yaw}")
            }
            _ => panic!("rig changed during prediction"),
        }
    }

    #[test]
    fn test_headset_extrapolation() {
        let mut predictor = ViewpointPredictor::new();

        let step = Quat::from_rotation_y(0.1);
        predictor.track(ViewpointSnapshot::immersive(Vec3::ZERO, Quat::IDENTITY), 1.0);
        predictor.track(ViewpointSnapshot::immersive(Vec3::ZERO, step), 1.0);

        let predicted = predictor.predict(2.0).unwrap();
        match predicted.rig {
            CameraRig::Immersive { rotation } => {
                let expected = Quat::from_rotation_y(0.3);
                assert!(rotation.angle_between(expected) < 1e-4);
            }
            _ => panic!("rig changed during prediction"),
        }
    }

    #[test]
    fn test_prediction_is_independent_value() {
        let mut predictor = ViewpointPredictor::new();
        predictor.track(ViewpointSnapshot::desktop(Vec3::ZERO, 0.0, 0.0), 1.0);
        predictor.track(
            ViewpointSnapshot::desktop(Vec3::new(1.0, 0.0, 0.0), 0.0, 0.0),
            1.0,
        );

        let predicted = predictor.predict(1.0).unwrap();
        drop(predicted);

        // Live snapshot unaffected by the prediction's lifetime
        assert_eq!(
            predictor.current().unwrap().position,
            Vec3::new(1.0, 0.0, 0.0)
        );
    }
}
