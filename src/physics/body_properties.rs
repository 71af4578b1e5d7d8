use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utilities::quaternion_wide::QuaternionWide;
use crate::utilities::vector3_wide::Vector3Wide;

/// Represents a rigid transformation.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidPose {
    /// Orientation of the pose.
    pub orientation: Quat,
    /// Position of the pose.
    pub position: Vec3,
}

impl Default for RigidPose {
    #[inline(always)]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl RigidPose {
    /// Returns a pose with a position at (0,0,0) and identity orientation.
    pub const IDENTITY: Self = Self {
        orientation: Quat::IDENTITY,
        position: Vec3::ZERO,
    };

    /// Creates a rigid pose with the given position and orientation.
    #[inline(always)]
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Creates a rigid pose with the given position and identity orientation.
    #[inline(always)]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
        }
    }
}

/// Linear and angular velocity of a body. Angular velocity is in axis-angle-rate form: the direction is the
/// rotation axis and the magnitude is the angular speed in radians per unit time.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyVelocity {
    /// Linear velocity associated with the body.
    pub linear: Vec3,
    /// Angular velocity associated with the body.
    pub angular: Vec3,
}

impl BodyVelocity {
    /// Creates a new set of body velocities. Angular velocity is set to zero.
    #[inline(always)]
    pub fn from_linear(linear: Vec3) -> Self {
        Self {
            linear,
            angular: Vec3::ZERO,
        }
    }

    /// Creates a new set of body velocities.
    #[inline(always)]
    pub fn new(linear: Vec3, angular: Vec3) -> Self {
        Self { linear, angular }
    }
}

impl From<Vec3> for BodyVelocity {
    fn from(linear: Vec3) -> Self {
        Self::from_linear(linear)
    }
}

impl fmt::Display for BodyVelocity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}, {}", self.linear, self.angular)
    }
}

/// Rigid pose with SIMD lanes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RigidPoseWide {
    pub position: Vector3Wide,
    pub orientation: QuaternionWide,
}

impl RigidPoseWide {
    #[inline(always)]
    pub fn broadcast(pose: &RigidPose, poses: &mut RigidPoseWide) {
        Vector3Wide::broadcast(pose.position, &mut poses.position);
        QuaternionWide::broadcast(pose.orientation, &mut poses.orientation);
    }

    /// Computes the offset and orientation of a child attached to a parent by `local_pose`, given the parent's orientation.
    /// The child position is relative to the parent's position.
    #[inline(always)]
    pub fn get_rotated_child_pose(
        local_pose: &RigidPoseWide,
        orientation: &QuaternionWide,
        child_position: &mut Vector3Wide,
        child_orientation: &mut QuaternionWide,
    ) {
        QuaternionWide::concatenate_without_overlap(
            &local_pose.orientation,
            orientation,
            child_orientation,
        );
        QuaternionWide::transform_without_overlap(
            &local_pose.position,
            orientation,
            child_position,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_pose_follows_parent_rotation() {
        let local = RigidPose::new(Vec3::new(1.0, 0.0, 0.0), Quat::from_rotation_y(0.4));
        let parent = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let mut local_wide = RigidPoseWide::default();
        RigidPoseWide::broadcast(&local, &mut local_wide);
        let mut parent_wide = QuaternionWide::default();
        QuaternionWide::broadcast(parent, &mut parent_wide);

        let mut child_position = Vector3Wide::default();
        let mut child_orientation = QuaternionWide::default();
        RigidPoseWide::get_rotated_child_pose(
            &local_wide,
            &parent_wide,
            &mut child_position,
            &mut child_orientation,
        );
        assert!(child_position.read_slot(0).abs_diff_eq(Vec3::Y, 1e-6));
        assert!(child_orientation
            .read_slot(0)
            .abs_diff_eq(parent * local.orientation, 1e-6));
    }

    #[test]
    fn test_velocity_round_trips_through_serde() {
        let velocity = BodyVelocity::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, -4.0, 0.5));
        let text = serde_json::to_string(&velocity).unwrap();
        let parsed: BodyVelocity = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, velocity);
    }
}
