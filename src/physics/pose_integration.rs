use glam::{Quat, Vec3};
use std::simd::prelude::*;

use crate::physics::body_properties::{BodyVelocity, RigidPose};
use crate::utilities::math_helper;
use crate::utilities::quaternion_wide::QuaternionWide;
use crate::utilities::vector::Vector;
use crate::utilities::vector3_wide::Vector3Wide;

/// Angular speeds at or below this are treated as no rotation at all.
const MINIMUM_ANGULAR_SPEED: f32 = 1e-15;

/// Provides helper functions for integrating body poses over a time span with constant velocity.
pub struct PoseIntegration;

impl PoseIntegration {
    /// Integrates a position by linear velocity over dt.
    #[inline(always)]
    pub fn integrate_position(position: Vec3, linear_velocity: Vec3, dt: f32) -> Vec3 {
        position + linear_velocity * dt
    }

    /// Integrates an orientation by angular velocity over dt.
    ///
    /// Uses the same trigonometric approximation as [`PoseIntegration::integrate_orientation_wide`], so a lane of the wide
    /// result and the scalar result agree.
    #[inline(always)]
    pub fn integrate_orientation(orientation: Quat, angular_velocity: Vec3, dt: f32) -> Quat {
        // All orientation integration assumes piecewise constant angular velocity; no gyroscopic terms.
        let speed = angular_velocity.length();
        if speed > MINIMUM_ANGULAR_SPEED {
            let half_angle = speed * dt * 0.5;
            let scale = math_helper::sin(half_angle) / speed;
            let increment = Quat::from_xyzw(
                angular_velocity.x * scale,
                angular_velocity.y * scale,
                angular_velocity.z * scale,
                math_helper::cos(half_angle),
            );
            (increment * orientation).normalize()
        } else {
            orientation
        }
    }

    /// Integrates a full pose by a body velocity over dt.
    #[inline(always)]
    pub fn integrate_pose(pose: &RigidPose, velocity: &BodyVelocity, dt: f32) -> RigidPose {
        RigidPose {
            position: Self::integrate_position(pose.position, velocity.linear, dt),
            orientation: Self::integrate_orientation(pose.orientation, velocity.angular, dt),
        }
    }

    /// Integrates an orientation by angular velocity over twice `half_dt`, lane by lane.
    /// Lanes with effectively zero angular speed are passed through untouched.
    pub fn integrate_orientation_wide(
        start: &QuaternionWide,
        angular_velocity: &Vector3Wide,
        half_dt: &Vector<f32>,
        integrated: &mut QuaternionWide,
    ) {
        let speed = angular_velocity.length();
        let half_angle = speed * *half_dt;
        let mut s = Vector::<f32>::default();
        let mut c = Vector::<f32>::default();
        math_helper::get_sin_cos_wide(half_angle, &mut s, &mut c);
        let scale = s / speed;
        let increment = QuaternionWide {
            x: angular_velocity.x * scale,
            y: angular_velocity.y * scale,
            z: angular_velocity.z * scale,
            w: c,
        };
        let mut end = QuaternionWide::default();
        QuaternionWide::concatenate_without_overlap(start, &increment, &mut end);
        end = QuaternionWide::normalize(end);
        let speed_valid = speed.simd_gt(Vector::<f32>::splat(MINIMUM_ANGULAR_SPEED));
        *integrated = QuaternionWide::conditional_select(speed_valid, &end, start);
    }
}
