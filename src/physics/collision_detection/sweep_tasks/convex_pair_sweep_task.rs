use crate::physics::body_properties::{BodyVelocity, RigidPose, RigidPoseWide};
use crate::physics::collidables::shape::{IConvexShape, IShapeWide};
use crate::physics::collision_detection::sweep_result::{SweepResult, SweepTermination};
use crate::physics::collision_detection::sweep_settings::SweepSettings;
use crate::physics::collision_detection::sweep_task_registry::{ISweepFilter, SweepTask};
use crate::physics::collision_detection::sweep_tasks::IPairDistanceTester;
use crate::physics::pose_integration::PoseIntegration;
use crate::utilities::quaternion_wide::QuaternionWide;
use crate::utilities::vector::{Vector, VECTOR_WIDTH};
use crate::utilities::vector3_wide::Vector3Wide;
use glam::{Quat, Vec3};
use log::{error, trace};
use std::any::{type_name, Any};
use std::marker::PhantomData;
use std::simd::prelude::*;
use std::simd::StdFloat;

/// Fraction of the proven safe advancement applied to `t0` each iteration. Keeps `t0` strictly on the safe side of
/// contact in the face of rounding.
const SAFE_ADVANCEMENT_DAMPING: f32 = 0.9999;

/// Computes the time interval during which a sphere of `radius` centered at `origin` and moving along `direction`
/// contains the coordinate origin. Returns false if there is no such interval.
///
/// A zero `direction` produces `[0, f32::MAX]` if the origin is already contained and no interval otherwise.
#[inline(always)]
pub fn get_sphere_cast_interval(
    origin: Vec3,
    direction: Vec3,
    radius: f32,
    t0: &mut f32,
    t1: &mut f32,
) -> bool {
    // Normalize the direction. Sqrts aren't *that* bad, and it both simplifies things and helps avoid numerical problems.
    let d_length = direction.length();
    if d_length == 0.0 {
        *t0 = 0.0;
        *t1 = f32::MAX;
        return origin.length_squared() <= radius * radius;
    }
    let inverse_d_length = 1.0 / d_length;
    let d = direction * inverse_d_length;

    // Move the origin up to the earliest possible impact time so the quadratic isn't solved across a huge distance.
    let t_offset = (-origin.dot(d) - radius).max(0.0);
    let o = origin + d * t_offset;
    let b = o.dot(d);
    let c = o.dot(o) - radius * radius;

    if b > 0.0 && c > 0.0 {
        // Outside and moving away.
        *t0 = 0.0;
        *t1 = 0.0;
        return false;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        *t0 = 0.0;
        *t1 = 0.0;
        return false;
    }
    let interval_radius = discriminant.sqrt();
    *t0 = (t_offset - interval_radius - b) * inverse_d_length;
    *t1 = (t_offset + interval_radius - b) * inverse_d_length;
    true
}

/// Distributes one sample time per lane evenly across `[t0, t1]`, inclusive of both ends.
#[inline(always)]
pub fn get_sample_times(t0: f32, t1: f32, samples: &mut Vector<f32>) {
    let sample_spacing = (t1 - t0) * (1.0 / (VECTOR_WIDTH as f32 - 1.0));
    for i in 0..VECTOR_WIDTH {
        samples[i] = t0 + i as f32 * sample_spacing;
    }
}

/// Adapts the advancement loop to the way the swept shapes are attached to their bodies.
pub trait ISweepModifier {
    /// Bounds the time interval in which contact is possible. Also produces a best guess hit normal and location
    /// that is reported if the loop never refines it.
    #[allow(clippy::too_many_arguments)]
    fn get_sphere_cast_interval(
        &mut self,
        offset_b: Vec3,
        linear_velocity_b: Vec3,
        maximum_t: f32,
        maximum_radius_a: f32,
        maximum_radius_b: f32,
        orientation_a: Quat,
        angular_velocity_a: Vec3,
        angular_speed_a: f32,
        orientation_b: Quat,
        angular_velocity_b: Vec3,
        angular_speed_b: f32,
        t0: &mut f32,
        t1: &mut f32,
        hit_normal: &mut Vec3,
        hit_location: &mut Vec3,
    ) -> bool;

    /// Builds the sample times over `[t0, t1]` and the shape offsets and orientations at each of them.
    #[allow(clippy::too_many_arguments)]
    fn construct_samples(
        &self,
        t0: f32,
        t1: f32,
        linear_b: &Vector3Wide,
        angular_a: &Vector3Wide,
        angular_b: &Vector3Wide,
        initial_offset_b: &Vector3Wide,
        initial_orientation_a: &QuaternionWide,
        initial_orientation_b: &QuaternionWide,
        samples: &mut Vector<f32>,
        sample_offset_b: &mut Vector3Wide,
        sample_orientation_a: &mut QuaternionWide,
        sample_orientation_b: &mut QuaternionWide,
    );

    /// Computes the extra approach speed and displacement along `normal` caused by shape centers orbiting their bodies.
    fn get_nonlinear_velocity_contribution(
        &self,
        normal: &Vector3Wide,
        velocity_contribution_a: &mut Vector<f32>,
        maximum_displacement_a: &mut Vector<f32>,
        velocity_contribution_b: &mut Vector<f32>,
        maximum_displacement_b: &mut Vector<f32>,
    );

    /// Moves a hit location computed in A's moving frame back to A's frame at time zero.
    fn adjust_hit_location(
        &self,
        initial_orientation_a: Quat,
        velocity_a: &BodyVelocity,
        t0: f32,
        hit_location: &mut Vec3,
    );
}

/// Sweep of two shapes centered on their bodies.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnoffsetSweep;

impl ISweepModifier for UnoffsetSweep {
    #[inline(always)]
    fn get_sphere_cast_interval(
        &mut self,
        offset_b: Vec3,
        linear_velocity_b: Vec3,
        _maximum_t: f32,
        maximum_radius_a: f32,
        maximum_radius_b: f32,
        _orientation_a: Quat,
        _angular_velocity_a: Vec3,
        _angular_speed_a: f32,
        _orientation_b: Quat,
        _angular_velocity_b: Vec3,
        _angular_speed_b: f32,
        t0: &mut f32,
        t1: &mut f32,
        hit_normal: &mut Vec3,
        hit_location: &mut Vec3,
    ) -> bool {
        let hit = get_sphere_cast_interval(
            offset_b,
            linear_velocity_b,
            maximum_radius_a + maximum_radius_b,
            t0,
            t1,
        );
        *hit_location = offset_b + linear_velocity_b * *t0;
        // Normals point from B to A.
        *hit_normal = (-*hit_location).normalize_or_zero();
        *hit_location += *hit_normal * maximum_radius_b;
        hit
    }

    #[inline(always)]
    fn construct_samples(
        &self,
        t0: f32,
        t1: f32,
        linear_b: &Vector3Wide,
        angular_a: &Vector3Wide,
        angular_b: &Vector3Wide,
        initial_offset_b: &Vector3Wide,
        initial_orientation_a: &QuaternionWide,
        initial_orientation_b: &QuaternionWide,
        samples: &mut Vector<f32>,
        sample_offset_b: &mut Vector3Wide,
        sample_orientation_a: &mut QuaternionWide,
        sample_orientation_b: &mut QuaternionWide,
    ) {
        get_sample_times(t0, t1, samples);
        let mut displacement = Vector3Wide::default();
        Vector3Wide::scale_to(linear_b, samples, &mut displacement);
        Vector3Wide::add(initial_offset_b, &displacement, sample_offset_b);

        let half_samples = *samples * Vector::<f32>::splat(0.5);
        PoseIntegration::integrate_orientation_wide(
            initial_orientation_a,
            angular_a,
            &half_samples,
            sample_orientation_a,
        );
        PoseIntegration::integrate_orientation_wide(
            initial_orientation_b,
            angular_b,
            &half_samples,
            sample_orientation_b,
        );
    }

    #[inline(always)]
    fn get_nonlinear_velocity_contribution(
        &self,
        _normal: &Vector3Wide,
        velocity_contribution_a: &mut Vector<f32>,
        maximum_displacement_a: &mut Vector<f32>,
        velocity_contribution_b: &mut Vector<f32>,
        maximum_displacement_b: &mut Vector<f32>,
    ) {
        *velocity_contribution_a = Vector::<f32>::splat(0.0);
        *maximum_displacement_a = Vector::<f32>::splat(0.0);
        *velocity_contribution_b = Vector::<f32>::splat(0.0);
        *maximum_displacement_b = Vector::<f32>::splat(0.0);
    }

    #[inline(always)]
    fn adjust_hit_location(
        &self,
        _initial_orientation_a: Quat,
        velocity_a: &BodyVelocity,
        t0: f32,
        hit_location: &mut Vec3,
    ) {
        *hit_location += t0 * velocity_a.linear;
    }
}

/// Sweep of two shapes attached to their bodies by a local pose, like the children of a compound.
/// A spinning body makes its child's center orbit, which adds a nonlinear component to the child's motion.
#[derive(Debug, Clone, Copy)]
pub struct OffsetSweep {
    local_pose_a: RigidPose,
    local_pose_b: RigidPose,
    tangent_speed_a: f32,
    tangent_speed_b: f32,
    twice_radius_a: f32,
    twice_radius_b: f32,
    angular_velocity_direction_a: Vec3,
    angular_velocity_direction_b: Vec3,
}

impl OffsetSweep {
    pub fn new(local_pose_a: RigidPose, local_pose_b: RigidPose) -> Self {
        Self {
            local_pose_a,
            local_pose_b,
            tangent_speed_a: 0.0,
            tangent_speed_b: 0.0,
            twice_radius_a: 0.0,
            twice_radius_b: 0.0,
            angular_velocity_direction_a: Vec3::ZERO,
            angular_velocity_direction_b: Vec3::ZERO,
        }
    }

    /// Fraction of the orbit's motion that can project onto `normal`. Motion along the rotation axis is impossible.
    #[inline(always)]
    fn orbit_projection_scale(normal: &Vector3Wide, axis: Vec3) -> Vector<f32> {
        let mut wide_axis = Vector3Wide::default();
        Vector3Wide::broadcast(axis, &mut wide_axis);
        let mut dot = Vector::<f32>::default();
        Vector3Wide::dot(normal, &wide_axis, &mut dot);
        Vector::<f32>::splat(0.0)
            .simd_max(Vector::<f32>::splat(1.0) - dot * dot)
            .sqrt()
    }
}

impl ISweepModifier for OffsetSweep {
    #[inline(always)]
    fn get_sphere_cast_interval(
        &mut self,
        offset_b: Vec3,
        linear_velocity_b: Vec3,
        maximum_t: f32,
        maximum_radius_a: f32,
        maximum_radius_b: f32,
        orientation_a: Quat,
        angular_velocity_a: Vec3,
        angular_speed_a: f32,
        orientation_b: Quat,
        angular_velocity_b: Vec3,
        angular_speed_b: f32,
        t0: &mut f32,
        t1: &mut f32,
        hit_normal: &mut Vec3,
        hit_location: &mut Vec3,
    ) -> bool {
        let r_a = orientation_a * self.local_pose_a.position;
        self.tangent_speed_a = r_a.cross(angular_velocity_a).length();
        let r_b = orientation_b * self.local_pose_b.position;
        self.tangent_speed_b = r_b.cross(angular_velocity_b).length();
        self.twice_radius_a = 2.0 * self.local_pose_a.position.length();
        self.twice_radius_b = 2.0 * self.local_pose_b.position.length();
        self.angular_velocity_direction_a = if angular_speed_a > 1e-8 {
            angular_velocity_a / angular_speed_a
        } else {
            Vec3::ZERO
        };
        self.angular_velocity_direction_b = if angular_speed_b > 1e-8 {
            angular_velocity_b / angular_speed_b
        } else {
            Vec3::ZERO
        };
        // An orbiting center can't get further from where it started than the orbit's diameter.
        let nonlinear_expansion = (maximum_t * (self.tangent_speed_a + self.tangent_speed_b))
            .min(self.twice_radius_a + self.twice_radius_b);
        let offset_b_including_child_poses = offset_b + r_b - r_a;
        let hit = get_sphere_cast_interval(
            offset_b_including_child_poses,
            linear_velocity_b,
            maximum_radius_a + maximum_radius_b + nonlinear_expansion,
            t0,
            t1,
        );
        *hit_location = offset_b_including_child_poses + linear_velocity_b * *t0;
        *hit_normal = (-*hit_location).normalize_or_zero();
        *hit_location += *hit_normal * (maximum_radius_b + nonlinear_expansion);
        hit
    }

    #[inline(always)]
    fn construct_samples(
        &self,
        t0: f32,
        t1: f32,
        linear_b: &Vector3Wide,
        angular_a: &Vector3Wide,
        angular_b: &Vector3Wide,
        initial_offset_b: &Vector3Wide,
        initial_orientation_a: &QuaternionWide,
        initial_orientation_b: &QuaternionWide,
        samples: &mut Vector<f32>,
        sample_offset_b: &mut Vector3Wide,
        sample_orientation_a: &mut QuaternionWide,
        sample_orientation_b: &mut QuaternionWide,
    ) {
        get_sample_times(t0, t1, samples);
        let mut displacement = Vector3Wide::default();
        Vector3Wide::scale_to(linear_b, samples, &mut displacement);
        let body_offset_b = *initial_offset_b + displacement;

        // The initial orientations belong to the bodies; the children are rotated into place afterwards.
        let half_samples = *samples * Vector::<f32>::splat(0.5);
        let mut local_pose_a = RigidPoseWide::default();
        RigidPoseWide::broadcast(&self.local_pose_a, &mut local_pose_a);
        let mut integrated_orientation_a = QuaternionWide::default();
        PoseIntegration::integrate_orientation_wide(
            initial_orientation_a,
            angular_a,
            &half_samples,
            &mut integrated_orientation_a,
        );
        let mut child_position_a = Vector3Wide::default();
        RigidPoseWide::get_rotated_child_pose(
            &local_pose_a,
            &integrated_orientation_a,
            &mut child_position_a,
            sample_orientation_a,
        );

        let mut local_pose_b = RigidPoseWide::default();
        RigidPoseWide::broadcast(&self.local_pose_b, &mut local_pose_b);
        let mut integrated_orientation_b = QuaternionWide::default();
        PoseIntegration::integrate_orientation_wide(
            initial_orientation_b,
            angular_b,
            &half_samples,
            &mut integrated_orientation_b,
        );
        let mut child_position_b = Vector3Wide::default();
        RigidPoseWide::get_rotated_child_pose(
            &local_pose_b,
            &integrated_orientation_b,
            &mut child_position_b,
            sample_orientation_b,
        );

        *sample_offset_b = body_offset_b + child_position_b - child_position_a;
    }

    #[inline(always)]
    fn get_nonlinear_velocity_contribution(
        &self,
        normal: &Vector3Wide,
        velocity_contribution_a: &mut Vector<f32>,
        maximum_displacement_a: &mut Vector<f32>,
        velocity_contribution_b: &mut Vector<f32>,
        maximum_displacement_b: &mut Vector<f32>,
    ) {
        let scale_a = Self::orbit_projection_scale(normal, self.angular_velocity_direction_a);
        *velocity_contribution_a = Vector::<f32>::splat(self.tangent_speed_a) * scale_a;
        *maximum_displacement_a = Vector::<f32>::splat(self.twice_radius_a) * scale_a;
        let scale_b = Self::orbit_projection_scale(normal, self.angular_velocity_direction_b);
        *velocity_contribution_b = Vector::<f32>::splat(self.tangent_speed_b) * scale_b;
        *maximum_displacement_b = Vector::<f32>::splat(self.twice_radius_b) * scale_b;
    }

    #[inline(always)]
    fn adjust_hit_location(
        &self,
        initial_orientation_a: Quat,
        velocity_a: &BodyVelocity,
        t0: f32,
        hit_location: &mut Vec3,
    ) {
        let integrated_pose = PoseIntegration::integrate_pose(
            &RigidPose::new(Vec3::ZERO, initial_orientation_a),
            velocity_a,
            t0,
        );
        let child_offset = integrated_pose.orientation * self.local_pose_a.position;
        *hit_location += integrated_pose.position + child_offset;
    }
}

/// Searches for the earliest time of impact between two convex shapes moving with constant velocities by
/// conservative advancement. Every pass samples the pair at `VECTOR_WIDTH` times at once, turns each sample's distance
/// into an interval that provably contains no contact, and merges adjacent safe intervals to push `t0` forward and
/// pull `t1` back.
#[allow(clippy::too_many_arguments)]
fn sweep<TShapeA, TShapeB, TPairDistanceTester, TSweepModifier>(
    shape_a: &TShapeA,
    orientation_a: Quat,
    velocity_a: &BodyVelocity,
    shape_b: &TShapeB,
    offset_b: Vec3,
    orientation_b: Quat,
    velocity_b: &BodyVelocity,
    settings: &SweepSettings,
    sweep_modifier: &mut TSweepModifier,
) -> SweepResult
where
    TShapeA: IConvexShape,
    TShapeB: IConvexShape,
    TPairDistanceTester: IPairDistanceTester<TShapeA::Wide, TShapeB::Wide>,
    TSweepModifier: ISweepModifier,
{
    let maximum_t = settings.maximum_t;
    let minimum_progression = settings.minimum_progression;
    let convergence_threshold = settings.convergence_threshold;

    let mut wide_a = TShapeA::Wide::default();
    let mut wide_b = TShapeB::Wide::default();
    wide_a.broadcast(shape_a);
    wide_b.broadcast(shape_b);
    // All computation happens in A's linearly moving frame.
    let linear_velocity_b = velocity_b.linear - velocity_a.linear;
    let (maximum_radius_a, maximum_angular_expansion_a) = shape_a.compute_angular_expansion_data();
    let (maximum_radius_b, maximum_angular_expansion_b) = shape_b.compute_angular_expansion_data();
    let angular_speed_a = velocity_a.angular.length();
    let angular_speed_b = velocity_b.angular.length();

    let mut t0 = 0.0f32;
    let mut t1 = 0.0f32;
    let mut hit_normal = Vec3::ZERO;
    let mut hit_location = Vec3::ZERO;
    let interval_exists = sweep_modifier.get_sphere_cast_interval(
        offset_b,
        linear_velocity_b,
        maximum_t,
        maximum_radius_a,
        maximum_radius_b,
        orientation_a,
        velocity_a.angular,
        angular_speed_a,
        orientation_b,
        velocity_b.angular,
        angular_speed_b,
        &mut t0,
        &mut t1,
        &mut hit_normal,
        &mut hit_location,
    );
    if !interval_exists {
        trace!("sweep rejected by bounding sphere cast");
        return SweepResult::bounding_miss(0.0, 0.0);
    }
    if t0 > maximum_t || t1 < 0.0 {
        trace!("bounding interval [{t0}, {t1}] lies outside [0, {maximum_t}]");
        return SweepResult::bounding_miss(t0, t1);
    }
    t0 = t0.max(0.0);
    t1 = t1.min(maximum_t);

    let tangent_speed_a = Vector::<f32>::splat(maximum_radius_a * angular_speed_a);
    let tangent_speed_b = Vector::<f32>::splat(maximum_radius_b * angular_speed_b);
    let max_angular_expansion_a = Vector::<f32>::splat(maximum_angular_expansion_a);
    let max_angular_expansion_b = Vector::<f32>::splat(maximum_angular_expansion_b);

    let mut initial_offset_b = Vector3Wide::default();
    Vector3Wide::broadcast(offset_b, &mut initial_offset_b);
    let mut initial_orientation_a = QuaternionWide::default();
    QuaternionWide::broadcast(orientation_a, &mut initial_orientation_a);
    let mut initial_orientation_b = QuaternionWide::default();
    QuaternionWide::broadcast(orientation_b, &mut initial_orientation_b);
    let mut wide_linear_velocity_b = Vector3Wide::default();
    Vector3Wide::broadcast(linear_velocity_b, &mut wide_linear_velocity_b);
    let mut wide_angular_velocity_a = Vector3Wide::default();
    Vector3Wide::broadcast(velocity_a.angular, &mut wide_angular_velocity_a);
    let mut wide_angular_velocity_b = Vector3Wide::default();
    Vector3Wide::broadcast(velocity_b.angular, &mut wide_angular_velocity_b);

    let mut samples = Vector::<f32>::default();
    let mut sample_offset_b = Vector3Wide::default();
    let mut sample_orientation_a = QuaternionWide::default();
    let mut sample_orientation_b = QuaternionWide::default();
    let minimum_progression_wide = Vector::<f32>::splat(minimum_progression);
    let zero = Vector::<f32>::splat(0.0);
    let division_guard = Vector::<f32>::splat(1e-15);
    let no_inactive_lanes = Vector::<i32>::splat(0);
    let pair_tester = TPairDistanceTester::default();

    let mut next0 = t0;
    let mut next1 = t1;
    sweep_modifier.construct_samples(
        t0,
        t1,
        &wide_linear_velocity_b,
        &wide_angular_velocity_a,
        &wide_angular_velocity_b,
        &initial_offset_b,
        &initial_orientation_a,
        &initial_orientation_b,
        &mut samples,
        &mut sample_offset_b,
        &mut sample_orientation_a,
        &mut sample_orientation_b,
    );

    let mut intersection_encountered = false;
    let mut iterations = 0u32;
    let termination = loop {
        iterations += 1;
        let mut intersections = Vector::<i32>::default();
        let mut distances = Vector::<f32>::default();
        let mut closest_a = Vector3Wide::default();
        let mut normals = Vector3Wide::default();
        pair_tester.test(
            &wide_a,
            &wide_b,
            &sample_offset_b,
            &sample_orientation_a,
            &sample_orientation_b,
            &no_inactive_lanes,
            &mut intersections,
            &mut distances,
            &mut closest_a,
            &mut normals,
        );

        // Positive when B approaches A along the normal.
        let mut linear_velocity_along_normal = Vector::<f32>::default();
        Vector3Wide::dot(&normals, &wide_linear_velocity_b, &mut linear_velocity_along_normal);
        let mut nonlinear_velocity_contribution_a = Vector::<f32>::default();
        let mut nonlinear_maximum_displacement_a = Vector::<f32>::default();
        let mut nonlinear_velocity_contribution_b = Vector::<f32>::default();
        let mut nonlinear_maximum_displacement_b = Vector::<f32>::default();
        sweep_modifier.get_nonlinear_velocity_contribution(
            &normals,
            &mut nonlinear_velocity_contribution_a,
            &mut nonlinear_maximum_displacement_a,
            &mut nonlinear_velocity_contribution_b,
            &mut nonlinear_maximum_displacement_b,
        );

        // Rotation can only move a surface so far. Once a shape's angular displacement is exhausted, only the other
        // shape's rotation and the linear motion can close the remaining distance. Each case is a valid bound, so the
        // largest of them is the safe step.
        let angular_displacement_a = max_angular_expansion_a + nonlinear_maximum_displacement_a;
        let angular_displacement_b = max_angular_expansion_b + nonlinear_maximum_displacement_b;
        let a_worst_case_distances = zero.simd_max(distances - angular_displacement_a);
        let b_worst_case_distances = zero.simd_max(distances - angular_displacement_b);
        let both_worst_case_distances = zero.simd_max(a_worst_case_distances - angular_displacement_b);
        let angular_contribution_a = nonlinear_velocity_contribution_a + tangent_speed_a;
        let angular_contribution_b = nonlinear_velocity_contribution_b + tangent_speed_b;

        let both_worst_case_next_time =
            both_worst_case_distances / division_guard.simd_max(linear_velocity_along_normal);
        let a_worst_case_next_time = a_worst_case_distances
            / division_guard.simd_max(linear_velocity_along_normal + angular_contribution_b);
        let b_worst_case_next_time = b_worst_case_distances
            / division_guard.simd_max(linear_velocity_along_normal + angular_contribution_a);
        let best_case_next_time = distances
            / division_guard.simd_max(
                linear_velocity_along_normal + angular_contribution_a + angular_contribution_b,
            );
        let time_to_next = both_worst_case_next_time
            .simd_max(a_worst_case_next_time)
            .simd_max(b_worst_case_next_time.simd_max(best_case_next_time));

        // Looking backwards in time, approaching and separating trade places.
        let both_worst_case_previous_time =
            both_worst_case_distances / division_guard.simd_max(-linear_velocity_along_normal);
        let a_worst_case_previous_time = a_worst_case_distances
            / division_guard.simd_max(angular_contribution_b - linear_velocity_along_normal);
        let b_worst_case_previous_time = b_worst_case_distances
            / division_guard.simd_max(angular_contribution_a - linear_velocity_along_normal);
        let best_case_previous_time = distances
            / division_guard.simd_max(
                angular_contribution_a + angular_contribution_b - linear_velocity_along_normal,
            );
        let time_to_previous = both_worst_case_previous_time
            .simd_max(a_worst_case_previous_time)
            .simd_max(b_worst_case_previous_time.simd_max(best_case_previous_time));

        let safe_interval_start = samples - time_to_previous;
        let safe_interval_end = samples + time_to_next;
        let forced_interval_end = samples + time_to_next.simd_max(minimum_progression_wide);

        if intersections[0] < 0 {
            // The first sample already intersects; nothing earlier in this set of samples can narrow t0.
            next1 = samples[0];
            intersection_encountered = true;
        } else {
            let mut first_intersecting_index = VECTOR_WIDTH;
            for i in 1..VECTOR_WIDTH {
                if intersections[i] < 0 {
                    first_intersecting_index = i;
                    next1 = samples[i];
                    intersection_encountered = true;
                    break;
                }
            }
            // Walk forward while each sample's safe interval overlaps the previous sample's forced advancement.
            // Speculative samples beyond the proven safe point are only trusted if the chain stays unbroken.
            let mut last_safe_index = 0usize;
            for i in 0..first_intersecting_index {
                last_safe_index = i;
                let next_index = i + 1;
                if next_index < first_intersecting_index
                    && safe_interval_start[next_index] > forced_interval_end[i]
                {
                    break;
                }
            }
            next0 = safe_interval_end[last_safe_index];
            hit_normal = normals.read_slot(last_safe_index);
            hit_location = closest_a.read_slot(last_safe_index);

            if !intersection_encountered {
                // With no intersection, t1 can be pulled back the same way from the end of the interval.
                for i in (0..VECTOR_WIDTH).rev() {
                    next1 = safe_interval_start[i];
                    if i > 0 && forced_interval_end[i - 1] < next1 {
                        break;
                    }
                }
            }
        }

        let mut sample0 = t0 + minimum_progression;
        let mut sample1 = t1 - minimum_progression;
        let previous_interval_span = t1 - t0;
        t0 += (next0 - t0) * SAFE_ADVANCEMENT_DAMPING;
        t1 = next1;

        let interval_span = t1 - t0;
        if intersection_encountered && interval_span < convergence_threshold {
            break SweepTermination::Converged;
        }
        if interval_span < 0.0 {
            break SweepTermination::Separated;
        }
        if interval_span >= previous_interval_span {
            break SweepTermination::Stalled;
        }
        if iterations >= settings.maximum_iteration_count {
            break SweepTermination::IterationLimit;
        }

        sample0 = sample0.max(t0).min(t1);
        sample1 = sample1.max(t0).min(t1);
        // Very narrow sample sets waste lanes on redundant work. Widen backwards first since the region near t0 is
        // where the next safe advancement is found, then forward by at most half of what remains.
        let minimum_span = minimum_progression * (VECTOR_WIDTH as f32 - 1.0);
        let mut sample_span = sample1 - sample0;
        if sample_span < minimum_span {
            sample0 = (sample0 - (minimum_span - sample_span)).max(t0);
            sample_span = sample1 - sample0;
            if sample_span < minimum_span {
                sample1 += (minimum_span - sample_span).min((t1 - sample1) * 0.5);
            }
        }

        sweep_modifier.construct_samples(
            sample0,
            sample1,
            &wide_linear_velocity_b,
            &wide_angular_velocity_a,
            &wide_angular_velocity_b,
            &initial_offset_b,
            &initial_orientation_a,
            &initial_orientation_b,
            &mut samples,
            &mut sample_offset_b,
            &mut sample_orientation_a,
            &mut sample_orientation_b,
        );
    };
    if termination == SweepTermination::Separated {
        // The inverted bracket can run far outside the window when the margins are huge; only its inversion matters.
        t0 = t0.min(maximum_t);
        t1 = t1.max(0.0);
    }
    sweep_modifier.adjust_hit_location(orientation_a, velocity_a, t0, &mut hit_location);
    trace!(
        "sweep finished: {termination:?} after {iterations} iterations, interval [{t0}, {t1}], intersected {intersection_encountered}"
    );
    SweepResult {
        intersected: intersection_encountered,
        t0,
        t1,
        hit_location,
        hit_normal,
        termination,
        iterations,
    }
}

/// Sweeps two convex shapes centered on their bodies against each other.
///
/// `offset_b` is the position of B relative to A at time zero. The returned hit location is relative to A's position
/// at time zero and the normal points from B toward A.
#[allow(clippy::too_many_arguments)]
pub fn sweep_convex_pair<TShapeA, TShapeB, TPairDistanceTester>(
    shape_a: &TShapeA,
    orientation_a: Quat,
    velocity_a: &BodyVelocity,
    shape_b: &TShapeB,
    offset_b: Vec3,
    orientation_b: Quat,
    velocity_b: &BodyVelocity,
    settings: &SweepSettings,
) -> SweepResult
where
    TShapeA: IConvexShape,
    TShapeB: IConvexShape,
    TPairDistanceTester: IPairDistanceTester<TShapeA::Wide, TShapeB::Wide>,
{
    sweep::<TShapeA, TShapeB, TPairDistanceTester, UnoffsetSweep>(
        shape_a,
        orientation_a,
        velocity_a,
        shape_b,
        offset_b,
        orientation_b,
        velocity_b,
        settings,
        &mut UnoffsetSweep,
    )
}

/// Sweeps two convex shapes that are attached to their bodies by local poses. Orientations and velocities describe
/// the bodies, and `offset_b` is the offset between the body positions.
#[allow(clippy::too_many_arguments)]
pub fn sweep_convex_pair_with_local_poses<TShapeA, TShapeB, TPairDistanceTester>(
    shape_a: &TShapeA,
    local_pose_a: &RigidPose,
    orientation_a: Quat,
    velocity_a: &BodyVelocity,
    shape_b: &TShapeB,
    local_pose_b: &RigidPose,
    offset_b: Vec3,
    orientation_b: Quat,
    velocity_b: &BodyVelocity,
    settings: &SweepSettings,
) -> SweepResult
where
    TShapeA: IConvexShape,
    TShapeB: IConvexShape,
    TPairDistanceTester: IPairDistanceTester<TShapeA::Wide, TShapeB::Wide>,
{
    let mut sweep_modifier = OffsetSweep::new(*local_pose_a, *local_pose_b);
    sweep::<TShapeA, TShapeB, TPairDistanceTester, OffsetSweep>(
        shape_a,
        orientation_a,
        velocity_a,
        shape_b,
        offset_b,
        orientation_b,
        velocity_b,
        settings,
        &mut sweep_modifier,
    )
}

/// Looks up the concrete shape behind type-erased shape data, logging when the data doesn't match the task.
fn downcast_shape<'a, TShape: IConvexShape>(shape_data: &'a dyn Any, task: &str) -> Option<&'a TShape> {
    let shape = shape_data.downcast_ref::<TShape>();
    if shape.is_none() {
        error!(
            "{task} received shape data that is not a {}; reporting no impact",
            type_name::<TShape>()
        );
    }
    shape
}

/// A sweep task for convex shape pairs using a pair distance tester.
pub struct ConvexPairSweepTask<TShapeA, TShapeB, TPairDistanceTester> {
    shape_type_index_a: i32,
    shape_type_index_b: i32,
    _phantom: PhantomData<fn() -> (TShapeA, TShapeB, TPairDistanceTester)>,
}

impl<TShapeA, TShapeB, TPairDistanceTester> ConvexPairSweepTask<TShapeA, TShapeB, TPairDistanceTester>
where
    TShapeA: IConvexShape,
    TShapeB: IConvexShape,
    TPairDistanceTester: IPairDistanceTester<TShapeA::Wide, TShapeB::Wide>,
{
    pub fn new() -> Self {
        Self {
            shape_type_index_a: TShapeA::TYPE_ID,
            shape_type_index_b: TShapeB::TYPE_ID,
            _phantom: PhantomData,
        }
    }
}

impl<TShapeA, TShapeB, TPairDistanceTester> Default
    for ConvexPairSweepTask<TShapeA, TShapeB, TPairDistanceTester>
where
    TShapeA: IConvexShape,
    TShapeB: IConvexShape,
    TPairDistanceTester: IPairDistanceTester<TShapeA::Wide, TShapeB::Wide>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<TShapeA, TShapeB, TPairDistanceTester> SweepTask
    for ConvexPairSweepTask<TShapeA, TShapeB, TPairDistanceTester>
where
    TShapeA: IConvexShape,
    TShapeB: IConvexShape,
    TPairDistanceTester: IPairDistanceTester<TShapeA::Wide, TShapeB::Wide>,
{
    fn shape_type_index_a(&self) -> i32 {
        self.shape_type_index_a
    }

    fn shape_type_index_b(&self) -> i32 {
        self.shape_type_index_b
    }

    fn preordered_type_sweep(
        &self,
        shape_data_a: &dyn Any,
        local_pose_a: &RigidPose,
        orientation_a: Quat,
        velocity_a: &BodyVelocity,
        shape_data_b: &dyn Any,
        local_pose_b: &RigidPose,
        offset_b: Vec3,
        orientation_b: Quat,
        velocity_b: &BodyVelocity,
        settings: &SweepSettings,
    ) -> SweepResult {
        let task = type_name::<Self>();
        let (Some(shape_a), Some(shape_b)) = (
            downcast_shape::<TShapeA>(shape_data_a, task),
            downcast_shape::<TShapeB>(shape_data_b, task),
        ) else {
            return SweepResult::bounding_miss(0.0, 0.0);
        };
        sweep_convex_pair_with_local_poses::<TShapeA, TShapeB, TPairDistanceTester>(
            shape_a,
            local_pose_a,
            orientation_a,
            velocity_a,
            shape_b,
            local_pose_b,
            offset_b,
            orientation_b,
            velocity_b,
            settings,
        )
    }

    fn preordered_type_sweep_filtered(
        &self,
        shape_data_a: &dyn Any,
        orientation_a: Quat,
        velocity_a: &BodyVelocity,
        shape_data_b: &dyn Any,
        offset_b: Vec3,
        orientation_b: Quat,
        velocity_b: &BodyVelocity,
        settings: &SweepSettings,
        _flip_required: bool,
        filter: Option<&dyn ISweepFilter>,
    ) -> SweepResult {
        // A convex pair is a single child pair, so the flip makes no difference to the filter query.
        if let Some(filter) = filter {
            if !filter.allow_test(0, 0) {
                trace!("sweep filter rejected convex pair");
                return SweepResult::filtered();
            }
        }
        let task = type_name::<Self>();
        let (Some(shape_a), Some(shape_b)) = (
            downcast_shape::<TShapeA>(shape_data_a, task),
            downcast_shape::<TShapeB>(shape_data_b, task),
        ) else {
            return SweepResult::bounding_miss(0.0, 0.0);
        };
        sweep_convex_pair::<TShapeA, TShapeB, TPairDistanceTester>(
            shape_a,
            orientation_a,
            velocity_a,
            shape_b,
            offset_b,
            orientation_b,
            velocity_b,
            settings,
        )
    }
}
