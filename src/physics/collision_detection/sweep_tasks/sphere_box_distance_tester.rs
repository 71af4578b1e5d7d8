use crate::physics::collidables::box_shape::BoxWide;
use crate::physics::collidables::sphere::SphereWide;
use crate::physics::collision_detection::sweep_tasks::IPairDistanceTester;
use crate::utilities::quaternion_wide::QuaternionWide;
use crate::utilities::vector::Vector;
use crate::utilities::vector3_wide::Vector3Wide;
use std::simd::prelude::*;

#[derive(Debug, Default)]
pub struct SphereBoxDistanceTester;

impl IPairDistanceTester<SphereWide, BoxWide> for SphereBoxDistanceTester {
    #[inline(always)]
    fn test(
        &self,
        a: &SphereWide,
        b: &BoxWide,
        offset_b: &Vector3Wide,
        _orientation_a: &QuaternionWide,
        orientation_b: &QuaternionWide,
        _inactive_lanes: &Vector<i32>,
        intersected: &mut Vector<i32>,
        distance: &mut Vector<f32>,
        closest_a: &mut Vector3Wide,
        normal: &mut Vector3Wide,
    ) {
        // Work in the box's local space, where the sphere center is at -offset_b.
        let mut local_offset_b = Vector3Wide::default();
        QuaternionWide::transform_by_conjugate_without_overlap(
            offset_b,
            orientation_b,
            &mut local_offset_b,
        );
        let local_offset_a = -local_offset_b;
        let clamped_local_offset_a = Vector3Wide {
            x: local_offset_a.x.simd_max(-b.half_width).simd_min(b.half_width),
            y: local_offset_a.y.simd_max(-b.half_height).simd_min(b.half_height),
            z: local_offset_a.z.simd_max(-b.half_length).simd_min(b.half_length),
        };
        let mut outside_normal = Vector3Wide::default();
        Vector3Wide::subtract(&local_offset_a, &clamped_local_offset_a, &mut outside_normal);
        let outside_distance = outside_normal.length();
        outside_normal = Vector3Wide::scale(
            &outside_normal,
            &(Vector::<f32>::splat(1.0) / outside_distance),
        );

        // When the center is inside the box, push out through the face of least penetration.
        let depth_x = b.half_width - local_offset_a.x.abs();
        let depth_y = b.half_height - local_offset_a.y.abs();
        let depth_z = b.half_length - local_offset_a.z.abs();
        let use_x = depth_x.simd_le(depth_y) & depth_x.simd_le(depth_z);
        let use_y = !use_x & depth_y.simd_le(depth_z);
        let use_z = !(use_x | use_y);
        let zero = Vector::<f32>::splat(0.0);
        let one = Vector::<f32>::splat(1.0);
        let negative_one = Vector::<f32>::splat(-1.0);
        let sign_x = local_offset_a.x.simd_lt(zero).select(negative_one, one);
        let sign_y = local_offset_a.y.simd_lt(zero).select(negative_one, one);
        let sign_z = local_offset_a.z.simd_lt(zero).select(negative_one, one);
        let inside_normal = Vector3Wide {
            x: use_x.select(sign_x, zero),
            y: use_y.select(sign_y, zero),
            z: use_z.select(sign_z, zero),
        };
        let inside_depth = use_x.select(depth_x, use_y.select(depth_y, depth_z));

        let outside = outside_distance.simd_gt(Vector::splat(1e-15));
        let local_normal = Vector3Wide {
            x: outside.select(outside_normal.x, inside_normal.x),
            y: outside.select(outside_normal.y, inside_normal.y),
            z: outside.select(outside_normal.z, inside_normal.z),
        };
        QuaternionWide::transform_without_overlap(&local_normal, orientation_b, normal);
        let negative_radius = -a.radius;
        Vector3Wide::scale_to(normal, &negative_radius, closest_a);
        *distance = outside.select(outside_distance, -inside_depth) - a.radius;
        *intersected = distance.simd_le(zero).to_simd();
    }
}
