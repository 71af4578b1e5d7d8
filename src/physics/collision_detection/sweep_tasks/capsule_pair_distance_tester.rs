use crate::physics::collidables::capsule::CapsuleWide;
use crate::physics::collision_detection::sweep_tasks::{normalize_or_up, IPairDistanceTester};
use crate::utilities::quaternion_wide::QuaternionWide;
use crate::utilities::vector::Vector;
use crate::utilities::vector3_wide::Vector3Wide;
use std::simd::prelude::*;

#[derive(Debug, Default)]
pub struct CapsulePairDistanceTester;

impl IPairDistanceTester<CapsuleWide, CapsuleWide> for CapsulePairDistanceTester {
    #[inline(always)]
    fn test(
        &self,
        a: &CapsuleWide,
        b: &CapsuleWide,
        offset_b: &Vector3Wide,
        orientation_a: &QuaternionWide,
        orientation_b: &QuaternionWide,
        _inactive_lanes: &Vector<i32>,
        intersected: &mut Vector<i32>,
        distance: &mut Vector<f32>,
        closest_a: &mut Vector3Wide,
        normal: &mut Vector3Wide,
    ) {
        // Closest points between the two unclamped lines first.
        // Minimizing ||(a + da * ta) - (b + db * tb)|| with unit da and db gives
        // ta = (da * (b - a) + (db * (a - b)) * (da * db)) / (1 - (da * db)^2)
        let da = QuaternionWide::transform_unit_y(orientation_a);
        let db = QuaternionWide::transform_unit_y(orientation_b);
        let mut da_offset_b = Vector::<f32>::default();
        Vector3Wide::dot(&da, offset_b, &mut da_offset_b);
        let mut db_offset_b = Vector::<f32>::default();
        Vector3Wide::dot(&db, offset_b, &mut db_offset_b);
        let mut dadb = Vector::<f32>::default();
        Vector3Wide::dot(&da, &db, &mut dadb);
        // Parallel axes divide by ~zero; the extreme values that result are clamped below.
        let mut ta = (da_offset_b - db_offset_b * dadb)
            / Vector::<f32>::splat(1e-15).simd_max(Vector::<f32>::splat(1.0) - dadb * dadb);
        let mut tb = ta * dadb - db_offset_b;

        // Clamping ta and tb to their own segments independently is not enough. Project each segment onto the other,
        // clamp the projection against the target's extent, and clamp the parameter to that projected interval.
        let absdadb = dadb.abs();
        let b_onto_a_offset = b.half_length * absdadb;
        let a_onto_b_offset = a.half_length * absdadb;
        let a_min = (-a.half_length).simd_max((da_offset_b - b_onto_a_offset).simd_min(a.half_length));
        let a_max = a.half_length.simd_min((-a.half_length).simd_max(da_offset_b + b_onto_a_offset));
        let b_min = (-b.half_length).simd_max((-a_onto_b_offset - db_offset_b).simd_min(b.half_length));
        let b_max = b.half_length.simd_min((-b.half_length).simd_max(a_onto_b_offset - db_offset_b));
        ta = ta.simd_max(a_min).simd_min(a_max);
        tb = tb.simd_max(b_min).simd_min(b_max);

        let mut segment_closest_a = Vector3Wide::default();
        Vector3Wide::scale_to(&da, &ta, &mut segment_closest_a);
        let closest_b = Vector3Wide::scale(&db, &tb) + *offset_b;

        let mut b_to_a = Vector3Wide::default();
        Vector3Wide::subtract(&segment_closest_a, &closest_b, &mut b_to_a);
        let segment_distance = b_to_a.length();
        normalize_or_up(&b_to_a, &segment_distance, normal);
        let a_offset = Vector3Wide::scale(normal, &a.radius);
        *closest_a = segment_closest_a - a_offset;
        *distance = segment_distance - a.radius - b.radius;
        *intersected = distance.simd_le(Vector::<f32>::splat(0.0)).to_simd();
    }
}
