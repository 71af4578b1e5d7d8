use std::simd::prelude::*;

use crate::utilities::quaternion_wide::QuaternionWide;
use crate::utilities::vector::Vector;
use crate::utilities::vector3_wide::Vector3Wide;

pub mod capsule_pair_distance_tester;
pub mod convex_pair_sweep_task;
pub mod sphere_box_distance_tester;
pub mod sphere_capsule_distance_tester;
pub mod sphere_pair_distance_tester;

/// Defines a tester that computes the distance between two shapes at a bundle of poses.
///
/// All outputs are in the space of shape A's position (but not orientation): `offset_b` is the position of B relative
/// to A, `closest_a` is relative to A's center and `normal` points from B toward A. `intersected` lanes are -1 when the
/// shapes touch or overlap and 0 otherwise. Lanes set in `inactive_lanes` may be skipped by the tester, but every
/// output lane must still be written with a finite value.
pub trait IPairDistanceTester<TShapeWideA, TShapeWideB>: Default {
    #[allow(clippy::too_many_arguments)]
    fn test(
        &self,
        a: &TShapeWideA,
        b: &TShapeWideB,
        offset_b: &Vector3Wide,
        orientation_a: &QuaternionWide,
        orientation_b: &QuaternionWide,
        inactive_lanes: &Vector<i32>,
        intersected: &mut Vector<i32>,
        distance: &mut Vector<f32>,
        closest_a: &mut Vector3Wide,
        normal: &mut Vector3Wide,
    );
}

/// Normalizes `direction` by the precomputed `length`. Lanes where the length is too small to produce a usable
/// direction get the world up axis instead; those only occur when two centers or segments coincide.
#[inline(always)]
pub(crate) fn normalize_or_up(direction: &Vector3Wide, length: &Vector<f32>, normal: &mut Vector3Wide) {
    let usable = length.simd_gt(Vector::splat(1e-15));
    let inverse_length = Vector::<f32>::splat(1.0) / *length;
    normal.x = usable.select(direction.x * inverse_length, Vector::splat(0.0));
    normal.y = usable.select(direction.y * inverse_length, Vector::splat(1.0));
    normal.z = usable.select(direction.z * inverse_length, Vector::splat(0.0));
}
