use crate::physics::collidables::sphere::SphereWide;
use crate::physics::collision_detection::sweep_tasks::{normalize_or_up, IPairDistanceTester};
use crate::utilities::quaternion_wide::QuaternionWide;
use crate::utilities::vector::Vector;
use crate::utilities::vector3_wide::Vector3Wide;
use std::simd::prelude::*;

#[derive(Debug, Default)]
pub struct SpherePairDistanceTester;

impl IPairDistanceTester<SphereWide, SphereWide> for SpherePairDistanceTester {
    #[inline(always)]
    fn test(
        &self,
        a: &SphereWide,
        b: &SphereWide,
        offset_b: &Vector3Wide,
        _orientation_a: &QuaternionWide,
        _orientation_b: &QuaternionWide,
        _inactive_lanes: &Vector<i32>,
        intersected: &mut Vector<i32>,
        distance: &mut Vector<f32>,
        closest_a: &mut Vector3Wide,
        normal: &mut Vector3Wide,
    ) {
        let center_distance = offset_b.length();
        normalize_or_up(&-*offset_b, &center_distance, normal);
        *distance = center_distance - a.radius - b.radius;
        let negative_radius_a = -a.radius;
        Vector3Wide::scale_to(normal, &negative_radius_a, closest_a);
        *intersected = distance.simd_le(Vector::<f32>::splat(0.0)).to_simd();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collidables::shape::IShapeWide;
    use crate::physics::collidables::sphere::Sphere;
    use glam::{Quat, Vec3};

    #[test]
    fn test_separated_spheres() {
        let mut a = SphereWide::default();
        a.broadcast(&Sphere::new(1.0));
        let mut b = SphereWide::default();
        b.broadcast(&Sphere::new(0.5));
        let mut offset_b = Vector3Wide::default();
        Vector3Wide::broadcast(Vec3::new(0.0, 0.0, 4.0), &mut offset_b);
        let mut identity = QuaternionWide::default();
        QuaternionWide::broadcast(Quat::IDENTITY, &mut identity);

        let mut intersected = Vector::<i32>::default();
        let mut distance = Vector::<f32>::default();
        let mut closest_a = Vector3Wide::default();
        let mut normal = Vector3Wide::default();
        SpherePairDistanceTester.test(
            &a,
            &b,
            &offset_b,
            &identity,
            &identity,
            &Vector::splat(0),
            &mut intersected,
            &mut distance,
            &mut closest_a,
            &mut normal,
        );
        assert_eq!(intersected[0], 0);
        assert_eq!(distance[0], 2.5);
        assert_eq!(normal.read_slot(0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(closest_a.read_slot(0), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_concentric_spheres_get_finite_normal() {
        let mut a = SphereWide::default();
        a.broadcast(&Sphere::new(1.0));
        let offset_b = Vector3Wide::default();
        let identity = QuaternionWide::default();
        let mut intersected = Vector::<i32>::default();
        let mut distance = Vector::<f32>::default();
        let mut closest_a = Vector3Wide::default();
        let mut normal = Vector3Wide::default();
        SpherePairDistanceTester.test(
            &a,
            &a,
            &offset_b,
            &identity,
            &identity,
            &Vector::splat(0),
            &mut intersected,
            &mut distance,
            &mut closest_a,
            &mut normal,
        );
        assert_eq!(intersected[0], -1);
        assert_eq!(normal.read_slot(0), Vec3::Y);
    }
}
