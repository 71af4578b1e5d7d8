use crate::utilities::vector::{Vector, VECTOR_WIDTH};
use crate::utilities::vector3_wide::Vector3Wide;
use glam::Quat;
use std::simd::{Mask, Select, StdFloat};

/// Quaternion with SIMD lanes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct QuaternionWide {
    pub x: Vector<f32>,
    pub y: Vector<f32>,
    pub z: Vector<f32>,
    pub w: Vector<f32>,
}

impl QuaternionWide {
    /// Copies a scalar quaternion into every lane.
    #[inline(always)]
    pub fn broadcast(source: Quat, broadcasted: &mut Self) {
        broadcasted.x = Vector::splat(source.x);
        broadcasted.y = Vector::splat(source.y);
        broadcasted.z = Vector::splat(source.z);
        broadcasted.w = Vector::splat(source.w);
    }

    #[inline(always)]
    pub fn length_squared(&self) -> Vector<f32> {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    #[inline(always)]
    pub fn normalize(q: Self) -> Self {
        let inverse_norm = Vector::<f32>::splat(1.0) / q.length_squared().sqrt();
        Self {
            x: q.x * inverse_norm,
            y: q.y * inverse_norm,
            z: q.z * inverse_norm,
            w: q.w * inverse_norm,
        }
    }

    /// Concatenates the transforms of two quaternions together such that the resulting quaternion, applied as an orientation to a vector v, is equivalent to
    /// transformed = (v * a) * b. Assumes that the memory backing the input and output do not overlap.
    #[inline(always)]
    pub fn concatenate_without_overlap(a: &Self, b: &Self, result: &mut Self) {
        result.x = a.w * b.x + a.x * b.w + a.z * b.y - a.y * b.z;
        result.y = a.w * b.y + a.y * b.w + a.x * b.z - a.z * b.x;
        result.z = a.w * b.z + a.z * b.w + a.y * b.x - a.x * b.y;
        result.w = a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z;
    }

    /// Chooses `left` in lanes where the mask is set and `right` elsewhere.
    #[inline(always)]
    pub fn conditional_select(condition: Mask<i32, VECTOR_WIDTH>, left: &Self, right: &Self) -> Self {
        Self {
            x: condition.select(left.x, right.x),
            y: condition.select(left.y, right.y),
            z: condition.select(left.z, right.z),
            w: condition.select(left.w, right.w),
        }
    }

    /// Rotates a vector by the quaternion. Assumes the input and output do not overlap.
    #[inline(always)]
    pub fn transform_without_overlap(v: &Vector3Wide, rotation: &Self, result: &mut Vector3Wide) {
        let x2 = rotation.x + rotation.x;
        let y2 = rotation.y + rotation.y;
        let z2 = rotation.z + rotation.z;
        let xx2 = rotation.x * x2;
        let xy2 = rotation.x * y2;
        let xz2 = rotation.x * z2;
        let yy2 = rotation.y * y2;
        let yz2 = rotation.y * z2;
        let zz2 = rotation.z * z2;
        let wx2 = rotation.w * x2;
        let wy2 = rotation.w * y2;
        let wz2 = rotation.w * z2;
        let one = Vector::<f32>::splat(1.0);
        result.x = v.x * (one - yy2 - zz2) + v.y * (xy2 - wz2) + v.z * (xz2 + wy2);
        result.y = v.x * (xy2 + wz2) + v.y * (one - xx2 - zz2) + v.z * (yz2 - wx2);
        result.z = v.x * (xz2 - wy2) + v.y * (yz2 + wx2) + v.z * (one - xx2 - yy2);
    }

    /// Rotates a vector by the inverse of the quaternion, taking it into the quaternion's local space.
    #[inline(always)]
    pub fn transform_by_conjugate_without_overlap(
        v: &Vector3Wide,
        rotation: &Self,
        result: &mut Vector3Wide,
    ) {
        let x2 = rotation.x + rotation.x;
        let y2 = rotation.y + rotation.y;
        let z2 = rotation.z + rotation.z;
        let xx2 = rotation.x * x2;
        let xy2 = rotation.x * y2;
        let xz2 = rotation.x * z2;
        let yy2 = rotation.y * y2;
        let yz2 = rotation.y * z2;
        let zz2 = rotation.z * z2;
        let wx2 = rotation.w * x2;
        let wy2 = rotation.w * y2;
        let wz2 = rotation.w * z2;
        let one = Vector::<f32>::splat(1.0);
        result.x = v.x * (one - yy2 - zz2) + v.y * (xy2 + wz2) + v.z * (xz2 - wy2);
        result.y = v.x * (xy2 - wz2) + v.y * (one - xx2 - zz2) + v.z * (yz2 + wx2);
        result.z = v.x * (xz2 + wy2) + v.y * (yz2 - wx2) + v.z * (one - xx2 - yy2);
    }

    /// Computes the local Y axis of the rotation.
    #[inline(always)]
    pub fn transform_unit_y(rotation: &Self) -> Vector3Wide {
        let x2 = rotation.x + rotation.x;
        let y2 = rotation.y + rotation.y;
        let z2 = rotation.z + rotation.z;
        let xx2 = rotation.x * x2;
        let xy2 = rotation.x * y2;
        let yz2 = rotation.y * z2;
        let zz2 = rotation.z * z2;
        let wx2 = rotation.w * x2;
        let wz2 = rotation.w * z2;
        Vector3Wide {
            x: xy2 - wz2,
            y: Vector::<f32>::splat(1.0) - xx2 - zz2,
            z: yz2 + wx2,
        }
    }

    /// Pulls one lane out of the bundle into a scalar quaternion.
    #[inline(always)]
    pub fn read_slot(&self, slot_index: usize) -> Quat {
        Quat::from_xyzw(
            self.x[slot_index],
            self.y[slot_index],
            self.z[slot_index],
            self.w[slot_index],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn broadcast(q: Quat) -> QuaternionWide {
        let mut wide = QuaternionWide::default();
        QuaternionWide::broadcast(q, &mut wide);
        wide
    }

    #[test]
    fn test_concatenate_applies_left_operand_first() {
        let a = Quat::from_rotation_x(0.7);
        let b = Quat::from_rotation_z(-1.3);
        let mut result = QuaternionWide::default();
        QuaternionWide::concatenate_without_overlap(&broadcast(a), &broadcast(b), &mut result);
        let expected = b * a;
        assert!(result.read_slot(0).abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_transforms_match_glam() {
        let rotation = Quat::from_axis_angle(Vec3::new(1.0, 2.0, -0.5).normalize(), 2.1);
        let v = Vec3::new(0.3, -4.0, 2.0);
        let mut wide_v = Vector3Wide::default();
        Vector3Wide::broadcast(v, &mut wide_v);
        let wide_rotation = broadcast(rotation);

        let mut rotated = Vector3Wide::default();
        QuaternionWide::transform_without_overlap(&wide_v, &wide_rotation, &mut rotated);
        assert!(rotated.read_slot(0).abs_diff_eq(rotation * v, 1e-5));

        let mut unrotated = Vector3Wide::default();
        QuaternionWide::transform_by_conjugate_without_overlap(&wide_v, &wide_rotation, &mut unrotated);
        assert!(unrotated.read_slot(0).abs_diff_eq(rotation.inverse() * v, 1e-5));

        let y = QuaternionWide::transform_unit_y(&wide_rotation);
        assert!(y.read_slot(0).abs_diff_eq(rotation * Vec3::Y, 1e-5));
    }
}
