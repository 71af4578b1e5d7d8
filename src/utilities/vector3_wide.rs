use crate::utilities::vector::Vector;
use glam::Vec3;
use std::ops::{Add, Neg, Sub};
use std::simd::StdFloat;

/// Three dimensional vector with SIMD lanes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Vector3Wide {
    /// First component of the vector.
    pub x: Vector<f32>,
    /// Second component of the vector.
    pub y: Vector<f32>,
    /// Third component of the vector.
    pub z: Vector<f32>,
}

impl Vector3Wide {
    /// Creates a vector by populating each component with the given bundle.
    #[inline(always)]
    pub fn new(s: Vector<f32>) -> Self {
        Self { x: s, y: s, z: s }
    }

    /// Copies a scalar vector into every lane of the wide vector.
    #[inline(always)]
    pub fn broadcast(source: Vec3, broadcasted: &mut Self) {
        broadcasted.x = Vector::splat(source.x);
        broadcasted.y = Vector::splat(source.y);
        broadcasted.z = Vector::splat(source.z);
    }

    /// Performs a componentwise add between two vectors.
    #[inline(always)]
    pub fn add(a: &Self, b: &Self, result: &mut Self) {
        result.x = a.x + b.x;
        result.y = a.y + b.y;
        result.z = a.z + b.z;
    }

    /// Subtracts one vector from another.
    #[inline(always)]
    pub fn subtract(a: &Self, b: &Self, result: &mut Self) {
        result.x = a.x - b.x;
        result.y = a.y - b.y;
        result.z = a.z - b.z;
    }

    /// Computes the inner product between two vectors.
    #[inline(always)]
    pub fn dot(a: &Self, b: &Self, result: &mut Vector<f32>) {
        *result = a.x * b.x + a.y * b.y + a.z * b.z;
    }

    /// Scales a vector by a per-lane scalar.
    #[inline(always)]
    pub fn scale_to(vector: &Self, scalar: &Vector<f32>, result: &mut Self) {
        result.x = vector.x * *scalar;
        result.y = vector.y * *scalar;
        result.z = vector.z * *scalar;
    }

    /// Scales a vector by a per-lane scalar.
    #[inline(always)]
    pub fn scale(vector: &Self, scalar: &Vector<f32>) -> Self {
        Self {
            x: vector.x * *scalar,
            y: vector.y * *scalar,
            z: vector.z * *scalar,
        }
    }

    #[inline(always)]
    pub fn length_squared(&self) -> Vector<f32> {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    #[inline(always)]
    pub fn length(&self) -> Vector<f32> {
        self.length_squared().sqrt()
    }

    /// Pulls one lane out of the bundle into a scalar vector.
    #[inline(always)]
    pub fn read_slot(&self, slot_index: usize) -> Vec3 {
        Vec3::new(
            self.x[slot_index],
            self.y[slot_index],
            self.z[slot_index],
        )
    }

    /// Writes a scalar vector into a single lane of the bundle.
    #[inline(always)]
    pub fn write_slot(source: Vec3, slot_index: usize, target: &mut Self) {
        target.x[slot_index] = source.x;
        target.y[slot_index] = source.y;
        target.z[slot_index] = source.z;
    }
}

impl Add for Vector3Wide {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Sub for Vector3Wide {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl Neg for Vector3Wide {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}
