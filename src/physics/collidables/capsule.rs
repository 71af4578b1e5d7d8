use serde::{Deserialize, Serialize};

use super::shape::{IConvexShape, IShape, IShapeWide};
use crate::utilities::vector::Vector;

/// Collision shape representing a sphere-expanded line segment.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capsule {
    /// Spherical expansion applied to the internal line segment.
    pub radius: f32,
    /// Half of the length of the internal line segment. Oriented along the local Y axis.
    pub half_length: f32,
}

impl Capsule {
    /// Creates a capsule shape.
    #[inline(always)]
    pub fn new(radius: f32, length: f32) -> Self {
        Self {
            radius,
            half_length: length * 0.5,
        }
    }

    /// Gets the length of the capsule's internal line segment along the local Y axis.
    pub fn length(&self) -> f32 {
        self.half_length * 2.0
    }

    pub fn set_length(&mut self, value: f32) {
        self.half_length = value * 0.5;
    }

    /// Type id of capsule shapes.
    pub const ID: i32 = 1;
}

impl IShape for Capsule {
    const TYPE_ID: i32 = Self::ID;
}

impl IConvexShape for Capsule {
    type Wide = CapsuleWide;

    #[inline(always)]
    fn compute_angular_expansion_data(&self) -> (f32, f32) {
        (self.half_length + self.radius, self.half_length)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CapsuleWide {
    pub radius: Vector<f32>,
    pub half_length: Vector<f32>,
}

impl IShapeWide<Capsule> for CapsuleWide {
    #[inline(always)]
    fn broadcast(&mut self, shape: &Capsule) {
        self.radius = Vector::<f32>::splat(shape.radius);
        self.half_length = Vector::<f32>::splat(shape.half_length);
    }
}
