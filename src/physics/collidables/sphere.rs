use serde::{Deserialize, Serialize};

use super::shape::{IConvexShape, IShape, IShapeWide};
use crate::utilities::vector::Vector;

/// Collision shape representing a sphere.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    /// Radius of the sphere.
    pub radius: f32,
}

impl Sphere {
    /// Creates a sphere shape.
    #[inline(always)]
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    /// Type id of sphere shapes.
    pub const ID: i32 = 0;
}

impl IShape for Sphere {
    const TYPE_ID: i32 = Self::ID;
}

impl IConvexShape for Sphere {
    type Wide = SphereWide;

    #[inline(always)]
    fn compute_angular_expansion_data(&self) -> (f32, f32) {
        // Rotation never moves a sphere's surface.
        (self.radius, 0.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SphereWide {
    pub radius: Vector<f32>,
}

impl IShapeWide<Sphere> for SphereWide {
    #[inline(always)]
    fn broadcast(&mut self, shape: &Sphere) {
        self.radius = Vector::<f32>::splat(shape.radius);
    }
}
