use serde::{Deserialize, Serialize};

use super::shape::{IConvexShape, IShape, IShapeWide};
use crate::utilities::vector::Vector;

/// Collision shape representing a solid cuboid.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Box {
    /// Half of the box's width along its local X axis.
    pub half_width: f32,
    /// Half of the box's height along its local Y axis.
    pub half_height: f32,
    /// Half of the box's length along its local Z axis.
    pub half_length: f32,
}

impl Box {
    /// Creates a Box shape from its full extents.
    #[inline(always)]
    pub fn new(width: f32, height: f32, length: f32) -> Self {
        Self {
            half_width: width * 0.5,
            half_height: height * 0.5,
            half_length: length * 0.5,
        }
    }

    pub fn width(&self) -> f32 {
        self.half_width * 2.0
    }
    pub fn height(&self) -> f32 {
        self.half_height * 2.0
    }
    pub fn length(&self) -> f32 {
        self.half_length * 2.0
    }

    /// Type id of box shapes.
    pub const ID: i32 = 2;
}

impl IShape for Box {
    const TYPE_ID: i32 = Self::ID;
}

impl IConvexShape for Box {
    type Wide = BoxWide;

    #[inline(always)]
    fn compute_angular_expansion_data(&self) -> (f32, f32) {
        let maximum_radius = (self.half_width * self.half_width
            + self.half_height * self.half_height
            + self.half_length * self.half_length)
            .sqrt();
        let minimum_half = self.half_width.min(self.half_height.min(self.half_length));
        (maximum_radius, maximum_radius - minimum_half)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BoxWide {
    pub half_width: Vector<f32>,
    pub half_height: Vector<f32>,
    pub half_length: Vector<f32>,
}

impl IShapeWide<Box> for BoxWide {
    #[inline(always)]
    fn broadcast(&mut self, shape: &Box) {
        self.half_width = Vector::<f32>::splat(shape.half_width);
        self.half_height = Vector::<f32>::splat(shape.half_height);
        self.half_length = Vector::<f32>::splat(shape.half_length);
    }
}
