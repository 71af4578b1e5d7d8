/// Defines a type usable as a shape in a sweep.
pub trait IShape: 'static + Send + Sync {
    /// Unique type id for this shape type.
    const TYPE_ID: i32;
}

/// Defines functions available on all convex shapes.
/// Convex shapes have no hollowed out regions; any line passing through a convex shape
/// will never enter and exit more than once.
pub trait IConvexShape: IShape {
    /// Bundle form of the shape used by the wide distance testers.
    type Wide: IShapeWide<Self>;

    /// Computes information about how far the surface of the shape can move in response to rotation.
    ///
    /// Returns `(maximum_radius, maximum_angular_expansion)`: the distance from the shape's center to its farthest
    /// surface point, and the largest displacement any rotation can produce along a direction, relative to the
    /// closest surface point in that direction.
    fn compute_angular_expansion_data(&self) -> (f32, f32);
}

/// Widely vectorized bundle representation of a shape.
pub trait IShapeWide<TShape: IShape + ?Sized>: Default {
    /// Broadcasts a scalar shape into a bundle containing the same shape in every lane.
    fn broadcast(&mut self, shape: &TShape);
}
