pub mod shape;

// Convex shape primitives
pub mod box_shape;
pub mod capsule;
pub mod sphere;
