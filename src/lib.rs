//! Continuous collision detection sweeps between pairs of moving convex shapes.
//!
//! Given two shapes with constant linear and angular velocity, a sweep finds the earliest time within `[0, maximum_t]`
//! at which they touch, along with the contact location and normal. The search is conservative advancement over
//! SIMD-wide batches of time samples, so it handles fast spinning bodies without tunneling.
//!
//! ```ignore
//! use convex_sweep::*;
//! use glam::{Quat, Vec3};
//!
//! let registry = DefaultTypes::create_default_sweep_task_registry();
//! let a = Sphere::new(1.0);
//! let b = Sphere::new(1.0);
//! let result = registry.sweep(
//!     SweepShape::new(&a),
//!     Quat::IDENTITY,
//!     &BodyVelocity::default(),
//!     SweepShape::new(&b),
//!     Vec3::new(10.0, 0.0, 0.0),
//!     Quat::IDENTITY,
//!     &BodyVelocity::from_linear(Vec3::new(-1.0, 0.0, 0.0)),
//!     &SweepSettings::with_maximum_t(100.0),
//!     None,
//! )?;
//! assert!(result.intersected);
//! ```
#![feature(portable_simd)]

pub mod physics;
pub mod utilities;

pub use physics::body_properties::{BodyVelocity, RigidPose};
pub use physics::collidables::box_shape::Box as BoxShape;
pub use physics::collidables::capsule::Capsule;
pub use physics::collidables::shape::{IConvexShape, IShape, IShapeWide};
pub use physics::collidables::sphere::Sphere;
pub use physics::collision_detection::sweep_batch::{SweepBatch, SweepJob};
pub use physics::collision_detection::sweep_error::SweepError;
pub use physics::collision_detection::sweep_result::{SweepResult, SweepTermination};
pub use physics::collision_detection::sweep_settings::SweepSettings;
pub use physics::collision_detection::sweep_task_registry::{
    ISweepFilter, SweepShape, SweepTask, SweepTaskRegistry,
};
pub use physics::collision_detection::sweep_tasks::convex_pair_sweep_task::{
    sweep_convex_pair, sweep_convex_pair_with_local_poses, ConvexPairSweepTask,
};
pub use physics::default_types::DefaultTypes;
