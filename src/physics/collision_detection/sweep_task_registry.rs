use crate::physics::body_properties::{BodyVelocity, RigidPose};
use crate::physics::collidables::shape::IShape;
use crate::physics::collision_detection::sweep_error::SweepError;
use crate::physics::collision_detection::sweep_result::SweepResult;
use crate::physics::collision_detection::sweep_settings::SweepSettings;
use glam::{Quat, Vec3};
use log::debug;
use std::any::Any;
use std::fmt;

/// Filter for swept tests between children of swept shapes.
pub trait ISweepFilter: Sync {
    /// Checks whether a swept test should be performed for children of swept shapes.
    fn allow_test(&self, child_a: i32, child_b: i32) -> bool;
}

impl<F> ISweepFilter for F
where
    F: Fn(i32, i32) -> bool + Sync,
{
    fn allow_test(&self, child_a: i32, child_b: i32) -> bool {
        self(child_a, child_b)
    }
}

/// Parent type of tasks which handle sweep tests between shape pairs.
///
/// Implementors handle a fixed pair of shape types and only implement the preordered sweeps. The provided `sweep` and
/// `sweep_with_local_poses` accept either storage order and normalize it.
pub trait SweepTask: Send + Sync {
    /// Gets the first shape type index associated with the task.
    fn shape_type_index_a(&self) -> i32;
    /// Gets the second shape type index associated with the task.
    fn shape_type_index_b(&self) -> i32;

    /// Sweeps shapes attached to their bodies by local poses. Shape data must already be in the task's order.
    #[allow(clippy::too_many_arguments)]
    fn preordered_type_sweep(
        &self,
        shape_data_a: &dyn Any,
        local_pose_a: &RigidPose,
        orientation_a: Quat,
        velocity_a: &BodyVelocity,
        shape_data_b: &dyn Any,
        local_pose_b: &RigidPose,
        offset_b: Vec3,
        orientation_b: Quat,
        velocity_b: &BodyVelocity,
        settings: &SweepSettings,
    ) -> SweepResult;

    /// Sweeps shapes centered on their bodies. Shape data must already be in the task's order.
    /// `flip_required` tells the task that its A and B are the caller's B and A, for filters that care about child order.
    #[allow(clippy::too_many_arguments)]
    fn preordered_type_sweep_filtered(
        &self,
        shape_data_a: &dyn Any,
        orientation_a: Quat,
        velocity_a: &BodyVelocity,
        shape_data_b: &dyn Any,
        offset_b: Vec3,
        orientation_b: Quat,
        velocity_b: &BodyVelocity,
        settings: &SweepSettings,
        flip_required: bool,
        filter: Option<&dyn ISweepFilter>,
    ) -> SweepResult;

    /// Sweeps shapes attached to their bodies by local poses, in either storage order.
    #[allow(clippy::too_many_arguments)]
    fn sweep_with_local_poses(
        &self,
        shape_data_a: &dyn Any,
        shape_type_a: i32,
        local_pose_a: &RigidPose,
        orientation_a: Quat,
        velocity_a: &BodyVelocity,
        shape_data_b: &dyn Any,
        shape_type_b: i32,
        local_pose_b: &RigidPose,
        offset_b: Vec3,
        orientation_b: Quat,
        velocity_b: &BodyVelocity,
        settings: &SweepSettings,
    ) -> SweepResult {
        debug_assert!(
            (shape_type_a == self.shape_type_index_a() && shape_type_b == self.shape_type_index_b())
                || (shape_type_a == self.shape_type_index_b()
                    && shape_type_b == self.shape_type_index_a()),
            "Sweep type requirements not met."
        );
        if shape_type_a == self.shape_type_index_a() {
            self.preordered_type_sweep(
                shape_data_a,
                local_pose_a,
                orientation_a,
                velocity_a,
                shape_data_b,
                local_pose_b,
                offset_b,
                orientation_b,
                velocity_b,
                settings,
            )
        } else {
            self.preordered_type_sweep(
                shape_data_b,
                local_pose_b,
                orientation_b,
                velocity_b,
                shape_data_a,
                local_pose_a,
                -offset_b,
                orientation_a,
                velocity_a,
                settings,
            )
            .flipped(offset_b)
        }
    }

    /// Sweeps shapes centered on their bodies, in either storage order.
    #[allow(clippy::too_many_arguments)]
    fn sweep(
        &self,
        shape_data_a: &dyn Any,
        shape_type_a: i32,
        orientation_a: Quat,
        velocity_a: &BodyVelocity,
        shape_data_b: &dyn Any,
        shape_type_b: i32,
        offset_b: Vec3,
        orientation_b: Quat,
        velocity_b: &BodyVelocity,
        settings: &SweepSettings,
        filter: Option<&dyn ISweepFilter>,
    ) -> SweepResult {
        debug_assert!(
            (shape_type_a == self.shape_type_index_a() && shape_type_b == self.shape_type_index_b())
                || (shape_type_a == self.shape_type_index_b()
                    && shape_type_b == self.shape_type_index_a()),
            "Types must match expected types."
        );
        // A same-type pair never needs a flip.
        let flip_required = shape_type_a != self.shape_type_index_a();
        if flip_required {
            self.preordered_type_sweep_filtered(
                shape_data_b,
                orientation_b,
                velocity_b,
                shape_data_a,
                -offset_b,
                orientation_a,
                velocity_a,
                settings,
                flip_required,
                filter,
            )
            .flipped(offset_b)
        } else {
            self.preordered_type_sweep_filtered(
                shape_data_a,
                orientation_a,
                velocity_a,
                shape_data_b,
                offset_b,
                orientation_b,
                velocity_b,
                settings,
                flip_required,
                filter,
            )
        }
    }
}

/// Type-erased reference to a shape along with its type id.
#[derive(Clone, Copy)]
pub struct SweepShape<'a> {
    data: &'a (dyn Any + Send + Sync),
    type_id: i32,
}

impl<'a> SweepShape<'a> {
    /// Wraps a shape. The type id is taken from the shape type, so it always matches the data.
    pub fn new<TShape: IShape>(shape: &'a TShape) -> Self {
        Self {
            data: shape,
            type_id: TShape::TYPE_ID,
        }
    }

    #[inline(always)]
    pub fn type_id(&self) -> i32 {
        self.type_id
    }

    #[inline(always)]
    pub fn data(&self) -> &'a (dyn Any + Send + Sync) {
        self.data
    }
}

impl fmt::Debug for SweepShape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SweepShape")
            .field("type_id", &self.type_id)
            .finish_non_exhaustive()
    }
}

/// Registry of sweep tasks used to handle CCD for various shape pair types.
#[derive(Default)]
pub struct SweepTaskRegistry {
    top_level_matrix: Vec<Vec<Option<usize>>>,
    tasks: Vec<Box<dyn SweepTask>>,
}

impl SweepTaskRegistry {
    /// Creates a new sweep task registry with room for the given number of shape types.
    pub fn new(initial_shape_count: usize) -> Self {
        let mut registry = Self::default();
        registry.resize_matrix(initial_shape_count);
        registry
    }

    fn resize_matrix(&mut self, new_size: usize) {
        self.top_level_matrix.resize_with(new_size, Vec::new);
        for row in &mut self.top_level_matrix {
            row.resize(new_size, None);
        }
    }

    /// Registers a sweep task for its shape type pair in both orders, replacing any previous task for the pair.
    /// Returns the index of the task.
    pub fn register(&mut self, task: Box<dyn SweepTask>) -> usize {
        let a = task.shape_type_index_a();
        let b = task.shape_type_index_b();
        assert!(a >= 0 && b >= 0, "Shape type ids must be nonnegative.");
        let index = self.tasks.len();
        self.tasks.push(task);

        let highest_shape_index = a.max(b) as usize;
        if highest_shape_index >= self.top_level_matrix.len() {
            self.resize_matrix(highest_shape_index + 1);
        }
        self.top_level_matrix[a as usize][b as usize] = Some(index);
        self.top_level_matrix[b as usize][a as usize] = Some(index);
        debug!("registered sweep task {index} for shape types ({a}, {b})");
        index
    }

    /// Number of registered tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Gets the task for the given shape type pair in either order, or None if no task is registered.
    #[inline(always)]
    pub fn get_task(&self, top_level_type_a: i32, top_level_type_b: i32) -> Option<&dyn SweepTask> {
        let a = usize::try_from(top_level_type_a).ok()?;
        let b = usize::try_from(top_level_type_b).ok()?;
        let task_index = (*self.top_level_matrix.get(a)?.get(b)?)?;
        Some(&*self.tasks[task_index])
    }

    /// Sweeps two shapes centered on their bodies using whichever task handles their type pair.
    ///
    /// `offset_b` is the position of B relative to A at time zero.
    #[allow(clippy::too_many_arguments)]
    pub fn sweep(
        &self,
        shape_a: SweepShape<'_>,
        orientation_a: Quat,
        velocity_a: &BodyVelocity,
        shape_b: SweepShape<'_>,
        offset_b: Vec3,
        orientation_b: Quat,
        velocity_b: &BodyVelocity,
        settings: &SweepSettings,
        filter: Option<&dyn ISweepFilter>,
    ) -> Result<SweepResult, SweepError> {
        settings.validate()?;
        self.sweep_prevalidated(
            shape_a,
            orientation_a,
            velocity_a,
            shape_b,
            offset_b,
            orientation_b,
            velocity_b,
            settings,
            filter,
        )
    }

    /// Sweeps two shapes attached to their bodies by local poses using whichever task handles their type pair.
    #[allow(clippy::too_many_arguments)]
    pub fn sweep_with_local_poses(
        &self,
        shape_a: SweepShape<'_>,
        local_pose_a: &RigidPose,
        orientation_a: Quat,
        velocity_a: &BodyVelocity,
        shape_b: SweepShape<'_>,
        local_pose_b: &RigidPose,
        offset_b: Vec3,
        orientation_b: Quat,
        velocity_b: &BodyVelocity,
        settings: &SweepSettings,
    ) -> Result<SweepResult, SweepError> {
        settings.validate()?;
        let task = self.require_task(shape_a.type_id, shape_b.type_id)?;
        Ok(task.sweep_with_local_poses(
            shape_a.data,
            shape_a.type_id,
            local_pose_a,
            orientation_a,
            velocity_a,
            shape_b.data,
            shape_b.type_id,
            local_pose_b,
            offset_b,
            orientation_b,
            velocity_b,
            settings,
        ))
    }

    fn require_task(&self, type_a: i32, type_b: i32) -> Result<&dyn SweepTask, SweepError> {
        self.get_task(type_a, type_b)
            .ok_or(SweepError::MissingTask { type_a, type_b })
    }

    /// Same as [`SweepTaskRegistry::sweep`] for settings the caller has already validated.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn sweep_prevalidated(
        &self,
        shape_a: SweepShape<'_>,
        orientation_a: Quat,
        velocity_a: &BodyVelocity,
        shape_b: SweepShape<'_>,
        offset_b: Vec3,
        orientation_b: Quat,
        velocity_b: &BodyVelocity,
        settings: &SweepSettings,
        filter: Option<&dyn ISweepFilter>,
    ) -> Result<SweepResult, SweepError> {
        let task = self.require_task(shape_a.type_id, shape_b.type_id)?;
        Ok(task.sweep(
            shape_a.data,
            shape_a.type_id,
            orientation_a,
            velocity_a,
            shape_b.data,
            shape_b.type_id,
            offset_b,
            orientation_b,
            velocity_b,
            settings,
            filter,
        ))
    }
}

impl fmt::Debug for SweepTaskRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let pairs: Vec<(i32, i32)> = self
            .tasks
            .iter()
            .map(|task| (task.shape_type_index_a(), task.shape_type_index_b()))
            .collect();
        f.debug_struct("SweepTaskRegistry")
            .field("task_pairs", &pairs)
            .finish()
    }
}
