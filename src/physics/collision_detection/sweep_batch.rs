use crossbeam_utils::CachePadded;
use glam::Vec3;
use log::debug;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::physics::body_properties::{BodyVelocity, RigidPose};
use crate::physics::collision_detection::sweep_error::SweepError;
use crate::physics::collision_detection::sweep_result::SweepResult;
use crate::physics::collision_detection::sweep_settings::SweepSettings;
use crate::physics::collision_detection::sweep_task_registry::{SweepShape, SweepTaskRegistry};
use crate::utilities::thread_dispatcher::IThreadDispatcher;

/// One pair of moving shapes to sweep. Poses are in world space at time zero.
#[derive(Debug, Clone, Copy)]
pub struct SweepJob<'a> {
    pub shape_a: SweepShape<'a>,
    pub pose_a: RigidPose,
    pub velocity_a: BodyVelocity,
    pub shape_b: SweepShape<'a>,
    pub pose_b: RigidPose,
    pub velocity_b: BodyVelocity,
}

impl SweepJob<'_> {
    /// Position of B relative to A.
    #[inline(always)]
    pub fn offset_b(&self) -> Vec3 {
        self.pose_b.position - self.pose_a.position
    }
}

/// Runs many independent sweeps, optionally spread across worker threads.
#[derive(Debug, Clone, Copy)]
pub struct SweepBatch<'a> {
    registry: &'a SweepTaskRegistry,
    settings: SweepSettings,
}

impl<'a> SweepBatch<'a> {
    /// Creates a batch that sweeps with the given registry and settings. Fails if the settings are invalid.
    pub fn new(registry: &'a SweepTaskRegistry, settings: SweepSettings) -> Result<Self, SweepError> {
        settings.validate()?;
        Ok(Self { registry, settings })
    }

    pub fn settings(&self) -> &SweepSettings {
        &self.settings
    }

    fn sweep_job(&self, job: &SweepJob<'_>) -> Result<SweepResult, SweepError> {
        self.registry.sweep_prevalidated(
            job.shape_a,
            job.pose_a.orientation,
            &job.velocity_a,
            job.shape_b,
            job.offset_b(),
            job.pose_b.orientation,
            &job.velocity_b,
            &self.settings,
            None,
        )
    }

    /// Sweeps every job on the calling thread. Results are in job order.
    pub fn run(&self, jobs: &[SweepJob<'_>]) -> Vec<Result<SweepResult, SweepError>> {
        jobs.iter().map(|job| self.sweep_job(job)).collect()
    }

    /// Sweeps every job using the dispatcher's workers. Results are in job order and identical to [`SweepBatch::run`].
    ///
    /// Workers claim jobs one at a time from a shared cursor, so uneven sweep costs balance out.
    pub fn run_multithreaded<TDispatcher: IThreadDispatcher>(
        &self,
        jobs: &[SweepJob<'_>],
        dispatcher: &TDispatcher,
    ) -> Vec<Result<SweepResult, SweepError>> {
        let worker_count = dispatcher.thread_count().min(jobs.len());
        if worker_count <= 1 {
            return self.run(jobs);
        }
        debug!(
            "dispatching {} sweep jobs across {worker_count} workers",
            jobs.len()
        );
        let next_job_index = CachePadded::new(AtomicUsize::new(0));
        let worker_results = dispatcher.dispatch_workers(
            |_worker_index| {
                let mut completed = Vec::new();
                loop {
                    let job_index = next_job_index.fetch_add(1, Ordering::Relaxed);
                    let Some(job) = jobs.get(job_index) else {
                        break;
                    };
                    completed.push((job_index, self.sweep_job(job)));
                }
                completed
            },
            worker_count,
        );

        let mut slots: Vec<Option<Result<SweepResult, SweepError>>> = vec![None; jobs.len()];
        for (job_index, result) in worker_results.into_iter().flatten() {
            slots[job_index] = Some(result);
        }
        // Every index below jobs.len() was claimed exactly once.
        slots.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collidables::capsule::Capsule;
    use crate::physics::collidables::sphere::Sphere;
    use crate::physics::default_types::DefaultTypes;
    use crate::physics::collision_detection::sweep_result::SweepTermination;
    use crate::utilities::thread_dispatcher::SimpleThreadDispatcher;

    #[test]
    fn test_rejects_invalid_settings() {
        let registry = DefaultTypes::create_default_sweep_task_registry();
        let settings = SweepSettings {
            maximum_iteration_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            SweepBatch::new(&registry, settings),
            Err(SweepError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_multithreaded_matches_sequential() {
        let registry = DefaultTypes::create_default_sweep_task_registry();
        let batch = SweepBatch::new(&registry, SweepSettings::with_maximum_t(4.0)).unwrap();
        let sphere = Sphere::new(0.5);
        let capsule = Capsule::new(0.25, 1.0);
        let jobs: Vec<SweepJob> = (0..37)
            .map(|i| {
                let shape_b = if i % 3 == 0 {
                    SweepShape::new(&capsule)
                } else {
                    SweepShape::new(&sphere)
                };
                SweepJob {
                    shape_a: SweepShape::new(&sphere),
                    pose_a: RigidPose::default(),
                    velocity_a: BodyVelocity::default(),
                    shape_b,
                    pose_b: RigidPose::from_position(Vec3::new(3.0, 0.1 * i as f32, 0.0)),
                    velocity_b: BodyVelocity::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 0.3)),
                }
            })
            .collect();

        let sequential = batch.run(&jobs);
        let threaded = batch.run_multithreaded(&jobs, &SimpleThreadDispatcher::new(4));
        assert_eq!(sequential.len(), jobs.len());
        assert_eq!(sequential, threaded);
        // Nearby pairs hit, distant ones are culled.
        assert!(sequential[0].as_ref().unwrap().intersected);
        assert_eq!(
            sequential[36].as_ref().unwrap().termination,
            SweepTermination::BoundingMiss
        );
    }
}
