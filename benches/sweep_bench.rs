use convex_sweep::physics::collision_detection::sweep_tasks::capsule_pair_distance_tester::CapsulePairDistanceTester;
use convex_sweep::physics::collision_detection::sweep_tasks::sphere_pair_distance_tester::SpherePairDistanceTester;
use convex_sweep::utilities::thread_dispatcher::SimpleThreadDispatcher;
use convex_sweep::*;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Quat, Vec3};
use std::hint::black_box;

fn bench_single_sweeps(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_sweep");
    let settings = SweepSettings::with_maximum_t(10.0);
    group.bench_function("sphere_pair_head_on", |b| {
        b.iter(|| {
            black_box(sweep_convex_pair::<Sphere, Sphere, SpherePairDistanceTester>(
                &Sphere::new(1.0),
                Quat::IDENTITY,
                &BodyVelocity::default(),
                &Sphere::new(1.0),
                black_box(Vec3::new(10.0, 0.0, 0.0)),
                Quat::IDENTITY,
                &BodyVelocity::from_linear(Vec3::new(-2.0, 0.0, 0.0)),
                &settings,
            ))
        })
    });
    group.bench_function("capsule_pair_spinning", |b| {
        b.iter(|| {
            black_box(sweep_convex_pair::<Capsule, Capsule, CapsulePairDistanceTester>(
                &Capsule::new(0.1, 4.0),
                Quat::IDENTITY,
                &BodyVelocity::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 3.0)),
                &Capsule::new(0.2, 1.0),
                black_box(Vec3::new(2.5, 0.5, 0.0)),
                Quat::from_rotation_x(0.4),
                &BodyVelocity::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 0.0)),
                &settings,
            ))
        })
    });
    group.finish();
}

fn bench_batches(c: &mut Criterion) {
    let registry = DefaultTypes::create_default_sweep_task_registry();
    let sphere = Sphere::new(0.5);
    let capsule = Capsule::new(0.25, 1.5);
    let mut group = c.benchmark_group("sweep_batch");
    for &count in &[64usize, 1024] {
        let jobs: Vec<SweepJob> = (0..count)
            .map(|i| {
                let lane = i as f32;
                SweepJob {
                    shape_a: SweepShape::new(&sphere),
                    pose_a: RigidPose::default(),
                    velocity_a: BodyVelocity::default(),
                    shape_b: if i % 2 == 0 {
                        SweepShape::new(&sphere)
                    } else {
                        SweepShape::new(&capsule)
                    },
                    pose_b: RigidPose::from_position(Vec3::new(4.0, (lane * 0.37) % 3.0, 0.0)),
                    velocity_b: BodyVelocity::new(
                        Vec3::new(-2.0, 0.0, 0.0),
                        Vec3::new(0.0, lane % 5.0, 1.0),
                    ),
                }
            })
            .collect();
        let batch = SweepBatch::new(&registry, SweepSettings::with_maximum_t(4.0))
            .expect("settings are valid");
        group.bench_with_input(BenchmarkId::new("sequential", count), &jobs, |b, jobs| {
            b.iter(|| black_box(batch.run(jobs)))
        });
        let dispatcher = SimpleThreadDispatcher::new(4);
        group.bench_with_input(BenchmarkId::new("multithreaded", count), &jobs, |b, jobs| {
            b.iter(|| black_box(batch.run_multithreaded(jobs, &dispatcher)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_sweeps, bench_batches);
criterion_main!(benches);
