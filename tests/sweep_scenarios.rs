use approx::assert_abs_diff_eq;
use convex_sweep::physics::collision_detection::sweep_tasks::sphere_capsule_distance_tester::SphereCapsuleDistanceTester;
use convex_sweep::*;
use glam::{Quat, Vec3};

fn head_on_settings(maximum_t: f32) -> SweepSettings {
    SweepSettings {
        maximum_t,
        minimum_progression: 1e-4,
        convergence_threshold: 1e-4,
        ..Default::default()
    }
}

#[test]
fn approaching_spheres_touch_at_eight() {
    let registry = DefaultTypes::create_default_sweep_task_registry();
    let a = Sphere::new(1.0);
    let b = Sphere::new(1.0);
    let result = registry
        .sweep(
            SweepShape::new(&a),
            Quat::IDENTITY,
            &BodyVelocity::default(),
            SweepShape::new(&b),
            Vec3::new(10.0, 0.0, 0.0),
            Quat::IDENTITY,
            &BodyVelocity::from_linear(Vec3::new(-1.0, 0.0, 0.0)),
            &head_on_settings(100.0),
            None,
        )
        .unwrap();
    assert!(result.intersected);
    assert_abs_diff_eq!(result.t0, 8.0, epsilon = 1e-3);
    assert!(result.t0 <= result.t1 + 1e-4);
    assert!(result.hit_normal.abs_diff_eq(Vec3::NEG_X, 1e-3));
    assert!(result.hit_location.abs_diff_eq(Vec3::X, 1e-2));
}

#[test]
fn impact_beyond_window_is_not_reported() {
    let registry = DefaultTypes::create_default_sweep_task_registry();
    let a = Sphere::new(1.0);
    let b = Sphere::new(1.0);
    let result = registry
        .sweep(
            SweepShape::new(&a),
            Quat::IDENTITY,
            &BodyVelocity::default(),
            SweepShape::new(&b),
            Vec3::new(10.0, 0.0, 0.0),
            Quat::IDENTITY,
            &BodyVelocity::from_linear(Vec3::new(-1.0, 0.0, 0.0)),
            &head_on_settings(5.0),
            None,
        )
        .unwrap();
    assert!(!result.intersected);
    assert_eq!(result.termination, SweepTermination::BoundingMiss);
    assert!(result.t0 > 5.0);
}

#[test]
fn spinning_sphere_cannot_close_a_gap() {
    let registry = DefaultTypes::create_default_sweep_task_registry();
    let a = Sphere::new(1.0);
    let b = Sphere::new(1.0);
    for maximum_t in [0.5, 10.0, 1000.0] {
        let result = registry
            .sweep(
                SweepShape::new(&a),
                Quat::IDENTITY,
                &BodyVelocity::default(),
                SweepShape::new(&b),
                Vec3::new(5.0, 0.0, 0.0),
                Quat::from_rotation_x(0.3),
                &BodyVelocity::new(Vec3::ZERO, Vec3::new(2.0, 7.0, -1.0)),
                &SweepSettings::with_maximum_t(maximum_t),
                None,
            )
            .unwrap();
        assert!(!result.intersected, "maximum_t {maximum_t}");
    }
}

#[test]
fn reversed_type_order_mirrors_the_result() {
    let registry = DefaultTypes::create_default_sweep_task_registry();
    let capsule = Capsule::new(0.5, 2.0);
    let sphere = Sphere::new(1.0);
    let settings = head_on_settings(10.0);

    // Capsule first: the registry's task is sphere-capsule, so it has to flip.
    let reversed = registry
        .sweep(
            SweepShape::new(&capsule),
            Quat::IDENTITY,
            &BodyVelocity::default(),
            SweepShape::new(&sphere),
            Vec3::new(5.0, 0.0, 0.0),
            Quat::IDENTITY,
            &BodyVelocity::from_linear(Vec3::new(-1.0, 0.0, 0.0)),
            &settings,
            None,
        )
        .unwrap();
    let direct = sweep_convex_pair::<Sphere, Capsule, SphereCapsuleDistanceTester>(
        &sphere,
        Quat::IDENTITY,
        &BodyVelocity::from_linear(Vec3::new(-1.0, 0.0, 0.0)),
        &capsule,
        Vec3::new(-5.0, 0.0, 0.0),
        Quat::IDENTITY,
        &BodyVelocity::default(),
        &settings,
    );
    assert!(registry
        .get_task(Capsule::TYPE_ID, Sphere::TYPE_ID)
        .is_some());

    assert!(reversed.intersected);
    assert_eq!(reversed.t0, direct.t0);
    assert_eq!(reversed.termination, direct.termination);
    assert!(reversed.hit_normal.abs_diff_eq(-direct.hit_normal, 1e-6));
    assert!(reversed
        .hit_location
        .abs_diff_eq(direct.hit_location + Vec3::new(5.0, 0.0, 0.0), 1e-5));

    // Sphere center reaches x = 1.5 at t = 3.5, touching the capsule's side at x = 0.5.
    assert_abs_diff_eq!(reversed.t0, 3.5, epsilon = 1e-3);
    assert!(reversed.hit_normal.abs_diff_eq(Vec3::NEG_X, 1e-3));
    assert!(reversed.hit_location.abs_diff_eq(Vec3::new(0.5, 0.0, 0.0), 1e-2));
}

#[test]
fn stationary_pairs() {
    let registry = DefaultTypes::create_default_sweep_task_registry();
    let a = Sphere::new(1.0);
    let b = BoxShape::new(1.0, 1.0, 1.0);
    let still = BodyVelocity::default();

    let overlapping = registry
        .sweep(
            SweepShape::new(&a),
            Quat::IDENTITY,
            &still,
            SweepShape::new(&b),
            Vec3::new(1.2, 0.0, 0.0),
            Quat::IDENTITY,
            &still,
            &SweepSettings::default(),
            None,
        )
        .unwrap();
    assert!(overlapping.intersected);
    assert_eq!(overlapping.t0, 0.0);

    let apart = registry
        .sweep(
            SweepShape::new(&a),
            Quat::IDENTITY,
            &still,
            SweepShape::new(&b),
            Vec3::new(4.0, 0.0, 0.0),
            Quat::IDENTITY,
            &still,
            &SweepSettings::default(),
            None,
        )
        .unwrap();
    assert!(!apart.intersected);
    assert_eq!(apart.termination, SweepTermination::BoundingMiss);
}

#[test]
fn unregistered_pair_is_an_error() {
    let registry = DefaultTypes::create_default_sweep_task_registry();
    let capsule = Capsule::new(0.5, 1.0);
    let cube = BoxShape::new(1.0, 1.0, 1.0);
    let error = registry
        .sweep(
            SweepShape::new(&capsule),
            Quat::IDENTITY,
            &BodyVelocity::default(),
            SweepShape::new(&cube),
            Vec3::new(2.0, 0.0, 0.0),
            Quat::IDENTITY,
            &BodyVelocity::default(),
            &SweepSettings::default(),
            None,
        )
        .unwrap_err();
    assert_eq!(
        error,
        SweepError::MissingTask {
            type_a: Capsule::TYPE_ID,
            type_b: BoxShape::TYPE_ID
        }
    );
    assert!(error.to_string().contains("no sweep task"));
}

#[test]
fn invalid_settings_are_rejected_before_dispatch() {
    let registry = DefaultTypes::create_default_sweep_task_registry();
    let sphere = Sphere::new(1.0);
    let settings = SweepSettings {
        minimum_progression: 0.0,
        ..Default::default()
    };
    let result = registry.sweep(
        SweepShape::new(&sphere),
        Quat::IDENTITY,
        &BodyVelocity::default(),
        SweepShape::new(&sphere),
        Vec3::new(3.0, 0.0, 0.0),
        Quat::IDENTITY,
        &BodyVelocity::default(),
        &settings,
        None,
    );
    assert!(matches!(result, Err(SweepError::InvalidSettings(_))));
}

#[test]
fn filter_can_veto_a_pair() {
    let registry = DefaultTypes::create_default_sweep_task_registry();
    let sphere = Sphere::new(1.0);
    let reject_all = |_: i32, _: i32| false;
    let allow_all = |_: i32, _: i32| true;
    let sweep_with = |filter: &dyn ISweepFilter| {
        registry
            .sweep(
                SweepShape::new(&sphere),
                Quat::IDENTITY,
                &BodyVelocity::default(),
                SweepShape::new(&sphere),
                Vec3::new(3.0, 0.0, 0.0),
                Quat::IDENTITY,
                &BodyVelocity::from_linear(Vec3::NEG_X),
                &SweepSettings::with_maximum_t(5.0),
                Some(filter),
            )
            .unwrap()
    };

    let vetoed = sweep_with(&reject_all);
    assert!(!vetoed.intersected);
    assert_eq!(vetoed.termination, SweepTermination::Filtered);

    let allowed = sweep_with(&allow_all);
    assert!(allowed.intersected);
    assert_abs_diff_eq!(allowed.t0, 1.0, epsilon = 1e-3);
}

#[test]
fn mismatched_shape_data_reports_no_impact() {
    let registry = DefaultTypes::create_default_sweep_task_registry();
    let task = registry.get_task(Sphere::TYPE_ID, Sphere::TYPE_ID).unwrap();
    // The data claims to be a sphere but is actually a capsule.
    let impostor = Capsule::new(1.0, 1.0);
    let sphere = Sphere::new(1.0);
    let result = task.sweep(
        &impostor,
        Sphere::TYPE_ID,
        Quat::IDENTITY,
        &BodyVelocity::default(),
        &sphere,
        Sphere::TYPE_ID,
        Vec3::new(1.0, 0.0, 0.0),
        Quat::IDENTITY,
        &BodyVelocity::default(),
        &SweepSettings::default(),
        None,
    );
    assert!(!result.intersected);
    assert_eq!(result.termination, SweepTermination::BoundingMiss);
}

#[test]
fn local_poses_offset_the_swept_shapes() {
    let registry = DefaultTypes::create_default_sweep_task_registry();
    let sphere = Sphere::new(0.5);
    // Both bodies sit at the same height but B's child hangs 3 units lower, so a straight approach along X misses
    // unless the child offsets are honored.
    let local_a = RigidPose::from_position(Vec3::new(0.0, -3.0, 0.0));
    let local_b = RigidPose::from_position(Vec3::new(0.0, -3.0, 0.0));
    let result = registry
        .sweep_with_local_poses(
            SweepShape::new(&sphere),
            &local_a,
            Quat::IDENTITY,
            &BodyVelocity::default(),
            SweepShape::new(&sphere),
            &local_b,
            Vec3::new(6.0, 0.0, 0.0),
            Quat::IDENTITY,
            &BodyVelocity::from_linear(Vec3::new(-2.0, 0.0, 0.0)),
            &head_on_settings(10.0),
        )
        .unwrap();
    assert!(result.intersected);
    assert_abs_diff_eq!(result.t0, 2.5, epsilon = 1e-3);
    // Measured from A's body position, the contact lies on A's child.
    assert!(result.hit_location.abs_diff_eq(Vec3::new(0.5, -3.0, 0.0), 1e-2));

    let shifted = registry
        .sweep_with_local_poses(
            SweepShape::new(&sphere),
            &local_a,
            Quat::IDENTITY,
            &BodyVelocity::default(),
            SweepShape::new(&sphere),
            &RigidPose::IDENTITY,
            Vec3::new(6.0, 0.0, 0.0),
            Quat::IDENTITY,
            &BodyVelocity::from_linear(Vec3::new(-2.0, 0.0, 0.0)),
            &head_on_settings(10.0),
        )
        .unwrap();
    assert!(!shifted.intersected);
}

#[test]
fn results_serialize_for_inspection() {
    let registry = DefaultTypes::create_default_sweep_task_registry();
    let sphere = Sphere::new(1.0);
    let result = registry
        .sweep(
            SweepShape::new(&sphere),
            Quat::IDENTITY,
            &BodyVelocity::default(),
            SweepShape::new(&sphere),
            Vec3::new(4.0, 0.0, 0.0),
            Quat::IDENTITY,
            &BodyVelocity::from_linear(Vec3::NEG_X),
            &SweepSettings::with_maximum_t(4.0),
            None,
        )
        .unwrap();
    let text = serde_json::to_string(&result).unwrap();
    let parsed: SweepResult = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, result);
}
