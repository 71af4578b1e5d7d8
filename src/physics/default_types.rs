use crate::physics::collidables::box_shape::Box as BoxShape;
use crate::physics::collidables::capsule::Capsule;
use crate::physics::collidables::sphere::Sphere;
use crate::physics::collision_detection::sweep_task_registry::SweepTaskRegistry;
use crate::physics::collision_detection::sweep_tasks::capsule_pair_distance_tester::CapsulePairDistanceTester;
use crate::physics::collision_detection::sweep_tasks::convex_pair_sweep_task::ConvexPairSweepTask;
use crate::physics::collision_detection::sweep_tasks::sphere_box_distance_tester::SphereBoxDistanceTester;
use crate::physics::collision_detection::sweep_tasks::sphere_capsule_distance_tester::SphereCapsuleDistanceTester;
use crate::physics::collision_detection::sweep_tasks::sphere_pair_distance_tester::SpherePairDistanceTester;

/// Helper class to register the default types within a sweep task registry.
pub struct DefaultTypes;

impl DefaultTypes {
    /// Creates a sweep task registry with a task for every built-in convex pair that has a distance tester.
    pub fn create_default_sweep_task_registry() -> SweepTaskRegistry {
        let mut registry = SweepTaskRegistry::new(3);
        registry.register(Box::new(
            ConvexPairSweepTask::<Sphere, Sphere, SpherePairDistanceTester>::new(),
        ));
        registry.register(Box::new(
            ConvexPairSweepTask::<Sphere, Capsule, SphereCapsuleDistanceTester>::new(),
        ));
        registry.register(Box::new(
            ConvexPairSweepTask::<Sphere, BoxShape, SphereBoxDistanceTester>::new(),
        ));
        registry.register(Box::new(
            ConvexPairSweepTask::<Capsule, Capsule, CapsulePairDistanceTester>::new(),
        ));
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collidables::shape::IShape;

    #[test]
    fn test_default_registry_is_symmetric() {
        let registry = DefaultTypes::create_default_sweep_task_registry();
        assert_eq!(registry.task_count(), 4);
        let pairs = [
            (Sphere::TYPE_ID, Sphere::TYPE_ID),
            (Sphere::TYPE_ID, Capsule::TYPE_ID),
            (Sphere::TYPE_ID, BoxShape::TYPE_ID),
            (Capsule::TYPE_ID, Capsule::TYPE_ID),
        ];
        for (a, b) in pairs {
            let forward = registry.get_task(a, b).map(|task| task.shape_type_index_a());
            let reverse = registry.get_task(b, a).map(|task| task.shape_type_index_a());
            assert_eq!(forward, Some(a));
            assert_eq!(reverse, Some(a));
        }
        assert!(registry.get_task(Capsule::TYPE_ID, BoxShape::TYPE_ID).is_none());
        assert!(registry.get_task(BoxShape::TYPE_ID, BoxShape::TYPE_ID).is_none());
        assert!(registry.get_task(-1, 0).is_none());
        assert!(registry.get_task(0, 17).is_none());
    }
}
