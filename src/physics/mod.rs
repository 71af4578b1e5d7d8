pub mod body_properties;
pub mod collidables;
pub mod collision_detection;
pub mod default_types;
pub mod pose_integration;
