pub mod math_helper;
pub mod quaternion_wide;
pub mod thread_dispatcher;
pub mod vector;
pub mod vector3_wide;
