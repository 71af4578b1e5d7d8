pub mod sweep_batch;
pub mod sweep_error;
pub mod sweep_result;
pub mod sweep_settings;
pub mod sweep_task_registry;
pub mod sweep_tasks;
