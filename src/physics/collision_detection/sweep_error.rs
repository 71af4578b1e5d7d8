use thiserror::Error;

/// Errors reported when dispatching a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SweepError {
    /// No sweep task is registered for the shape type pair.
    #[error("no sweep task registered for shape types {type_a} and {type_b}")]
    MissingTask {
        /// Type id of the first shape.
        type_a: i32,
        /// Type id of the second shape.
        type_b: i32,
    },
    /// A sweep setting is out of range.
    #[error("invalid sweep settings: {0}")]
    InvalidSettings(&'static str),
}
