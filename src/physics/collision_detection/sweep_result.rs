use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Reason a sweep stopped searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SweepTermination {
    /// The bounding sphere cast ruled out any contact in `[0, maximum_t]`.
    BoundingMiss,
    /// The search interval inverted; the shapes provably do not touch in the window.
    Separated,
    /// An intersection was found and the interval narrowed below the convergence threshold.
    Converged,
    /// An iteration failed to shrink the interval.
    Stalled,
    /// The iteration budget ran out.
    IterationLimit,
    /// A sweep filter rejected the pair before any testing.
    Filtered,
}

/// Outcome of a sweep between two shapes.
///
/// `t0` is a conservative lower bound on the time of impact and `t1` the upper end of the final search interval.
/// `hit_location` is relative to shape A's position at time zero and `hit_normal` points from B toward A.
/// On [`SweepTermination::Separated`] the bracket has inverted and is reported clamped into `[0, maximum_t]` with
/// `t0 >= t1`; neither end bounds an impact there.
/// A result that stopped by [`SweepTermination::Stalled`] or [`SweepTermination::IterationLimit`] without
/// intersecting means no impact was found within tolerance, which is weaker than [`SweepTermination::Separated`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    pub intersected: bool,
    pub t0: f32,
    pub t1: f32,
    pub hit_location: Vec3,
    pub hit_normal: Vec3,
    pub termination: SweepTermination,
    /// Number of sampling iterations performed.
    pub iterations: u32,
}

impl SweepResult {
    pub(crate) fn bounding_miss(t0: f32, t1: f32) -> Self {
        Self {
            intersected: false,
            t0,
            t1,
            hit_location: Vec3::ZERO,
            hit_normal: Vec3::ZERO,
            termination: SweepTermination::BoundingMiss,
            iterations: 0,
        }
    }

    pub(crate) fn filtered() -> Self {
        Self {
            termination: SweepTermination::Filtered,
            ..Self::bounding_miss(0.0, 0.0)
        }
    }

    /// Converts a result computed with the shapes swapped back into the caller's frame.
    /// `offset_b` is the offset the caller originally supplied.
    #[inline(always)]
    pub(crate) fn flipped(mut self, offset_b: Vec3) -> Self {
        // Normals point from B to A by convention; retain that when the parameters were reversed.
        self.hit_normal = -self.hit_normal;
        self.hit_location += offset_b;
        self
    }
}
