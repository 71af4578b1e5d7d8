use serde::{Deserialize, Serialize};

use crate::physics::collision_detection::sweep_error::SweepError;

/// Tuning parameters for the conservative advancement loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepSettings {
    /// Maximum time of impact that can be reported. The search window is `[0, maximum_t]`.
    pub maximum_t: f32,
    /// Minimum amount of time every sample is allowed to advance the search.
    /// Larger values terminate faster and are less precise around near-tangential contacts.
    pub minimum_progression: f32,
    /// Width of the time interval below which an intersecting sweep is considered converged.
    pub convergence_threshold: f32,
    /// Maximum number of sampling iterations before the sweep gives up.
    pub maximum_iteration_count: u32,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            maximum_t: 1.0,
            minimum_progression: 1e-3,
            convergence_threshold: 1e-5,
            maximum_iteration_count: 25,
        }
    }
}

impl SweepSettings {
    /// Creates settings for a search window of `[0, maximum_t]` with the default tolerances.
    pub fn with_maximum_t(maximum_t: f32) -> Self {
        Self {
            maximum_t,
            ..Self::default()
        }
    }

    /// Checks that every parameter is finite and positive and that at least one iteration is allowed.
    pub fn validate(&self) -> Result<(), SweepError> {
        if !self.maximum_t.is_finite() || self.maximum_t <= 0.0 {
            return Err(SweepError::InvalidSettings("maximum_t must be finite and positive"));
        }
        if !self.minimum_progression.is_finite() || self.minimum_progression <= 0.0 {
            return Err(SweepError::InvalidSettings(
                "minimum_progression must be finite and positive",
            ));
        }
        if !self.convergence_threshold.is_finite() || self.convergence_threshold <= 0.0 {
            return Err(SweepError::InvalidSettings(
                "convergence_threshold must be finite and positive",
            ));
        }
        if self.maximum_iteration_count == 0 {
            return Err(SweepError::InvalidSettings(
                "maximum_iteration_count must be at least one",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = SweepSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.maximum_iteration_count, 25);
        assert_eq!(SweepSettings::with_maximum_t(3.0).maximum_t, 3.0);
    }

    #[test]
    fn test_rejects_degenerate_values() {
        let cases = [
            SweepSettings { maximum_t: 0.0, ..Default::default() },
            SweepSettings { maximum_t: f32::INFINITY, ..Default::default() },
            SweepSettings { minimum_progression: -1e-3, ..Default::default() },
            SweepSettings { convergence_threshold: f32::NAN, ..Default::default() },
            SweepSettings { maximum_iteration_count: 0, ..Default::default() },
        ];
        for settings in cases {
            assert!(
                matches!(settings.validate(), Err(SweepError::InvalidSettings(_))),
                "{settings:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: SweepSettings =
            serde_json::from_str(r#"{"maximum_t": 100.0, "maximum_iteration_count": 40}"#).unwrap();
        assert_eq!(settings.maximum_t, 100.0);
        assert_eq!(settings.maximum_iteration_count, 40);
        assert_eq!(settings.minimum_progression, 1e-3);
        assert_eq!(settings.convergence_threshold, 1e-5);
    }
}
