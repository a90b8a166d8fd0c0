use serde::{Deserialize, Serialize};

use crate::constants::{APP_EFFICIENCY, REGISTRATION_RATE};

/// Measured efficiency fractions the estimator is built around.
///
/// Both values are fractions in (0, 1]. The defaults come from observed
/// session data; deployments that measure different delivery behavior can
/// construct an [`crate::Estimator`] with their own figures instead of
/// patching constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Fraction of theoretical taps actually delivered.
    #[serde(default = "default_app_efficiency")]
    pub app_efficiency: f64,
    /// Fraction of delivered taps that register as a like.
    #[serde(default = "default_registration_rate")]
    pub registration_rate: f64,
}

impl Calibration {
    pub fn new(app_efficiency: f64, registration_rate: f64) -> Self {
        Self {
            app_efficiency,
            registration_rate,
        }
    }

    /// Combined end-to-end efficiency: delivery loss times registration loss.
    /// Used when only a time/rate pair is known and no tap counter ran.
    pub fn combined(&self) -> f64 {
        self.app_efficiency * self.registration_rate
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            app_efficiency: APP_EFFICIENCY,
            registration_rate: REGISTRATION_RATE,
        }
    }
}

fn default_app_efficiency() -> f64 {
    APP_EFFICIENCY
}

fn default_registration_rate() -> f64 {
    REGISTRATION_RATE
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_combined() {
        let c = Calibration::default();
        assert_relative_eq!(c.combined(), 0.9465084, epsilon = 1e-12);
    }

    #[test]
    fn test_combined_is_derived_not_stored() {
        let c = Calibration::new(0.5, 0.5);
        assert_relative_eq!(c.combined(), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_deserialize_partial_fills_defaults() {
        let c: Calibration = serde_json::from_str(r#"{"app_efficiency": 0.9}"#).unwrap();
        assert_relative_eq!(c.app_efficiency, 0.9, epsilon = 1e-12);
        assert_relative_eq!(c.registration_rate, 0.978, epsilon = 1e-12);
    }

    #[test]
    fn test_deserialize_empty_is_default() {
        let c: Calibration = serde_json::from_str("{}").unwrap();
        assert_eq!(c, Calibration::default());
    }
}
