//! Tap-to-likes estimation engine.
//!
//! Converts between elapsed tap time, tap rate, and observed tap counts and
//! the likes they are expected to produce, using two measured efficiency
//! fractions: how many taps the delivery mechanism actually performs, and how
//! many performed taps register as likes.
//!
//! Zero I/O — pure arithmetic with no opinions about transport or persistence.

pub mod breakdown;
pub mod calibration;
pub mod comparison;
pub mod constants;
pub mod error;
pub mod estimator;
pub mod rate;

pub use breakdown::Breakdown;
pub use calibration::Calibration;
pub use comparison::{QuickReference, SpeedComparison};
pub use constants::{
    APP_EFFICIENCY, DEFAULT_TAP_RATE, MAX_TAP_RATE, MIN_TAP_RATE, QUICK_REFERENCE_MINUTES,
    REGISTRATION_RATE,
};
pub use error::{EstimateError, Result};
pub use estimator::Estimator;
pub use rate::{clamp_tap_rate, is_valid_tap_rate};
