use crate::breakdown::Breakdown;
use crate::calibration::Calibration;
use crate::comparison::{QuickReference, SpeedComparison};
use crate::constants::QUICK_REFERENCE_MINUTES;
use crate::error::{EstimateError, Result};

/// Converts between tap time, tap rate, tap counts, and expected likes.
///
/// Every method is a pure function of its arguments and the calibration the
/// estimator was built with. Inputs outside the documented domain (negative
/// durations, rates above [`crate::MAX_TAP_RATE`]) are not rejected here —
/// they produce mathematically defined results, and enforcement belongs to
/// the caller. The only rejected inputs are the two division-by-zero cases,
/// surfaced as [`EstimateError`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Estimator {
    calibration: Calibration,
}

impl Estimator {
    pub fn new(calibration: Calibration) -> Self {
        Self { calibration }
    }

    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    /// Expected likes for `minutes` of tapping at `rate` taps per second,
    /// assuming no tap counter ran: theoretical taps scaled by the combined
    /// efficiency.
    pub fn likes_from_duration(&self, minutes: i64, rate: i64) -> i64 {
        let theoretical = theoretical_taps(minutes, rate);
        round_half_away(theoretical as f64 * self.calibration.combined())
    }

    /// Expected likes given an observed tap count from a live counter.
    /// Only the registration loss applies — the delivery loss already
    /// happened before the counter saw the tap.
    pub fn likes_from_taps(&self, observed_taps: i64) -> i64 {
        round_half_away(observed_taps as f64 * self.calibration.registration_rate)
    }

    /// Whole minutes of tapping at `rate` needed to reach `target_likes`:
    /// the smallest duration whose [`Self::likes_from_duration`] estimate
    /// meets the target. Zero or negative targets need zero minutes.
    pub fn minutes_for_target(&self, target_likes: i64, rate: i64) -> Result<i64> {
        if rate == 0 {
            return Err(EstimateError::ZeroTapRate);
        }
        if target_likes <= 0 {
            return Ok(0);
        }

        let likes_per_minute = rate as f64 * 60.0 * self.calibration.combined();
        // Rounding fires at target - 1/2, so invert against that bound.
        let mut minutes = ((target_likes as f64 - 0.5) / likes_per_minute).ceil() as i64;

        if rate > 0 {
            // Snap to the smallest duration that actually reaches the target;
            // the float inversion can land one minute off at exact boundaries.
            while self.likes_from_duration(minutes, rate) < target_likes {
                minutes += 1;
            }
            while minutes > 0 && self.likes_from_duration(minutes - 1, rate) >= target_likes {
                minutes -= 1;
            }
        }

        Ok(minutes.max(0))
    }

    /// Full calculation trace from duration and rate to expected likes.
    ///
    /// With `observed_taps` present the breakdown uses the real count and
    /// reports the efficiency actually achieved; otherwise both are estimated
    /// from the calibration. A zero theoretical count with an observed count
    /// present reports 0% efficiency rather than dividing by zero.
    pub fn breakdown(&self, minutes: i64, rate: i64, observed_taps: Option<i64>) -> Breakdown {
        let theoretical = theoretical_taps(minutes, rate);
        let estimated_app_taps =
            round_half_away(theoretical as f64 * self.calibration.app_efficiency);
        let app_taps = observed_taps.unwrap_or(estimated_app_taps);
        let expected_likes = round_half_away(app_taps as f64 * self.calibration.registration_rate);

        let app_efficiency_percent = match observed_taps {
            Some(_) if theoretical == 0 => 0.0,
            Some(observed) => observed as f64 / theoretical as f64 * 100.0,
            None => self.calibration.app_efficiency * 100.0,
        };

        Breakdown {
            minutes,
            tap_rate: rate,
            theoretical_taps: theoretical,
            app_taps,
            app_efficiency_percent,
            registration_rate_percent: self.calibration.registration_rate * 100.0,
            expected_likes,
        }
    }

    /// Expected likes for each rate over the same duration, in input order.
    /// Duplicate rates are fine and produce duplicate rows.
    pub fn compare_rates(&self, minutes: i64, rates: &[i64]) -> Result<Vec<SpeedComparison>> {
        if minutes == 0 {
            return Err(EstimateError::ZeroDuration);
        }

        Ok(rates
            .iter()
            .map(|&rate| {
                let expected_likes = self.likes_from_duration(minutes, rate);
                SpeedComparison {
                    tap_rate: rate,
                    expected_likes,
                    taps_per_minute: rate * 60,
                    likes_per_minute: round_half_away(expected_likes as f64 / minutes as f64),
                }
            })
            .collect())
    }

    /// Expected likes at `rate` for the fixed set of common durations.
    pub fn quick_reference(&self, rate: i64) -> Vec<QuickReference> {
        QUICK_REFERENCE_MINUTES
            .iter()
            .map(|&minutes| QuickReference {
                minutes,
                expected_likes: self.likes_from_duration(minutes, rate),
            })
            .collect()
    }
}

/// Taps implied by duration times rate, before any delivery loss.
fn theoretical_taps(minutes: i64, rate: i64) -> i64 {
    minutes * 60 * rate
}

/// Round to the nearest integer, halves away from zero.
/// Every like estimate goes through here so the rounding policy lives in
/// exactly one place.
fn round_half_away(value: f64) -> i64 {
    value.round() as i64
}
