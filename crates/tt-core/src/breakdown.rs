use std::fmt;

use serde::{Deserialize, Serialize};

/// Full calculation trace from a duration/rate pair to expected likes.
///
/// When derived (no observed count), `app_taps <= theoretical_taps` holds for
/// non-negative inputs. An externally supplied count is reported as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub minutes: i64,
    pub tap_rate: i64,
    pub theoretical_taps: i64,
    pub app_taps: i64,
    pub app_efficiency_percent: f64,
    pub registration_rate_percent: f64,
    pub expected_likes: i64,
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "LIKES BREAKDOWN")?;
        writeln!(f, "  duration:          {} min", self.minutes)?;
        writeln!(f, "  tap rate:          {} taps/sec", self.tap_rate)?;
        writeln!(f, "  theoretical taps:  {}", self.theoretical_taps)?;
        writeln!(
            f,
            "  app taps:          {} ({:.1}%)",
            self.app_taps, self.app_efficiency_percent
        )?;
        writeln!(
            f,
            "  registration rate: {:.1}%",
            self.registration_rate_percent
        )?;
        write!(f, "  expected likes:    {}", self.expected_likes)
    }
}
