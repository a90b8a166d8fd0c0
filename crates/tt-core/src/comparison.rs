use std::fmt;

use serde::{Deserialize, Serialize};

/// One row of a rate comparison over a fixed duration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedComparison {
    pub tap_rate: i64,
    pub expected_likes: i64,
    pub taps_per_minute: i64,
    pub likes_per_minute: i64,
}

impl fmt::Display for SpeedComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} taps/sec → {} likes ({} likes/min)",
            self.tap_rate, self.expected_likes, self.likes_per_minute
        )
    }
}

/// One row of the quick-reference table for a fixed rate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuickReference {
    pub minutes: i64,
    pub expected_likes: i64,
}

impl fmt::Display for QuickReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min → {} likes", self.minutes, self.expected_likes)
    }
}
