use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One completed tap session: what ran, for how long, and what it should
/// have earned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub started_unix: u64,
    pub duration_secs: u64,
    pub tap_rate: i64,
    pub taps: i64,
    pub estimated_likes: i64,
}

impl SessionRecord {
    pub fn new(
        started_unix: u64,
        duration_secs: u64,
        tap_rate: i64,
        taps: i64,
        estimated_likes: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_unix,
            duration_secs,
            tap_rate,
            taps,
            estimated_likes,
        }
    }
}
