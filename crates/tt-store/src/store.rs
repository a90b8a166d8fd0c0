use std::path::{Path, PathBuf};
use std::{env, fs};

use rusqlite::{Connection, params};
use uuid::Uuid;

use tt_core::{DEFAULT_TAP_RATE, clamp_tap_rate, is_valid_tap_rate};

use crate::error::{Result, StoreError};
use crate::schema;
use crate::session::SessionRecord;

/// Base directory for all tap-tally state. `TT_DATA_DIR` overrides the
/// default of `~/.tap-tally` (tests point it at temp dirs).
pub fn default_base_dir() -> PathBuf {
    if let Ok(dir) = env::var("TT_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs_home().join(".tap-tally")
}

fn dirs_home() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    /// Open the store under the default base dir, creating it as needed.
    pub fn open_default() -> Result<Self> {
        let base = default_base_dir();
        fs::create_dir_all(&base)?;
        Self::open(&base.join("tap-tally.db"))
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // --- Settings ---

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM settings WHERE key = ?1")?;
        let result = stmt.query_row([key], |row| row.get(0)).ok();
        Ok(result)
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// The stored tap-rate preference, or [`DEFAULT_TAP_RATE`] when absent.
    /// A stored value outside the supported window (hand-edited database)
    /// is clamped rather than surfaced as an error.
    pub fn tap_rate(&self) -> Result<i64> {
        let Some(raw) = self.get_setting("tap_rate")? else {
            return Ok(DEFAULT_TAP_RATE);
        };

        match raw.parse::<i64>() {
            Ok(rate) if is_valid_tap_rate(rate) => Ok(rate),
            Ok(rate) => {
                tracing::warn!("stored tap rate {rate} out of range, clamping");
                Ok(clamp_tap_rate(rate))
            }
            Err(_) => {
                tracing::warn!("stored tap rate {raw:?} unparseable, using default");
                Ok(DEFAULT_TAP_RATE)
            }
        }
    }

    /// Persist a new tap-rate preference. Out-of-range input is rejected.
    pub fn set_tap_rate(&self, rate: i64) -> Result<()> {
        if !is_valid_tap_rate(rate) {
            return Err(StoreError::InvalidRate(rate));
        }
        self.set_setting("tap_rate", &rate.to_string())
    }

    // --- Sessions ---

    pub fn record_session(&self, session: &SessionRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sessions (id, started_unix, duration_secs, tap_rate, taps, estimated_likes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                session.id.to_string(),
                session.started_unix as i64,
                session.duration_secs as i64,
                session.tap_rate,
                session.taps,
                session.estimated_likes,
            ],
        )?;
        tracing::debug!(
            "recorded session {}: {} taps -> {} likes",
            session.id,
            session.taps,
            session.estimated_likes
        );
        Ok(())
    }

    /// Most recent sessions first, newest `limit` of them.
    pub fn recent_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, started_unix, duration_secs, tap_rate, taps, estimated_likes
             FROM sessions ORDER BY started_unix DESC, id LIMIT ?1",
        )?;
        let rows: Vec<(String, i64, i64, i64, i64, i64)> = stmt
            .query_map([limit as i64], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                ))
            })?
            .collect::<std::result::Result<_, _>>()?;

        rows.into_iter()
            .map(|(id, started_unix, duration_secs, tap_rate, taps, estimated_likes)| {
                let id = Uuid::parse_str(&id)
                    .map_err(|e| StoreError::InvalidData(format!("session id {id:?}: {e}")))?;
                Ok(SessionRecord {
                    id,
                    started_unix: started_unix as u64,
                    duration_secs: duration_secs as u64,
                    tap_rate,
                    taps,
                    estimated_likes,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(started_unix: u64, taps: i64) -> SessionRecord {
        SessionRecord::new(started_unix, 60, 5, taps, (taps as f64 * 0.978).round() as i64)
    }

    #[test]
    fn test_tap_rate_defaults_when_absent() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.tap_rate().unwrap(), DEFAULT_TAP_RATE);
    }

    #[test]
    fn test_tap_rate_roundtrip() {
        let store = Store::open_in_memory().unwrap();
        store.set_tap_rate(12).unwrap();
        assert_eq!(store.tap_rate().unwrap(), 12);
    }

    #[test]
    fn test_set_tap_rate_rejects_out_of_range() {
        let store = Store::open_in_memory().unwrap();
        assert!(matches!(
            store.set_tap_rate(0),
            Err(StoreError::InvalidRate(0))
        ));
        assert!(matches!(
            store.set_tap_rate(21),
            Err(StoreError::InvalidRate(21))
        ));
        // Failed sets leave the preference untouched
        assert_eq!(store.tap_rate().unwrap(), DEFAULT_TAP_RATE);
    }

    #[test]
    fn test_tap_rate_clamps_hand_edited_value() {
        let store = Store::open_in_memory().unwrap();
        store
            .conn()
            .execute(
                "INSERT INTO settings (key, value) VALUES ('tap_rate', '99')",
                [],
            )
            .unwrap();
        assert_eq!(store.tap_rate().unwrap(), 20);
    }

    #[test]
    fn test_tap_rate_garbage_falls_back_to_default() {
        let store = Store::open_in_memory().unwrap();
        store
            .conn()
            .execute(
                "INSERT INTO settings (key, value) VALUES ('tap_rate', 'fast')",
                [],
            )
            .unwrap();
        assert_eq!(store.tap_rate().unwrap(), DEFAULT_TAP_RATE);
    }

    #[test]
    fn test_session_roundtrip() {
        let store = Store::open_in_memory().unwrap();
        let recorded = session(1_700_000_000, 300);
        store.record_session(&recorded).unwrap();

        let loaded = store.recent_sessions(10).unwrap();
        assert_eq!(loaded, vec![recorded]);
    }

    #[test]
    fn test_recent_sessions_newest_first_with_limit() {
        let store = Store::open_in_memory().unwrap();
        for i in 0..5 {
            store.record_session(&session(1_700_000_000 + i * 60, 100)).unwrap();
        }

        let loaded = store.recent_sessions(3).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[0].started_unix, 1_700_000_240);
        assert_eq!(loaded[2].started_unix, 1_700_000_120);
    }

    #[test]
    fn test_open_creates_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tap-tally.db");
        let store = Store::open(&path).unwrap();
        store.set_tap_rate(7).unwrap();
        drop(store);

        assert!(path.exists());
        let reopened = Store::open(&path).unwrap();
        assert_eq!(reopened.tap_rate().unwrap(), 7);
    }
}
