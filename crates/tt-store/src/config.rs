//! Optional calibration overrides from `config.toml` under the data dir.
//!
//! ```toml
//! [calibration]
//! app_efficiency = 0.9678
//! registration_rate = 0.978
//! ```
//!
//! A missing file means the built-in calibration; a present file may override
//! either fraction or both. Values outside (0, 1] are rejected rather than
//! silently producing nonsense estimates.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use tt_core::Calibration;

use crate::error::{Result, StoreError};

#[derive(Debug, Deserialize)]
struct ConfigFile {
    calibration: Option<Calibration>,
}

/// Load calibration from `config.toml` under `base`.
pub fn load_calibration(base: &Path) -> Result<Calibration> {
    let path = base.join("config.toml");
    if !path.exists() {
        return Ok(Calibration::default());
    }

    let content = fs::read_to_string(&path)?;
    let parsed: ConfigFile = toml::from_str(&content)
        .map_err(|e| StoreError::InvalidData(format!("{}: {e}", path.display())))?;

    let calibration = parsed.calibration.unwrap_or_default();
    validate(&calibration)?;
    tracing::debug!(
        "calibration from {}: app {:.4}, registration {:.4}",
        path.display(),
        calibration.app_efficiency,
        calibration.registration_rate
    );
    Ok(calibration)
}

fn validate(calibration: &Calibration) -> Result<()> {
    let fractions = [
        ("app_efficiency", calibration.app_efficiency),
        ("registration_rate", calibration.registration_rate),
    ];
    for (name, value) in fractions {
        if !(value > 0.0 && value <= 1.0) {
            return Err(StoreError::InvalidData(format!(
                "{name} must be in (0, 1], got {value}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) {
        fs::write(dir.path().join("config.toml"), content).unwrap();
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load_calibration(dir.path()).unwrap(), Calibration::default());
    }

    #[test]
    fn test_full_override() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            "[calibration]\napp_efficiency = 0.9\nregistration_rate = 0.8\n",
        );
        let c = load_calibration(dir.path()).unwrap();
        assert_eq!(c, Calibration::new(0.9, 0.8));
    }

    #[test]
    fn test_partial_override_keeps_other_default() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "[calibration]\napp_efficiency = 0.5\n");
        let c = load_calibration(dir.path()).unwrap();
        assert_eq!(c.app_efficiency, 0.5);
        assert_eq!(c.registration_rate, Calibration::default().registration_rate);
    }

    #[test]
    fn test_empty_file_is_default() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "");
        assert_eq!(load_calibration(dir.path()).unwrap(), Calibration::default());
    }

    #[test]
    fn test_out_of_range_fraction_rejected() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "[calibration]\napp_efficiency = 1.5\n");
        assert!(matches!(
            load_calibration(dir.path()),
            Err(StoreError::InvalidData(_))
        ));

        write_config(&dir, "[calibration]\nregistration_rate = 0.0\n");
        assert!(matches!(
            load_calibration(dir.path()),
            Err(StoreError::InvalidData(_))
        ));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "[calibration\napp_efficiency = ");
        assert!(matches!(
            load_calibration(dir.path()),
            Err(StoreError::InvalidData(_))
        ));
    }
}
