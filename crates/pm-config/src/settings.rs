//! Run settings loaded from a TOML file.
//!
//! ```toml
//! grid_size = 256
//! interpolation_points = 4
//! interpolate_clamped = true
//! steps = 4000
//! rotations = 2.5
//! rotation_convention = "normalized"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How grid indices are normalised before the phase-space rotation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationConventionSetting {
    /// Rotate raw mesh indices around the grid centre.
    #[default]
    Absolute,
    /// Rotate coordinates scaled to `[-0.5, 0.5)`.
    Normalized,
    /// Rotate coordinates scaled to `[-1, 1)`.
    Centered,
}

/// Parameters that fix one heritage map and the number of times it is applied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeritageSettings {
    /// Mesh points per phase-space axis.
    pub grid_size: usize,
    /// Points per axis used by the interpolation kernel (1..=4).
    pub interpolation_points: usize,
    /// Clamp interpolated values to their nearest samples.
    pub interpolate_clamped: bool,
    /// Rotation steps per synchrotron period.
    pub steps: u32,
    /// Simulated time in synchrotron periods.
    pub rotations: f64,
    pub rotation_convention: RotationConventionSetting,
}

impl Default for HeritageSettings {
    fn default() -> Self {
        Self {
            grid_size: 256,
            interpolation_points: 4,
            interpolate_clamped: true,
            steps: 4000,
            rotations: 1.0,
            rotation_convention: RotationConventionSetting::Absolute,
        }
    }
}

impl HeritageSettings {
    /// Reads settings from a TOML file. Keys missing from the file keep their
    /// defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| SettingsError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        toml::from_str(text).map_err(|source| SettingsError::Toml {
            path: PathBuf::from("<inline>"),
            source,
        })
    }

    /// Number of map applications needed to cover `rotations` periods.
    pub fn total_steps(&self) -> u64 {
        (f64::from(self.steps) * self.rotations.max(0.0)).round() as u64
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse TOML {path:?}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let settings = HeritageSettings::from_toml_str("grid_size = 64").unwrap();
        assert_eq!(settings.grid_size, 64);
        assert_eq!(settings.interpolation_points, 4);
        assert!(settings.interpolate_clamped);
        assert_eq!(settings.steps, 4000);
        assert_eq!(settings.rotation_convention, RotationConventionSetting::Absolute);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = HeritageSettings::from_toml_str("grid = 64").unwrap_err();
        assert!(matches!(err, SettingsError::Toml { .. }));
    }

    #[test]
    fn step_counts_follow_rotations() {
        let settings = HeritageSettings::from_toml_str(
            r#"
            steps = 100
            rotations = 2.5
            rotation_convention = "centered"
            "#,
        )
        .unwrap();
        assert_eq!(settings.total_steps(), 250);
        assert_eq!(settings.rotation_convention, RotationConventionSetting::Centered);
    }

    #[test]
    fn loads_from_disk() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("pm_settings_{nanos}.toml"));
        fs::write(&path, "interpolation_points = 2\ninterpolate_clamped = false\n").unwrap();
        let settings = HeritageSettings::load(&path).unwrap();
        assert_eq!(settings.interpolation_points, 2);
        assert!(!settings.interpolate_clamped);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_reports_io() {
        let err = HeritageSettings::load("/nonexistent/pm/settings.toml").unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }
}
