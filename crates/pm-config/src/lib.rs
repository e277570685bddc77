//! Process-wide configuration shared by the heritage map crates: tracing
//! subscriber setup, deterministic execution switches and the TOML settings
//! file describing a rotation run.

pub mod determinism;
pub mod settings;
pub mod tracing;

pub use settings::{HeritageSettings, RotationConventionSetting, SettingsError};
