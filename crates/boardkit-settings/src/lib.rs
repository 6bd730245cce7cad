//! BoardKit Settings Crate
//!
//! Handles editor configuration: the recognized canvas options, gesture
//! tuning values and visual style, with JSON/TOML persistence.

pub mod config;
pub mod error;

pub use config::{
    CanvasSettings, ControlPointSettings, EditorConfig, GridSettings, InteractionSettings,
    StyleSettings, TextDefaults,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
