//! Configuration for the BoardKit editor
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats.
//!
//! Configuration is organized into logical sections:
//! - Canvas settings (zoom bounds, grid, culling, zoom animation)
//! - Interaction tuning (gesture damping, scale limits, hit targets, undo depth)
//! - Style (control points, grid colours, text defaults, crop overlay)

use crate::error::{ConfigError, SettingsError, SettingsResult};
use boardkit_core::Rgba;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Canvas and camera settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    /// Zoom level applied when the controller is created
    pub initial_zoom: f64,
    /// Lower zoom bound
    pub min_zoom: f64,
    /// Upper zoom bound
    pub max_zoom: f64,
    /// Base grid spacing in world units
    pub grid_size: f64,
    /// Extra screen pixels around the viewport that still get rendered
    pub culling_margin: f64,
    /// Interpolate wheel zoom instead of applying it immediately
    pub animate_zoom: bool,
    /// Duration of an animated zoom step in milliseconds
    pub zoom_animation_duration_ms: u64,
    /// Ratio between device pixels and pointer coordinates
    pub device_pixel_ratio: f64,
    /// Draw the debug overlay and log verbose state
    pub debug: bool,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            initial_zoom: 1.0,
            min_zoom: 0.1,
            max_zoom: 10.0,
            grid_size: 10.0,
            culling_margin: 100.0,
            animate_zoom: true,
            zoom_animation_duration_ms: 150,
            device_pixel_ratio: 1.0,
            debug: false,
        }
    }
}

/// Gesture tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Fraction of the pointer's angular travel applied to rotation
    pub rotation_smoothing: f64,
    /// Width of the soft band near the scale limits, as a fraction of the range
    pub scale_smoothing: f64,
    /// Smallest allowed scale component
    pub min_scale: f64,
    /// Largest allowed scale component
    pub max_scale: f64,
    /// On-screen size in pixels below which objects use a circular hit target
    pub min_hit_size: f64,
    /// Screen distance from the center line the pointer must exceed to flip
    pub flip_tolerance: f64,
    /// Undo history depth of the interactive controller
    pub max_undo_stack_size: usize,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            rotation_smoothing: 0.5,
            scale_smoothing: 0.05,
            min_scale: 0.1,
            max_scale: 5.0,
            min_hit_size: 20.0,
            flip_tolerance: 0.0,
            max_undo_stack_size: 100,
        }
    }
}

/// Control point appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlPointSettings {
    /// Handle diameter in screen pixels
    pub size: f64,
    pub fill: String,
    pub stroke: String,
    pub line_width: f64,
    /// Distance of the rotation handle above the top edge, in screen pixels
    pub rotation_handle_offset: f64,
}

impl Default for ControlPointSettings {
    fn default() -> Self {
        Self {
            size: 10.0,
            fill: "#ffffff".to_string(),
            stroke: "#1a7fd4".to_string(),
            line_width: 1.0,
            rotation_handle_offset: 20.0,
        }
    }
}

/// Background grid appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Divisor of the cell size for primary lines
    pub primary_interval: u32,
    /// Divisor of the cell size for secondary lines
    pub secondary_interval: u32,
    pub primary_color: String,
    pub secondary_color: String,
    pub axis_color: String,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            primary_interval: 10,
            secondary_interval: 5,
            primary_color: "#0000001a".to_string(),
            secondary_color: "#0000000d".to_string(),
            axis_color: "#00000033".to_string(),
        }
    }
}

/// Defaults for newly created text objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextDefaults {
    pub font: String,
    pub color: String,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    /// Highlight colour of the edit selection
    pub selection_color: String,
}

impl Default for TextDefaults {
    fn default() -> Self {
        Self {
            font: "Geist Mono".to_string(),
            color: "#ffffff".to_string(),
            size: 20.0,
            bold: false,
            italic: false,
            selection_color: "#1a7fd4".to_string(),
        }
    }
}

/// Style section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSettings {
    pub control_point: ControlPointSettings,
    pub grid: GridSettings,
    pub text: TextDefaults,
    /// Fill used to dim the image outside an active crop area
    pub crop_overlay: String,
    /// Canvas clear colour
    pub background: String,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            control_point: ControlPointSettings::default(),
            grid: GridSettings::default(),
            text: TextDefaults::default(),
            crop_overlay: "#00000080".to_string(),
            background: "#18181b".to_string(),
        }
    }
}

/// Complete editor configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EditorConfig {
    /// Canvas settings
    pub canvas: CanvasSettings,
    /// Gesture tuning
    pub interaction: InteractionSettings,
    /// Visual style
    pub style: StyleSettings,
}

impl EditorConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform configuration path (`<config dir>/boardkit/config.toml`)
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("boardkit").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".into())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let canvas = &self.canvas;
        if !(canvas.min_zoom > 0.0) {
            return Err(ConfigError::out_of_range("canvas.min_zoom", canvas.min_zoom));
        }
        if !(canvas.max_zoom >= canvas.min_zoom) {
            return Err(ConfigError::out_of_range("canvas.max_zoom", canvas.max_zoom));
        }
        if !(canvas.initial_zoom >= canvas.min_zoom && canvas.initial_zoom <= canvas.max_zoom) {
            return Err(ConfigError::out_of_range(
                "canvas.initial_zoom",
                canvas.initial_zoom,
            ));
        }
        if !(canvas.grid_size > 0.0) {
            return Err(ConfigError::out_of_range("canvas.grid_size", canvas.grid_size));
        }
        if !(canvas.culling_margin >= 0.0) {
            return Err(ConfigError::out_of_range(
                "canvas.culling_margin",
                canvas.culling_margin,
            ));
        }
        if !(canvas.device_pixel_ratio > 0.0) {
            return Err(ConfigError::out_of_range(
                "canvas.device_pixel_ratio",
                canvas.device_pixel_ratio,
            ));
        }

        let interaction = &self.interaction;
        if !(interaction.min_scale > 0.0) {
            return Err(ConfigError::out_of_range(
                "interaction.min_scale",
                interaction.min_scale,
            ));
        }
        if !(interaction.max_scale >= interaction.min_scale) {
            return Err(ConfigError::out_of_range(
                "interaction.max_scale",
                interaction.max_scale,
            ));
        }
        for (key, value) in [
            ("interaction.rotation_smoothing", interaction.rotation_smoothing),
            ("interaction.scale_smoothing", interaction.scale_smoothing),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::out_of_range(key, value));
            }
        }
        if !(interaction.min_hit_size >= 0.0) {
            return Err(ConfigError::out_of_range(
                "interaction.min_hit_size",
                interaction.min_hit_size,
            ));
        }
        if !(interaction.flip_tolerance >= 0.0) {
            return Err(ConfigError::out_of_range(
                "interaction.flip_tolerance",
                interaction.flip_tolerance,
            ));
        }
        if interaction.max_undo_stack_size == 0 {
            return Err(ConfigError::out_of_range("interaction.max_undo_stack_size", 0));
        }

        let style = &self.style;
        if !(style.control_point.size > 0.0) {
            return Err(ConfigError::out_of_range(
                "style.control_point.size",
                style.control_point.size,
            ));
        }
        if style.grid.primary_interval == 0 || style.grid.secondary_interval == 0 {
            return Err(ConfigError::out_of_range("style.grid.interval", 0));
        }
        if !(style.text.size > 0.0) {
            return Err(ConfigError::out_of_range("style.text.size", style.text.size));
        }
        for (key, value) in [
            ("style.control_point.fill", &style.control_point.fill),
            ("style.control_point.stroke", &style.control_point.stroke),
            ("style.grid.primary_color", &style.grid.primary_color),
            ("style.grid.secondary_color", &style.grid.secondary_color),
            ("style.grid.axis_color", &style.grid.axis_color),
            ("style.text.color", &style.text.color),
            ("style.text.selection_color", &style.text.selection_color),
            ("style.crop_overlay", &style.crop_overlay),
            ("style.background", &style.background),
        ] {
            if Rgba::from_hex(value).is_none() {
                return Err(ConfigError::InvalidColor {
                    key: key.to_string(),
                    value: value.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(EditorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_zoom_bounds() {
        let mut config = EditorConfig::default();
        config.canvas.min_zoom = 5.0;
        config.canvas.max_zoom = 2.0;
        config.canvas.initial_zoom = 3.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_colour() {
        let mut config = EditorConfig::default();
        config.style.control_point.stroke = "blue".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidColor { .. })
        ));
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("a/b.json")).ok(),
            Some(ConfigFormat::Json)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("b.toml")).ok(),
            Some(ConfigFormat::Toml)
        );
        assert!(ConfigFormat::from_path(Path::new("c.yaml")).is_err());
    }
}
