//! Resolved drawing styles.
//!
//! Settings store colours as hex strings; these types hold them parsed so the
//! render path never deals with malformed input.

use boardkit_core::Rgba;
use boardkit_settings::{ControlPointSettings, EditorConfig, GridSettings, StyleSettings};

/// Selection accent shared by handles, bounding boxes and text selection.
pub const ACCENT: Rgba = Rgba::opaque(0x1a, 0x7f, 0xd4);

fn color_or(hex: &str, fallback: Rgba) -> Rgba {
    Rgba::from_hex(hex).unwrap_or_else(|| {
        tracing::warn!("Invalid colour '{}', using {}", hex, fallback.to_hex());
        fallback
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPointStyle {
    pub size: f64,
    pub fill: Rgba,
    pub stroke: Rgba,
    pub line_width: f64,
    pub rotation_handle_offset: f64,
}

impl Default for ControlPointStyle {
    fn default() -> Self {
        Self {
            size: 10.0,
            fill: Rgba::opaque(255, 255, 255),
            stroke: ACCENT,
            line_width: 1.0,
            rotation_handle_offset: 20.0,
        }
    }
}

impl From<&ControlPointSettings> for ControlPointStyle {
    fn from(settings: &ControlPointSettings) -> Self {
        let defaults = Self::default();
        Self {
            size: settings.size,
            fill: color_or(&settings.fill, defaults.fill),
            stroke: color_or(&settings.stroke, defaults.stroke),
            line_width: settings.line_width,
            rotation_handle_offset: settings.rotation_handle_offset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStyle {
    pub primary_interval: u32,
    pub secondary_interval: u32,
    pub primary_color: Rgba,
    pub secondary_color: Rgba,
    pub axis_color: Rgba,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            primary_interval: 10,
            secondary_interval: 5,
            primary_color: Rgba::new(0, 0, 0, 0x1a),
            secondary_color: Rgba::new(0, 0, 0, 0x0d),
            axis_color: Rgba::new(0, 0, 0, 0x33),
        }
    }
}

impl From<&GridSettings> for GridStyle {
    fn from(settings: &GridSettings) -> Self {
        let defaults = Self::default();
        Self {
            primary_interval: settings.primary_interval.max(1),
            secondary_interval: settings.secondary_interval.max(1),
            primary_color: color_or(&settings.primary_color, defaults.primary_color),
            secondary_color: color_or(&settings.secondary_color, defaults.secondary_color),
            axis_color: color_or(&settings.axis_color, defaults.axis_color),
        }
    }
}

/// Everything the render pass needs besides the scene itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub background: Rgba,
    pub selection: Rgba,
    pub text_selection: Rgba,
    pub crop_overlay: Rgba,
    pub control_points: ControlPointStyle,
    pub grid: GridStyle,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: Rgba::opaque(0x18, 0x18, 0x1b),
            selection: ACCENT,
            text_selection: ACCENT.with_alpha(0.3),
            crop_overlay: Rgba::new(0, 0, 0, 0x80),
            control_points: ControlPointStyle::default(),
            grid: GridStyle::default(),
        }
    }
}

impl From<&StyleSettings> for RenderStyle {
    fn from(settings: &StyleSettings) -> Self {
        let defaults = Self::default();
        Self {
            background: color_or(&settings.background, defaults.background),
            selection: color_or(&settings.control_point.stroke, defaults.selection),
            text_selection: color_or(&settings.text.selection_color, ACCENT).with_alpha(0.3),
            crop_overlay: color_or(&settings.crop_overlay, defaults.crop_overlay),
            control_points: ControlPointStyle::from(&settings.control_point),
            grid: GridStyle::from(&settings.grid),
        }
    }
}

impl From<&EditorConfig> for RenderStyle {
    fn from(config: &EditorConfig) -> Self {
        Self::from(&config.style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_settings_defaults() {
        let from_settings = RenderStyle::from(&StyleSettings::default());
        assert_eq!(from_settings, RenderStyle::default());
    }

    #[test]
    fn test_bad_colour_falls_back() {
        let mut settings = ControlPointSettings::default();
        settings.fill = "not-a-colour".into();
        let style = ControlPointStyle::from(&settings);
        assert_eq!(style.fill, Rgba::opaque(255, 255, 255));
    }
}
