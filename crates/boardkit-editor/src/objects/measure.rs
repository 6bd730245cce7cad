//! Text measurement.

use crate::font_manager;
use crate::surface::FontSpec;
use rusttype::{point as rt_point, Scale};
use std::fmt;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Size of one laid-out line of text.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineMetrics {
    pub width: f64,
    /// Ascent plus descent.
    pub height: f64,
}

pub trait TextMeasurer: fmt::Debug {
    fn measure(&self, text: &str, font: &FontSpec) -> LineMetrics;

    fn line_height(&self, font: &FontSpec) -> f64 {
        font.size * LINE_HEIGHT_FACTOR
    }
}

/// Fixed-advance metrics: every character is `0.6 * size` wide.
///
/// Deterministic and font independent, which makes it the default for
/// headless use and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonospaceMeasurer;

impl MonospaceMeasurer {
    pub const ADVANCE: f64 = 0.6;
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> LineMetrics {
        LineMetrics {
            width: text.chars().count() as f64 * font.size * Self::ADVANCE,
            height: font.size,
        }
    }
}

/// Metrics from real font outlines, falling back to [`MonospaceMeasurer`]
/// when no font can be loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlyphMeasurer;

impl TextMeasurer for GlyphMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> LineMetrics {
        let Some(face) = font_manager::font_for(font) else {
            return MonospaceMeasurer.measure(text, font);
        };
        let scale = Scale::uniform(font.size as f32);
        let v = face.v_metrics(scale);
        let width = face
            .layout(text, scale, rt_point(0.0, v.ascent))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0);
        LineMetrics {
            width: f64::from(width),
            height: f64::from(v.ascent - v.descent),
        }
    }
}
