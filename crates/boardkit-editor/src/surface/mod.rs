//! Drawing surfaces.
//!
//! The editor renders through the [`Surface`] trait, a small immediate-mode
//! 2D context with a current affine transform and a save/restore stack.
//! [`PixmapSurface`] rasterizes with tiny-skia; [`RecordingSurface`] keeps a
//! log of draw calls for tests and headless inspection.

mod pixmap;
mod recording;

pub use pixmap::PixmapSurface;
pub use recording::{DrawOp, RecordingSurface};

use boardkit_core::{Bounds, Position, Rgba};
use image::RgbaImage;
pub use tiny_skia::Transform as Affine;

/// Stroke parameters. Widths are in the current user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f64,
    /// Dash and gap length, if dashed.
    pub dash: Option<[f64; 2]>,
}

impl StrokeStyle {
    pub fn solid(color: Rgba, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Rgba, width: f64, dash: f64, gap: f64) -> Self {
        Self {
            color,
            width,
            dash: Some([dash, gap]),
        }
    }
}

/// Font selection for [`Surface::fill_text`].
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
}

/// Region left unfilled by [`Surface::fill_outside`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hole {
    Rect(Bounds),
    Circle { center: Position, radius: f64 },
}

pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Reallocate the backing store. Contents are discarded.
    fn resize(&mut self, width: u32, height: u32);

    fn transform(&self) -> Affine;
    fn set_transform(&mut self, transform: Affine);
    fn save(&mut self);
    fn restore(&mut self);

    fn reset_transform(&mut self) {
        self.set_transform(Affine::identity());
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        let t = self.transform().pre_translate(dx as f32, dy as f32);
        self.set_transform(t);
    }

    /// Rotate by `radians`, clockwise on screen.
    fn rotate(&mut self, radians: f64) {
        let t = self
            .transform()
            .pre_concat(Affine::from_rotate(radians.to_degrees() as f32));
        self.set_transform(t);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        let t = self.transform().pre_scale(sx as f32, sy as f32);
        self.set_transform(t);
    }

    /// Fill the whole surface ignoring the current transform.
    fn clear(&mut self, color: Rgba);

    fn fill_rect(&mut self, rect: Bounds, color: Rgba);
    fn stroke_rect(&mut self, rect: Bounds, stroke: &StrokeStyle);
    fn stroke_polyline(&mut self, points: &[Position], closed: bool, stroke: &StrokeStyle);
    fn fill_circle(&mut self, center: Position, radius: f64, color: Rgba);
    fn stroke_circle(&mut self, center: Position, radius: f64, stroke: &StrokeStyle);
    /// Arc from `start` to `end` radians, clockwise.
    fn stroke_arc(&mut self, center: Position, radius: f64, start: f64, end: f64, stroke: &StrokeStyle);

    /// Fill `outer` except for `hole`.
    fn fill_outside(&mut self, outer: Bounds, hole: Hole, color: Rgba);

    /// Draw `image` stretched over `dest`.
    fn draw_image(&mut self, image: &RgbaImage, dest: Bounds);

    /// Draw one line of text with its line box's top-left corner at `origin`.
    fn fill_text(&mut self, text: &str, origin: Position, font: &FontSpec, color: Rgba);
}

/// Points approximating a clockwise arc, with at least one segment per
/// eight degrees.
pub(crate) fn arc_points(center: Position, radius: f64, start: f64, end: f64) -> Vec<Position> {
    let sweep = end - start;
    let segments = ((sweep.abs() / (std::f64::consts::PI / 22.5)).ceil() as usize).max(1);
    (0..=segments)
        .map(|i| {
            let a = start + sweep * i as f64 / segments as f64;
            Position::new(center.x + radius * a.cos(), center.y + radius * a.sin())
        })
        .collect()
}
