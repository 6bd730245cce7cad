//! tiny-skia backed surface.

use super::{arc_points, Affine, FontSpec, Hole, StrokeStyle, Surface};
use crate::font_manager;
use boardkit_core::{Bounds, EditorError, Position, Rgba};
use image::RgbaImage;
use rusttype::{point as rt_point, Scale};
use std::path::Path;
use tiny_skia::{
    Color, ColorU8, FillRule, FilterQuality, Paint, Path as SkPath, PathBuilder, Pixmap,
    PixmapPaint, Rect, Stroke, StrokeDash,
};

/// Rasterizing surface backed by a premultiplied RGBA pixmap.
pub struct PixmapSurface {
    pixmap: Pixmap,
    transform: Affine,
    stack: Vec<Affine>,
}

fn color(c: Rgba) -> Color {
    Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn paint(c: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color(c));
    paint.anti_alias = true;
    paint
}

fn rect(b: Bounds) -> Option<Rect> {
    Rect::from_ltrb(b.left as f32, b.top as f32, b.right as f32, b.bottom as f32)
}

fn polyline(points: &[Position], closed: bool) -> Option<SkPath> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in rest {
        pb.line_to(p.x as f32, p.y as f32);
    }
    if closed {
        pb.close();
    }
    pb.finish()
}

fn to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32) -> Result<Self, EditorError> {
        let pixmap = Pixmap::new(width.max(1), height.max(1)).ok_or_else(|| EditorError::Surface {
            reason: format!("cannot allocate {}x{} pixmap", width, height),
        })?;
        Ok(Self {
            pixmap,
            transform: Affine::identity(),
            stack: Vec::new(),
        })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Demultiplied copy of the current contents.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut out = RgbaImage::new(self.pixmap.width(), self.pixmap.height());
        for (dst, src) in out.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
        }
        out
    }

    pub fn save_png(&self, path: &Path) -> Result<(), EditorError> {
        self.pixmap.save_png(path).map_err(|e| EditorError::Surface {
            reason: format!("failed to write {}: {}", path.display(), e),
        })?;
        tracing::info!("Wrote {}x{} PNG to {}", self.width(), self.height(), path.display());
        Ok(())
    }

    fn stroke_path(&mut self, path: &SkPath, style: &StrokeStyle) {
        let mut stroke = Stroke {
            width: style.width as f32,
            ..Default::default()
        };
        if let Some([dash, gap]) = style.dash {
            stroke.dash = StrokeDash::new(vec![dash as f32, gap as f32], 0.0);
        }
        self.pixmap
            .stroke_path(path, &paint(style.color), &stroke, self.transform, None);
    }
}

impl Surface for PixmapSurface {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn resize(&mut self, width: u32, height: u32) {
        match Pixmap::new(width.max(1), height.max(1)) {
            Some(pixmap) => self.pixmap = pixmap,
            None => tracing::error!("Cannot resize surface to {}x{}", width, height),
        }
        self.transform = Affine::identity();
        self.stack.clear();
    }

    fn transform(&self) -> Affine {
        self.transform
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.transform = t;
        }
    }

    fn clear(&mut self, c: Rgba) {
        self.pixmap.fill(color(c));
    }

    fn fill_rect(&mut self, b: Bounds, c: Rgba) {
        if let Some(r) = rect(b) {
            self.pixmap.fill_rect(r, &paint(c), self.transform, None);
        }
    }

    fn stroke_rect(&mut self, b: Bounds, stroke: &StrokeStyle) {
        if let Some(path) = polyline(&b.corners(), true) {
            self.stroke_path(&path, stroke);
        }
    }

    fn stroke_polyline(&mut self, points: &[Position], closed: bool, stroke: &StrokeStyle) {
        if let Some(path) = polyline(points, closed) {
            self.stroke_path(&path, stroke);
        }
    }

    fn fill_circle(&mut self, center: Position, radius: f64, c: Rgba) {
        if let Some(path) = PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32) {
            self.pixmap
                .fill_path(&path, &paint(c), FillRule::Winding, self.transform, None);
        }
    }

    fn stroke_circle(&mut self, center: Position, radius: f64, stroke: &StrokeStyle) {
        if let Some(path) = PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32) {
            self.stroke_path(&path, stroke);
        }
    }

    fn stroke_arc(&mut self, center: Position, radius: f64, start: f64, end: f64, stroke: &StrokeStyle) {
        let points = arc_points(center, radius, start, end);
        if let Some(path) = polyline(&points, false) {
            self.stroke_path(&path, stroke);
        }
    }

    fn fill_outside(&mut self, outer: Bounds, hole: Hole, c: Rgba) {
        let Some(outer_rect) = rect(outer) else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.push_rect(outer_rect);
        match hole {
            Hole::Rect(b) => {
                if let Some(r) = rect(b) {
                    pb.push_rect(r);
                }
            }
            Hole::Circle { center, radius } => {
                pb.push_circle(center.x as f32, center.y as f32, radius as f32);
            }
        }
        if let Some(path) = pb.finish() {
            self.pixmap
                .fill_path(&path, &paint(c), FillRule::EvenOdd, self.transform, None);
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, dest: Bounds) {
        let Some(src) = to_pixmap(image) else {
            return;
        };
        let sx = dest.width() / f64::from(image.width());
        let sy = dest.height() / f64::from(image.height());
        let transform = self
            .transform
            .pre_translate(dest.left as f32, dest.top as f32)
            .pre_scale(sx as f32, sy as f32);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..Default::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, src.as_ref(), &paint, transform, None);
    }

    fn fill_text(&mut self, text: &str, origin: Position, font: &FontSpec, c: Rgba) {
        let Some(face) = font_manager::font_for(font) else {
            return;
        };
        let scale = Scale::uniform(font.size as f32);
        let v_metrics = face.v_metrics(scale);
        let glyphs: Vec<_> = face
            .layout(text, scale, rt_point(0.0, v_metrics.ascent))
            .collect();

        let width = glyphs
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
            .ceil() as u32;
        let height = (v_metrics.ascent - v_metrics.descent).ceil() as u32;
        let Some(mut layer) = Pixmap::new(width.max(1), height.max(1)) else {
            return;
        };

        let stride = layer.width() as i32;
        let rows = layer.height() as i32;
        let pixels = layer.pixels_mut();
        for glyph in &glyphs {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let x = gx as i32 + bb.min.x;
                let y = gy as i32 + bb.min.y;
                if x < 0 || y < 0 || x >= stride || y >= rows {
                    return;
                }
                let alpha = (f32::from(c.a) * coverage.clamp(0.0, 1.0)).round() as u8;
                let idx = (y * stride + x) as usize;
                let existing = pixels[idx].demultiply().alpha();
                if alpha > existing {
                    pixels[idx] = ColorU8::from_rgba(c.r, c.g, c.b, alpha).premultiply();
                }
            });
        }

        let transform = self
            .transform
            .pre_translate(origin.x as f32, origin.y as f32);
        self.pixmap
            .draw_pixmap(0, 0, layer.as_ref(), &PixmapPaint::default(), transform, None);
    }
}
