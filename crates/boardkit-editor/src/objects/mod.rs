//! Scene objects.
//!
//! A [`SceneObject`] carries the state every object has (identity, transform,
//! selection flag) and an [`ObjectContent`] variant with the text- or
//! image-specific data. Behavior that differs per variant is dispatched with
//! a `match` on the content.

pub mod image;
pub mod measure;
pub mod text;

pub use self::image::ImageData;
pub use measure::{GlyphMeasurer, LineMetrics, MonospaceMeasurer, TextMeasurer};
pub use text::{FontWeight, StyleRun, TextData, TextSnapshot, TextStyle, TextStylePatch};

use crate::control_points::ControlPointManager;
use crate::screen_space::ScreenSpaceSystem;
use crate::style::RenderStyle;
use crate::surface::{StrokeStyle, Surface};
use crate::types::{Camera, ControlPointType, ObjectId, ObjectKind, Transform};
use boardkit_core::{Bounds, Position};

/// What hit testing needs besides the object.
#[derive(Debug, Clone, Copy)]
pub struct HitContext<'a> {
    pub camera: &'a Camera,
    pub control_points: &'a ControlPointManager,
    /// Objects smaller than this on screen get a circular hit area of this
    /// diameter around their center.
    pub min_hit_size: f64,
}

/// What rendering needs besides the object and the surface.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub camera: &'a Camera,
    pub control_points: &'a ControlPointManager,
    pub style: &'a RenderStyle,
}

#[derive(Debug, Clone)]
pub enum ObjectContent {
    Text(TextData),
    Image(ImageData),
}

#[derive(Debug, Clone)]
pub struct SceneObject {
    id: ObjectId,
    transform: Transform,
    selected: bool,
    content: ObjectContent,
}

impl SceneObject {
    pub fn new(content: ObjectContent, transform: Transform) -> Self {
        Self {
            id: ObjectId::new(),
            transform,
            selected: false,
            content,
        }
    }

    pub fn text(content: impl Into<String>, style: TextStyle, position: Position) -> Self {
        Self::new(
            ObjectContent::Text(TextData::new(content, style)),
            Transform::at(position),
        )
    }

    pub fn image(data: ImageData, position: Position) -> Self {
        Self::new(ObjectContent::Image(data), Transform::at(position))
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn kind(&self) -> ObjectKind {
        match self.content {
            ObjectContent::Text(_) => ObjectKind::Text,
            ObjectContent::Image(_) => ObjectKind::Image,
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Replace the transform. Non-finite transforms are rejected.
    pub fn set_transform(&mut self, transform: Transform) {
        if !transform.is_finite() {
            tracing::warn!("Ignoring non-finite transform for object {}", self.id);
            return;
        }
        self.transform = transform;
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn content(&self) -> &ObjectContent {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut ObjectContent {
        &mut self.content
    }

    pub fn as_text(&self) -> Option<&TextData> {
        match &self.content {
            ObjectContent::Text(text) => Some(text),
            ObjectContent::Image(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextData> {
        match &mut self.content {
            ObjectContent::Text(text) => Some(text),
            ObjectContent::Image(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageData> {
        match &self.content {
            ObjectContent::Image(image) => Some(image),
            ObjectContent::Text(_) => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut ImageData> {
        match &mut self.content {
            ObjectContent::Image(image) => Some(image),
            ObjectContent::Text(_) => None,
        }
    }

    /// Local, untransformed bounds.
    pub fn bounds(&self) -> Bounds {
        match &self.content {
            ObjectContent::Text(text) => text.bounds(),
            ObjectContent::Image(image) => image.bounds(&self.transform),
        }
    }

    /// World-space axis-aligned box around the transformed bounds.
    pub fn world_bounds(&self) -> Bounds {
        ScreenSpaceSystem::new().get_screen_bounds(&self.bounds(), &self.transform, &Camera::default())
    }

    /// Canvas-pixel position of the object's center.
    pub fn screen_center(&self, camera: &Camera) -> Position {
        ScreenSpaceSystem::new().local_to_screen(self.bounds().center(), &self.transform, camera)
    }

    pub fn get_control_point_at_position(&self, point: Position, ctx: &HitContext<'_>) -> ControlPointType {
        ctx.control_points
            .get_control_point_at_position(point, &self.bounds(), &self.transform, ctx.camera)
    }

    /// Hit test a canvas-pixel point.
    ///
    /// Handles of a selected object count as part of it, and tiny objects
    /// are hittable within `min_hit_size / 2` of their center.
    pub fn contains_point(&self, point: Position, ctx: &HitContext<'_>) -> bool {
        let screen_space = ScreenSpaceSystem::new();
        let bounds = self.bounds();

        if let Some(cropper) = self.as_image().and_then(|i| i.cropper()) {
            let pixel = self.local_to_image_pixel(screen_space.screen_to_local_space(point, &self.transform, ctx.camera));
            if cropper
                .get_handle_at_position(pixel, self.pixel_scale(ctx.camera))
                .is_some()
            {
                return true;
            }
        }

        if self.selected
            && self.get_control_point_at_position(point, ctx) != ControlPointType::None
        {
            return true;
        }

        let local = screen_space.screen_to_local_space(point, &self.transform, ctx.camera);
        if bounds.contains(&local) {
            return true;
        }

        let footprint = screen_space.get_screen_bounds(&bounds, &self.transform, ctx.camera);
        if footprint.width() < ctx.min_hit_size || footprint.height() < ctx.min_hit_size {
            let center = screen_space.local_to_screen(bounds.center(), &self.transform, ctx.camera);
            return point.distance_to(&center) <= ctx.min_hit_size / 2.0;
        }
        false
    }

    /// Convert a local point of an image into image-pixel coordinates
    /// (origin at the top-left of the raster).
    pub fn local_to_image_pixel(&self, local: Position) -> Position {
        let rect = self
            .as_image()
            .map(|i| i.content_rect())
            .unwrap_or_default();
        Position::new(local.x - rect.left, local.y - rect.top)
    }

    /// On-screen size of one local unit.
    pub fn pixel_scale(&self, camera: &Camera) -> f64 {
        let s = self.transform.scale.magnitude() * camera.zoom;
        if s.is_finite() && s > 0.0 {
            s
        } else {
            1.0
        }
    }

    pub fn render(&self, surface: &mut dyn Surface, ctx: &RenderContext<'_>) {
        if let ObjectContent::Image(image) = &self.content {
            if !image.is_loaded() {
                return;
            }
        }

        let t = &self.transform;
        surface.save();
        surface.translate(t.position.x, t.position.y);
        surface.rotate(t.rotation);
        surface.scale(t.scale.x * t.flip_sign(), t.scale.y);

        let cropping = match &self.content {
            ObjectContent::Text(text) => {
                render_text(text, surface, ctx, self.pixel_scale(ctx.camera));
                false
            }
            ObjectContent::Image(image) => {
                if let Some(raster) = image.raster() {
                    surface.draw_image(raster, image.content_rect());
                }
                match image.cropper() {
                    Some(cropper) => {
                        let rect = image.content_rect();
                        surface.save();
                        surface.translate(rect.left, rect.top);
                        cropper.render_overlay(
                            surface,
                            self.pixel_scale(ctx.camera),
                            ctx.style.crop_overlay,
                            ctx.style.control_points.fill,
                        );
                        surface.restore();
                        true
                    }
                    None => false,
                }
            }
        };

        if self.selected && !cropping {
            let bounds = self.bounds();
            let eff = ctx.control_points.effective_scale(t, ctx.camera);
            surface.stroke_rect(bounds, &StrokeStyle::solid(ctx.style.selection, 1.0 / eff));
            ctx.control_points
                .draw_control_points(surface, &bounds, t, ctx.camera);
            ctx.control_points
                .draw_rotation_handle(surface, &bounds, t, ctx.camera);
        }

        surface.restore();
    }
}

fn render_text(text: &TextData, surface: &mut dyn Surface, ctx: &RenderContext<'_>, pixel_scale: f64) {
    let layout = text.layout();
    let selection = text.selection_range();

    for (i, line) in layout.lines.iter().enumerate() {
        let top = layout.line_top(i);
        let left = layout.line_left(i);

        if let Some(range) = &selection {
            let a = range.start.max(line.start);
            let b = range.end.min(line.start + line.len);
            if a < b {
                let x0 = left + text.column_x(line, a - line.start);
                let x1 = left + text.column_x(line, b - line.start);
                surface.fill_rect(
                    Bounds::new(x0, top, x1, top + layout.line_height),
                    ctx.style.text_selection,
                );
            }
        }

        for seg in &line.segments {
            surface.fill_text(
                &seg.text,
                Position::new(left + seg.x, top),
                &seg.style.font_spec(),
                seg.style.rgba(),
            );
        }
    }

    if text.caret_visible() {
        if let Some(cursor) = text.cursor() {
            let (line_index, col) = layout.locate(cursor);
            if let Some(line) = layout.lines.get(line_index) {
                let x = layout.line_left(line_index) + text.column_x(line, col);
                let top = layout.line_top(line_index);
                surface.stroke_polyline(
                    &[
                        Position::new(x, top),
                        Position::new(x, top + layout.line_height),
                    ],
                    false,
                    &StrokeStyle::solid(text.style().rgba(), 1.0 / pixel_scale),
                );
            }
        }
    }
}
