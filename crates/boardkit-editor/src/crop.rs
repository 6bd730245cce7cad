//! Interactive crop sessions on image objects.
//!
//! All coordinates are image pixels with the origin at the image's top-left
//! corner. Drag deltas are measured from the point where the drag started and
//! applied to the bounds captured at that moment, so a gesture never
//! accumulates rounding from intermediate samples.

use crate::style::ACCENT;
use crate::surface::{Hole, StrokeStyle, Surface};
use crate::types::CursorStyle;
use boardkit_core::{Bounds, EditorError, Position, Rgba};
use image::{imageops, RgbaImage};
use serde::{Deserialize, Serialize};

/// Handle hit radius in screen pixels.
const HANDLE_SIZE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropMode {
    Rectangular,
    Circular,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CropBounds {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Circle {
        center_x: f64,
        center_y: f64,
        radius: f64,
    },
}

impl CropBounds {
    pub fn mode(&self) -> CropMode {
        match self {
            CropBounds::Rect { .. } => CropMode::Rectangular,
            CropBounds::Circle { .. } => CropMode::Circular,
        }
    }

    /// Bounding rectangle in image pixels.
    pub fn enclosing_rect(&self) -> Bounds {
        match *self {
            CropBounds::Rect {
                x,
                y,
                width,
                height,
            } => Bounds::new(x, y, x + width, y + height),
            CropBounds::Circle {
                center_x,
                center_y,
                radius,
            } => Bounds::new(
                center_x - radius,
                center_y - radius,
                center_x + radius,
                center_y + radius,
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CropHandle {
    TopLeft,
    Top,
    TopRight,
    Right,
    Bottom,
    BottomRight,
    BottomLeft,
    Left,
    Move,
    Radius,
}

impl CropHandle {
    pub fn cursor(&self) -> CursorStyle {
        match self {
            CropHandle::Move => CursorStyle::Move,
            CropHandle::Radius | CropHandle::TopLeft | CropHandle::BottomRight => {
                CursorStyle::NwseResize
            }
            CropHandle::Top => CursorStyle::NsResize,
            CropHandle::TopRight | CropHandle::BottomLeft => CursorStyle::NeswResize,
            CropHandle::Right => CursorStyle::EwResize,
            CropHandle::Bottom => CursorStyle::SResize,
            CropHandle::Left => CursorStyle::WResize,
        }
    }
}

/// Outcome of a finished crop session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropResult {
    pub mode: CropMode,
    pub bounds: CropBounds,
    pub aspect_ratio: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CropDrag {
    handle: CropHandle,
    start: Position,
    initial: CropBounds,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CropState {
    pub bounds: CropBounds,
    pub aspect_ratio: Option<f64>,
    drag: Option<CropDrag>,
}

impl CropState {
    pub fn mode(&self) -> CropMode {
        self.bounds.mode()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn active_handle(&self) -> Option<CropHandle> {
        self.drag.map(|d| d.handle)
    }
}

/// Crop session bound to an image of a fixed natural size.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCropper {
    image_width: f64,
    image_height: f64,
    min_size: f64,
    state: Option<CropState>,
}

impl ImageCropper {
    pub const DEFAULT_MIN_SIZE: f64 = 20.0;

    pub fn new(image_width: u32, image_height: u32) -> Self {
        Self {
            image_width: f64::from(image_width),
            image_height: f64::from(image_height),
            min_size: Self::DEFAULT_MIN_SIZE,
            state: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&CropState> {
        self.state.as_ref()
    }

    pub fn min_size(&self) -> f64 {
        self.min_size
    }

    /// Begin a session. Rectangular crops start at 80% of the image,
    /// centered; with an aspect ratio the height follows the width. Circular
    /// crops start centered with a radius of 40% of the shorter side.
    pub fn start_crop(&mut self, mode: CropMode, aspect_ratio: Option<f64>) {
        let (w, h) = (self.image_width, self.image_height);
        let aspect_ratio = aspect_ratio.filter(|ar| ar.is_finite() && *ar > 0.0);
        let bounds = match mode {
            CropMode::Rectangular => {
                let width = w * 0.8;
                let height = aspect_ratio.map_or(h * 0.8, |ar| width / ar);
                CropBounds::Rect {
                    x: (w - width) / 2.0,
                    y: (h - height) / 2.0,
                    width,
                    height,
                }
            }
            CropMode::Circular => CropBounds::Circle {
                center_x: w / 2.0,
                center_y: h / 2.0,
                radius: w.min(h) * 0.4,
            },
        };
        tracing::debug!("Starting {:?} crop on {}x{} image", mode, w, h);
        self.state = Some(CropState {
            bounds,
            aspect_ratio,
            drag: None,
        });
    }

    fn rect_handles(x: f64, y: f64, width: f64, height: f64) -> [(CropHandle, Position); 8] {
        let (hw, hh) = (width / 2.0, height / 2.0);
        [
            (CropHandle::TopLeft, Position::new(x, y)),
            (CropHandle::Top, Position::new(x + hw, y)),
            (CropHandle::TopRight, Position::new(x + width, y)),
            (CropHandle::Right, Position::new(x + width, y + hh)),
            (CropHandle::Bottom, Position::new(x + hw, y + height)),
            (CropHandle::BottomRight, Position::new(x + width, y + height)),
            (CropHandle::BottomLeft, Position::new(x, y + height)),
            (CropHandle::Left, Position::new(x, y + hh)),
        ]
    }

    /// Handle under an image-pixel point. `pixel_scale` is the on-screen
    /// size of one image pixel.
    pub fn get_handle_at_position(&self, point: Position, pixel_scale: f64) -> Option<CropHandle> {
        let state = self.state.as_ref()?;
        let handle_size = HANDLE_SIZE / pixel_scale.max(f64::EPSILON);

        match state.bounds {
            CropBounds::Rect {
                x,
                y,
                width,
                height,
            } => {
                let hit = Self::rect_handles(x, y, width, height)
                    .into_iter()
                    .find(|(_, pos)| point.distance_to(pos) <= handle_size)
                    .map(|(handle, _)| handle);
                if hit.is_some() {
                    return hit;
                }
                Bounds::new(x, y, x + width, y + height)
                    .contains(&point)
                    .then_some(CropHandle::Move)
            }
            CropBounds::Circle {
                center_x,
                center_y,
                radius,
            } => {
                let d = point.distance_to(&Position::new(center_x, center_y));
                if (d - radius).abs() <= handle_size {
                    Some(CropHandle::Radius)
                } else if d <= radius {
                    Some(CropHandle::Move)
                } else {
                    None
                }
            }
        }
    }

    /// Start dragging the handle under `point`. Returns false when the point
    /// misses every handle.
    pub fn handle_mouse_down(&mut self, point: Position, pixel_scale: f64) -> bool {
        let Some(handle) = self.get_handle_at_position(point, pixel_scale) else {
            return false;
        };
        if let Some(state) = &mut self.state {
            state.drag = Some(CropDrag {
                handle,
                start: point,
                initial: state.bounds,
            });
            return true;
        }
        false
    }

    pub fn handle_mouse_move(&mut self, point: Position) -> bool {
        let Some(state) = &self.state else {
            return false;
        };
        let Some(drag) = state.drag else {
            return false;
        };
        let delta = point - drag.start;
        let bounds = match drag.initial {
            CropBounds::Rect { .. } => self.drag_rect(drag, delta, state.aspect_ratio),
            CropBounds::Circle { .. } => self.drag_circle(drag, delta),
        };
        if let Some(state) = &mut self.state {
            state.bounds = bounds;
        }
        true
    }

    pub fn handle_mouse_up(&mut self) {
        if let Some(state) = &mut self.state {
            state.drag = None;
        }
    }

    fn drag_rect(&self, drag: CropDrag, delta: Position, ar: Option<f64>) -> CropBounds {
        let CropBounds::Rect {
            x: ix,
            y: iy,
            width: iw,
            height: ih,
        } = drag.initial
        else {
            return drag.initial;
        };
        let (img_w, img_h, min) = (self.image_width, self.image_height, self.min_size);
        let (mut x, mut y, mut width, mut height) = (ix, iy, iw, ih);

        match drag.handle {
            CropHandle::Move => {
                x = clamp(ix + delta.x, 0.0, img_w - iw);
                y = clamp(iy + delta.y, 0.0, img_h - ih);
            }
            CropHandle::Top | CropHandle::TopLeft | CropHandle::TopRight => {
                y = clamp(iy + delta.y, 0.0, iy + ih - min);
                height = ih - (y - iy);
                if let Some(ar) = ar {
                    width = height * ar;
                }
            }
            CropHandle::Bottom | CropHandle::BottomLeft | CropHandle::BottomRight => {
                height = clamp(ih + delta.y, min, img_h - iy);
                if let Some(ar) = ar {
                    width = height * ar;
                }
            }
            CropHandle::Left | CropHandle::Right => {
                width = clamp(iw + delta.x, min, img_w - ix);
                if let Some(ar) = ar {
                    height = width / ar;
                }
            }
            CropHandle::Radius => {}
        }

        CropBounds::Rect {
            x,
            y,
            width,
            height,
        }
    }

    fn drag_circle(&self, drag: CropDrag, delta: Position) -> CropBounds {
        let CropBounds::Circle {
            center_x: icx,
            center_y: icy,
            radius: ir,
        } = drag.initial
        else {
            return drag.initial;
        };
        let (img_w, img_h) = (self.image_width, self.image_height);

        match drag.handle {
            CropHandle::Move => CropBounds::Circle {
                center_x: clamp(icx + delta.x, ir, img_w - ir),
                center_y: clamp(icy + delta.y, ir, img_h - ir),
                radius: ir,
            },
            CropHandle::Radius => {
                let sign = if delta.x > 0.0 { 1.0 } else { -1.0 };
                let change = (delta.x * delta.x + delta.y * delta.y).sqrt() * sign;
                let max_r = icx.min(icy).min(img_w - icx).min(img_h - icy);
                CropBounds::Circle {
                    center_x: icx,
                    center_y: icy,
                    radius: clamp(ir + change, self.min_size, max_r),
                }
            }
            _ => drag.initial,
        }
    }

    /// Finish the session and return its result.
    pub fn apply_crop(&mut self) -> Option<CropResult> {
        let state = self.state.take()?;
        Some(CropResult {
            mode: state.mode(),
            bounds: state.bounds,
            aspect_ratio: state.aspect_ratio,
        })
    }

    pub fn cancel_crop(&mut self) {
        if self.state.take().is_some() {
            tracing::debug!("Crop canceled");
        }
    }

    /// Cursor for a handle, `Default` when none.
    pub fn cursor_for(&self, handle: Option<CropHandle>) -> CursorStyle {
        handle.map_or(CursorStyle::Default, |h| h.cursor())
    }

    /// Dim everything outside the crop area and draw the outline and handles.
    /// Expects the surface to be in image-pixel space.
    pub fn render_overlay(&self, surface: &mut dyn Surface, pixel_scale: f64, overlay: Rgba, handle_fill: Rgba) {
        let Some(state) = &self.state else {
            return;
        };
        let scale = pixel_scale.max(f64::EPSILON);
        let handle_size = HANDLE_SIZE / scale;
        let image = Bounds::new(0.0, 0.0, self.image_width, self.image_height);
        let outline = StrokeStyle::dashed(ACCENT, 1.0 / scale, 5.0 / scale, 5.0 / scale);
        let handle_stroke = StrokeStyle::solid(ACCENT, 1.0 / scale);

        let handle = |surface: &mut dyn Surface, p: Position| {
            surface.fill_circle(p, handle_size / 2.0, handle_fill);
            surface.stroke_circle(p, handle_size / 2.0, &handle_stroke);
        };

        match state.bounds {
            CropBounds::Rect {
                x,
                y,
                width,
                height,
            } => {
                let area = Bounds::new(x, y, x + width, y + height);
                surface.fill_outside(image, Hole::Rect(area), overlay);
                surface.stroke_rect(area, &outline);
                for (_, p) in Self::rect_handles(x, y, width, height) {
                    handle(&mut *surface, p);
                }
                handle(&mut *surface, area.center());
            }
            CropBounds::Circle {
                center_x,
                center_y,
                radius,
            } => {
                let center = Position::new(center_x, center_y);
                surface.fill_outside(image, Hole::Circle { center, radius }, overlay);
                surface.stroke_circle(center, radius, &outline);
                let angle = std::f64::consts::FRAC_PI_4;
                handle(
                    &mut *surface,
                    Position::new(center_x + radius * angle.cos(), center_y + radius * angle.sin()),
                );
                handle(&mut *surface, center);
            }
        }
    }
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Produce the cropped raster for `result`.
///
/// Rectangular crops take the sub-image; circular crops take the bounding
/// square and clear every pixel outside the circle.
pub fn crop_raster(raster: &RgbaImage, result: &CropResult) -> Result<RgbaImage, EditorError> {
    let rect = result.bounds.enclosing_rect();
    let x = rect.left.round().max(0.0) as u32;
    let y = rect.top.round().max(0.0) as u32;
    let right = (rect.right.round().max(0.0) as u32).min(raster.width());
    let bottom = (rect.bottom.round().max(0.0) as u32).min(raster.height());

    if right <= x || bottom <= y {
        return Err(EditorError::InvalidCrop {
            reason: format!(
                "crop area {:?} lies outside {}x{} image",
                result.bounds,
                raster.width(),
                raster.height()
            ),
        });
    }

    let mut out = imageops::crop_imm(raster, x, y, right - x, bottom - y).to_image();

    if let CropBounds::Circle {
        center_x,
        center_y,
        radius,
    } = result.bounds
    {
        let (cx, cy) = (center_x - f64::from(x), center_y - f64::from(y));
        for (px, py, pixel) in out.enumerate_pixels_mut() {
            let dx = f64::from(px) + 0.5 - cx;
            let dy = f64::from(py) + 0.5 - cy;
            if dx * dx + dy * dy > radius * radius {
                pixel.0[3] = 0;
            }
        }
    }
    Ok(out)
}
