//! Screen (CSS pixel) <-> world conversions.
//!
//! Screen coordinates are CSS pixels relative to the canvas element. They are
//! multiplied by the device pixel ratio to reach canvas (device) pixels, where
//! the camera offset lives:
//!
//! ```text
//! world  = (screen * dpr - camera.xy) / zoom
//! screen = (world * zoom + camera.xy) / dpr
//! ```

use crate::types::Camera;
use boardkit_core::{Bounds, Position, ViewportBounds};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSystem {
    device_pixel_ratio: f64,
}

impl Default for CoordinateSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinateSystem {
    pub fn new() -> Self {
        Self {
            device_pixel_ratio: 1.0,
        }
    }

    pub fn with_device_pixel_ratio(dpr: f64) -> Self {
        let mut system = Self::new();
        system.set_device_pixel_ratio(dpr);
        system
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Non-positive or non-finite ratios are ignored.
    pub fn set_device_pixel_ratio(&mut self, dpr: f64) {
        if dpr.is_finite() && dpr > 0.0 {
            self.device_pixel_ratio = dpr;
        } else {
            tracing::warn!("Ignoring invalid device pixel ratio {}", dpr);
        }
    }

    pub fn screen_to_world(&self, point: Position, camera: &Camera) -> Position {
        let dpr = self.device_pixel_ratio;
        Position::new(
            (point.x * dpr - camera.x) / camera.zoom,
            (point.y * dpr - camera.y) / camera.zoom,
        )
    }

    pub fn world_to_screen(&self, point: Position, camera: &Camera) -> Position {
        let dpr = self.device_pixel_ratio;
        Position::new(
            (point.x * camera.zoom + camera.x) / dpr,
            (point.y * camera.zoom + camera.y) / dpr,
        )
    }

    /// World rectangle covered by a `width` x `height` screen area.
    pub fn get_visible_bounds(&self, camera: &Camera, width: f64, height: f64) -> ViewportBounds {
        let corners = [
            Position::new(0.0, 0.0),
            Position::new(width, 0.0),
            Position::new(width, height),
            Position::new(0.0, height),
        ]
        .map(|corner| self.screen_to_world(corner, camera));

        let Some(b) = Bounds::from_points(&corners) else {
            return ViewportBounds::default();
        };
        ViewportBounds::from_edges(b.left, b.top, b.right, b.bottom)
    }

    /// Grid cell size adapted to `zoom` so on-screen spacing stays readable.
    ///
    /// The result is always `1`, `2` or `5` times a power of ten.
    pub fn get_grid_cell_size(&self, zoom: f64, base_size: f64) -> f64 {
        let scaled = base_size / zoom;
        if !scaled.is_finite() || scaled <= 0.0 {
            return base_size;
        }
        let base = 10f64.powf(scaled.log10().floor());
        if scaled < 2.0 * base {
            base
        } else if scaled < 5.0 * base {
            2.0 * base
        } else {
            5.0 * base
        }
    }

    pub fn snap_to_grid(&self, point: Position, grid_size: f64) -> Position {
        if !(grid_size > 0.0) {
            return point;
        }
        Position::new(
            (point.x / grid_size).round() * grid_size,
            (point.y / grid_size).round() * grid_size,
        )
    }
}
