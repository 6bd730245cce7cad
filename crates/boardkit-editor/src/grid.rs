//! Background grid.

use crate::coordinate_system::CoordinateSystem;
use crate::style::GridStyle;
use crate::surface::{StrokeStyle, Surface};
use crate::types::Camera;
use boardkit_core::{Position, ViewportBounds};

/// Upper bound on lines per direction and pass.
const MAX_LINES: usize = 4096;

/// Grid that covers whatever part of the world is visible.
///
/// Draws in world space, so the camera transform must already be applied to
/// the surface.
#[derive(Debug, Clone)]
pub struct InfiniteGrid {
    coordinates: CoordinateSystem,
    base_size: f64,
    style: GridStyle,
}

impl InfiniteGrid {
    pub fn new(base_size: f64, style: GridStyle) -> Self {
        Self {
            coordinates: CoordinateSystem::new(),
            base_size,
            style,
        }
    }

    pub fn style(&self) -> &GridStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: GridStyle) {
        self.style = style;
    }

    pub fn base_size(&self) -> f64 {
        self.base_size
    }

    pub fn render(&self, surface: &mut dyn Surface, camera: &Camera, bounds: &ViewportBounds) {
        let cell = self.coordinates.get_grid_cell_size(camera.zoom, self.base_size);
        if !(cell > 0.0) {
            return;
        }

        let start_x = (bounds.left / cell).floor() * cell;
        let start_y = (bounds.top / cell).floor() * cell;
        let end_x = (bounds.right / cell).ceil() * cell;
        let end_y = (bounds.bottom / cell).ceil() * cell;
        let extent = (start_x, start_y, end_x, end_y);
        let line_width = 1.0 / camera.zoom;

        surface.save();
        self.draw_lines(
            surface,
            extent,
            cell / f64::from(self.style.secondary_interval.max(1)),
            &StrokeStyle::solid(self.style.secondary_color, line_width),
        );
        self.draw_lines(
            surface,
            extent,
            cell / f64::from(self.style.primary_interval.max(1)),
            &StrokeStyle::solid(self.style.primary_color, line_width),
        );
        self.draw_axes(
            surface,
            bounds,
            &StrokeStyle::solid(self.style.axis_color, line_width * 2.0),
        );
        surface.restore();
    }

    fn draw_lines(
        &self,
        surface: &mut dyn Surface,
        (start_x, start_y, end_x, end_y): (f64, f64, f64, f64),
        spacing: f64,
        stroke: &StrokeStyle,
    ) {
        if !(spacing > 0.0) {
            return;
        }
        let columns = ((end_x - start_x) / spacing).floor() as usize + 1;
        let rows = ((end_y - start_y) / spacing).floor() as usize + 1;
        if columns > MAX_LINES || rows > MAX_LINES {
            tracing::trace!("Skipping grid pass with spacing {}", spacing);
            return;
        }

        for i in 0..columns {
            let x = start_x + i as f64 * spacing;
            surface.stroke_polyline(
                &[Position::new(x, start_y), Position::new(x, end_y)],
                false,
                stroke,
            );
        }
        for i in 0..rows {
            let y = start_y + i as f64 * spacing;
            surface.stroke_polyline(
                &[Position::new(start_x, y), Position::new(end_x, y)],
                false,
                stroke,
            );
        }
    }

    fn draw_axes(&self, surface: &mut dyn Surface, bounds: &ViewportBounds, stroke: &StrokeStyle) {
        if bounds.left <= 0.0 && bounds.right >= 0.0 {
            surface.stroke_polyline(
                &[Position::new(0.0, bounds.top), Position::new(0.0, bounds.bottom)],
                false,
                stroke,
            );
        }
        if bounds.top <= 0.0 && bounds.bottom >= 0.0 {
            surface.stroke_polyline(
                &[Position::new(bounds.left, 0.0), Position::new(bounds.right, 0.0)],
                false,
                stroke,
            );
        }
    }
}
