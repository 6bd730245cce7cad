//! Resize and rotation handles around a selected object.
//!
//! Handles live in the object's local space. Hit testing measures distances
//! in screen pixels, scaling each local axis by its own `|scale| * zoom`, so
//! the hit area stays a constant pixel circle even under non-uniform scale.

use crate::screen_space::ScreenSpaceSystem;
use crate::style::ControlPointStyle;
use crate::surface::{StrokeStyle, Surface};
use crate::types::{Camera, ControlPointType, CursorStyle, Transform};
use boardkit_core::{Bounds, Position};
use std::f64::consts::PI;

/// Hit radius of a handle, in handle sizes.
const HIT_FACTOR: f64 = 2.0;

#[derive(Debug, Clone, Default)]
pub struct ControlPointManager {
    style: ControlPointStyle,
    screen_space: ScreenSpaceSystem,
}

impl ControlPointManager {
    pub fn new(style: ControlPointStyle) -> Self {
        Self {
            style,
            screen_space: ScreenSpaceSystem::new(),
        }
    }

    pub fn style(&self) -> &ControlPointStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: ControlPointStyle) {
        self.style = style;
    }

    /// The eight resize handle positions, in [`ControlPointType`] index order.
    pub fn get_control_points(&self, bounds: &Bounds) -> [Position; 8] {
        let cx = (bounds.left + bounds.right) / 2.0;
        let cy = (bounds.top + bounds.bottom) / 2.0;
        [
            Position::new(bounds.left, bounds.top),
            Position::new(cx, bounds.top),
            Position::new(bounds.right, bounds.top),
            Position::new(bounds.right, cy),
            Position::new(bounds.right, bounds.bottom),
            Position::new(cx, bounds.bottom),
            Position::new(bounds.left, bounds.bottom),
            Position::new(bounds.left, cy),
        ]
    }

    /// On-screen size of one local unit.
    pub fn effective_scale(&self, transform: &Transform, camera: &Camera) -> f64 {
        let s = transform.scale.magnitude() * camera.zoom;
        if s.is_finite() && s > 0.0 {
            s
        } else {
            1.0
        }
    }

    /// On-screen size of one local unit along x and along y.
    fn axis_scale(&self, transform: &Transform, camera: &Camera) -> (f64, f64) {
        let sane = |s: f64| if s.is_finite() && s > 0.0 { s } else { 1.0 };
        (
            sane(transform.scale.x.abs() * camera.zoom),
            sane(transform.scale.y.abs() * camera.zoom),
        )
    }

    /// Local position of the rotation handle: centered above the top edge.
    pub fn rotation_handle_position(&self, bounds: &Bounds, transform: &Transform, camera: &Camera) -> Position {
        let (_, sy) = self.axis_scale(transform, camera);
        Position::new(
            (bounds.left + bounds.right) / 2.0,
            bounds.top - self.style.rotation_handle_offset / sy,
        )
    }

    /// The handle under a canvas-pixel point, or [`ControlPointType::None`].
    ///
    /// The rotation handle is tested first; among resize handles the nearest
    /// one inside the threshold wins.
    pub fn get_control_point_at_position(
        &self,
        point: Position,
        bounds: &Bounds,
        transform: &Transform,
        camera: &Camera,
    ) -> ControlPointType {
        let local = self
            .screen_space
            .screen_to_local_space(point, transform, camera);
        let (sx, sy) = self.axis_scale(transform, camera);
        let pixels = |p: &Position| ((local.x - p.x) * sx).hypot((local.y - p.y) * sy);
        let threshold = self.style.size * HIT_FACTOR;

        let rotation = self.rotation_handle_position(bounds, transform, camera);
        if pixels(&rotation) <= threshold {
            return ControlPointType::Rotation;
        }

        self.get_control_points(bounds)
            .iter()
            .zip(ControlPointType::RESIZE_HANDLES)
            .map(|(p, kind)| (pixels(p), kind))
            .filter(|(d, _)| *d <= threshold)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, kind)| kind)
            .unwrap_or(ControlPointType::None)
    }

    pub fn get_cursor_style(&self, control_point: ControlPointType) -> CursorStyle {
        match control_point {
            ControlPointType::TopLeft | ControlPointType::BottomRight => CursorStyle::NwseResize,
            ControlPointType::TopRight | ControlPointType::BottomLeft => CursorStyle::NeswResize,
            ControlPointType::TopCenter | ControlPointType::BottomCenter => CursorStyle::NsResize,
            ControlPointType::MiddleLeft | ControlPointType::MiddleRight => CursorStyle::EwResize,
            ControlPointType::Rotation => CursorStyle::Grab,
            ControlPointType::None => CursorStyle::Move,
        }
    }

    /// Draw the resize handles. Expects the surface to hold the object's
    /// local transform.
    pub fn draw_control_points(&self, surface: &mut dyn Surface, bounds: &Bounds, transform: &Transform, camera: &Camera) {
        let eff = self.effective_scale(transform, camera);
        let radius = self.style.size / 2.0 / eff;
        let stroke = StrokeStyle::solid(self.style.stroke, self.style.line_width / eff);

        for p in self.get_control_points(bounds) {
            surface.fill_circle(p, radius, self.style.fill);
            surface.stroke_circle(p, radius, &stroke);
        }
    }

    /// Draw the rotation handle: connector, knob and a curved arrow glyph.
    pub fn draw_rotation_handle(&self, surface: &mut dyn Surface, bounds: &Bounds, transform: &Transform, camera: &Camera) {
        let eff = self.effective_scale(transform, camera);
        let size = self.style.size / eff;
        let stroke = StrokeStyle::solid(self.style.stroke, self.style.line_width / eff);
        let handle = self.rotation_handle_position(bounds, transform, camera);
        let top_center = Position::new(handle.x, bounds.top);

        surface.stroke_polyline(&[top_center, handle], false, &stroke);
        surface.fill_circle(handle, size / 2.0, self.style.fill);
        surface.stroke_circle(handle, size / 2.0, &stroke);

        let arc_radius = size / 3.0;
        let (start, end) = (-0.75 * PI, 0.75 * PI);
        surface.stroke_arc(handle, arc_radius, start, end, &stroke);

        let tip = Position::new(
            handle.x + arc_radius * end.cos(),
            handle.y + arc_radius * end.sin(),
        );
        let arrow = size / 4.0;
        surface.stroke_polyline(
            &[
                Position::new(tip.x - arrow, tip.y),
                tip,
                Position::new(tip.x, tip.y - arrow),
            ],
            false,
            &stroke,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Scale;

    fn manager() -> ControlPointManager {
        ControlPointManager::new(ControlPointStyle::default())
    }

    #[test]
    fn test_control_point_layout() {
        let pts = manager().get_control_points(&Bounds::centered(100.0, 50.0));
        assert_eq!(pts[0], Position::new(-50.0, -25.0));
        assert_eq!(pts[1], Position::new(0.0, -25.0));
        assert_eq!(pts[3], Position::new(50.0, 0.0));
        assert_eq!(pts[7], Position::new(-50.0, 0.0));
    }

    #[test]
    fn test_hit_corner_and_miss() {
        let m = manager();
        let bounds = Bounds::centered(100.0, 50.0);
        let t = Transform::default();
        let cam = Camera::default();
        assert_eq!(
            m.get_control_point_at_position(Position::new(-49.0, -24.0), &bounds, &t, &cam),
            ControlPointType::TopLeft
        );
        assert_eq!(
            m.get_control_point_at_position(Position::new(0.0, 0.0), &bounds, &t, &cam),
            ControlPointType::None
        );
    }

    #[test]
    fn test_rotation_handle_wins_over_top_center() {
        let m = manager();
        let bounds = Bounds::centered(100.0, 10.0);
        let cam = Camera::default();
        let t = Transform::default();
        // Rotation handle sits 20px above the top edge at y = -25.
        assert_eq!(
            m.get_control_point_at_position(Position::new(0.0, -24.0), &bounds, &t, &cam),
            ControlPointType::Rotation
        );
    }

    #[test]
    fn test_threshold_follows_each_axis_scale() {
        let m = manager();
        let bounds = Bounds::centered(100.0, 100.0);
        let t = Transform {
            scale: Scale::new(4.0, 0.25),
            ..Transform::default()
        };
        let cam = Camera::default();
        // Top-left corner is drawn at (-200, -12.5).
        // 30px to its right along the stretched axis is outside the hit circle.
        assert_eq!(
            m.get_control_point_at_position(Position::new(-170.0, -12.5), &bounds, &t, &cam),
            ControlPointType::None
        );
        // 15px above it along the squashed axis is inside.
        assert_eq!(
            m.get_control_point_at_position(Position::new(-200.0, -27.5), &bounds, &t, &cam),
            ControlPointType::TopLeft
        );
    }

    #[test]
    fn test_threshold_is_constant_in_pixels() {
        let m = manager();
        let bounds = Bounds::centered(100.0, 100.0);
        let t = Transform {
            scale: Scale::uniform(4.0),
            ..Transform::default()
        };
        let cam = Camera::new(0.0, 0.0, 0.5);
        // Corner sits at (-100, -100) on screen; 15px away still hits.
        assert_eq!(
            m.get_control_point_at_position(Position::new(-85.0, -100.0), &bounds, &t, &cam),
            ControlPointType::TopLeft
        );
        assert_eq!(
            m.get_control_point_at_position(Position::new(-70.0, -100.0), &bounds, &t, &cam),
            ControlPointType::None
        );
    }
}
