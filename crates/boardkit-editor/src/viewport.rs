//! Visible-area tracking and culling.
//!
//! The viewport is the world rectangle the camera shows, grown by a culling
//! margin given in screen pixels so objects just past the edge still render.

use crate::coordinate_system::CoordinateSystem;
use crate::objects::SceneObject;
use crate::types::Camera;
use boardkit_core::ViewportBounds;

#[derive(Debug, Clone, Copy, PartialEq)]
struct CacheKey {
    x: f64,
    y: f64,
    zoom: f64,
    width: f64,
    height: f64,
    dpr: f64,
}

/// Caches the extended visible rectangle and filters objects against it.
#[derive(Debug, Clone)]
pub struct ViewportManager {
    coordinates: CoordinateSystem,
    culling_margin: f64,
    bounds: Option<ViewportBounds>,
    key: Option<CacheKey>,
    recomputations: usize,
}

impl Default for ViewportManager {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl ViewportManager {
    pub fn new(culling_margin: f64) -> Self {
        Self {
            coordinates: CoordinateSystem::new(),
            culling_margin: culling_margin.max(0.0),
            bounds: None,
            key: None,
            recomputations: 0,
        }
    }

    pub fn culling_margin(&self) -> f64 {
        self.culling_margin
    }

    pub fn set_culling_margin(&mut self, margin: f64) {
        self.culling_margin = margin.max(0.0);
        self.key = None;
    }

    pub fn set_device_pixel_ratio(&mut self, dpr: f64) {
        self.coordinates.set_device_pixel_ratio(dpr);
    }

    /// Recompute the visible rectangle for a `width` x `height` (CSS pixel)
    /// view. Skipped when the camera and size are unchanged since last time.
    pub fn update_viewport(&mut self, camera: &Camera, width: f64, height: f64) -> ViewportBounds {
        let key = CacheKey {
            x: camera.x,
            y: camera.y,
            zoom: camera.zoom,
            width,
            height,
            dpr: self.coordinates.device_pixel_ratio(),
        };
        if let (Some(cached), Some(bounds)) = (self.key, self.bounds) {
            if cached == key {
                return bounds;
            }
        }

        let visible = self.coordinates.get_visible_bounds(camera, width, height);
        let margin = if camera.zoom > 0.0 {
            self.culling_margin / camera.zoom
        } else {
            self.culling_margin
        };
        let extended = visible.expand(margin);

        self.bounds = Some(extended);
        self.key = Some(key);
        self.recomputations += 1;
        tracing::trace!(
            "Viewport updated: ({:.1}, {:.1}) - ({:.1}, {:.1})",
            extended.left,
            extended.top,
            extended.right,
            extended.bottom
        );
        extended
    }

    /// The last computed extended rectangle.
    pub fn bounds(&self) -> Option<ViewportBounds> {
        self.bounds
    }

    /// How often the rectangle was actually recomputed.
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }

    /// Objects whose world bounds touch the extended viewport, in scene
    /// order. Empty until the first [`ViewportManager::update_viewport`].
    pub fn get_visible_objects<'a>(&self, objects: &'a [SceneObject]) -> Vec<&'a SceneObject> {
        let Some(view) = self.bounds.map(|b| b.as_bounds()) else {
            return Vec::new();
        };
        objects
            .iter()
            .filter(|o| o.world_bounds().intersects(&view))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::TextStyle;
    use boardkit_core::Position;

    #[test]
    fn test_margin_is_scaled_by_zoom() {
        let mut viewport = ViewportManager::new(100.0);
        let bounds = viewport.update_viewport(&Camera::new(0.0, 0.0, 2.0), 800.0, 600.0);
        assert_eq!(bounds.left, -50.0);
        assert_eq!(bounds.right, 450.0);
        assert_eq!(bounds.bottom, 350.0);
    }

    #[test]
    fn test_cache_skips_recomputation() {
        let mut viewport = ViewportManager::new(0.0);
        let camera = Camera::default();
        viewport.update_viewport(&camera, 100.0, 100.0);
        viewport.update_viewport(&camera, 100.0, 100.0);
        assert_eq!(viewport.recomputations(), 1);
        viewport.update_viewport(&Camera::new(5.0, 0.0, 1.0), 100.0, 100.0);
        assert_eq!(viewport.recomputations(), 2);
    }

    #[test]
    fn test_culls_far_objects() {
        let objects = vec![
            SceneObject::text("near", TextStyle::default(), Position::new(50.0, 50.0)),
            SceneObject::text("far", TextStyle::default(), Position::new(5000.0, 50.0)),
        ];
        let mut viewport = ViewportManager::new(10.0);
        assert!(viewport.get_visible_objects(&objects).is_empty());
        viewport.update_viewport(&Camera::default(), 200.0, 200.0);
        let visible = viewport.get_visible_objects(&objects);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id(), objects[0].id());
    }
}
