//! Notifications the controller publishes to its host.

use crate::types::{Camera, ObjectId};
use boardkit_core::{EventChannel, ViewportBounds};

/// One channel per notification. Cloning shares the listener lists.
#[derive(Debug, Clone)]
pub struct CanvasEvents {
    /// A frame was drawn.
    pub render: EventChannel<()>,
    pub viewport_change: EventChannel<ViewportBounds>,
    pub camera_change: EventChannel<Camera>,
    /// Object ids back to front after every structural change.
    pub objects_change: EventChannel<[ObjectId]>,
    pub selection_change: EventChannel<Option<ObjectId>>,
    pub zoom_change: EventChannel<f64>,
}

impl Default for CanvasEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasEvents {
    pub fn new() -> Self {
        Self {
            render: EventChannel::new("render"),
            viewport_change: EventChannel::new("viewport:change"),
            camera_change: EventChannel::new("camera:change"),
            objects_change: EventChannel::new("objects:change"),
            selection_change: EventChannel::new("selection:change"),
            zoom_change: EventChannel::new("zoom:change"),
        }
    }

    /// Drop every listener on every channel.
    pub fn clear_all(&self) {
        self.render.clear();
        self.viewport_change.clear();
        self.camera_change.clear();
        self.objects_change.clear();
        self.selection_change.clear();
        self.zoom_change.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.render.listener_count()
            + self.viewport_change.listener_count()
            + self.camera_change.listener_count()
            + self.objects_change.listener_count()
            + self.selection_change.listener_count()
            + self.zoom_change.listener_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_clear_all_drops_listeners() {
        let events = CanvasEvents::new();
        let _a = events.zoom_change.on(|_| {});
        let _b = events.objects_change.on(|_| {});
        assert_eq!(events.listener_count(), 2);

        events.clear_all();
        assert_eq!(events.listener_count(), 0);
    }

    #[test]
    fn test_slice_payload() {
        let events = CanvasEvents::new();
        let seen = Rc::new(Cell::new(0));
        let _sub = {
            let seen = Rc::clone(&seen);
            events.objects_change.on(move |ids| seen.set(ids.len()))
        };
        events.objects_change.emit(&[ObjectId::new(), ObjectId::new()]);
        assert_eq!(seen.get(), 2);
    }
}
