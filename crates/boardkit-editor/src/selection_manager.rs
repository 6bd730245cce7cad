use crate::objects::SceneObject;
use crate::types::ObjectId;
use boardkit_core::{EventChannel, Subscription};

/// Single-selection state for one scene.
///
/// Selecting an object silently deselects the previous one. The manager
/// only remembers the selected object's id; the `selected` flag itself lives
/// on the objects, which the scene owns and passes in for every mutation.
///
/// # Notification
///
/// Every mutation notifies subscribers exactly once with the new selection
/// (zero or one id). Listeners run over a snapshot of the subscriber list, so
/// they may subscribe or unsubscribe while being notified.
#[derive(Debug)]
pub struct SelectionManager {
    selected_id: Option<ObjectId>,
    changed: EventChannel<Option<ObjectId>>,
}

impl Default for SelectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionManager {
    pub fn new() -> Self {
        Self {
            selected_id: None,
            changed: EventChannel::new("selection:change"),
        }
    }

    pub fn selected_id(&self) -> Option<ObjectId> {
        self.selected_id
    }

    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selected_id == Some(id)
    }

    /// Select `id`, clearing the flag on every other object.
    ///
    /// Unknown ids are logged and leave the selection unchanged.
    pub fn select(&mut self, objects: &mut [SceneObject], id: ObjectId) -> bool {
        if !objects.iter().any(|o| o.id() == id) {
            tracing::warn!("Cannot select unknown object {}", id);
            return false;
        }
        for obj in objects.iter_mut() {
            obj.set_selected(obj.id() == id);
        }
        self.selected_id = Some(id);
        tracing::debug!("Selected object {}", id);
        self.notify();
        true
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self, objects: &mut [SceneObject]) {
        for obj in objects.iter_mut() {
            obj.set_selected(false);
        }
        self.selected_id = None;
        self.notify();
    }

    /// The selected objects, kept as a list although it never holds more
    /// than one element.
    pub fn get_selected_objects<'a>(&self, objects: &'a [SceneObject]) -> Vec<&'a SceneObject> {
        match self.selected_id {
            Some(id) => objects.iter().filter(|o| o.id() == id).collect(),
            None => Vec::new(),
        }
    }

    /// Drop the selection if it points at `id`, which has left the scene.
    pub(crate) fn forget(&mut self, id: ObjectId) {
        if self.selected_id == Some(id) {
            self.selected_id = None;
            self.notify();
        }
    }

    /// Re-derive the selection from the objects' flags, keeping at most the
    /// topmost flagged object.
    pub(crate) fn sync_from_flags(&mut self, objects: &mut [SceneObject]) {
        let flagged = objects.iter().rev().find(|o| o.is_selected()).map(|o| o.id());
        for obj in objects.iter_mut() {
            obj.set_selected(Some(obj.id()) == flagged);
        }
        if flagged != self.selected_id {
            self.selected_id = flagged;
            self.notify();
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Option<ObjectId>) + 'static,
    {
        self.changed.on(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.changed.listener_count()
    }

    fn notify(&self) {
        self.changed.emit(&self.selected_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::TextStyle;
    use boardkit_core::Position;
    use std::cell::Cell;
    use std::rc::Rc;

    fn objects(n: usize) -> Vec<SceneObject> {
        (0..n)
            .map(|i| SceneObject::text(format!("t{i}"), TextStyle::default(), Position::ORIGIN))
            .collect()
    }

    #[test]
    fn test_select_replaces_previous() {
        let mut objs = objects(3);
        let mut manager = SelectionManager::new();
        let (a, b) = (objs[0].id(), objs[1].id());

        assert!(manager.select(&mut objs, a));
        assert!(manager.select(&mut objs, b));

        assert_eq!(objs.iter().filter(|o| o.is_selected()).count(), 1);
        assert!(objs[1].is_selected());
        assert_eq!(manager.get_selected_objects(&objs)[0].id(), b);
    }

    #[test]
    fn test_unknown_id_is_ignored() {
        let mut objs = objects(1);
        let mut manager = SelectionManager::new();
        assert!(!manager.select(&mut objs, ObjectId::new()));
        assert!(manager.selected_id().is_none());
    }

    #[test]
    fn test_notifies_once_per_mutation() {
        let mut objs = objects(2);
        let mut manager = SelectionManager::new();
        let hits = Rc::new(Cell::new(0));
        let sub = {
            let hits = Rc::clone(&hits);
            manager.subscribe(move |_| hits.set(hits.get() + 1))
        };

        let id = objs[0].id();
        manager.select(&mut objs, id);
        manager.clear_selection(&mut objs);
        assert_eq!(hits.get(), 2);

        sub.unsubscribe();
        manager.select(&mut objs, id);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_sync_keeps_topmost_flag() {
        let mut objs = objects(3);
        objs[0].set_selected(true);
        objs[2].set_selected(true);
        let mut manager = SelectionManager::new();
        manager.sync_from_flags(&mut objs);
        assert_eq!(manager.selected_id(), Some(objs[2].id()));
        assert!(!objs[0].is_selected());
    }
}
