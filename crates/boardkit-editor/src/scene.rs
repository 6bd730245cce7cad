//! The authoritative object list.

use crate::objects::{HitContext, SceneObject};
use crate::selection_manager::SelectionManager;
use crate::types::ObjectId;
use boardkit_core::{Position, Subscription};

/// Ordered list of scene objects (back to front) plus the selection.
///
/// The scene is the only owner of [`SceneObject`]s. Everything else refers
/// to objects by [`ObjectId`].
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
    selection: SelectionManager,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Mutable access to the objects. The list itself cannot be resized
    /// here, so the selection stays consistent.
    pub fn objects_mut(&mut self) -> &mut [SceneObject] {
        &mut self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|o| o.id()).collect()
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id() == id)
    }

    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id() == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    /// Append an object on top of the others.
    pub fn add(&mut self, object: SceneObject) -> ObjectId {
        let index = self.objects.len();
        self.insert(index, object)
    }

    /// Insert at `index`, appending when the index is past the end.
    pub fn insert(&mut self, index: usize, object: SceneObject) -> ObjectId {
        let id = object.id();
        let was_selected = object.is_selected();
        let index = index.min(self.objects.len());
        self.objects.insert(index, object);
        if was_selected {
            self.selection.select(&mut self.objects, id);
        }
        id
    }

    /// Remove an object, returning it with its former index. A selected
    /// object leaves the selection empty.
    pub fn remove(&mut self, id: ObjectId) -> Option<(usize, SceneObject)> {
        let index = self.index_of(id)?;
        let object = self.objects.remove(index);
        self.selection.forget(id);
        Some((index, object))
    }

    /// Replace the whole list.
    pub fn set_objects(&mut self, objects: Vec<SceneObject>) {
        self.objects = objects;
        self.selection.sync_from_flags(&mut self.objects);
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.selection.sync_from_flags(&mut self.objects);
    }

    pub fn select(&mut self, id: ObjectId) -> bool {
        self.selection.select(&mut self.objects, id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear_selection(&mut self.objects);
    }

    pub fn selected_id(&self) -> Option<ObjectId> {
        self.selection.selected_id()
    }

    pub fn selected(&self) -> Option<&SceneObject> {
        self.selection.selected_id().and_then(|id| self.get(id))
    }

    pub fn selected_mut(&mut self) -> Option<&mut SceneObject> {
        let id = self.selection.selected_id()?;
        self.get_mut(id)
    }

    pub fn get_selected_objects(&self) -> Vec<&SceneObject> {
        self.selection.get_selected_objects(&self.objects)
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn on_selection_change<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Option<ObjectId>) + 'static,
    {
        self.selection.subscribe(listener)
    }

    /// Topmost object under a canvas-pixel point.
    pub fn get_object_at_point(&self, point: Position, ctx: &HitContext<'_>) -> Option<ObjectId> {
        self.objects
            .iter()
            .rev()
            .find(|o| o.contains_point(point, ctx))
            .map(|o| o.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::TextStyle;

    fn text(label: &str) -> SceneObject {
        SceneObject::text(label, TextStyle::default(), Position::ORIGIN)
    }

    #[test]
    fn test_insert_past_end_appends() {
        let mut scene = Scene::new();
        let a = scene.add(text("a"));
        let b = scene.insert(10, text("b"));
        assert_eq!(scene.ids(), vec![a, b]);
    }

    #[test]
    fn test_remove_selected_clears_selection() {
        let mut scene = Scene::new();
        let a = scene.add(text("a"));
        scene.select(a);
        let (index, removed) = scene.remove(a).unwrap();
        assert_eq!(index, 0);
        assert!(removed.is_selected());
        assert!(scene.selected_id().is_none());
    }

    #[test]
    fn test_inserting_flagged_object_moves_selection() {
        let mut scene = Scene::new();
        let a = scene.add(text("a"));
        scene.select(a);
        let mut b = text("b");
        b.set_selected(true);
        let b = scene.add(b);
        assert_eq!(scene.selected_id(), Some(b));
        assert!(!scene.get(a).unwrap().is_selected());
    }
}
