//! Toolbar action registry.
//!
//! Actions are plain closures registered per object kind (or globally) and
//! grouped for display. An action may hand back a command; the caller runs
//! it through the undo history so toolbar edits are undoable like gestures.

use crate::commands::{AddCommand, CropCommand, EditorCommand, TextEditCommand, TransformCommand};
use crate::crop::CropMode;
use crate::objects::{SceneObject, TextStyle};
use crate::types::ObjectKind;
use boardkit_core::Position;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

pub type GlobalHandler = Rc<dyn Fn(Position) -> Option<EditorCommand>>;
pub type ObjectHandler = Rc<dyn Fn(&mut SceneObject) -> Option<EditorCommand>>;
pub type Visibility = Rc<dyn Fn(&SceneObject) -> bool>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarGroup {
    pub id: String,
    pub label: String,
    pub order: i32,
}

impl ToolbarGroup {
    pub fn new(id: impl Into<String>, label: impl Into<String>, order: i32) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            order,
        }
    }
}

/// An action that needs no selected object. The handler receives the world
/// point at the center of the view.
#[derive(Clone)]
pub struct GlobalAction {
    pub id: String,
    pub label: String,
    pub order: i32,
    pub handler: GlobalHandler,
}

impl fmt::Debug for GlobalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalAction")
            .field("id", &self.id)
            .field("order", &self.order)
            .finish()
    }
}

#[derive(Clone)]
pub struct ObjectAction {
    pub id: String,
    pub label: String,
    pub group: String,
    pub order: i32,
    pub is_visible: Option<Visibility>,
    pub handler: ObjectHandler,
}

impl fmt::Debug for ObjectAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectAction")
            .field("id", &self.id)
            .field("group", &self.group)
            .field("order", &self.order)
            .finish()
    }
}

impl ObjectAction {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        group: impl Into<String>,
        order: i32,
        handler: impl Fn(&mut SceneObject) -> Option<EditorCommand> + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            group: group.into(),
            order,
            is_visible: None,
            handler: Rc::new(handler),
        }
    }

    pub fn visible_when(mut self, predicate: impl Fn(&SceneObject) -> bool + 'static) -> Self {
        self.is_visible = Some(Rc::new(predicate));
        self
    }

    pub fn is_visible_for(&self, object: &SceneObject) -> bool {
        self.is_visible.as_ref().map_or(true, |p| p(object))
    }
}

#[derive(Debug, Clone)]
pub struct ToolbarRegistry {
    groups: Vec<ToolbarGroup>,
    global: Vec<GlobalAction>,
    by_kind: HashMap<ObjectKind, Vec<ObjectAction>>,
}

impl Default for ToolbarRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolbarRegistry {
    /// A registry with the four standard groups and no actions.
    pub fn new() -> Self {
        let mut registry = Self {
            groups: Vec::new(),
            global: Vec::new(),
            by_kind: HashMap::new(),
        };
        registry.register_group(ToolbarGroup::new("global", "Global Actions", 0));
        registry.register_group(ToolbarGroup::new("general", "General", 1));
        registry.register_group(ToolbarGroup::new("transform", "Transform", 2));
        registry.register_group(ToolbarGroup::new("style", "Style", 3));
        registry
    }

    /// Standard groups plus the built-in text, image and crop actions.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        register_text_actions(&mut registry);
        register_image_actions(&mut registry);
        register_crop_actions(&mut registry);
        registry
    }

    pub fn register_group(&mut self, group: ToolbarGroup) {
        self.groups.push(group);
        self.groups.sort_by_key(|g| g.order);
    }

    pub fn register_global_action(&mut self, action: GlobalAction) {
        self.global.push(action);
        self.global.sort_by_key(|a| a.order);
    }

    /// Register `action` for objects of `kind`. Actions stay sorted by group
    /// order, then by their own order.
    pub fn register_action(&mut self, kind: ObjectKind, action: ObjectAction) {
        let group_order = |name: &str| self.groups.iter().find(|g| g.id == name).map(|g| g.order);
        let mut actions = self.by_kind.remove(&kind).unwrap_or_default();
        actions.push(action);
        actions.sort_by(|a, b| {
            match (group_order(&a.group), group_order(&b.group)) {
                (Some(ga), Some(gb)) if ga != gb => ga.cmp(&gb),
                _ => a.order.cmp(&b.order),
            }
        });
        self.by_kind.insert(kind, actions);
    }

    pub fn get_groups(&self) -> &[ToolbarGroup] {
        &self.groups
    }

    pub fn get_global_actions(&self) -> &[GlobalAction] {
        &self.global
    }

    /// Actions shown for `object`, visibility predicates applied.
    pub fn get_object_actions(&self, object: &SceneObject) -> Vec<&ObjectAction> {
        self.by_kind
            .get(&object.kind())
            .map(|actions| actions.iter().filter(|a| a.is_visible_for(object)).collect())
            .unwrap_or_default()
    }

    /// Run a visible object action. `None` when no such action applies to
    /// the object; otherwise the command it produced, if any.
    pub fn run_object_action(&self, action_id: &str, object: &mut SceneObject) -> Option<Option<EditorCommand>> {
        let handler = self
            .get_object_actions(object)
            .into_iter()
            .find(|a| a.id == action_id)
            .map(|a| Rc::clone(&a.handler));
        let Some(handler) = handler else {
            tracing::debug!(
                "No visible '{}' action for {} object {}",
                action_id,
                object.kind(),
                object.id()
            );
            return None;
        };
        Some(handler(object))
    }

    pub fn run_global_action(&self, action_id: &str, view_center: Position) -> Option<Option<EditorCommand>> {
        let action = self.global.iter().find(|a| a.id == action_id)?;
        Some((action.handler)(view_center))
    }
}

/// Toggle the flip flag and record the change.
fn flip(object: &mut SceneObject) -> Option<EditorCommand> {
    let before = *object.transform();
    let after = crate::types::Transform {
        is_flipped: !before.is_flipped,
        ..before
    };
    object.set_transform(after);
    Some(TransformCommand::with_after(object.id(), before, after).into())
}

fn toggle_text_style(object: &mut SceneObject, bold: bool) -> Option<EditorCommand> {
    let id = object.id();
    let text = object.as_text_mut()?;
    let before = text.snapshot();
    if bold {
        text.toggle_bold();
    } else {
        text.toggle_italic();
    }
    Some(TextEditCommand::from_states(id, before, text.snapshot()).into())
}

fn register_text_actions(registry: &mut ToolbarRegistry) {
    registry.register_global_action(GlobalAction {
        id: "add-text".to_string(),
        label: "Add Text".to_string(),
        order: 0,
        handler: Rc::new(|center| {
            let object = SceneObject::text("Text", TextStyle::default(), center);
            Some(AddCommand::new(object).into())
        }),
    });

    let is_text = |o: &SceneObject| o.as_text().is_some();
    registry.register_action(
        ObjectKind::Text,
        ObjectAction::new("font-bold", "Bold", "style", 0, |o| toggle_text_style(o, true))
            .visible_when(is_text),
    );
    registry.register_action(
        ObjectKind::Text,
        ObjectAction::new("font-italic", "Italic", "style", 1, |o| toggle_text_style(o, false))
            .visible_when(is_text),
    );
    registry.register_action(
        ObjectKind::Text,
        ObjectAction::new("flip", "Flip", "transform", 0, flip).visible_when(is_text),
    );
}

fn register_image_actions(registry: &mut ToolbarRegistry) {
    registry.register_action(
        ObjectKind::Image,
        ObjectAction::new("flip", "Flip", "transform", 0, flip)
            .visible_when(|o| o.as_image().is_some()),
    );
}

fn register_crop_actions(registry: &mut ToolbarRegistry) {
    registry.register_group(ToolbarGroup::new("crop", "Crop", 4));

    let not_cropping = |o: &SceneObject| o.as_image().is_some_and(|i| !i.is_cropping());
    let cropping = |o: &SceneObject| o.as_image().is_some_and(|i| i.is_cropping());

    for (id, label, order, mode) in [
        ("crop-rectangular", "Rectangular Crop", 1, CropMode::Rectangular),
        ("crop-circular", "Circular Crop", 2, CropMode::Circular),
    ] {
        registry.register_action(
            ObjectKind::Image,
            ObjectAction::new(id, label, "crop", order, move |o| {
                if let Some(image) = o.as_image_mut() {
                    if let Err(e) = image.start_crop(mode, None) {
                        tracing::warn!("Cannot start crop: {}", e);
                    }
                }
                None
            })
            .visible_when(not_cropping),
        );
    }

    registry.register_action(
        ObjectKind::Image,
        ObjectAction::new("crop-apply", "Apply Crop", "crop", 3, |o| {
            let result = o.as_image_mut()?.finish_crop();
            match result.and_then(|r| CropCommand::new(o, r)) {
                Ok(command) => Some(command.into()),
                Err(e) => {
                    tracing::warn!("Crop not applied: {}", e);
                    None
                }
            }
        })
        .visible_when(cropping),
    );
    registry.register_action(
        ObjectKind::Image,
        ObjectAction::new("crop-cancel", "Cancel Crop", "crop", 4, |o| {
            if let Some(image) = o.as_image_mut() {
                image.cancel_crop();
            }
            None
        })
        .visible_when(cropping),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::ImageData;
    use image::RgbaImage;

    fn text() -> SceneObject {
        SceneObject::text("hello", TextStyle::default(), Position::ORIGIN)
    }

    fn picture() -> SceneObject {
        SceneObject::image(
            ImageData::from_raster("test.png", RgbaImage::new(100, 80)),
            Position::ORIGIN,
        )
    }

    fn ids(actions: &[&ObjectAction]) -> Vec<String> {
        actions.iter().map(|a| a.id.clone()).collect()
    }

    #[test]
    fn test_default_groups_sorted() {
        let registry = ToolbarRegistry::with_defaults();
        let groups: Vec<_> = registry.get_groups().iter().map(|g| g.id.as_str()).collect();
        assert_eq!(groups, vec!["global", "general", "transform", "style", "crop"]);
    }

    #[test]
    fn test_actions_sorted_by_group_then_order() {
        let registry = ToolbarRegistry::with_defaults();
        let object = text();
        assert_eq!(
            ids(&registry.get_object_actions(&object)),
            vec!["flip", "font-bold", "font-italic"]
        );
    }

    #[test]
    fn test_crop_actions_follow_session_state() {
        let registry = ToolbarRegistry::with_defaults();
        let mut object = picture();
        assert_eq!(
            ids(&registry.get_object_actions(&object)),
            vec!["flip", "crop-rectangular", "crop-circular"]
        );

        let outcome = registry.run_object_action("crop-rectangular", &mut object);
        assert!(matches!(outcome, Some(None)));
        assert_eq!(
            ids(&registry.get_object_actions(&object)),
            vec!["flip", "crop-apply", "crop-cancel"]
        );

        let outcome = registry.run_object_action("crop-apply", &mut object);
        assert!(matches!(outcome, Some(Some(EditorCommand::Crop(_)))));
        assert!(!object.as_image().is_some_and(|i| i.is_cropping()));
    }

    #[test]
    fn test_flip_returns_transform_command() {
        let registry = ToolbarRegistry::with_defaults();
        let mut object = text();
        let outcome = registry.run_object_action("flip", &mut object);
        assert!(matches!(outcome, Some(Some(EditorCommand::Transform(_)))));
        assert!(object.transform().is_flipped);
    }

    #[test]
    fn test_hidden_action_does_not_run() {
        let registry = ToolbarRegistry::with_defaults();
        let mut object = picture();
        assert!(registry.run_object_action("crop-apply", &mut object).is_none());
        assert!(registry.run_object_action("font-bold", &mut object).is_none());
    }

    #[test]
    fn test_add_text_global_action() {
        let registry = ToolbarRegistry::with_defaults();
        let outcome = registry.run_global_action("add-text", Position::new(5.0, 6.0));
        assert!(matches!(outcome, Some(Some(EditorCommand::Add(_)))));
        assert!(registry.run_global_action("missing", Position::ORIGIN).is_none());
    }
}
