use boardkit_core::{shared, Position, Shared};
use boardkit_editor::{
    Camera, CommandProcessor, ControlPointManager, ControlPointType, CropMode, FontWeight,
    FrameScheduler, ImageData, InteractionEnv, InteractionManager, KeyEvent, MouseContext,
    ObjectId, PointerEvent, Scene, SceneObject, TextStyle, TransformManager,
};
use image::RgbaImage;

struct Harness {
    scene: Scene,
    transform: TransformManager,
    commands: CommandProcessor,
    camera: Camera,
    control_points: ControlPointManager,
    scheduler: Shared<FrameScheduler>,
    interactions: InteractionManager,
}

impl Harness {
    fn new() -> Self {
        Self {
            scene: Scene::new(),
            transform: TransformManager::default(),
            commands: CommandProcessor::new(50),
            camera: Camera::default(),
            control_points: ControlPointManager::default(),
            scheduler: shared(FrameScheduler::new()),
            interactions: InteractionManager::with_default_handlers(),
        }
    }

    fn env(&mut self) -> (&mut InteractionManager, InteractionEnv<'_>) {
        (
            &mut self.interactions,
            InteractionEnv {
                scene: &mut self.scene,
                transform: &mut self.transform,
                commands: &mut self.commands,
                camera: &self.camera,
                control_points: &self.control_points,
                min_hit_size: 20.0,
                scheduler: &self.scheduler,
            },
        )
    }

    fn mouse_down(&mut self, position: Position, object: Option<ObjectId>) {
        let ctx = context(position, object);
        let (manager, mut env) = self.env();
        manager.handle_mouse_down(&ctx, &mut env);
    }

    fn mouse_move(&mut self, position: Position, object: Option<ObjectId>) {
        let ctx = context(position, object);
        let (manager, mut env) = self.env();
        manager.handle_mouse_move(&ctx, &mut env);
    }

    fn mouse_up(&mut self, position: Position, object: Option<ObjectId>) {
        let ctx = context(position, object);
        let (manager, mut env) = self.env();
        manager.handle_mouse_up(&ctx, &mut env);
    }

    fn double_click(&mut self, position: Position, object: Option<ObjectId>) {
        let ctx = context(position, object);
        let (manager, mut env) = self.env();
        manager.handle_double_click(&ctx, &mut env);
    }

    fn key(&mut self, event: KeyEvent) -> bool {
        let selected = self.scene.selected_id();
        let (manager, mut env) = self.env();
        let handled = manager.handle_key_down(&event, selected, &mut env);
        manager.handle_key_up(&event, selected, &mut env);
        handled
    }
}

fn context(position: Position, object: Option<ObjectId>) -> MouseContext {
    MouseContext {
        position,
        object,
        control_point: ControlPointType::None,
        event: PointerEvent::at(position),
    }
}

fn text(label: &str) -> SceneObject {
    SceneObject::text(label, TextStyle::default(), Position::ORIGIN)
}

#[test]
fn test_handlers_ordered_by_priority() {
    let manager = InteractionManager::with_default_handlers();
    assert_eq!(manager.handler_ids(), vec!["select", "crop", "text", "transform"]);
}

#[test]
fn test_click_selects_and_drag_moves() {
    let mut h = Harness::new();
    let id = h.scene.add(text("Hello"));

    h.mouse_down(Position::ORIGIN, Some(id));
    assert_eq!(h.scene.selected_id(), Some(id));
    assert_eq!(h.interactions.active_handler_id(), Some("transform"));
    assert!(h.transform.is_dragging());

    h.mouse_move(Position::new(25.0, 5.0), Some(id));
    assert_eq!(h.scene.get(id).unwrap().transform().position, Position::new(25.0, 5.0));

    h.mouse_up(Position::new(25.0, 5.0), Some(id));
    assert!(h.interactions.active_handler_id().is_none());
    assert!(!h.transform.is_dragging());
    // select + transform
    assert_eq!(h.commands.undo_len(), 2);

    h.commands.undo(&mut h.scene);
    assert_eq!(h.scene.get(id).unwrap().transform().position, Position::ORIGIN);
}

#[test]
fn test_click_without_movement_records_only_selection() {
    let mut h = Harness::new();
    let id = h.scene.add(text("Hello"));

    h.mouse_down(Position::ORIGIN, Some(id));
    h.mouse_up(Position::ORIGIN, Some(id));
    assert_eq!(h.commands.undo_len(), 1);

    // Already selected: no second select command.
    h.mouse_down(Position::ORIGIN, Some(id));
    h.mouse_up(Position::ORIGIN, Some(id));
    assert_eq!(h.commands.undo_len(), 1);
}

#[test]
fn test_text_edit_session_becomes_one_command() {
    let mut h = Harness::new();
    let id = h.scene.add(text("Hello"));

    h.double_click(Position::ORIGIN, Some(id));
    assert!(h.scene.get(id).unwrap().as_text().unwrap().is_editing());

    assert!(h.key(KeyEvent::new("!")));
    assert!(h.key(KeyEvent::new("?")));
    assert_eq!(h.scene.get(id).unwrap().as_text().unwrap().content(), "Hello!?");
    assert_eq!(h.commands.undo_len(), 0);

    assert!(h.key(KeyEvent::new("Escape")));
    let data = h.scene.get(id).unwrap().as_text().unwrap();
    assert!(!data.is_editing());
    assert_eq!(h.commands.undo_len(), 1);

    h.commands.undo(&mut h.scene);
    assert_eq!(h.scene.get(id).unwrap().as_text().unwrap().content(), "Hello");
}

#[test]
fn test_background_click_commits_edit() {
    let mut h = Harness::new();
    let id = h.scene.add(text("Hi"));

    h.double_click(Position::ORIGIN, Some(id));
    h.key(KeyEvent::new("Backspace"));
    h.mouse_down(Position::new(900.0, 900.0), None);

    let data = h.scene.get(id).unwrap().as_text().unwrap();
    assert!(!data.is_editing());
    assert_eq!(data.content(), "H");
    assert_eq!(h.commands.undo_len(), 1);
}

#[test]
fn test_background_click_right_after_double_click_ends_edit() {
    let mut h = Harness::new();
    let id = h.scene.add(text("Hi"));

    h.double_click(Position::ORIGIN, Some(id));
    assert_eq!(h.interactions.active_handler_id(), Some("text"));
    // Type straight into the object so the text handler stays latched.
    h.scene
        .get_mut(id)
        .unwrap()
        .as_text_mut()
        .unwrap()
        .on_key_down(&KeyEvent::new("!"));

    h.mouse_down(Position::new(900.0, 900.0), None);

    assert!(h.interactions.active_handler_id().is_none());
    let data = h.scene.get(id).unwrap().as_text().unwrap();
    assert!(!data.is_editing());
    assert_eq!(data.content(), "Hi!");
    assert_eq!(h.commands.undo_len(), 1);

    // Keys no longer reach the text.
    assert!(!h.key(KeyEvent::new("x")));
    assert_eq!(h.scene.get(id).unwrap().as_text().unwrap().content(), "Hi!");
}

#[test]
fn test_click_on_other_object_while_editing_selects_and_drags_it() {
    let mut h = Harness::new();
    let a = h.scene.add(text("A"));
    let b = h.scene.add(SceneObject::text(
        "B",
        TextStyle::default(),
        Position::new(300.0, 0.0),
    ));

    h.double_click(Position::ORIGIN, Some(a));
    h.mouse_down(Position::new(300.0, 0.0), Some(b));

    assert!(!h.scene.get(a).unwrap().as_text().unwrap().is_editing());
    assert_eq!(h.scene.selected_id(), Some(b));
    assert!(h.transform.is_dragging());
    assert_eq!(h.interactions.active_handler_id(), Some("transform"));

    h.mouse_move(Position::new(320.0, 10.0), Some(b));
    h.mouse_up(Position::new(320.0, 10.0), Some(b));
    assert_eq!(
        h.scene.get(b).unwrap().transform().position,
        Position::new(320.0, 10.0)
    );
}

#[test]
fn test_press_inside_edited_text_does_not_drag() {
    let mut h = Harness::new();
    let id = h.scene.add(text("Hello"));
    h.mouse_down(Position::ORIGIN, Some(id));
    h.mouse_up(Position::ORIGIN, Some(id));

    h.double_click(Position::ORIGIN, Some(id));
    h.mouse_down(Position::new(5.0, 0.0), Some(id));
    h.mouse_move(Position::new(40.0, 0.0), Some(id));
    h.mouse_up(Position::new(40.0, 0.0), Some(id));

    let data = h.scene.get(id).unwrap();
    assert_eq!(data.transform().position, Position::ORIGIN);
    assert!(data.as_text().unwrap().is_editing());
    assert!(!h.transform.is_dragging());
}

#[test]
fn test_unchanged_edit_session_records_nothing() {
    let mut h = Harness::new();
    let id = h.scene.add(text("Hi"));

    h.double_click(Position::ORIGIN, Some(id));
    h.key(KeyEvent::new("Escape"));
    assert_eq!(h.commands.undo_len(), 0);
}

#[test]
fn test_bold_shortcut_on_selected_text() {
    let mut h = Harness::new();
    let id = h.scene.add(text("Hi"));
    h.scene.select(id);

    assert!(h.key(KeyEvent::new("b").ctrl()));
    assert_eq!(
        h.scene.get(id).unwrap().as_text().unwrap().style().weight,
        FontWeight::Bold
    );
    assert_eq!(h.commands.undo_len(), 1);

    h.commands.undo(&mut h.scene);
    assert_eq!(
        h.scene.get(id).unwrap().as_text().unwrap().style().weight,
        FontWeight::Normal
    );
}

#[test]
fn test_escape_without_edit_is_not_consumed() {
    let mut h = Harness::new();
    let id = h.scene.add(text("Hi"));
    h.scene.select(id);
    assert!(!h.key(KeyEvent::new("Escape")));
}

fn cropping_picture(h: &mut Harness) -> ObjectId {
    let data = ImageData::from_raster("photo.png", RgbaImage::new(100, 80));
    let id = h.scene.add(SceneObject::image(data, Position::ORIGIN));
    h.scene.select(id);
    h.scene
        .get_mut(id)
        .and_then(|o| o.as_image_mut())
        .unwrap()
        .start_crop(CropMode::Rectangular, None)
        .unwrap();
    id
}

#[test]
fn test_enter_applies_crop() {
    let mut h = Harness::new();
    let id = cropping_picture(&mut h);

    assert!(h.key(KeyEvent::new("Enter")));
    let image = h.scene.get(id).unwrap().as_image().unwrap();
    assert!(!image.is_cropping());
    assert_eq!(image.get_original_size(), (80, 64));
    assert_eq!(h.commands.undo_len(), 1);

    h.commands.undo(&mut h.scene);
    assert_eq!(
        h.scene.get(id).unwrap().as_image().unwrap().get_original_size(),
        (100, 80)
    );
}

#[test]
fn test_escape_cancels_crop() {
    let mut h = Harness::new();
    let id = cropping_picture(&mut h);

    assert!(h.key(KeyEvent::new("Escape")));
    let image = h.scene.get(id).unwrap().as_image().unwrap();
    assert!(!image.is_cropping());
    assert_eq!(image.get_original_size(), (100, 80));
    assert_eq!(h.commands.undo_len(), 0);
}

#[test]
fn test_cropping_image_is_not_moved() {
    let mut h = Harness::new();
    let id = cropping_picture(&mut h);

    h.mouse_down(Position::ORIGIN, Some(id));
    assert_eq!(h.interactions.active_handler_id(), Some("crop"));
    h.mouse_move(Position::new(30.0, 0.0), Some(id));
    h.mouse_up(Position::new(30.0, 0.0), Some(id));

    assert_eq!(h.scene.get(id).unwrap().transform().position, Position::ORIGIN);
    assert!(!h.transform.is_dragging());
}

#[test]
fn test_destroy_cancels_crop_sessions() {
    let mut h = Harness::new();
    let id = cropping_picture(&mut h);

    let (manager, mut env) = h.env();
    manager.destroy(&mut env);

    assert!(!h.scene.get(id).unwrap().as_image().unwrap().is_cropping());
    assert!(h.interactions.handler_ids().is_empty());
}
