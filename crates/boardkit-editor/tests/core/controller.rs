use boardkit_core::Position;
use boardkit_editor::{
    CanvasController, CanvasRect, DrawOp, KeyEvent, MouseButton, PixmapSurface, RawPointerEvent,
    RawWheelEvent, RecordingSurface, SceneObject, Surface, TextStyle, ToolbarRegistry,
};
use boardkit_settings::EditorConfig;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn controller() -> CanvasController<RecordingSurface> {
    CanvasController::new(RecordingSurface::new(800, 600), EditorConfig::default()).unwrap()
}

fn hello() -> SceneObject {
    SceneObject::text("Hello", TextStyle::default(), Position::ORIGIN)
}

fn click(canvas: &mut CanvasController<RecordingSurface>, x: f64, y: f64) {
    let event = RawPointerEvent::at(x, y).with_button(MouseButton::Left);
    canvas.mouse_down(&event);
    canvas.mouse_up(&event);
}

fn wheel(delta_y: f64) -> RawWheelEvent {
    RawWheelEvent {
        client_x: 400.0,
        client_y: 300.0,
        delta_y,
        ..RawWheelEvent::default()
    }
}

#[test]
fn test_camera_starts_centered() {
    let canvas = controller();
    assert_eq!(canvas.camera().x, 400.0);
    assert_eq!(canvas.camera().y, 300.0);
    assert_eq!(canvas.camera().zoom, 1.0);
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = EditorConfig::default();
    config.canvas.min_zoom = 20.0;
    assert!(CanvasController::new(RecordingSurface::new(10, 10), config).is_err());
}

#[test]
fn test_renders_only_when_dirty() {
    let mut canvas = controller();
    let renders = Rc::new(Cell::new(0));
    let _sub = {
        let renders = Rc::clone(&renders);
        canvas.events().render.on(move |_| renders.set(renders.get() + 1))
    };

    assert!(canvas.frame(16.0));
    assert!(!canvas.frame(32.0));
    assert_eq!(renders.get(), 1);

    canvas.add_object(hello());
    assert!(canvas.frame(48.0));
    assert_eq!(renders.get(), 2);
    assert!(canvas
        .surface()
        .texts()
        .iter()
        .any(|t| t.contains("Hello")));
}

#[test]
fn test_render_balances_save_and_restore() {
    let mut canvas = controller();
    canvas.add_object(hello());
    canvas.frame(16.0);

    let surface = canvas.surface();
    assert_eq!(surface.stack_depth(), 0);
    assert!(matches!(surface.ops().first(), Some(DrawOp::Clear(_))));
}

#[test]
fn test_click_selects_and_emits() {
    let mut canvas = controller();
    let id = canvas.add_object(hello());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let _sub = {
        let seen = Rc::clone(&seen);
        canvas
            .events()
            .selection_change
            .on(move |s| seen.borrow_mut().push(*s))
    };

    click(&mut canvas, 400.0, 300.0);
    assert_eq!(canvas.scene().selected_id(), Some(id));
    assert_eq!(seen.borrow().as_slice(), &[Some(id)]);

    click(&mut canvas, 10.0, 10.0);
    assert!(canvas.scene().selected_id().is_none());
    assert_eq!(seen.borrow().last(), Some(&None));
}

#[test]
fn test_drag_moves_object_and_undo_restores() {
    let mut canvas = controller();
    let id = canvas.add_object(hello());

    canvas.mouse_down(&RawPointerEvent::at(400.0, 300.0).with_button(MouseButton::Left));
    canvas.mouse_move(&RawPointerEvent::at(450.0, 320.0).with_button(MouseButton::Left));
    canvas.mouse_up(&RawPointerEvent::at(450.0, 320.0).with_button(MouseButton::Left));

    assert_eq!(
        canvas.object(id).unwrap().transform().position,
        Position::new(50.0, 20.0)
    );
    assert!(canvas.undo());
    assert_eq!(canvas.object(id).unwrap().transform().position, Position::ORIGIN);
    assert!(canvas.redo());
    assert_eq!(
        canvas.object(id).unwrap().transform().position,
        Position::new(50.0, 20.0)
    );
}

#[test]
fn test_right_drag_pans_camera() {
    let mut canvas = controller();
    let cameras = Rc::new(Cell::new(0));
    let _sub = {
        let cameras = Rc::clone(&cameras);
        canvas
            .events()
            .camera_change
            .on(move |_| cameras.set(cameras.get() + 1))
    };

    canvas.mouse_down(&RawPointerEvent::at(100.0, 100.0).with_button(MouseButton::Right));
    assert!(canvas.camera().is_dragging);
    canvas.mouse_move(&RawPointerEvent::at(110.0, 105.0).with_button(MouseButton::Right));
    canvas.mouse_up(&RawPointerEvent::at(110.0, 105.0).with_button(MouseButton::Right));

    assert_eq!(canvas.camera().x, 410.0);
    assert_eq!(canvas.camera().y, 305.0);
    assert!(!canvas.camera().is_dragging);
    assert_eq!(cameras.get(), 1);
}

#[test]
fn test_pan_does_not_touch_objects() {
    let mut canvas = controller();
    let id = canvas.add_object(hello());

    canvas.mouse_down(&RawPointerEvent::at(400.0, 300.0).with_button(MouseButton::Right));
    canvas.mouse_move(&RawPointerEvent::at(420.0, 300.0).with_button(MouseButton::Right));
    canvas.mouse_up(&RawPointerEvent::at(420.0, 300.0).with_button(MouseButton::Right));

    assert!(canvas.scene().selected_id().is_none());
    assert_eq!(canvas.object(id).unwrap().transform().position, Position::ORIGIN);
}

#[test]
fn test_animated_wheel_zoom_keeps_anchor() {
    let mut canvas = controller();
    let zooms = Rc::new(RefCell::new(Vec::new()));
    let _sub = {
        let zooms = Rc::clone(&zooms);
        canvas.events().zoom_change.on(move |z| zooms.borrow_mut().push(*z))
    };

    canvas.wheel(&wheel(-100.0));
    let target = (0.7f64).exp();
    let animation = *canvas.zoom_animation().unwrap();
    assert!((animation.target_zoom - target).abs() < 1e-9);

    // Ignored while the animation runs.
    canvas.wheel(&wheel(-100.0));
    assert!((canvas.zoom_animation().unwrap().target_zoom - target).abs() < 1e-9);

    canvas.frame(75.0);
    let mid = canvas.camera().zoom;
    assert!(mid > 1.0 && mid < target);
    assert!(zooms.borrow().is_empty());

    canvas.frame(200.0);
    assert!(canvas.zoom_animation().is_none());
    assert!((canvas.camera().zoom - target).abs() < 1e-9);
    assert!((canvas.camera().x - 400.0).abs() < 1e-9);
    assert!((canvas.camera().y - 300.0).abs() < 1e-9);
    assert_eq!(zooms.borrow().len(), 1);
}

#[test]
fn test_tiny_wheel_delta_is_ignored() {
    let mut canvas = controller();
    canvas.wheel(&wheel(-1.0));
    assert!(canvas.zoom_animation().is_none());
    assert_eq!(canvas.camera().zoom, 1.0);
}

#[test]
fn test_immediate_zoom_coalesces_per_frame() {
    let mut canvas = controller();
    canvas.set_zoom_animation(false);

    canvas.wheel(&wheel(-100.0));
    let first = (0.1f64).exp();
    assert!((canvas.camera().zoom - first).abs() < 1e-9);

    // Within the debounce window the latest event waits for the next frame.
    canvas.wheel(&wheel(-50.0));
    canvas.wheel(&wheel(-100.0));
    assert!((canvas.camera().zoom - first).abs() < 1e-9);

    canvas.frame(16.0);
    assert!((canvas.camera().zoom - first * first).abs() < 1e-9);

    canvas.frame(500.0);
    assert!(!canvas.needs_render());
}

#[test]
fn test_zoom_is_clamped() {
    let mut canvas = controller();
    canvas.zoom_to(1000.0);
    assert_eq!(canvas.camera().zoom, canvas.config().canvas.max_zoom);
    canvas.zoom_to(0.0);
    assert_eq!(canvas.camera().zoom, canvas.config().canvas.min_zoom);
}

#[test]
fn test_disabling_animation_jumps_to_target() {
    let mut canvas = controller();
    canvas.wheel(&wheel(-100.0));
    canvas.set_zoom_animation(false);
    assert!(canvas.zoom_animation().is_none());
    assert!((canvas.camera().zoom - (0.7f64).exp()).abs() < 1e-9);
}

#[test]
fn test_delete_shortcut_and_undo() {
    let mut canvas = controller();
    let id = canvas.add_object(hello());
    click(&mut canvas, 400.0, 300.0);

    assert!(canvas.key_down(&KeyEvent::new("Delete")));
    assert!(canvas.objects().is_empty());

    assert!(canvas.key_down(&KeyEvent::new("z").ctrl()));
    assert_eq!(canvas.objects().len(), 1);
    assert_eq!(canvas.scene().selected_id(), Some(id));

    assert!(canvas.key_down(&KeyEvent::new("z").ctrl().shift()));
    assert!(canvas.objects().is_empty());
}

#[test]
fn test_delete_without_selection_is_ignored() {
    let mut canvas = controller();
    canvas.add_object(hello());
    assert!(!canvas.key_down(&KeyEvent::new("Delete")));
    assert_eq!(canvas.objects().len(), 1);
}

#[test]
fn test_typing_in_edit_mode_and_commit() {
    let mut canvas = controller();
    let id = canvas.add_object(hello());

    canvas.double_click(&RawPointerEvent::at(400.0, 300.0).with_button(MouseButton::Left));
    assert!(canvas.needs_render());
    for key in ["!", "!"] {
        assert!(canvas.key_down(&KeyEvent::new(key)));
        canvas.key_up(&KeyEvent::new(key));
    }
    // Delete edits text while editing instead of removing the object.
    assert!(canvas.key_down(&KeyEvent::new("Backspace")));
    canvas.key_up(&KeyEvent::new("Backspace"));
    assert!(canvas.key_down(&KeyEvent::new("Escape")));

    let text = canvas.object(id).unwrap().as_text().unwrap();
    assert_eq!(text.content(), "Hello!");
    assert!(!text.is_editing());
    assert!(canvas.undo());
    assert_eq!(canvas.object(id).unwrap().as_text().unwrap().content(), "Hello");
}

#[test]
fn test_objects_change_reports_ids() {
    let mut canvas = controller();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let _sub = {
        let seen = Rc::clone(&seen);
        canvas
            .events()
            .objects_change
            .on(move |ids| seen.borrow_mut().push(ids.len()))
    };

    let a = canvas.add_object(hello());
    canvas.add_object(hello());
    canvas.remove_object(a);
    canvas.clear();

    assert_eq!(seen.borrow().as_slice(), &[1, 2, 1, 0]);
}

#[test]
fn test_toolbar_actions_run_on_selection() {
    let mut canvas = controller();
    let registry = ToolbarRegistry::with_defaults();

    assert!(!canvas.run_toolbar_action(&registry, "flip"));

    assert!(canvas.run_global_action(&registry, "add-text"));
    assert_eq!(canvas.objects().len(), 1);
    let id = canvas.objects()[0].id();
    assert_eq!(canvas.object(id).unwrap().transform().position, Position::ORIGIN);

    click(&mut canvas, 400.0, 300.0);
    assert!(canvas.run_toolbar_action(&registry, "flip"));
    assert!(canvas.object(id).unwrap().transform().is_flipped);

    assert!(canvas.undo());
    assert!(!canvas.object(id).unwrap().transform().is_flipped);
}

#[test]
fn test_resize_and_device_pixel_ratio() {
    let mut canvas = controller();
    canvas.resize(CanvasRect::new(0.0, 0.0, 400.0, 300.0));
    assert_eq!((canvas.surface().width(), canvas.surface().height()), (400, 300));

    canvas.set_device_pixel_ratio(2.0);
    assert_eq!((canvas.surface().width(), canvas.surface().height()), (800, 600));
    assert_eq!(canvas.normalize(100.0, 50.0), Position::new(200.0, 100.0));

    canvas.resize(CanvasRect::new(20.0, 10.0, 400.0, 300.0));
    assert_eq!(canvas.normalize(120.0, 60.0), Position::new(200.0, 100.0));
}

#[test]
fn test_debug_overlay() {
    let mut config = EditorConfig::default();
    config.canvas.debug = true;
    let mut canvas = CanvasController::new(RecordingSurface::new(800, 600), config).unwrap();

    assert!(canvas.frame(16.0));
    assert!(canvas.frame(32.0));
    let texts = canvas.surface().texts();
    assert!(texts.iter().any(|t| t.starts_with("FPS: ")));
    assert!(texts.iter().any(|t| t.starts_with("Zoom: 1.00")));
}

#[test]
fn test_destroy_stops_everything() {
    let mut canvas = controller();
    canvas.add_object(hello());
    let _sub = canvas.events().render.on(|_| {});
    canvas.wheel(&wheel(-100.0));

    canvas.destroy();
    assert!(canvas.is_destroyed());
    assert!(canvas.objects().is_empty());
    assert!(canvas.zoom_animation().is_none());
    assert_eq!(canvas.events().listener_count(), 0);
    assert!(!canvas.frame(16.0));

    canvas.wheel(&wheel(-100.0));
    assert!(canvas.zoom_animation().is_none());
    canvas.destroy();
}

#[test]
fn test_pixmap_surface_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.png");

    let surface = PixmapSurface::new(200, 100).unwrap();
    let mut canvas = CanvasController::new(surface, EditorConfig::default()).unwrap();
    canvas.add_object(hello());
    assert!(canvas.frame(16.0));
    canvas.surface().save_png(&path).unwrap();

    let written = image::open(&path).unwrap();
    assert_eq!((written.width(), written.height()), (200, 100));
}
