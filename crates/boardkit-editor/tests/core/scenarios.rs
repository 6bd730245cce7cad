use boardkit_core::Position;
use boardkit_editor::{
    AddCommand, Camera, CommandProcessor, ControlPointType, DeleteCommand, ImageData, Scene,
    SceneObject, SelectCommand, TextStyle, TransformLimits, TransformManager,
};
use image::RgbaImage;
use std::f64::consts::FRAC_PI_2;

fn text(label: &str, x: f64) -> SceneObject {
    SceneObject::text(label, TextStyle::default(), Position::new(x, 0.0))
}

#[test]
fn test_add_and_select() {
    let mut scene = Scene::new();
    let mut processor = CommandProcessor::new(50);
    let object = text("Hello", 0.0);
    let id = object.id();

    processor.execute(AddCommand::new(object), &mut scene);
    processor.execute(SelectCommand::new(Some(id)), &mut scene);

    assert_eq!(scene.len(), 1);
    assert_eq!(scene.selected_id(), Some(id));
    assert_eq!(scene.get_selected_objects().len(), 1);
    assert_eq!(processor.undo_len(), 2);
}

#[test]
fn test_delete_then_undo_restores_index_and_selection() {
    let mut scene = Scene::new();
    let mut processor = CommandProcessor::new(50);
    let a = scene.add(text("a", -100.0));
    let b = scene.add(text("b", 0.0));
    let c = scene.add(text("c", 100.0));
    scene.select(b);

    let delete = DeleteCommand::new(&scene, b).unwrap();
    assert_eq!(delete.original_index(), 1);
    assert!(delete.was_selected());
    processor.execute(delete, &mut scene);

    assert_eq!(scene.ids(), vec![a, c]);
    assert!(scene.selected_id().is_none());

    processor.undo(&mut scene);
    assert_eq!(scene.ids(), vec![a, b, c]);
    assert_eq!(scene.selected_id(), Some(b));
    assert!(scene.get(b).unwrap().is_selected());
}

#[test]
fn test_rotation_handle_quarter_turn_is_smoothed() {
    let mut manager = TransformManager::new(TransformLimits::default());
    let camera = Camera::default();
    let mut object = text("spin", 0.0);
    let center = object.screen_center(&camera);

    manager.start_drag(
        &object,
        center + Position::new(100.0, 0.0),
        ControlPointType::Rotation,
        &camera,
    );
    assert!(manager.drag(&mut object, center + Position::new(0.0, 100.0), &camera));

    let expected = FRAC_PI_2 * TransformLimits::default().rotation_smoothing;
    assert!((object.transform().rotation - expected).abs() < 1e-9);

    let end = manager.end_drag().unwrap();
    assert_eq!(end.object_id, object.id());
    assert_eq!(end.initial_transform.rotation, 0.0);
    assert!(!manager.is_dragging());
}

#[test]
fn test_dragging_edge_across_center_flips_once() {
    let mut manager = TransformManager::new(TransformLimits::default());
    let camera = Camera::default();
    let data = ImageData::from_raster("flip.png", RgbaImage::new(100, 50));
    let mut object = SceneObject::image(data, Position::ORIGIN);
    let center = object.screen_center(&camera);

    manager.start_drag(
        &object,
        center + Position::new(60.0, 0.0),
        ControlPointType::MiddleRight,
        &camera,
    );

    manager.drag(&mut object, center + Position::new(30.0, 0.0), &camera);
    assert!(!object.transform().is_flipped);
    assert!((object.transform().scale.x - 0.5).abs() < 1e-9);

    manager.drag(&mut object, center + Position::new(-10.0, 0.0), &camera);
    assert!(object.transform().is_flipped);
    let limits = TransformLimits::default();
    assert!(object.transform().scale.x >= limits.min_scale - 1e-9);

    manager.drag(&mut object, center + Position::new(-30.0, 0.0), &camera);
    assert!(object.transform().is_flipped);
    assert!((object.transform().scale.y - 1.0).abs() < 1e-12);

    manager.end_drag();
}

#[test]
fn test_move_follows_pointer_in_world_units() {
    let mut manager = TransformManager::new(TransformLimits::default());
    let camera = Camera::new(0.0, 0.0, 2.0);
    let mut object = text("move", 0.0);

    manager.start_drag(&object, Position::new(10.0, 10.0), ControlPointType::None, &camera);
    manager.drag(&mut object, Position::new(50.0, 30.0), &camera);

    assert_eq!(object.transform().position, Position::new(20.0, 10.0));
}

#[test]
fn test_drag_for_other_object_is_ignored() {
    let mut manager = TransformManager::new(TransformLimits::default());
    let camera = Camera::default();
    let dragged = text("a", 0.0);
    let mut other = text("b", 0.0);

    manager.start_drag(&dragged, Position::ORIGIN, ControlPointType::None, &camera);
    assert!(!manager.drag(&mut other, Position::new(10.0, 0.0), &camera));
    assert_eq!(other.transform().position, Position::ORIGIN);
}
