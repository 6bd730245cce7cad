use boardkit_core::Position;
use boardkit_editor::{
    AddCommand, CommandProcessor, CropCommand, CropMode, DeleteCommand, ImageData, Scale, Scene,
    SceneObject, SelectCommand, TextEditCommand, TextStyle, TextStylePatch, Transform,
    TransformCommand,
};
use image::RgbaImage;

fn text(label: &str) -> SceneObject {
    SceneObject::text(label, TextStyle::default(), Position::ORIGIN)
}

fn picture(width: u32, height: u32) -> SceneObject {
    let data = ImageData::from_raster("test.png", RgbaImage::new(width, height));
    SceneObject::image(data, Position::ORIGIN)
}

#[test]
fn test_add_undo_redo() {
    let mut scene = Scene::new();
    let mut processor = CommandProcessor::new(50);
    let object = text("Hello");
    let id = object.id();

    processor.execute(AddCommand::new(object), &mut scene);
    assert_eq!(scene.ids(), vec![id]);

    assert!(processor.undo(&mut scene));
    assert!(scene.is_empty());

    assert!(processor.redo(&mut scene));
    assert_eq!(scene.ids(), vec![id]);
}

#[test]
fn test_select_restores_previous_selection() {
    let mut scene = Scene::new();
    let mut processor = CommandProcessor::new(50);
    let a = scene.add(text("a"));
    let b = scene.add(text("b"));
    scene.select(a);

    processor.execute(SelectCommand::new(Some(b)), &mut scene);
    assert_eq!(scene.selected_id(), Some(b));

    processor.undo(&mut scene);
    assert_eq!(scene.selected_id(), Some(a));
    assert!(scene.get(a).unwrap().is_selected());
    assert!(!scene.get(b).unwrap().is_selected());
}

#[test]
fn test_clear_selection_command() {
    let mut scene = Scene::new();
    let mut processor = CommandProcessor::new(50);
    let a = scene.add(text("a"));
    scene.select(a);

    processor.execute(SelectCommand::new(None), &mut scene);
    assert!(scene.selected_id().is_none());

    processor.undo(&mut scene);
    assert_eq!(scene.selected_id(), Some(a));
}

#[test]
fn test_transform_undo_redo() {
    let mut scene = Scene::new();
    let mut processor = CommandProcessor::new(50);
    let id = scene.add(text("a"));
    let before = *scene.get(id).unwrap().transform();
    let after = Transform {
        position: Position::new(40.0, -10.0),
        rotation: 0.5,
        scale: Scale::new(2.0, 1.5),
        is_flipped: true,
    };

    scene.get_mut(id).unwrap().set_transform(after);
    processor.execute(TransformCommand::new(id, before), &mut scene);
    assert_eq!(*scene.get(id).unwrap().transform(), after);

    processor.undo(&mut scene);
    assert_eq!(*scene.get(id).unwrap().transform(), before);

    processor.redo(&mut scene);
    assert_eq!(*scene.get(id).unwrap().transform(), after);
}

#[test]
fn test_text_edit_undo_redo() {
    let mut scene = Scene::new();
    let mut processor = CommandProcessor::new(50);
    let id = scene.add(text("Hello"));

    let command = TextEditCommand::new(
        scene.get(id).unwrap(),
        Some("World".to_string()),
        Some(TextStylePatch::size(32.0)),
    )
    .unwrap();
    processor.execute(command, &mut scene);

    let edited = scene.get(id).unwrap().as_text().unwrap();
    assert_eq!(edited.content(), "World");
    assert_eq!(edited.style().size, 32.0);

    processor.undo(&mut scene);
    let restored = scene.get(id).unwrap().as_text().unwrap();
    assert_eq!(restored.content(), "Hello");
    assert_eq!(restored.style().size, TextStyle::default().size);
}

#[test]
fn test_text_edit_rejects_images() {
    let object = picture(10, 10);
    assert!(TextEditCommand::new(&object, Some("x".to_string()), None).is_err());
}

#[test]
fn test_crop_undo_restores_pixels() {
    let mut scene = Scene::new();
    let mut processor = CommandProcessor::new(50);
    let id = scene.add(picture(100, 80));

    let image = scene.get_mut(id).unwrap().as_image_mut().unwrap();
    image.start_crop(CropMode::Rectangular, None).unwrap();
    let result = image.finish_crop().unwrap();

    let command = CropCommand::new(scene.get(id).unwrap(), result).unwrap();
    assert_eq!(command.before_size(), (100, 80));
    processor.execute(command, &mut scene);
    assert_eq!(
        scene.get(id).unwrap().as_image().unwrap().get_original_size(),
        (80, 64)
    );

    processor.undo(&mut scene);
    assert_eq!(
        scene.get(id).unwrap().as_image().unwrap().get_original_size(),
        (100, 80)
    );

    processor.redo(&mut scene);
    assert_eq!(
        scene.get(id).unwrap().as_image().unwrap().get_original_size(),
        (80, 64)
    );
}

#[test]
fn test_delete_missing_object_fails() {
    let scene = Scene::new();
    assert!(DeleteCommand::new(&scene, text("x").id()).is_err());
}

#[test]
fn test_undo_stack_is_bounded() {
    let mut scene = Scene::new();
    let mut processor = CommandProcessor::new(5);
    let a = scene.add(text("a"));
    let b = scene.add(text("b"));

    for i in 0..8 {
        let target = if i % 2 == 0 { a } else { b };
        processor.execute(SelectCommand::new(Some(target)), &mut scene);
    }
    assert_eq!(processor.undo_len(), 5);

    for _ in 0..5 {
        assert!(processor.undo(&mut scene));
    }
    assert!(!processor.undo(&mut scene));
    assert_eq!(processor.redo_len(), 5);
}

#[test]
fn test_new_command_clears_redo() {
    let mut scene = Scene::new();
    let mut processor = CommandProcessor::new(50);
    let a = scene.add(text("a"));

    processor.execute(SelectCommand::new(Some(a)), &mut scene);
    processor.undo(&mut scene);
    assert!(processor.can_redo());

    processor.execute(SelectCommand::new(Some(a)), &mut scene);
    assert!(!processor.can_redo());
}
