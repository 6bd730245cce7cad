use boardkit::{
    CanvasController, EditorConfig, PixmapSurface, Position, SceneObject, TextStyle, VERSION,
};

#[test]
fn test_version_is_set() {
    assert!(!VERSION.is_empty());
}

#[test]
fn test_render_scene_to_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.png");

    let surface = PixmapSurface::new(320, 240).unwrap();
    let mut canvas = CanvasController::new(surface, EditorConfig::default()).unwrap();
    canvas.add_object(SceneObject::text(
        "smoke",
        TextStyle::default(),
        Position::new(10.0, -5.0),
    ));
    assert!(canvas.frame(16.0));
    canvas.surface().save_png(&path).unwrap();

    assert!(path.exists());
    let background = canvas.surface().to_rgba_image().get_pixel(0, 0).0;
    assert_eq!(background[3], 255);
}
