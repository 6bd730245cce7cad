//! Headless demo: builds a small scene, drives it through the same input
//! path a host would use and writes the rendered frame to a PNG file.

use anyhow::Context;
use boardkit::{
    init_logging, CanvasController, EditorConfig, ImageData, KeyEvent, PixmapSurface, Position,
    RawPointerEvent, SceneObject, TextStyle, ToolbarRegistry, BUILD_DATE, VERSION,
};
use boardkit_editor::{FontWeight, MouseButton, Transform};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};

const WIDTH: u32 = 1024;
const HEIGHT: u32 = 768;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    init_logging()?;
    tracing::info!("BoardKit {} (built {})", VERSION, BUILD_DATE);

    let mut args = std::env::args().skip(1);
    let output = PathBuf::from(args.next().unwrap_or_else(|| "boardkit-demo.png".to_string()));
    let config = load_config(args.next().as_deref().map(Path::new))?;

    let surface = PixmapSurface::new(WIDTH, HEIGHT).context("allocating the drawing surface")?;
    let mut canvas = CanvasController::new(surface, config).context("invalid editor config")?;
    let registry = ToolbarRegistry::with_defaults();

    let title_style = TextStyle {
        size: 48.0,
        weight: FontWeight::Bold,
        ..TextStyle::default()
    };
    canvas.add_object(SceneObject::text(
        "BoardKit",
        title_style,
        Position::new(-220.0, -180.0),
    ));

    let mut note = SceneObject::text(
        "Drag me, spin me,\nflip me, crop me",
        TextStyle::default(),
        Position::new(-220.0, 60.0),
    );
    note.set_transform(Transform {
        rotation: -0.12,
        ..*note.transform()
    });
    canvas.add_object(note);

    let picture = canvas.add_object(SceneObject::image(
        ImageData::from_raster("gradient", gradient(320, 220)),
        Position::new(200.0, 40.0),
    ));

    // Select the picture the way a host would: click on it.
    let camera = *canvas.camera();
    let dpr = canvas.config().canvas.device_pixel_ratio;
    let center = camera.offset() + Position::new(200.0, 40.0) * camera.zoom;
    let click = RawPointerEvent::at(center.x / dpr, center.y / dpr).with_button(MouseButton::Left);
    canvas.mouse_down(&click);
    canvas.mouse_up(&click);

    if canvas.run_toolbar_action(&registry, "crop-circular") {
        canvas.key_down(&KeyEvent::new("Enter"));
    }
    if let Some(image) = canvas.object(picture).and_then(|o| o.as_image()) {
        let (w, h) = image.get_original_size();
        tracing::info!("Picture cropped to {}x{}", w, h);
    }
    canvas.run_toolbar_action(&registry, "flip");

    canvas.frame(16.0);
    canvas
        .surface()
        .save_png(&output)
        .with_context(|| format!("writing {}", output.display()))?;

    tracing::info!(
        "Rendered {} objects to {} ({} undoable edits)",
        canvas.objects().len(),
        output.display(),
        canvas.commands().undo_len()
    );
    canvas.destroy();
    Ok(())
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<EditorConfig> {
    if let Some(path) = explicit {
        return EditorConfig::load_from_file(path)
            .with_context(|| format!("loading config from {}", path.display()));
    }
    match EditorConfig::default_path() {
        Ok(path) if path.exists() => EditorConfig::load_from_file(&path)
            .with_context(|| format!("loading config from {}", path.display())),
        _ => Ok(EditorConfig::default()),
    }
}

fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let b = (y * 255 / height.max(1)) as u8;
        Rgba([r, 96, b, 255])
    })
}
