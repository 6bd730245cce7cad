//! # BoardKit
//!
//! An infinite-canvas scene editor core: text and image objects that can be
//! selected, moved, scaled, rotated, flipped, edited in place and cropped,
//! with bounded undo/redo and on-demand rendering.
//!
//! ## Architecture
//!
//! BoardKit is organized as a workspace with multiple crates:
//!
//! 1. **boardkit-core** - Geometry, errors, shared-state aliases and event channels
//! 2. **boardkit-settings** - Editor configuration with JSON/TOML persistence
//! 3. **boardkit-editor** - Scene, interaction, commands and rendering
//! 4. **boardkit** - Re-exports plus a headless demo binary

pub use boardkit_core::{
    Bounds, EditorError, Error, EventChannel, Position, Result, Rgba, Subscription,
    SubscriptionGroup, ViewportBounds,
};

pub use boardkit_settings::{ConfigError, EditorConfig, SettingsError};

pub use boardkit_editor as editor;
pub use boardkit_editor::{
    CanvasController, CanvasEvents, CropMode, ImageData, KeyEvent, PixmapSurface,
    RawPointerEvent, RawWheelEvent, RecordingSurface, SceneObject, TextStyle, ToolbarRegistry,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
