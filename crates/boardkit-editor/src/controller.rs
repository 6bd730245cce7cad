//! # Canvas Controller
//!
//! The editor's top-level object. It owns the scene, the camera and every
//! manager, turns host input into gestures and draws frames onto a
//! [`Surface`].
//!
//! ## Frame loop
//!
//! The host calls [`CanvasController::frame`] once per display frame with a
//! millisecond timestamp. A frame runs the due scheduler tasks, advances the
//! zoom animation, and renders when something changed since the last frame:
//!
//! ```text
//! clear -> camera transform -> viewport update -> grid -> visible objects
//!       -> debug overlay -> render / viewport:change / camera:change
//! ```
//!
//! ## Coordinates
//!
//! Raw pointer events arrive in CSS pixels relative to the page. They are
//! normalized to canvas pixels (`(client - rect) * dpr`) before anything
//! else sees them. The camera offset is in canvas pixels, so
//! `canvas = world * zoom + camera`.

use crate::commands::{CommandProcessor, DeleteCommand, EditorCommand, SelectCommand};
use crate::control_points::ControlPointManager;
use crate::coordinate_system::CoordinateSystem;
use crate::events::CanvasEvents;
use crate::grid::InfiniteGrid;
use crate::input::{
    buttons, CanvasRect, KeyEvent, MouseButton, PointerEvent, RawPointerEvent, RawWheelEvent,
};
use crate::interaction::{InteractionEnv, InteractionManager, MouseContext};
use crate::objects::{HitContext, RenderContext, SceneObject};
use crate::scene::Scene;
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::screen_space::ScreenSpaceSystem;
use crate::style::{ControlPointStyle, RenderStyle};
use crate::surface::{FontSpec, Surface};
use crate::toolbar::ToolbarRegistry;
use crate::transform_manager::{TransformLimits, TransformManager};
use crate::types::{Camera, ControlPointType, CursorStyle, ObjectId};
use crate::viewport::ViewportManager;
use boardkit_core::{shared, Position, Rgba, Shared, SubscriptionGroup};
use boardkit_settings::{ConfigError, EditorConfig};
use std::cell::Cell;
use std::rc::Rc;

/// Wheel sensitivity of the animated zoom path.
const ANIMATED_WHEEL_FACTOR: f64 = 0.007;
/// Wheel sensitivity of the immediate zoom path.
const IMMEDIATE_WHEEL_FACTOR: f64 = 0.001;
const ZOOM_DEBOUNCE_MS: f64 = 150.0;
/// Zoom changes smaller than this are dropped.
const MIN_ZOOM_STEP: f64 = 0.01;
const FPS_WINDOW_MS: f64 = 1000.0;
/// While a zoom animation runs, the grid is drawn on every n-th frame.
const ANIMATED_GRID_EVERY: u32 = 3;

/// Ease-in-out quadratic on `[0, 1]`.
pub fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// An in-flight animated zoom. Zoom and camera offset are interpolated
/// together so the point under the cursor stays put.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomAnimation {
    pub start_zoom: f64,
    pub target_zoom: f64,
    pub start_offset: Position,
    pub target_offset: Position,
    pub start_time: f64,
    pub duration: f64,
    /// World point kept under the cursor.
    pub anchor: Position,
}

impl ZoomAnimation {
    pub fn progress(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start_time) / self.duration).clamp(0.0, 1.0)
    }

    /// Zoom and camera offset at `now`.
    pub fn sample(&self, now: f64) -> (f64, Position) {
        let eased = ease_in_out(self.progress(now));
        let zoom = self.start_zoom + (self.target_zoom - self.start_zoom) * eased;
        let offset = self.start_offset + (self.target_offset - self.start_offset) * eased;
        (zoom, offset)
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingWheel {
    delta_y: f64,
    position: Position,
}

/// State of the immediate (non-animated) zoom path. Wheel events arriving
/// while a burst is in progress are coalesced to the latest one per frame.
#[derive(Debug, Default)]
struct ImmediateZoom {
    latest: Option<PendingWheel>,
    zooming: Rc<Cell<bool>>,
    debounce: Option<FrameHandle>,
}

#[derive(Debug, Default)]
struct FpsCounter {
    window_start: f64,
    frames: u32,
    fps: u32,
    total_frames: u32,
}

impl FpsCounter {
    fn tick(&mut self, now: f64) {
        self.frames += 1;
        self.total_frames = self.total_frames.wrapping_add(1);
        let elapsed = now - self.window_start;
        if elapsed >= FPS_WINDOW_MS {
            self.fps = (f64::from(self.frames) * 1000.0 / elapsed).round() as u32;
            self.frames = 0;
            self.window_start = now;
        }
    }
}

/// Fills in an [`InteractionEnv`] from disjoint controller fields so the
/// interaction manager can be borrowed alongside it.
macro_rules! interaction_env {
    ($c:expr) => {
        InteractionEnv {
            scene: &mut $c.scene,
            transform: &mut $c.transform,
            commands: &mut $c.commands,
            camera: &$c.camera,
            control_points: &$c.control_points,
            min_hit_size: $c.config.interaction.min_hit_size,
            scheduler: &$c.scheduler,
        }
    };
}

pub struct CanvasController<S: Surface> {
    surface: S,
    config: EditorConfig,
    style: RenderStyle,

    scene: Scene,
    commands: CommandProcessor,
    transform: TransformManager,
    interactions: InteractionManager,
    control_points: ControlPointManager,

    coordinates: CoordinateSystem,
    screen_space: ScreenSpaceSystem,
    viewport: ViewportManager,
    grid: InfiniteGrid,
    camera: Camera,
    rect: CanvasRect,

    scheduler: Shared<FrameScheduler>,
    events: CanvasEvents,
    subscriptions: SubscriptionGroup,

    dirty: Rc<Cell<bool>>,
    animate_zoom: bool,
    zoom_animation_duration: f64,
    zoom_animation: Option<ZoomAnimation>,
    immediate_zoom: ImmediateZoom,
    cached_visible: Option<Vec<ObjectId>>,
    fps: FpsCounter,
    cursor: CursorStyle,
    destroyed: bool,
}

impl<S: Surface> std::fmt::Debug for CanvasController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasController")
            .field("size", &(self.surface.width(), self.surface.height()))
            .field("camera", &self.camera)
            .field("objects", &self.scene.len())
            .field("selected", &self.scene.selected_id())
            .field("zoom_animation", &self.zoom_animation)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

impl<S: Surface> CanvasController<S> {
    /// Build a controller drawing onto `surface`. The surface size is taken
    /// as the canvas size in canvas pixels; the camera starts centered.
    pub fn new(surface: S, config: EditorConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let canvas = &config.canvas;
        let dpr = canvas.device_pixel_ratio;
        let style = RenderStyle::from(&config);
        let width = f64::from(surface.width());
        let height = f64::from(surface.height());

        let scheduler = shared(FrameScheduler::new());
        let dirty = Rc::new(Cell::new(true));

        let mut transform = TransformManager::new(TransformLimits::from(&config.interaction));
        transform.set_scheduler(&scheduler);
        {
            let dirty = Rc::clone(&dirty);
            transform.set_callbacks(Some(Rc::new(move || dirty.set(true))), None);
        }

        let mut viewport = ViewportManager::new(canvas.culling_margin);
        viewport.set_device_pixel_ratio(dpr);

        let scene = Scene::new();
        let events = CanvasEvents::new();
        let mut subscriptions = SubscriptionGroup::new();
        {
            let selection_change = events.selection_change.clone();
            subscriptions.add(scene.on_selection_change(move |id| selection_change.emit(id)));
        }

        let controller = Self {
            camera: Camera::new(width / 2.0, height / 2.0, canvas.initial_zoom),
            rect: CanvasRect::new(0.0, 0.0, width / dpr, height / dpr),
            coordinates: CoordinateSystem::with_device_pixel_ratio(dpr),
            screen_space: ScreenSpaceSystem::with_device_pixel_ratio(dpr),
            grid: InfiniteGrid::new(canvas.grid_size, style.grid.clone()),
            control_points: ControlPointManager::new(ControlPointStyle::from(
                &config.style.control_point,
            )),
            commands: CommandProcessor::new(config.interaction.max_undo_stack_size)
                .with_debug(canvas.debug),
            interactions: InteractionManager::with_default_handlers(),
            animate_zoom: canvas.animate_zoom,
            zoom_animation_duration: canvas.zoom_animation_duration_ms as f64,
            surface,
            style,
            scene,
            transform,
            viewport,
            scheduler,
            events,
            subscriptions,
            dirty,
            zoom_animation: None,
            immediate_zoom: ImmediateZoom::default(),
            cached_visible: None,
            fps: FpsCounter::default(),
            cursor: CursorStyle::Default,
            destroyed: false,
            config,
        };
        tracing::debug!(
            "Canvas controller created ({}x{} px, dpr {})",
            width,
            height,
            dpr
        );
        Ok(controller)
    }

    // Accessors

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn events(&self) -> &CanvasEvents {
        &self.events
    }

    pub fn scheduler(&self) -> &Shared<FrameScheduler> {
        &self.scheduler
    }

    pub fn commands(&self) -> &CommandProcessor {
        &self.commands
    }

    pub fn interactions(&self) -> &InteractionManager {
        &self.interactions
    }

    pub fn transform_manager(&self) -> &TransformManager {
        &self.transform
    }

    pub fn viewport(&self) -> &ViewportManager {
        &self.viewport
    }

    pub fn zoom_animation(&self) -> Option<&ZoomAnimation> {
        self.zoom_animation.as_ref()
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps
    }

    pub fn cursor_style(&self) -> CursorStyle {
        self.cursor
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Ask for a render on the next frame.
    pub fn request_render(&self) {
        self.dirty.set(true);
    }

    pub fn needs_render(&self) -> bool {
        self.dirty.get()
            || self.zoom_animation.is_some()
            || self.immediate_zoom.zooming.get()
            || self.config.canvas.debug
            || self
                .scene
                .objects()
                .iter()
                .any(|o| o.as_text().is_some_and(|t| t.is_editing()))
    }

    // Frame loop

    /// Advance one display frame. Returns true when the frame was drawn.
    pub fn frame(&mut self, now: f64) -> bool {
        if self.destroyed {
            return false;
        }
        FrameScheduler::run_frame(&self.scheduler, now);

        if self.immediate_zoom.latest.is_some() {
            self.process_immediate_zoom();
        }
        self.step_zoom_animation(now);

        if !self.needs_render() {
            return false;
        }
        self.render(now);
        true
    }

    fn step_zoom_animation(&mut self, now: f64) {
        let Some(animation) = self.zoom_animation else {
            return;
        };
        let (zoom, offset) = animation.sample(now);
        self.camera.zoom = zoom;
        self.camera.x = offset.x;
        self.camera.y = offset.y;

        if animation.progress(now) >= 1.0 {
            self.zoom_animation = None;
            self.cached_visible = None;
            self.dirty.set(true);
            tracing::trace!("Zoom animation finished at {:.3}", zoom);
            self.events.zoom_change.emit(&zoom);
        }
    }

    /// Draw the scene now.
    pub fn render(&mut self, now: f64) {
        if self.destroyed {
            return;
        }
        self.fps.tick(now);

        let dpr = self.coordinates.device_pixel_ratio();
        let camera = self.camera;
        let animating = self.zoom_animation.is_some();

        self.surface.reset_transform();
        self.surface.clear(self.style.background);
        self.surface.save();
        self.surface.translate(camera.x, camera.y);
        self.surface.scale(camera.zoom, camera.zoom);

        let bounds = self.viewport.update_viewport(
            &camera,
            f64::from(self.surface.width()) / dpr,
            f64::from(self.surface.height()) / dpr,
        );

        if !animating || self.fps.total_frames % ANIMATED_GRID_EVERY == 0 {
            self.grid.render(&mut self.surface, &camera, &bounds);
        }

        let visible: Vec<ObjectId> = match (&self.cached_visible, animating) {
            (Some(cached), true) => cached.clone(),
            _ => self
                .viewport
                .get_visible_objects(self.scene.objects())
                .iter()
                .map(|o| o.id())
                .collect(),
        };

        let ctx = RenderContext {
            camera: &camera,
            control_points: &self.control_points,
            style: &self.style,
        };
        for id in &visible {
            if let Some(object) = self.scene.get(*id) {
                object.render(&mut self.surface, &ctx);
            }
        }
        self.surface.restore();

        if self.config.canvas.debug {
            self.render_debug_info();
        }
        self.dirty.set(false);

        self.events.render.emit(&());
        self.events.viewport_change.emit(&bounds);
        self.events.camera_change.emit(&camera);
    }

    fn render_debug_info(&mut self) {
        let dpr = self.coordinates.device_pixel_ratio();
        let font = FontSpec {
            family: "monospace".to_string(),
            size: 12.0 * dpr,
            bold: false,
            italic: false,
        };
        let color = Rgba::new(0xff, 0xff, 0xff, 0x80);
        let lines = [
            format!("FPS: {}", self.fps.fps),
            format!("Zoom: {:.2}", self.camera.zoom),
            format!("Objects: {}", self.scene.len()),
            format!("Selected: {}", self.scene.get_selected_objects().len()),
            format!("Camera: ({:.2}, {:.2})", self.camera.x, self.camera.y),
        ];

        self.surface.save();
        self.surface.reset_transform();
        for (i, line) in lines.iter().enumerate() {
            let origin = Position::new(10.0 * dpr, (8.0 + 20.0 * i as f64) * dpr);
            self.surface.fill_text(line, origin, &font, color);
        }
        self.surface.restore();
    }

    // Objects

    fn emit_objects_change(&mut self) {
        self.dirty.set(true);
        let ids = self.scene.ids();
        self.events.objects_change.emit(&ids);
    }

    /// Add an object on top without recording it in the undo history.
    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        let id = self.scene.add(object);
        self.emit_objects_change();
        id
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Option<SceneObject> {
        if self.transform.target_id() == Some(id) {
            self.transform.end_drag();
        }
        let removed = self.scene.remove(id).map(|(_, object)| object);
        if removed.is_some() {
            self.emit_objects_change();
        } else {
            tracing::debug!("Remove ignored; object {} not in scene", id);
        }
        removed
    }

    /// Replace the whole object list.
    pub fn set_objects(&mut self, objects: Vec<SceneObject>) {
        self.transform.end_drag();
        self.scene.set_objects(objects);
        self.cached_visible = None;
        self.emit_objects_change();
    }

    pub fn objects(&self) -> &[SceneObject] {
        self.scene.objects()
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.scene.get(id)
    }

    /// Mutate an object outside the undo history.
    pub fn with_object_mut<R>(&mut self, id: ObjectId, f: impl FnOnce(&mut SceneObject) -> R) -> Option<R> {
        let result = self.scene.get_mut(id).map(f);
        if result.is_some() {
            self.dirty.set(true);
        }
        result
    }

    pub fn clear(&mut self) {
        self.transform.end_drag();
        self.scene.clear();
        self.cached_visible = None;
        self.emit_objects_change();
    }

    /// Topmost object under a canvas-pixel point.
    pub fn get_object_at_point(&self, point: Position) -> Option<ObjectId> {
        self.scene.get_object_at_point(point, &self.hit_context())
    }

    fn hit_context(&self) -> HitContext<'_> {
        HitContext {
            camera: &self.camera,
            control_points: &self.control_points,
            min_hit_size: self.config.interaction.min_hit_size,
        }
    }

    /// Topmost visible object under `position` and the control point hit on
    /// it. Before the first frame every object counts as visible.
    fn hit_test(&self, position: Position) -> (Option<ObjectId>, ControlPointType) {
        let ctx = self.hit_context();
        let candidates: Vec<&SceneObject> = if self.viewport.bounds().is_some() {
            self.viewport.get_visible_objects(self.scene.objects())
        } else {
            self.scene.objects().iter().collect()
        };
        match candidates
            .into_iter()
            .rev()
            .find(|o| o.contains_point(position, &ctx))
        {
            Some(object) => {
                let control_point = if object.is_selected() {
                    object.get_control_point_at_position(position, &ctx)
                } else {
                    ControlPointType::None
                };
                (Some(object.id()), control_point)
            }
            None => (None, ControlPointType::None),
        }
    }

    // Commands

    pub fn execute(&mut self, command: impl Into<EditorCommand>) {
        self.commands.execute(command, &mut self.scene);
        self.emit_objects_change();
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.commands.undo(&mut self.scene);
        if undone {
            self.emit_objects_change();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.commands.redo(&mut self.scene);
        if redone {
            self.emit_objects_change();
        }
        redone
    }

    pub fn can_undo(&self) -> bool {
        self.commands.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.commands.can_redo()
    }

    /// Run a toolbar action on the selected object and record the command
    /// it returns. Returns false when nothing is selected or the action does
    /// not apply.
    pub fn run_toolbar_action(&mut self, registry: &ToolbarRegistry, action_id: &str) -> bool {
        let Some(object) = self.scene.selected_mut() else {
            return false;
        };
        let Some(outcome) = registry.run_object_action(action_id, object) else {
            return false;
        };
        if let Some(command) = outcome {
            self.execute(command);
        }
        self.dirty.set(true);
        true
    }

    /// Run a global toolbar action (one that does not need a selection). The
    /// action receives the world point at the center of the view.
    pub fn run_global_action(&mut self, registry: &ToolbarRegistry, action_id: &str) -> bool {
        let center = self.canvas_to_world(Position::new(
            f64::from(self.surface.width()) / 2.0,
            f64::from(self.surface.height()) / 2.0,
        ));
        let Some(outcome) = registry.run_global_action(action_id, center) else {
            return false;
        };
        if let Some(command) = outcome {
            self.execute(command);
        }
        true
    }

    // Camera

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        let canvas = &self.config.canvas;
        if !zoom.is_finite() {
            return self.camera.zoom;
        }
        zoom.clamp(canvas.min_zoom, canvas.max_zoom)
    }

    pub fn zoom_to(&mut self, level: f64) {
        self.camera.zoom = self.clamp_zoom(level);
        self.dirty.set(true);
        self.events.zoom_change.emit(&self.camera.zoom);
    }

    /// Move the camera offset to `(x, y)` canvas pixels.
    pub fn pan_to(&mut self, x: f64, y: f64) {
        self.camera.x = x;
        self.camera.y = y;
        self.dirty.set(true);
        self.events.camera_change.emit(&self.camera);
    }

    pub fn set_zoom_animation(&mut self, enabled: bool) {
        if !enabled {
            if let Some(animation) = self.zoom_animation.take() {
                self.camera.zoom = animation.target_zoom;
                self.camera.x = animation.target_offset.x;
                self.camera.y = animation.target_offset.y;
                self.cached_visible = None;
                self.dirty.set(true);
                self.events.zoom_change.emit(&animation.target_zoom);
            }
        }
        self.animate_zoom = enabled;
    }

    /// Non-positive durations are ignored.
    pub fn set_zoom_animation_duration(&mut self, duration_ms: f64) {
        if duration_ms > 0.0 {
            self.zoom_animation_duration = duration_ms;
        } else {
            tracing::warn!("Ignoring zoom animation duration {}", duration_ms);
        }
    }

    fn canvas_to_world(&self, position: Position) -> Position {
        self.coordinates
            .screen_to_world(self.screen_space.canvas_to_screen(position), &self.camera)
    }

    /// Camera offset that keeps `world` fixed on screen when zooming to
    /// `zoom`.
    fn anchored_offset(&self, world: Position, zoom: f64) -> Position {
        Position::new(
            self.camera.x + world.x * (self.camera.zoom - zoom),
            self.camera.y + world.y * (self.camera.zoom - zoom),
        )
    }

    pub fn wheel(&mut self, event: &RawWheelEvent) {
        if self.destroyed || self.zoom_animation.is_some() {
            return;
        }
        let position = self.normalize(event.client_x, event.client_y);

        if !self.animate_zoom {
            self.immediate_zoom.latest = Some(PendingWheel {
                delta_y: event.delta_y,
                position,
            });
            if !self.immediate_zoom.zooming.get() {
                self.process_immediate_zoom();
            }
            return;
        }

        let target_zoom = self.clamp_zoom(self.camera.zoom * (-event.delta_y * ANIMATED_WHEEL_FACTOR).exp());
        if (target_zoom - self.camera.zoom).abs() < MIN_ZOOM_STEP {
            return;
        }
        let anchor = self.canvas_to_world(position);
        let animation = ZoomAnimation {
            start_zoom: self.camera.zoom,
            target_zoom,
            start_offset: self.camera.offset(),
            target_offset: self.anchored_offset(anchor, target_zoom),
            start_time: self.scheduler.borrow().now(),
            duration: self.zoom_animation_duration,
            anchor,
        };
        self.cached_visible = Some(
            self.viewport
                .get_visible_objects(self.scene.objects())
                .iter()
                .map(|o| o.id())
                .collect(),
        );
        tracing::trace!(
            "Zoom animation {:.3} -> {:.3}",
            animation.start_zoom,
            animation.target_zoom
        );
        self.zoom_animation = Some(animation);
    }

    fn process_immediate_zoom(&mut self) {
        let Some(wheel) = self.immediate_zoom.latest.take() else {
            return;
        };
        let new_zoom = self.clamp_zoom(self.camera.zoom * (-wheel.delta_y * IMMEDIATE_WHEEL_FACTOR).exp());
        if (new_zoom - self.camera.zoom).abs() >= MIN_ZOOM_STEP {
            let world = self.canvas_to_world(wheel.position);
            let offset = self.anchored_offset(world, new_zoom);
            self.camera.x = offset.x;
            self.camera.y = offset.y;
            self.camera.zoom = new_zoom;
            self.dirty.set(true);
            self.events.zoom_change.emit(&new_zoom);
        }

        self.immediate_zoom.zooming.set(true);
        let mut scheduler = self.scheduler.borrow_mut();
        if let Some(handle) = self.immediate_zoom.debounce.take() {
            scheduler.cancel(handle);
        }
        let zooming = Rc::clone(&self.immediate_zoom.zooming);
        self.immediate_zoom.debounce =
            Some(scheduler.request_after(ZOOM_DEBOUNCE_MS, move |_| zooming.set(false)));
    }

    // Sizing

    /// The canvas moved or changed size. `rect` is in CSS pixels; the
    /// surface is reallocated at `rect * dpr`.
    pub fn resize(&mut self, rect: CanvasRect) {
        let dpr = self.coordinates.device_pixel_ratio();
        let width = (rect.width * dpr).round().max(1.0) as u32;
        let height = (rect.height * dpr).round().max(1.0) as u32;
        self.rect = rect;
        if (width, height) != (self.surface.width(), self.surface.height()) {
            self.surface.resize(width, height);
        }
        self.dirty.set(true);
        tracing::debug!("Canvas resized to {}x{} px", width, height);
    }

    pub fn set_device_pixel_ratio(&mut self, dpr: f64) {
        if !(dpr.is_finite() && dpr > 0.0) {
            tracing::warn!("Ignoring invalid device pixel ratio {}", dpr);
            return;
        }
        self.coordinates.set_device_pixel_ratio(dpr);
        self.screen_space.set_device_pixel_ratio(dpr);
        self.viewport.set_device_pixel_ratio(dpr);
        self.resize(self.rect);
    }

    // Input

    /// Client (CSS) coordinates to canvas pixels.
    pub fn normalize(&self, client_x: f64, client_y: f64) -> Position {
        self.screen_space.screen_to_canvas(Position::new(
            client_x - self.rect.left,
            client_y - self.rect.top,
        ))
    }

    fn pointer_event(&self, raw: &RawPointerEvent) -> PointerEvent {
        PointerEvent {
            position: self.normalize(raw.client_x, raw.client_y),
            button: raw.button,
            buttons: raw.buttons,
            modifiers: raw.modifiers,
        }
    }

    fn mouse_context(&self, event: PointerEvent) -> MouseContext {
        let (object, control_point) = self.hit_test(event.position);
        MouseContext {
            position: event.position,
            object,
            control_point,
            event,
        }
    }

    fn starts_pan(event: &PointerEvent) -> bool {
        event.button == MouseButton::Right
            || event.buttons == buttons::SECONDARY
            || (event.buttons == buttons::PRIMARY && event.modifiers.alt)
    }

    pub fn mouse_down(&mut self, raw: &RawPointerEvent) {
        if self.destroyed {
            return;
        }
        let event = self.pointer_event(raw);
        self.dirty.set(true);

        if Self::starts_pan(&event) {
            self.camera.is_dragging = true;
            self.camera.last_mouse_position = Some(event.position);
            self.cursor = CursorStyle::Grabbing;
            return;
        }

        let ctx = self.mouse_context(event);
        let mut env = interaction_env!(self);
        self.interactions.handle_mouse_down(&ctx, &mut env);

        if ctx.object.is_none() && self.scene.selected_id().is_some() {
            self.commands.execute(SelectCommand::new(None), &mut self.scene);
        }
        self.update_cursor(&ctx);
    }

    pub fn mouse_move(&mut self, raw: &RawPointerEvent) {
        if self.destroyed {
            return;
        }
        let event = self.pointer_event(raw);

        if self.camera.is_dragging {
            if let Some(last) = self.camera.last_mouse_position {
                let delta = event.position - last;
                self.camera.x += delta.x;
                self.camera.y += delta.y;
                self.camera.last_mouse_position = Some(event.position);
                self.dirty.set(true);
                self.events.camera_change.emit(&self.camera);
            }
            return;
        }

        let ctx = self.mouse_context(event);
        let mut env = interaction_env!(self);
        let result = self.interactions.handle_mouse_move(&ctx, &mut env);
        if result.handled {
            self.dirty.set(true);
        }
        self.update_cursor(&ctx);
    }

    pub fn mouse_up(&mut self, raw: &RawPointerEvent) {
        if self.destroyed {
            return;
        }
        let event = self.pointer_event(raw);

        if self.camera.is_dragging {
            self.camera.is_dragging = false;
            self.camera.last_mouse_position = None;
            self.cursor = CursorStyle::Default;
            return;
        }

        let ctx = self.mouse_context(event);
        let mut env = interaction_env!(self);
        self.interactions.handle_mouse_up(&ctx, &mut env);
        self.dirty.set(true);
        self.update_cursor(&ctx);
    }

    pub fn double_click(&mut self, raw: &RawPointerEvent) {
        if self.destroyed {
            return;
        }
        let event = self.pointer_event(raw);
        let ctx = self.mouse_context(event);
        let mut env = interaction_env!(self);
        self.interactions.handle_double_click(&ctx, &mut env);
        self.dirty.set(true);
    }

    /// Returns true when the key was used.
    pub fn key_down(&mut self, event: &KeyEvent) -> bool {
        if self.destroyed {
            return false;
        }
        let object = self.scene.selected_id();
        let mut env = interaction_env!(self);
        if self.interactions.handle_key_down(event, object, &mut env) {
            self.dirty.set(true);
            return true;
        }
        self.handle_shortcut(event, object)
    }

    pub fn key_up(&mut self, event: &KeyEvent) -> bool {
        if self.destroyed {
            return false;
        }
        let object = self.scene.selected_id();
        let mut env = interaction_env!(self);
        self.interactions.handle_key_up(event, object, &mut env)
    }

    /// Editor-wide shortcuts: undo, redo and delete.
    fn handle_shortcut(&mut self, event: &KeyEvent, selected: Option<ObjectId>) -> bool {
        let command = event.modifiers.command();
        let key = event.key.to_ascii_lowercase();
        match key.as_str() {
            "z" if command && event.modifiers.shift => self.redo(),
            "z" if command => self.undo(),
            "y" if command => self.redo(),
            "delete" | "backspace" => {
                let Some(id) = selected else {
                    return false;
                };
                match DeleteCommand::new(&self.scene, id) {
                    Ok(delete) => {
                        self.execute(delete);
                        true
                    }
                    Err(e) => {
                        tracing::warn!("Delete failed: {}", e);
                        false
                    }
                }
            }
            _ => false,
        }
    }

    fn update_cursor(&mut self, ctx: &MouseContext) {
        self.cursor = if self.transform.is_dragging() {
            self.control_points
                .get_cursor_style(self.transform.active_control_point())
        } else {
            self.interactions
                .get_cursor_style(ctx.object.and_then(|id| self.scene.get(id)), ctx.control_point)
        };
    }

    // Teardown

    /// Stop everything: pending frames and timers, gestures, handlers and
    /// subscriptions. The object list is cleared. Further calls are no-ops.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.zoom_animation = None;
        self.immediate_zoom.latest = None;
        self.immediate_zoom.debounce = None;
        self.immediate_zoom.zooming.set(false);

        let mut env = interaction_env!(self);
        self.interactions.destroy(&mut env);
        self.transform.destroy();
        self.scheduler.borrow_mut().cancel_all();
        self.subscriptions.abort();

        self.clear();
        self.events.clear_all();
        self.destroyed = true;
        tracing::debug!("Canvas controller destroyed");
    }
}
