//! Drag gestures that move, rotate, scale and flip one object.
//!
//! The manager is a two-state machine, idle or dragging one control point of
//! one object. Every gesture computes a fresh [`Transform`] from the
//! snapshot taken at [`TransformManager::start_drag`] and hands it to
//! [`SceneObject::set_transform`]; nothing reaches into the object's fields.
//!
//! Scale and rotation are measured in canvas pixels around the object's
//! on-screen center, so handle feel does not depend on the camera zoom.

use crate::coordinate_system::CoordinateSystem;
use crate::objects::SceneObject;
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::screen_space::ScreenSpaceSystem;
use crate::types::{normalize_angle, Camera, ControlPointType, ObjectId, Scale, Transform};
use boardkit_core::{Callback, DataCallback, Position, Shared};
use boardkit_settings::InteractionSettings;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Below this, reference distances are treated as zero.
const MIN_REFERENCE: f64 = 1e-6;

/// Tuning of the transform gestures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformLimits {
    pub rotation_smoothing: f64,
    pub scale_smoothing: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub flip_tolerance: f64,
}

impl Default for TransformLimits {
    fn default() -> Self {
        Self::from(&InteractionSettings::default())
    }
}

impl From<&InteractionSettings> for TransformLimits {
    fn from(settings: &InteractionSettings) -> Self {
        Self {
            rotation_smoothing: settings.rotation_smoothing,
            scale_smoothing: settings.scale_smoothing,
            min_scale: settings.min_scale,
            max_scale: settings.max_scale,
            flip_tolerance: settings.flip_tolerance,
        }
    }
}

impl TransformLimits {
    /// Clamp one scale component into `[min_scale, max_scale]`.
    pub fn clamp_scale(&self, value: f64) -> f64 {
        soft_clamp(value, self.min_scale, self.max_scale, self.scale_smoothing)
    }
}

/// Per-gesture state, reset to its default when the drag ends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    pub is_dragging: bool,
    pub active_control_point: ControlPointType,
    pub initial_transform: Option<Transform>,
    pub initial_angle: f64,
    pub initial_distance: f64,
    pub last_mouse_position: Option<Position>,
}

/// What a finished drag reports to the `on_transform_end` hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformEnd {
    pub object_id: ObjectId,
    pub initial_transform: Transform,
    pub control_point: ControlPointType,
}

pub struct TransformManager {
    state: InteractionState,
    target: Option<ObjectId>,
    center: Position,
    initial_axes: Position,
    limits: TransformLimits,
    coordinates: CoordinateSystem,
    screen_space: ScreenSpaceSystem,
    scheduler: Option<Weak<RefCell<FrameScheduler>>>,
    pending_render: Rc<Cell<Option<FrameHandle>>>,
    on_render: Option<Callback>,
    on_transform_end: Option<DataCallback<TransformEnd>>,
}

impl std::fmt::Debug for TransformManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformManager")
            .field("state", &self.state)
            .field("target", &self.target)
            .field("limits", &self.limits)
            .field("pending_render", &self.pending_render.get())
            .finish()
    }
}

impl Default for TransformManager {
    fn default() -> Self {
        Self::new(TransformLimits::default())
    }
}

impl TransformManager {
    pub fn new(limits: TransformLimits) -> Self {
        Self {
            state: InteractionState::default(),
            target: None,
            center: Position::ORIGIN,
            initial_axes: Position::ORIGIN,
            limits,
            coordinates: CoordinateSystem::new(),
            screen_space: ScreenSpaceSystem::new(),
            scheduler: None,
            pending_render: Rc::new(Cell::new(None)),
            on_render: None,
            on_transform_end: None,
        }
    }

    pub fn limits(&self) -> &TransformLimits {
        &self.limits
    }

    pub fn set_limits(&mut self, limits: TransformLimits) {
        self.limits = limits;
    }

    /// Renders requested during a drag are coalesced through this scheduler.
    /// Without one they run synchronously.
    pub fn set_scheduler(&mut self, scheduler: &Shared<FrameScheduler>) {
        self.scheduler = Some(Rc::downgrade(scheduler));
    }

    pub fn set_callbacks(
        &mut self,
        on_render: Option<Callback>,
        on_transform_end: Option<DataCallback<TransformEnd>>,
    ) {
        self.on_render = on_render;
        self.on_transform_end = on_transform_end;
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging
    }

    pub fn active_control_point(&self) -> ControlPointType {
        self.state.active_control_point
    }

    pub fn target_id(&self) -> Option<ObjectId> {
        self.target
    }

    /// Begin a gesture on `object`. `screen_pos` is in canvas pixels.
    ///
    /// A drag still in progress is abandoned without reporting its end.
    pub fn start_drag(
        &mut self,
        object: &SceneObject,
        screen_pos: Position,
        control_point: ControlPointType,
        camera: &Camera,
    ) {
        if self.state.is_dragging {
            tracing::warn!(
                "start_drag while dragging {:?}; discarding the previous gesture",
                self.target
            );
        }

        let transform = *object.transform();
        let center = object.screen_center(camera);
        self.center = center;
        self.initial_axes = Position::ORIGIN;
        self.state = InteractionState {
            is_dragging: true,
            active_control_point: control_point,
            initial_transform: Some(transform),
            initial_angle: 0.0,
            initial_distance: 0.0,
            last_mouse_position: Some(screen_pos),
        };

        match control_point {
            ControlPointType::Rotation => {
                self.state.initial_angle = self.screen_space.get_screen_angle(center, screen_pos);
            }
            cp if cp.is_corner() => {
                self.state.initial_distance = self.screen_space.get_screen_distance(center, screen_pos);
            }
            cp if cp.is_edge() => {
                self.initial_axes = to_object_axes(screen_pos - center, transform.rotation);
            }
            _ => {}
        }

        self.target = Some(object.id());
        tracing::debug!("Drag started on {} with {:?}", object.id(), control_point);
    }

    /// Apply the pointer's new position to `object`.
    ///
    /// Returns false without touching the object when no drag is active or
    /// the drag belongs to another object.
    pub fn drag(&mut self, object: &mut SceneObject, screen_pos: Position, camera: &Camera) -> bool {
        let (Some(initial), Some(last)) = (
            self.state.initial_transform,
            self.state.last_mouse_position,
        ) else {
            tracing::debug!("drag without start_drag ignored");
            return false;
        };
        if !self.state.is_dragging || self.target != Some(object.id()) {
            tracing::debug!("drag for {} ignored", object.id());
            return false;
        }

        let current = *object.transform();
        let next = match self.state.active_control_point {
            ControlPointType::None => self.move_by(current, last, screen_pos, camera),
            ControlPointType::Rotation => self.rotate(current, initial, screen_pos),
            cp if cp.is_corner() => self.scale_uniform(current, initial, screen_pos),
            cp => self.scale_axis(cp, current, initial, last, screen_pos),
        };

        object.set_transform(next);
        self.state.last_mouse_position = Some(screen_pos);
        self.request_render();
        true
    }

    /// Finish the gesture. Reports it to the `on_transform_end` hook, then
    /// renders once more.
    pub fn end_drag(&mut self) -> Option<TransformEnd> {
        if !self.state.is_dragging {
            return None;
        }
        let end = match (self.target, self.state.initial_transform) {
            (Some(object_id), Some(initial_transform)) => Some(TransformEnd {
                object_id,
                initial_transform,
                control_point: self.state.active_control_point,
            }),
            _ => None,
        };

        self.state = InteractionState::default();
        self.target = None;
        self.cancel_pending_render();

        if let (Some(end), Some(hook)) = (end, &self.on_transform_end) {
            hook(end);
        }
        if let Some(render) = &self.on_render {
            render();
        }
        end
    }

    /// Drop the gesture, pending render and callbacks.
    pub fn destroy(&mut self) {
        self.state = InteractionState::default();
        self.target = None;
        self.cancel_pending_render();
        self.on_render = None;
        self.on_transform_end = None;
    }

    fn move_by(&self, current: Transform, last: Position, screen_pos: Position, camera: &Camera) -> Transform {
        let delta = self.coordinates.screen_to_world(screen_pos, camera)
            - self.coordinates.screen_to_world(last, camera);
        Transform {
            position: current.position + delta,
            ..current
        }
    }

    fn rotate(&self, current: Transform, initial: Transform, screen_pos: Position) -> Transform {
        let angle = self.screen_space.get_screen_angle(self.center, screen_pos);
        let delta = normalize_angle(angle - self.state.initial_angle);
        Transform {
            rotation: normalize_angle(initial.rotation + delta * self.limits.rotation_smoothing),
            ..current
        }
    }

    fn scale_uniform(&self, current: Transform, initial: Transform, screen_pos: Position) -> Transform {
        let distance = self.screen_space.get_screen_distance(self.center, screen_pos);
        let factor = ratio(distance, self.state.initial_distance);
        Transform {
            scale: Scale::new(
                self.limits.clamp_scale(initial.scale.x * factor),
                self.limits.clamp_scale(initial.scale.y * factor),
            ),
            ..current
        }
    }

    fn scale_axis(
        &self,
        control_point: ControlPointType,
        current: Transform,
        initial: Transform,
        last: Position,
        screen_pos: Position,
    ) -> Transform {
        let axes = to_object_axes(screen_pos - self.center, initial.rotation);

        if !control_point.is_horizontal_edge() {
            let factor = ratio(axes.y.abs(), self.initial_axes.y.abs());
            return Transform {
                scale: Scale::new(current.scale.x, self.limits.clamp_scale(initial.scale.y * factor)),
                ..current
            };
        }

        let factor = ratio(axes.x.abs(), self.initial_axes.x.abs());
        let previous = to_object_axes(last - self.center, initial.rotation);
        let crossed = previous.x * axes.x < 0.0
            && (axes.x - previous.x).abs() > self.limits.flip_tolerance;
        if crossed {
            tracing::debug!("Pointer crossed the center line; toggling flip");
        }

        Transform {
            scale: Scale::new(self.limits.clamp_scale(initial.scale.x * factor), current.scale.y),
            is_flipped: current.is_flipped ^ crossed,
            ..current
        }
    }

    fn request_render(&mut self) {
        let Some(render) = self.on_render.clone() else {
            return;
        };
        let Some(scheduler) = self.scheduler.as_ref().and_then(Weak::upgrade) else {
            render();
            return;
        };

        let mut scheduler = scheduler.borrow_mut();
        if let Some(handle) = self.pending_render.take() {
            scheduler.cancel(handle);
        }
        let pending = Rc::clone(&self.pending_render);
        let handle = scheduler.request_frame(move |_| {
            pending.set(None);
            render();
        });
        self.pending_render.set(Some(handle));
    }

    fn cancel_pending_render(&mut self) {
        let Some(handle) = self.pending_render.take() else {
            return;
        };
        if let Some(scheduler) = self.scheduler.as_ref().and_then(Weak::upgrade) {
            scheduler.borrow_mut().cancel(handle);
        }
    }
}

/// Express a screen vector in the object's rotated axes.
fn to_object_axes(v: Position, rotation: f64) -> Position {
    let (sin, cos) = (-rotation).sin_cos();
    Position::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// `value / reference`, or 1 when the reference is degenerate.
fn ratio(value: f64, reference: f64) -> f64 {
    if reference.abs() < MIN_REFERENCE {
        return 1.0;
    }
    let r = value / reference;
    if r.is_finite() {
        r
    } else {
        1.0
    }
}

/// Clamp `value` into `[lo, hi]`, easing into the limits instead of
/// stopping dead at them.
///
/// Inside a band of width `smoothing * (hi - lo)` next to each limit the
/// overshoot `t` maps to `t - t^2 / 4b`, which meets the limit with zero
/// slope at `t = 2b`. The result is continuous and monotone in `value`.
/// Non-finite input yields the neutral scale 1, clamped.
pub fn soft_clamp(value: f64, lo: f64, hi: f64, smoothing: f64) -> f64 {
    if !value.is_finite() {
        return 1.0_f64.clamp(lo, hi);
    }
    let band = (smoothing * (hi - lo)).min((hi - lo) / 2.0);
    if band <= 0.0 {
        return value.clamp(lo, hi);
    }

    let ease = |t: f64| {
        if t >= 2.0 * band {
            band
        } else {
            t - t * t / (4.0 * band)
        }
    };

    let upper = hi - band;
    let lower = lo + band;
    if value > upper {
        upper + ease(value - upper)
    } else if value < lower {
        lower - ease(lower - value)
    } else {
        value
    }
}
