use super::{HandlerResult, InteractionEnv, InteractionHandler, MouseContext};
use crate::commands::CropCommand;
use crate::input::{KeyCombo, KeyEvent};
use crate::objects::SceneObject;
use crate::screen_space::ScreenSpaceSystem;
use crate::types::ObjectId;
use boardkit_core::Position;

/// Drives an image's crop session: drag handles or the crop area, Enter to
/// apply, Escape to cancel.
#[derive(Debug)]
pub struct CropInteraction {
    enabled: bool,
    shortcuts: Vec<KeyCombo>,
    /// Image whose crop handle is being dragged.
    dragging: Option<ObjectId>,
}

impl Default for CropInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl CropInteraction {
    pub fn new() -> Self {
        Self {
            enabled: true,
            shortcuts: vec![KeyCombo::new("Enter"), KeyCombo::new("Escape")],
            dragging: None,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn image_pixel(object: &SceneObject, position: Position, env: &InteractionEnv<'_>) -> Position {
        let local = ScreenSpaceSystem::new().screen_to_local_space(position, object.transform(), env.camera);
        object.local_to_image_pixel(local)
    }

    fn apply(&mut self, id: ObjectId, env: &mut InteractionEnv<'_>) -> bool {
        let Some(image) = env.scene.get_mut(id).and_then(|o| o.as_image_mut()) else {
            return false;
        };
        let result = match image.finish_crop() {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Crop could not be finished: {}", e);
                return false;
            }
        };
        let command = env.scene.get(id).map(|o| CropCommand::new(o, result));
        match command {
            Some(Ok(command)) => {
                env.execute(command);
                true
            }
            Some(Err(e)) => {
                tracing::warn!("Crop rejected: {}", e);
                false
            }
            None => false,
        }
    }

    /// First cropping image in the scene, preferring `hint`.
    fn cropping_target(hint: Option<ObjectId>, env: &InteractionEnv<'_>) -> Option<ObjectId> {
        let is_cropping = |o: &SceneObject| o.as_image().is_some_and(|i| i.is_cropping());
        hint.filter(|id| env.scene.get(*id).is_some_and(is_cropping))
            .or_else(|| env.scene.objects().iter().find(|o| is_cropping(o)).map(|o| o.id()))
    }
}

impl InteractionHandler for CropInteraction {
    fn id(&self) -> &'static str {
        "crop"
    }

    fn priority(&self) -> i32 {
        1
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn can_handle(&self, object: &SceneObject) -> bool {
        object.as_image().is_some_and(|i| i.is_cropping())
    }

    fn shortcuts(&self) -> &[KeyCombo] {
        &self.shortcuts
    }

    fn handle_mouse_down(&mut self, ctx: &MouseContext, env: &mut InteractionEnv<'_>) -> HandlerResult {
        let Some(id) = ctx.object else {
            return HandlerResult::IGNORED;
        };
        let Some(object) = env.scene.get(id) else {
            return HandlerResult::IGNORED;
        };
        let pixel = Self::image_pixel(object, ctx.position, env);
        let pixel_scale = object.pixel_scale(env.camera);

        let Some(cropper) = env
            .scene
            .get_mut(id)
            .and_then(|o| o.as_image_mut())
            .and_then(|i| i.cropper_mut())
        else {
            return HandlerResult::IGNORED;
        };
        if cropper.handle_mouse_down(pixel, pixel_scale) {
            self.dragging = Some(id);
        }
        // Clicks on a cropping image never reach the transform handler.
        HandlerResult::CONSUMED
    }

    fn handle_mouse_move(&mut self, ctx: &MouseContext, env: &mut InteractionEnv<'_>) -> HandlerResult {
        let Some(id) = self.dragging else {
            return HandlerResult::IGNORED;
        };
        let Some(object) = env.scene.get(id) else {
            self.dragging = None;
            return HandlerResult::IGNORED;
        };
        let pixel = Self::image_pixel(object, ctx.position, env);
        let moved = env
            .scene
            .get_mut(id)
            .and_then(|o| o.as_image_mut())
            .and_then(|i| i.cropper_mut())
            .is_some_and(|c| c.handle_mouse_move(pixel));
        if moved {
            HandlerResult::CONSUMED
        } else {
            HandlerResult::IGNORED
        }
    }

    fn handle_mouse_up(&mut self, _ctx: &MouseContext, env: &mut InteractionEnv<'_>) -> HandlerResult {
        let Some(id) = self.dragging.take() else {
            return HandlerResult::IGNORED;
        };
        if let Some(cropper) = env
            .scene
            .get_mut(id)
            .and_then(|o| o.as_image_mut())
            .and_then(|i| i.cropper_mut())
        {
            cropper.handle_mouse_up();
        }
        HandlerResult::CONSUMED
    }

    fn handle_key_down(
        &mut self,
        event: &KeyEvent,
        object: Option<ObjectId>,
        env: &mut InteractionEnv<'_>,
    ) -> bool {
        let Some(id) = Self::cropping_target(object, env) else {
            return false;
        };
        if self.shortcuts[0].matches(event) {
            self.dragging = None;
            return self.apply(id, env);
        }
        if self.shortcuts[1].matches(event) {
            self.dragging = None;
            if let Some(image) = env.scene.get_mut(id).and_then(|o| o.as_image_mut()) {
                image.cancel_crop();
            }
            return true;
        }
        false
    }

    fn on_disable(&mut self, env: &mut InteractionEnv<'_>) {
        self.dragging = None;
        for object in env.scene.objects_mut() {
            if let Some(image) = object.as_image_mut() {
                image.cancel_crop();
            }
        }
    }
}
