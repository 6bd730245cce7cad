use super::{Command, CommandKind, CommandMeta};
use crate::crop::CropResult;
use crate::objects::SceneObject;
use crate::scene::Scene;
use crate::types::{ObjectId, ObjectKind};
use boardkit_core::EditorError;
use image::RgbaImage;

/// Crop an image's pixels.
///
/// Holds the raster before the crop; after the first execute it also holds
/// the cropped raster so redo does not crop twice.
#[derive(Debug, Clone)]
pub struct CropCommand {
    id: ObjectId,
    result: CropResult,
    before: RgbaImage,
    after: Option<RgbaImage>,
    meta: CommandMeta,
}

impl CropCommand {
    pub fn new(object: &SceneObject, result: CropResult) -> Result<Self, EditorError> {
        let image = object.as_image().ok_or_else(|| EditorError::WrongObjectKind {
            id: object.id().to_string(),
            expected: ObjectKind::Image.as_str().to_string(),
        })?;
        let before = image.raster().cloned().ok_or_else(|| EditorError::InvalidCrop {
            reason: format!("image '{}' is not loaded", image.source()),
        })?;
        let mut meta = CommandMeta::default();
        meta.add_debug_info("result", result);
        Ok(Self {
            id: object.id(),
            result,
            before,
            after: None,
            meta,
        })
    }

    pub fn result(&self) -> &CropResult {
        &self.result
    }

    pub fn before_size(&self) -> (u32, u32) {
        self.before.dimensions()
    }
}

impl Command for CropCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::Crop
    }

    fn target_id(&self) -> Option<ObjectId> {
        Some(self.id)
    }

    fn meta(&self) -> &CommandMeta {
        &self.meta
    }

    fn execute(&mut self, scene: &mut Scene) {
        let Some(image) = scene.get_mut(self.id).and_then(|o| o.as_image_mut()) else {
            tracing::warn!("Image object {} not in scene", self.id);
            return;
        };
        if let Some(after) = &self.after {
            image.restore_from_raster(after.clone());
            return;
        }
        if let Err(e) = image.apply_crop_result(&self.result) {
            tracing::warn!("Crop of {} failed: {}", self.id, e);
            return;
        }
        self.after = image.raster().cloned();
    }

    fn undo(&mut self, scene: &mut Scene) {
        match scene.get_mut(self.id).and_then(|o| o.as_image_mut()) {
            Some(image) => image.restore_from_raster(self.before.clone()),
            None => tracing::warn!("Image object {} not in scene", self.id),
        }
    }
}
