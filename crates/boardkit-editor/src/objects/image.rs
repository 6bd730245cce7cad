//! Raster image objects.

use crate::crop::{crop_raster, CropMode, CropResult, ImageCropper};
use crate::types::Transform;
use boardkit_core::{Bounds, EditorError};
use image::RgbaImage;

/// Selection padding per unit of vertical scale.
pub const IMAGE_PADDING: f64 = 10.0;

#[derive(Debug, Clone)]
pub struct ImageData {
    source: String,
    raster: Option<RgbaImage>,
    cropper: Option<ImageCropper>,
}

impl ImageData {
    /// Placeholder for an image that is still loading. It renders nothing
    /// and has zero natural size until [`ImageData::load_from_bytes`].
    pub fn pending(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            raster: None,
            cropper: None,
        }
    }

    pub fn from_raster(source: impl Into<String>, raster: RgbaImage) -> Self {
        Self {
            source: source.into(),
            raster: Some(raster),
            cropper: None,
        }
    }

    /// Decode an encoded image (PNG, JPEG, ...).
    pub fn from_bytes(source: impl Into<String>, bytes: &[u8]) -> Result<Self, EditorError> {
        let mut data = Self::pending(source);
        data.load_from_bytes(bytes)?;
        Ok(data)
    }

    pub fn load_from_bytes(&mut self, bytes: &[u8]) -> Result<(), EditorError> {
        let decoded = image::load_from_memory(bytes).map_err(|e| EditorError::ImageDecode {
            reason: format!("{}: {}", self.source, e),
        })?;
        let raster = decoded.to_rgba8();
        tracing::debug!(
            "Loaded image '{}' ({}x{})",
            self.source,
            raster.width(),
            raster.height()
        );
        self.raster = Some(raster);
        self.cropper = None;
        Ok(())
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.raster.is_some()
    }

    pub fn raster(&self) -> Option<&RgbaImage> {
        self.raster.as_ref()
    }

    /// Natural size in pixels; `(0, 0)` while loading.
    pub fn get_original_size(&self) -> (u32, u32) {
        self.raster
            .as_ref()
            .map(|r| r.dimensions())
            .unwrap_or((0, 0))
    }

    /// Replace the pixels, ending any crop session.
    pub fn restore_from_raster(&mut self, raster: RgbaImage) {
        self.raster = Some(raster);
        self.cropper = None;
    }

    /// Natural size centered on the origin, padded by `scale.y * 10`.
    pub fn bounds(&self, transform: &Transform) -> Bounds {
        let (w, h) = self.get_original_size();
        let padding = transform.scale.y * IMAGE_PADDING;
        Bounds::centered(f64::from(w), f64::from(h)).expand(padding)
    }

    /// Rectangle the pixels occupy in local space.
    pub fn content_rect(&self) -> Bounds {
        let (w, h) = self.get_original_size();
        Bounds::centered(f64::from(w), f64::from(h))
    }

    pub fn start_crop(&mut self, mode: CropMode, aspect_ratio: Option<f64>) -> Result<(), EditorError> {
        let (w, h) = self.get_original_size();
        if w == 0 || h == 0 {
            return Err(EditorError::InvalidCrop {
                reason: format!("image '{}' is not loaded", self.source),
            });
        }
        let mut cropper = ImageCropper::new(w, h);
        cropper.start_crop(mode, aspect_ratio);
        self.cropper = Some(cropper);
        Ok(())
    }

    pub fn is_cropping(&self) -> bool {
        self.cropper.as_ref().is_some_and(|c| c.is_active())
    }

    pub fn cropper(&self) -> Option<&ImageCropper> {
        self.cropper.as_ref().filter(|c| c.is_active())
    }

    pub fn cropper_mut(&mut self) -> Option<&mut ImageCropper> {
        self.cropper.as_mut().filter(|c| c.is_active())
    }

    /// End the crop session and return its result without touching pixels.
    pub fn finish_crop(&mut self) -> Result<CropResult, EditorError> {
        let result = self
            .cropper
            .as_mut()
            .and_then(|c| c.apply_crop())
            .ok_or(EditorError::NoActiveCrop)?;
        self.cropper = None;
        Ok(result)
    }

    pub fn cancel_crop(&mut self) {
        if let Some(mut cropper) = self.cropper.take() {
            cropper.cancel_crop();
        }
    }

    /// Crop the pixels to `result`.
    pub fn apply_crop_result(&mut self, result: &CropResult) -> Result<(), EditorError> {
        let raster = self.raster.as_ref().ok_or_else(|| EditorError::InvalidCrop {
            reason: format!("image '{}' is not loaded", self.source),
        })?;
        let cropped = crop_raster(raster, result)?;
        tracing::debug!(
            "Cropped '{}' to {}x{}",
            self.source,
            cropped.width(),
            cropped.height()
        );
        self.restore_from_raster(cropped);
        Ok(())
    }
}
