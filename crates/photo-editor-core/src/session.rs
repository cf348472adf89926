//! Editing session: one image, one parameter set.
//!
//! The session owns everything that lives from upload to navigation away
//! and is passed explicitly to whoever needs it; there is no global state.
//!
//! # Workflow
//!
//! 1. `load_image` with the bytes from the file picker
//! 2. parameter changes through `store_mut()`
//! 3. `preview()` after every change (or from a store listener)
//! 4. `export()` once the user is done

use thiserror::Error;

use crate::compare::{ComparisonMode, OriginalView};
use crate::config::EditorConfig;
use crate::decode::{decode_image, DecodeError, SourceImage};
use crate::params::EditParameters;
use crate::raster::{render_plan, DrawingSurface, SoftwareSurface};
use crate::render::{export_plan, PreviewDescriptor, RasterizationPlan};
use crate::store::ParameterStore;

/// Errors that can occur during export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Export was requested before any image was loaded.
    #[error("No image loaded")]
    NoImage,

    /// The drawing surface failed while rendering or encoding.
    #[error("Rendering failed: {0}")]
    Render(String),
}

/// An encoded image ready to hand to a file saver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    /// Suggested download name.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub mime_type: &'static str,
    /// Encoded file contents.
    pub bytes: Vec<u8>,
}

/// State of one editing session.
#[derive(Debug, Default)]
pub struct EditorSession {
    config: EditorConfig,
    store: ParameterStore,
    image: Option<SourceImage>,
    comparison: ComparisonMode,
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ParameterStore {
        &mut self.store
    }

    /// Current parameter snapshot.
    pub fn parameters(&self) -> EditParameters {
        self.store.get()
    }

    /// The loaded image, if any.
    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    /// Decode and install an uploaded image.
    ///
    /// Returns `Ok(false)` without touching anything when `bytes` is empty
    /// (nothing was selected). On decode failure the previous image stays
    /// loaded. Parameters are kept across uploads.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<bool, DecodeError> {
        if bytes.is_empty() {
            return Ok(false);
        }
        match decode_image(bytes, self.config.apply_exif_orientation) {
            Ok(image) => {
                self.replace_image(image);
                Ok(true)
            }
            Err(e) => {
                log::warn!("image decode failed: {e}");
                Err(e)
            }
        }
    }

    /// Install an already decoded image, replacing the current one.
    pub fn replace_image(&mut self, image: SourceImage) {
        log::info!("loaded {}x{} image", image.width(), image.height());
        self.image = Some(image);
    }

    pub fn comparison(&self) -> &ComparisonMode {
        &self.comparison
    }

    pub fn comparison_mut(&mut self) -> &mut ComparisonMode {
        &mut self.comparison
    }

    /// Show the original for the lifetime of the returned guard.
    pub fn show_original(&mut self) -> OriginalView<'_> {
        self.comparison.hold()
    }

    /// Descriptor for the displayed image, honoring comparison mode.
    pub fn preview(&self) -> PreviewDescriptor {
        self.comparison.displayed(&self.store.get())
    }

    /// Whether the export action should be enabled.
    pub fn can_export(&self) -> bool {
        self.image.is_some()
    }

    /// Rasterization plan for the current image and parameters.
    pub fn export_plan(&self) -> Result<RasterizationPlan, ExportError> {
        let image = self.image.as_ref().ok_or(ExportError::NoImage)?;
        Ok(export_plan(&self.store.get(), image.dimensions()))
    }

    /// Render the export on `surface` and return the encoded bytes.
    pub fn export_with<S: DrawingSurface>(&self, surface: &mut S) -> Result<Vec<u8>, ExportError> {
        let Some(image) = self.image.as_ref() else {
            log::warn!("export rejected: no image loaded");
            return Err(ExportError::NoImage);
        };
        let plan = export_plan(&self.store.get(), image.dimensions());
        let bytes = render_plan(&plan, image, surface)
            .map_err(|e| ExportError::Render(e.to_string()))?;
        log::info!(
            "exported {}x{} {} ({} bytes)",
            plan.canvas.width,
            plan.canvas.height,
            plan.format.mime_type(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Render the export with the software rasterizer.
    pub fn export(&self) -> Result<ExportedImage, ExportError> {
        let plan = self.export_plan()?;
        let bytes = self.export_with(&mut SoftwareSurface::new())?;
        Ok(ExportedImage {
            file_name: self.config.export_file_name_for(plan.format),
            mime_type: plan.format.mime_type(),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{encode_png, PNG_SIGNATURE};
    use crate::params::{ParameterField, RotateDirection};

    fn png(width: u32, height: u32) -> Vec<u8> {
        encode_png(&vec![90u8; (width * height * 4) as usize], width, height).unwrap()
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = EditorSession::default();
        assert!(session.image().is_none());
        assert!(!session.can_export());
        assert!(session.parameters().is_default());
    }

    #[test]
    fn test_empty_selection_is_noop() {
        let mut session = EditorSession::default();
        assert!(!session.load_image(&[]).unwrap());
        assert!(session.image().is_none());
    }

    #[test]
    fn test_load_image() {
        let mut session = EditorSession::default();
        assert!(session.load_image(&png(12, 8)).unwrap());
        let image = session.image().unwrap();
        assert_eq!((image.width(), image.height()), (12, 8));
        assert!(session.can_export());
    }

    #[test]
    fn test_decode_failure_keeps_previous_image() {
        let mut session = EditorSession::default();
        session.load_image(&png(3, 2)).unwrap();

        let result = session.load_image(b"garbage");
        assert!(result.is_err());
        assert_eq!(session.image().unwrap().width(), 3);
    }

    #[test]
    fn test_new_upload_keeps_parameters() {
        let mut session = EditorSession::default();
        session.load_image(&png(4, 4)).unwrap();
        session.store_mut().set(ParameterField::Sepia, 70.0);

        session.load_image(&png(6, 6)).unwrap();
        assert_eq!(session.parameters().sepia, 70.0);
        assert_eq!(session.image().unwrap().width(), 6);
    }

    #[test]
    fn test_export_without_image_rejected() {
        let session = EditorSession::default();
        assert!(matches!(session.export(), Err(ExportError::NoImage)));
        assert!(matches!(session.export_plan(), Err(ExportError::NoImage)));
    }

    #[test]
    fn test_export_png() {
        let mut session = EditorSession::default();
        session.load_image(&png(10, 4)).unwrap();
        session.store_mut().rotate(RotateDirection::Right);

        let exported = session.export().unwrap();
        assert_eq!(exported.file_name, "edited-image.png");
        assert_eq!(exported.mime_type, "image/png");
        assert_eq!(&exported.bytes[..8], &PNG_SIGNATURE);

        let decoded = image::load_from_memory(&exported.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 10));
    }

    #[test]
    fn test_export_uses_configured_name() {
        let config = EditorConfig {
            export_file_name: "portrait".to_string(),
            ..Default::default()
        };
        let mut session = EditorSession::new(config);
        session.load_image(&png(2, 2)).unwrap();
        assert_eq!(session.export().unwrap().file_name, "portrait.png");
    }

    #[test]
    fn test_preview_honors_comparison() {
        let mut session = EditorSession::default();
        session.store_mut().set(ParameterField::Grayscale, 100.0);
        let edited = session.preview();
        assert!(!edited.effects.is_identity());

        {
            let _original = session.show_original();
        }
        assert!(!session.comparison().is_active());

        session.comparison_mut().enter();
        assert_eq!(session.preview(), PreviewDescriptor::identity());
        assert_eq!(session.parameters().grayscale, 100.0);

        session.comparison_mut().exit();
        assert_eq!(session.preview(), edited);
    }
}
