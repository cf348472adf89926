//! Editor configuration.
//!
//! Deserialized from whatever the host page passes in; every field has a
//! default, so an empty object (or none at all) is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::render::OutputFormat;

/// File name suggested for downloads when nothing else is configured.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "edited-image.png";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Suggested file name for the exported image.
    pub export_file_name: String,
    /// Rotate/mirror uploads according to their EXIF orientation tag.
    pub apply_exif_orientation: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            apply_exif_orientation: true,
        }
    }
}

impl EditorConfig {
    /// Export file name, falling back to the default when blank and
    /// carrying the extension of `format`.
    pub fn export_file_name_for(&self, format: OutputFormat) -> String {
        let name = self.export_file_name.trim();
        if name.is_empty() {
            return DEFAULT_EXPORT_FILE_NAME.to_string();
        }
        let extension = format.extension();
        let has_extension = name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(extension));
        if has_extension {
            name.to_string()
        } else {
            format!("{name}.{extension}")
        }
    }
}
