use serde::{Deserialize, Serialize};

use crate::ApplicationError;

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Editor settings shared by upload validation, export and the filter gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// MIME types accepted at upload.
    pub accepted_formats: Vec<String>,
    pub max_upload_bytes: u64,
    /// JPEG quality used for downloads, 1-100.
    pub export_quality: u8,
    pub export_file_name: String,
    /// Longest side of the filter gallery previews.
    pub thumbnail_size: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            accepted_formats: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            export_quality: 92,
            export_file_name: "edited-image.jpg".to_string(),
            thumbnail_size: 150,
        }
    }
}

impl EditorConfig {
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.accepted_formats.is_empty() {
            return Err(ApplicationError::InvalidConfig(
                "at least one upload format must be accepted".to_string(),
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err(ApplicationError::InvalidConfig(
                "upload size limit must be positive".to_string(),
            ));
        }
        if !(1..=100).contains(&self.export_quality) {
            return Err(ApplicationError::InvalidConfig(format!(
                "export quality must be within 1..=100, got {}",
                self.export_quality
            )));
        }
        if self.export_file_name.trim().is_empty() {
            return Err(ApplicationError::InvalidConfig(
                "export file name must not be empty".to_string(),
            ));
        }
        if self.thumbnail_size == 0 {
            return Err(ApplicationError::InvalidConfig(
                "thumbnail size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
