use std::fs;
use std::path::Path;

use photo_adjust_application::{ApplicationError, Upload};
use photo_adjust_domain::detect_image_kind;
use tracing::debug;

const UNKNOWN_MIME: &str = "application/octet-stream";

/// Builds uploads from files on disk, deriving the MIME type from the extension.
#[derive(Debug, Default)]
pub struct FsImageSource;

impl FsImageSource {
    pub fn read(&self, path: &Path) -> Result<Upload, ApplicationError> {
        if !path.is_file() {
            return Err(ApplicationError::Io(format!(
                "file does not exist or is not a regular file: {}",
                path.display()
            )));
        }

        let bytes = fs::read(path).map_err(|error| ApplicationError::Io(error.to_string()))?;
        let mime_type = detect_image_kind(path)
            .mime_type()
            .unwrap_or(UNKNOWN_MIME)
            .to_string();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();
        debug!(%file_name, %mime_type, size = bytes.len(), "read upload from disk");

        Ok(Upload {
            file_name,
            mime_type,
            bytes,
        })
    }
}
