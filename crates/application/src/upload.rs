use photo_adjust_domain::ImageKind;
use tracing::warn;

use crate::{ApplicationError, EditorConfig, Upload};

/// Checks an upload's declared type and size before anything is decoded.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    accepted: Vec<String>,
    max_bytes: u64,
}

impl UploadValidator {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            accepted: config
                .accepted_formats
                .iter()
                .map(|mime| mime.trim().to_ascii_lowercase())
                .collect(),
            max_bytes: config.max_upload_bytes,
        }
    }

    pub fn validate(&self, upload: &Upload) -> Result<ImageKind, ApplicationError> {
        let mime = upload.mime_type.trim().to_ascii_lowercase();
        let kind = ImageKind::from_mime(&mime);
        if kind == ImageKind::Unsupported || !self.accepted.contains(&mime) {
            warn!(file = %upload.file_name, mime = %upload.mime_type, "rejected upload type");
            return Err(ApplicationError::UnsupportedFormat(format!(
                "Invalid file format. Please upload {} files only.",
                self.format_list()
            )));
        }

        let size = upload.bytes.len() as u64;
        if size > self.max_bytes {
            warn!(file = %upload.file_name, size, limit = self.max_bytes, "rejected upload size");
            return Err(ApplicationError::UnsupportedFormat(format!(
                "File size exceeds {} limit.",
                megabytes(self.max_bytes)
            )));
        }
        Ok(kind)
    }

    fn format_list(&self) -> String {
        self.accepted
            .iter()
            .map(|mime| mime.split('/').nth(1).unwrap_or(mime.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn megabytes(bytes: u64) -> String {
    const MB: u64 = 1024 * 1024;
    if bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else {
        format!("{:.1}MB", bytes as f64 / MB as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(mime: &str, len: usize) -> Upload {
        Upload {
            file_name: "photo".to_string(),
            mime_type: mime.to_string(),
            bytes: vec![0; len],
        }
    }

    #[test]
    fn accepts_listed_types_within_limit() {
        let validator = UploadValidator::new(&EditorConfig::default());
        assert_eq!(
            validator.validate(&upload("image/png", 10)).expect("valid"),
            ImageKind::Png
        );
        assert_eq!(
            validator
                .validate(&upload("image/jpeg", 5 * 1024 * 1024))
                .expect("exactly at the limit"),
            ImageKind::Jpeg
        );
    }

    #[test]
    fn rejects_unlisted_type_with_format_hint() {
        let validator = UploadValidator::new(&EditorConfig::default());
        let error = validator
            .validate(&upload("image/gif", 10))
            .expect_err("gif is not accepted");
        assert_eq!(
            error.to_string(),
            "unsupported upload: Invalid file format. Please upload jpeg, png, webp files only."
        );
    }

    #[test]
    fn rejects_known_type_missing_from_config() {
        let config = EditorConfig {
            accepted_formats: vec!["image/jpeg".to_string()],
            ..EditorConfig::default()
        };
        let validator = UploadValidator::new(&config);
        assert!(matches!(
            validator.validate(&upload("image/webp", 10)),
            Err(ApplicationError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn rejects_oversized_upload() {
        let validator = UploadValidator::new(&EditorConfig::default());
        let error = validator
            .validate(&upload("image/jpeg", 5 * 1024 * 1024 + 1))
            .expect_err("too large");
        assert_eq!(error.user_message(), "File size exceeds 5MB limit.");
    }

    #[test]
    fn fractional_limits_are_rendered_with_one_decimal() {
        assert_eq!(megabytes(1024 * 1024 + 512 * 1024), "1.5MB");
    }
}
