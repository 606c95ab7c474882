use photo_adjust_domain::DomainError;
use thiserror::Error;

use crate::PipelineStage;

/// Failure reported by a single vision backend primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{primitive}: {message}")]
pub struct BackendError {
    pub primitive: &'static str,
    pub message: String,
}

impl BackendError {
    pub fn new(primitive: &'static str, message: impl Into<String>) -> Self {
        Self {
            primitive,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("no image to process")]
    MissingSource,
    #[error("unsupported upload: {0}")]
    UnsupportedFormat(String),
    #[error("processing failed at stage {stage}: {message}")]
    Processing {
        stage: PipelineStage,
        message: String,
    },
    #[error("decode error: {0}")]
    Decode(String),
    #[error("encode error: {0}")]
    Encode(String),
    #[error("vision backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(String),
}

impl ApplicationError {
    pub fn processing(stage: PipelineStage, error: BackendError) -> Self {
        Self::Processing {
            stage,
            message: error.to_string(),
        }
    }

    /// Message shown to the person editing, without internal detail.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingSource => "no image to process".to_string(),
            Self::UnsupportedFormat(reason) => reason.clone(),
            Self::Processing { .. } | Self::Domain(_) => {
                "Error processing image. Please try again.".to_string()
            }
            Self::Decode(_) | Self::Io(_) => {
                "Error reading the image file. Please try again.".to_string()
            }
            Self::Encode(_) => "Error exporting the image. Please try again.".to_string(),
            Self::BackendUnavailable(_) => {
                "Image processing is not available yet. Please try again shortly.".to_string()
            }
            Self::InvalidConfig(reason) => format!("Editor is misconfigured: {reason}"),
        }
    }
}
