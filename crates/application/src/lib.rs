mod config;
mod error;
mod pipeline;
mod ports;
mod service;
mod upload;
mod use_cases;

pub use config::{EditorConfig, DEFAULT_MAX_UPLOAD_BYTES};
pub use error::{ApplicationError, BackendError};
pub use pipeline::{
    blur_kernel_size, hue_shift, AdjustmentPipeline, PipelineStage, SEPIA_MATRIX,
    SHARPEN_MASK_KERNEL,
};
pub use ports::{
    ColorConversion, FlipAxis, ImageDecoder, ImageEncoder, ThumbnailGenerator, VisionBackend,
};
pub use service::EditSession;
pub use upload::UploadValidator;
pub use use_cases::{
    CommitStatus, DownloadArtifact, FilterPreview, RenderJob, RenderOutcome, Upload,
};
