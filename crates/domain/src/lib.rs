mod edit;
mod error;
mod image;
mod mat;

pub use edit::{
    AdjustmentParameters, ColorFilter, BLUR_RANGE, BRIGHTNESS_RANGE, CONTRAST_RANGE, HUE_RANGE,
    SATURATION_RANGE, SHARPEN_RANGE,
};
pub use error::DomainError;
pub use image::{detect_image_kind, ImageKind, RasterImage};
pub use mat::{ColorSpace, ImageMat};
