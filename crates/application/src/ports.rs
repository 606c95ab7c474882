use photo_adjust_domain::{ColorSpace, ImageMat, RasterImage};

use crate::{ApplicationError, BackendError, Upload};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipAxis {
    /// Mirror left to right.
    Horizontal,
    /// Mirror top to bottom.
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorConversion {
    RgbaToRgb,
    RgbToRgba,
    RgbToHsv,
    HsvToRgb,
    RgbToGray,
    GrayToRgb,
}

impl ColorConversion {
    pub fn source_space(self) -> ColorSpace {
        match self {
            Self::RgbaToRgb => ColorSpace::Rgba,
            Self::RgbToRgba | Self::RgbToHsv | Self::RgbToGray => ColorSpace::Rgb,
            Self::HsvToRgb => ColorSpace::Hsv,
            Self::GrayToRgb => ColorSpace::Gray,
        }
    }

    pub fn target_space(self) -> ColorSpace {
        match self {
            Self::RgbaToRgb | Self::HsvToRgb | Self::GrayToRgb => ColorSpace::Rgb,
            Self::RgbToRgba => ColorSpace::Rgba,
            Self::RgbToHsv => ColorSpace::Hsv,
            Self::RgbToGray => ColorSpace::Gray,
        }
    }
}

/// Raster primitives the adjustment pipeline is written against.
///
/// Every primitive borrows its inputs and returns a new buffer. Arithmetic
/// saturates to `0..=255` and rounds to the nearest integer unless stated
/// otherwise.
pub trait VisionBackend {
    /// Whether the backend can service calls. Checked before every pipeline run.
    fn is_ready(&self) -> bool;

    /// Number of distinct hue values in [`ColorSpace::Hsv`] buffers.
    fn hue_range(&self) -> u16 {
        180
    }

    fn mat_from_image(&self, image: &RasterImage) -> Result<ImageMat, BackendError>;

    fn image_from_mat(&self, mat: &ImageMat) -> Result<RasterImage, BackendError>;

    fn flip(&self, src: &ImageMat, axis: FlipAxis) -> Result<ImageMat, BackendError>;

    fn convert_color(
        &self,
        src: &ImageMat,
        conversion: ColorConversion,
    ) -> Result<ImageMat, BackendError>;

    /// `clamp(round(x * alpha + beta))` on every channel.
    fn convert_scale(&self, src: &ImageMat, alpha: f64, beta: f64)
        -> Result<ImageMat, BackendError>;

    /// Splits into one [`ColorSpace::Gray`] plane per channel.
    fn split(&self, src: &ImageMat) -> Result<Vec<ImageMat>, BackendError>;

    fn merge(&self, planes: &[ImageMat], space: ColorSpace) -> Result<ImageMat, BackendError>;

    /// `(x + value) % modulus` on a single-channel buffer.
    fn add_scalar_wrapping(
        &self,
        src: &ImageMat,
        value: u16,
        modulus: u16,
    ) -> Result<ImageMat, BackendError>;

    /// Gaussian blur with a square, odd-sized kernel.
    fn gaussian_blur(&self, src: &ImageMat, kernel_size: u32) -> Result<ImageMat, BackendError>;

    /// `clamp(round(a * alpha + b * beta + gamma))`.
    fn add_weighted(
        &self,
        a: &ImageMat,
        alpha: f64,
        b: &ImageMat,
        beta: f64,
        gamma: f64,
    ) -> Result<ImageMat, BackendError>;

    /// Per-pixel matrix product on a three-channel buffer, row `i` producing channel `i`.
    fn transform(&self, src: &ImageMat, matrix: &[[f32; 3]; 3]) -> Result<ImageMat, BackendError>;

    fn bitwise_not(&self, src: &ImageMat) -> Result<ImageMat, BackendError>;
}

pub trait ImageDecoder {
    fn decode(&self, upload: &Upload) -> Result<RasterImage, ApplicationError>;
}

pub trait ImageEncoder {
    fn encode_jpeg(&self, image: &RasterImage, quality: u8) -> Result<Vec<u8>, ApplicationError>;
}

pub trait ThumbnailGenerator {
    /// Downscales `image` to fit within `max_side` on both axes, keeping aspect ratio.
    fn thumbnail(&self, image: &RasterImage, max_side: u32) -> Result<RasterImage, ApplicationError>;
}
