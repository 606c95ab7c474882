mod hsv;

use image::{imageops, ImageBuffer, Luma, Pixel, Rgb, Rgba};
use imageproc::filter::separable_filter_equal;
use photo_adjust_application::{BackendError, ColorConversion, FlipAxis, VisionBackend};
use photo_adjust_domain::{ColorSpace, ImageMat, RasterImage};

pub use hsv::{hsv_to_rgb, rgb_to_hsv, HUE_RANGE};

/// Vision backend built on the `image` and `imageproc` crates.
#[derive(Debug, Clone)]
pub struct ImageprocBackend {
    ready: bool,
}

impl Default for ImageprocBackend {
    fn default() -> Self {
        Self { ready: true }
    }
}

impl ImageprocBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that refuses work, for front ends still loading their assets.
    pub fn unavailable() -> Self {
        Self { ready: false }
    }
}

impl VisionBackend for ImageprocBackend {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn hue_range(&self) -> u16 {
        HUE_RANGE
    }

    fn mat_from_image(&self, image: &RasterImage) -> Result<ImageMat, BackendError> {
        ImageMat::new(
            image.height(),
            image.width(),
            ColorSpace::Rgba,
            image.as_raw().to_vec(),
        )
        .map_err(|error| BackendError::new("mat_from_image", error.to_string()))
    }

    fn image_from_mat(&self, mat: &ImageMat) -> Result<RasterImage, BackendError> {
        expect_space("image_from_mat", mat, ColorSpace::Rgba)?;
        RasterImage::from_rgba(mat.cols(), mat.rows(), mat.data().to_vec())
            .map_err(|error| BackendError::new("image_from_mat", error.to_string()))
    }

    fn flip(&self, src: &ImageMat, axis: FlipAxis) -> Result<ImageMat, BackendError> {
        let data = match src.space() {
            ColorSpace::Rgba => flip_buffer::<Rgba<u8>>(src, axis)?,
            ColorSpace::Rgb | ColorSpace::Hsv => flip_buffer::<Rgb<u8>>(src, axis)?,
            ColorSpace::Gray => flip_buffer::<Luma<u8>>(src, axis)?,
        };
        rebuild("flip", src, src.space(), data)
    }

    fn convert_color(
        &self,
        src: &ImageMat,
        conversion: ColorConversion,
    ) -> Result<ImageMat, BackendError> {
        expect_space("convert_color", src, conversion.source_space())?;
        let data = src.data();
        let out: Vec<u8> = match conversion {
            ColorConversion::RgbaToRgb => data
                .chunks_exact(4)
                .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
                .collect(),
            ColorConversion::RgbToRgba => data
                .chunks_exact(3)
                .flat_map(|pixel| [pixel[0], pixel[1], pixel[2], u8::MAX])
                .collect(),
            ColorConversion::RgbToHsv => data
                .chunks_exact(3)
                .flat_map(|pixel| rgb_to_hsv([pixel[0], pixel[1], pixel[2]]))
                .collect(),
            ColorConversion::HsvToRgb => data
                .chunks_exact(3)
                .flat_map(|pixel| hsv_to_rgb([pixel[0], pixel[1], pixel[2]]))
                .collect(),
            ColorConversion::RgbToGray => data
                .chunks_exact(3)
                .map(|pixel| luma(pixel[0], pixel[1], pixel[2]))
                .collect(),
            ColorConversion::GrayToRgb => data.iter().flat_map(|&luma| [luma; 3]).collect(),
        };
        rebuild("convert_color", src, conversion.target_space(), out)
    }

    fn convert_scale(
        &self,
        src: &ImageMat,
        alpha: f64,
        beta: f64,
    ) -> Result<ImageMat, BackendError> {
        let data = src
            .data()
            .iter()
            .map(|&value| saturate(f64::from(value) * alpha + beta))
            .collect();
        rebuild("convert_scale", src, src.space(), data)
    }

    fn split(&self, src: &ImageMat) -> Result<Vec<ImageMat>, BackendError> {
        let channels = src.channels();
        (0..channels)
            .map(|channel| {
                let plane = src
                    .data()
                    .iter()
                    .skip(channel)
                    .step_by(channels)
                    .copied()
                    .collect();
                rebuild("split", src, ColorSpace::Gray, plane)
            })
            .collect()
    }

    fn merge(&self, planes: &[ImageMat], space: ColorSpace) -> Result<ImageMat, BackendError> {
        if planes.len() != space.channels() {
            return Err(BackendError::new(
                "merge",
                format!(
                    "{:?} needs {} planes, got {}",
                    space,
                    space.channels(),
                    planes.len()
                ),
            ));
        }
        let first = &planes[0];
        for plane in planes {
            expect_space("merge", plane, ColorSpace::Gray)?;
            if !plane.same_shape(first) {
                return Err(BackendError::new("merge", "planes differ in size"));
            }
        }

        let pixel_count = first.data().len();
        let mut data = Vec::with_capacity(pixel_count * planes.len());
        for index in 0..pixel_count {
            data.extend(planes.iter().map(|plane| plane.data()[index]));
        }
        rebuild("merge", first, space, data)
    }

    fn add_scalar_wrapping(
        &self,
        src: &ImageMat,
        value: u16,
        modulus: u16,
    ) -> Result<ImageMat, BackendError> {
        expect_space("add_scalar_wrapping", src, ColorSpace::Gray)?;
        if modulus == 0 || modulus > 256 {
            return Err(BackendError::new(
                "add_scalar_wrapping",
                format!("modulus must be within 1..=256, got {modulus}"),
            ));
        }
        let data = src
            .data()
            .iter()
            .map(|&x| ((u32::from(x) + u32::from(value)) % u32::from(modulus)) as u8)
            .collect();
        rebuild("add_scalar_wrapping", src, ColorSpace::Gray, data)
    }

    fn gaussian_blur(&self, src: &ImageMat, kernel_size: u32) -> Result<ImageMat, BackendError> {
        if kernel_size % 2 == 0 {
            return Err(BackendError::new(
                "gaussian_blur",
                format!("kernel size must be odd, got {kernel_size}"),
            ));
        }
        if kernel_size == 1 {
            return Ok(src.clone());
        }

        let kernel = gaussian_kernel(kernel_size);
        let data = match src.space() {
            ColorSpace::Rgba => blur_buffer::<Rgba<f32>>(src, &kernel)?,
            ColorSpace::Rgb | ColorSpace::Hsv => blur_buffer::<Rgb<f32>>(src, &kernel)?,
            ColorSpace::Gray => blur_buffer::<Luma<f32>>(src, &kernel)?,
        };
        rebuild("gaussian_blur", src, src.space(), data)
    }

    fn add_weighted(
        &self,
        a: &ImageMat,
        alpha: f64,
        b: &ImageMat,
        beta: f64,
        gamma: f64,
    ) -> Result<ImageMat, BackendError> {
        if !a.same_shape(b) || a.space() != b.space() {
            return Err(BackendError::new(
                "add_weighted",
                "operands differ in size or color space",
            ));
        }
        let data = a
            .data()
            .iter()
            .zip(b.data())
            .map(|(&x, &y)| saturate(f64::from(x) * alpha + f64::from(y) * beta + gamma))
            .collect();
        rebuild("add_weighted", a, a.space(), data)
    }

    fn transform(&self, src: &ImageMat, matrix: &[[f32; 3]; 3]) -> Result<ImageMat, BackendError> {
        if src.channels() != 3 {
            return Err(BackendError::new(
                "transform",
                format!("expected three channels, got {}", src.channels()),
            ));
        }
        let data = src
            .data()
            .chunks_exact(3)
            .flat_map(|pixel| {
                matrix.map(|row| {
                    let mixed: f32 = row
                        .iter()
                        .zip(pixel)
                        .map(|(weight, &value)| weight * f32::from(value))
                        .sum();
                    saturate(f64::from(mixed))
                })
            })
            .collect();
        rebuild("transform", src, src.space(), data)
    }

    fn bitwise_not(&self, src: &ImageMat) -> Result<ImageMat, BackendError> {
        let data = src.data().iter().map(|value| !value).collect();
        rebuild("bitwise_not", src, src.space(), data)
    }
}

/// Odd-sized, normalized Gaussian kernel. Sigma follows the usual derivation
/// from kernel size when none is given: `0.3 * ((k - 1) / 2 - 1) + 0.8`.
fn gaussian_kernel(size: u32) -> Vec<f32> {
    let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let half = (size / 2) as f32;
    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let x = i as f32 - half;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for weight in kernel.iter_mut() {
        *weight /= sum;
    }
    kernel
}

/// BT.601 luma, the weighting of the usual RGB to gray conversion.
fn luma(r: u8, g: u8, b: u8) -> u8 {
    saturate(0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b))
}

fn saturate(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn expect_space(
    primitive: &'static str,
    mat: &ImageMat,
    space: ColorSpace,
) -> Result<(), BackendError> {
    if mat.space() == space {
        return Ok(());
    }
    Err(BackendError::new(
        primitive,
        format!("expected {:?} input, got {:?}", space, mat.space()),
    ))
}

fn rebuild(
    primitive: &'static str,
    shape: &ImageMat,
    space: ColorSpace,
    data: Vec<u8>,
) -> Result<ImageMat, BackendError> {
    ImageMat::new(shape.rows(), shape.cols(), space, data)
        .map_err(|error| BackendError::new(primitive, error.to_string()))
}

fn to_buffer<P>(
    primitive: &'static str,
    mat: &ImageMat,
) -> Result<ImageBuffer<P, Vec<u8>>, BackendError>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    ImageBuffer::from_raw(mat.cols(), mat.rows(), mat.data().to_vec())
        .ok_or_else(|| BackendError::new(primitive, "buffer does not match its dimensions"))
}

/// Convolves in `f32` and rounds once at the end, so uniform regions keep
/// their value.
fn blur_buffer<P>(mat: &ImageMat, kernel: &[f32]) -> Result<Vec<u8>, BackendError>
where
    P: Pixel<Subpixel = f32> + 'static,
{
    let widened = mat.data().iter().map(|&value| f32::from(value)).collect();
    let buffer: ImageBuffer<P, Vec<f32>> =
        ImageBuffer::from_raw(mat.cols(), mat.rows(), widened).ok_or_else(|| {
            BackendError::new("gaussian_blur", "buffer does not match its dimensions")
        })?;
    Ok(separable_filter_equal(&buffer, kernel)
        .into_raw()
        .into_iter()
        .map(|value| saturate(f64::from(value)))
        .collect())
}

fn flip_buffer<P>(mat: &ImageMat, axis: FlipAxis) -> Result<Vec<u8>, BackendError>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let buffer = to_buffer::<P>("flip", mat)?;
    let flipped = match axis {
        FlipAxis::Horizontal => imageops::flip_horizontal(&buffer),
        FlipAxis::Vertical => imageops::flip_vertical(&buffer),
    };
    Ok(flipped.into_raw())
}
