use std::fmt::{Display, Formatter};

use photo_adjust_domain::{AdjustmentParameters, ColorFilter, ColorSpace, ImageMat, RasterImage};
use tracing::{debug, instrument};

use crate::{ApplicationError, BackendError, ColorConversion, FlipAxis, VisionBackend};

/// Kernel size of the secondary blur used as the unsharp mask. Independent of the
/// blur slider.
pub const SHARPEN_MASK_KERNEL: u32 = 5;

pub const SEPIA_MATRIX: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

const TONE_GAIN: f64 = 1.2;
const TONE_OFFSET: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Load,
    Flip,
    BrightnessContrast,
    Saturation,
    Hue,
    Blur,
    Sharpen,
    Filter,
    Finalize,
}

impl PipelineStage {
    pub fn name(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Flip => "flip",
            Self::BrightnessContrast => "brightness-contrast",
            Self::Saturation => "saturation",
            Self::Hue => "hue",
            Self::Blur => "blur",
            Self::Sharpen => "sharpen",
            Self::Filter => "filter",
            Self::Finalize => "finalize",
        }
    }
}

impl Display for PipelineStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Kernel size for the blur slider: `2 * round(blur) + 1`, always odd.
pub fn blur_kernel_size(blur: f32) -> u32 {
    2 * blur.round().max(0.0) as u32 + 1
}

/// Maps a 0 to 360 degree hue slider onto a backend hue scale of `range` values.
pub fn hue_shift(hue: i32, range: u16) -> u16 {
    let top = f64::from(range.saturating_sub(1));
    (f64::from(hue) / 360.0 * top).round() as u16
}

/// Fixed-order adjustment pipeline over a [`VisionBackend`].
///
/// Stages run as: flip, brightness/contrast, saturation, hue, blur, sharpen,
/// named filter, alpha finalization. A stage whose parameter sits at its
/// identity value is skipped, which leaves the buffer exactly as applying it
/// would.
pub struct AdjustmentPipeline {
    backend: Box<dyn VisionBackend>,
}

impl AdjustmentPipeline {
    pub fn new(backend: Box<dyn VisionBackend>) -> Self {
        Self { backend }
    }

    pub fn is_ready(&self) -> bool {
        self.backend.is_ready()
    }

    #[instrument(skip_all, fields(filter = %params.selected_filter))]
    pub fn apply(
        &self,
        source: Option<&RasterImage>,
        params: &AdjustmentParameters,
    ) -> Result<RasterImage, ApplicationError> {
        if !self.backend.is_ready() {
            return Err(ApplicationError::BackendUnavailable(
                "backend has not finished loading".to_string(),
            ));
        }
        let source = source.ok_or(ApplicationError::MissingSource)?;
        params.validate()?;
        debug!(
            width = source.width(),
            height = source.height(),
            "running adjustment pipeline"
        );

        let rgba = at(PipelineStage::Load, self.backend.mat_from_image(source))?;
        let rgba = self.flip(rgba, params)?;
        let (rgb, alpha) = self.detach_alpha(&rgba)?;
        drop(rgba);

        let rgb = self.brightness_contrast(rgb, params)?;
        let rgb = self.saturation_and_hue(rgb, params)?;
        let rgb = self.blur(rgb, params)?;
        let rgb = self.sharpen(rgb, params)?;
        let rgb = self.filter(rgb, params.selected_filter)?;
        self.finalize(rgb, alpha)
    }

    fn flip(
        &self,
        mut mat: ImageMat,
        params: &AdjustmentParameters,
    ) -> Result<ImageMat, ApplicationError> {
        if params.flip_horizontal {
            mat = at(
                PipelineStage::Flip,
                self.backend.flip(&mat, FlipAxis::Horizontal),
            )?;
        }
        if params.flip_vertical {
            mat = at(
                PipelineStage::Flip,
                self.backend.flip(&mat, FlipAxis::Vertical),
            )?;
        }
        trace_stage(PipelineStage::Flip, &mat);
        Ok(mat)
    }

    fn detach_alpha(&self, rgba: &ImageMat) -> Result<(ImageMat, ImageMat), ApplicationError> {
        let mut planes = at(PipelineStage::Flip, self.backend.split(rgba))?;
        let alpha = planes
            .pop()
            .filter(|_| planes.len() == 3)
            .ok_or_else(|| {
                ApplicationError::processing(
                    PipelineStage::Flip,
                    BackendError::new("split", "expected four channel planes"),
                )
            })?;
        let rgb = at(
            PipelineStage::Flip,
            self.backend.convert_color(rgba, ColorConversion::RgbaToRgb),
        )?;
        Ok((rgb, alpha))
    }

    fn brightness_contrast(
        &self,
        rgb: ImageMat,
        params: &AdjustmentParameters,
    ) -> Result<ImageMat, ApplicationError> {
        if params.brightness == 100 && params.contrast == 100 {
            return Ok(rgb);
        }
        let alpha = f64::from(params.contrast) / 100.0;
        let beta = f64::from(params.brightness - 100);
        let out = at(
            PipelineStage::BrightnessContrast,
            self.backend.convert_scale(&rgb, alpha, beta),
        )?;
        trace_stage(PipelineStage::BrightnessContrast, &out);
        Ok(out)
    }

    fn saturation_and_hue(
        &self,
        rgb: ImageMat,
        params: &AdjustmentParameters,
    ) -> Result<ImageMat, ApplicationError> {
        // The 8-bit HSV round trip is lossy; identity leaves the buffer untouched.
        if params.saturation == 100 && params.hue == 0 {
            return Ok(rgb);
        }

        let hsv = at(
            PipelineStage::Saturation,
            self.backend.convert_color(&rgb, ColorConversion::RgbToHsv),
        )?;
        drop(rgb);
        let mut planes = at(PipelineStage::Saturation, self.backend.split(&hsv))?;
        if planes.len() != 3 {
            return Err(ApplicationError::processing(
                PipelineStage::Saturation,
                BackendError::new("split", "expected three hsv planes"),
            ));
        }

        if params.saturation != 100 {
            let scale = f64::from(params.saturation) / 100.0;
            planes[1] = at(
                PipelineStage::Saturation,
                self.backend.convert_scale(&planes[1], scale, 0.0),
            )?;
        }

        if params.hue != 0 {
            let range = self.backend.hue_range();
            let shift = hue_shift(params.hue, range);
            debug!(shift, range, "rotating hue");
            planes[0] = at(
                PipelineStage::Hue,
                self.backend.add_scalar_wrapping(&planes[0], shift, range),
            )?;
        }

        let hsv = at(
            PipelineStage::Hue,
            self.backend.merge(&planes, ColorSpace::Hsv),
        )?;
        let out = at(
            PipelineStage::Hue,
            self.backend.convert_color(&hsv, ColorConversion::HsvToRgb),
        )?;
        trace_stage(PipelineStage::Saturation, &out);
        Ok(out)
    }

    fn blur(
        &self,
        rgb: ImageMat,
        params: &AdjustmentParameters,
    ) -> Result<ImageMat, ApplicationError> {
        if params.blur <= 0.0 {
            return Ok(rgb);
        }
        let kernel = blur_kernel_size(params.blur);
        debug!(kernel, "blurring");
        at(PipelineStage::Blur, self.backend.gaussian_blur(&rgb, kernel))
    }

    fn sharpen(
        &self,
        rgb: ImageMat,
        params: &AdjustmentParameters,
    ) -> Result<ImageMat, ApplicationError> {
        if params.sharpen <= 0.0 {
            return Ok(rgb);
        }
        let amount = f64::from(params.sharpen) / 5.0;
        let blurred = at(
            PipelineStage::Sharpen,
            self.backend.gaussian_blur(&rgb, SHARPEN_MASK_KERNEL),
        )?;
        let out = at(
            PipelineStage::Sharpen,
            self.backend
                .add_weighted(&rgb, 1.0 + amount, &blurred, -amount, 0.0),
        )?;
        trace_stage(PipelineStage::Sharpen, &out);
        Ok(out)
    }

    fn filter(&self, rgb: ImageMat, filter: ColorFilter) -> Result<ImageMat, ApplicationError> {
        let stage = PipelineStage::Filter;
        match filter {
            ColorFilter::Normal => Ok(rgb),
            ColorFilter::Grayscale => {
                let gray = at(
                    stage,
                    self.backend.convert_color(&rgb, ColorConversion::RgbToGray),
                )?;
                at(
                    stage,
                    self.backend.convert_color(&gray, ColorConversion::GrayToRgb),
                )
            }
            ColorFilter::Sepia => at(stage, self.backend.transform(&rgb, &SEPIA_MATRIX)),
            ColorFilter::Invert => at(stage, self.backend.bitwise_not(&rgb)),
            ColorFilter::Cool => self.boost_channel(&rgb, 2),
            ColorFilter::Warm => self.boost_channel(&rgb, 0),
        }
    }

    fn boost_channel(&self, rgb: &ImageMat, channel: usize) -> Result<ImageMat, ApplicationError> {
        let stage = PipelineStage::Filter;
        let mut planes = at(stage, self.backend.split(rgb))?;
        let Some(plane) = planes.get_mut(channel) else {
            return Err(ApplicationError::processing(
                stage,
                BackendError::new("split", format!("missing channel {channel}")),
            ));
        };
        *plane = at(
            stage,
            self.backend.convert_scale(plane, TONE_GAIN, TONE_OFFSET),
        )?;
        at(stage, self.backend.merge(&planes, ColorSpace::Rgb))
    }

    fn finalize(&self, rgb: ImageMat, alpha: ImageMat) -> Result<RasterImage, ApplicationError> {
        let stage = PipelineStage::Finalize;
        let mut planes = at(stage, self.backend.split(&rgb))?;
        drop(rgb);
        planes.push(alpha);
        let rgba = at(stage, self.backend.merge(&planes, ColorSpace::Rgba))?;
        drop(planes);
        at(stage, self.backend.image_from_mat(&rgba))
    }
}

fn at<T>(stage: PipelineStage, result: Result<T, BackendError>) -> Result<T, ApplicationError> {
    result.map_err(|error| ApplicationError::processing(stage, error))
}

fn trace_stage(stage: PipelineStage, mat: &ImageMat) {
    debug!(
        stage = stage.name(),
        rows = mat.rows(),
        cols = mat.cols(),
        "stage applied"
    );
}
