use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use photo_adjust_application::{ApplicationError, ImageDecoder, ImageEncoder, Upload};
use photo_adjust_domain::{ImageKind, RasterImage};
use tracing::{debug, instrument};

/// Decodes uploads and encodes exports with the `image` crate.
#[derive(Debug, Default)]
pub struct ImageCrateCodec;

impl ImageDecoder for ImageCrateCodec {
    #[instrument(skip_all, fields(file = %upload.file_name, mime = %upload.mime_type))]
    fn decode(&self, upload: &Upload) -> Result<RasterImage, ApplicationError> {
        let format = match ImageKind::from_mime(&upload.mime_type) {
            ImageKind::Jpeg => ImageFormat::Jpeg,
            ImageKind::Png => ImageFormat::Png,
            ImageKind::Webp => ImageFormat::WebP,
            ImageKind::Unsupported => {
                return Err(ApplicationError::UnsupportedFormat(format!(
                    "unsupported image type: {}",
                    upload.mime_type
                )))
            }
        };

        let decoded = image::load_from_memory_with_format(&upload.bytes, format)
            .map_err(|error| ApplicationError::Decode(error.to_string()))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        debug!(width, height, "decoded upload");
        RasterImage::from_rgba(width, height, rgba.into_raw())
            .map_err(|error| ApplicationError::Decode(error.to_string()))
    }
}

impl ImageEncoder for ImageCrateCodec {
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    fn encode_jpeg(&self, image: &RasterImage, quality: u8) -> Result<Vec<u8>, ApplicationError> {
        let rgba = to_rgba_image(image)?;
        // JPEG has no alpha channel.
        let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();

        let mut buffer = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
        rgb.write_with_encoder(encoder)
            .map_err(|error| ApplicationError::Encode(error.to_string()))?;
        Ok(buffer)
    }
}

pub(crate) fn to_rgba_image(image: &RasterImage) -> Result<RgbaImage, ApplicationError> {
    RgbaImage::from_raw(image.width(), image.height(), image.as_raw().to_vec()).ok_or_else(|| {
        ApplicationError::Encode("pixel buffer does not match image dimensions".to_string())
    })
}
