use image::DynamicImage;
use photo_adjust_application::{ApplicationError, ThumbnailGenerator};
use photo_adjust_domain::RasterImage;

use crate::codec::to_rgba_image;

#[derive(Debug, Default)]
pub struct ImageThumbnailGenerator;

impl ThumbnailGenerator for ImageThumbnailGenerator {
    fn thumbnail(&self, image: &RasterImage, max_side: u32) -> Result<RasterImage, ApplicationError> {
        if max_side == 0 {
            return Err(ApplicationError::InvalidConfig(
                "thumbnail size must be positive".to_string(),
            ));
        }
        if image.width() <= max_side && image.height() <= max_side {
            return Ok(image.clone());
        }

        let thumb = DynamicImage::ImageRgba8(to_rgba_image(image)?)
            .thumbnail(max_side, max_side)
            .to_rgba8();
        let (width, height) = thumb.dimensions();
        RasterImage::from_rgba(width, height, thumb.into_raw()).map_err(ApplicationError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downscales_keeping_aspect_ratio() {
        let image = RasterImage::from_fn(500, 300, |_x, _y| [10, 20, 30, 255]).expect("image");
        let thumb = ImageThumbnailGenerator
            .thumbnail(&image, 150)
            .expect("thumbnail");
        assert_eq!((thumb.width(), thumb.height()), (150, 90));
    }

    #[test]
    fn small_images_are_not_upscaled() {
        let image = RasterImage::from_fn(40, 20, |_x, _y| [1, 2, 3, 255]).expect("image");
        let thumb = ImageThumbnailGenerator.thumbnail(&image, 150).expect("thumbnail");
        assert_eq!(thumb, image);
    }
}
