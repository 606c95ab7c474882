use std::path::Path;

use crate::DomainError;

/// Upload formats the editor knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
    Unsupported,
}

impl ImageKind {
    pub fn from_mime(mime: &str) -> Self {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            "image/png" => Self::Png,
            "image/webp" => Self::Webp,
            _ => Self::Unsupported,
        }
    }

    pub fn mime_type(self) -> Option<&'static str> {
        match self {
            Self::Jpeg => Some("image/jpeg"),
            Self::Png => Some("image/png"),
            Self::Webp => Some("image/webp"),
            Self::Unsupported => None,
        }
    }

    /// Short name shown to users, e.g. `jpeg` for `image/jpeg`.
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Unsupported => "unsupported",
        }
    }
}

pub fn detect_image_kind(path: &Path) -> ImageKind {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return ImageKind::Unsupported;
    };

    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => ImageKind::Jpeg,
        "png" => ImageKind::Png,
        "webp" => ImageKind::Webp,
        _ => ImageKind::Unsupported,
    }
}

/// A decoded RGBA8 image. The pixel buffer cannot be changed after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    pub const CHANNELS: usize = 4;

    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, DomainError> {
        if width == 0 || height == 0 {
            return Err(DomainError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize * Self::CHANNELS;
        if pixels.len() != expected {
            return Err(DomainError::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Builds an image by evaluating `pixel` at every coordinate.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut pixel: impl FnMut(u32, u32) -> [u8; 4],
    ) -> Result<Self, DomainError> {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * Self::CHANNELS);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&pixel(x, y));
            }
        }
        Self::from_rgba(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        let mut out = [0_u8; 4];
        out.copy_from_slice(&self.pixels[offset..offset + Self::CHANNELS]);
        Some(out)
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    pub fn is_opaque(&self) -> bool {
        self.pixels
            .chunks_exact(Self::CHANNELS)
            .all(|pixel| pixel[3] == u8::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_kind_detection_works() {
        assert_eq!(detect_image_kind(Path::new("a.JPG")), ImageKind::Jpeg);
        assert_eq!(detect_image_kind(Path::new("a.png")), ImageKind::Png);
        assert_eq!(detect_image_kind(Path::new("a.webp")), ImageKind::Webp);
        assert_eq!(
            detect_image_kind(Path::new("a.gif")),
            ImageKind::Unsupported
        );
        assert_eq!(detect_image_kind(Path::new("noext")), ImageKind::Unsupported);
    }

    #[test]
    fn mime_detection_matches_accepted_uploads() {
        assert_eq!(ImageKind::from_mime("image/jpeg"), ImageKind::Jpeg);
        assert_eq!(ImageKind::from_mime("IMAGE/PNG"), ImageKind::Png);
        assert_eq!(ImageKind::from_mime("image/webp"), ImageKind::Webp);
        assert_eq!(ImageKind::from_mime("image/gif"), ImageKind::Unsupported);
        assert_eq!(ImageKind::Png.mime_type(), Some("image/png"));
    }

    #[test]
    fn raster_rejects_bad_buffers() {
        assert!(matches!(
            RasterImage::from_rgba(0, 2, Vec::new()),
            Err(DomainError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            RasterImage::from_rgba(2, 2, vec![0; 15]),
            Err(DomainError::BufferSizeMismatch {
                expected: 16,
                actual: 15
            })
        ));
    }

    #[test]
    fn raster_pixel_lookup_is_row_major() {
        let image = RasterImage::from_fn(2, 2, |x, y| [x as u8, y as u8, 0, 255]).expect("image");
        assert_eq!(image.pixel(1, 0), Some([1, 0, 0, 255]));
        assert_eq!(image.pixel(0, 1), Some([0, 1, 0, 255]));
        assert_eq!(image.pixel(2, 0), None);
        assert!(image.is_opaque());
    }
}
