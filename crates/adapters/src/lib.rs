pub mod backend;
pub mod codec;
pub mod fs;
pub mod thumbs;

pub use backend::ImageprocBackend;
pub use codec::ImageCrateCodec;
pub use fs::FsImageSource;
pub use thumbs::ImageThumbnailGenerator;

use photo_adjust_application::{AdjustmentPipeline, ApplicationError, EditSession, EditorConfig};

/// Wires an [`EditSession`] to the `image`/`imageproc` adapters.
pub fn build_edit_session(config: EditorConfig) -> Result<EditSession, ApplicationError> {
    EditSession::new(
        AdjustmentPipeline::new(Box::new(ImageprocBackend::new())),
        Box::new(ImageCrateCodec),
        Box::new(ImageCrateCodec),
        Box::new(ImageThumbnailGenerator),
        config,
    )
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{DynamicImage, ImageFormat, RgbaImage};
    use photo_adjust_domain::{AdjustmentParameters, ColorFilter};
    use tempfile::TempDir;

    use super::*;

    fn write_png(dir: &TempDir, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let image = RgbaImage::from_fn(width, height, |x, _y| {
            if x < width / 2 {
                image::Rgba([0, 0, 0, 255])
            } else {
                image::Rgba([255, 255, 255, 255])
            }
        });
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("encode");
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).expect("write");
        path
    }

    #[test]
    fn upload_edit_and_download_from_disk() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_png(&dir, "split.png", 4, 2);
        let mut session = build_edit_session(EditorConfig::default()).expect("session");

        let upload = FsImageSource.read(&path).expect("read");
        session.upload(upload).expect("upload");
        session
            .set_adjustments(AdjustmentParameters::default().with_flip_horizontal(true))
            .expect("flip");

        let processed = session.processed().expect("processed");
        assert_eq!(processed.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(processed.pixel(3, 1), Some([0, 0, 0, 255]));

        let artifact = session.download().expect("download");
        assert_eq!(artifact.file_name, "edited-image.jpg");
        assert_eq!(&artifact.bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn oversized_upload_is_rejected_before_decoding() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_png(&dir, "big.png", 64, 64);
        let config = EditorConfig {
            max_upload_bytes: 16,
            ..EditorConfig::default()
        };
        let mut session = build_edit_session(config).expect("session");

        let result = session.upload(FsImageSource.read(&path).expect("read"));
        assert!(matches!(
            result,
            Err(ApplicationError::UnsupportedFormat(_))
        ));
        assert!(!session.has_image());
    }

    #[test]
    fn filter_previews_cover_the_gallery() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_png(&dir, "wide.png", 400, 200);
        let mut session = build_edit_session(EditorConfig::default()).expect("session");
        session
            .upload(FsImageSource.read(&path).expect("read"))
            .expect("upload");

        let previews = session.filter_previews().expect("previews");
        let filters: Vec<_> = previews.iter().map(|preview| preview.filter).collect();
        assert_eq!(filters, ColorFilter::ALL.to_vec());
        for preview in &previews {
            assert_eq!((preview.image.width(), preview.image.height()), (150, 75));
        }
        let invert = &previews[3];
        assert_eq!(invert.label, "Invert");
        assert_eq!(invert.image.pixel(0, 0), Some([255, 255, 255, 255]));
    }
}
