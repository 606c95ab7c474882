use photo_adjust_domain::{AdjustmentParameters, ColorFilter, RasterImage};
use tracing::{debug, info, instrument, warn};

use crate::{
    AdjustmentPipeline, ApplicationError, CommitStatus, DownloadArtifact, EditorConfig,
    FilterPreview, ImageDecoder, ImageEncoder, RenderJob, RenderOutcome, ThumbnailGenerator,
    Upload, UploadValidator,
};

/// State behind one editing session: the uploaded original, the last good
/// processed output and the current adjustment record.
pub struct EditSession {
    pipeline: AdjustmentPipeline,
    decoder: Box<dyn ImageDecoder>,
    encoder: Box<dyn ImageEncoder>,
    thumbnails: Box<dyn ThumbnailGenerator>,
    config: EditorConfig,
    validator: UploadValidator,
    params: AdjustmentParameters,
    original: Option<RasterImage>,
    processed: Option<RasterImage>,
    processing: bool,
    latest_sequence: u64,
}

impl EditSession {
    pub fn new(
        pipeline: AdjustmentPipeline,
        decoder: Box<dyn ImageDecoder>,
        encoder: Box<dyn ImageEncoder>,
        thumbnails: Box<dyn ThumbnailGenerator>,
        config: EditorConfig,
    ) -> Result<Self, ApplicationError> {
        config.validate()?;
        let validator = UploadValidator::new(&config);
        Ok(Self {
            pipeline,
            decoder,
            encoder,
            thumbnails,
            config,
            validator,
            params: AdjustmentParameters::default(),
            original: None,
            processed: None,
            processing: false,
            latest_sequence: 0,
        })
    }

    pub fn params(&self) -> AdjustmentParameters {
        self.params
    }

    pub fn original(&self) -> Option<&RasterImage> {
        self.original.as_ref()
    }

    pub fn processed(&self) -> Option<&RasterImage> {
        self.processed.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.original.is_some()
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &AdjustmentPipeline {
        &self.pipeline
    }

    /// Validates and decodes an upload. A rejected upload leaves the session as it was.
    #[instrument(skip_all, fields(file = %upload.file_name, size = upload.bytes.len()))]
    pub fn upload(&mut self, upload: Upload) -> Result<(), ApplicationError> {
        self.validator.validate(&upload)?;
        let image = match self.decoder.decode(&upload) {
            Ok(image) => image,
            Err(error) => {
                warn!(%error, "upload could not be decoded");
                self.processing = false;
                return Err(error);
            }
        };
        info!(
            width = image.width(),
            height = image.height(),
            "image uploaded"
        );
        self.processed = Some(image.clone());
        self.original = Some(image);
        Ok(())
    }

    /// Re-runs the pipeline with a complete parameter record. On failure the
    /// previous output stays in place.
    pub fn set_adjustments(&mut self, params: AdjustmentParameters) -> Result<(), ApplicationError> {
        let job = self.begin_render(params)?;
        let outcome = job.run(&self.pipeline);
        self.commit(outcome).map(|_| ())
    }

    /// Restores default parameters and reprocesses the original, if any.
    pub fn reset(&mut self) -> Result<(), ApplicationError> {
        let defaults = AdjustmentParameters::default();
        if !self.has_image() {
            self.params = defaults;
            return Ok(());
        }
        self.set_adjustments(defaults)
    }

    /// Records `params` as current and returns a job for the latest original.
    /// Rejected parameters leave the session untouched.
    pub fn begin_render(&mut self, params: AdjustmentParameters) -> Result<RenderJob, ApplicationError> {
        let source = self.original.clone().ok_or(ApplicationError::MissingSource)?;
        params.validate()?;
        self.latest_sequence += 1;
        self.params = params;
        self.processing = true;
        debug!(sequence = self.latest_sequence, "render submitted");
        Ok(RenderJob {
            sequence: self.latest_sequence,
            params,
            source,
        })
    }

    /// Accepts a finished job. Results older than the newest submitted job are
    /// discarded so the last parameter change wins.
    pub fn commit(&mut self, outcome: RenderOutcome) -> Result<CommitStatus, ApplicationError> {
        if outcome.sequence < self.latest_sequence {
            debug!(
                sequence = outcome.sequence,
                latest = self.latest_sequence,
                "discarding stale render"
            );
            return Ok(CommitStatus::Stale);
        }

        self.processing = false;
        match outcome.result {
            Ok(image) => {
                self.processed = Some(image);
                Ok(CommitStatus::Applied)
            }
            Err(error) => {
                warn!(%error, "render failed; keeping previous output");
                Err(error)
            }
        }
    }

    #[instrument(skip(self))]
    pub fn download(&self) -> Result<DownloadArtifact, ApplicationError> {
        let image = self.processed.as_ref().ok_or(ApplicationError::MissingSource)?;
        let bytes = self.encoder.encode_jpeg(image, self.config.export_quality)?;
        info!(bytes = bytes.len(), "export encoded");
        Ok(DownloadArtifact {
            file_name: self.config.export_file_name.clone(),
            mime_type: "image/jpeg",
            bytes,
        })
    }

    /// One thumbnail of the original per gallery filter, with no other adjustment.
    pub fn filter_previews(&self) -> Result<Vec<FilterPreview>, ApplicationError> {
        let original = self.original.as_ref().ok_or(ApplicationError::MissingSource)?;
        let thumb = self
            .thumbnails
            .thumbnail(original, self.config.thumbnail_size)?;

        ColorFilter::ALL
            .into_iter()
            .map(|filter| {
                let params = AdjustmentParameters::default().with_filter(filter);
                let image = self.pipeline.apply(Some(&thumb), &params)?;
                Ok(FilterPreview {
                    filter,
                    label: filter.label(),
                    description: filter.description(),
                    image,
                })
            })
            .collect()
    }
}
