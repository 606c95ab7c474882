use photo_adjust_domain::{AdjustmentParameters, ColorFilter, RasterImage};

use crate::{AdjustmentPipeline, ApplicationError};

/// A file handed over by the upload area, before validation.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct FilterPreview {
    pub filter: ColorFilter,
    pub label: &'static str,
    pub description: &'static str,
    pub image: RasterImage,
}

/// A pipeline run detached from the session so a front end can execute it
/// elsewhere and hand the outcome back through [`crate::EditSession::commit`].
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub sequence: u64,
    pub params: AdjustmentParameters,
    pub source: RasterImage,
}

impl RenderJob {
    pub fn run(self, pipeline: &AdjustmentPipeline) -> RenderOutcome {
        let result = pipeline.apply(Some(&self.source), &self.params);
        RenderOutcome {
            sequence: self.sequence,
            params: self.params,
            result,
        }
    }
}

#[derive(Debug)]
pub struct RenderOutcome {
    pub sequence: u64,
    pub params: AdjustmentParameters,
    pub result: Result<RasterImage, ApplicationError>,
}

/// What happened to a committed [`RenderOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStatus {
    Applied,
    /// A newer job was submitted after this one; its result was dropped.
    Stale,
}
