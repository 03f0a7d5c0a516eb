//! Pipeline error types.
//!
//! Every variant is fatal to the run. Nothing is retried and stages that were
//! already queued are left in place.

use std::path::PathBuf;
use thiserror::Error;
use crate::models::{RunSegment, StageKind};

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Run identifier is not of the form `L####N####/MODEL`
    #[error("Malformed run identifier '{identifier}': could not extract the {segment} segment (expected L####N####/MODEL)")]
    MalformedRunIdentifier {
        identifier: String,
        segment: RunSegment,
    },

    /// Working directory does not look like a pipeline checkout
    #[error("Must be run from the pipeline directory (no {} found)", .marker.display())]
    NotPipelineDirectory { marker: PathBuf },

    /// No templates exist for this box size
    #[error("Template directory not found: {}", .path.display())]
    MissingTemplateDirectory { path: PathBuf },

    /// Template for one stage is missing
    #[error("Template for stage {stage} not found: {}", .path.display())]
    MissingStageTemplate { stage: StageKind, path: PathBuf },

    /// Scheduler refused (or could not be asked to take) the job
    #[error("Submission of stage {stage} rejected: {cause}")]
    SubmissionRejected { stage: StageKind, cause: String },

    /// Log directory could not be created
    #[error("Failed to create log directory {}", .path.display())]
    LogDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Stage the error is attributed to, if any
    pub fn stage(&self) -> Option<StageKind> {
        match self {
            PipelineError::MissingStageTemplate { stage, .. }
            | PipelineError::SubmissionRejected { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// True when the operator can fix the cause and re-run (exit code 1)
    pub fn is_user_error(&self) -> bool {
        !matches!(self, PipelineError::LogDirectory { .. })
    }
}
