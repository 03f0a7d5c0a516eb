use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::models::StageKind;

/// Job ID handed back by the scheduler
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Wrap a scheduler job ID. Returns None for blank input.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(JobId(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

/// Dependency attached to a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Dependency {
    /// Array element `i` starts only after element `i` of `on` succeeds
    Correlated { on: JobId },
}

impl Dependency {
    pub fn job_id(&self) -> &JobId {
        match self {
            Dependency::Correlated { on } => on,
        }
    }
}

/// Everything the scheduler needs to queue one stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub stage: StageKind,
    pub template: PathBuf,
    /// Scheduler-native array range, passed through verbatim
    pub array_range: String,
    pub job_label: String,
    pub dependency: Option<Dependency>,
}

impl SubmissionRequest {
    pub fn depends_on(&self) -> Option<&JobId> {
        self.dependency.as_ref().map(|d| d.job_id())
    }
}

/// Stage accepted by the scheduler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub stage: StageKind,
    pub job_id: JobId,
    pub depends_on: Option<JobId>,
}
