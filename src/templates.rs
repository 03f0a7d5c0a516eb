//! Job template location
//!
//! Templates live in one directory per box size:
//! `<templates_root>/<box>/<stage stem>_<box>.sh`.

use std::path::{Path, PathBuf};
use log::debug;
use crate::error::PipelineError;
use crate::models::{RunDescriptor, StageKind};

/// Template paths for one box size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    dir: PathBuf,
    box_size: String,
}

impl TemplateSet {
    /// Find the template directory for the run's box size.
    ///
    /// Only the directory is checked here. Individual templates are checked
    /// by [`TemplateSet::require`] right before their stage is submitted.
    pub fn locate(templates_root: &Path, run: &RunDescriptor) -> Result<Self, PipelineError> {
        let dir = templates_root.join(&run.box_size);
        if !dir.is_dir() {
            return Err(PipelineError::MissingTemplateDirectory { path: dir });
        }
        debug!("Using templates in {}", dir.display());
        Ok(TemplateSet { dir, box_size: run.box_size.clone() })
    }

    /// Template path for a stage, whether or not it exists
    pub fn path_for(&self, stage: StageKind) -> PathBuf {
        self.dir.join(format!("{}_{}.sh", stage.template_stem(), self.box_size))
    }

    /// Template path for a stage, failing if the file is missing
    pub fn require(&self, stage: StageKind) -> Result<PathBuf, PipelineError> {
        let path = self.path_for(stage);
        if path.is_file() {
            Ok(path)
        } else {
            Err(PipelineError::MissingStageTemplate { stage, path })
        }
    }
}
