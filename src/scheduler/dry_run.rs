//! Dry-run backend: records the `sbatch` command for each stage instead of running it

use anyhow::{anyhow, Result};
use log::info;
use crate::config::PipelineConfig;
use crate::models::{JobId, SubmissionRequest};
use crate::scheduler::slurm::sbatch_args;
use crate::scheduler::{render_command, JobScheduler};

/// Hands out `dry-run-1`, `dry-run-2`, ... and keeps the commands it would have run
#[derive(Debug, Clone)]
pub struct DryRunScheduler {
    program: String,
    extra_args: Vec<String>,
    commands: Vec<String>,
}

impl DryRunScheduler {
    pub fn from_config(config: &PipelineConfig) -> Self {
        DryRunScheduler {
            program: config.scheduler_program.clone(),
            extra_args: config.scheduler_args.clone(),
            commands: Vec::new(),
        }
    }

    /// Command lines in submission order
    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}

impl JobScheduler for DryRunScheduler {
    fn submit(&mut self, request: &SubmissionRequest) -> Result<JobId> {
        let command = render_command(&self.program, &sbatch_args(request, &self.extra_args));
        info!("Dry run: {}", command);
        self.commands.push(command);

        JobId::new(format!("dry-run-{}", self.commands.len()))
            .ok_or_else(|| anyhow!("empty dry-run job ID"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use crate::models::{Dependency, StageKind};

    #[test]
    fn test_dry_run_records_commands() {
        let mut scheduler = DryRunScheduler::from_config(&PipelineConfig::new("/soap"));
        let first = SubmissionRequest {
            stage: StageKind::Membership,
            template: PathBuf::from("t1.sh"),
            array_range: "0-6".to_string(),
            job_label: "HYDRO_FIDUCIAL".to_string(),
            dependency: None,
        };
        let id1 = scheduler.submit(&first).unwrap();
        assert_eq!(id1.as_str(), "dry-run-1");

        let second = SubmissionRequest {
            stage: StageKind::Properties,
            template: PathBuf::from("t2.sh"),
            dependency: Some(Dependency::Correlated { on: id1 }),
            ..first
        };
        let id2 = scheduler.submit(&second).unwrap();
        assert_eq!(id2.as_str(), "dry-run-2");

        assert_eq!(scheduler.commands(), &[
            "sbatch --parsable --array=0-6 --job-name=HYDRO_FIDUCIAL t1.sh".to_string(),
            "sbatch --parsable --array=0-6 --job-name=HYDRO_FIDUCIAL --dependency=aftercorr:dry-run-1 t2.sh".to_string(),
        ]);
    }
}
