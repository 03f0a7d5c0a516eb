//! Slurm backend: one `sbatch --parsable` call per stage

use std::collections::BTreeMap;
use std::process::Command;
use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info};
use crate::config::PipelineConfig;
use crate::models::{Dependency, JobId, SubmissionRequest};
use crate::scheduler::{render_command, JobScheduler};

/// Submits through the `sbatch` command line tool
#[derive(Debug, Clone)]
pub struct SlurmScheduler {
    program: String,
    extra_args: Vec<String>,
    env: BTreeMap<String, String>,
}

impl SlurmScheduler {
    pub fn from_config(config: &PipelineConfig) -> Self {
        SlurmScheduler {
            program: config.scheduler_program.clone(),
            extra_args: config.scheduler_args.clone(),
            env: config.scheduler_env.clone(),
        }
    }

    /// Arguments for `sbatch`, template last
    pub fn sbatch_args(&self, request: &SubmissionRequest) -> Vec<String> {
        sbatch_args(request, &self.extra_args)
    }
}

/// `sbatch` arguments for a request. `extra` goes just before the template.
pub fn sbatch_args(request: &SubmissionRequest, extra: &[String]) -> Vec<String> {
    let mut args = vec![
        "--parsable".to_string(),
        format!("--array={}", request.array_range),
        format!("--job-name={}", request.job_label),
    ];
    if let Some(dependency) = &request.dependency {
        args.push(format!("--dependency={}", dependency_spec(dependency)));
    }
    args.extend(extra.iter().cloned());
    args.push(request.template.to_string_lossy().to_string());
    args
}

/// Slurm dependency expression
pub fn dependency_spec(dependency: &Dependency) -> String {
    match dependency {
        Dependency::Correlated { on } => format!("aftercorr:{}", on),
    }
}

/// Job ID from `sbatch --parsable` output (`<id>` or `<id>;<cluster>`)
pub fn parse_job_id(stdout: &str) -> Option<JobId> {
    let line = stdout.lines().map(str::trim).find(|l| !l.is_empty())?;
    let id = line.split(';').next().unwrap_or(line);
    JobId::new(id)
}

impl JobScheduler for SlurmScheduler {
    fn submit(&mut self, request: &SubmissionRequest) -> Result<JobId> {
        let args = self.sbatch_args(request);
        debug!("Running {}", render_command(&self.program, &args));

        let output = Command::new(&self.program)
            .args(&args)
            .envs(&self.env)
            .output()
            .with_context(|| format!("Failed to run {}", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let status = match output.status.code() {
                Some(code) => format!("exit code {}", code),
                None => "terminated by signal".to_string(),
            };
            if stderr.is_empty() {
                bail!("{} failed ({})", self.program, status);
            }
            bail!("{} failed ({}): {}", self.program, status, stderr);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let job_id = parse_job_id(&stdout)
            .ok_or_else(|| anyhow!("{} returned no job ID", self.program))?;
        info!("Stage {} queued as job {}", request.stage, job_id);
        Ok(job_id)
    }
}
