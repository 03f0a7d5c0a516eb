//! Batch scheduler boundary
//!
//! The orchestrator only needs "submit this, give me a job ID". Everything
//! else (queueing, enforcing dependencies, running array elements) is the
//! scheduler's business.

pub mod dry_run;
pub mod slurm;

pub use dry_run::DryRunScheduler;
pub use slurm::SlurmScheduler;

use anyhow::Result;
use crate::models::{JobId, SubmissionRequest};

/// Something that accepts array-job submissions
pub trait JobScheduler {
    /// Queue one stage and return its job ID.
    ///
    /// Returns once the scheduler has acknowledged the submission; never waits
    /// for the job to run.
    fn submit(&mut self, request: &SubmissionRequest) -> Result<JobId>;
}

/// Quote an argument for display as part of a shell command line
pub fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg.chars().all(|c| c.is_ascii_alphanumeric() || "_-./=:,^@%+".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}

/// Render a program and its arguments as a single command line
pub fn render_command(program: &str, args: &[String]) -> String {
    std::iter::once(shell_quote(program))
        .chain(args.iter().map(|a| shell_quote(a)))
        .collect::<Vec<_>>()
        .join(" ")
}
