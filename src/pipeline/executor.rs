//! Stage submission
//!
//! Runs the pipeline state machine:
//!
//! ```text
//! Idle -> ResolvingIdentifier -> LocatingTemplates -> Submitting(1..4) -> Complete
//! ```
//!
//! Any step can move to `Failed`. Stages already queued when a later stage
//! fails are left in the scheduler and stay in the report.

use std::path::PathBuf;
use chrono::{DateTime, Local};
use log::{debug, info, warn};
use crate::config::PipelineConfig;
use crate::descriptor::parse_run_identifier;
use crate::error::PipelineError;
use crate::models::{JobId, RunDescriptor, StageKind, SubmissionResult, STAGES};
use crate::pipeline::builder::build_request;
use crate::scheduler::JobScheduler;
use crate::templates::TemplateSet;

/// Where the pipeline is (or stopped)
#[derive(Debug)]
pub enum PipelineState {
    Idle,
    ResolvingIdentifier,
    LocatingTemplates,
    Submitting(StageKind),
    Complete,
    Failed(PipelineError),
}

impl PipelineState {
    pub fn name(&self) -> String {
        match self {
            PipelineState::Idle => "idle".to_string(),
            PipelineState::ResolvingIdentifier => "resolving-identifier".to_string(),
            PipelineState::LocatingTemplates => "locating-templates".to_string(),
            PipelineState::Submitting(stage) => format!("submitting({}/{} {})", stage.ordinal(), STAGES.len(), stage),
            PipelineState::Complete => "complete".to_string(),
            PipelineState::Failed(_) => "failed".to_string(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Complete | PipelineState::Failed(_))
    }
}

/// Outcome of one pipeline invocation
#[derive(Debug)]
pub struct PipelineReport {
    pub started_at: DateTime<Local>,
    pub run: Option<RunDescriptor>,
    pub array_range: String,
    pub log_dir: PathBuf,
    /// Accepted stages in submission order
    pub submitted: Vec<SubmissionResult>,
    pub state: PipelineState,
    /// Names of the states passed through, `idle` first
    pub history: Vec<String>,
}

impl PipelineReport {
    pub fn is_complete(&self) -> bool {
        matches!(self.state, PipelineState::Complete)
    }

    pub fn error(&self) -> Option<&PipelineError> {
        match &self.state {
            PipelineState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn job_id(&self, stage: StageKind) -> Option<&JobId> {
        self.submitted.iter().find(|r| r.stage == stage).map(|r| &r.job_id)
    }

    /// Submitted stages, or the error that stopped the pipeline
    pub fn into_result(self) -> Result<Vec<SubmissionResult>, PipelineError> {
        match self.state {
            PipelineState::Failed(err) => Err(err),
            _ => Ok(self.submitted),
        }
    }
}

/// Resolve the run, locate its templates and submit all four stages.
///
/// Never returns early with an error: failures end up in
/// [`PipelineReport::state`] alongside whatever was already submitted.
pub fn run_pipeline(
    config: &PipelineConfig,
    identifier: &str,
    array_range: &str,
    scheduler: &mut dyn JobScheduler,
) -> PipelineReport {
    let mut executor = Executor {
        report: PipelineReport {
            started_at: Local::now(),
            run: None,
            array_range: array_range.to_string(),
            log_dir: config.log_dir.clone(),
            submitted: Vec::new(),
            state: PipelineState::Idle,
            history: vec![PipelineState::Idle.name()],
        },
    };

    if let Err(err) = executor.execute(config, identifier, scheduler) {
        executor.fail(err);
    }
    debug_assert!(executor.report.state.is_terminal(), "pipeline stopped in {}", executor.report.state.name());
    debug!("Pipeline states: {}", executor.report.history.join(" -> "));
    executor.report
}

struct Executor {
    report: PipelineReport,
}

impl Executor {
    fn transition(&mut self, next: PipelineState) {
        debug!("Pipeline state: {} -> {}", self.report.state.name(), next.name());
        self.report.history.push(next.name());
        self.report.state = next;
    }

    fn fail(&mut self, err: PipelineError) {
        if !self.report.submitted.is_empty() {
            let queued: Vec<&str> = self.report.submitted.iter().map(|r| r.job_id.as_str()).collect();
            warn!("Pipeline failed after queueing jobs {}; they are not cancelled", queued.join(", "));
        }
        self.transition(PipelineState::Failed(err));
    }

    fn execute(
        &mut self,
        config: &PipelineConfig,
        identifier: &str,
        scheduler: &mut dyn JobScheduler,
    ) -> Result<(), PipelineError> {
        self.transition(PipelineState::ResolvingIdentifier);
        config.check_work_dir()?;
        let run = parse_run_identifier(identifier)?;
        info!("Run {} (box {}, model {})", run, run.box_size, run.model);
        self.report.run = Some(run.clone());

        self.transition(PipelineState::LocatingTemplates);
        let templates = TemplateSet::locate(&config.templates_root, &run)?;
        config.ensure_log_dir()?;

        let mut previous: Option<JobId> = None;
        for spec in STAGES.iter() {
            self.transition(PipelineState::Submitting(spec.kind));

            let template = templates.require(spec.kind)?;
            let request = build_request(spec, template, &self.report.array_range, &run.model, previous.as_ref());

            let job_id = scheduler.submit(&request).map_err(|e| PipelineError::SubmissionRejected {
                stage: spec.kind,
                cause: format!("{:#}", e),
            })?;

            self.report.submitted.push(SubmissionResult {
                stage: spec.kind,
                job_id: job_id.clone(),
                depends_on: request.depends_on().cloned(),
            });
            previous = Some(job_id);
        }

        self.transition(PipelineState::Complete);
        Ok(())
    }
}
