// Result reporting: job IDs and log location for the operator

use std::io::{self, Write};
use serde::Serialize;
use crate::models::{JobId, SubmissionResult};
use crate::pipeline::executor::{PipelineReport, PipelineState};

/// `scancel` line for jobs left queued by a failed run
pub fn cancel_hint(submitted: &[SubmissionResult]) -> Option<String> {
    if submitted.is_empty() {
        return None;
    }
    let ids: Vec<&str> = submitted.iter().map(|r| r.job_id.as_str()).collect();
    Some(format!("scancel {}", ids.join(" ")))
}

/// Plain-text report
pub fn write_text_report(report: &PipelineReport, out: &mut dyn Write) -> io::Result<()> {
    match &report.run {
        Some(run) => writeln!(
            out,
            "Run {} (box {}, model {}), snapshots {}",
            run, run.box_size, run.model, report.array_range
        )?,
        None => writeln!(out, "Snapshots {}", report.array_range)?,
    }
    writeln!(out, "Started {}", report.started_at.format("%Y-%m-%d %H:%M:%S"))?;

    for result in &report.submitted {
        match &result.depends_on {
            Some(dep) => writeln!(
                out,
                "  {:<20} {:<12} (after {}, per array index)",
                result.stage.as_str(), result.job_id, dep
            )?,
            None => writeln!(out, "  {:<20} {}", result.stage.as_str(), result.job_id)?,
        }
    }

    writeln!(out, "Logs: {}", report.log_dir.display())?;

    if let PipelineState::Failed(_) = report.state {
        if let Some(hint) = cancel_hint(&report.submitted) {
            writeln!(out, "Jobs above are still queued and will never run their dependent stages.")?;
            writeln!(out, "Cancel them with: {}", hint)?;
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct JsonJob<'a> {
    stage: &'a str,
    job_id: &'a JobId,
    depends_on: Option<&'a JobId>,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    run: Option<String>,
    box_size: Option<&'a str>,
    model: Option<&'a str>,
    range: &'a str,
    log_dir: String,
    started_at: String,
    status: &'static str,
    jobs: Vec<JsonJob<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failed_stage: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    /// Scheduler commands, dry runs only
    #[serde(skip_serializing_if = "Option::is_none")]
    commands: Option<&'a [String]>,
}

/// JSON report (for scripting around the pipeline).
///
/// `dry_run_commands` is included as `commands` when given.
pub fn json_report(report: &PipelineReport, dry_run_commands: Option<&[String]>) -> serde_json::Value {
    let error = report.error();
    let doc = JsonReport {
        run: report.run.as_ref().map(|r| r.identifier()),
        box_size: report.run.as_ref().map(|r| r.box_size.as_str()),
        model: report.run.as_ref().map(|r| r.model.as_str()),
        range: &report.array_range,
        log_dir: report.log_dir.display().to_string(),
        started_at: report.started_at.to_rfc3339(),
        status: if report.is_complete() { "complete" } else { "failed" },
        jobs: report.submitted.iter().map(|r| JsonJob {
            stage: r.stage.as_str(),
            job_id: &r.job_id,
            depends_on: r.depends_on.as_ref(),
        }).collect(),
        failed_stage: error.and_then(|e| e.stage()).map(|s| s.as_str()),
        error: error.map(|e| e.to_string()),
        commands: dry_run_commands,
    };
    serde_json::to_value(&doc).unwrap_or(serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use chrono::Local;
    use crate::error::PipelineError;
    use crate::models::{RunDescriptor, StageKind};

    fn result(stage: StageKind, id: &str, dep: Option<&str>) -> SubmissionResult {
        SubmissionResult {
            stage,
            job_id: JobId::new(id).unwrap(),
            depends_on: dep.and_then(|d| JobId::new(d)),
        }
    }

    fn report(state: PipelineState, submitted: Vec<SubmissionResult>) -> PipelineReport {
        PipelineReport {
            started_at: Local::now(),
            run: Some(RunDescriptor { box_size: "L1000N1800".to_string(), model: "HYDRO_FIDUCIAL".to_string() }),
            array_range: "0-6".to_string(),
            log_dir: PathBuf::from("/soap/logs"),
            submitted,
            state,
            history: Vec::new(),
        }
    }

    fn render(report: &PipelineReport) -> String {
        let mut buf = Vec::new();
        write_text_report(report, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_text_report_lists_jobs_in_order() {
        let r = report(PipelineState::Complete, vec![
            result(StageKind::Membership, "101", None),
            result(StageKind::Properties, "102", Some("101")),
        ]);
        let text = render(&r);
        assert!(text.contains("L1000N1800/HYDRO_FIDUCIAL"));
        let first = text.find("101").unwrap();
        let second = text.find("102").unwrap();
        assert!(first < second);
        assert!(text.contains("after 101"));
        assert!(text.contains("Logs: /soap/logs"));
        assert!(!text.contains("scancel"));
    }

    #[test]
    fn test_text_report_suggests_cancel_on_failure() {
        let err = PipelineError::SubmissionRejected { stage: StageKind::CompressMembership, cause: "denied".to_string() };
        let r = report(PipelineState::Failed(err), vec![
            result(StageKind::Membership, "101", None),
            result(StageKind::Properties, "102", Some("101")),
        ]);
        assert!(render(&r).contains("scancel 101 102"));
    }

    #[test]
    fn test_cancel_hint_empty() {
        assert_eq!(cancel_hint(&[]), None);
    }

    #[test]
    fn test_json_report() {
        let err = PipelineError::SubmissionRejected { stage: StageKind::Properties, cause: "denied".to_string() };
        let r = report(PipelineState::Failed(err), vec![result(StageKind::Membership, "101", None)]);
        let json = json_report(&r, None);
        assert_eq!(json["status"], "failed");
        assert_eq!(json["range"], "0-6");
        assert!(json.get("commands").is_none());
        assert_eq!(json["model"], "HYDRO_FIDUCIAL");
        assert_eq!(json["failed_stage"], "properties");
        assert_eq!(json["jobs"][0]["stage"], "membership");
        assert_eq!(json["jobs"][0]["job_id"], "101");
        assert!(json["jobs"][0]["depends_on"].is_null());
    }

    #[test]
    fn test_json_report_lists_dry_run_commands() {
        let r = report(PipelineState::Complete, vec![
            result(StageKind::Membership, "dry-run-1", None),
            result(StageKind::Properties, "dry-run-2", Some("dry-run-1")),
        ]);
        let commands = vec![
            "sbatch --parsable --array=0-6 --job-name=HYDRO_FIDUCIAL a.sh".to_string(),
            "sbatch --parsable --array=0-6 --job-name=HYDRO_FIDUCIAL --dependency=aftercorr:dry-run-1 b.sh".to_string(),
        ];
        let json = json_report(&r, Some(&commands));
        assert_eq!(json["status"], "complete");
        assert_eq!(json["commands"].as_array().unwrap().len(), 2);
        assert_eq!(json["commands"][1], commands[1].as_str());
    }
}
