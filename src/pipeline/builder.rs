// Array job request construction

use std::path::PathBuf;
use crate::models::{Dependency, DependencyMode, JobId, StageSpec, SubmissionRequest};

/// Build the submission request for one stage.
///
/// The array range is relayed verbatim so that index `i` names the same
/// snapshot in every stage. A correlated dependency on `previous` is attached
/// only when the stage asks for one.
pub fn build_request(
    spec: &StageSpec,
    template: PathBuf,
    array_range: &str,
    model: &str,
    previous: Option<&JobId>,
) -> SubmissionRequest {
    let dependency = match spec.dependency {
        DependencyMode::None => None,
        DependencyMode::AfterCorrelated => previous.map(|id| Dependency::Correlated { on: id.clone() }),
    };

    SubmissionRequest {
        stage: spec.kind,
        template,
        array_range: array_range.to_string(),
        job_label: model.to_string(),
        dependency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StageKind, STAGES};

    #[test]
    fn test_first_stage_has_no_dependency() {
        let prev = JobId::new("99").unwrap();
        let req = build_request(&STAGES[0], PathBuf::from("a.sh"), "0-6", "HYDRO_FIDUCIAL", Some(&prev));
        assert_eq!(req.stage, StageKind::Membership);
        assert_eq!(req.dependency, None);
    }

    #[test]
    fn test_correlated_dependency_on_previous_job() {
        let prev = JobId::new("1001").unwrap();
        let req = build_request(&STAGES[2], PathBuf::from("c.sh"), "0-6", "HYDRO_FIDUCIAL", Some(&prev));
        assert_eq!(req.stage, StageKind::CompressMembership);
        assert_eq!(req.dependency, Some(Dependency::Correlated { on: prev.clone() }));
        assert_eq!(req.depends_on(), Some(&prev));
    }

    #[test]
    fn test_fields_are_relayed_unchanged() {
        let req = build_request(&STAGES[1], PathBuf::from("b.sh"), " 0-77:7 ", "DMO_FIDUCIAL", None);
        assert_eq!(req.array_range, " 0-77:7 ");
        assert_eq!(req.job_label, "DMO_FIDUCIAL");
        assert_eq!(req.template, PathBuf::from("b.sh"));
        assert_eq!(req.dependency, None);
    }
}
