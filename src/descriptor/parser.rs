//! Run identifier parser
//!
//! The box size and the model are extracted independently: the box size is the
//! leading `L<digits>N<digits>` token of the identifier, the model is whatever
//! follows the first `/`.

use crate::error::PipelineError;
use crate::models::{RunDescriptor, RunSegment};

/// Parse a run identifier of the form `L####N####/MODEL`
pub fn parse_run_identifier(identifier: &str) -> Result<RunDescriptor, PipelineError> {
    let identifier = identifier.trim();
    let box_size = extract_box_size(identifier);
    let model = extract_model(identifier);

    match (box_size, model) {
        (Some(box_size), Some(model)) => Ok(RunDescriptor {
            box_size: box_size.to_string(),
            model: model.to_string(),
        }),
        (None, _) => Err(malformed(identifier, RunSegment::BoxSize)),
        (Some(_), None) => Err(malformed(identifier, RunSegment::Model)),
    }
}

fn malformed(identifier: &str, segment: RunSegment) -> PipelineError {
    PipelineError::MalformedRunIdentifier {
        identifier: identifier.to_string(),
        segment,
    }
}

/// Leading `L<digits>N<digits>` token. It must make up the whole first path segment.
pub fn extract_box_size(identifier: &str) -> Option<&str> {
    let first = identifier.split('/').next()?;
    let rest = first.strip_prefix('L')?;
    let (length, resolution) = rest.split_once('N')?;

    if is_digits(length) && is_digits(resolution) {
        Some(first)
    } else {
        None
    }
}

/// Everything after the first `/`, if non-empty
pub fn extract_model(identifier: &str) -> Option<&str> {
    let (_, model) = identifier.split_once('/')?;
    if model.trim().is_empty() {
        None
    } else {
        Some(model)
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
