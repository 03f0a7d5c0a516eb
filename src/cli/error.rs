// Error handling utilities for consistent error messages and exit codes

use std::process;
use crate::error::PipelineError;

/// Exit with a user error (exit code 1)
/// User errors are for bad arguments, missing templates, rejected submissions, etc.
pub fn user_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Exit with an internal error (exit code >1)
/// Internal errors are for unexpected system failures (I/O, unreadable config).
pub fn internal_error(message: &str) -> ! {
    eprintln!("Internal error: {}", message);
    process::exit(2);
}

/// Print a clap usage message and exit with code 1
pub fn usage_error(rendered: &str) -> ! {
    eprint!("{}", rendered);
    process::exit(1);
}

/// Exit code for an error returned from `run`
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<PipelineError>() {
        Some(pipeline_err) if pipeline_err.is_user_error() => 1,
        _ => 2,
    }
}
