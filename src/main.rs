use halo_pipeline::cli::{exit_code_for, internal_error, run, user_error};

fn main() {
    if let Err(e) = run() {
        if exit_code_for(&e) == 1 {
            // Operator can fix the cause and re-run
            user_error(&e.to_string());
        }

        // Show error chain if available
        let mut message = e.to_string();
        let mut source = e.source();
        if source.is_some() {
            message.push_str("\n\nCaused by:");
            let mut indent = 1;
            while let Some(err) = source {
                message.push_str(&format!("\n{:indent$}  {}", "", err));
                source = err.source();
                indent += 1;
            }
        }
        internal_error(&message);
    }
}
