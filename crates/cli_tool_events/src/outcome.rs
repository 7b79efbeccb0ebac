//! Outcome Classifier.

use crate::normalized::ExitCode;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Outcome {
    pub success: bool,
    pub has_output: bool,
    /// stdout when non-empty, otherwise stderr.
    pub response: String,
}

/// Success follows the exit code. Without one, a run only counts as
/// successful when it produced some output; silence with no status is an
/// inconclusive failure.
pub fn classify_outcome(stdout: &str, stderr: &str, exit_code: ExitCode) -> Outcome {
    let has_output = !stdout.is_empty() || !stderr.is_empty();
    let success = match exit_code {
        ExitCode::Known(code) => code == 0,
        ExitCode::Unknown => has_output,
    };
    let response = if !stdout.is_empty() { stdout } else { stderr };
    Outcome {
        success,
        has_output,
        response: response.to_string(),
    }
}
