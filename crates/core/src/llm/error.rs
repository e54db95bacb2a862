use std::fmt;

/// Error carrying enough of the model exchange to debug a bad completion
/// without re-running it.
#[derive(Debug, Clone)]
pub struct LlmDiagnosticsError {
    pub client: &'static str,
    pub stage: &'static str,
    pub detail: String,
    pub raw_output: Option<String>,
}

impl fmt::Display for LlmDiagnosticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "model call failed (client={}, stage={}): {}",
            self.client, self.stage, self.detail
        )
    }
}

impl std::error::Error for LlmDiagnosticsError {}
