//! Error taxonomy for prlint.

use thiserror::Error;

/// Errors produced by a [`RepoHost`](crate::host::RepoHost) implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The requested file, directory entry or comment does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The API answered with a non-success status
    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// The request never got a response
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was not in the expected shape
    #[error("could not decode response: {0}")]
    Decode(String),
}

/// Terminal errors for a lint run.
#[derive(Error, Debug)]
pub enum LintError {
    /// The triggering event is not a pull request or lacks required fields
    #[error("{0}")]
    Context(String),

    /// No rule document at the configured path for the commit
    #[error("{path} does not exist at {reference}")]
    ConfigMissing { path: String, reference: String },

    /// The rule document is not valid UTF-8, YAML or rule schema
    #[error("invalid configuration: {0}")]
    ConfigParse(String),

    /// A call to the repository host failed
    #[error("remote API error: {0}")]
    RemoteApi(#[from] HostError),

    /// A required input is missing or empty
    #[error("{0}")]
    InvalidInput(String),
}

impl LintError {
    /// Short machine-friendly name of the error class, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            LintError::Context(_) => "context",
            LintError::ConfigMissing { .. } => "config_missing",
            LintError::ConfigParse(_) => "config_parse",
            LintError::RemoteApi(_) => "remote_api",
            LintError::InvalidInput(_) => "invalid_input",
        }
    }
}

/// Result type for lint operations.
pub type Result<T> = std::result::Result<T, LintError>;

/// Result type for remote host operations.
pub type HostResult<T> = std::result::Result<T, HostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_missing_display() {
        let err = LintError::ConfigMissing {
            path: ".github/pr-lint.yml".to_string(),
            reference: "abc123".to_string(),
        };
        assert_eq!(err.to_string(), ".github/pr-lint.yml does not exist at abc123");
        assert_eq!(err.kind(), "config_missing");
    }

    #[test]
    fn test_host_error_converts_to_remote_api() {
        let err: LintError = HostError::Api {
            status: 502,
            message: "Bad Gateway".to_string(),
        }
        .into();
        assert_eq!(err.kind(), "remote_api");
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_context_error_keeps_message() {
        let err = LintError::Context("not a pull request".to_string());
        assert_eq!(err.to_string(), "not a pull request");
    }
}
