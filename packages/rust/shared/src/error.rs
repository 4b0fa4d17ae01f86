//! Error types for SiteForge.
//!
//! Library crates use [`SiteForgeError`] via `thiserror`.
//! App crates (cli) wrap this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all SiteForge operations.
#[derive(Debug, thiserror::Error)]
pub enum SiteForgeError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Requirements validation error (malformed or missing fields).
    /// Fatal: surfaced before any pipeline stage runs.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Transient failure from the external generative capability.
    /// Subject to the retry policy; never escapes ContentGenerator.
    #[error("generation error: {0}")]
    Generation(String),

    /// Total generation failure: zero pages could be assembled.
    #[error("assembly error: {message}")]
    Assembly { message: String },

    /// The overall run deadline was exceeded.
    #[error("run timed out after {elapsed_ms} ms in stage {stage}")]
    Timeout { stage: String, elapsed_ms: u64 },

    /// The run was cancelled by the caller. Not an error condition for
    /// the pipeline itself, but callers that unwrap a result see this.
    #[error("run cancelled during stage {stage}")]
    Cancelled { stage: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SiteForgeError>;

impl SiteForgeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create an assembly error from any displayable message.
    pub fn assembly(msg: impl Into<String>) -> Self {
        Self::Assembly {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is fatal to the whole run (vs. absorbed
    /// inside a stage by the retry/fallback policy).
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Generation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = SiteForgeError::validation("business_name is required");
        assert_eq!(err.to_string(), "validation error: business_name is required");

        let err = SiteForgeError::Timeout {
            stage: "generating".into(),
            elapsed_ms: 120_000,
        };
        assert!(err.to_string().contains("generating"));
        assert!(err.to_string().contains("120000"));
    }

    #[test]
    fn generation_errors_are_not_fatal() {
        assert!(!SiteForgeError::Generation("rate limited".into()).is_fatal());
        assert!(SiteForgeError::validation("bad input").is_fatal());
        assert!(SiteForgeError::assembly("zero pages").is_fatal());
    }
}
