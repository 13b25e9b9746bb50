//! Error types for linting.

use std::time::Duration;

use thiserror::Error;

/// Errors that stop a scan or a lint run.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// DDS error.
    #[error("{0}")]
    Dds(#[from] texlint_dds::Error),

    /// Invalid glob pattern.
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// No lint profile with this name.
    #[error("unknown lint profile '{0}' (expected one of: es2, es3)")]
    UnknownProfile(String),

    /// External image tool failure.
    #[error(transparent)]
    ExternalTool(#[from] ExternalToolError),
}

/// Failures of the external image-inspection tool.
#[derive(Debug, Error)]
pub enum ExternalToolError {
    /// The tool binary could not be found.
    #[error("'{0}' not found; install ImageMagick or pass --identify")]
    NotFound(String),

    /// The tool could not be started.
    #[error("failed to run '{tool}': {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool exited with a failure status.
    #[error("'{tool}' exited with {status}: {stderr}")]
    Failed {
        tool: String,
        status: String,
        stderr: String,
    },

    /// The tool did not finish in time.
    #[error("'{tool}' timed out after {timeout:?}")]
    Timeout { tool: String, timeout: Duration },

    /// The tool output lacked the expected fields.
    #[error("unrecognized output from '{tool}': {output}")]
    UnrecognizedOutput { tool: String, output: String },
}

/// Result type for lint operations.
pub type Result<T> = std::result::Result<T, Error>;
