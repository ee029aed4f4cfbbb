//! Error types for calinvite.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while creating a meeting invite.
///
/// Nothing here is retried: every failure aborts the in-flight operation and
/// is surfaced verbatim to the caller.
#[derive(Error, Debug)]
pub enum InviteError {
    #[error(
        "Missing OAuth client secrets at {}.\n\
        Download OAuth client credentials from Google Cloud Console\n\
        and save them as 'credentials.json'.",
        .0.display()
    )]
    MissingClientSecret(PathBuf),

    #[error(
        "Meeting time '{input}' did not match accepted formats: {}",
        .formats.join(", ")
    )]
    InvalidTimeFormat { input: String, formats: Vec<String> },

    #[error("Duration must be a positive number of minutes, got {0}")]
    InvalidDuration(i64),

    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    #[error("Event submission failed: {0}")]
    SubmissionFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for invite operations.
pub type InviteResult<T> = Result<T, InviteError>;
