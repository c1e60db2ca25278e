//! Error types for snapshell.
//!
//! Recoverable pipeline failures (a malformed generated query, an empty
//! lookup) are absorbed inside the suggestion engine. Everything that can
//! reach the interactive loop or the binary's start-up path is one of the
//! variants below.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshellError {
    /// No API key is configured, so no completion request may be sent.
    #[error("API key not found. Run `snapshell --set-api-key <KEY>` or set HELPER_GROQ_API_KEY.")]
    CredentialMissing,

    /// Network, authentication, timeout or service failure talking to the LLM.
    #[error("Completion service unavailable: {0}")]
    CompletionUnavailable(String),

    /// The LLM answered, but not with the JSON shape that was asked for.
    #[error("Unexpected response shape: {0}")]
    SchemaMismatch(String),

    /// A statement failed against an otherwise reachable store.
    #[error("Database error: {0}")]
    StoreExecution(String),

    /// The store path could not be created or opened.
    #[error("Database unavailable: {0}")]
    StoreUnavailable(String),

    #[error("No supported package manager found (looked for dpkg, apt, pacman, pamac)")]
    PackageManagerNotFound,

    /// The package tool ran but failed or produced unreadable output.
    #[error("Package manager error: {0}")]
    PackageManager(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<rusqlite::Error> for SnapshellError {
    fn from(err: rusqlite::Error) -> Self {
        SnapshellError::StoreExecution(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SnapshellError>;
