//! CLI-specific error types and exit code mapping

use logroute_core::error::{LogrouteError, TranslateError};
use logroute_router::RouterError;

/// CLI-specific error type.
///
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The task file could not be read or parsed.
    #[error("task file error: {0}")]
    TaskFile(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from logroute-core.
    #[error("{0}")]
    Core(#[from] LogrouteError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                              |
    /// |------|--------------------------------------|
    /// | 0    | Success                              |
    /// | 1    | Command or translation error         |
    /// | 2    | Configuration error                  |
    /// | 10   | IO error                             |
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Core(LogrouteError::Config(_)) => 2,
            Self::Io(_) | Self::Core(LogrouteError::Io(_)) => 10,
            Self::Command(_)
            | Self::TaskFile(_)
            | Self::JsonSerialize(_)
            | Self::Core(LogrouteError::Translate(_)) => 1,
        }
    }
}

impl From<RouterError> for CliError {
    fn from(e: RouterError) -> Self {
        Self::Core(e.into())
    }
}

impl From<TranslateError> for CliError {
    fn from(e: TranslateError) -> Self {
        Self::Core(e.into())
    }
}
