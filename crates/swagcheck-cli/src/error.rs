//! Error types for the CLI

use swagcheck::SwagError;
use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that end a CLI invocation
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// Some scenarios did not pass
    #[error("{failed} of {total} scenarios failed")]
    ScenariosFailed {
        /// Failed scenarios, setup failures included
        failed: usize,
        /// Scenarios run
        total: usize,
    },

    /// swagcheck library error
    #[error(transparent)]
    Swag(#[from] SwagError),
}

impl CliError {
    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Process exit code: 1 when scenarios failed, 2 for everything that
    /// stopped the run from happening
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::ScenariosFailed { .. } => 1,
            Self::InvalidArgument { .. } | Self::Swag(_) => 2,
        }
    }
}
