//! Result and error types for swagcheck.

use crate::graph::{Action, Screen};
use crate::wait::WaitCondition;
use thiserror::Error;

/// Result type for swagcheck operations
pub type SwagResult<T> = Result<T, SwagError>;

/// Errors that can occur while driving the storefront
#[derive(Debug, Error)]
pub enum SwagError {
    /// A wait condition did not hold before its deadline
    #[error("Timed out after {ms}ms waiting for {locator} to be {condition}")]
    Timeout {
        /// Condition that was awaited
        condition: WaitCondition,
        /// Locator the condition was evaluated against
        locator: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// No element matched when the driver tried to act on it
    #[error("No element matches {locator}")]
    ElementNotFound {
        /// Locator that matched nothing
        locator: String,
    },

    /// Element exists but cannot receive the interaction
    #[error("Element {locator} is not interactable: {reason}")]
    NotInteractable {
        /// Locator of the element
        locator: String,
        /// Why the interaction was refused
        reason: String,
    },

    /// Browser crashed, disconnected or rejected a protocol command
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Browser name is not one we can drive
    #[error("Unsupported browser: '{name}'. Supported browsers: chrome, firefox, edge")]
    UnsupportedBrowser {
        /// Requested browser
        name: String,
    },

    /// Page object tried to take an edge the navigation graph does not define
    #[error("Illegal transition: {from} --{action}--> {to} is not in the navigation graph")]
    IllegalTransition {
        /// Source screen
        from: Screen,
        /// Action taken
        action: Action,
        /// Screen the caller expected to reach
        to: Screen,
    },

    /// An action that should have navigated left the browser somewhere else
    #[error("Expected to be on {expected} but the browser is at {actual}")]
    NavigationMismatch {
        /// Expected screen
        expected: Screen,
        /// Actual URL
        actual: String,
    },

    /// Scenario assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Selected environment is not defined in the settings document
    #[error("Env - '{env}' not found in the config. Available envs: {available:?}")]
    UnknownEnvironment {
        /// Requested environment
        env: String,
        /// Environments defined in the document
        available: Vec<String>,
    },

    /// Locator the driver cannot evaluate
    #[error("Invalid selector {selector}: {message}")]
    InvalidSelector {
        /// Offending selector
        selector: String,
        /// Error message
        message: String,
    },

    /// Rendered text did not have the expected shape
    #[error("Could not parse {what} from '{text}'")]
    Parse {
        /// What was being parsed
        what: &'static str,
        /// Text as rendered
        text: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl SwagError {
    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl std::fmt::Display) -> Self {
        Self::Driver {
            message: message.to_string(),
        }
    }

    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error is a wait deadline expiring
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_names_locator_and_condition() {
        let err = SwagError::Timeout {
            condition: WaitCondition::Clickable,
            locator: "id=login-button".to_string(),
            ms: 10_000,
        };
        assert!(err.is_timeout());
        assert_eq!(
            err.to_string(),
            "Timed out after 10000ms waiting for id=login-button to be clickable"
        );
    }

    #[test]
    fn test_unknown_environment_lists_available() {
        let err = SwagError::UnknownEnvironment {
            env: "qa".to_string(),
            available: vec!["dev".to_string(), "stage".to_string()],
        };
        assert!(!err.is_timeout());
        let msg = err.to_string();
        assert!(msg.contains("'qa'"));
        assert!(msg.contains("stage"));
    }

    #[test]
    fn test_illegal_transition_message() {
        let err = SwagError::IllegalTransition {
            from: Screen::Cart,
            action: Action::Finish,
            to: Screen::CheckoutComplete,
        };
        assert_eq!(
            err.to_string(),
            "Illegal transition: Cart --finish--> CheckoutComplete is not in the navigation graph"
        );
    }
}
