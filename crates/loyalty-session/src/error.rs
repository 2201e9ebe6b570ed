//! # Session Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Session Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │  Collaborators  │  │     Checkout            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Search         │  │  Core (CoreError)       │ │
//! │  │  ConfigLoad...  │  │  Submit         │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use loyalty_core::CoreError;
use thiserror::Error;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Failure reported by a [`crate::search::CatalogSearch`] implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    /// The endpoint answered with a failure status.
    #[error("Search request failed: {0}")]
    RequestFailed(String),

    /// The endpoint could not be reached.
    #[error("Search service unavailable: {0}")]
    Unavailable(String),

    /// The response body did not match the expected records.
    #[error("Malformed search response: {0}")]
    Malformed(String),
}

/// Failure reported by a [`crate::submit::OrderSubmitter`] implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// The order service refused the order.
    #[error("Order rejected: {0}")]
    Rejected(String),

    /// The order never reached the service.
    #[error("Order submission failed: {0}")]
    Transport(String),
}

/// Session error type.
#[derive(Debug, Error)]
pub enum SessionError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid session configuration.
    #[error("Invalid session configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    // =========================================================================
    // Collaborator Errors
    // =========================================================================
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    /// The page session task has stopped.
    #[error("Session channel closed: {0}")]
    ChannelClosed(String),

    // =========================================================================
    // Checkout Errors
    // =========================================================================
    #[error("Checkout error: {0}")]
    Core(#[from] CoreError),
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SessionError {
    fn from(err: toml::de::Error) -> Self {
        SessionError::ConfigLoadFailed(err.to_string())
    }
}

impl SessionError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SessionError::InvalidConfig(_) | SessionError::ConfigLoadFailed(_)
        )
    }
}
