//! Plugin error types.
//!
//! ## Security Note
//!
//! Configuration errors name the offending variable, never its value
//! when that value is secret material. Authentication errors must not
//! leak token contents.

use thiserror::Error;

/// Configuration resolution errors.
///
/// Every variant is fatal at the point raised: configuration problems
/// halt startup rather than degrade into a weaker security posture.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required environment variable is absent, either
    /// unconditionally or because a subsystem it belongs to is enabled.
    #[error("environment variable {0} is required")]
    Missing(String),

    /// An environment variable is present but its value does not parse.
    #[error("value {value:?} for environment variable {name} is not valid")]
    Invalid {
        /// The variable name.
        name: String,
        /// The offending value.
        value: String,
    },
}

impl ConfigError {
    /// Creates a missing-variable error.
    #[must_use]
    pub fn missing(name: impl Into<String>) -> Self {
        Self::Missing(name.into())
    }

    /// Creates an invalid-value error.
    #[must_use]
    pub fn invalid(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Invalid {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns the name of the offending variable.
    #[must_use]
    pub fn variable(&self) -> &str {
        match self {
            Self::Missing(name) | Self::Invalid { name, .. } => name,
        }
    }

    /// Checks if this is a missing-variable error.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing(_))
    }
}

/// Result type for configuration resolution.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failures surfaced while authenticating against the crtauth engine.
#[derive(Debug, Error)]
pub enum AuthenticationError {
    /// The presented token or challenge response was rejected.
    #[error("authentication rejected: {0}")]
    Unauthorized(String),

    /// The exchange violated the crtauth protocol.
    #[error("crtauth protocol error: {0}")]
    Protocol(String),

    /// A key-lookup provider failed.
    #[error("key lookup failed: {0}")]
    KeyLookup(#[from] crt_keys::KeyLookupError),
}

impl AuthenticationError {
    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }
}

/// Result type for authentication operations.
pub type AuthenticationResult<T> = Result<T, AuthenticationError>;
