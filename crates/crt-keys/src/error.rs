//! Key lookup error types.
//!
//! ## Security Note
//!
//! Error messages must not leak key material or directory credentials.

use thiserror::Error;

/// Errors surfaced by key-lookup providers.
#[derive(Debug, Error)]
pub enum KeyLookupError {
    /// Username was rejected before any lookup was attempted.
    #[error("invalid username for key lookup: {0:?}")]
    InvalidUsername(String),

    /// Reading a key file failed.
    #[error("key file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Connecting to the directory server failed.
    #[error("LDAP connection failed: {0}")]
    Connection(String),

    /// Directory search failed.
    #[error("LDAP search failed: {0}")]
    Search(String),

    /// A key was found but could not be used.
    #[error("malformed public key for user {0}")]
    MalformedKey(String),

    /// Underlying ldap3 error.
    #[error("LDAP error: {0}")]
    Ldap3(#[from] ldap3::LdapError),
}

impl KeyLookupError {
    /// Creates an invalid-username error.
    #[must_use]
    pub fn invalid_username(username: impl Into<String>) -> Self {
        Self::InvalidUsername(username.into())
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a search error.
    #[must_use]
    pub fn search(msg: impl Into<String>) -> Self {
        Self::Search(msg.into())
    }

    /// Creates a malformed-key error.
    #[must_use]
    pub fn malformed_key(username: impl Into<String>) -> Self {
        Self::MalformedKey(username.into())
    }

    /// Checks if this is a connection-related error.
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Ldap3(_))
    }
}

/// Result type for key lookups.
pub type KeyLookupResult<T> = Result<T, KeyLookupError>;
