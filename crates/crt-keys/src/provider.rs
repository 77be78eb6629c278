//! The key provider trait.

use async_trait::async_trait;

use crate::error::KeyLookupResult;

/// A source of users' public keys.
///
/// The authenticator consults providers in attachment order until one
/// returns a key; `Ok(None)` means "unknown here, try the next one".
#[async_trait]
pub trait KeyProvider: Send + Sync {
    /// Returns a short identifier for this provider kind.
    fn provider_type(&self) -> &'static str;

    /// Looks up the OpenSSH public key line for `username`.
    ///
    /// Returns `Ok(None)` when this provider has no key for the user.
    ///
    /// ## Errors
    ///
    /// Returns an error when the lookup itself fails (I/O, connection,
    /// search), as opposed to the user simply being unknown.
    async fn get_key(&self, username: &str) -> KeyLookupResult<Option<String>>;
}
