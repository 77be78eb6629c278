//! Capability traits for the external crtauth engine.
//!
//! The protocol engine itself (challenge generation, signature
//! verification, replay protection, token issuance and lifetime
//! enforcement) lives outside this crate. The plugin reaches it
//! through these traits, so configuration and wiring can be exercised
//! without touching the filesystem or the network.

use std::sync::Arc;

use async_trait::async_trait;
use crt_keys::KeyProvider;

use crate::error::AuthenticationResult;

/// Server side of the crtauth challenge-response protocol.
///
/// Implementations are expected to be immutable and thread-safe; the
/// host treats the built authenticator as a singleton.
#[async_trait]
pub trait ServerAuthenticator: Send + Sync {
    /// Produces a challenge for a client's initial request.
    async fn create_challenge(&self, request: &str) -> AuthenticationResult<String>;

    /// Verifies a signed challenge response and issues a token.
    async fn create_token(&self, response: &str) -> AuthenticationResult<String>;

    /// Validates a previously issued token, returning the username it
    /// was issued to.
    async fn validate_token(&self, token: &str) -> AuthenticationResult<String>;
}

/// Consuming builder for a [`ServerAuthenticator`].
pub trait AuthServerBuilder: Sized {
    /// The authenticator type this builder produces.
    type Server: ServerAuthenticator;

    /// Sets the name this server presents to clients.
    #[must_use]
    fn server_name(self, name: &str) -> Self;

    /// Sets the challenge-signing secret.
    #[must_use]
    fn secret(self, secret: &[u8]) -> Self;

    /// Sets the lifetime of issued tokens.
    #[must_use]
    fn token_lifetime_secs(self, secs: u64) -> Self;

    /// Attaches a key provider.
    ///
    /// Providers are consulted in attachment order.
    #[must_use]
    fn key_provider(self, provider: Arc<dyn KeyProvider>) -> Self;

    /// Finalizes the authenticator.
    fn build(self) -> Self::Server;
}

/// Supplies fresh builders, one per setup call.
///
/// Setup may run more than once; every run gets an unconfigured
/// builder, so no state leaks between authenticators.
pub trait AuthServerFactory: Send + Sync {
    /// Builder type produced by this factory.
    type Builder: AuthServerBuilder;

    /// Returns a new, unconfigured builder.
    fn builder(&self) -> Self::Builder;
}
