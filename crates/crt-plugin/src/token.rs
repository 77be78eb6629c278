//! Access tokens and the token authenticator.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::AuthenticationResult;
use crate::server::ServerAuthenticator;

/// A validated crtauth access token.
///
/// Handed to the host as the authenticated principal once the engine
/// has accepted the token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrtAccessToken {
    username: String,
    token: String,
}

impl CrtAccessToken {
    /// Creates an access token for a validated user.
    #[must_use]
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }

    /// Returns the username the token was issued to.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the raw token string.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

// The token string is a bearer credential; keep it out of logs.
impl fmt::Debug for CrtAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrtAccessToken")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Validates crtauth tokens by delegating directly to the engine.
pub struct CrtTokenAuthenticator<S> {
    authenticator: Arc<S>,
}

impl<S> Clone for CrtTokenAuthenticator<S> {
    fn clone(&self) -> Self {
        Self {
            authenticator: Arc::clone(&self.authenticator),
        }
    }
}

impl<S: ServerAuthenticator> CrtTokenAuthenticator<S> {
    /// Creates a token authenticator over an engine instance.
    #[must_use]
    pub fn new(authenticator: Arc<S>) -> Self {
        Self { authenticator }
    }

    /// Validates `token` and returns the principal it was issued to.
    ///
    /// ## Errors
    ///
    /// Propagates the engine's rejection untouched; an expired or
    /// tampered token never yields a partial principal.
    pub async fn authenticate(&self, token: &str) -> AuthenticationResult<CrtAccessToken> {
        let username = self.authenticator.validate_token(token).await?;
        Ok(CrtAccessToken::new(username, token))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::AuthenticationError;

    struct AcceptingEngine;

    #[async_trait]
    impl ServerAuthenticator for AcceptingEngine {
        async fn create_challenge(&self, request: &str) -> AuthenticationResult<String> {
            Ok(format!("challenge:{request}"))
        }

        async fn create_token(&self, response: &str) -> AuthenticationResult<String> {
            Ok(format!("token:{response}"))
        }

        async fn validate_token(&self, _token: &str) -> AuthenticationResult<String> {
            Ok("alice".to_string())
        }
    }

    struct RejectingEngine;

    #[async_trait]
    impl ServerAuthenticator for RejectingEngine {
        async fn create_challenge(&self, _request: &str) -> AuthenticationResult<String> {
            Err(AuthenticationError::protocol("unexpected"))
        }

        async fn create_token(&self, _response: &str) -> AuthenticationResult<String> {
            Err(AuthenticationError::unauthorized("bad signature"))
        }

        async fn validate_token(&self, _token: &str) -> AuthenticationResult<String> {
            Err(AuthenticationError::unauthorized("token expired"))
        }
    }

    #[tokio::test]
    async fn accepted_token_yields_principal() {
        let authenticator = CrtTokenAuthenticator::new(Arc::new(AcceptingEngine));

        let principal = authenticator.authenticate("tok").await.unwrap();
        assert_eq!(principal.username(), "alice");
        assert_eq!(principal.token(), "tok");
    }

    #[tokio::test]
    async fn rejected_token_propagates_the_error() {
        let authenticator = CrtTokenAuthenticator::new(Arc::new(RejectingEngine));

        let err = authenticator.authenticate("tok").await.unwrap_err();
        assert!(matches!(err, AuthenticationError::Unauthorized(_)));
    }

    #[test]
    fn debug_redacts_the_token() {
        let token = CrtAccessToken::new("alice", "secret-token-material");
        let rendered = format!("{token:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("secret-token-material"));
    }

    #[test]
    fn serializes_for_the_host() {
        let token = CrtAccessToken::new("alice", "tok");
        let json = serde_json::to_string(&token).unwrap();
        let back: CrtAccessToken = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
    }
}
