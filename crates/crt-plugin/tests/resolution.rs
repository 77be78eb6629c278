//! End-to-end resolution against an in-memory engine.
//!
//! The fake engine records everything the plugin feeds its builder and
//! consults the attached key providers in order, so these tests cover
//! the full wiring path without a real crtauth implementation.

use std::sync::Arc;

use async_trait::async_trait;
use crt_keys::{KeyLookupResult, KeyProvider};
use crt_plugin::{
    config::vars, AuthServerBuilder, AuthServerFactory, AuthenticationError,
    AuthenticationResult, ConfigError, CrtAuthPlugin, ServerAuthenticator,
};

#[derive(Default)]
struct InMemoryBuilder {
    server_name: Option<String>,
    secret: Option<Vec<u8>>,
    token_lifetime_secs: Option<u64>,
    providers: Vec<Arc<dyn KeyProvider>>,
}

struct InMemoryServer {
    server_name: String,
    secret: Vec<u8>,
    token_lifetime_secs: u64,
    providers: Vec<Arc<dyn KeyProvider>>,
}

impl InMemoryServer {
    /// Consults providers in attachment order, the way the real engine
    /// resolves a user's key.
    async fn find_key(&self, username: &str) -> KeyLookupResult<Option<String>> {
        for provider in &self.providers {
            if let Some(key) = provider.get_key(username).await? {
                return Ok(Some(key));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl ServerAuthenticator for InMemoryServer {
    async fn create_challenge(&self, request: &str) -> AuthenticationResult<String> {
        Ok(format!("challenge:{}:{request}", self.server_name))
    }

    async fn create_token(&self, response: &str) -> AuthenticationResult<String> {
        match self.find_key(response).await? {
            Some(_) => Ok(format!("token:{response}:{}", self.token_lifetime_secs)),
            None => Err(AuthenticationError::unauthorized("no key for user")),
        }
    }

    async fn validate_token(&self, token: &str) -> AuthenticationResult<String> {
        token
            .strip_prefix("token:")
            .and_then(|rest| rest.split(':').next())
            .map(str::to_string)
            .ok_or_else(|| AuthenticationError::unauthorized("unrecognized token"))
    }
}

impl AuthServerBuilder for InMemoryBuilder {
    type Server = InMemoryServer;

    fn server_name(mut self, name: &str) -> Self {
        self.server_name = Some(name.to_string());
        self
    }

    fn secret(mut self, secret: &[u8]) -> Self {
        self.secret = Some(secret.to_vec());
        self
    }

    fn token_lifetime_secs(mut self, secs: u64) -> Self {
        self.token_lifetime_secs = Some(secs);
        self
    }

    fn key_provider(mut self, provider: Arc<dyn KeyProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    fn build(self) -> InMemoryServer {
        InMemoryServer {
            server_name: self.server_name.expect("server name set"),
            secret: self.secret.expect("secret set"),
            token_lifetime_secs: self.token_lifetime_secs.expect("lifetime set"),
            providers: self.providers,
        }
    }
}

struct InMemoryFactory;

impl AuthServerFactory for InMemoryFactory {
    type Builder = InMemoryBuilder;

    fn builder(&self) -> InMemoryBuilder {
        InMemoryBuilder::default()
    }
}

fn plugin(pairs: &[(&str, &str)]) -> CrtAuthPlugin<InMemoryFactory> {
    CrtAuthPlugin::with_environment(pairs.iter().copied().collect(), InMemoryFactory)
}

#[tokio::test]
async fn full_exchange_with_file_backed_keys() {
    let keys = tempfile::tempdir().unwrap();
    std::fs::write(
        keys.path().join("alice.pub"),
        "ssh-rsa AAAAB3NzaC1yc2E alice@example.com\n",
    )
    .unwrap();

    let root = keys.path().to_str().unwrap();
    let server = plugin(&[
        (vars::SERVER_NAME, "auth.example.com"),
        (vars::SECRET, "hunter2"),
        (vars::TOKEN_LIFETIME_SECS, "120"),
        (vars::KEY_ROOT_DIR, root),
    ])
    .server_authentication()
    .unwrap();

    let engine = server.authenticator();
    assert_eq!(engine.server_name, "auth.example.com");
    assert_eq!(engine.secret, b"hunter2");
    assert_eq!(engine.token_lifetime_secs, 120);

    // Known user: key found, token issued, token validates.
    let token = engine.create_token("alice").await.unwrap();
    let principal = server.token_authenticator().authenticate(&token).await.unwrap();
    assert_eq!(principal.username(), "alice");

    // Unknown user: every provider says None, issuance is rejected.
    let err = engine.create_token("mallory").await.unwrap_err();
    assert!(matches!(err, AuthenticationError::Unauthorized(_)));
}

#[tokio::test]
async fn file_provider_is_consulted_before_ldap() {
    let keys = tempfile::tempdir().unwrap();
    std::fs::write(keys.path().join("alice.pub"), "ssh-rsa AAAA alice\n").unwrap();

    let root = keys.path().to_str().unwrap();
    let server = plugin(&[
        (vars::SERVER_NAME, "auth.example.com"),
        (vars::SECRET, "hunter2"),
        (vars::KEY_ROOT_DIR, root),
        // Unroutable on purpose: the file hit must short-circuit before
        // the LDAP provider is ever contacted.
        (vars::LDAP_URL, "ldap://ldap.invalid:389"),
        (vars::LDAP_SEARCH_PATH, "ou=people,dc=example,dc=com"),
    ])
    .server_authentication()
    .unwrap();

    let key = server.authenticator().find_key("alice").await.unwrap();
    assert_eq!(key.as_deref(), Some("ssh-rsa AAAA alice"));
}

#[test]
fn conditional_ldap_requirement_is_enforced() {
    let err = plugin(&[
        (vars::SERVER_NAME, "auth.example.com"),
        (vars::SECRET, "hunter2"),
        (vars::LDAP_URL, "ldap://ldap.example.com"),
    ])
    .server_authentication()
    .unwrap_err();

    assert_eq!(err, ConfigError::missing(vars::LDAP_SEARCH_PATH));
}

#[test]
fn setup_can_run_repeatedly() {
    let plugin = plugin(&[
        (vars::SERVER_NAME, "auth.example.com"),
        (vars::SECRET, "hunter2"),
    ]);

    for _ in 0..3 {
        let server = plugin.server_authentication().unwrap();
        assert!(server.authenticator().providers.is_empty());
    }
}

#[test]
fn client_side_reports_unavailable() {
    assert!(plugin(&[]).client_authentication().is_none());
}
