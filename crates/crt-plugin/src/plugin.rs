//! The crtauth scheme plugin.
//!
//! Validation happens when the server side is requested, not at plugin
//! construction: a host loading the plugin for its client role does not
//! carry the server variables, and must not be failed for their
//! absence.

use std::fmt;
use std::sync::Arc;

use crt_keys::{FileKeyProvider, LdapKeyProvider};

use crate::config::ResolvedConfig;
use crate::env::Environment;
use crate::error::ConfigResult;
use crate::server::{AuthServerBuilder, AuthServerFactory, ServerAuthenticator};
use crate::token::CrtTokenAuthenticator;

/// Scheme name registered with the host framework.
pub const SCHEME_NAME: &str = "crtauth";

/// Server-side authentication surface handed to the host.
///
/// Pairs the protocol authenticator with a token authenticator that
/// delegates directly to it.
pub struct ServerAuthentication<S: ServerAuthenticator> {
    authenticator: Arc<S>,
    token_authenticator: CrtTokenAuthenticator<S>,
}

impl<S: ServerAuthenticator> ServerAuthentication<S> {
    fn new(authenticator: S) -> Self {
        let authenticator = Arc::new(authenticator);
        let token_authenticator = CrtTokenAuthenticator::new(Arc::clone(&authenticator));
        Self {
            authenticator,
            token_authenticator,
        }
    }

    /// Returns the protocol authenticator.
    #[must_use]
    pub fn authenticator(&self) -> &S {
        &self.authenticator
    }

    /// Returns the token authenticator paired with it.
    #[must_use]
    pub fn token_authenticator(&self) -> &CrtTokenAuthenticator<S> {
        &self.token_authenticator
    }
}

impl<S: ServerAuthenticator> fmt::Debug for ServerAuthentication<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerAuthentication").finish_non_exhaustive()
    }
}

/// Client-side authentication surface.
///
/// This plugin serves the server role only. The type is uninhabited:
/// a client surface cannot be constructed, partially or otherwise, and
/// [`CrtAuthPlugin::client_authentication`] reports the absence as a
/// plain `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientAuthentication {}

/// The crtauth authentication plugin.
///
/// Holds an immutable environment snapshot and an engine factory. Each
/// call to [`server_authentication`](Self::server_authentication)
/// re-resolves configuration from the snapshot and produces an
/// independent authenticator; nothing is cached between calls.
pub struct CrtAuthPlugin<F: AuthServerFactory> {
    environment: Environment,
    factory: F,
}

impl<F: AuthServerFactory> CrtAuthPlugin<F> {
    /// Creates a plugin over the current process environment.
    #[must_use]
    pub fn new(factory: F) -> Self {
        Self::with_environment(Environment::from_process(), factory)
    }

    /// Creates a plugin over an explicit environment snapshot.
    #[must_use]
    pub fn with_environment(environment: Environment, factory: F) -> Self {
        Self {
            environment,
            factory,
        }
    }

    /// Returns the scheme name registered with the host.
    #[must_use]
    pub fn scheme_name(&self) -> &'static str {
        SCHEME_NAME
    }

    /// Resolves configuration and constructs the server-side
    /// authentication surface.
    ///
    /// Wiring order is fixed: server name, secret and lifetime on a
    /// fresh builder, then the file key provider (when
    /// `CRTAUTH_KEY_ROOT_DIR` is set), then the LDAP key provider (when
    /// `CRTAUTH_LDAP_URL` is set). No I/O happens here; the providers
    /// first touch the filesystem or the directory at lookup time.
    ///
    /// ## Errors
    ///
    /// Fails on the first missing or invalid variable. No authenticator
    /// is ever built from partial configuration.
    pub fn server_authentication(
        &self,
    ) -> ConfigResult<ServerAuthentication<<F::Builder as AuthServerBuilder>::Server>> {
        let config = ResolvedConfig::from_env(&self.environment)?;

        let mut builder = self
            .factory
            .builder()
            .server_name(&config.server_name)
            .secret(config.secret_bytes())
            .token_lifetime_secs(config.token_lifetime_secs);

        let mut key_providers = 0usize;
        if let Some(root) = &config.key_root_dir {
            tracing::debug!(root = %root.display(), "attaching file key provider");
            builder = builder.key_provider(Arc::new(FileKeyProvider::new(root.clone())));
            key_providers += 1;
        }
        if let Some(ldap) = &config.ldap {
            tracing::debug!(
                url = %ldap.url,
                search_path = %ldap.search_path,
                key_field = %ldap.key_field,
                "attaching LDAP key provider"
            );
            builder = builder.key_provider(Arc::new(LdapKeyProvider::new(
                ldap.url.clone(),
                ldap.search_path.clone(),
                ldap.key_field.clone(),
            )));
            key_providers += 1;
        }

        tracing::info!(
            scheme = SCHEME_NAME,
            server_name = %config.server_name,
            token_lifetime_secs = config.token_lifetime_secs,
            key_providers,
            "crtauth server authentication configured"
        );

        Ok(ServerAuthentication::new(builder.build()))
    }

    /// Client-side construction is not available in this plugin.
    ///
    /// Always `None`: this deployment serves the server role only, and
    /// the absence is reported rather than raised.
    #[must_use]
    pub fn client_authentication(&self) -> Option<ClientAuthentication> {
        None
    }
}
