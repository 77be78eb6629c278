//! # crt-plugin
//!
//! Challenge-response ("crtauth") authentication plugin for a host
//! service's pluggable authentication framework.
//!
//! The protocol engine is an external collaborator reached through the
//! [`server`] capability traits; this crate owns what sits around it:
//!
//! - environment-driven configuration with two-phase validation
//! - conditional wiring of file and LDAP key-lookup providers
//! - the `"crtauth"` scheme adapter exposed to the host, server-side
//!   only
//!
//! ## Example
//!
//! ```ignore
//! use crt_plugin::CrtAuthPlugin;
//!
//! let plugin = CrtAuthPlugin::new(engine_factory);
//! assert_eq!(plugin.scheme_name(), "crtauth");
//!
//! // Reads CRTAUTH_* variables; fails fast on misconfiguration.
//! let server = plugin.server_authentication()?;
//! let principal = server.token_authenticator().authenticate(token).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod config;
pub mod env;
pub mod error;
pub mod plugin;
pub mod server;
pub mod token;

pub use config::{
    LdapSettings, ResolvedConfig, DEFAULT_LDAP_KEY_FIELD, DEFAULT_TOKEN_LIFETIME_SECS,
};
pub use env::Environment;
pub use error::{
    AuthenticationError, AuthenticationResult, ConfigError, ConfigResult,
};
pub use plugin::{ClientAuthentication, CrtAuthPlugin, ServerAuthentication, SCHEME_NAME};
pub use server::{AuthServerBuilder, AuthServerFactory, ServerAuthenticator};
pub use token::{CrtAccessToken, CrtTokenAuthenticator};
