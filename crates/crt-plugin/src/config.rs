//! Resolved plugin configuration.
//!
//! Resolution is two-phase: the unconditional fields are read first,
//! then each enabled optional subsystem is validated as a group.
//! Partial LDAP configuration is an error, never a degraded mode.

use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::env::Environment;
use crate::error::ConfigResult;

/// Environment variable names understood by the plugin.
pub mod vars {
    /// Server identity presented to clients during the challenge exchange.
    pub const SERVER_NAME: &str = "CRTAUTH_SERVERNAME";
    /// Challenge-signing secret. Sensitive; never logged.
    pub const SECRET: &str = "CRTAUTH_SECRET";
    /// Token lifetime in seconds.
    pub const TOKEN_LIFETIME_SECS: &str = "CRTAUTH_TOKEN_LIFETIME_SECS";
    /// Root directory of a file-based key store; setting it enables
    /// file-backed key lookup.
    pub const KEY_ROOT_DIR: &str = "CRTAUTH_KEY_ROOT_DIR";
    /// Directory server URL; setting it enables LDAP key lookup.
    pub const LDAP_URL: &str = "CRTAUTH_LDAP_URL";
    /// LDAP search base. Required once LDAP lookup is enabled.
    pub const LDAP_SEARCH_PATH: &str = "CRTAUTH_LDAP_SEARCH_PATH";
    /// LDAP attribute holding the public key.
    pub const LDAP_KEY_FIELDNAME: &str = "CRTAUTH_LDAP_KEY_FIELDNAME";
}

/// Token lifetime used when `CRTAUTH_TOKEN_LIFETIME_SECS` is unset.
pub const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 540;

/// LDAP key attribute used when `CRTAUTH_LDAP_KEY_FIELDNAME` is unset.
pub const DEFAULT_LDAP_KEY_FIELD: &str = "sshPublicKey";

/// LDAP key-lookup settings.
///
/// Either fully populated or entirely absent from [`ResolvedConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LdapSettings {
    /// Directory server URL.
    pub url: String,
    /// Search base for key lookups.
    pub search_path: String,
    /// Attribute holding the public key.
    pub key_field: String,
}

/// Fully validated plugin configuration.
///
/// Built fresh from the environment snapshot on every setup call and
/// discarded once the authenticator is constructed; never cached.
#[derive(Debug)]
pub struct ResolvedConfig {
    /// Identity this server presents to clients.
    pub server_name: String,

    /// Challenge-signing secret. Redacted in `Debug` output.
    secret: SecretString,

    /// Seconds an issued token stays valid.
    pub token_lifetime_secs: u64,

    /// Root directory for file-based key lookup, when enabled.
    pub key_root_dir: Option<PathBuf>,

    /// LDAP key-lookup settings, when enabled.
    pub ldap: Option<LdapSettings>,
}

impl ResolvedConfig {
    /// Resolves and validates configuration from an environment
    /// snapshot.
    ///
    /// Performs no filesystem or network I/O: `key_root_dir` is not
    /// checked for existence here, and the LDAP URL is not contacted.
    /// Both surface problems at lookup time instead.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::Missing`](crate::ConfigError::Missing) for
    /// absent required variables, including the conditionally required
    /// LDAP search path, and
    /// [`ConfigError::Invalid`](crate::ConfigError::Invalid) for an
    /// unparseable token lifetime.
    pub fn from_env(env: &Environment) -> ConfigResult<Self> {
        // Phase one: unconditional fields.
        let server_name = env.required(vars::SERVER_NAME)?.to_string();
        let secret = SecretString::new(env.required(vars::SECRET)?.to_string());
        let token_lifetime_secs =
            env.parsed_or(vars::TOKEN_LIFETIME_SECS, DEFAULT_TOKEN_LIFETIME_SECS)?;

        // Phase two: optional subsystems, each validated as a group.
        let key_root_dir = env.nonempty(vars::KEY_ROOT_DIR).map(PathBuf::from);
        let ldap = Self::ldap_settings(env)?;

        Ok(Self {
            server_name,
            secret,
            token_lifetime_secs,
            key_root_dir,
            ldap,
        })
    }

    /// Validates the LDAP variable group, iff the URL enables it.
    fn ldap_settings(env: &Environment) -> ConfigResult<Option<LdapSettings>> {
        let Some(url) = env.nonempty(vars::LDAP_URL) else {
            return Ok(None);
        };

        // Optional while LDAP is disabled, required once it is enabled.
        let search_path = env.required(vars::LDAP_SEARCH_PATH)?;
        let key_field = env
            .get(vars::LDAP_KEY_FIELDNAME)
            .unwrap_or(DEFAULT_LDAP_KEY_FIELD);

        Ok(Some(LdapSettings {
            url: url.to_string(),
            search_path: search_path.to_string(),
            key_field: key_field.to_string(),
        }))
    }

    /// Returns the challenge-signing secret as bytes.
    ///
    /// The bytes are the UTF-8 encoding of the `CRTAUTH_SECRET` value.
    /// That encoding is part of the plugin's contract: the bytes are
    /// cryptographic key material and must be stable across releases.
    #[must_use]
    pub fn secret_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }
}
