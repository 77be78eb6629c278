//! LDAP-backed key provider.
//!
//! ## Security
//!
//! The directory is queried anonymously and read-only. Nothing is
//! cached: every lookup opens a fresh connection, binds, searches, and
//! unbinds, so directory-side changes take effect immediately.

use std::time::Duration;

use async_trait::async_trait;
use ldap3::{LdapConnAsync, LdapConnSettings, Scope, SearchEntry};

use crate::error::{KeyLookupError, KeyLookupResult};
use crate::provider::KeyProvider;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Looks up public keys stored as an attribute on directory entries.
///
/// Users are located with a `(uid=<username>)` subtree search under the
/// configured search path; the key is the first value of the configured
/// attribute.
#[derive(Debug, Clone)]
pub struct LdapKeyProvider {
    url: String,
    search_path: String,
    key_field: String,
}

impl LdapKeyProvider {
    /// Creates a provider bound to `url`, searching under `search_path`
    /// for keys held in the `key_field` attribute.
    ///
    /// No connection is made here; the directory is first contacted at
    /// lookup time.
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        search_path: impl Into<String>,
        key_field: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            search_path: search_path.into(),
            key_field: key_field.into(),
        }
    }

    /// Returns the directory server URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the search base for key lookups.
    #[must_use]
    pub fn search_path(&self) -> &str {
        &self.search_path
    }

    /// Returns the attribute holding the public key.
    #[must_use]
    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    /// Builds the search filter for a username.
    fn key_filter(username: &str) -> String {
        format!("(uid={})", ldap_escape(username))
    }

    /// Opens a connection and binds anonymously.
    async fn connect(&self) -> KeyLookupResult<ldap3::Ldap> {
        let settings = LdapConnSettings::new().set_conn_timeout(CONNECT_TIMEOUT);
        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &self.url)
            .await
            .map_err(|e| KeyLookupError::connection(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                tracing::warn!("LDAP connection driver error: {}", e);
            }
        });

        ldap.simple_bind("", "")
            .await
            .map_err(|e| KeyLookupError::connection(e.to_string()))?
            .success()
            .map_err(|e| KeyLookupError::connection(format!("anonymous bind failed: {e}")))?;

        Ok(ldap)
    }
}

#[async_trait]
impl KeyProvider for LdapKeyProvider {
    fn provider_type(&self) -> &'static str {
        "ldap"
    }

    async fn get_key(&self, username: &str) -> KeyLookupResult<Option<String>> {
        let mut ldap = self.connect().await?;

        let (entries, _res) = ldap
            .search(
                &self.search_path,
                Scope::Subtree,
                &Self::key_filter(username),
                vec![self.key_field.as_str()],
            )
            .await
            .map_err(|e| KeyLookupError::search(e.to_string()))?
            .success()
            .map_err(|e| KeyLookupError::search(e.to_string()))?;

        let _ = ldap.unbind().await;

        let Some(entry) = entries.into_iter().next() else {
            return Ok(None);
        };
        let entry = SearchEntry::construct(entry);

        match entry.attrs.get(&self.key_field).and_then(|values| values.first()) {
            Some(key) if !key.trim().is_empty() => {
                tracing::debug!(user = username, dn = %entry.dn, "public key read from directory");
                Ok(Some(key.trim().to_string()))
            }
            Some(_) => Err(KeyLookupError::malformed_key(username)),
            None => Ok(None),
        }
    }
}

/// Escapes special characters in LDAP filter values.
fn ldap_escape(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => result.push_str("\\5c"),
            '*' => result.push_str("\\2a"),
            '(' => result.push_str("\\28"),
            ')' => result.push_str("\\29"),
            '\0' => result.push_str("\\00"),
            _ => result.push(c),
        }
    }
    result
}
