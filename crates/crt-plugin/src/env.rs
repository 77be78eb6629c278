//! Environment snapshot access.
//!
//! Configuration comes from an injected, immutable key-value snapshot
//! rather than process-wide globals, so resolution is deterministic
//! under test and safe to run concurrently.

use std::collections::HashMap;

use crate::error::{ConfigError, ConfigResult};

/// An immutable snapshot of environment variables.
///
/// Lookups use exact, case-sensitive key matching.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Captures the current process environment.
    #[must_use]
    pub fn from_process() -> Self {
        std::env::vars().collect()
    }

    /// Looks up a variable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Looks up a variable, treating an empty value as unset.
    ///
    /// This is the gate for the optional subsystem-enabling variables:
    /// an empty `CRTAUTH_LDAP_URL` does not enable LDAP lookup.
    #[must_use]
    pub fn nonempty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.is_empty())
    }

    /// Looks up a required variable.
    ///
    /// Presence alone satisfies the requirement; emptiness is checked
    /// only by [`nonempty`](Self::nonempty).
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::Missing`] if the variable is absent.
    pub fn required(&self, name: &str) -> ConfigResult<&str> {
        self.get(name).ok_or_else(|| ConfigError::missing(name))
    }

    /// Parses an optional integer variable, falling back to `default`
    /// when absent.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the variable is present but
    /// not a non-negative integer.
    pub fn parsed_or(&self, name: &str, default: u64) -> ConfigResult<u64> {
        match self.get(name) {
            None => Ok(default),
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::invalid(name, value)),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Environment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<HashMap<String, String>> for Environment {
    fn from(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }
}
