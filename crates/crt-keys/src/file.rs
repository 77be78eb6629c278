//! File-backed key provider.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{KeyLookupError, KeyLookupResult};
use crate::provider::KeyProvider;

/// Looks up public keys stored as files under a root directory.
///
/// The key for user `alice` is expected at `<root>/alice.pub`, holding
/// a single OpenSSH public key line.
///
/// Construction performs no filesystem access; a missing root directory
/// surfaces at lookup time, not at configuration time.
#[derive(Debug, Clone)]
pub struct FileKeyProvider {
    root: PathBuf,
}

impl FileKeyProvider {
    /// Creates a provider rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Rejects usernames that could resolve outside the root.
    fn validate_username(username: &str) -> KeyLookupResult<()> {
        if username.is_empty()
            || username == "."
            || username == ".."
            || username.contains(['/', '\\', '\0'])
        {
            return Err(KeyLookupError::invalid_username(username));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyProvider for FileKeyProvider {
    fn provider_type(&self) -> &'static str {
        "file"
    }

    async fn get_key(&self, username: &str) -> KeyLookupResult<Option<String>> {
        Self::validate_username(username)?;

        let path = self.root.join(format!("{username}.pub"));
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                let key = contents.trim();
                if key.is_empty() {
                    return Err(KeyLookupError::malformed_key(username));
                }
                tracing::debug!(user = username, path = %path.display(), "public key read from file");
                Ok(Some(key.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
