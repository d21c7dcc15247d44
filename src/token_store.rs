// Session key persistence: the key the service hands out at login is kept
// in a file in the user's home directory so the next run starts signed in.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::values::Token;

const FILE_NAME: &str = ".fiordispino_token";

/// A file holding at most one session key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.fiordispino_token`, or the current directory when there is no home.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored key, if there is one. A file whose content is not a valid
    /// key is treated as empty.
    pub fn load(&self) -> Result<Option<Token>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };
        match Token::new(data.trim()) {
            Ok(token) => Ok(Some(token)),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "ignoring stored session key");
                Ok(None)
            }
        }
    }

    pub fn save(&self, token: &Token) -> Result<()> {
        fs::write(&self.path, token.as_str())
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    /// Forget the stored key. Clearing an empty store is not an error.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> Token {
        Token::new("0123456789abcdef0123456789abcdef01234567").unwrap()
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token"));
        store.save(&token()).unwrap();
        assert_eq!(store.load().unwrap(), Some(token()));
    }

    #[test]
    fn load_tolerates_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        fs::write(&path, format!("{}\n", token())).unwrap();
        assert_eq!(TokenStore::new(path).load().unwrap(), Some(token()));
    }

    #[test]
    fn garbage_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        fs::write(&path, "not a key").unwrap();
        assert_eq!(TokenStore::new(path).load().unwrap(), None);
    }

    #[test]
    fn clear_removes_the_key_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token"));
        store.save(&token()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn default_path_ends_with_file_name() {
        assert!(TokenStore::default_path().ends_with(FILE_NAME));
    }
}
