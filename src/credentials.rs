//! API key storage.
//!
//! Keys live in a small JSON file (`{"openai": "<key>"}`) and are handed to
//! the LLM client explicitly. Nothing here reads or writes process
//! environment variables.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

/// Name of the OpenAI entry in the key file.
pub const OPENAI: &str = "openai";

/// Errors that can occur while reading or writing the key file.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("API key cannot be empty")]
    EmptyKey,

    #[error("Invalid key file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to save keys: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Show only the first and last four characters of a key.
///
/// Keys of eight characters or fewer are hidden entirely.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len().max(4));
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Whether a key is configured, with its masked form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyStatus {
    Configured { masked: String },
    Missing,
}

/// Session object owning the key file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
    keys: BTreeMap<String, String>,
}

impl CredentialStore {
    /// An empty store that will save to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            keys: BTreeMap::new(),
        }
    }

    /// Load keys from `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CredentialError> {
        let path = path.into();
        let keys = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| {
                CredentialError::Parse {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No key file at {}", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, keys })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The OpenAI key, if one is set.
    pub fn openai_key(&self) -> Option<&str> {
        self.keys
            .get(OPENAI)
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
    }

    pub fn status(&self) -> KeyStatus {
        match self.openai_key() {
            Some(key) => KeyStatus::Configured {
                masked: mask_key(key),
            },
            None => KeyStatus::Missing,
        }
    }

    /// Store a new OpenAI key and save immediately.
    pub fn set_openai_key(&mut self, key: &str) -> Result<(), CredentialError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(CredentialError::EmptyKey);
        }
        self.keys.insert(OPENAI.to_string(), key.to_string());
        self.save()?;
        info!("Saved OpenAI key to {}", self.path.display());
        Ok(())
    }

    /// Clear the OpenAI key and save. Returns whether a key was present.
    pub fn remove_openai_key(&mut self) -> Result<bool, CredentialError> {
        let had_key = self.openai_key().is_some();
        self.keys.insert(OPENAI.to_string(), String::new());
        self.save()?;
        Ok(had_key)
    }

    fn save(&self) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.keys)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("sk-abcdefghijklmnop1234"), "sk-a...1234");
        assert_eq!(mask_key("short"), "*****");
        assert_eq!(mask_key("ab"), "****");
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = CredentialStore::open(temp.path().join("api_keys.json")).unwrap();
        assert_eq!(store.openai_key(), None);
        assert_eq!(store.status(), KeyStatus::Missing);
    }

    #[test]
    fn test_set_persists_immediately() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("api_keys.json");
        let mut store = CredentialStore::open(&path).unwrap();
        store.set_openai_key("  sk-test-key-123456  ").unwrap();

        let reopened = CredentialStore::open(&path).unwrap();
        assert_eq!(reopened.openai_key(), Some("sk-test-key-123456"));
        assert_eq!(
            reopened.status(),
            KeyStatus::Configured {
                masked: "sk-t...3456".to_string()
            }
        );

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["openai"], "sk-test-key-123456");
    }

    #[test]
    fn test_empty_key_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("api_keys.json");
        let mut store = CredentialStore::open(&path).unwrap();
        assert!(matches!(
            store.set_openai_key("   "),
            Err(CredentialError::EmptyKey)
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_remove() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("api_keys.json");
        let mut store = CredentialStore::open(&path).unwrap();
        store.set_openai_key("sk-test-key-123456").unwrap();
        assert!(store.remove_openai_key().unwrap());
        assert!(!store.remove_openai_key().unwrap());
        assert_eq!(CredentialStore::open(&path).unwrap().openai_key(), None);
    }

    #[test]
    fn test_corrupt_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("api_keys.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            CredentialStore::open(&path),
            Err(CredentialError::Parse { .. })
        ));
    }
}
