use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::WordsDictError;
use crate::Result;

/// Dictionary configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DictConfig {
    /// Root directory holding the `wd_*` bucket directories
    pub data_dir: PathBuf,
    /// Keep parsed bucket files in memory between calls.
    /// Only valid while this process is the sole writer of the store.
    pub cache_buckets: bool,
    pub tokenizer: TokenizerConfig,
}

impl Default for DictConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/wordsdict"),
            cache_buckets: false,
            tokenizer: TokenizerConfig::default(),
        }
    }
}

impl DictConfig {
    /// Create a configuration rooted at `data_dir`
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        let config: DictConfig = serde_json::from_slice(&bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the root data directory
    pub fn with_data_dir<P: AsRef<Path>>(mut self, data_dir: P) -> Self {
        self.data_dir = data_dir.as_ref().to_path_buf();
        self
    }

    /// Enable or disable the in-memory bucket cache
    pub fn with_bucket_cache(mut self, enabled: bool) -> Self {
        self.cache_buckets = enabled;
        self
    }

    /// Set the tokenizer configuration
    pub fn with_tokenizer(mut self, tokenizer: TokenizerConfig) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(WordsDictError::Config("data_dir must not be empty".to_string()));
        }
        if self.tokenizer.max_token_length == Some(0) {
            return Err(WordsDictError::Config(
                "tokenizer.max_token_length must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Tokenizer configuration
///
/// The defaults leave normalized tokens untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    pub lowercase: bool,
    /// Upper bound on token length, counted in chars
    pub max_token_length: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_configs() {
        let config = DictConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data/wordsdict"));
        assert!(!config.cache_buckets);
        assert!(!config.tokenizer.lowercase);
        assert_eq!(config.tokenizer.max_token_length, None);
    }

    #[test]
    fn test_config_builder() {
        let config = DictConfig::new("/tmp/dict")
            .with_bucket_cache(true)
            .with_tokenizer(TokenizerConfig {
                lowercase: true,
                max_token_length: Some(32),
            });

        assert_eq!(config.data_dir, PathBuf::from("/tmp/dict"));
        assert!(config.cache_buckets);
        assert!(config.tokenizer.lowercase);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_file_partial() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dict.json");
        std::fs::write(&path, r#"{"data_dir": "/var/lib/words", "cache_buckets": true}"#).unwrap();

        let config = DictConfig::from_json_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/words"));
        assert!(config.cache_buckets);
        assert!(!config.tokenizer.lowercase);
    }

    #[test]
    fn test_from_json_file_rejects_invalid() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dict.json");
        std::fs::write(&path, r#"{"tokenizer": {"max_token_length": 0}}"#).unwrap();
        assert!(matches!(
            DictConfig::from_json_file(&path),
            Err(WordsDictError::Config(_))
        ));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            DictConfig::from_json_file(&path),
            Err(WordsDictError::Serialization(_))
        ));
    }
}
