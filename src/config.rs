/// Training and generation settings, loadable from RON.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::corpus::{CorpusBuilder, CorpusError, Normalizer};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Settings for one train-then-generate run.
///
/// Every field has a default, so `()` is a valid config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NgramConfig {
    /// N-gram order; contexts hold `order - 1` characters.
    pub order: usize,
    /// Corpus files or directories, read in the listed order.
    pub sources: Vec<PathBuf>,
    /// File extension picked up when a source is a directory; a leading
    /// dot is ignored.
    pub extension: String,
    pub normalize: Normalizer,
    /// Characters to generate.
    pub length: usize,
    /// Fixed RNG seed; `None` means seed from OS entropy.
    pub seed: Option<u64>,
}

impl Default for NgramConfig {
    fn default() -> Self {
        Self {
            order: 3,
            sources: Vec::new(),
            extension: "txt".to_string(),
            normalize: Normalizer::default(),
            length: 500,
            seed: None,
        }
    }
}

impl NgramConfig {
    pub fn load_from_ron(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(source: &str) -> Result<Self, ConfigError> {
        let config: NgramConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.order == 0 {
            return Err(ConfigError::Invalid("order must be at least 1".to_string()));
        }
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::Invalid("extension must not be empty".to_string()));
        }
        Ok(())
    }

    /// Read every configured source into a fresh corpus builder.
    pub fn corpus_builder(&self) -> Result<CorpusBuilder, CorpusError> {
        let mut builder = CorpusBuilder::with_normalizer(self.normalize);
        for source in &self.sources {
            builder.add_path(source, &self.extension)?;
        }
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = NgramConfig::parse_ron("()").unwrap();
        assert_eq!(config, NgramConfig::default());
    }

    #[test]
    fn partial_config_overrides_fields() {
        let config = NgramConfig::parse_ron(
            r#"(
                order: 5,
                sources: ["corpus/a.txt"],
                normalize: (lowercase: false),
                seed: Some(7),
            )"#,
        )
        .unwrap();
        assert_eq!(config.order, 5);
        assert_eq!(config.sources, vec![PathBuf::from("corpus/a.txt")]);
        assert!(!config.normalize.lowercase);
        assert!(config.normalize.strip_punctuation);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.length, 500);
    }

    #[test]
    fn zero_order_is_invalid() {
        assert!(matches!(
            NgramConfig::parse_ron("(order: 0)"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn dotted_extension_is_accepted_but_bare_dot_is_not() {
        let config = NgramConfig::parse_ron(r#"(extension: ".txt")"#).unwrap();
        assert_eq!(config.extension, ".txt");
        assert!(matches!(
            NgramConfig::parse_ron(r#"(extension: ".")"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_ron_is_reported() {
        assert!(matches!(
            NgramConfig::parse_ron("(order: \"three\")"),
            Err(ConfigError::Ron(_))
        ));
    }
}
