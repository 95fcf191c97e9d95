//! Configuration management for l10n-rewrite
//!
//! Defaults reproduce the built-in settings of the language-file migration:
//! which languages to rewrite, which message gets per-extruder variants, and
//! the (normally empty) literal substitution table for source files.
//! A JSON file can override any subset of these values.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier, used for the configuration directory name
pub const APP_ID: &str = "l10n-rewrite";

/// Name of the configuration file inside the configuration directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Prefix every message identifier starts with
pub const SYMBOL_PREFIX: &str = "MSG_";

/// Tool configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the `language_<code>.h` files, relative to the root
    pub language_dir: PathBuf,

    /// Language code of the reference file
    pub reference_language: String,

    /// Language codes rewritten by the fallback pass
    pub languages: Vec<String>,

    /// Macro wrapped around a message symbol to look up its text
    pub lookup_macro: String,

    /// Source rewrite settings
    pub source: SourceConfig,

    /// Suffix expansion settings
    pub expansion: ExpansionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language_dir: PathBuf::from("Marlin/src/lcd/language"),
            reference_language: "en".to_string(),
            languages: vec!["de".to_string(), "cz".to_string()],
            lookup_macro: "GET_TEXT".to_string(),
            source: SourceConfig::default(),
            expansion: ExpansionConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, the user configuration
    /// directory, or fall back to defaults
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::config_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => {
                log::debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load and validate configuration from a JSON file
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Get the default configuration file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_ID).join(CONFIG_FILE_NAME))
    }

    /// Check values the rewrite passes rely on
    pub fn validate(&self) -> ConfigResult<()> {
        if !is_word(&self.lookup_macro) {
            return Err(invalid("lookup_macro", "must be a non-empty identifier"));
        }
        if self.reference_language.is_empty() {
            return Err(invalid("reference_language", "must not be empty"));
        }
        if !self.expansion.base.starts_with(SYMBOL_PREFIX) || !is_word(&self.expansion.base) {
            return Err(invalid(
                "expansion.base",
                &format!("must be an identifier starting with {}", SYMBOL_PREFIX),
            ));
        }
        if let Some(bad) = self
            .expansion
            .suffixes
            .iter()
            .find(|s| !s.is_empty() && !is_word(s))
        {
            return Err(invalid(
                "expansion.suffixes",
                &format!("'{}' is not made of word characters", bad),
            ));
        }
        if self.source.substitutions.iter().any(|s| s.from.is_empty()) {
            return Err(invalid("source.substitutions", "empty search text"));
        }
        Ok(())
    }

    /// Path of the language file for a language code
    pub fn language_file(&self, root: &Path, code: &str) -> PathBuf {
        root.join(&self.language_dir)
            .join(format!("language_{}.h", code))
    }

    /// Path of the reference language file
    pub fn reference_file(&self, root: &Path) -> PathBuf {
        self.language_file(root, &self.reference_language)
    }
}

/// Settings for rewriting message references in code files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Run the source pass as part of `fallback`
    pub enabled: bool,

    /// Source tree to walk, relative to the root
    pub root: PathBuf,

    /// File extensions to rewrite
    pub extensions: Vec<String>,

    /// Literal replacements applied to every source line, in order
    pub substitutions: Vec<Substitution>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            root: PathBuf::from("Marlin/src"),
            extensions: vec!["cpp".to_string()],
            substitutions: Vec::new(),
        }
    }
}

/// A literal text replacement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub from: String,
    pub to: String,
}

/// Settings for generating suffixed variants of one message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Identifier whose definition gets expanded
    pub base: String,

    /// Suffixes to generate; an empty entry keeps the original definition
    pub suffixes: Vec<String>,

    /// Deprecated identifiers renamed when they are synthesized
    pub aliases: Vec<Substitution>,

    /// Language codes processed by the expansion pass
    pub languages: Vec<String>,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        let suffixes = ["", "E1", "E2", "E3", "E4", "E5", "E6"];
        let languages = [
            "an", "bg", "ca", "cz", "da", "de", "en", "el-gr", "el", "es", "eu", "fi", "fr",
            "gl", "hr", "it", "jp-kana", "ko_KR", "nl", "pl", "pt-br", "pt", "ru", "sk",
            "test", "tr", "uk", "vi", "zh_CN", "zh_TW",
        ];

        Self {
            base: "MSG_FILAMENTCHANGE".to_string(),
            suffixes: suffixes.iter().map(|s| s.to_string()).collect(),
            aliases: vec![Substitution {
                from: "MSG_MOVE_E_E".to_string(),
                to: "MSG_MOVE_E".to_string(),
            }],
            languages: languages.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.reference_language, "en");
        assert_eq!(config.languages, vec!["de", "cz"]);
        assert!(!config.source.enabled);
        assert!(config.source.substitutions.is_empty());
        assert_eq!(config.expansion.languages.len(), 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_language_file_path() {
        let config = Config::default();
        let path = config.language_file(Path::new("/fw"), "de");
        assert_eq!(path, PathBuf::from("/fw/Marlin/src/lcd/language/language_de.h"));
        assert_eq!(
            config.reference_file(Path::new("/fw")),
            PathBuf::from("/fw/Marlin/src/lcd/language/language_en.h")
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "languages": ["fr"], "expansion": { "suffixes": ["E1", "E2"] } }"#,
        )
        .unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.languages, vec!["fr"]);
        assert_eq!(config.expansion.suffixes, vec!["E1", "E2"]);
        assert_eq!(config.expansion.base, "MSG_FILAMENTCHANGE");
        assert_eq!(config.lookup_macro, "GET_TEXT");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_missing_explicit_config_is_load_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.json");
        let err = Config::load(Some(missing.as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError { .. }));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.expansion.base = "FILAMENTCHANGE".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.expansion.suffixes = vec!["E 1".to_string()];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.lookup_macro = String::new();
        assert!(config.validate().is_err());
    }
}
