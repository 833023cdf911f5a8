//! Configuration management for doclens using the prefer crate.
//!
//! Settings are layered: built-in defaults, then a config file (explicit
//! `--config` path or discovered by prefer as `doclens.{toml,yaml,json}`),
//! then environment variables, then command-line flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::analysis::{AnalysisOptions, StopwordResources, TokenizerMode};
use crate::llm::LlmConfig;

/// Default inputs directory, relative to the working directory.
pub const DEFAULT_INPUTS_DIR: &str = "inputs";

const HISTORY_FILENAME: &str = "conversation_history.json";
const CREDENTIALS_FILENAME: &str = "api_keys.json";
const RESOURCES_SUBDIR: &str = "resources";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config {}: {message}", path.display())]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory for history, keys and resources.
    pub data_dir: PathBuf,
    /// Directory scanned for documents.
    pub inputs_dir: PathBuf,
    /// Directory export files are written to.
    pub export_dir: PathBuf,
    pub history_file: PathBuf,
    pub credentials_file: PathBuf,
    /// Holds the `stopwords/` lists for the linguistic tokenizer.
    pub resources_dir: PathBuf,
    pub tokenizer: TokenizerMode,
    pub analysis: AnalysisOptions,
    pub llm: LlmConfig,
}

impl Default for Settings {
    fn default() -> Self {
        // Platform data dir -> Home dir -> Current dir
        let data_dir = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("doclens");
        Self::with_data_dir(data_dir)
    }
}

impl Settings {
    /// Create settings with a custom data directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            inputs_dir: PathBuf::from(DEFAULT_INPUTS_DIR),
            export_dir: PathBuf::from("."),
            history_file: data_dir.join(HISTORY_FILENAME),
            credentials_file: data_dir.join(CREDENTIALS_FILENAME),
            resources_dir: data_dir.join(RESOURCES_SUBDIR),
            data_dir,
            tokenizer: TokenizerMode::default(),
            analysis: AnalysisOptions::default(),
            llm: LlmConfig::default(),
        }
    }

    pub fn stopword_resources(&self) -> StopwordResources {
        StopwordResources::new(&self.resources_dir)
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data directory path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<String>,
    /// Overrides `<data_dir>/conversation_history.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_file: Option<String>,
    /// Overrides `<data_dir>/api_keys.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokenizer: Option<TokenizerMode>,
    #[serde(default)]
    pub analysis: AnalysisOptions,
    #[serde(default)]
    pub llm: LlmConfig,
    /// Path the config was loaded from.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Discover and load a config file, falling back to defaults.
    pub async fn load() -> Self {
        match prefer::load("doclens").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            warn!("Ignoring config file: {}", e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            Err(_) => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let parse_error = |format: &'static str, message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            format,
            message,
        };

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents).map_err(|e| parse_error("TOML", e.to_string()))?,
            "yaml" | "yml" => {
                serde_yaml::from_str(&contents).map_err(|e| parse_error("YAML", e.to_string()))?
            }
            _ => serde_json::from_str(&contents).map_err(|e| parse_error("JSON", e.to_string()))?,
        };

        config.source_path = Some(path.to_path_buf());
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// The config file's parent directory, if loaded from a file.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are resolved relative to `base_dir`
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref data_dir) = self.data_dir {
            let data_dir = self.resolve_path(data_dir, base_dir);
            let rebased = Settings::with_data_dir(data_dir);
            settings.history_file = rebased.history_file;
            settings.credentials_file = rebased.credentials_file;
            settings.resources_dir = rebased.resources_dir;
            settings.data_dir = rebased.data_dir;
        }
        if let Some(ref dir) = self.inputs_dir {
            settings.inputs_dir = self.resolve_path(dir, base_dir);
        }
        if let Some(ref dir) = self.export_dir {
            settings.export_dir = self.resolve_path(dir, base_dir);
        }
        if let Some(ref file) = self.history_file {
            settings.history_file = self.resolve_path(file, base_dir);
        }
        if let Some(ref file) = self.credentials_file {
            settings.credentials_file = self.resolve_path(file, base_dir);
        }
        if let Some(ref dir) = self.resources_dir {
            settings.resources_dir = self.resolve_path(dir, base_dir);
        }
        if let Some(mode) = self.tokenizer {
            settings.tokenizer = mode;
        }
        settings.analysis = self.analysis.clone();
        settings.llm = self.llm.clone();
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Inputs directory (--inputs flag).
    pub inputs: Option<PathBuf>,
    /// Tokenizer mode (--tokenizer flag).
    pub tokenizer: Option<TokenizerMode>,
}

/// Apply `DOCLENS_*` and `LLM_*` environment overrides.
fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(dir) = std::env::var("DOCLENS_INPUTS_DIR") {
        settings.inputs_dir = PathBuf::from(shellexpand::tilde(&dir).as_ref());
    }
    if let Ok(val) = std::env::var("DOCLENS_TOKENIZER") {
        match val.parse::<TokenizerMode>() {
            Ok(mode) => settings.tokenizer = mode,
            Err(e) => warn!("Ignoring DOCLENS_TOKENIZER: {}", e),
        }
    }
    settings.llm = settings.llm.clone().with_env_overrides();
}

/// Resolve settings from defaults, config file, environment and flags.
pub async fn load_settings(options: &LoadOptions) -> Result<Settings, ConfigError> {
    let config = match options.config_path {
        Some(ref path) => Config::load_from_path(path).await?,
        None => Config::load().await,
    };

    let base_dir = config
        .base_dir()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings, &base_dir);
    apply_env_overrides(&mut settings);

    if let Some(ref inputs) = options.inputs {
        settings.inputs_dir = inputs.clone();
    }
    if let Some(mode) = options.tokenizer {
        settings.tokenizer = mode;
    }

    debug!(
        "Settings: inputs={} data={} tokenizer={:?}",
        settings.inputs_dir.display(),
        settings.data_dir.display(),
        settings.tokenizer
    );
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmProvider;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings_layout() {
        let settings = Settings::with_data_dir(PathBuf::from("/data/doclens"));
        assert_eq!(settings.inputs_dir, PathBuf::from("inputs"));
        assert_eq!(settings.export_dir, PathBuf::from("."));
        assert_eq!(
            settings.history_file,
            PathBuf::from("/data/doclens/conversation_history.json")
        );
        assert_eq!(
            settings.credentials_file,
            PathBuf::from("/data/doclens/api_keys.json")
        );
        assert_eq!(
            settings.stopword_resources().dir(),
            Path::new("/data/doclens/resources/stopwords")
        );
    }

    #[tokio::test]
    async fn test_load_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("doclens.toml");
        std::fs::write(
            &path,
            r#"
inputs_dir = "docs"
tokenizer = "manual"

[analysis]
top_keywords = 10

[llm]
provider = "ollama"
"#,
        )
        .unwrap();

        let config = Config::load_from_path(&path).await.unwrap();
        assert_eq!(config.tokenizer, Some(TokenizerMode::Manual));
        assert_eq!(config.analysis.top_keywords, 10);
        assert_eq!(config.analysis.context_chars, 100);
        assert_eq!(config.llm.provider, LlmProvider::Ollama);
        assert_eq!(config.base_dir().as_deref(), Some(temp.path()));

        let mut settings = Settings::with_data_dir(temp.path().join("data"));
        config.apply_to_settings(&mut settings, temp.path());
        assert_eq!(settings.inputs_dir, temp.path().join("docs"));
        assert_eq!(settings.tokenizer, TokenizerMode::Manual);
    }

    #[tokio::test]
    async fn test_load_yaml_and_json() {
        let temp = TempDir::new().unwrap();
        let yaml = temp.path().join("doclens.yaml");
        std::fs::write(&yaml, "data_dir: ./state\ntokenizer: linguistic\n").unwrap();
        let config = Config::load_from_path(&yaml).await.unwrap();
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings, temp.path());
        assert_eq!(settings.data_dir, temp.path().join("./state"));
        assert_eq!(
            settings.history_file,
            temp.path().join("./state").join("conversation_history.json")
        );
        assert_eq!(settings.tokenizer, TokenizerMode::Linguistic);

        let json = temp.path().join("doclens.json");
        std::fs::write(&json, r#"{"export_dir": "/tmp/exports"}"#).unwrap();
        let config = Config::load_from_path(&json).await.unwrap();
        assert_eq!(config.export_dir.as_deref(), Some("/tmp/exports"));
    }

    #[tokio::test]
    async fn test_load_errors() {
        let temp = TempDir::new().unwrap();
        let missing = Config::load_from_path(&temp.path().join("nope.toml")).await;
        assert!(matches!(missing, Err(ConfigError::Read { .. })));

        let bad = temp.path().join("bad.toml");
        std::fs::write(&bad, "tokenizer = [").unwrap();
        let parsed = Config::load_from_path(&bad).await;
        assert!(matches!(
            parsed,
            Err(ConfigError::Parse { format: "TOML", .. })
        ));
    }

    #[test]
    fn test_resolve_path() {
        let config = Config::default();
        let base = Path::new("/etc/doclens");
        assert_eq!(
            config.resolve_path("/abs/inputs", base),
            PathBuf::from("/abs/inputs")
        );
        assert_eq!(
            config.resolve_path("inputs", base),
            PathBuf::from("/etc/doclens/inputs")
        );
        assert!(!config.resolve_path("~/docs", base).starts_with("~"));
    }

    #[tokio::test]
    async fn test_flags_override_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("doclens.toml");
        std::fs::write(&path, "inputs_dir = \"docs\"\ntokenizer = \"linguistic\"\n").unwrap();

        let options = LoadOptions {
            config_path: Some(path),
            inputs: Some(PathBuf::from("/srv/pdfs")),
            tokenizer: Some(TokenizerMode::Manual),
        };
        let settings = load_settings(&options).await.unwrap();
        assert_eq!(settings.inputs_dir, PathBuf::from("/srv/pdfs"));
        assert_eq!(settings.tokenizer, TokenizerMode::Manual);
    }
}
