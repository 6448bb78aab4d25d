use mazmundama_engine::{DEFAULT_CHARS_PER_PAGE, Granularity, PipelineOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value in config file at {config_path}: {message}")]
    InvalidValue {
        config_path: PathBuf,
        message: String,
    },
}

/// Settings read from `~/.config/mazmundama/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Root directory of the book store.
    pub store_path: PathBuf,
    /// Visible characters per page.
    #[serde(default = "default_chars_per_page")]
    pub chars_per_page: usize,
    /// Whether documents are split per block or per sentence.
    #[serde(default)]
    pub granularity: Granularity,
    /// Remove images from uploaded documents.
    #[serde(default = "default_strip_images")]
    pub strip_images: bool,
}

fn default_chars_per_page() -> usize {
    DEFAULT_CHARS_PER_PAGE
}

fn default_strip_images() -> bool {
    true
}

impl Config {
    /// Config with default pipeline settings storing books under `store_path`.
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
            chars_per_page: default_chars_per_page(),
            granularity: Granularity::default(),
            strip_images: default_strip_images(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        if config.chars_per_page == 0 {
            return Err(ConfigError::InvalidValue {
                config_path: config_path.to_path_buf(),
                message: "chars_per_page must be greater than zero".to_string(),
            });
        }

        // Expand shell variables and tilde in the store path
        config.store_path = Self::expand_path(&config.store_path).unwrap_or(config.store_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/mazmundama");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Pipeline settings for documents processed under this config.
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            granularity: self.granularity,
            chars_per_page: self.chars_per_page,
            strip_images: self.strip_images,
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        shellexpand::full(&path_str)
            .ok()
            .map(|expanded| PathBuf::from(expanded.as_ref()))
    }
}
