use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use zettel_tags_engine::options::Options;

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

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    ExcludePatternError {
        pattern: String,
        source: glob::PatternError,
    },
}

/// The `config.toml` file.
///
/// ```toml
/// notes_path = "~/notes"
/// exclude = ["archive/**", "*.draft.md"]
///
/// [tags]
/// definition_format = "%{identifier}:%{title}"
/// next_prefix = "->"
/// folgezettel = true
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scanned when no path is given on the command line.
    pub notes_path: Option<PathBuf>,
    /// Glob patterns, relative to the scanned root, of files to skip.
    pub exclude: Vec<String>,
    pub tags: Options,
}

impl Config {
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

        // Expand shell variables and tilde in the loaded notes path
        config.notes_path = config
            .notes_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/zettel-tags");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Compiles the `exclude` patterns.
    pub fn exclusions(&self) -> Result<Exclusions, ConfigError> {
        let patterns = self
            .exclude
            .iter()
            .map(|pattern| {
                glob::Pattern::new(pattern).map_err(|source| ConfigError::ExcludePatternError {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Exclusions { patterns })
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

/// Compiled exclude patterns.
#[derive(Debug, Default)]
pub struct Exclusions {
    patterns: Vec<glob::Pattern>,
}

impl Exclusions {
    /// `relative_path` uses `/` separators, relative to the scanned root.
    pub fn is_excluded(&self, relative_path: &str) -> bool {
        let options = glob::MatchOptions {
            require_literal_separator: true,
            ..glob::MatchOptions::new()
        };
        self.patterns
            .iter()
            .any(|pattern| pattern.matches_with(relative_path, options))
    }
}
