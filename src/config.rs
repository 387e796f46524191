use crate::error::{Result, SmilError};
use crate::smil::LoadOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Srt,
    Vtt,
    Json,
    Smil,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Srt => write!(f, "srt"),
            OutputFormat::Vtt => write!(f, "vtt"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Smil => write!(f, "smil"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "srt" => Ok(OutputFormat::Srt),
            "vtt" => Ok(OutputFormat::Vtt),
            "json" => Ok(OutputFormat::Json),
            "smil" => Ok(OutputFormat::Smil),
            _ => Err(format!(
                "Unknown format: {}. Use 'srt', 'vtt', 'json', or 'smil'",
                s
            )),
        }
    }
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Srt => "srt",
            OutputFormat::Vtt => "vtt",
            OutputFormat::Json => "json",
            OutputFormat::Smil => "smil",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_format: OutputFormat,
    /// Sibling directory tried when a `text/` reference is missing.
    pub fallback_text_dir: String,
    /// Collapse whitespace runs in resolved entry text.
    pub normalize_whitespace: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::default(),
            fallback_text_dir: "sync_text".to_string(),
            normalize_whitespace: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                config = toml::from_str::<Config>(&contents).map_err(|e| {
                    SmilError::Config(format!("{}: {}", config_path.display(), e))
                })?;
            }
        }

        // Override with environment variables
        if let Ok(format) = std::env::var("SMILSUB_DEFAULT_FORMAT") {
            if let Ok(f) = format.parse() {
                config.default_format = f;
            }
        }
        if let Ok(dir) = std::env::var("SMILSUB_FALLBACK_TEXT_DIR") {
            config.fallback_text_dir = dir;
        }
        if let Ok(normalize) = std::env::var("SMILSUB_NORMALIZE_WHITESPACE") {
            if let Ok(n) = normalize.parse() {
                config.normalize_whitespace = n;
            }
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fallback_text_dir.trim().is_empty() {
            return Err(SmilError::Config(
                "fallback_text_dir must not be empty".to_string(),
            ));
        }

        if self.fallback_text_dir.contains(['/', '\\']) {
            return Err(SmilError::Config(format!(
                "fallback_text_dir must be a single directory name, got '{}'",
                self.fallback_text_dir
            )));
        }

        Ok(())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            fallback_text_dir: self.fallback_text_dir.clone(),
            normalize_whitespace: self.normalize_whitespace,
        }
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("smilsub").join("config.toml"))
    }
}
