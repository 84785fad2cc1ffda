use crate::clip::ClipConfig;
use crate::error::{QuoteCutError, Result};
use crate::select::SelectorConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// How a dry run prints the planned clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanFormat {
    #[default]
    Commands,
    Json,
}

impl std::fmt::Display for PlanFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanFormat::Commands => write!(f, "commands"),
            PlanFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for PlanFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "commands" => Ok(PlanFormat::Commands),
            "json" => Ok(PlanFormat::Json),
            _ => Err(format!("Unknown format: {}. Use 'commands' or 'json'", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_filename_length: usize,
    pub filename_separator: char,
    pub max_line_length: usize,
    pub video_codec: String,
    pub audio_codec: String,
    pub terminal_punctuation: BTreeSet<char>,
    pub clip_extension: String,
    pub ffmpeg_path: PathBuf,
    pub concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        let selector = SelectorConfig::default();
        let clip = ClipConfig::default();
        Self {
            max_filename_length: clip.max_filename_length,
            filename_separator: clip.filename_separator,
            max_line_length: selector.max_line_length,
            video_codec: clip.video_codec,
            audio_codec: clip.audio_codec,
            terminal_punctuation: selector.terminal_punctuation,
            clip_extension: clip.extension,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            concurrency: 4,
        }
    }
}

impl Config {
    /// Defaults, then the user config file, then `QUOTECUT_*` variables.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_file_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read a TOML config file. Missing keys keep their defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        match toml::from_str::<Config>(&contents) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                Ok(config)
            }
            Err(e) => {
                warn!("Ignoring invalid config file {}: {}", path.display(), e);
                Ok(Self::default())
            }
        }
    }

    /// Apply overrides looked up by variable name. Unparseable values are skipped.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(codec) = lookup("QUOTECUT_VIDEO_CODEC") {
            self.video_codec = codec;
        }
        if let Some(codec) = lookup("QUOTECUT_AUDIO_CODEC") {
            self.audio_codec = codec;
        }
        if let Some(path) = lookup("QUOTECUT_FFMPEG") {
            self.ffmpeg_path = PathBuf::from(path);
        }
        if let Some(length) = lookup("QUOTECUT_MAX_LINE_LENGTH") {
            if let Ok(l) = length.parse() {
                self.max_line_length = l;
            }
        }
        if let Some(length) = lookup("QUOTECUT_MAX_FILENAME_LENGTH") {
            if let Ok(l) = length.parse() {
                self.max_filename_length = l;
            }
        }
        if let Some(concurrency) = lookup("QUOTECUT_CONCURRENCY") {
            if let Ok(c) = concurrency.parse() {
                self.concurrency = c;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_line_length == 0 {
            return Err(QuoteCutError::Config(
                "max_line_length must be greater than 0".to_string(),
            ));
        }
        if self.max_filename_length == 0 {
            return Err(QuoteCutError::Config(
                "max_filename_length must be greater than 0".to_string(),
            ));
        }
        if self.terminal_punctuation.is_empty() {
            return Err(QuoteCutError::Config(
                "terminal_punctuation must not be empty".to_string(),
            ));
        }
        if self.filename_separator.is_whitespace()
            || self.clip_config().stripped_characters.contains(&self.filename_separator)
        {
            return Err(QuoteCutError::Config(format!(
                "filename_separator '{}' would be stripped from filenames",
                self.filename_separator
            )));
        }
        if self.clip_extension.trim().is_empty() {
            return Err(QuoteCutError::Config(
                "clip_extension must not be empty".to_string(),
            ));
        }
        if self.video_codec.trim().is_empty() || self.audio_codec.trim().is_empty() {
            return Err(QuoteCutError::Config(
                "video_codec and audio_codec must not be empty".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(QuoteCutError::Config(
                "Concurrency must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn selector_config(&self) -> SelectorConfig {
        SelectorConfig {
            max_line_length: self.max_line_length,
            terminal_punctuation: self.terminal_punctuation.clone(),
        }
    }

    pub fn clip_config(&self) -> ClipConfig {
        ClipConfig {
            max_filename_length: self.max_filename_length,
            filename_separator: self.filename_separator,
            extension: self.clip_extension.clone(),
            video_codec: self.video_codec.clone(),
            audio_codec: self.audio_codec.clone(),
            ..ClipConfig::default()
        }
    }

    pub fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("quotecut").join("config.toml"))
    }
}
