pub mod filename;

pub use filename::{make_filename, UniqueToken};

use crate::select::Selection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Naming and codec settings for produced clips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipConfig {
    /// Characters of line text kept in the filename (default: 40).
    pub max_filename_length: usize,
    /// Replaces whitespace in filenames (default: '-').
    pub filename_separator: char,
    /// Characters removed from filenames.
    pub stripped_characters: BTreeSet<char>,
    /// Clip file extension without the dot (default: mp4).
    pub extension: String,
    /// Video codec handed to the cutting tool (default: copy).
    pub video_codec: String,
    /// Audio codec handed to the cutting tool (default: copy).
    pub audio_codec: String,
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            max_filename_length: 40,
            filename_separator: '-',
            stripped_characters: ['!', '$', '#', '?', '/', '*', '\'', '.', ',']
                .into_iter()
                .collect(),
            extension: "mp4".to_string(),
            video_codec: "copy".to_string(),
            audio_codec: "copy".to_string(),
        }
    }
}

/// Everything needed to cut one clip.
///
/// `start_time` may be negative; the cutter clamps it to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipDescriptor {
    pub filename: String,
    pub start_time: f64,
    pub duration: f64,
    pub video_codec: String,
    pub audio_codec: String,
    /// Normalized line the clip was cut for.
    pub text: String,
    /// Position of the source record in the subtitle file.
    pub source_index: usize,
}

impl ClipDescriptor {
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.filename)
    }
}

/// Turns selections into descriptors.
///
/// Codec settings are copied into each descriptor when it is built.
#[derive(Debug, Clone)]
pub struct ClipBuilder {
    config: ClipConfig,
    tokens: UniqueToken,
}

impl ClipBuilder {
    pub fn new(config: ClipConfig) -> Self {
        Self {
            config,
            tokens: UniqueToken::default(),
        }
    }

    pub fn with_tokens(mut self, tokens: UniqueToken) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn config(&self) -> &ClipConfig {
        &self.config
    }

    pub fn build(&mut self, selection: &Selection) -> ClipDescriptor {
        let token = self.tokens.next_token();
        ClipDescriptor {
            filename: make_filename(&selection.text, &token, &self.config),
            start_time: selection.window.adjusted_start,
            duration: selection.window.adjusted_duration,
            video_codec: self.config.video_codec.clone(),
            audio_codec: self.config.audio_codec.clone(),
            text: selection.text.clone(),
            source_index: selection.source_index,
        }
    }

    pub fn build_all(&mut self, selections: &[Selection]) -> Vec<ClipDescriptor> {
        selections.iter().map(|s| self.build(s)).collect()
    }
}
