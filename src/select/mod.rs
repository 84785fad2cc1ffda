//! Segment selection: decides which subtitle lines stand on their own as
//! quotable clips and how far to widen their time window.

pub mod eligibility;
pub mod window;

pub use eligibility::{is_eligible, normalize, rejection, Rejection, MUSIC_MARKER};
pub use window::{compute_padding, ClipWindow, LONG_PADDING, SHORT_DURATION_THRESHOLD, SHORT_PADDING};

use crate::subtitle::TimedText;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Limits used by the eligibility filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Longest normalized line, in characters, still considered a quote.
    pub max_line_length: usize,
    /// Characters accepted as the end of a complete sentence.
    pub terminal_punctuation: BTreeSet<char>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_line_length: 35,
            terminal_punctuation: ['.', '!', '?'].into_iter().collect(),
        }
    }
}

/// A subtitle line that passed the filter, with its corrected window.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Position of the record in the input sequence.
    pub source_index: usize,
    /// Normalized line text.
    pub text: String,
    pub window: ClipWindow,
}

/// Stateless filter over timed records.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    config: SelectorConfig,
}

impl Selector {
    pub fn new(config: SelectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Normalize one record and either select it or say which rule rejected it.
    pub fn evaluate(
        &self,
        source_index: usize,
        record: &TimedText,
    ) -> std::result::Result<Selection, Rejection> {
        let text = normalize(&record.text);
        if let Some(reason) = rejection(&text, &self.config) {
            return Err(reason);
        }

        Ok(Selection {
            source_index,
            text,
            window: ClipWindow::for_interval(record.start_time, record.end_time),
        })
    }

    /// Select every eligible record, preserving input order.
    pub fn select(&self, records: &[TimedText]) -> Vec<Selection> {
        records
            .iter()
            .enumerate()
            .filter_map(|(i, record)| self.evaluate(i, record).ok())
            .collect()
    }
}
