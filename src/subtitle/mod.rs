pub mod srt;

pub use srt::{load_srt, parse_srt, parse_timestamp};

/// One timed subtitle record as read from the subtitle file.
///
/// Times are seconds from the start of the video. The parser does not
/// check that `end_time > start_time`; downstream code does plain
/// arithmetic on whatever it receives.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedText {
    pub index: usize,
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
}

impl TimedText {
    pub fn new(index: usize, text: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            index,
            text: text.into(),
            start_time,
            end_time,
        }
    }

    /// Raw display duration of this record.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}
