// SubRip (.srt) reader
use super::TimedText;
use crate::error::{QuoteCutError, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

const TIMESTAMP_PATTERN: &str = r"(\d+):(\d{2}):(\d{2})[,.](\d{1,3})";

fn timing_regex() -> &'static Regex {
    static TIMING: OnceLock<Regex> = OnceLock::new();
    TIMING.get_or_init(|| {
        Regex::new(&format!(
            r"^\s*{TIMESTAMP_PATTERN}\s*-->\s*{TIMESTAMP_PATTERN}"
        ))
        .expect("Invalid regex")
    })
}

fn timestamp_regex() -> &'static Regex {
    static TIMESTAMP: OnceLock<Regex> = OnceLock::new();
    TIMESTAMP.get_or_init(|| {
        Regex::new(&format!(r"^\s*{TIMESTAMP_PATTERN}\s*$")).expect("Invalid regex")
    })
}

/// Parse a single SRT timestamp (`HH:MM:SS,mmm`) into seconds.
pub fn parse_timestamp(timestamp: &str) -> Option<f64> {
    let caps = timestamp_regex().captures(timestamp)?;
    Some(seconds_from_parts(&caps[1], &caps[2], &caps[3], &caps[4]))
}

fn seconds_from_parts(hours: &str, minutes: &str, seconds: &str, fraction: &str) -> f64 {
    let hours: f64 = hours.parse().unwrap_or(0.0);
    let minutes: f64 = minutes.parse().unwrap_or(0.0);
    let seconds: f64 = seconds.parse().unwrap_or(0.0);
    // "5" after the comma means half a second, not five milliseconds
    let fraction: f64 = format!("0.{fraction}").parse().unwrap_or(0.0);
    hours * 3600.0 + minutes * 60.0 + seconds + fraction
}

fn parse_timing_line(line: &str) -> Option<(f64, f64)> {
    let caps = timing_regex().captures(line)?;
    let start = seconds_from_parts(&caps[1], &caps[2], &caps[3], &caps[4]);
    let end = seconds_from_parts(&caps[5], &caps[6], &caps[7], &caps[8]);
    Some((start, end))
}

/// Parse SubRip content into timed records, keeping file order.
pub fn parse_srt(contents: &str) -> Result<Vec<TimedText>> {
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);
    let mut records = Vec::new();
    let mut block: Vec<&str> = Vec::new();
    let mut block_number = 0;

    for line in contents.lines().chain(std::iter::once("")) {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            if !block.is_empty() {
                block_number += 1;
                records.push(parse_block(&block, block_number)?);
                block.clear();
            }
            continue;
        }
        block.push(line);
    }

    debug!("Parsed {} subtitle records", records.len());
    Ok(records)
}

fn parse_block(lines: &[&str], block_number: usize) -> Result<TimedText> {
    let (index, timing_at) = match lines[0].trim().parse::<usize>() {
        Ok(index) if lines.len() > 1 => (index, 1),
        _ => (block_number, 0),
    };

    let timing = lines[timing_at];
    let (start_time, end_time) =
        parse_timing_line(timing).ok_or_else(|| QuoteCutError::SubtitleParse {
            block: block_number,
            message: format!("invalid timing line '{}'", timing.trim()),
        })?;

    let text = lines[timing_at + 1..].join("\n");

    Ok(TimedText {
        index,
        text,
        start_time,
        end_time,
    })
}

/// Read and parse an SRT file.
pub fn load_srt(path: &Path) -> Result<Vec<TimedText>> {
    if !path.exists() {
        return Err(QuoteCutError::FileNotFound(path.display().to_string()));
    }
    let bytes = std::fs::read(path)?;
    parse_srt(&String::from_utf8_lossy(&bytes))
}
