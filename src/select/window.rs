/// Durations at or below this many seconds get the wider padding.
pub const SHORT_DURATION_THRESHOLD: f64 = 1.10;

/// Padding for short lines, in seconds.
pub const SHORT_PADDING: f64 = 0.35;

/// Padding for everything else, in seconds.
pub const LONG_PADDING: f64 = 0.20;

/// Slack to add around a subtitle of the given display duration.
///
/// Short subtitles tend to be timed too tightly by authoring tools, so
/// they get more room before the cut. Zero, negative and NaN durations
/// are accepted; only NaN falls through to the long tier.
pub fn compute_padding(duration: f64) -> f64 {
    if duration <= SHORT_DURATION_THRESHOLD {
        SHORT_PADDING
    } else {
        LONG_PADDING
    }
}

/// Corrected cut window for one subtitle line.
///
/// `adjusted_start` is not clamped and can be negative for lines near the
/// start of the video; whoever runs the cut clamps it to zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipWindow {
    pub padding: f64,
    pub adjusted_start: f64,
    pub adjusted_duration: f64,
}

impl ClipWindow {
    pub fn for_interval(start_time: f64, end_time: f64) -> Self {
        let duration = end_time - start_time;
        let padding = compute_padding(duration);
        Self {
            padding,
            adjusted_start: start_time - padding,
            adjusted_duration: duration + padding,
        }
    }

    /// End of the window, `adjusted_start + adjusted_duration`.
    pub fn adjusted_end(&self) -> f64 {
        self.adjusted_start + self.adjusted_duration
    }
}
