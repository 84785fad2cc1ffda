use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{ClipCutter, CutOutput};
use crate::clip::ClipDescriptor;
use crate::error::{QuoteCutError, Result};

/// Check that the FFmpeg binary runs.
pub fn check_ffmpeg(binary: &Path) -> Result<()> {
    let output = Command::new(binary)
        .arg("-version")
        .output()
        .map_err(|e| {
            QuoteCutError::Ffmpeg(format!(
                "FFmpeg not found at '{}'. Please install FFmpeg and ensure it's in your PATH. Error: {e}",
                binary.display()
            ))
        })?;

    if !output.status.success() {
        return Err(QuoteCutError::Ffmpeg("FFmpeg check failed".to_string()));
    }

    debug!("FFmpeg is available");
    Ok(())
}

/// Arguments for cutting `descriptor` out of `input` into `output`.
///
/// A negative start is clamped to zero here, at the point the tool is
/// invoked; the descriptor keeps the unclamped value.
pub fn ffmpeg_args(input: &Path, descriptor: &ClipDescriptor, output: &Path) -> Vec<OsString> {
    let start = format!("{:.3}", descriptor.start_time.max(0.0));
    let duration = format!("{:.3}", descriptor.duration);

    vec![
        "-ss".into(),
        start.into(),
        "-i".into(),
        input.as_os_str().to_owned(),
        "-t".into(),
        duration.into(),
        "-vcodec".into(),
        descriptor.video_codec.clone().into(),
        "-acodec".into(),
        descriptor.audio_codec.clone().into(),
        "-y".into(),
        output.as_os_str().to_owned(),
    ]
}

/// Render the full command line, quoting arguments that contain spaces.
pub fn render_command(binary: &Path, args: &[OsString]) -> String {
    std::iter::once(binary.as_os_str())
        .chain(args.iter().map(OsString::as_os_str))
        .map(|arg| {
            let arg = arg.to_string_lossy();
            if arg.is_empty() || arg.contains(char::is_whitespace) || arg.contains('\'') {
                format!("'{}'", arg.replace('\'', r"'\''"))
            } else {
                arg.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cuts clips by running the `ffmpeg` binary.
#[derive(Debug, Clone)]
pub struct FfmpegCutter {
    binary: PathBuf,
}

impl Default for FfmpegCutter {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FfmpegCutter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn check_available(&self) -> Result<()> {
        check_ffmpeg(&self.binary)
    }

    pub fn command_line(&self, input: &Path, descriptor: &ClipDescriptor, output: &Path) -> String {
        render_command(&self.binary, &ffmpeg_args(input, descriptor, output))
    }
}

#[async_trait]
impl ClipCutter for FfmpegCutter {
    async fn cut(
        &self,
        input: &Path,
        descriptor: &ClipDescriptor,
        output: &Path,
    ) -> Result<CutOutput> {
        let args = ffmpeg_args(input, descriptor, output);
        debug!("Running: {}", render_command(&self.binary, &args));

        let result = tokio::process::Command::new(&self.binary)
            .args(&args)
            .stdin(std::process::Stdio::null())
            .output()
            .await
            .map_err(|e| QuoteCutError::Ffmpeg(format!("Failed to run FFmpeg: {e}")))?;

        let mut log = String::from_utf8_lossy(&result.stdout).into_owned();
        log.push_str(&String::from_utf8_lossy(&result.stderr));

        if !result.status.success() {
            warn!(
                "FFmpeg exited with {} for {}",
                result.status, descriptor.filename
            );
        }

        Ok(CutOutput {
            success: result.status.success(),
            exit_code: result.status.code(),
            log,
        })
    }

    fn name(&self) -> &'static str {
        "FFmpeg"
    }
}
