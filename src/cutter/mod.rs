pub mod ffmpeg;
pub mod runner;

pub use ffmpeg::{check_ffmpeg, ffmpeg_args, render_command, FfmpegCutter};
pub use runner::{ClipResult, ClipRunner, ClipStatus, RunContext, RunReport, RunStats};

use crate::clip::ClipDescriptor;
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

/// What the cutting tool printed and whether it succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    /// Standard output followed by standard error.
    pub log: String,
}

/// Something that can cut a clip out of a video.
#[async_trait]
pub trait ClipCutter: Send + Sync {
    /// Cut `descriptor` out of `input` into `output`.
    ///
    /// A tool that runs and exits nonzero is reported through
    /// `CutOutput::success`; an error means the tool could not be run.
    async fn cut(
        &self,
        input: &Path,
        descriptor: &ClipDescriptor,
        output: &Path,
    ) -> Result<CutOutput>;
    fn name(&self) -> &'static str;
}

/// Make sure `path` can be written: create its parent directory and
/// remove any file already there. Safe to call repeatedly.
pub fn ensure_writable(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed existing file {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
