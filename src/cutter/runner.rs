use super::{ensure_writable, ClipCutter};
use crate::clip::ClipDescriptor;
use crate::error::Result;
use crate::runlog::RunLog;
use futures::stream::{FuturesUnordered, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Where clips are read from and written to.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub log: RunLog,
}

impl RunContext {
    pub fn new(input: PathBuf, output_dir: PathBuf, separator: char) -> Self {
        let log = RunLog::new(&output_dir, separator);
        Self {
            input,
            output_dir,
            log,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipStatus {
    Cut,
    Failed,
    /// Not started because the run was cancelled.
    Skipped,
}

/// Outcome of one descriptor.
#[derive(Debug, Clone)]
pub struct ClipResult {
    pub position: usize,
    pub descriptor: ClipDescriptor,
    pub output_path: PathBuf,
    pub log_path: Option<PathBuf>,
    pub status: ClipStatus,
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl ClipResult {
    pub fn is_success(&self) -> bool {
        self.status == ClipStatus::Cut
    }
}

#[derive(Debug, Clone)]
pub struct RunStats {
    pub total_clips: usize,
    pub cut_clips: usize,
    pub failed_clips: usize,
    pub skipped_clips: usize,
    pub total_time: Duration,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    /// One entry per descriptor, in descriptor order.
    pub results: Vec<ClipResult>,
    pub stats: RunStats,
}

/// Runs descriptors through a cutter with bounded concurrency.
///
/// Each descriptor is independent: a failure is recorded and the others
/// keep going. Outputs are uniquely named, so re-running a descriptor is
/// safe.
pub struct ClipRunner {
    cutter: Arc<dyn ClipCutter>,
    concurrency: usize,
    show_progress: bool,
}

impl ClipRunner {
    pub fn new(cutter: Box<dyn ClipCutter>, concurrency: usize) -> Self {
        Self {
            cutter: Arc::from(cutter),
            concurrency: concurrency.max(1),
            show_progress: true,
        }
    }

    /// Enable or disable progress bar display.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub async fn run(
        &self,
        descriptors: Vec<ClipDescriptor>,
        context: &RunContext,
        cancelled: Arc<AtomicBool>,
    ) -> Result<RunReport> {
        let start_time = Instant::now();
        let total_clips = descriptors.len();

        std::fs::create_dir_all(&context.output_dir)?;

        info!(
            "Cutting {} clips with {} concurrent jobs using {}",
            total_clips,
            self.concurrency,
            self.cutter.name()
        );

        let progress_bar = if self.show_progress && total_clips > 0 {
            let pb = ProgressBar::new(total_clips as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} clips ({eta})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let context = Arc::new(context.clone());
        let mut futures = FuturesUnordered::new();

        for (position, descriptor) in descriptors.into_iter().enumerate() {
            let sem = semaphore.clone();
            let cutter = self.cutter.clone();
            let context = context.clone();
            let cancelled = cancelled.clone();
            let pb = progress_bar.clone();

            futures.push(async move {
                let _permit = sem.acquire().await.ok();
                let result =
                    cut_one(&*cutter, &context, position, descriptor, &cancelled).await;
                if let Some(ref pb) = pb {
                    pb.inc(1);
                }
                result
            });
        }

        let mut results: Vec<ClipResult> = Vec::with_capacity(total_clips);
        while let Some(result) = futures.next().await {
            results.push(result);
        }

        if let Some(pb) = progress_bar {
            pb.finish_with_message("Cutting complete");
        }

        results.sort_by_key(|r| r.position);

        let count = |status: ClipStatus| results.iter().filter(|r| r.status == status).count();
        let stats = RunStats {
            total_clips,
            cut_clips: count(ClipStatus::Cut),
            failed_clips: count(ClipStatus::Failed),
            skipped_clips: count(ClipStatus::Skipped),
            total_time: start_time.elapsed(),
        };

        info!(
            "Cutting complete: {}/{} clips in {:.2}s ({} failed, {} skipped)",
            stats.cut_clips,
            total_clips,
            stats.total_time.as_secs_f64(),
            stats.failed_clips,
            stats.skipped_clips
        );

        Ok(RunReport { results, stats })
    }
}

async fn cut_one(
    cutter: &dyn ClipCutter,
    context: &RunContext,
    position: usize,
    descriptor: ClipDescriptor,
    cancelled: &AtomicBool,
) -> ClipResult {
    let started = Instant::now();
    let output_path = descriptor.output_path(&context.output_dir);
    let mut result = ClipResult {
        position,
        descriptor,
        output_path,
        log_path: None,
        status: ClipStatus::Skipped,
        error: None,
        duration_ms: 0,
    };

    if cancelled.load(Ordering::Relaxed) {
        debug!("Skipping {} after cancellation", result.descriptor.filename);
        return result;
    }

    if let Err(e) = ensure_writable(&result.output_path) {
        warn!("Cannot write {}: {}", result.output_path.display(), e);
        result.status = ClipStatus::Failed;
        result.error = Some(e.to_string());
        return result;
    }

    debug!("Cutting clip {} ({})", position, result.descriptor.filename);

    match cutter
        .cut(&context.input, &result.descriptor, &result.output_path)
        .await
    {
        Ok(output) => {
            match context.log.write(&output.log) {
                Ok(path) => result.log_path = Some(path),
                Err(e) => warn!("Failed to write log for {}: {}", result.descriptor.filename, e),
            }
            if output.success {
                result.status = ClipStatus::Cut;
            } else {
                result.status = ClipStatus::Failed;
                result.error = Some(match output.exit_code {
                    Some(code) => format!("{} exited with code {}", cutter.name(), code),
                    None => format!("{} was terminated by a signal", cutter.name()),
                });
            }
        }
        Err(e) => {
            warn!("Clip {} failed: {}", result.descriptor.filename, e);
            result.status = ClipStatus::Failed;
            result.error = Some(e.to_string());
        }
    }

    result.duration_ms = started.elapsed().as_millis() as u64;
    result
}
