use crate::clip::{ClipBuilder, ClipDescriptor, UniqueToken};
use crate::config::{Config, PlanFormat};
use crate::cutter::{ClipRunner, FfmpegCutter, RunContext, RunReport};
use crate::error::{QuoteCutError, Result};
use crate::select::{Rejection, Selector};
use crate::subtitle::{load_srt, TimedText};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Options for one run of the clip pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Plan clips without running the cutting tool.
    pub dry_run: bool,
    /// How a dry run prints its plan.
    pub plan_format: PlanFormat,
    /// Show progress bars.
    pub show_progress: bool,
    /// Filename suffixes; random unless overridden.
    pub tokens: UniqueToken,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            plan_format: PlanFormat::default(),
            show_progress: true,
            tokens: UniqueToken::default(),
        }
    }
}

/// How many subtitle lines were kept, and why the others were not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanSummary {
    pub total_lines: usize,
    pub selected_lines: usize,
    pub rejected: BTreeMap<Rejection, usize>,
}

impl PlanSummary {
    pub fn rejected_lines(&self) -> usize {
        self.rejected.values().sum()
    }
}

/// Result of the clip pipeline.
#[derive(Debug)]
pub struct PipelineResult {
    pub output_dir: PathBuf,
    pub descriptors: Vec<ClipDescriptor>,
    pub summary: PlanSummary,
    /// `None` for dry runs.
    pub report: Option<RunReport>,
    pub total_time: Duration,
}

/// Default clip directory: `<video stem>-clips` next to the video.
pub fn derive_output_dir(video: &Path) -> PathBuf {
    let stem = video.file_stem().unwrap_or_default();
    let mut output = video.to_path_buf();
    output.set_file_name(format!("{}-clips", stem.to_string_lossy()));
    output
}

/// Select eligible lines and build their descriptors, in input order.
pub fn plan_clips_with(
    records: &[TimedText],
    selector: &Selector,
    builder: &mut ClipBuilder,
) -> (Vec<ClipDescriptor>, PlanSummary) {
    let mut summary = PlanSummary {
        total_lines: records.len(),
        ..PlanSummary::default()
    };
    let mut descriptors = Vec::new();

    for (i, record) in records.iter().enumerate() {
        match selector.evaluate(i, record) {
            Ok(selection) => descriptors.push(builder.build(&selection)),
            Err(reason) => *summary.rejected.entry(reason).or_insert(0) += 1,
        }
    }
    summary.selected_lines = descriptors.len();

    debug!(
        "Selected {}/{} lines, rejected: {:?}",
        summary.selected_lines, summary.total_lines, summary.rejected
    );
    (descriptors, summary)
}

/// Plan clips for `records` with the selector and naming from `config`.
pub fn plan_clips(records: &[TimedText], config: &Config) -> Vec<ClipDescriptor> {
    let selector = Selector::new(config.selector_config());
    let mut builder = ClipBuilder::new(config.clip_config());
    plan_clips_with(records, &selector, &mut builder).0
}

/// Render a dry-run plan as command lines or JSON.
pub fn render_plan(
    descriptors: &[ClipDescriptor],
    format: PlanFormat,
    cutter: &FfmpegCutter,
    input: &Path,
    output_dir: &Path,
) -> Result<String> {
    match format {
        PlanFormat::Commands => Ok(descriptors
            .iter()
            .map(|d| cutter.command_line(input, d, &d.output_path(output_dir)))
            .collect::<Vec<_>>()
            .join("\n")),
        PlanFormat::Json => Ok(serde_json::to_string_pretty(descriptors)?),
    }
}

/// Cut quotable clips out of `video` using the lines of `subtitles`.
///
/// This is the main entry point. It:
/// 1. Reads the subtitle file
/// 2. Selects eligible lines and builds clip descriptors
/// 3. Cuts each clip with FFmpeg and logs the tool output (skipped on a dry run)
pub async fn cut_clips(
    video: &Path,
    subtitles: &Path,
    output_dir: &Path,
    config: &Config,
    pipeline_config: PipelineConfig,
) -> Result<PipelineResult> {
    let cancelled = Arc::new(AtomicBool::new(false));
    cut_clips_with_cancel(video, subtitles, output_dir, config, pipeline_config, cancelled).await
}

/// Cut clips with cancellation support.
pub async fn cut_clips_with_cancel(
    video: &Path,
    subtitles: &Path,
    output_dir: &Path,
    config: &Config,
    pipeline_config: PipelineConfig,
    cancelled: Arc<AtomicBool>,
) -> Result<PipelineResult> {
    let start_time = Instant::now();
    config.validate()?;

    if !pipeline_config.dry_run && !video.exists() {
        return Err(QuoteCutError::FileNotFound(video.display().to_string()));
    }

    info!("Stage 1/3: Reading subtitles from {:?}", subtitles);
    let records = load_srt(subtitles)?;
    info!("Read {} subtitle lines", records.len());

    info!("Stage 2/3: Selecting quotable lines");
    let selector = Selector::new(config.selector_config());
    let mut builder = ClipBuilder::new(config.clip_config()).with_tokens(pipeline_config.tokens);
    let (descriptors, summary) = plan_clips_with(&records, &selector, &mut builder);
    info!(
        "Selected {} of {} lines",
        summary.selected_lines, summary.total_lines
    );

    if pipeline_config.dry_run {
        info!("Dry run: skipping stage 3/3");
        return Ok(PipelineResult {
            output_dir: output_dir.to_path_buf(),
            descriptors,
            summary,
            report: None,
            total_time: start_time.elapsed(),
        });
    }

    if cancelled.load(Ordering::Relaxed) {
        return Err(QuoteCutError::Cancelled);
    }

    info!("Stage 3/3: Cutting {} clips", descriptors.len());
    let cutter = FfmpegCutter::new(&config.ffmpeg_path);
    if !descriptors.is_empty() {
        cutter.check_available()?;
    }

    let context = RunContext::new(
        video.to_path_buf(),
        output_dir.to_path_buf(),
        config.filename_separator,
    );
    let runner = ClipRunner::new(Box::new(cutter), config.concurrency)
        .with_progress(pipeline_config.show_progress);
    let report = runner
        .run(descriptors.clone(), &context, cancelled)
        .await?;

    Ok(PipelineResult {
        output_dir: output_dir.to_path_buf(),
        descriptors,
        summary,
        report: Some(report),
        total_time: start_time.elapsed(),
    })
}

/// Print a summary of the pipeline results.
pub fn print_summary(result: &PipelineResult) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                        Clip Cutting Complete                  ");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("  Output:     {}", result.output_dir.display());
    println!("  Lines:      {}", result.summary.total_lines);
    println!("  Selected:   {}", result.summary.selected_lines);
    for (reason, count) in &result.summary.rejected {
        println!("    skipped ({}): {}", reason, count);
    }

    if let Some(ref report) = result.report {
        println!();
        println!("  Clips:");
        println!("    Cut:       {}", report.stats.cut_clips);
        println!("    Failed:    {}", report.stats.failed_clips);
        if report.stats.skipped_clips > 0 {
            println!("    Skipped:   {}", report.stats.skipped_clips);
        }
        for failed in report.results.iter().filter(|r| r.error.is_some()) {
            println!(
                "    ✗ {} ({})",
                failed.descriptor.filename,
                failed.error.as_deref().unwrap_or_default()
            );
        }
    }

    println!();
    println!("  Total:      {:.2}s", result.total_time.as_secs_f64());
    println!();
    println!("═══════════════════════════════════════════════════════════════");
}
