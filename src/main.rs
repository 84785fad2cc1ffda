use anyhow::{Context, Result};
use clap::Parser;
use quotecut::config::{Config, PlanFormat};
use quotecut::cutter::FfmpegCutter;
use quotecut::interactive::run_interactive_wizard;
use quotecut::pipeline::{derive_output_dir, render_plan};
use quotecut::{cut_clips_with_cancel, print_summary, PipelineConfig};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "quotecut")]
#[command(version, about = "Cut quotable clips with sound from a subtitled video")]
#[command(
    long_about = "Pick short, self-contained subtitle lines (\"Run!\", \"What are you doing?\") and cut each one out of the video as its own clip with FFmpeg."
)]
struct Cli {
    /// Input video file
    #[arg(required_unless_present = "interactive")]
    video: Option<PathBuf>,

    /// SubRip subtitle file for the video
    #[arg(required_unless_present = "interactive")]
    subtitles: Option<PathBuf>,

    /// Output directory (defaults to <video name>-clips next to the video)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the planned clips instead of cutting them
    #[arg(long)]
    dry_run: bool,

    /// Dry-run output format: commands, json
    #[arg(short, long, default_value = "commands")]
    format: String,

    /// Video codec passed to FFmpeg
    #[arg(long)]
    vcodec: Option<String>,

    /// Audio codec passed to FFmpeg
    #[arg(long)]
    acodec: Option<String>,

    /// Longest subtitle line, in characters, to consider
    #[arg(long)]
    max_line_length: Option<usize>,

    /// Number of clips cut at the same time
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Choose files and options with prompts
    #[arg(short, long)]
    interactive: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    if let Some(ref codec) = cli.vcodec {
        config.video_codec = codec.clone();
    }
    if let Some(ref codec) = cli.acodec {
        config.audio_codec = codec.clone();
    }
    if let Some(length) = cli.max_line_length {
        config.max_line_length = length;
    }
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let (video, subtitles, output_dir, mut config, mut pipeline_config) = if cli.interactive {
        let wizard = run_interactive_wizard()?;
        (
            wizard.video,
            wizard.subtitles,
            wizard.output_dir,
            wizard.config,
            wizard.pipeline_config,
        )
    } else {
        let video = cli.video.clone().context("Missing video file")?;
        let subtitles = cli.subtitles.clone().context("Missing subtitle file")?;
        let output_dir = cli
            .output
            .clone()
            .unwrap_or_else(|| derive_output_dir(&video));
        let config = Config::load().context("Failed to load configuration")?;
        (video, subtitles, output_dir, config, PipelineConfig::default())
    };

    apply_cli_overrides(&mut config, &cli);
    config
        .validate()
        .context("Configuration validation failed")?;

    if cli.dry_run {
        pipeline_config.dry_run = true;
    }
    pipeline_config.plan_format = cli
        .format
        .parse::<PlanFormat>()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    info!("Video:     {}", video.display());
    info!("Subtitles: {}", subtitles.display());
    info!("Output:    {}", output_dir.display());
    info!("Codecs:    video {}, audio {}", config.video_codec, config.audio_codec);

    let cancelled = Arc::new(AtomicBool::new(false));
    {
        let cancelled = cancelled.clone();
        ctrlc::set_handler(move || {
            warn!("Interrupted, finishing clips already started");
            cancelled.store(true, Ordering::Relaxed);
        })
        .context("Failed to install Ctrl+C handler")?;
    }

    let dry_run = pipeline_config.dry_run;
    let plan_format = pipeline_config.plan_format;
    let result = cut_clips_with_cancel(
        &video,
        &subtitles,
        &output_dir,
        &config,
        pipeline_config,
        cancelled,
    )
    .await
    .context("Clip cutting failed")?;

    if dry_run {
        let cutter = FfmpegCutter::new(&config.ffmpeg_path);
        let plan = render_plan(&result.descriptors, plan_format, &cutter, &video, &output_dir)?;
        println!("{plan}");
        return Ok(());
    }

    print_summary(&result);

    if let Some(ref report) = result.report {
        if report.stats.total_clips > 0 && report.stats.cut_clips == 0 {
            anyhow::bail!("No clips were cut; see the logs in {}", output_dir.join("logs").display());
        }
    }

    Ok(())
}
