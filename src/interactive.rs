use crate::config::{Config, PlanFormat};
use crate::pipeline::{derive_output_dir, PipelineConfig};
use console::style;
use dialoguer::{Confirm, Input, Select};
use std::fs;
use std::path::{Path, PathBuf};

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "webm", "m4v"];

const SUBTITLE_EXTENSIONS: &[&str] = &["srt"];

const CODEC_PRESETS: &[(&str, &str, &str)] = &[
    ("Stream copy", "copy", "copy"),
    ("H.264 + AAC", "libx264", "aac"),
    ("H.265 + AAC", "libx265", "aac"),
];

pub struct InteractiveResult {
    pub video: PathBuf,
    pub subtitles: PathBuf,
    pub output_dir: PathBuf,
    pub config: Config,
    pub pipeline_config: PipelineConfig,
}

pub fn run_interactive_wizard() -> anyhow::Result<InteractiveResult> {
    print_header();

    let mut config = Config::load().unwrap_or_default();

    // Step 1: Select video
    let video = select_file("Select video file:", VIDEO_EXTENSIONS, None)?;

    // Step 2: Select subtitles, preferring ones named after the video
    let subtitles = select_file(
        "Select subtitle file:",
        SUBTITLE_EXTENSIONS,
        Some(video.as_path()),
    )?;

    // Step 3: Output directory
    let default_output = derive_output_dir(&video);
    let output: String = Input::new()
        .with_prompt("Output directory")
        .default(default_output.display().to_string())
        .interact_text()?;
    let output_dir = PathBuf::from(output.trim());

    // Step 4: Codecs
    select_codecs(&mut config)?;

    // Step 5: Dry run?
    let dry_run = Confirm::new()
        .with_prompt("Only print the ffmpeg commands (dry run)?")
        .default(false)
        .interact()?;

    // Step 6: Confirm
    print_summary(&video, &subtitles, &output_dir, &config, dry_run);

    if !Confirm::new()
        .with_prompt("Proceed with these settings?")
        .default(true)
        .interact()?
    {
        anyhow::bail!("Cancelled by user");
    }

    println!();

    let pipeline_config = PipelineConfig {
        dry_run,
        plan_format: PlanFormat::Commands,
        ..PipelineConfig::default()
    };

    Ok(InteractiveResult {
        video,
        subtitles,
        output_dir,
        config,
        pipeline_config,
    })
}

fn print_header() {
    println!();
    println!(
        "{}",
        style("╔═══════════════════════════════════════════════════╗").cyan()
    );
    println!(
        "{}",
        style("║        quotecut - Quotable Clips with Sound       ║").cyan()
    );
    println!(
        "{}",
        style("╚═══════════════════════════════════════════════════╝").cyan()
    );
    println!();
}

fn select_codecs(config: &mut Config) -> anyhow::Result<()> {
    let items: Vec<String> = CODEC_PRESETS
        .iter()
        .map(|(name, video, audio)| format!("{} (video: {}, audio: {})", name, video, audio))
        .collect();

    let default = CODEC_PRESETS
        .iter()
        .position(|(_, video, audio)| {
            *video == config.video_codec && *audio == config.audio_codec
        })
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt("Select codecs")
        .items(&items)
        .default(default)
        .interact()?;

    let (_, video, audio) = CODEC_PRESETS[selection];
    if video == config.video_codec && audio == config.audio_codec {
        return Ok(());
    }

    config.video_codec = video.to_string();
    config.audio_codec = audio.to_string();

    if Confirm::new()
        .with_prompt("Save codec choice to config file?")
        .default(false)
        .interact()?
    {
        save_config(config)?;
        println!("{} Codecs saved to config\n", style("✓").green());
    }

    Ok(())
}

fn save_config(config: &Config) -> anyhow::Result<()> {
    if let Some(config_path) = Config::config_file_path() {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_content = toml::to_string_pretty(config)?;
        fs::write(config_path, toml_content)?;
    }
    Ok(())
}

fn select_file(
    prompt: &str,
    extensions: &[&str],
    companion: Option<&Path>,
) -> anyhow::Result<PathBuf> {
    println!("\n{}", style(prompt).bold());

    let dir = companion
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut files = scan_files(dir, extensions)?;

    if let Some(video) = companion {
        rank_by_stem(&mut files, video);
    }

    if files.is_empty() {
        println!("  No matching files found in {}.\n", dir.display());
        return prompt_for_path();
    }

    let mut items: Vec<String> = files
        .iter()
        .map(|f| {
            let size = fs::metadata(f)
                .map(|m| format_size(m.len()))
                .unwrap_or_else(|_| "?".to_string());
            format!("{} ({})", f.display(), size)
        })
        .collect();
    items.push("Enter custom path...".to_string());

    let selection = Select::new()
        .with_prompt("Choose a file")
        .items(&items)
        .default(0)
        .interact()?;

    if selection == files.len() {
        prompt_for_path()
    } else {
        Ok(files[selection].clone())
    }
}

fn prompt_for_path() -> anyhow::Result<PathBuf> {
    let path: String = Input::new()
        .with_prompt("Enter file path")
        .interact_text()?;
    let path = PathBuf::from(path.trim());
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    Ok(path)
}

fn scan_files(dir: &Path, extensions: &[&str]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() {
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                if extensions.contains(&ext.to_lowercase().as_str()) {
                    files.push(path);
                }
            }
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Move files whose name starts with the video's stem to the front.
fn rank_by_stem(files: &mut [PathBuf], video: &Path) {
    let stem = video
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    files.sort_by_key(|f| {
        let name = f
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        !name.starts_with(&stem)
    });
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

fn print_summary(
    video: &Path,
    subtitles: &Path,
    output_dir: &Path,
    config: &Config,
    dry_run: bool,
) {
    println!("\n{}", style("═══ Summary ═══").bold());
    println!("  Video:     {}", style(video.display()).cyan());
    println!("  Subtitles: {}", style(subtitles.display()).cyan());
    println!("  Output:    {}", style(output_dir.display()).cyan());
    println!(
        "  Codecs:    video {}, audio {}",
        config.video_codec, config.audio_codec
    );
    if dry_run {
        println!("  Mode:      {}", style("dry run").yellow());
    }
    println!();
}
