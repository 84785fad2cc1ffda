//! Integration tests for quotecut
//!
//! These tests run subtitle parsing, selection, naming and clip execution
//! together, using a mock cutter so FFmpeg is not required.

use quotecut::clip::{make_filename, ClipBuilder, ClipConfig, ClipDescriptor, UniqueToken};
use quotecut::config::{Config, PlanFormat};
use quotecut::cutter::{ClipCutter, ClipRunner, ClipStatus, CutOutput, RunContext};
use quotecut::pipeline::{cut_clips, plan_clips, plan_clips_with, PipelineConfig};
use quotecut::select::{
    compute_padding, is_eligible, normalize, Rejection, Selector, SelectorConfig,
};
use quotecut::subtitle::{parse_srt, TimedText};
use quotecut::QuoteCutError;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::TempDir;

const SAMPLE_SRT: &str = "\
1
00:00:10,000 --> 00:00:10,800
Run!

2
00:00:11,000 --> 00:00:13,000
were running away from him but

3
00:00:14,000 --> 00:00:17,000
♪ love is all you need ♪

4
00:00:18,000 --> 00:00:20,500
<i>What are you</i>
<i>doing?</i>

5
00:00:00,100 --> 00:00:00,600
Who?

6
00:00:21,000 --> 00:00:23,000
I don't think this is going to work out for us.
";

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ============================================================================
// Selection Tests
// ============================================================================

mod selection_tests {
    use super::*;

    #[test]
    fn test_sample_file_selection() {
        let records = parse_srt(SAMPLE_SRT).unwrap();
        assert_eq!(records.len(), 6);

        let selections = Selector::default().select(&records);
        let texts: Vec<&str> = selections.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Run!", "What are you doing?", "Who?"]);
    }

    #[test]
    fn test_run_window() {
        let records = parse_srt(SAMPLE_SRT).unwrap();
        let selections = Selector::default().select(&records);

        let run = &selections[0];
        assert!(approx(run.window.padding, 0.35));
        assert!(approx(run.window.adjusted_start, 9.65));
        assert!(approx(run.window.adjusted_duration, 1.15));

        let what = &selections[1];
        assert!(approx(what.window.padding, 0.20));
        assert!(approx(what.window.adjusted_start, 17.8));
        assert!(approx(what.window.adjusted_duration, 2.7));
    }

    #[test]
    fn test_early_line_keeps_negative_start() {
        let records = parse_srt(SAMPLE_SRT).unwrap();
        let selections = Selector::default().select(&records);
        let who = selections.iter().find(|s| s.text == "Who?").unwrap();
        assert!(approx(who.window.adjusted_start, -0.25));
    }

    #[test]
    fn test_padding_boundary() {
        assert_eq!(compute_padding(1.10), 0.35);
        assert_eq!(compute_padding(1.11), 0.20);
        assert_eq!(compute_padding(0.0), 0.35);
        assert_eq!(compute_padding(-1.0), 0.35);
    }

    #[test]
    fn test_normalize_idempotent_on_sample() {
        for record in parse_srt(SAMPLE_SRT).unwrap() {
            let once = normalize(&record.text);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_eligibility_rules() {
        let config = SelectorConfig::default();
        assert!(is_eligible("Run!", &config));
        assert!(!is_eligible("were running away from him but", &config));
        assert!(!is_eligible("♪ love is all you need ♪", &config));
        assert!(!is_eligible("", &config));
        assert!(!is_eligible(&format!("A{}!", "x".repeat(34)), &config));
        assert!(is_eligible(&format!("A{}!", "x".repeat(33)), &config));
    }
}

// ============================================================================
// Descriptor Tests
// ============================================================================

mod descriptor_tests {
    use super::*;

    #[test]
    fn test_plan_clips_end_to_end() {
        let records = parse_srt(SAMPLE_SRT).unwrap();
        let selector = Selector::default();
        let mut builder =
            ClipBuilder::new(ClipConfig::default()).with_tokens(UniqueToken::sequential(1));

        let (descriptors, summary) = plan_clips_with(&records, &selector, &mut builder);

        let names: Vec<&str> = descriptors.iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "run-000001.mp4",
                "what-are-you-doing-000002.mp4",
                "who-000003.mp4"
            ]
        );
        assert_eq!(summary.rejected[&Rejection::NotCapitalized], 1);
        assert_eq!(summary.rejected[&Rejection::Music], 1);
        assert_eq!(summary.rejected[&Rejection::TooLong], 1);

        let run = &descriptors[0];
        assert!(approx(run.start_time, 9.65));
        assert!(approx(run.duration, 1.15));
        assert_eq!(run.video_codec, "copy");
        assert_eq!(run.audio_codec, "copy");
    }

    #[test]
    fn test_descriptor_order_mirrors_input() {
        let records: Vec<TimedText> = (0..50)
            .map(|i| {
                let text = if i % 3 == 0 {
                    format!("Line {i}.")
                } else {
                    format!("line {i}")
                };
                TimedText::new(i + 1, text, i as f64, i as f64 + 1.0)
            })
            .collect();

        let descriptors = plan_clips(&records, &Config::default());
        let indices: Vec<usize> = descriptors.iter().map(|d| d.source_index).collect();
        let expected: Vec<usize> = (0..50).filter(|i| i % 3 == 0).collect();
        assert_eq!(indices, expected);
    }

    #[test]
    fn test_duplicate_lines_get_distinct_names() {
        let records = vec![
            TimedText::new(1, "What?", 1.0, 1.5),
            TimedText::new(2, "What?", 2.0, 2.5),
            TimedText::new(3, "What?", 3.0, 3.5),
        ];
        let descriptors = plan_clips(&records, &Config::default());
        let mut names: Vec<&str> = descriptors.iter().map(|d| d.filename.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_filename_is_filesystem_safe() {
        let config = ClipConfig::default();
        let name = make_filename("Don't! Stop? #now/*, ok.", "x", &config);
        let stem = name.strip_suffix(".mp4").unwrap();
        for c in ['!', '$', '#', '?', '/', '*', '\'', '.', ',', ' '] {
            assert!(!stem.contains(c), "{c:?} in {name}");
        }
    }
}

// ============================================================================
// Pipeline Tests
// ============================================================================

mod pipeline_tests {
    use super::*;

    fn write_sample(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("movie.srt");
        std::fs::write(&path, SAMPLE_SRT).unwrap();
        path
    }

    #[tokio::test]
    async fn test_dry_run_plans_without_video() {
        let dir = TempDir::new().unwrap();
        let subtitles = write_sample(&dir);
        let output_dir = dir.path().join("clips");

        let pipeline_config = PipelineConfig {
            dry_run: true,
            plan_format: PlanFormat::Json,
            show_progress: false,
            tokens: UniqueToken::sequential(0),
        };
        let result = cut_clips(
            Path::new("/nonexistent/movie.mkv"),
            &subtitles,
            &output_dir,
            &Config::default(),
            pipeline_config,
        )
        .await
        .unwrap();

        assert!(result.report.is_none());
        assert_eq!(result.descriptors.len(), 3);
        assert_eq!(result.summary.total_lines, 6);
        assert!(!output_dir.exists());
    }

    #[tokio::test]
    async fn test_missing_video_is_error() {
        let dir = TempDir::new().unwrap();
        let subtitles = write_sample(&dir);

        let result = cut_clips(
            Path::new("/nonexistent/movie.mkv"),
            &subtitles,
            &dir.path().join("clips"),
            &Config::default(),
            PipelineConfig {
                show_progress: false,
                ..PipelineConfig::default()
            },
        )
        .await;
        assert!(matches!(result, Err(QuoteCutError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_invalid_config_is_error() {
        let dir = TempDir::new().unwrap();
        let subtitles = write_sample(&dir);
        let mut config = Config::default();
        config.max_line_length = 0;

        let result = cut_clips(
            Path::new("movie.mkv"),
            &subtitles,
            dir.path(),
            &config,
            PipelineConfig {
                dry_run: true,
                ..PipelineConfig::default()
            },
        )
        .await;
        assert!(matches!(result, Err(QuoteCutError::Config(_))));
    }
}

// ============================================================================
// Execution Tests
// ============================================================================

mod execution_tests {
    use super::*;

    /// Records what it was asked to cut and writes a placeholder file.
    struct RecordingCutter;

    #[async_trait]
    impl ClipCutter for RecordingCutter {
        async fn cut(
            &self,
            input: &Path,
            descriptor: &ClipDescriptor,
            output: &Path,
        ) -> quotecut::Result<CutOutput> {
            let line = format!(
                "{} {:.3} {:.3} {} {}",
                input.display(),
                descriptor.start_time.max(0.0),
                descriptor.duration,
                descriptor.video_codec,
                descriptor.audio_codec
            );
            std::fs::write(output, &line)?;
            Ok(CutOutput {
                success: true,
                exit_code: Some(0),
                log: line,
            })
        }

        fn name(&self) -> &'static str {
            "Recording"
        }
    }

    #[tokio::test]
    async fn test_plan_then_run() {
        let dir = TempDir::new().unwrap();
        let records = parse_srt(SAMPLE_SRT).unwrap();
        let descriptors = plan_clips(&records, &Config::default());

        let context = RunContext::new(
            PathBuf::from("movie.mkv"),
            dir.path().join("clips"),
            '-',
        );
        let runner = ClipRunner::new(Box::new(RecordingCutter), 2).with_progress(false);
        let report = runner
            .run(descriptors.clone(), &context, Arc::new(AtomicBool::new(false)))
            .await
            .unwrap();

        assert_eq!(report.stats.cut_clips, 3);
        assert!(report.results.iter().all(|r| r.status == ClipStatus::Cut));

        // Same order as the plan
        for (result, descriptor) in report.results.iter().zip(&descriptors) {
            assert_eq!(result.descriptor.filename, descriptor.filename);
        }

        let run = std::fs::read_to_string(&report.results[0].output_path).unwrap();
        assert_eq!(run, "movie.mkv 9.650 1.150 copy copy");

        // Negative start is clamped by whoever runs the cut
        let who = std::fs::read_to_string(&report.results[2].output_path).unwrap();
        assert!(who.starts_with("movie.mkv 0.000 "));

        let logs: Vec<_> = std::fs::read_dir(context.log.dir()).unwrap().collect();
        assert_eq!(logs.len(), 3);
    }
}
