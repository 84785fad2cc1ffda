pub mod clip;
pub mod config;
pub mod cutter;
pub mod error;
pub mod interactive;
pub mod pipeline;
pub mod runlog;
pub mod select;
pub mod subtitle;

pub use clip::{ClipBuilder, ClipConfig, ClipDescriptor};
pub use config::Config;
pub use error::{QuoteCutError, Result};
pub use pipeline::{
    cut_clips, cut_clips_with_cancel, plan_clips, print_summary, PipelineConfig, PipelineResult,
};
pub use select::{Selector, SelectorConfig};
pub use subtitle::TimedText;
