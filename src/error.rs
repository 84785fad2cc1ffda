use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuoteCutError {
    #[error("Subtitle parse error in block {block}: {message}")]
    SubtitleParse { block: usize, message: String },

    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Run cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, QuoteCutError>;
