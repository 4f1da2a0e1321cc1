use thiserror::Error;

#[derive(Error, Debug)]
pub enum HinglishError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Whisper.cpp failed: {0}")]
    Transcriber(String),

    #[error("Transcription timed out after {0}s (file too large or processing issue)")]
    TranscriptionTimeout(u64),

    #[error("Translation unavailable: {0}")]
    TranslationUnavailable(String),

    #[error("Media processing error: {0}")]
    Media(String),

    #[error("FFmpeg is required for video/MP4 files. Please install ffmpeg.")]
    FfmpegRequired,

    #[error("No subtitles were generated. Check if the audio file contains speech.")]
    NoSubtitles,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),
}

impl HinglishError {
    /// Whether the failure was caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::FfmpegRequired | Self::InvalidUpload(_) | Self::UnsupportedFormat(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, HinglishError>;
