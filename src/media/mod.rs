// Media normalization
//
// Uploaded audio/video is converted to the WAV layout whisper expects:
// - Processor: FFmpeg-backed implementation
// - Commands: Command builders and abstractions

pub mod commands;
pub mod processor;

use async_trait::async_trait;
use std::path::Path;

pub use commands::*;
pub use processor::*;

use crate::config::MediaConfig;
use crate::error::Result;

/// Container extensions that must be converted before transcription
const CONVERTED_EXTENSIONS: [&str; 6] = ["mp4", "m4a", "mov", "avi", "mkv", "webm"];

/// Whether a file with this extension (with or without the dot) needs WAV conversion
pub fn needs_conversion(extension: &str) -> bool {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    CONVERTED_EXTENSIONS.contains(&ext.as_str())
}

/// Main trait for media processing operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaProcessorTrait: Send + Sync {
    /// Convert any audio/video file to mono 16 kHz PCM WAV
    async fn convert_to_wav(&self, input_path: &Path, output_path: &Path) -> Result<()>;

    /// Check if media processor is available
    fn is_available(&self) -> bool;

    /// Get media processor version information
    async fn get_version_info(&self) -> Result<String>;
}

/// Factory for creating media processor instances
pub struct MediaProcessorFactory;

impl MediaProcessorFactory {
    /// Create the default media processor implementation (FFmpeg-based)
    pub fn create_processor(config: MediaConfig) -> Box<dyn MediaProcessorTrait> {
        Box::new(processor::MediaProcessorImpl::new(config))
    }
}
