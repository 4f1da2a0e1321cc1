// Speech recognition
//
// Transcribers turn a WAV file into subtitle documents. Only whisper.cpp is
// wired up; a new engine implements TranscriberTrait and gets a factory arm.

pub mod whisper_cpp;

use async_trait::async_trait;
use std::path::Path;

use crate::config::TranscriberConfig;
use crate::error::Result;
use crate::subtitle::Dialect;

/// Subtitle documents produced by one transcription, by dialect
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleArtifacts {
    pub srt: Option<String>,
    pub vtt: Option<String>,
}

impl SubtitleArtifacts {
    pub fn get(&self, dialect: Dialect) -> Option<&str> {
        match dialect {
            Dialect::Srt => self.srt.as_deref(),
            Dialect::Vtt => self.vtt.as_deref(),
        }
    }

    pub fn get_mut(&mut self, dialect: Dialect) -> &mut Option<String> {
        match dialect {
            Dialect::Srt => &mut self.srt,
            Dialect::Vtt => &mut self.vtt,
        }
    }

    /// True when no dialect produced any text
    pub fn is_empty(&self) -> bool {
        [Dialect::Srt, Dialect::Vtt]
            .into_iter()
            .all(|dialect| self.get(dialect).is_none_or(str::is_empty))
    }
}

/// Main trait for transcription operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriberTrait: Send + Sync {
    /// Transcribe an audio file, writing intermediate output next to `output_prefix`
    async fn transcribe(
        &self,
        audio_path: &Path,
        language: &str,
        output_prefix: &Path,
    ) -> Result<SubtitleArtifacts>;

    /// Whether the transcriber executable is present
    fn binary_exists(&self) -> bool;

    /// Whether the model file is present
    fn model_exists(&self) -> bool;

    /// Model name reported to clients
    fn model_name(&self) -> String;
}

/// Factory for creating transcriber instances
pub struct TranscriberFactory;

impl TranscriberFactory {
    /// Create with default implementation (whisper.cpp)
    pub fn create_default(config: TranscriberConfig) -> Box<dyn TranscriberTrait> {
        Box::new(whisper_cpp::WhisperCppTranscriber::new(config))
    }
}
