use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::TranscriberConfig;
use crate::error::{Result, HinglishError};
use crate::subtitle::Dialect;
use super::{SubtitleArtifacts, TranscriberTrait};

/// whisper.cpp command line transcriber (`whisper-cli`)
pub struct WhisperCppTranscriber {
    config: TranscriberConfig,
}

impl WhisperCppTranscriber {
    pub fn new(config: TranscriberConfig) -> Self {
        Self { config }
    }

    fn build_command(&self, audio_path: &Path, language: &str, output_prefix: &Path) -> Command {
        let mut cmd = Command::new(&self.config.binary_path);
        cmd.arg("-f").arg(audio_path)
            .arg("-m").arg(&self.config.model_path)
            .arg("-l").arg(language)
            .arg("-osrt")
            .arg("-ovtt")
            .arg("-of").arg(output_prefix)
            .kill_on_drop(true);
        cmd
    }

    /// Read `<prefix>.<ext>` if whisper produced it
    async fn read_artifact(output_prefix: &Path, dialect: Dialect) -> Result<Option<String>> {
        let mut path = OsString::from(output_prefix.as_os_str());
        path.push(".");
        path.push(dialect.extension());
        let path = PathBuf::from(path);

        if !path.exists() {
            warn!("{} file not found: {}", dialect.extension().to_uppercase(), path.display());
            return Ok(None);
        }

        let text = tokio::fs::read_to_string(&path).await?;
        info!("{} generated ({} chars)", dialect.extension().to_uppercase(), text.chars().count());
        Ok(Some(text))
    }
}

#[async_trait]
impl TranscriberTrait for WhisperCppTranscriber {
    async fn transcribe(
        &self,
        audio_path: &Path,
        language: &str,
        output_prefix: &Path,
    ) -> Result<SubtitleArtifacts> {
        info!("Running whisper.cpp on {}", audio_path.display());

        let mut cmd = self.build_command(audio_path, language, output_prefix);
        debug!("Command: {:?}", cmd.as_std());

        let timeout = Duration::from_secs(self.config.timeout_secs);
        let output = tokio::time::timeout(timeout, cmd.output())
            .await
            .map_err(|_| HinglishError::TranscriptionTimeout(self.config.timeout_secs))?
            .map_err(|e| HinglishError::Transcriber(format!("Failed to execute whisper: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let message = [stderr.trim(), stdout.trim()]
                .into_iter()
                .find(|text| !text.is_empty())
                .unwrap_or("Unknown error")
                .to_string();
            warn!(code = ?output.status.code(), "Whisper.cpp error: {}", message);
            return Err(HinglishError::Transcriber(message));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.is_empty() {
            debug!("Whisper output: {}", stdout.chars().take(500).collect::<String>());
        }

        Ok(SubtitleArtifacts {
            srt: Self::read_artifact(output_prefix, Dialect::Srt).await?,
            vtt: Self::read_artifact(output_prefix, Dialect::Vtt).await?,
        })
    }

    fn binary_exists(&self) -> bool {
        Path::new(&self.config.binary_path).exists()
    }

    fn model_exists(&self) -> bool {
        Path::new(&self.config.model_path).exists()
    }

    fn model_name(&self) -> String {
        self.config.model_name.clone()
    }
}
