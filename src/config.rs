use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{Result, HinglishError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub transcriber: TranscriberConfig,
    pub translate: TranslateConfig,
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the HTTP service to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Maximum accepted upload size in megabytes
    pub max_upload_mb: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriberConfig {
    /// Path to the whisper.cpp command line binary
    pub binary_path: String,
    /// Path to the ggml model file
    pub model_path: String,
    /// Human readable model name reported by the service
    pub model_name: String,
    /// Language passed to whisper when the caller does not specify one
    pub default_language: String,
    /// Seconds before a whisper run is abandoned
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TranslationProviderKind {
    /// Any endpoint speaking the chat completions protocol (Perplexity, OpenAI, LM Studio)
    OpenaiCompatible,
    /// Local Ollama server
    Ollama,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Master switch for Hinglish translation
    pub enabled: bool,
    pub provider: TranslationProviderKind,
    /// Base URL of the provider API
    pub endpoint: String,
    /// Model used for translation
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    /// Seconds before a translation request is abandoned
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    pub binary_path: String,
    /// Sample rate of the normalized WAV handed to whisper
    pub sample_rate: u32,
    /// Channel count of the normalized WAV
    pub channels: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_mb: 512,
        }
    }
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            binary_path: "./model/whisper-cli".to_string(),
            model_path: "./model/ggml-tiny.bin".to_string(),
            model_name: "whisper-tiny".to_string(),
            default_language: "auto".to_string(),
            timeout_secs: 300,
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: TranslationProviderKind::OpenaiCompatible,
            endpoint: "https://api.perplexity.ai".to_string(),
            model: "sonar-pro".to_string(),
            api_key_env: "PERPLEXITY_API_KEY".to_string(),
            timeout_secs: 300,
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            binary_path: "ffmpeg".to_string(),
            sample_rate: 16000,
            channels: 1,
        }
    }
}

impl TranslateConfig {
    /// Resolve the API key from the configured environment variable.
    ///
    /// Blank values are treated as missing.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

impl ServerConfig {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HinglishError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| HinglishError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| HinglishError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| HinglishError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
