// Batch translation architecture
//
// All dialogue of a document goes to the translation provider in one request:
// - prompt: compound request construction and response splitting
// - batch: collects dialogue, calls the provider once, reconciles the reply
// - openai / ollama: provider implementations

pub mod batch;
pub mod ollama;
pub mod openai;
pub mod prompt;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

pub use batch::{Alignment, BatchTranslator};
use crate::config::{TranslateConfig, TranslationProviderKind};
use crate::error::Result;

/// A text-in, text-out translation capability
///
/// Any failure is reported as [`crate::error::HinglishError::TranslationUnavailable`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Short provider name for logs and status output
    fn name(&self) -> &'static str;

    /// Submit a prompt and return the raw completion text
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Check that the provider can serve requests
    async fn check_availability(&self) -> Result<()> {
        Ok(())
    }
}

/// Factory for creating provider instances
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create the configured provider, or `None` when translation is unavailable
    pub fn from_config(config: &TranslateConfig) -> Result<Option<Arc<dyn TranslationProvider>>> {
        if !config.enabled {
            info!("Hinglish translation disabled by configuration");
            return Ok(None);
        }

        match config.provider {
            TranslationProviderKind::OpenaiCompatible => match config.api_key() {
                Some(api_key) => {
                    let provider = openai::OpenAiCompatibleProvider::new(config, api_key)?;
                    Ok(Some(Arc::new(provider)))
                }
                None => {
                    warn!(
                        "Translation API key not available (set {})",
                        config.api_key_env
                    );
                    Ok(None)
                }
            },
            TranslationProviderKind::Ollama => {
                let provider = ollama::OllamaProvider::new(config)?;
                Ok(Some(Arc::new(provider)))
            }
        }
    }
}
