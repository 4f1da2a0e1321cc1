use tracing::debug;

use crate::subtitle::{self, Dialect, LineEnding};
use crate::translate::{Alignment, BatchTranslator};

/// Result of one pipeline pass over a subtitle document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub text: String,
    pub alignment: Alignment,
}

impl PipelineOutput {
    fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            alignment: Alignment::Skipped,
        }
    }
}

/// Parse, batch-translate and rebuild one subtitle document.
///
/// Holds no per-document state, so one instance serves every request.
#[derive(Clone)]
pub struct TranslationPipeline {
    translator: BatchTranslator,
}

impl TranslationPipeline {
    pub fn new(translator: BatchTranslator) -> Self {
        Self { translator }
    }

    pub fn is_available(&self) -> bool {
        self.translator.is_available()
    }

    pub fn translator(&self) -> &BatchTranslator {
        &self.translator
    }

    /// Always returns a structurally valid document; translation failures
    /// only show up in the returned [`Alignment`].
    pub async fn run(&self, document: &str, dialect: Dialect) -> PipelineOutput {
        if document.trim().is_empty() || !self.translator.is_available() {
            return PipelineOutput::unchanged(document);
        }

        let line_ending = LineEnding::detect(document);
        let mut blocks = subtitle::parse(document, dialect);
        debug!(dialect = %dialect, blocks = blocks.len(), ?line_ending, "Parsed subtitle document");

        let alignment = self.translator.translate_blocks(&mut blocks).await;

        PipelineOutput {
            text: line_ending.restore(subtitle::reconstruct(&blocks, dialect)),
            alignment,
        }
    }
}
