use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::subtitle::Block;
use super::{prompt, TranslationProvider};

/// How a provider reply lined up with the dialogue that was sent.
///
/// Translations are applied by position whatever the outcome; this only
/// records how far that alignment could be trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alignment {
    /// No request was made: nothing to translate or no provider
    Skipped,
    /// One translated segment per dialogue block
    FullMatch { count: usize },
    /// Segment count differed; the first `applied` blocks were translated
    PartialMatch {
        applied: usize,
        requested: usize,
        received: usize,
    },
    /// The request failed or the reply held no segments; nothing was applied
    Unusable { reason: String },
}

impl Alignment {
    fn from_counts(requested: usize, received: usize) -> Self {
        if received == 0 {
            Alignment::Unusable {
                reason: "response contained no segments".to_string(),
            }
        } else if received == requested {
            Alignment::FullMatch { count: requested }
        } else {
            Alignment::PartialMatch {
                applied: requested.min(received),
                requested,
                received,
            }
        }
    }

    /// Number of dialogue blocks whose text was replaced
    pub fn applied(&self) -> usize {
        match self {
            Alignment::FullMatch { count } => *count,
            Alignment::PartialMatch { applied, .. } => *applied,
            Alignment::Skipped | Alignment::Unusable { .. } => 0,
        }
    }

    pub fn is_translated(&self) -> bool {
        self.applied() > 0
    }
}

/// Translates every dialogue block of a document with a single provider call
#[derive(Clone)]
pub struct BatchTranslator {
    provider: Option<Arc<dyn TranslationProvider>>,
}

impl BatchTranslator {
    pub fn new(provider: Option<Arc<dyn TranslationProvider>>) -> Self {
        Self { provider }
    }

    pub fn disabled() -> Self {
        Self { provider: None }
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider(&self) -> Option<&Arc<dyn TranslationProvider>> {
        self.provider.as_ref()
    }

    /// Replace dialogue text with translations, in place.
    ///
    /// Never fails: on any provider error every block keeps its original text.
    pub async fn translate_blocks(&self, blocks: &mut [Block]) -> Alignment {
        let Some(provider) = &self.provider else {
            return Alignment::Skipped;
        };

        let texts: Vec<&str> = blocks
            .iter()
            .filter_map(Block::as_dialogue)
            .map(|dialogue| dialogue.text.as_str())
            .collect();

        if texts.is_empty() {
            return Alignment::Skipped;
        }

        let requested = texts.len();
        let request = prompt::build_prompt(&texts);

        info!(
            provider = provider.name(),
            "Translating {} subtitle blocks in one batch", requested
        );

        let translations = match provider.complete(&request).await {
            Ok(response) => prompt::parse_response(&response),
            Err(e) => {
                warn!("Batch translation failed, keeping original text: {}", e);
                return Alignment::Unusable {
                    reason: e.to_string(),
                };
            }
        };

        let mut alignment = Alignment::from_counts(requested, translations.len());

        let mut replaced = 0;
        let dialogues = blocks.iter_mut().filter_map(Block::as_dialogue_mut);
        for (dialogue, translation) in dialogues.zip(translations) {
            // An empty segment still occupies its position
            if translation.is_empty() {
                debug!("Empty segment, keeping {:?}", dialogue.text);
                continue;
            }
            debug!("{:?} -> {:?}", dialogue.text, translation);
            dialogue.text = translation;
            replaced += 1;
        }

        if replaced == 0 && alignment.is_translated() {
            alignment = Alignment::Unusable {
                reason: "every response segment was empty".to_string(),
            };
        }

        match &alignment {
            Alignment::FullMatch { count } => {
                info!("Batch translation complete ({} blocks)", count)
            }
            Alignment::PartialMatch {
                applied,
                requested,
                received,
            } => warn!(
                applied,
                requested,
                received,
                "Batch translation count mismatch, aligned by position"
            ),
            Alignment::Unusable { reason } => {
                warn!("Batch translation unusable, keeping original text: {}", reason)
            }
            Alignment::Skipped => {}
        }

        alignment
    }
}
