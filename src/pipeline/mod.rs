//! Training generation pipeline:
//! extraction → prompt → provider chain → parse/validate → content.
//!
//! Every failure class has a containment level: one document failing
//! extraction skips only that document, one provider failing falls through
//! to the next, and a failed or malformed generation substitutes
//! deterministic fallback content. An author always ends up with something
//! reviewable.

pub mod extraction;
pub mod fallback;
pub mod parser;
pub mod prompt;
pub mod providers;

pub use extraction::{extract_batch, extract_file, ExtractionError, FileKind, UploadedFile};
pub use fallback::{fallback_quiz, fallback_training};
pub use parser::{clamp_question_count, parse_generation_reply, ValidationError};
pub use prompt::build_training_prompt;
pub use providers::{
    invoke_chain, resolve_chain, ChatClient, HttpChatClient, MockChatClient, ProviderError,
    ResolvedProvider, WireFormat,
};

use crate::models::{Employee, GeneratedTraining, ProviderId, SetupConfig, TrainingDraft};
use crate::rag;

/// Where generated content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationSource {
    /// A provider produced it and it validated.
    Provider(ProviderId),
    /// Every provider failed or the reply failed validation.
    Fallback,
}

/// Generated content plus its provenance.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub content: GeneratedTraining,
    pub source: GenerationSource,
}

/// End-to-end generation over an injected chat client.
pub struct TrainingGenerator<'a> {
    client: &'a dyn ChatClient,
}

impl<'a> TrainingGenerator<'a> {
    pub fn new(client: &'a dyn ChatClient) -> Self {
        Self { client }
    }

    /// Generate training content for a draft. Infallible by design: any
    /// pipeline failure downgrades to fallback content rather than
    /// surfacing an error to the author.
    pub fn generate(
        &self,
        draft: &TrainingDraft,
        config: &SetupConfig,
        roster: &[Employee],
    ) -> GenerationOutcome {
        let focus_notes = rag::focus_notes(draft);
        let prompt = build_training_prompt(draft, config, roster, &focus_notes);
        let chain = resolve_chain(config);

        tracing::info!(
            providers = chain.len(),
            prompt_chars = prompt.len(),
            title = %draft.title,
            "starting training generation"
        );

        let reply = match invoke_chain(self.client, &chain, &prompt) {
            Ok((reply, provider)) => (reply, provider),
            Err(e) => {
                tracing::warn!(error = %e, "all providers failed, using fallback content");
                return GenerationOutcome {
                    content: fallback_training(draft, config),
                    source: GenerationSource::Fallback,
                };
            }
        };

        match parse_generation_reply(&reply.0) {
            Ok(mut generated) => {
                let filler = fallback_quiz(draft, config);
                generated.quiz =
                    clamp_question_count(generated.quiz, draft.quiz.question_count, &filler);
                GenerationOutcome {
                    content: generated,
                    source: GenerationSource::Provider(reply.1),
                }
            }
            Err(e) => {
                tracing::warn!(
                    provider = reply.1.as_str(),
                    error = %e,
                    "reply failed validation, using fallback content"
                );
                GenerationOutcome {
                    content: fallback_training(draft, config),
                    source: GenerationSource::Fallback,
                }
            }
        }
    }
}
