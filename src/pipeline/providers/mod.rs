//! AI provider chain.
//!
//! Providers the tenant configured (primary first, then the rest with
//! stored credentials) are tried strictly in order, one attempt each, with
//! the hosted free tier as the final fallback. Never more than one request
//! in flight; no retries against the same provider.

pub mod client;
pub mod normalize;

pub use client::*;
pub use normalize::*;

use thiserror::Error;

use crate::models::{ProviderId, SetupConfig};

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request to {provider} failed: {message}")]
    Request { provider: &'static str, message: String },

    #[error("{provider} returned status {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("could not decode {provider} response body: {message}")]
    Decode { provider: &'static str, message: String },

    #[error("{provider} response envelope carried no generated text")]
    Envelope { provider: &'static str },

    #[error("all {attempts} providers failed, last error: {last}")]
    AllFailed { attempts: usize, last: String },
}

/// Request/response shapes a provider speaks. One normalizer per variant
/// in `normalize`; adding a provider means one table entry here and there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// `messages` request, reply in `choices[0].message.content`.
    OpenAiChat,
    /// `anthropic-version` header, reply in `content[0].text`.
    AnthropicMessages,
    /// `contents`/`parts` request, reply in `candidates[0].content.parts[0].text`.
    GeminiGenerate,
}

/// Wire format spoken by each provider.
pub fn wire_format(id: ProviderId) -> WireFormat {
    match id {
        ProviderId::Claude => WireFormat::AnthropicMessages,
        ProviderId::Gemini => WireFormat::GeminiGenerate,
        ProviderId::Free
        | ProviderId::OpenAi
        | ProviderId::Grok
        | ProviderId::Llama
        | ProviderId::Custom => WireFormat::OpenAiChat,
    }
}

fn default_endpoint(id: ProviderId) -> &'static str {
    match id {
        ProviderId::Free => "https://free.tailboard.app/v1/chat/completions",
        ProviderId::OpenAi => "https://api.openai.com/v1/chat/completions",
        ProviderId::Claude => "https://api.anthropic.com/v1/messages",
        ProviderId::Gemini => {
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        }
        ProviderId::Grok => "https://api.x.ai/v1/chat/completions",
        ProviderId::Llama => "http://localhost:11434/v1/chat/completions",
        ProviderId::Custom => "",
    }
}

fn default_model(id: ProviderId) -> &'static str {
    match id {
        ProviderId::Free => "llama3.2:1b",
        ProviderId::OpenAi => "gpt-4o-mini",
        ProviderId::Claude => "claude-3-sonnet",
        ProviderId::Gemini => "gemini-pro",
        ProviderId::Grok => "grok-3",
        ProviderId::Llama => "llama3",
        ProviderId::Custom => "",
    }
}

/// A provider with endpoint, model and credential fully resolved, ready to
/// be called.
#[derive(Debug, Clone)]
pub struct ResolvedProvider {
    pub id: ProviderId,
    pub wire: WireFormat,
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
}

fn resolve(id: ProviderId, config: &SetupConfig) -> ResolvedProvider {
    let pc = config.provider_config(id);
    let endpoint = if pc.endpoint.trim().is_empty() {
        default_endpoint(id).to_string()
    } else {
        pc.endpoint.trim().to_string()
    };
    let model = if pc.model.trim().is_empty() {
        default_model(id).to_string()
    } else {
        pc.model.trim().to_string()
    };
    let api_key = if pc.has_credential() {
        Some(pc.api_key.trim().to_string())
    } else {
        None
    };
    ResolvedProvider {
        id,
        wire: wire_format(id),
        endpoint,
        model,
        api_key,
    }
}

/// Order in which configured providers are tried after the primary.
const PROVIDER_PRIORITY: [ProviderId; 6] = [
    ProviderId::OpenAi,
    ProviderId::Claude,
    ProviderId::Gemini,
    ProviderId::Grok,
    ProviderId::Llama,
    ProviderId::Custom,
];

/// Whether a provider is configured well enough to enter the chain.
fn eligible(id: ProviderId, config: &SetupConfig) -> bool {
    let pc = config.provider_config(id);
    match id {
        // The free tier needs nothing; it is appended unconditionally.
        ProviderId::Free => false,
        // Local/self-hosted endpoints authenticate by reachability.
        ProviderId::Llama => !pc.endpoint.trim().is_empty(),
        ProviderId::Custom => !pc.endpoint.trim().is_empty(),
        _ => pc.has_credential(),
    }
}

/// Build the ordered provider chain from tenant configuration: primary
/// first (when usable), remaining configured providers in priority order,
/// the hosted free tier always last.
pub fn resolve_chain(config: &SetupConfig) -> Vec<ResolvedProvider> {
    let primary = config.ai_models.primary;
    let mut chain = Vec::new();

    if let Some(primary) = primary {
        if primary != ProviderId::Free && eligible(primary, config) {
            chain.push(resolve(primary, config));
        }
    }
    for id in PROVIDER_PRIORITY {
        if Some(id) != primary && eligible(id, config) {
            chain.push(resolve(id, config));
        }
    }
    chain.push(resolve(ProviderId::Free, config));
    chain
}

/// Try each provider in order, one attempt each, returning the first
/// normalized reply and the provider that produced it.
pub fn invoke_chain(
    client: &dyn ChatClient,
    chain: &[ResolvedProvider],
    prompt: &str,
) -> Result<(String, ProviderId), ProviderError> {
    let mut last_error = String::from("empty provider chain");

    for provider in chain {
        match client.complete(provider, prompt) {
            Ok(text) => {
                tracing::info!(provider = provider.id.as_str(), "generation succeeded");
                return Ok((text, provider.id));
            }
            Err(e) => {
                tracing::warn!(
                    provider = provider.id.as_str(),
                    error = %e,
                    "provider failed, falling through"
                );
                last_error = e.to_string();
            }
        }
    }

    Err(ProviderError::AllFailed {
        attempts: chain.len(),
        last: last_error,
    })
}
