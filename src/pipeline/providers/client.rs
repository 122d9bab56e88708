use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::json;

use crate::models::ProviderId;

use super::normalize::reply_text;
use super::{ProviderError, ResolvedProvider, WireFormat};

/// Seam between the provider chain and the network, so the chain logic is
/// testable without HTTP.
pub trait ChatClient {
    /// Issue one request to one provider and return its normalized text.
    fn complete(&self, provider: &ResolvedProvider, prompt: &str)
        -> Result<String, ProviderError>;
}

/// HTTP client for real provider calls. One bounded blocking request per
/// call; callers guarantee there is never more than one in flight.
pub struct HttpChatClient {
    client: reqwest::blocking::Client,
    max_tokens: u32,
}

impl HttpChatClient {
    pub fn new(timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            max_tokens: 2000,
        }
    }

    /// Two-minute timeout default; generation replies are slow.
    pub fn default_timeout() -> Self {
        Self::new(120)
    }
}

impl ChatClient for HttpChatClient {
    fn complete(
        &self,
        provider: &ResolvedProvider,
        prompt: &str,
    ) -> Result<String, ProviderError> {
        let name = provider.id.as_str();

        let mut request = match provider.wire {
            WireFormat::OpenAiChat => {
                let body = json!({
                    "model": provider.model,
                    "messages": [{"role": "user", "content": prompt}],
                    "max_tokens": self.max_tokens,
                    "temperature": 0.7,
                });
                let mut req = self.client.post(&provider.endpoint).json(&body);
                if let Some(key) = &provider.api_key {
                    req = req.bearer_auth(key);
                }
                req
            }
            WireFormat::AnthropicMessages => {
                let body = json!({
                    "model": provider.model,
                    "max_tokens": self.max_tokens,
                    "messages": [{"role": "user", "content": prompt}],
                });
                let mut req = self
                    .client
                    .post(&provider.endpoint)
                    .header("anthropic-version", "2023-06-01")
                    .json(&body);
                if let Some(key) = &provider.api_key {
                    req = req.bearer_auth(key);
                }
                req
            }
            WireFormat::GeminiGenerate => {
                let body = json!({
                    "contents": [{"role": "user", "parts": [{"text": prompt}]}],
                    "generationConfig": {"maxOutputTokens": self.max_tokens, "temperature": 0.7},
                });
                // Gemini authenticates via query parameter, not a header.
                let url = match &provider.api_key {
                    Some(key) => format!("{}?key={}", provider.endpoint, key),
                    None => provider.endpoint.clone(),
                };
                self.client.post(url).json(&body)
            }
        };
        request = request.header("content-type", "application/json");

        let response = request.send().map_err(|e| ProviderError::Request {
            provider: name,
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ProviderError::Status {
                provider: name,
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response.json().map_err(|e| ProviderError::Decode {
            provider: name,
            message: e.to_string(),
        })?;

        reply_text(provider.wire, &body).ok_or(ProviderError::Envelope { provider: name })
    }
}

/// Scripted client for tests: per-provider canned replies or failures,
/// plus a record of which providers were attempted in what order.
pub struct MockChatClient {
    scripted: Mutex<HashMap<ProviderId, Result<String, String>>>,
    attempts: Mutex<Vec<ProviderId>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            scripted: Mutex::new(HashMap::new()),
            attempts: Mutex::new(Vec::new()),
        }
    }

    pub fn respond_with(&self, id: ProviderId, text: &str) {
        self.scripted
            .lock()
            .expect("mock lock")
            .insert(id, Ok(text.to_string()));
    }

    pub fn fail(&self, id: ProviderId, message: &str) {
        self.scripted
            .lock()
            .expect("mock lock")
            .insert(id, Err(message.to_string()));
    }

    /// Providers attempted so far, in call order.
    pub fn attempts(&self) -> Vec<ProviderId> {
        self.attempts.lock().expect("mock lock").clone()
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatClient for MockChatClient {
    fn complete(
        &self,
        provider: &ResolvedProvider,
        _prompt: &str,
    ) -> Result<String, ProviderError> {
        self.attempts.lock().expect("mock lock").push(provider.id);

        match self.scripted.lock().expect("mock lock").get(&provider.id) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(message)) => Err(ProviderError::Request {
                provider: provider.id.as_str(),
                message: message.clone(),
            }),
            None => Err(ProviderError::Request {
                provider: provider.id.as_str(),
                message: "no scripted response".into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::providers::wire_format;

    fn provider(id: ProviderId) -> ResolvedProvider {
        ResolvedProvider {
            id,
            wire: wire_format(id),
            endpoint: "http://localhost:0".into(),
            model: "test".into(),
            api_key: None,
        }
    }

    #[test]
    fn mock_returns_scripted_reply() {
        let client = MockChatClient::new();
        client.respond_with(ProviderId::OpenAi, "hello");
        let text = client.complete(&provider(ProviderId::OpenAi), "p").unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn mock_records_attempt_order() {
        let client = MockChatClient::new();
        client.fail(ProviderId::OpenAi, "down");
        client.respond_with(ProviderId::Free, "ok");

        let _ = client.complete(&provider(ProviderId::OpenAi), "p");
        let _ = client.complete(&provider(ProviderId::Free), "p");

        assert_eq!(client.attempts(), vec![ProviderId::OpenAi, ProviderId::Free]);
    }

    #[test]
    fn mock_unscripted_provider_errors() {
        let client = MockChatClient::new();
        let result = client.complete(&provider(ProviderId::Gemini), "p");
        assert!(matches!(result, Err(ProviderError::Request { .. })));
    }

    #[test]
    fn http_client_constructs_with_timeout() {
        let _ = HttpChatClient::new(5);
        let _ = HttpChatClient::default_timeout();
    }
}
