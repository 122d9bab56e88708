use serde_json::Value;

use super::WireFormat;

/// Pull the generated text out of a provider's response envelope.
///
/// Envelopes differ per wire format; this is the single place that knows
/// where each one hides its text.
pub fn reply_text(wire: WireFormat, body: &Value) -> Option<String> {
    let text = match wire {
        WireFormat::OpenAiChat => body
            .get("choices")?
            .get(0)?
            .get("message")?
            .get("content")?
            .as_str()?,
        WireFormat::AnthropicMessages => body.get("content")?.get(0)?.get("text")?.as_str()?,
        WireFormat::GeminiGenerate => body
            .get("candidates")?
            .get(0)?
            .get("content")?
            .get("parts")?
            .get(0)?
            .get("text")?
            .as_str()?,
    };
    Some(text.to_string())
}
