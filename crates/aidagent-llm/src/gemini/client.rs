// Gemini-specific client implementation (HTTP direct, no SDK)

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::Value;

use aidagent_types::RawAlert;

use crate::error::{ProviderError, ResponderError};
use crate::parse::parse_alert_batch;
use crate::prompts;
use crate::traits::{AlertProvider, AlertResponder, Turn, TurnRole};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_SOURCING_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_CHAT_MODEL: &str = "gemini-2.0-flash";

/// Gemini client serving both external collaborator roles: the alert data
/// provider and the conversational responder.
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
    sourcing_model: String,
    chat_model: String,
}

impl GeminiClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&api_key).context("Invalid API key format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: GEMINI_API_BASE.to_string(),
            sourcing_model: DEFAULT_SOURCING_MODEL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_sourcing_model(mut self, model: impl Into<String>) -> Self {
        self.sourcing_model = model.into();
        self
    }

    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    /// Non-streaming content generation against one model.
    async fn generate(
        &self,
        model: &str,
        system_instruction: Option<&str>,
        contents: Vec<Value>,
    ) -> Result<String> {
        let mut payload = serde_json::json!({ "contents": contents });
        if let Some(system) = system_instruction {
            payload["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": system }],
            });
        }

        let response = self
            .http_client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, model
            ))
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error ({}): {}", status, error_text);
        }

        let raw: Value = response.json().await.context("Failed to parse response")?;
        extract_text(&raw)
    }

    /// Convert context-window turns to the Gemini request shape.
    ///
    /// System turns become the `systemInstruction`; the rest map to the
    /// `user`/`model` roles the API expects.
    fn convert_turns(turns: &[Turn]) -> (Option<String>, Vec<Value>) {
        let system = turns
            .iter()
            .filter(|t| t.role == TurnRole::System)
            .map(|t| t.text.clone())
            .collect::<Vec<_>>();
        let system = if system.is_empty() {
            None
        } else {
            Some(system.join("\n\n"))
        };

        let contents = turns
            .iter()
            .filter(|t| t.role != TurnRole::System)
            .map(|t| {
                let role = match t.role {
                    TurnRole::Assistant => "model",
                    _ => "user",
                };
                serde_json::json!({
                    "role": role,
                    "parts": [{ "text": t.text }],
                })
            })
            .collect();

        (system, contents)
    }
}

/// Pull the reply text out of a generateContent response.
fn extract_text(raw: &Value) -> Result<String> {
    let parts = raw
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .context("Gemini response has no candidates")?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        anyhow::bail!("Gemini response has no text parts");
    }
    Ok(text)
}

#[async_trait]
impl AlertProvider for GeminiClient {
    async fn fetch_alerts(&self, scope: &str) -> Result<Vec<RawAlert>, ProviderError> {
        let prompt = prompts::alert_sourcing_prompt(scope);
        let contents = vec![serde_json::json!({
            "role": "user",
            "parts": [{ "text": prompt }],
        })];

        let text = self
            .generate(&self.sourcing_model, None, contents)
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        parse_alert_batch(&text)
    }
}

#[async_trait]
impl AlertResponder for GeminiClient {
    async fn respond(&self, turns: &[Turn]) -> Result<String, ResponderError> {
        let (system, contents) = Self::convert_turns(turns);

        let reply = self
            .generate(&self.chat_model, system.as_deref(), contents)
            .await
            .map_err(|e| ResponderError::Unavailable(e.to_string()))?;

        let reply = reply.trim().to_string();
        if reply.is_empty() {
            return Err(ResponderError::EmptyReply);
        }
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_text_joins_parts() {
        let raw = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": "Hello " }, { "text": "world" }],
                    "role": "model"
                }
            }]
        });
        assert_eq!(extract_text(&raw).unwrap(), "Hello world");
    }

    #[test]
    fn extract_text_rejects_empty_candidates() {
        let raw = serde_json::json!({ "candidates": [] });
        assert!(extract_text(&raw).is_err());
    }

    #[test]
    fn convert_turns_splits_system_from_history() {
        let turns = vec![
            Turn::system("preamble"),
            Turn::participant("any update?"),
            Turn::assistant("No new updates."),
            Turn::participant("thanks"),
        ];

        let (system, contents) = GeminiClient::convert_turns(&turns);
        assert_eq!(system.as_deref(), Some("preamble"));
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["role"], "user");
    }
}
