use crate::config::Config;
use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tokio::time::Duration;
use tracing::debug;

/// Client for the generative-language completion endpoint.
///
/// Configuration is injected at construction; the client never reads
/// environment state, so tests can point `base_url` at a mock server.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: config.api_key(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Send one prompt and return the first candidate's first text part.
    ///
    /// `Ok(None)` means the exchange succeeded but the response carried no
    /// text at that path; the caller owns the user-facing fallback wording
    /// for both that case and `Err`. One attempt, no retries.
    pub async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("No API key configured. Set GEMINI_API_KEY or api_key in config.toml"))?;

        let payload = serde_json::json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ]
        });

        debug!(model = %self.model, prompt_len = prompt.len(), "sending generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .context("Completion request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Completion endpoint error {status}: {error_text}"));
        }

        let body: Value = response
            .json()
            .await
            .context("Completion response was not valid JSON")?;

        Ok(extract_reply(&body))
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a response body.
/// Absence at any level of that path is `None`, never a fault.
pub fn extract_reply(body: &Value) -> Option<String> {
    body.get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .map(|t| t.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_first_candidate_text() {
        let body = json!({
            "candidates": [
                { "content": { "parts": [ { "text": "first" }, { "text": "second" } ] } },
                { "content": { "parts": [ { "text": "other candidate" } ] } }
            ]
        });
        assert_eq!(extract_reply(&body).as_deref(), Some("first"));
    }

    #[test]
    fn missing_path_levels_yield_none() {
        for body in [
            json!({}),
            json!({ "candidates": [] }),
            json!({ "candidates": [ {} ] }),
            json!({ "candidates": [ { "content": {} } ] }),
            json!({ "candidates": [ { "content": { "parts": [] } } ] }),
            json!({ "candidates": [ { "content": { "parts": [ {} ] } } ] }),
        ] {
            assert_eq!(extract_reply(&body), None, "body: {body}");
        }
    }

    #[test]
    fn non_string_text_yields_none() {
        let body = json!({
            "candidates": [ { "content": { "parts": [ { "text": 42 } ] } } ]
        });
        assert_eq!(extract_reply(&body), None);
    }

    #[test]
    fn endpoint_includes_model_and_trims_slash() {
        let config = Config {
            api_key: Some("k".into()),
            model: "gemini-1.5-pro".into(),
            base_url: "http://localhost:9000/v1beta/".into(),
            timeout_seconds: 5,
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-1.5-pro:generateContent"
        );
    }
}
