//! HTTP client for a Gemini-style `generateContent` endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, task::GenerationTask};

pub const DEFAULT_BASE_URL: &str =
  "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// Connection settings for the generation backend.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
  pub api_key:      String,
  #[serde(default = "default_base_url")]
  pub base_url:     String,
  #[serde(default = "default_model")]
  pub model:        String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_base_url() -> String { DEFAULT_BASE_URL.to_owned() }
fn default_model() -> String { DEFAULT_MODEL.to_owned() }
fn default_timeout_secs() -> u64 { 30 }

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
  contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
  parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
  text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
  content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
  #[serde(default)]
  parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
  #[serde(default)]
  text: String,
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Async client for the generation API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
/// One synchronous request/response call per task; no retry, no
/// streaming.
#[derive(Clone)]
pub struct GeminiClient {
  client: reqwest::Client,
  config: AiConfig,
}

impl GeminiClient {
  pub fn new(config: AiConfig) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String {
    format!(
      "{}/models/{}:generateContent?key={}",
      self.config.base_url.trim_end_matches('/'),
      self.config.model,
      self.config.api_key,
    )
  }

  /// Send `task`'s prompt upstream and return the first candidate's text.
  pub async fn generate(&self, task: &GenerationTask) -> Result<String> {
    let prompt = task.prompt();
    let body = GenerateRequest {
      contents: [Content {
        parts: [Part { text: &prompt }],
      }],
    };

    tracing::debug!(task = task.tag(), "dispatching generation request");
    let resp = self.client.post(self.url()).json(&body).send().await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      tracing::warn!(task = task.tag(), %status, "upstream generation failed");
      return Err(Error::Upstream {
        status: status.as_u16(),
        body,
      });
    }

    let parsed: GenerateResponse = resp.json().await?;
    let text = parsed
      .candidates
      .into_iter()
      .next()
      .and_then(|c| c.content.parts.into_iter().next())
      .map(|p| p.text)
      .filter(|t| !t.is_empty())
      .ok_or(Error::EmptyResponse)?;

    Ok(text)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn config() -> AiConfig {
    serde_json::from_str(r#"{ "api_key": "k" }"#).unwrap()
  }

  #[test]
  fn config_defaults_fill_in() {
    let cfg = config();
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.model, DEFAULT_MODEL);
    assert_eq!(cfg.timeout_secs, 30);
  }

  #[test]
  fn url_includes_model_and_key() {
    let client = GeminiClient::new(config()).unwrap();
    assert_eq!(
      client.url(),
      format!("{DEFAULT_BASE_URL}/models/{DEFAULT_MODEL}:generateContent?key=k")
    );
  }

  #[test]
  fn response_text_extraction() {
    let raw = r#"{
      "candidates": [
        { "content": { "parts": [ { "text": "hello" } ] } }
      ]
    }"#;
    let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
    assert_eq!(parsed.candidates[0].content.parts[0].text, "hello");
  }

  #[test]
  fn empty_candidates_deserialise() {
    let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
    assert!(parsed.candidates.is_empty());
  }
}
