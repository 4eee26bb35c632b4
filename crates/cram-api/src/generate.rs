//! Handler for `POST /generate` — the raw forwarding endpoint.
//!
//! Accepts the task-type-tagged JSON body (`{"type":"keypoints", …}`),
//! forwards the constructed prompt upstream, and returns the model's
//! text unparsed. The typed endpoints (`/quizzes`, `/essays/grade`, …)
//! are preferred; this exists for callers that want the raw completion.

use axum::{Json, extract::State};
use cram_ai::GenerationTask;
use serde::Serialize;
use serde_json::Value;

use crate::{AppState, auth::Identity, error::ApiError};

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
  pub text: String,
}

/// `POST /generate` — body: a [`GenerationTask`] in wire form.
/// An unknown task-type tag is a 400.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Identity(_user): Identity,
  Json(body): Json<Value>,
) -> Result<Json<GenerateResponse>, ApiError>
where
  S: cram_core::store::StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let task: GenerationTask = serde_json::from_value(body)
    .map_err(|e| ApiError::BadRequest(format!("invalid task: {e}")))?;

  let text = state.ai.generate(&task).await?;
  Ok(Json(GenerateResponse { text }))
}
