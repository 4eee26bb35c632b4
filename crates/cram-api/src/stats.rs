//! Handler for `GET /stats`.

use axum::{Json, extract::State};
use chrono::Utc;
use cram_core::{
  stats::{self, DeckStats, StudySummary},
  store::StudyStore,
};
use serde::Serialize;

use crate::{AppState, auth::Identity, error::ApiError};

#[derive(Debug, Serialize)]
pub struct StatsResponse {
  pub summary: StudySummary,
  pub deck:    DeckStats,
}

/// `GET /stats` — quiz/essay summary plus flashcard deck counts,
/// computed on read from the account's stored history.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Identity(user): Identity,
) -> Result<Json<StatsResponse>, ApiError>
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let quizzes = state
    .store
    .list_quiz_results(&user)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let essays = state
    .store
    .list_essay_results(&user)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let cards = state
    .store
    .list_flashcards(&user, None)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(StatsResponse {
    summary: stats::summarize(&quizzes, &essays),
    deck:    stats::deck_stats(&cards, Utc::now()),
  }))
}
