//! Handlers for `/flashcards` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/flashcards` | Optional `?topic=`, `?due=true` filters |
//! | `POST` | `/flashcards` | Body: [`NewFlashcard`]; returns 201 + card |
//! | `PUT`  | `/flashcards/:id` | Edit content fields; review state untouched |
//! | `DELETE` | `/flashcards/:id` | 204 on removal |
//! | `POST` | `/flashcards/:id/review` | Body: `{"rating":"easy"}`; reschedules |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use cram_core::{
  flashcard::{Difficulty, Flashcard, NewFlashcard},
  store::StudyStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::Identity, error::ApiError};

async fn load_card<S>(
  state: &AppState<S>,
  user: &cram_core::UserId,
  id: Uuid,
) -> Result<Flashcard, ApiError>
where
  S: StudyStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state
    .store
    .get_flashcard(user, id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("flashcard {id} not found")))
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub topic: Option<String>,
  /// If `true`, return only cards due for review.
  #[serde(default)]
  pub due:   bool,
}

/// `GET /flashcards[?topic=<topic>][&due=true]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Identity(user): Identity,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Flashcard>>, ApiError>
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut cards = state
    .store
    .list_flashcards(&user, params.topic.as_deref())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  if params.due {
    let now = Utc::now();
    cards.retain(|c| c.is_due(now));
  }

  Ok(Json(cards))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /flashcards` — returns 201 + the stored card.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Identity(user): Identity,
  Json(body): Json<NewFlashcard>,
) -> Result<impl IntoResponse, ApiError>
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let card = Flashcard::create(body);
  state
    .store
    .put_flashcard(&user, &card)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(card)))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// Editable content fields; review state is never editable directly.
#[derive(Debug, Deserialize)]
pub struct EditCard {
  pub front:   String,
  pub back:    String,
  pub topic:   String,
  #[serde(default)]
  pub note_id: Option<Uuid>,
}

/// `PUT /flashcards/:id` — body: [`EditCard`].
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Identity(user): Identity,
  Path(id): Path<Uuid>,
  Json(body): Json<EditCard>,
) -> Result<Json<Flashcard>, ApiError>
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut card = load_card(&state, &user, id).await?;
  card.front = body.front;
  card.back = body.back;
  card.topic = body.topic;
  card.note_id = body.note_id;
  state
    .store
    .put_flashcard(&user, &card)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(card))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /flashcards/:id`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Identity(user): Identity,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let removed = state
    .store
    .delete_flashcard(&user, id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if removed {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("flashcard {id} not found")))
  }
}

// ─── Review ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReviewBody {
  pub rating: Difficulty,
}

/// `POST /flashcards/:id/review` — body: `{"rating":"easy"|"medium"|"hard"}`.
///
/// Applies the fixed-offset schedule (easy 7d, medium 3d, hard 1d) and
/// returns the updated card.
pub async fn review<S>(
  State(state): State<AppState<S>>,
  Identity(user): Identity,
  Path(id): Path<Uuid>,
  Json(body): Json<ReviewBody>,
) -> Result<Json<Flashcard>, ApiError>
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut card = load_card(&state, &user, id).await?;
  card.record_review(body.rating, Utc::now());
  state
    .store
    .put_flashcard(&user, &card)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(card))
}
