//! Handlers for `/notes` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/notes` | Optional `?topic=` filter |
//! | `POST` | `/notes` | Body: [`NewNote`]; returns 201 + stored note |
//! | `GET`  | `/notes/:id` | 404 if not found |
//! | `PUT`  | `/notes/:id` | Replace editable fields, bump `updated_at` |
//! | `DELETE` | `/notes/:id` | 204 on removal |
//! | `POST` | `/notes/:id/key-points` | Re-extract key points via the model |
//! | `POST` | `/notes/:id/flashcards` | Generate cards from the note via the model |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use cram_ai::{GenerationTask, parse};
use cram_core::{
  flashcard::Flashcard,
  note::{NewNote, Note},
  store::StudyStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::Identity, error::ApiError};

async fn load_note<S>(
  state: &AppState<S>,
  user: &cram_core::UserId,
  id: Uuid,
) -> Result<Note, ApiError>
where
  S: StudyStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state
    .store
    .get_note(user, id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("note {id} not found")))
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub topic: Option<String>,
}

/// `GET /notes[?topic=<topic>]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Identity(user): Identity,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Note>>, ApiError>
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let notes = state
    .store
    .list_notes(&user, params.topic.as_deref())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(notes))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /notes` — returns 201 + the stored [`Note`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Identity(user): Identity,
  Json(body): Json<NewNote>,
) -> Result<impl IntoResponse, ApiError>
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let note = Note::create(body, Utc::now());
  state
    .store
    .put_note(&user, &note)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(note)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /notes/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Identity(user): Identity,
  Path(id): Path<Uuid>,
) -> Result<Json<Note>, ApiError>
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Ok(Json(load_note(&state, &user, id).await?))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /notes/:id` — body: [`NewNote`]; replaces editable fields.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Identity(user): Identity,
  Path(id): Path<Uuid>,
  Json(body): Json<NewNote>,
) -> Result<Json<Note>, ApiError>
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut note = load_note(&state, &user, id).await?;
  note.apply_edit(body, Utc::now());
  state
    .store
    .put_note(&user, &note)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(note))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /notes/:id`
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
    .delete_note(&user, id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if removed {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("note {id} not found")))
  }
}

// ─── Key points ──────────────────────────────────────────────────────────────

/// `POST /notes/:id/key-points` — re-extract key points from the note's
/// content and persist them.
pub async fn regenerate_key_points<S>(
  State(state): State<AppState<S>>,
  Identity(user): Identity,
  Path(id): Path<Uuid>,
) -> Result<Json<Note>, ApiError>
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut note = load_note(&state, &user, id).await?;

  let task = GenerationTask::KeyPoints {
    content: note.content.clone(),
  };
  let text = state.ai.generate(&task).await?;
  let key_points = parse::parse_key_points(&text)?;

  note.set_key_points(key_points, Utc::now());
  state
    .store
    .put_note(&user, &note)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(note))
}

// ─── Flashcard generation ────────────────────────────────────────────────────

/// `POST /notes/:id/flashcards` — generate cards from the note and
/// persist them linked to it. Returns 201 + the stored cards.
pub async fn generate_flashcards<S>(
  State(state): State<AppState<S>>,
  Identity(user): Identity,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let note = load_note(&state, &user, id).await?;

  let task = GenerationTask::Flashcards {
    content: note.content.clone(),
  };
  let text = state.ai.generate(&task).await?;
  let drafts = parse::parse_flashcard_drafts(&text)?;

  let cards: Vec<Flashcard> = drafts
    .into_iter()
    .map(|d| {
      Flashcard::create(cram_core::flashcard::NewFlashcard {
        front:      d.front,
        back:       d.back,
        note_id:    Some(note.id),
        topic:      note.topic.clone(),
        difficulty: Default::default(),
      })
    })
    .collect();

  state
    .store
    .put_flashcards(&user, &cards)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(cards)))
}
