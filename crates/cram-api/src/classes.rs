//! Handlers for `/classes` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/classes` | All classes for the account |
//! | `POST` | `/classes` | Body: `{"name":"AP Calculus BC"}` |
//! | `GET`  | `/classes/:id` | 404 if not found |
//! | `PUT`  | `/classes/:id` | Rename |
//! | `DELETE` | `/classes/:id` | 204 on removal |
//! | `PUT`  | `/classes/:id/topics/:topic` | Idempotent add |
//! | `DELETE` | `/classes/:id/topics/:topic` | Remove by exact name |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use cram_core::{class::Class, store::StudyStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::Identity, error::ApiError};

async fn load_class<S>(
  state: &AppState<S>,
  user: &cram_core::UserId,
  id: Uuid,
) -> Result<Class, ApiError>
where
  S: StudyStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state
    .store
    .get_class(user, id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("class {id} not found")))
}

#[derive(Debug, Deserialize)]
pub struct NameBody {
  pub name: String,
}

/// `GET /classes`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Identity(user): Identity,
) -> Result<Json<Vec<Class>>, ApiError>
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let classes = state
    .store
    .list_classes(&user)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(classes))
}

/// `POST /classes` — body: `{"name":"…"}`; returns 201 + the class.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Identity(user): Identity,
  Json(body): Json<NameBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let class = Class::create(body.name);
  state
    .store
    .put_class(&user, &class)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(class)))
}

/// `GET /classes/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Identity(user): Identity,
  Path(id): Path<Uuid>,
) -> Result<Json<Class>, ApiError>
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Ok(Json(load_class(&state, &user, id).await?))
}

/// `PUT /classes/:id` — body: `{"name":"…"}`.
pub async fn rename<S>(
  State(state): State<AppState<S>>,
  Identity(user): Identity,
  Path(id): Path<Uuid>,
  Json(body): Json<NameBody>,
) -> Result<Json<Class>, ApiError>
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut class = load_class(&state, &user, id).await?;
  class.name = body.name;
  state
    .store
    .put_class(&user, &class)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(class))
}

/// `DELETE /classes/:id`
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
    .delete_class(&user, id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if removed {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("class {id} not found")))
  }
}

/// `PUT /classes/:id/topics/:topic` — add a topic; no-op if present.
pub async fn add_topic<S>(
  State(state): State<AppState<S>>,
  Identity(user): Identity,
  Path((id, topic)): Path<(Uuid, String)>,
) -> Result<Json<Class>, ApiError>
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut class = load_class(&state, &user, id).await?;
  if class.add_topic(&topic) {
    state
      .store
      .put_class(&user, &class)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;
  }
  Ok(Json(class))
}

/// `DELETE /classes/:id/topics/:topic` — remove a topic by exact name.
pub async fn remove_topic<S>(
  State(state): State<AppState<S>>,
  Identity(user): Identity,
  Path((id, topic)): Path<(Uuid, String)>,
) -> Result<Json<Class>, ApiError>
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut class = load_class(&state, &user, id).await?;
  if class.remove_topic(&topic) {
    state
      .store
      .put_class(&user, &class)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;
  }
  Ok(Json(class))
}
