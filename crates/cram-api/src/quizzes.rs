//! Handlers for `/quizzes` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/quizzes` | Generate questions from stored notes or a topic |
//! | `POST` | `/quizzes/results` | Record an outcome; score ≤ 100 |
//! | `GET`  | `/quizzes/results` | List outcomes, newest first |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use cram_ai::{
  GenerationTask,
  parse::{self, Question},
};
use cram_core::{result::QuizResult, store::StudyStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::Identity, error::ApiError};

// ─── Generate ────────────────────────────────────────────────────────────────

/// Source selection for quiz generation: stored notes or a bare topic.
#[derive(Debug, Deserialize)]
pub struct QuizRequest {
  #[serde(default)]
  pub note_ids: Vec<Uuid>,
  pub topic:    Option<String>,
  pub count:    Option<u32>,
}

/// `POST /quizzes` — body: [`QuizRequest`]; returns parsed questions.
pub async fn generate<S>(
  State(state): State<AppState<S>>,
  Identity(user): Identity,
  Json(body): Json<QuizRequest>,
) -> Result<Json<Vec<Question>>, ApiError>
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let count = body.count.unwrap_or(5);

  let task = if !body.note_ids.is_empty() {
    let mut contents = Vec::with_capacity(body.note_ids.len());
    for id in &body.note_ids {
      let note = state
        .store
        .get_note(&user, *id)
        .await
        .map_err(|e| ApiError::Store(Box::new(e)))?
        .ok_or_else(|| ApiError::NotFound(format!("note {id} not found")))?;
      contents.push(note.content);
    }
    GenerationTask::Questions {
      content: contents.join("\n"),
      count,
    }
  } else if let Some(topic) = body.topic {
    GenerationTask::TopicQuestions { topic, count }
  } else {
    return Err(ApiError::BadRequest(
      "either note_ids or topic is required".into(),
    ));
  };

  let text = state.ai.generate(&task).await?;
  let questions = parse::parse_questions(&text)?;
  Ok(Json(questions))
}

// ─── Results ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResultBody {
  pub topic:          String,
  pub score:          u8,
  pub question_count: u32,
}

/// `POST /quizzes/results` — returns 201 + the stored [`QuizResult`].
pub async fn record_result<S>(
  State(state): State<AppState<S>>,
  Identity(user): Identity,
  Json(body): Json<ResultBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let result =
    QuizResult::create(body.topic, body.score, body.question_count, Utc::now())
      .map_err(|e| ApiError::BadRequest(e.to_string()))?;
  state
    .store
    .add_quiz_result(&user, &result)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(result)))
}

/// `GET /quizzes/results`
pub async fn list_results<S>(
  State(state): State<AppState<S>>,
  Identity(user): Identity,
) -> Result<Json<Vec<QuizResult>>, ApiError>
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let results = state
    .store
    .list_quiz_results(&user)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(results))
}
