//! Handlers for `/essays` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/essays/grade` | Grade an essay; rejects content under 100 chars |
//! | `GET`  | `/essays/results` | List outcomes, newest first |

use axum::{Json, extract::State};
use chrono::Utc;
use cram_ai::{
  GenerationTask,
  parse::{self, GradingReport},
};
use cram_core::{result::EssayResult, store::StudyStore};
use serde::{Deserialize, Serialize};

use crate::{AppState, auth::Identity, error::ApiError};

/// Minimum essay length accepted for grading, in characters.
const MIN_ESSAY_CHARS: usize = 100;

#[derive(Debug, Deserialize)]
pub struct GradeBody {
  /// Topic the result is recorded under (e.g. the essay type name).
  pub topic:   String,
  /// The essay prompt the content responds to.
  pub prompt:  String,
  pub content: String,
}

#[derive(Debug, Serialize)]
pub struct GradeResponse {
  pub report: GradingReport,
  pub result: EssayResult,
}

/// `POST /essays/grade` — body: [`GradeBody`].
///
/// Length is checked before any upstream call; a short essay never
/// costs a generation request.
pub async fn grade<S>(
  State(state): State<AppState<S>>,
  Identity(user): Identity,
  Json(body): Json<GradeBody>,
) -> Result<Json<GradeResponse>, ApiError>
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.content.trim().chars().count() < MIN_ESSAY_CHARS {
    return Err(ApiError::BadRequest(format!(
      "essay too short: at least {MIN_ESSAY_CHARS} characters are required \
       for a proper evaluation"
    )));
  }

  let task = GenerationTask::EssayGrading {
    prompt:        body.prompt,
    essay_content: body.content,
  };
  let text = state.ai.generate(&task).await?;
  let report = parse::parse_grading(&text)?;

  let result = EssayResult::create(
    body.topic,
    report.score,
    report.letter_grade.clone(),
    Utc::now(),
  );
  state
    .store
    .add_essay_result(&user, &result)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(GradeResponse { report, result }))
}

/// `GET /essays/results`
pub async fn list_results<S>(
  State(state): State<AppState<S>>,
  Identity(user): Identity,
) -> Result<Json<Vec<EssayResult>>, ApiError>
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let results = state
    .store
    .list_essay_results(&user)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(results))
}
