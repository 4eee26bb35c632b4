//! JSON REST API for cram.
//!
//! Exposes an axum [`Router`] backed by any [`cram_core::store::StudyStore`]
//! plus a [`GeminiClient`] for the generation endpoints. Every route
//! requires HTTP Basic auth; the authenticated account name is the
//! partition key for all store access.

pub mod auth;
pub mod classes;
pub mod error;
pub mod essays;
pub mod flashcards;
pub mod generate;
pub mod notes;
pub mod quizzes;
pub mod stats;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post, put},
};
use cram_ai::{AiConfig, GeminiClient};
use cram_core::store::StudyStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

pub use auth::{AuthRegistry, Identity};
pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// One account allowed to use this server.
#[derive(Deserialize, Clone)]
pub struct AccountConfig {
  pub name:          String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  pub ai:         AiConfig,
  pub accounts:   Vec<AccountConfig>,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: StudyStore> {
  pub store: Arc<S>,
  pub ai:    Arc<GeminiClient>,
  pub auth:  Arc<AuthRegistry>,
}

/// Build a [`GeminiClient`] from config. Separate so the binary can
/// fail early with context.
pub fn build_ai_client(config: &AiConfig) -> cram_ai::Result<GeminiClient> {
  GeminiClient::new(config.clone())
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn router<S>(state: AppState<S>) -> Router<()>
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Notes
    .route("/notes", get(notes::list::<S>).post(notes::create::<S>))
    .route(
      "/notes/{id}",
      get(notes::get_one::<S>)
        .put(notes::update::<S>)
        .delete(notes::delete_one::<S>),
    )
    .route("/notes/{id}/key-points", post(notes::regenerate_key_points::<S>))
    .route("/notes/{id}/flashcards", post(notes::generate_flashcards::<S>))
    // Flashcards
    .route(
      "/flashcards",
      get(flashcards::list::<S>).post(flashcards::create::<S>),
    )
    .route(
      "/flashcards/{id}",
      put(flashcards::update::<S>).delete(flashcards::delete_one::<S>),
    )
    .route("/flashcards/{id}/review", post(flashcards::review::<S>))
    // Quizzes
    .route("/quizzes", post(quizzes::generate::<S>))
    .route(
      "/quizzes/results",
      get(quizzes::list_results::<S>).post(quizzes::record_result::<S>),
    )
    // Essays
    .route("/essays/grade", post(essays::grade::<S>))
    .route("/essays/results", get(essays::list_results::<S>))
    // Classes
    .route("/classes", get(classes::list::<S>).post(classes::create::<S>))
    .route(
      "/classes/{id}",
      get(classes::get_one::<S>)
        .put(classes::rename::<S>)
        .delete(classes::delete_one::<S>),
    )
    .route(
      "/classes/{id}/topics/{topic}",
      put(classes::add_topic::<S>).delete(classes::remove_topic::<S>),
    )
    // Stats
    .route("/stats", get(stats::handler::<S>))
    // Raw generation passthrough
    .route("/generate", post(generate::handler::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
  use cram_store_sqlite::SqliteStore;
  use rand_core::OsRng;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  async fn make_state(password: &str) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();

    // Points at a closed port; tests never reach the upstream.
    let ai = GeminiClient::new(AiConfig {
      api_key:      "test-key".into(),
      base_url:     "http://127.0.0.1:9".into(),
      model:        "test-model".into(),
      timeout_secs: 1,
    })
    .unwrap();

    AppState {
      store: Arc::new(store),
      ai:    Arc::new(ai),
      auth:  Arc::new(AuthRegistry::new([("user".to_owned(), hash)])),
    }
  }

  fn auth_header(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn oneshot(
    state: AppState<SqliteStore>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> axum::response::Response {
    let mut builder = Request::builder()
      .method(method)
      .uri(uri)
      .header(header::AUTHORIZATION, auth_header("user", "pw"));
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let req = builder.body(body).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn json_body(res: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  // ── Auth ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn missing_credentials_get_401_with_challenge() {
    let state = make_state("pw").await;
    let req = Request::builder()
      .method("GET")
      .uri("/notes")
      .body(Body::empty())
      .unwrap();
    let res = router(state).oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key(header::WWW_AUTHENTICATE));
  }

  #[tokio::test]
  async fn wrong_password_gets_401() {
    let state = make_state("pw").await;
    let req = Request::builder()
      .method("GET")
      .uri("/notes")
      .header(header::AUTHORIZATION, auth_header("user", "nope"))
      .body(Body::empty())
      .unwrap();
    let res = router(state).oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
  }

  // ── Notes ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn note_create_get_delete_round_trip() {
    let state = make_state("pw").await;

    let res = oneshot(
      state.clone(),
      "POST",
      "/notes",
      Some(json!({
        "title": "Derivatives",
        "content": "Rates of change.",
        "topic": "Calculus"
      })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let note = json_body(res).await;
    let id = note["id"].as_str().unwrap().to_owned();
    assert_eq!(note["key_points"], json!([]));

    let res = oneshot(state.clone(), "GET", &format!("/notes/{id}"), None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res =
      oneshot(state.clone(), "DELETE", &format!("/notes/{id}"), None).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = oneshot(state, "GET", &format!("/notes/{id}"), None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
  }

  // ── Flashcards ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn review_reschedules_card() {
    let state = make_state("pw").await;

    let res = oneshot(
      state.clone(),
      "POST",
      "/flashcards",
      Some(json!({
        "front": "Power rule?",
        "back": "n x^(n-1)",
        "topic": "Calculus"
      })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let card = json_body(res).await;
    let id = card["id"].as_str().unwrap().to_owned();
    assert!(card["next_review"].is_null());

    let res = oneshot(
      state,
      "POST",
      &format!("/flashcards/{id}/review"),
      Some(json!({ "rating": "easy" })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let reviewed = json_body(res).await;
    assert_eq!(reviewed["repetitions"], 1);
    assert_eq!(reviewed["difficulty"], "easy");
    assert!(reviewed["next_review"].is_string());
  }

  // ── Quizzes ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn quiz_generation_needs_a_source() {
    let state = make_state("pw").await;
    let res = oneshot(state, "POST", "/quizzes", Some(json!({}))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn quiz_score_above_100_rejected() {
    let state = make_state("pw").await;
    let res = oneshot(
      state.clone(),
      "POST",
      "/quizzes/results",
      Some(json!({ "topic": "Calculus", "score": 101, "question_count": 5 })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = oneshot(
      state,
      "POST",
      "/quizzes/results",
      Some(json!({ "topic": "Calculus", "score": 80, "question_count": 5 })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
  }

  // ── Essays ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn short_essay_rejected_before_any_upstream_call() {
    // The AI endpoint in make_state is unreachable, so a 400 here proves
    // the length check fires first.
    let state = make_state("pw").await;
    let res = oneshot(
      state,
      "POST",
      "/essays/grade",
      Some(json!({
        "topic": "DBQ",
        "prompt": "Evaluate the causes of WWI.",
        "content": "Too short."
      })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert!(body["error"].as_str().unwrap().contains("100"));
  }

  // ── Classes ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn class_topic_add_is_idempotent() {
    let state = make_state("pw").await;

    let res = oneshot(
      state.clone(),
      "POST",
      "/classes",
      Some(json!({ "name": "AP Calculus BC" })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let class = json_body(res).await;
    let id = class["id"].as_str().unwrap().to_owned();

    let uri = format!("/classes/{id}/topics/Derivatives");
    let res = oneshot(state.clone(), "PUT", &uri, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = oneshot(state.clone(), "PUT", &uri, None).await;
    let class = json_body(res).await;
    assert_eq!(class["topics"], json!(["Derivatives"]));

    let res = oneshot(state, "DELETE", &uri, None).await;
    let class = json_body(res).await;
    assert_eq!(class["topics"], json!([]));
  }

  // ── Generate ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn unknown_task_tag_is_400() {
    let state = make_state("pw").await;
    let res = oneshot(
      state,
      "POST",
      "/generate",
      Some(json!({ "type": "haiku", "content": "x" })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
  }

  // ── Stats ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn stats_on_empty_store_are_zero() {
    let state = make_state("pw").await;
    let res = oneshot(state, "GET", "/stats", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["summary"]["quizzes_taken"], 0);
    assert_eq!(body["summary"]["avg_quiz_score"], 0);
    assert_eq!(body["deck"]["total"], 0);
  }
}
