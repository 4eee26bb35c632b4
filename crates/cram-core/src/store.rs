//! The `StudyStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `cram-store-sqlite`). The API layer depends on this abstraction, not
//! on any concrete backend.
//!
//! Every method takes the owning [`UserId`]; all reads and writes are
//! scoped to that single partition. There are no cross-user operations
//! and no referential integrity between collections — a flashcard's
//! `note_id` may point at a note that no longer exists.

use std::future::Future;

use uuid::Uuid;

use crate::{
  class::Class,
  flashcard::Flashcard,
  note::Note,
  result::{EssayResult, QuizResult},
  user::UserId,
};

/// Abstraction over a cram persistence backend.
///
/// Writes use upsert semantics: a `put_*` with an existing id replaces
/// the stored record wholesale. All methods return `Send` futures so the
/// trait can be used from multi-threaded async runtimes (tokio + axum).
pub trait StudyStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Notes ─────────────────────────────────────────────────────────────

  /// Insert or replace one note.
  fn put_note(
    &self,
    user: &UserId,
    note: &Note,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;

  /// Insert or replace a batch of notes atomically.
  fn put_notes(
    &self,
    user: &UserId,
    notes: &[Note],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;

  /// Retrieve one note. Returns `None` if not found.
  fn get_note(
    &self,
    user: &UserId,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Note>, Self::Error>> + Send;

  /// List notes, optionally restricted to one topic.
  fn list_notes(
    &self,
    user: &UserId,
    topic: Option<&str>,
  ) -> impl Future<Output = Result<Vec<Note>, Self::Error>> + Send;

  /// Delete a note. Returns `true` if a row was removed.
  fn delete_note(
    &self,
    user: &UserId,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

  // ── Flashcards ────────────────────────────────────────────────────────

  fn put_flashcard(
    &self,
    user: &UserId,
    card: &Flashcard,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;

  fn put_flashcards(
    &self,
    user: &UserId,
    cards: &[Flashcard],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;

  fn get_flashcard(
    &self,
    user: &UserId,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Flashcard>, Self::Error>> + Send;

  fn list_flashcards(
    &self,
    user: &UserId,
    topic: Option<&str>,
  ) -> impl Future<Output = Result<Vec<Flashcard>, Self::Error>> + Send;

  fn delete_flashcard(
    &self,
    user: &UserId,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

  // ── Results — append-only ─────────────────────────────────────────────

  fn add_quiz_result(
    &self,
    user: &UserId,
    result: &QuizResult,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;

  fn list_quiz_results(
    &self,
    user: &UserId,
  ) -> impl Future<Output = Result<Vec<QuizResult>, Self::Error>> + Send;

  fn add_essay_result(
    &self,
    user: &UserId,
    result: &EssayResult,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;

  fn list_essay_results(
    &self,
    user: &UserId,
  ) -> impl Future<Output = Result<Vec<EssayResult>, Self::Error>> + Send;

  // ── Classes ───────────────────────────────────────────────────────────

  fn put_class(
    &self,
    user: &UserId,
    class: &Class,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;

  fn get_class(
    &self,
    user: &UserId,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Class>, Self::Error>> + Send;

  fn list_classes(
    &self,
    user: &UserId,
  ) -> impl Future<Output = Result<Vec<Class>, Self::Error>> + Send;

  fn delete_class(
    &self,
    user: &UserId,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}
