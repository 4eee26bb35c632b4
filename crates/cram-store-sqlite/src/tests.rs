//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, Utc};
use cram_core::{
  class::Class,
  flashcard::{Difficulty, Flashcard, NewFlashcard},
  note::{NewNote, Note, NoteSource},
  result::{EssayResult, QuizResult},
  store::StudyStore,
  user::UserId,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("in-memory store")
}

fn alice() -> UserId { UserId::from("alice") }

fn bob() -> UserId { UserId::from("bob") }

fn note(topic: &str) -> Note {
  Note::create(
    NewNote {
      title:   "Derivatives overview".into(),
      content: "The derivative measures instantaneous rate of change.".into(),
      topic:   topic.into(),
      tags:    vec!["calculus".into()],
      source:  NoteSource::Manual,
    },
    Utc::now(),
  )
}

fn card(topic: &str) -> Flashcard {
  Flashcard::create(NewFlashcard {
    front:      "Power rule?".into(),
    back:       "d/dx x^n = n x^(n-1)".into(),
    note_id:    None,
    topic:      topic.into(),
    difficulty: Difficulty::Medium,
  })
}

// ─── Notes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn put_and_get_note() {
  let s = store().await;
  let n = note("Derivatives");
  s.put_note(&alice(), &n).await.unwrap();

  let fetched = s.get_note(&alice(), n.id).await.unwrap().unwrap();
  assert_eq!(fetched.id, n.id);
  assert_eq!(fetched.title, n.title);
  assert_eq!(fetched.tags, n.tags);
  assert_eq!(fetched.source, NoteSource::Manual);
}

#[tokio::test]
async fn get_note_missing_returns_none() {
  let s = store().await;
  assert!(s.get_note(&alice(), Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn put_note_is_upsert() {
  let s = store().await;
  let mut n = note("Derivatives");
  s.put_note(&alice(), &n).await.unwrap();

  n.set_key_points(vec!["Slope of tangent".into()], Utc::now());
  s.put_note(&alice(), &n).await.unwrap();

  let all = s.list_notes(&alice(), None).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].key_points, vec!["Slope of tangent"]);
}

#[tokio::test]
async fn list_notes_filters_by_topic() {
  let s = store().await;
  s.put_note(&alice(), &note("Derivatives")).await.unwrap();
  s.put_note(&alice(), &note("Integrals")).await.unwrap();
  s.put_note(&alice(), &note("Derivatives")).await.unwrap();

  let all = s.list_notes(&alice(), None).await.unwrap();
  assert_eq!(all.len(), 3);

  let filtered = s.list_notes(&alice(), Some("Integrals")).await.unwrap();
  assert_eq!(filtered.len(), 1);
  assert_eq!(filtered[0].topic, "Integrals");
}

#[tokio::test]
async fn put_notes_batch_and_delete() {
  let s = store().await;
  let notes = vec![note("Limits"), note("Limits"), note("Series")];
  s.put_notes(&alice(), &notes).await.unwrap();
  assert_eq!(s.list_notes(&alice(), None).await.unwrap().len(), 3);

  assert!(s.delete_note(&alice(), notes[0].id).await.unwrap());
  assert!(!s.delete_note(&alice(), notes[0].id).await.unwrap());
  assert_eq!(s.list_notes(&alice(), None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn notes_are_partitioned_per_user() {
  let s = store().await;
  s.put_note(&alice(), &note("Derivatives")).await.unwrap();

  assert!(s.list_notes(&bob(), None).await.unwrap().is_empty());
  let alice_notes = s.list_notes(&alice(), None).await.unwrap();
  let alice_note = &alice_notes[0];
  assert!(s.get_note(&bob(), alice_note.id).await.unwrap().is_none());
  // Same id may exist independently in another partition.
  s.put_note(&bob(), alice_note).await.unwrap();
  assert!(s.delete_note(&bob(), alice_note.id).await.unwrap());
  assert!(s.get_note(&alice(), alice_note.id).await.unwrap().is_some());
}

// ─── Flashcards ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn flashcard_round_trip_preserves_review_state() {
  let s = store().await;
  let mut c = card("Derivatives");
  c.record_review(Difficulty::Easy, Utc::now());
  s.put_flashcard(&alice(), &c).await.unwrap();

  let fetched = s.get_flashcard(&alice(), c.id).await.unwrap().unwrap();
  assert_eq!(fetched.difficulty, Difficulty::Easy);
  assert_eq!(fetched.repetitions, 1);
  assert_eq!(fetched.last_reviewed, c.last_reviewed);
  assert_eq!(fetched.next_review, c.next_review);
}

#[tokio::test]
async fn flashcard_note_link_may_dangle() {
  let s = store().await;
  let n = note("Derivatives");
  s.put_note(&alice(), &n).await.unwrap();

  let mut c = card("Derivatives");
  c.note_id = Some(n.id);
  s.put_flashcard(&alice(), &c).await.unwrap();

  // Deleting the note leaves the card untouched, link dangling.
  assert!(s.delete_note(&alice(), n.id).await.unwrap());
  let fetched = s.get_flashcard(&alice(), c.id).await.unwrap().unwrap();
  assert_eq!(fetched.note_id, Some(n.id));
}

#[tokio::test]
async fn flashcards_batch_put_and_topic_filter() {
  let s = store().await;
  let cards = vec![card("Limits"), card("Limits"), card("Series")];
  s.put_flashcards(&alice(), &cards).await.unwrap();

  assert_eq!(s.list_flashcards(&alice(), None).await.unwrap().len(), 3);
  assert_eq!(
    s.list_flashcards(&alice(), Some("Limits")).await.unwrap().len(),
    2
  );
  assert!(s.delete_flashcard(&alice(), cards[2].id).await.unwrap());
  assert_eq!(s.list_flashcards(&alice(), None).await.unwrap().len(), 2);
}

// ─── Results ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn quiz_results_listed_newest_first() {
  let s = store().await;
  let base = Utc::now();
  for (i, score) in [70u8, 80, 90].iter().enumerate() {
    let r = QuizResult {
      id: Uuid::new_v4(),
      topic: "Limits".into(),
      score: *score,
      taken_at: base + Duration::minutes(i as i64),
      question_count: 5,
    };
    s.add_quiz_result(&alice(), &r).await.unwrap();
  }

  let results = s.list_quiz_results(&alice()).await.unwrap();
  assert_eq!(results.len(), 3);
  assert_eq!(results[0].score, 90);
  assert!(s.list_quiz_results(&bob()).await.unwrap().is_empty());
}

#[tokio::test]
async fn essay_result_round_trip() {
  let s = store().await;
  let r = EssayResult::create(
    "AP DBQ".into(),
    8.5,
    Some("B+".into()),
    Utc::now(),
  );
  s.add_essay_result(&alice(), &r).await.unwrap();

  let results = s.list_essay_results(&alice()).await.unwrap();
  assert_eq!(results.len(), 1);
  assert_eq!(results[0].score, 8.5);
  assert_eq!(results[0].letter_grade.as_deref(), Some("B+"));
}

// ─── Classes ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn class_crud_and_topic_persistence() {
  let s = store().await;
  let mut class = Class::create("AP Calculus BC".into());
  class.add_topic("Limits & Continuity");
  class.add_topic("Derivatives");
  s.put_class(&alice(), &class).await.unwrap();

  let fetched = s.get_class(&alice(), class.id).await.unwrap().unwrap();
  assert_eq!(fetched.topics, vec!["Limits & Continuity", "Derivatives"]);

  class.remove_topic("Derivatives");
  s.put_class(&alice(), &class).await.unwrap();
  let fetched = s.get_class(&alice(), class.id).await.unwrap().unwrap();
  assert_eq!(fetched.topics, vec!["Limits & Continuity"]);

  assert_eq!(s.list_classes(&alice()).await.unwrap().len(), 1);
  assert!(s.delete_class(&alice(), class.id).await.unwrap());
  assert!(s.list_classes(&alice()).await.unwrap().is_empty());
}
