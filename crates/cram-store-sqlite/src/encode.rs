//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Vec-valued fields
//! (tags, key points, topics) and the note source are stored as compact
//! JSON. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use cram_core::{
  class::Class,
  flashcard::{Difficulty, Flashcard},
  note::{Note, NoteSource},
  result::{EssayResult, QuizResult},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── JSON-encoded string lists ───────────────────────────────────────────────

pub fn encode_strings(items: &[String]) -> Result<String> {
  Ok(serde_json::to_string(items)?)
}

pub fn decode_strings(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── NoteSource ──────────────────────────────────────────────────────────────

pub fn encode_source(source: &NoteSource) -> Result<String> {
  Ok(serde_json::to_string(source)?)
}

pub fn decode_source(s: &str) -> Result<NoteSource> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `notes` row.
pub struct RawNote {
  pub note_id:    String,
  pub title:      String,
  pub content:    String,
  pub topic:      String,
  pub tags:       String,
  pub key_points: String,
  pub created_at: String,
  pub updated_at: String,
  pub source:     String,
}

impl RawNote {
  pub fn into_note(self) -> Result<Note> {
    Ok(Note {
      id:         decode_uuid(&self.note_id)?,
      title:      self.title,
      content:    self.content,
      topic:      self.topic,
      tags:       decode_strings(&self.tags)?,
      key_points: decode_strings(&self.key_points)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      source:     decode_source(&self.source)?,
    })
  }
}

/// Raw strings read directly from a `flashcards` row.
pub struct RawFlashcard {
  pub card_id:       String,
  pub front:         String,
  pub back:          String,
  pub note_id:       Option<String>,
  pub topic:         String,
  pub difficulty:    String,
  pub last_reviewed: Option<String>,
  pub next_review:   Option<String>,
  pub repetitions:   u32,
}

impl RawFlashcard {
  pub fn into_flashcard(self) -> Result<Flashcard> {
    Ok(Flashcard {
      id:            decode_uuid(&self.card_id)?,
      front:         self.front,
      back:          self.back,
      note_id:       self.note_id.as_deref().map(decode_uuid).transpose()?,
      topic:         self.topic,
      difficulty:    Difficulty::parse(&self.difficulty)?,
      last_reviewed: self.last_reviewed.as_deref().map(decode_dt).transpose()?,
      next_review:   self.next_review.as_deref().map(decode_dt).transpose()?,
      repetitions:   self.repetitions,
    })
  }
}

/// Raw strings read directly from a `quiz_results` row.
pub struct RawQuizResult {
  pub result_id:      String,
  pub topic:          String,
  pub score:          u8,
  pub taken_at:       String,
  pub question_count: u32,
}

impl RawQuizResult {
  pub fn into_result(self) -> Result<QuizResult> {
    Ok(QuizResult {
      id:             decode_uuid(&self.result_id)?,
      topic:          self.topic,
      score:          self.score,
      taken_at:       decode_dt(&self.taken_at)?,
      question_count: self.question_count,
    })
  }
}

/// Raw strings read directly from an `essay_results` row.
pub struct RawEssayResult {
  pub result_id:    String,
  pub topic:        String,
  pub score:        f64,
  pub letter_grade: Option<String>,
  pub taken_at:     String,
}

impl RawEssayResult {
  pub fn into_result(self) -> Result<EssayResult> {
    Ok(EssayResult {
      id:           decode_uuid(&self.result_id)?,
      topic:        self.topic,
      score:        self.score,
      letter_grade: self.letter_grade,
      taken_at:     decode_dt(&self.taken_at)?,
    })
  }
}

/// Raw strings read directly from a `classes` row.
pub struct RawClass {
  pub class_id: String,
  pub name:     String,
  pub topics:   String,
}

impl RawClass {
  pub fn into_class(self) -> Result<Class> {
    Ok(Class {
      id:     decode_uuid(&self.class_id)?,
      name:   self.name,
      topics: decode_strings(&self.topics)?,
    })
  }
}
