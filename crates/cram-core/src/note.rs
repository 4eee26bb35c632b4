//! Notes — the primary study material.
//!
//! A note owns free-form content plus a list of AI-derived key points.
//! Key points are a snapshot of whatever the model extracted when they
//! were last regenerated; editing the content does not invalidate them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a note's content came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoteSource {
  /// Typed in by the user directly.
  #[default]
  Manual,
  /// Summarised from a video transcript.
  Video { url: Option<String> },
  /// Brought in from an external export.
  Import,
}

/// A study note, owned by exactly one user partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
  pub id:         Uuid,
  pub title:      String,
  pub content:    String,
  pub topic:      String,
  pub tags:       Vec<String>,
  /// AI-derived summary points. May be stale relative to `content`.
  pub key_points: Vec<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub source:     NoteSource,
}

/// Input for creating a note. Id and timestamps are assigned on creation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewNote {
  pub title:   String,
  pub content: String,
  pub topic:   String,
  #[serde(default)]
  pub tags:    Vec<String>,
  #[serde(default)]
  pub source:  NoteSource,
}

impl Note {
  /// Build a note from caller input with a fresh id and `now` timestamps.
  pub fn create(input: NewNote, now: DateTime<Utc>) -> Self {
    Self {
      id:         Uuid::new_v4(),
      title:      input.title,
      content:    input.content,
      topic:      input.topic,
      tags:       input.tags,
      key_points: Vec::new(),
      created_at: now,
      updated_at: now,
      source:     input.source,
    }
  }

  /// Replace the editable fields and bump `updated_at`.
  pub fn apply_edit(&mut self, input: NewNote, now: DateTime<Utc>) {
    self.title = input.title;
    self.content = input.content;
    self.topic = input.topic;
    self.tags = input.tags;
    self.source = input.source;
    self.updated_at = now;
  }

  /// Swap in freshly extracted key points and bump `updated_at`.
  pub fn set_key_points(
    &mut self,
    key_points: Vec<String>,
    now: DateTime<Utc>,
  ) {
    self.key_points = key_points;
    self.updated_at = now;
  }
}
