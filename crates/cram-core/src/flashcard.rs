//! Flashcards and the fixed-offset review schedule.
//!
//! The schedule is intentionally simple: each difficulty rating maps to
//! a fixed interval (easy 7 days, medium 3, hard 1). There is no
//! adaptive easing — a card rated hard always comes back tomorrow.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// How hard the user found a card on its last review.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
  Easy,
  #[default]
  Medium,
  Hard,
}

impl Difficulty {
  /// Days until the next review for a card rated at this difficulty.
  pub fn interval(self) -> Duration {
    match self {
      Self::Easy => Duration::days(7),
      Self::Medium => Duration::days(3),
      Self::Hard => Duration::days(1),
    }
  }

  /// The lowercase string stored in the `difficulty` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Easy => "easy",
      Self::Medium => "medium",
      Self::Hard => "hard",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "easy" => Ok(Self::Easy),
      "medium" => Ok(Self::Medium),
      "hard" => Ok(Self::Hard),
      other => Err(Error::UnknownDifficulty(other.to_owned())),
    }
  }
}

/// A two-sided study card, optionally linked to the note it came from.
///
/// `note_id` is a soft link — the referenced note may have been deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flashcard {
  pub id:            Uuid,
  pub front:         String,
  pub back:          String,
  pub note_id:       Option<Uuid>,
  pub topic:         String,
  pub difficulty:    Difficulty,
  pub last_reviewed: Option<DateTime<Utc>>,
  pub next_review:   Option<DateTime<Utc>>,
  pub repetitions:   u32,
}

/// Input for creating a flashcard. Review state starts empty.
#[derive(Debug, Clone, Deserialize)]
pub struct NewFlashcard {
  pub front:   String,
  pub back:    String,
  #[serde(default)]
  pub note_id: Option<Uuid>,
  pub topic:   String,
  #[serde(default)]
  pub difficulty: Difficulty,
}

impl Flashcard {
  pub fn create(input: NewFlashcard) -> Self {
    Self {
      id:            Uuid::new_v4(),
      front:         input.front,
      back:          input.back,
      note_id:       input.note_id,
      topic:         input.topic,
      difficulty:    input.difficulty,
      last_reviewed: None,
      next_review:   None,
      repetitions:   0,
    }
  }

  /// Record a review at `now` with the given rating.
  ///
  /// Sets the difficulty to the rating, pushes `next_review` out by the
  /// rating's fixed interval, and increments the repetition count.
  pub fn record_review(&mut self, rating: Difficulty, now: DateTime<Utc>) {
    self.difficulty = rating;
    self.last_reviewed = Some(now);
    self.next_review = Some(now + rating.interval());
    self.repetitions += 1;
  }

  /// A card is due when it has never been scheduled or its scheduled
  /// review time has passed.
  pub fn is_due(&self, now: DateTime<Utc>) -> bool {
    match self.next_review {
      None => true,
      Some(at) => at <= now,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn card() -> Flashcard {
    Flashcard::create(NewFlashcard {
      front:      "What is a limit?".into(),
      back:       "The value a function approaches.".into(),
      note_id:    None,
      topic:      "Limits & Continuity".into(),
      difficulty: Difficulty::default(),
    })
  }

  #[test]
  fn new_card_is_due() {
    assert!(card().is_due(Utc::now()));
  }

  #[test]
  fn review_offsets_are_fixed() {
    let now = Utc::now();
    for (rating, days) in [
      (Difficulty::Easy, 7),
      (Difficulty::Medium, 3),
      (Difficulty::Hard, 1),
    ] {
      let mut c = card();
      c.record_review(rating, now);
      assert_eq!(c.difficulty, rating);
      assert_eq!(c.last_reviewed, Some(now));
      assert_eq!(c.next_review, Some(now + Duration::days(days)));
    }
  }

  #[test]
  fn repetitions_increment_per_review() {
    let now = Utc::now();
    let mut c = card();
    c.record_review(Difficulty::Hard, now);
    c.record_review(Difficulty::Easy, now + Duration::days(1));
    assert_eq!(c.repetitions, 2);
  }

  #[test]
  fn reviewed_card_not_due_until_interval_elapses() {
    let now = Utc::now();
    let mut c = card();
    c.record_review(Difficulty::Medium, now);
    assert!(!c.is_due(now + Duration::days(2)));
    assert!(c.is_due(now + Duration::days(3)));
  }

  #[test]
  fn difficulty_round_trips_through_str() {
    for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
      assert_eq!(Difficulty::parse(d.as_str()).unwrap(), d);
    }
    assert!(Difficulty::parse("brutal").is_err());
  }
}
