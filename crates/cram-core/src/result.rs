//! Quiz and essay outcome records.
//!
//! These are append-only history rows; nothing ever updates one after
//! it is written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Outcome of one completed quiz. `score` is a percentage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResult {
  pub id:             Uuid,
  pub topic:          String,
  pub score:          u8,
  pub taken_at:       DateTime<Utc>,
  pub question_count: u32,
}

impl QuizResult {
  /// Build a result with a fresh id, rejecting scores above 100.
  pub fn create(
    topic: String,
    score: u8,
    question_count: u32,
    now: DateTime<Utc>,
  ) -> Result<Self> {
    if score > 100 {
      return Err(Error::ScoreOutOfRange(score));
    }
    Ok(Self {
      id: Uuid::new_v4(),
      topic,
      score,
      taken_at: now,
      question_count,
    })
  }
}

/// Outcome of one graded essay. `score` is on the grader's 1–10 scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EssayResult {
  pub id:           Uuid,
  pub topic:        String,
  pub score:        f64,
  pub letter_grade: Option<String>,
  pub taken_at:     DateTime<Utc>,
}

impl EssayResult {
  pub fn create(
    topic: String,
    score: f64,
    letter_grade: Option<String>,
    now: DateTime<Utc>,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      topic,
      score,
      letter_grade,
      taken_at: now,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn quiz_score_above_100_rejected() {
    let err = QuizResult::create("Derivatives".into(), 101, 5, Utc::now());
    assert!(matches!(err, Err(Error::ScoreOutOfRange(101))));
  }

  #[test]
  fn quiz_score_at_bounds_accepted() {
    assert!(QuizResult::create("Derivatives".into(), 0, 5, Utc::now()).is_ok());
    assert!(
      QuizResult::create("Derivatives".into(), 100, 5, Utc::now()).is_ok()
    );
  }
}
