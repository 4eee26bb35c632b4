//! Derived study statistics — never stored, always computed on read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  flashcard::{Difficulty, Flashcard},
  result::{EssayResult, QuizResult},
};

/// How many recent-activity entries the summary keeps.
const RECENT_LIMIT: usize = 5;

/// Mastery threshold: a card reviewed more than this many times counts
/// as mastered.
const MASTERED_REPETITIONS: u32 = 3;

// ─── Summary types ───────────────────────────────────────────────────────────

/// Aggregate scores for one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicStats {
  pub topic:           String,
  /// Mean quiz percentage, rounded; `None` if no quizzes for the topic.
  pub avg_quiz_score:  Option<u8>,
  /// Mean essay score on the 1–10 scale; `None` if no essays.
  pub avg_essay_score: Option<f64>,
  pub quiz_count:      usize,
  pub essay_count:     usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
  Quiz,
  Essay,
}

/// One row of the recent-activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
  pub kind:     ActivityKind,
  pub topic:    String,
  /// Display form: `"85%"` for quizzes, letter grade or `"7.5/10"` for
  /// essays.
  pub score:    String,
  pub taken_at: DateTime<Utc>,
}

/// The overall study summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudySummary {
  pub quizzes_taken:    usize,
  pub essays_submitted: usize,
  /// Mean quiz percentage, rounded; zero when no quizzes exist.
  pub avg_quiz_score:   u8,
  /// Mean essay score, one-decimal precision; zero when no essays exist.
  pub avg_essay_score:  f64,
  pub topics:           Vec<TopicStats>,
  pub recent:           Vec<ActivityEntry>,
}

/// Counts over a flashcard deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckStats {
  pub total:    usize,
  pub due:      usize,
  pub mastered: usize,
  pub easy:     usize,
  pub medium:   usize,
  pub hard:     usize,
}

// ─── Computation ─────────────────────────────────────────────────────────────

/// Summarise quiz and essay history.
pub fn summarize(
  quizzes: &[QuizResult],
  essays: &[EssayResult],
) -> StudySummary {
  let avg_quiz_score = if quizzes.is_empty() {
    0
  } else {
    let total: u32 = quizzes.iter().map(|q| u32::from(q.score)).sum();
    ((f64::from(total) / quizzes.len() as f64).round()) as u8
  };

  let avg_essay_score = if essays.is_empty() {
    0.0
  } else {
    let total: f64 = essays.iter().map(|e| e.score).sum();
    (total / essays.len() as f64 * 10.0).round() / 10.0
  };

  StudySummary {
    quizzes_taken: quizzes.len(),
    essays_submitted: essays.len(),
    avg_quiz_score,
    avg_essay_score,
    topics: topic_stats(quizzes, essays),
    recent: recent_activity(quizzes, essays),
  }
}

fn topic_stats(
  quizzes: &[QuizResult],
  essays: &[EssayResult],
) -> Vec<TopicStats> {
  // Keep first-seen topic order stable across runs.
  let mut order: Vec<String> = Vec::new();
  let mut seen = |order: &mut Vec<String>, topic: &str| {
    if !order.iter().any(|t| t == topic) {
      order.push(topic.to_owned());
    }
  };
  for q in quizzes {
    seen(&mut order, &q.topic);
  }
  for e in essays {
    seen(&mut order, &e.topic);
  }

  order
    .into_iter()
    .map(|topic| {
      let quiz_scores: Vec<u32> = quizzes
        .iter()
        .filter(|q| q.topic == topic)
        .map(|q| u32::from(q.score))
        .collect();
      let essay_scores: Vec<f64> = essays
        .iter()
        .filter(|e| e.topic == topic)
        .map(|e| e.score)
        .collect();

      let avg_quiz_score = if quiz_scores.is_empty() {
        None
      } else {
        let total: u32 = quiz_scores.iter().sum();
        Some((f64::from(total) / quiz_scores.len() as f64).round() as u8)
      };
      let avg_essay_score = if essay_scores.is_empty() {
        None
      } else {
        let total: f64 = essay_scores.iter().sum();
        Some((total / essay_scores.len() as f64 * 10.0).round() / 10.0)
      };

      TopicStats {
        topic,
        avg_quiz_score,
        avg_essay_score,
        quiz_count: quiz_scores.len(),
        essay_count: essay_scores.len(),
      }
    })
    .collect()
}

fn recent_activity(
  quizzes: &[QuizResult],
  essays: &[EssayResult],
) -> Vec<ActivityEntry> {
  let mut entries: Vec<ActivityEntry> = quizzes
    .iter()
    .map(|q| ActivityEntry {
      kind:     ActivityKind::Quiz,
      topic:    q.topic.clone(),
      score:    format!("{}%", q.score),
      taken_at: q.taken_at,
    })
    .chain(essays.iter().map(|e| ActivityEntry {
      kind:     ActivityKind::Essay,
      topic:    e.topic.clone(),
      score:    e
        .letter_grade
        .clone()
        .unwrap_or_else(|| format!("{}/10", e.score)),
      taken_at: e.taken_at,
    }))
    .collect();

  entries.sort_by(|a, b| b.taken_at.cmp(&a.taken_at));
  entries.truncate(RECENT_LIMIT);
  entries
}

/// Count deck state: due, mastered, and per-difficulty totals.
pub fn deck_stats(cards: &[Flashcard], now: DateTime<Utc>) -> DeckStats {
  DeckStats {
    total:    cards.len(),
    due:      cards.iter().filter(|c| c.is_due(now)).count(),
    mastered: cards
      .iter()
      .filter(|c| c.repetitions > MASTERED_REPETITIONS)
      .count(),
    easy:     count_difficulty(cards, Difficulty::Easy),
    medium:   count_difficulty(cards, Difficulty::Medium),
    hard:     count_difficulty(cards, Difficulty::Hard),
  }
}

fn count_difficulty(cards: &[Flashcard], d: Difficulty) -> usize {
  cards.iter().filter(|c| c.difficulty == d).count()
}

#[cfg(test)]
mod tests {
  use chrono::Duration;
  use uuid::Uuid;

  use super::*;
  use crate::flashcard::NewFlashcard;

  fn quiz(topic: &str, score: u8, at: DateTime<Utc>) -> QuizResult {
    QuizResult {
      id: Uuid::new_v4(),
      topic: topic.into(),
      score,
      taken_at: at,
      question_count: 5,
    }
  }

  fn essay(
    topic: &str,
    score: f64,
    grade: Option<&str>,
    at: DateTime<Utc>,
  ) -> EssayResult {
    EssayResult {
      id: Uuid::new_v4(),
      topic: topic.into(),
      score,
      letter_grade: grade.map(str::to_owned),
      taken_at: at,
    }
  }

  #[test]
  fn empty_history_yields_zeroes() {
    let summary = summarize(&[], &[]);
    assert_eq!(summary.quizzes_taken, 0);
    assert_eq!(summary.essays_submitted, 0);
    assert_eq!(summary.avg_quiz_score, 0);
    assert_eq!(summary.avg_essay_score, 0.0);
    assert!(summary.topics.is_empty());
    assert!(summary.recent.is_empty());
  }

  #[test]
  fn averages_round_as_displayed() {
    let now = Utc::now();
    let quizzes = [quiz("Limits", 80, now), quiz("Limits", 85, now)];
    let essays = [essay("DBQ", 7.0, None, now), essay("DBQ", 8.5, None, now)];
    let summary = summarize(&quizzes, &essays);
    // (80 + 85) / 2 = 82.5 → 83; (7.0 + 8.5) / 2 = 7.75 → 7.8
    assert_eq!(summary.avg_quiz_score, 83);
    assert_eq!(summary.avg_essay_score, 7.8);
  }

  #[test]
  fn topic_rollup_keeps_kinds_separate() {
    let now = Utc::now();
    let quizzes = [quiz("Limits", 90, now)];
    let essays = [essay("DBQ", 6.0, None, now)];
    let summary = summarize(&quizzes, &essays);

    let limits = summary.topics.iter().find(|t| t.topic == "Limits").unwrap();
    assert_eq!(limits.avg_quiz_score, Some(90));
    assert_eq!(limits.avg_essay_score, None);

    let dbq = summary.topics.iter().find(|t| t.topic == "DBQ").unwrap();
    assert_eq!(dbq.avg_quiz_score, None);
    assert_eq!(dbq.avg_essay_score, Some(6.0));
  }

  #[test]
  fn recent_is_newest_first_capped_at_five() {
    let base = Utc::now();
    let quizzes: Vec<QuizResult> = (0..4)
      .map(|i| quiz("Limits", 80, base + Duration::minutes(i)))
      .collect();
    let essays = [
      essay("DBQ", 9.0, Some("A"), base + Duration::minutes(10)),
      essay("DBQ", 5.0, None, base - Duration::minutes(10)),
    ];
    let summary = summarize(&quizzes, &essays);

    assert_eq!(summary.recent.len(), 5);
    assert_eq!(summary.recent[0].kind, ActivityKind::Essay);
    // Letter grade wins over numeric display.
    assert_eq!(summary.recent[0].score, "A");
    assert!(
      summary
        .recent
        .windows(2)
        .all(|w| w[0].taken_at >= w[1].taken_at)
    );
  }

  #[test]
  fn deck_stats_counts() {
    let now = Utc::now();
    let mut reviewed = Flashcard::create(NewFlashcard {
      front:      "f".into(),
      back:       "b".into(),
      note_id:    None,
      topic:      "Limits".into(),
      difficulty: Difficulty::Medium,
    });
    for i in 0..4 {
      reviewed.record_review(Difficulty::Easy, now - Duration::days(20 - i));
    }
    let fresh = Flashcard::create(NewFlashcard {
      front:      "f2".into(),
      back:       "b2".into(),
      note_id:    None,
      topic:      "Limits".into(),
      difficulty: Difficulty::Hard,
    });

    let stats = deck_stats(&[reviewed, fresh], now);
    assert_eq!(stats.total, 2);
    // Both due: one never scheduled, one whose interval elapsed.
    assert_eq!(stats.due, 2);
    assert_eq!(stats.mastered, 1);
    assert_eq!(stats.easy, 1);
    assert_eq!(stats.hard, 1);
  }
}
