//! Parsers for the model's free-text output.
//!
//! The upstream returns unstructured text that is sometimes JSON-shaped
//! (often wrapped in markdown code fences) and sometimes a bulleted
//! list. Fences are stripped first; whatever remains must parse into the
//! expected shape or the caller gets a structured [`Error::Malformed`]
//! rather than a silently empty result.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Fence stripping ─────────────────────────────────────────────────────────

fn fence_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"```json\n?|```").expect("static regex"))
}

/// Remove markdown code fences (```json … ```) around a payload.
pub fn strip_code_fences(text: &str) -> String {
  fence_re().replace_all(text, "").trim().to_owned()
}

// ─── Questions ───────────────────────────────────────────────────────────────

/// One answer option of a multiple-choice question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
  pub id:         String,
  pub text:       String,
  #[serde(rename = "isCorrect")]
  pub is_correct: bool,
}

/// A multiple-choice question as produced by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
  pub id:          String,
  pub text:        String,
  pub answers:     Vec<Answer>,
  #[serde(default)]
  pub explanation: String,
}

/// Parse model output into questions.
///
/// The prompt demands exactly one correct answer per question; a
/// question violating that (or with no answers at all) makes the whole
/// payload malformed.
pub fn parse_questions(text: &str) -> Result<Vec<Question>> {
  let cleaned = strip_code_fences(text);
  let questions: Vec<Question> = serde_json::from_str(&cleaned)
    .map_err(|_| Error::malformed("question array", &cleaned))?;

  for q in &questions {
    let correct = q.answers.iter().filter(|a| a.is_correct).count();
    if q.answers.is_empty() || correct != 1 {
      return Err(Error::malformed("question with one correct answer", &cleaned));
    }
  }
  Ok(questions)
}

// ─── Essay grading ───────────────────────────────────────────────────────────

/// The grader's verdict on an essay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingReport {
  /// 1–10. The model sometimes emits the key as `overallScore`.
  #[serde(alias = "overallScore")]
  pub score:        f64,
  #[serde(default, alias = "letterGrade")]
  pub letter_grade: Option<String>,
  #[serde(default)]
  pub feedback:     String,
  #[serde(default)]
  pub suggestions:  Vec<String>,
}

/// Parse model output into a grading report, rejecting scores outside
/// the 1–10 scale the prompt asked for.
pub fn parse_grading(text: &str) -> Result<GradingReport> {
  let cleaned = strip_code_fences(text);
  let report: GradingReport = serde_json::from_str(&cleaned)
    .map_err(|_| Error::malformed("grading report", &cleaned))?;

  if !(report.score >= 1.0 && report.score <= 10.0) {
    return Err(Error::malformed("score within 1-10", &cleaned));
  }
  Ok(report)
}

// ─── Key points ──────────────────────────────────────────────────────────────

fn bullet_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(r"^\s*(?:[-*•]|\d+[.)])\s*").expect("static regex")
  })
}

/// Parse a line-oriented key-point list.
///
/// Strips bullet and numbering prefixes, drops blank lines and
/// preamble/heading lines (those ending in a colon). An output with no
/// usable lines is malformed.
pub fn parse_key_points(text: &str) -> Result<Vec<String>> {
  let cleaned = strip_code_fences(text);
  let points: Vec<String> = cleaned
    .lines()
    .map(|line| bullet_re().replace(line, "").trim().to_owned())
    .filter(|line| !line.is_empty() && !line.ends_with(':'))
    .collect();

  if points.is_empty() {
    return Err(Error::malformed("key point list", &cleaned));
  }
  Ok(points)
}

// ─── Flashcard drafts ────────────────────────────────────────────────────────

/// A front/back pair extracted from model output, not yet a stored card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardDraft {
  pub front: String,
  pub back:  String,
}

fn label_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    // Accepts `Front: …`, `- back: …`, and `**Front:** …` (colon inside
    // or outside the bold markers).
    Regex::new(r"(?i)^\s*(?:[-*•]\s*)?\**(front|back)(?::\**|\**\s*:)\s*(.*)$")
      .expect("static regex")
  })
}

/// Parse flashcard drafts from model output.
///
/// Accepts either a JSON array of `{"front": …, "back": …}` objects or
/// `Front:` / `Back:` labelled line pairs.
pub fn parse_flashcard_drafts(text: &str) -> Result<Vec<FlashcardDraft>> {
  let cleaned = strip_code_fences(text);

  if let Ok(drafts) = serde_json::from_str::<Vec<FlashcardDraft>>(&cleaned) {
    if !drafts.is_empty() {
      return Ok(drafts);
    }
  }

  let mut drafts = Vec::new();
  let mut front: Option<String> = None;
  for line in cleaned.lines() {
    let Some(caps) = label_re().captures(line) else {
      continue;
    };
    let value = caps[2].trim().to_owned();
    if caps[1].eq_ignore_ascii_case("front") {
      front = Some(value);
    } else if let Some(f) = front.take() {
      drafts.push(FlashcardDraft { front: f, back: value });
    }
  }

  if drafts.is_empty() {
    return Err(Error::malformed("flashcard list", &cleaned));
  }
  Ok(drafts)
}
