//! Generation task types and their prompt templates.
//!
//! Each variant corresponds to one task-type tag on the wire. The tag
//! and field names match the JSON bodies the forwarding endpoint
//! accepts, so a request body deserialises directly into a task.

use serde::Deserialize;

fn default_count() -> u32 { 5 }

/// One request to the generation backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GenerationTask {
  /// Multiple-choice questions over supplied note content.
  Questions {
    content: String,
    #[serde(default = "default_count")]
    count:   u32,
  },

  /// Multiple-choice questions over a bare topic name.
  TopicQuestions {
    topic: String,
    #[serde(default = "default_count")]
    count: u32,
  },

  /// Key-point extraction from note content.
  #[serde(rename = "keypoints")]
  KeyPoints { content: String },

  /// Flashcard (front/back) generation from note content.
  Flashcards { content: String },

  /// Summary and key points of a video transcript.
  VideoNotes { transcript: String },

  /// Essay grading against an essay prompt.
  EssayGrading {
    prompt:        String,
    #[serde(rename = "essayContent")]
    essay_content: String,
  },
}

/// The JSON shape the question prompts demand from the model.
const QUESTION_FORMAT: &str = "The output should be a valid JSON array of \
   objects, where each object has the following format: { \"id\": \
   \"string\", \"text\": \"string\", \"answers\": [{ \"id\": \"string\", \
   \"text\": \"string\", \"isCorrect\": boolean }], \"explanation\": \
   \"string\" }. Ensure only one answer is correct.";

impl GenerationTask {
  /// The task-type tag, as accepted on the wire.
  pub fn tag(&self) -> &'static str {
    match self {
      Self::Questions { .. } => "questions",
      Self::TopicQuestions { .. } => "topic-questions",
      Self::KeyPoints { .. } => "keypoints",
      Self::Flashcards { .. } => "flashcards",
      Self::VideoNotes { .. } => "video-notes",
      Self::EssayGrading { .. } => "essay-grading",
    }
  }

  /// Render the prompt string sent upstream.
  pub fn prompt(&self) -> String {
    match self {
      Self::Questions { content, count } => format!(
        "Generate {count} multiple choice questions on the notes provided. \
         {QUESTION_FORMAT} Notes: {content}"
      ),
      Self::TopicQuestions { topic, count } => format!(
        "Generate {count} multiple choice questions on the topic of \
         \"{topic}\". {QUESTION_FORMAT}"
      ),
      Self::KeyPoints { content } => format!(
        "Extract the key points from the following text as a \
         list:\n{content}"
      ),
      Self::Flashcards { content } => format!(
        "Generate flashcards (front: question, back: answer) from these \
         notes:\n{content}"
      ),
      Self::VideoNotes { transcript } => format!(
        "Summarize the following video transcript and extract key \
         points:\n{transcript}"
      ),
      Self::EssayGrading {
        prompt,
        essay_content,
      } => format!(
        "Please grade the following essay based on the provided prompt. \
         Provide a score from 1 to 10, detailed feedback, and a list of \
         suggestions for improvement. The output should be a valid JSON \
         object with the format: {{ \"score\": number, \"feedback\": \
         \"string\", \"suggestions\": [\"string\"] }}. \n\nEssay Prompt: \
         \"{prompt}\"\n\nEssay Content: \"{essay_content}\""
      ),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn question_count_substituted() {
    let task = GenerationTask::Questions {
      content: "Derivatives measure rates of change.".into(),
      count:   3,
    };
    let prompt = task.prompt();
    assert!(prompt.starts_with("Generate 3 multiple choice questions"));
    assert!(prompt.contains("Ensure only one answer is correct."));
    assert!(prompt.ends_with("Notes: Derivatives measure rates of change."));
  }

  #[test]
  fn deserialises_from_wire_tags() {
    let task: GenerationTask = serde_json::from_str(
      r#"{"type":"topic-questions","topic":"Limits"}"#,
    )
    .unwrap();
    assert_eq!(task.tag(), "topic-questions");
    // Count falls back to 5 when omitted.
    match task {
      GenerationTask::TopicQuestions { count, .. } => assert_eq!(count, 5),
      other => panic!("wrong variant: {other:?}"),
    }

    let task: GenerationTask =
      serde_json::from_str(r#"{"type":"keypoints","content":"abc"}"#).unwrap();
    assert_eq!(task.tag(), "keypoints");

    let task: GenerationTask = serde_json::from_str(
      r#"{"type":"essay-grading","prompt":"p","essayContent":"e"}"#,
    )
    .unwrap();
    assert_eq!(task.tag(), "essay-grading");
  }

  #[test]
  fn unknown_tag_is_rejected() {
    let err =
      serde_json::from_str::<GenerationTask>(r#"{"type":"haiku","content":"x"}"#);
    assert!(err.is_err());
  }

  #[test]
  fn essay_prompt_embeds_both_texts() {
    let task = GenerationTask::EssayGrading {
      prompt:        "Evaluate the causes of WWI.".into(),
      essay_content: "The war began...".into(),
    };
    let prompt = task.prompt();
    assert!(prompt.contains("Essay Prompt: \"Evaluate the causes of WWI.\""));
    assert!(prompt.contains("Essay Content: \"The war began...\""));
  }
}
