//! Classes — named groupings of quiz/essay topics.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A class (course) with its list of study topics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
  pub id:     Uuid,
  pub name:   String,
  pub topics: Vec<String>,
}

impl Class {
  pub fn create(name: String) -> Self {
    Self {
      id: Uuid::new_v4(),
      name,
      topics: Vec::new(),
    }
  }

  /// Add a topic if not already present. Returns `true` if added.
  pub fn add_topic(&mut self, topic: &str) -> bool {
    if self.topics.iter().any(|t| t == topic) {
      return false;
    }
    self.topics.push(topic.to_owned());
    true
  }

  /// Remove a topic by exact name. Returns `true` if it was present.
  pub fn remove_topic(&mut self, topic: &str) -> bool {
    let before = self.topics.len();
    self.topics.retain(|t| t != topic);
    self.topics.len() != before
  }
}
