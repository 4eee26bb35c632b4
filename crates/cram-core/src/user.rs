//! User identity — the partition key for every collection.
//!
//! Accounts come from the server's auth layer; the store never creates
//! them. A `UserId` is an opaque string and carries no ordering or
//! structure. Every store operation is scoped to exactly one partition.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque account identifier used as the partition key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for UserId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

impl From<String> for UserId {
  fn from(s: String) -> Self { Self(s) }
}
