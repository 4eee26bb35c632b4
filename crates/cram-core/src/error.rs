//! Error types for `cram-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("quiz score {0} exceeds 100 percent")]
  ScoreOutOfRange(u8),

  #[error("unknown difficulty: {0:?}")]
  UnknownDifficulty(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
