//! Error types for `cram-ai`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The upstream API answered with a non-success status. The status and
  /// body are preserved so callers can relay them.
  #[error("upstream returned {status}: {body}")]
  Upstream { status: u16, body: String },

  /// The upstream answered 2xx but with no usable candidate text.
  #[error("upstream response contained no candidate text")]
  EmptyResponse,

  /// The model's text could not be parsed into the expected shape.
  /// Carries what was expected and a snippet of the offending text.
  #[error("malformed {expected} in model output: {snippet}")]
  Malformed {
    expected: &'static str,
    snippet:  String,
  },
}

impl Error {
  /// Build a [`Error::Malformed`], truncating the offending text to a
  /// loggable size.
  pub(crate) fn malformed(expected: &'static str, text: &str) -> Self {
    const MAX: usize = 200;
    let snippet = if text.len() > MAX {
      let mut end = MAX;
      while !text.is_char_boundary(end) {
        end -= 1;
      }
      format!("{}…", &text[..end])
    } else {
      text.to_owned()
    };
    Self::Malformed { expected, snippet }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
