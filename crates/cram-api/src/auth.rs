//! HTTP Basic-auth verification and the [`Identity`] extractor.
//!
//! The authenticated account name doubles as the partition key: every
//! handler receives an [`Identity`] and scopes its store calls to it.

use std::collections::HashMap;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use cram_core::{UserId, store::StudyStore};

use crate::{AppState, error::ApiError};

/// Accounts accepted by this server instance, name → argon2 PHC string.
#[derive(Clone, Default)]
pub struct AuthRegistry {
  accounts: HashMap<String, String>,
}

impl AuthRegistry {
  pub fn new(
    accounts: impl IntoIterator<Item = (String, String)>,
  ) -> Self {
    Self {
      accounts: accounts.into_iter().collect(),
    }
  }

  /// Verify credentials from request headers; returns the account's
  /// [`UserId`] on success.
  pub fn verify(&self, headers: &HeaderMap) -> Result<UserId, ApiError> {
    let header_val = headers
      .get(axum::http::header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .ok_or(ApiError::Unauthorized)?;

    let encoded = header_val
      .strip_prefix("Basic ")
      .ok_or(ApiError::Unauthorized)?;

    let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
    let creds =
      std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

    let (name, password) =
      creds.split_once(':').ok_or(ApiError::Unauthorized)?;

    let hash = self.accounts.get(name).ok_or(ApiError::Unauthorized)?;
    let parsed_hash =
      PasswordHash::new(hash).map_err(|_| ApiError::Unauthorized)?;

    Argon2::default()
      .verify_password(password.as_bytes(), &parsed_hash)
      .map_err(|_| ApiError::Unauthorized)?;

    Ok(UserId::from(name))
  }
}

/// The authenticated account; present in a handler means auth succeeded.
pub struct Identity(pub UserId);

impl<S> FromRequestParts<AppState<S>> for Identity
where
  S: StudyStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let user = state.auth.verify(&parts.headers)?;
    Ok(Identity(user))
  }
}
