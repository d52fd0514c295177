use crate::error::{HttpAuthError, HttpAuthResult};
use bytes::Bytes;
use rasedi_auth::prelude::{KeyFetcher, PublicKeyRecord};
use tracing::debug;

/// Parse the body of the public key listing, `[{"id": "...", "key": "-----BEGIN PUBLIC KEY-----..."}]`
pub fn parse_public_keys(body: &[u8]) -> HttpAuthResult<Vec<PublicKeyRecord>> {
  let records: Vec<PublicKeyRecord> = serde_json::from_slice(body)?;
  debug!("Parsed {} public keys", records.len());
  Ok(records)
}

/// Adapts a transport returning the raw listing body into a [`KeyFetcher`]
pub struct BodyKeyFetcher<F> {
  fetch_body: F,
}

impl<F, E> BodyKeyFetcher<F>
where
  F: Fn() -> Result<Bytes, E>,
  E: std::error::Error + Send + Sync + 'static,
{
  pub fn new(fetch_body: F) -> Self {
    Self { fetch_body }
  }
}

impl<F, E> KeyFetcher for BodyKeyFetcher<F>
where
  F: Fn() -> Result<Bytes, E>,
  E: std::error::Error + Send + Sync + 'static,
{
  type Error = HttpAuthError;

  fn fetch_public_keys(&self) -> HttpAuthResult<Vec<PublicKeyRecord>> {
    let body = (self.fetch_body)().map_err(|e| HttpAuthError::Transport(Box::new(e)))?;
    parse_public_keys(&body)
  }
}
