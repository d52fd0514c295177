use crate::{
  crypto::{PublicKey, VerifyingKey},
  error::{AuthError, AuthResult},
};
use base64::{engine::general_purpose, Engine as _};

/// Separator between the fields of the signing string, spaces included
const FIELD_SEPARATOR: &str = " || ";

/// Signing Input
/// The exact bytes signed for an outgoing request: `<method> || <key id> || <relative url>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningInput<'a> {
  method: &'a str,
  key_id: &'a str,
  relative_url: &'a str,
}

impl<'a> SigningInput<'a> {
  /// The method is taken verbatim, no case normalization happens here
  pub fn new(method: &'a str, key_id: &'a str, relative_url: &'a str) -> Self {
    Self {
      method,
      key_id,
      relative_url,
    }
  }

  pub fn method(&self) -> &'a str {
    self.method
  }

  pub fn key_id(&self) -> &'a str {
    self.key_id
  }

  pub fn relative_url(&self) -> &'a str {
    self.relative_url
  }

  /// Returns the signing string as bytes to be signed
  pub fn as_bytes(&self) -> Vec<u8> {
    self.to_string().into_bytes()
  }

  /// Verify a standard base64 signature as produced by [`RequestSigner::sign`](crate::RequestSigner::sign)
  pub fn verify(&self, public_key: &PublicKey, signature_b64: &str) -> AuthResult<()> {
    let signature = general_purpose::STANDARD
      .decode(signature_b64)
      .map_err(|e| AuthError::SignatureDecodeError(e.to_string()))?;
    public_key.verify(&self.as_bytes(), &signature)
  }
}

impl std::fmt::Display for SigningInput<'_> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}",
      self.method, self.key_id, self.relative_url
    )
  }
}
