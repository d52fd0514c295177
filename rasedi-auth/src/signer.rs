use crate::{
  crypto::{AlgorithmName, PublicKey, SecretKey, SigningKey},
  error::AuthResult,
  signing_input::SigningInput,
  trace::*,
};
use base64::{engine::general_purpose, Engine as _};

/// Signs outgoing requests with a private key and the key id registered for it.
/// The key is parsed once at construction and owned for the signer's lifetime.
pub struct RequestSigner {
  key_id: String,
  secret_key: SecretKey,
}

impl RequestSigner {
  pub fn new(secret_key: SecretKey, key_id: impl Into<String>) -> Self {
    Self {
      key_id: key_id.into(),
      secret_key,
    }
  }

  /// Parse a PEM private key of any supported algorithm
  pub fn from_pem(private_key_pem: &str, key_id: impl Into<String>) -> AuthResult<Self> {
    let secret_key = SecretKey::from_pem(private_key_pem)?;
    Ok(Self::new(secret_key, key_id))
  }

  pub fn key_id(&self) -> &str {
    &self.key_id
  }

  pub fn alg(&self) -> AlgorithmName {
    self.secret_key.alg()
  }

  pub fn public_key(&self) -> PublicKey {
    self.secret_key.public_key()
  }

  pub fn signing_input<'a>(&'a self, method: &'a str, relative_url: &'a str) -> SigningInput<'a> {
    SigningInput::new(method, &self.key_id, relative_url)
  }

  /// Sign `<method> || <key id> || <relative url>` and return the signature in standard base64.
  /// Failures are returned as they are, nothing is retried.
  pub fn sign(&self, method: &str, relative_url: &str) -> AuthResult<String> {
    let input = self.signing_input(method, relative_url);
    let signature = self.secret_key.sign(&input.as_bytes())?;
    debug!("Signed {method} {relative_url} with {} key `{}`", self.alg(), self.key_id);
    Ok(general_purpose::STANDARD.encode(signature))
  }
}

impl std::fmt::Debug for RequestSigner {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RequestSigner")
      .field("key_id", &self.key_id)
      .field("alg", &self.alg())
      .finish_non_exhaustive()
  }
}
