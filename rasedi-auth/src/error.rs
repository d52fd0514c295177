use thiserror::Error;

/// Result type for request signing and token verification
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Error type for request signing and token verification
#[derive(Error, Debug)]
pub enum AuthError {
  /* ----- Key material ----- */
  /// None of the private key containers could be decoded, or a public key PEM is malformed
  #[error("Failed to parse key: {0}")]
  KeyParseError(String),

  /// Key decoded fine but its algorithm is not usable for the operation
  #[error("Unsupported key algorithm: {0}")]
  UnsupportedKeyAlgorithm(String),

  /// Signing primitive failed
  #[error("Failed to sign: {0}")]
  SignFailure(String),

  /* ----- Public key cache ----- */
  /// Key fetch collaborator failed
  #[error("Failed to fetch public keys: {0}")]
  FetchError(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// No public key with the given id, even after a refresh
  #[error("Public key not found: {0}")]
  KeyNotFound(String),

  /* ----- Compact token ----- */
  #[error("Invalid token format: {0}")]
  InvalidTokenFormat(String),

  #[error("Failed to decode signature: {0}")]
  SignatureDecodeError(String),

  #[error("Signature verification failed: {0}")]
  SignatureVerificationFailed(String),

  /// Signature was valid but the payload is not base64url encoded JSON
  #[error("Failed to decode payload: {0}")]
  PayloadDecodeError(String),
}
