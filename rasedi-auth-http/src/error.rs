use rasedi_auth::AuthError;
use thiserror::Error;

/// Result type for signing http requests
pub type HttpAuthResult<T> = std::result::Result<T, HttpAuthError>;

/// Error type for signing http requests
#[derive(Error, Debug)]
pub enum HttpAuthError {
  /// Signature or key id header missing on a received request
  #[error("No {0} header found")]
  MissingHeader(&'static str),

  /// Failed to parse header value
  #[error("Failed to stringify header: {0}")]
  FailedToStrHeader(#[from] http::header::ToStrError),

  /// Failed to build header value
  #[error("Failed to parse header value: {0}")]
  InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

  /// Failed to assemble the request
  #[error("Failed to build request: {0}")]
  InvalidRequest(#[from] http::Error),

  /// Json (de)serialization of a body
  #[error("Invalid json body: {0}")]
  InvalidJsonBody(#[from] serde_json::Error),

  /// Transport supplied by the caller failed
  #[error("Transport error: {0}")]
  Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// Inherited from AuthError
  #[error("AuthError: {0}")]
  AuthError(#[from] AuthError),
}
