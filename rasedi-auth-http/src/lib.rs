//! # rasedi-auth-http
//!
//! `rasedi-auth-http` connects [`rasedi_auth`] to the `http` crate's request type.
//! It sets and checks the `x-signature` / `x-id` request headers, builds signed API requests from an
//! [`ApiConfig`], and turns the raw public key listing returned by any transport into a
//! [`KeyFetcher`](rasedi_auth::KeyFetcher) for the token verifier.
//!
//! Sending requests is left to the caller's http client.

mod config;
mod error;
mod public_keys;
mod request;

#[cfg(test)]
mod test_keys;

/// Header carrying the base64 request signature
pub const SIGNATURE_HEADER: &str = "x-signature";
/// Header carrying the key id of the signer
pub const SIGNATURE_KEY_ID_HEADER: &str = "x-id";

pub use config::{ApiConfig, Environment, DEFAULT_BASE_URL, DEFAULT_UPSTREAM_VERSION};
pub use error::{HttpAuthError, HttpAuthResult};
pub use public_keys::{parse_public_keys, BodyKeyFetcher};
pub use rasedi_auth::prelude;
pub use request::{build_signed_request, RequestSignature};

/* ----------------------------------------------------------------- */
