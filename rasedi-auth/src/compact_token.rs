use crate::{
  crypto::{EcdsaPublicKey, PublicKey, VerifyingKey},
  error::{AuthError, AuthResult},
  key_cache::{KeyFetcher, PublicKeyCache},
  trace::*,
};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

/// Webhook body carrying a signed token and the id of the key that signed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPayload {
  pub key_id: String,
  pub content: Option<String>,
}

/* -------------------------------- */
/// `header.payload.signature`, each segment base64url encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactToken<'a> {
  header: &'a str,
  payload: &'a str,
  signature: &'a str,
}

impl<'a> TryFrom<&'a str> for CompactToken<'a> {
  type Error = AuthError;

  fn try_from(content: &'a str) -> AuthResult<Self> {
    let mut segments = content.split('.');
    match (segments.next(), segments.next(), segments.next(), segments.next()) {
      (Some(header), Some(payload), Some(signature), None) => Ok(Self {
        header,
        payload,
        signature,
      }),
      _ => Err(AuthError::InvalidTokenFormat(format!(
        "expected 3 segments, found {}",
        content.split('.').count()
      ))),
    }
  }
}

impl<'a> CompactToken<'a> {
  pub fn header(&self) -> &'a str {
    self.header
  }

  pub fn payload(&self) -> &'a str {
    self.payload
  }

  pub fn signature(&self) -> &'a str {
    self.signature
  }

  /// The signed bytes: header and payload segments rejoined, signature excluded
  pub fn signed_input(&self) -> String {
    format!("{}.{}", self.header, self.payload)
  }

  /// Unpadded base64url first, padded base64url as a fallback for lenient senders
  pub fn decode_signature(&self) -> AuthResult<Vec<u8>> {
    general_purpose::URL_SAFE_NO_PAD
      .decode(self.signature)
      .or_else(|_| general_purpose::URL_SAFE.decode(self.signature))
      .map_err(|e| AuthError::SignatureDecodeError(e.to_string()))
  }

  pub fn decode_payload(&self) -> AuthResult<serde_json::Value> {
    let bytes = general_purpose::URL_SAFE_NO_PAD
      .decode(self.payload)
      .map_err(|e| AuthError::PayloadDecodeError(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| AuthError::PayloadDecodeError(e.to_string()))
  }
}

/* -------------------------------- */
/// ECDSA signature as big-endian `R || S`, each half exactly the curve's byte size.
/// Not ASN.1/DER.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEcdsaSignature {
  bytes: Vec<u8>,
  key_size_bytes: usize,
}

impl RawEcdsaSignature {
  /// Wrong lengths are rejected, never truncated or padded
  pub fn try_new(bytes: Vec<u8>, key_size_bytes: usize) -> AuthResult<Self> {
    if bytes.len() != 2 * key_size_bytes {
      return Err(AuthError::SignatureDecodeError(format!(
        "expected {} signature bytes, found {}",
        2 * key_size_bytes,
        bytes.len()
      )));
    }
    Ok(Self { bytes, key_size_bytes })
  }

  pub fn r(&self) -> &[u8] {
    &self.bytes[..self.key_size_bytes]
  }

  pub fn s(&self) -> &[u8] {
    &self.bytes[self.key_size_bytes..]
  }
}

/* -------------------------------- */
/// Verifies compact tokens signed with ECDSA over SHA-512 by one of the published public keys.
/// Only ECDSA public keys are accepted here even though requests can be signed with RSA and Ed25519.
pub struct CompactTokenVerifier<F> {
  key_cache: PublicKeyCache<F>,
}

impl<F> CompactTokenVerifier<F>
where
  F: KeyFetcher,
{
  pub fn new(key_cache: PublicKeyCache<F>) -> Self {
    Self { key_cache }
  }

  pub fn key_cache(&self) -> &PublicKeyCache<F> {
    &self.key_cache
  }

  /// Verify the token and return its decoded JSON payload.
  /// Nothing from the payload is exposed unless the signature checks out.
  pub fn verify(&self, key_id: &str, content: &str) -> AuthResult<serde_json::Value> {
    let token = CompactToken::try_from(content)?;
    let record = self.key_cache.resolve(key_id)?;

    let public_key = match PublicKey::from_pem(&record.pem_key)? {
      PublicKey::Ecdsa(pk) => pk,
      other @ (PublicKey::Rsa(_) | PublicKey::Ed25519(_)) => {
        return Err(AuthError::UnsupportedKeyAlgorithm(format!(
          "{} key `{key_id}` cannot verify compact tokens",
          other.alg()
        )))
      }
    };

    let key_size_bytes = public_key.curve_bits().div_ceil(8);
    let signature = RawEcdsaSignature::try_new(token.decode_signature()?, key_size_bytes)?;

    let prehash = Sha512::digest(token.signed_input().as_bytes());
    verify_raw(&public_key, &signature, &prehash)?;
    debug!("Verified compact token signed by `{key_id}` ({})", public_key.alg());

    token.decode_payload()
  }

  /// Verify a webhook body. A body without content is rejected before any key lookup.
  pub fn verify_payload(&self, payload: &VerifyPayload) -> AuthResult<serde_json::Value> {
    let content = payload
      .content
      .as_deref()
      .ok_or_else(|| AuthError::InvalidTokenFormat("empty content".to_string()))?;
    self.verify(&payload.key_id, content)
  }
}

fn verify_raw(public_key: &EcdsaPublicKey, signature: &RawEcdsaSignature, prehash: &[u8]) -> AuthResult<()> {
  public_key.verify_prehash_scalars(signature.r(), signature.s(), prehash)
}
