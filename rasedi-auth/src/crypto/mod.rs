mod asymmetric;

use crate::error::AuthResult;

pub use asymmetric::{EcdsaPublicKey, EcdsaSecretKey, PublicKey, SecretKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Algorithm names
pub enum AlgorithmName {
  RsaV1_5Sha256,
  EcdsaP256,
  EcdsaP384,
  EcdsaP521,
  Ed25519,
}

impl AlgorithmName {
  pub fn as_str(&self) -> &'static str {
    match self {
      AlgorithmName::RsaV1_5Sha256 => "rsa-v1_5-sha256",
      AlgorithmName::EcdsaP256 => "ecdsa-p256",
      AlgorithmName::EcdsaP384 => "ecdsa-p384",
      AlgorithmName::EcdsaP521 => "ecdsa-p521",
      AlgorithmName::Ed25519 => "ed25519",
    }
  }
}

impl std::fmt::Display for AlgorithmName {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// SigningKey trait
pub trait SigningKey {
  fn sign(&self, data: &[u8]) -> AuthResult<Vec<u8>>;
  fn alg(&self) -> AlgorithmName;
}

/// VerifyingKey trait
pub trait VerifyingKey {
  fn verify(&self, data: &[u8], signature: &[u8]) -> AuthResult<()>;
  fn alg(&self) -> AlgorithmName;
}
