use super::AlgorithmName;
use crate::{
  error::{AuthError, AuthResult},
  trace::*,
};
use ecdsa::{
  elliptic_curve::{PublicKey as EcPublicKey, SecretKey as EcSecretKey},
  signature::hazmat::{PrehashSigner, PrehashVerifier, RandomizedPrehashSigner},
};
use ed25519_compact::{PublicKey as Ed25519PublicKey, SecretKey as Ed25519SecretKey};
use p256::NistP256;
use p384::NistP384;
use p521::NistP521;
use pkcs8::{der::Decode, Document, PrivateKeyInfo};
use rand::rngs::OsRng;
use rsa::{
  pkcs1::DecodeRsaPrivateKey,
  pkcs1v15,
  pkcs8::DecodePublicKey,
  signature::{RandomizedSigner, SignatureEncoding, Verifier},
  RsaPrivateKey, RsaPublicKey,
};
use sha2::{Digest, Sha256};
use spki::SubjectPublicKeyInfoRef;

#[allow(non_upper_case_globals, dead_code)]
/// Algorithm OIDs
mod algorithm_oids {
  /// OID for `rsaEncryption`
  pub const RSA: &str = "1.2.840.113549.1.1.1";
  /// OID for `id-ecPublicKey`, if you're curious
  pub const EC: &str = "1.2.840.10045.2.1";
  /// OID for `id-Ed25519`, if you're curious
  pub const Ed25519: &str = "1.3.101.112";
}
#[allow(non_upper_case_globals, dead_code)]
/// Params OIDs
mod params_oids {
  // OID for the NIST P-256 elliptic curve.
  pub const Secp256r1: &str = "1.2.840.10045.3.1.7";
  // OID for the NIST P-384 elliptic curve.
  pub const Secp384r1: &str = "1.3.132.0.34";
  // OID for the NIST P-521 elliptic curve.
  pub const Secp521r1: &str = "1.3.132.0.35";
}

/// A single private key container decoder. Errors are plain strings so that the last one can be reported.
type PrivateKeyParser = fn(&[u8]) -> Result<SecretKey, String>;

/// Private key containers in the order they are tried. The first one that decodes wins.
const PRIVATE_KEY_PARSERS: [(&str, PrivateKeyParser); 3] = [
  ("PKCS#8", SecretKey::from_pkcs8_der),
  ("PKCS#1", SecretKey::from_pkcs1_der),
  ("SEC1", SecretKey::from_sec1_der),
];

/* -------------------------------- */
/// ECDSA secret key, tagged by curve
pub enum EcdsaSecretKey {
  /// NIST P-256
  P256(EcSecretKey<NistP256>),
  /// NIST P-384
  P384(EcSecretKey<NistP384>),
  /// NIST P-521
  P521(EcSecretKey<NistP521>),
}

impl EcdsaSecretKey {
  /// Build from raw scalar bytes given the curve OID taken from the key container
  fn from_curve_oid(curve: &str, sk_bytes: &[u8]) -> Result<Self, String> {
    match curve {
      params_oids::Secp256r1 => {
        debug!("Read ECDSA P-256 private key");
        let sk = p256::SecretKey::from_slice(sk_bytes).map_err(|e| e.to_string())?;
        Ok(Self::P256(sk))
      }
      params_oids::Secp384r1 => {
        debug!("Read ECDSA P-384 private key");
        let sk = p384::SecretKey::from_slice(sk_bytes).map_err(|e| e.to_string())?;
        Ok(Self::P384(sk))
      }
      params_oids::Secp521r1 => {
        debug!("Read ECDSA P-521 private key");
        let sk = p521::SecretKey::from_slice(sk_bytes).map_err(|e| e.to_string())?;
        Ok(Self::P521(sk))
      }
      _ => Err(format!("Unsupported curve: {curve}")),
    }
  }

  /// SHA-256 the data and sign it with a fresh random nonce, ASN.1/DER encoded
  fn sign_der(&self, data: &[u8]) -> AuthResult<Vec<u8>> {
    let digest = Sha256::digest(data);
    match self {
      Self::P256(sk) => {
        let sk = ecdsa::SigningKey::from(sk);
        let sig: ecdsa::Signature<NistP256> = sk
          .sign_prehash_with_rng(&mut OsRng, &digest)
          .map_err(|e| AuthError::SignFailure(format!("ecdsa sign failed: {e}")))?;
        Ok(sig.to_der().as_bytes().to_vec())
      }
      Self::P384(sk) => {
        let sk = ecdsa::SigningKey::from(sk);
        let sig: ecdsa::Signature<NistP384> = sk
          .sign_prehash_with_rng(&mut OsRng, &digest)
          .map_err(|e| AuthError::SignFailure(format!("ecdsa sign failed: {e}")))?;
        Ok(sig.to_der().as_bytes().to_vec())
      }
      // p521 signs through its own key wrapper, with RFC 6979 nonces
      Self::P521(sk) => {
        let sk = p521::ecdsa::SigningKey::from_bytes(&sk.to_bytes())
          .map_err(|e| AuthError::SignFailure(format!("ecdsa sign failed: {e}")))?;
        let sig: p521::ecdsa::Signature = sk
          .sign_prehash(&p521_prehash(&digest))
          .map_err(|e| AuthError::SignFailure(format!("ecdsa sign failed: {e}")))?;
        Ok(sig.to_der().as_bytes().to_vec())
      }
    }
  }

  pub fn public_key(&self) -> EcdsaPublicKey {
    match self {
      Self::P256(sk) => EcdsaPublicKey::P256(sk.public_key()),
      Self::P384(sk) => EcdsaPublicKey::P384(sk.public_key()),
      Self::P521(sk) => EcdsaPublicKey::P521(sk.public_key()),
    }
  }

  pub fn alg(&self) -> AlgorithmName {
    self.public_key().alg()
  }
}

/* -------------------------------- */
/// Private key used to sign outgoing requests.
/// The variant is fixed when the key is parsed, callers never re-parse to find out what they hold.
pub enum SecretKey {
  /// rsa-v1_5-sha256
  Rsa(RsaPrivateKey),
  /// ecdsa with sha-256, DER encoded signature
  Ecdsa(EcdsaSecretKey),
  /// ed25519
  Ed25519(Ed25519SecretKey),
}

impl SecretKey {
  /// Derive secret key from pem string.
  /// The block label is not checked, the contents decide the container format.
  pub fn from_pem(pem: &str) -> AuthResult<Self> {
    let (label, doc) =
      Document::from_pem(pem).map_err(|e| AuthError::KeyParseError(format!("Failed to parse PEM block: {e}")))?;
    debug!("Read PEM block labeled `{label}`");
    Self::from_der(doc.as_bytes())
  }

  /// Derive secret key from der bytes, trying PKCS#8, PKCS#1 and SEC1 in this order
  pub fn from_der(der: &[u8]) -> AuthResult<Self> {
    use super::SigningKey;
    let mut last_error = String::new();
    for (container, parse) in PRIVATE_KEY_PARSERS {
      match parse(der) {
        Ok(sk) => {
          debug!("Decoded {container} private key ({})", sk.alg());
          return Ok(sk);
        }
        Err(e) => {
          debug!("Not a {container} private key: {e}");
          last_error = e;
        }
      }
    }
    Err(AuthError::KeyParseError(last_error))
  }

  fn from_pkcs8_der(der: &[u8]) -> Result<Self, String> {
    let pki = PrivateKeyInfo::from_der(der).map_err(|e| e.to_string())?;

    match pki.algorithm.oid.to_string().as_ref() {
      // rsa
      algorithm_oids::RSA => {
        debug!("Read RSA private key");
        let sk = RsaPrivateKey::from_pkcs1_der(pki.private_key).map_err(|e| e.to_string())?;
        Ok(Self::Rsa(sk))
      }
      // ec
      algorithm_oids::EC => {
        let param = pki.algorithm.parameters_oid().map_err(|e| e.to_string())?;
        let sk_bytes = sec1::EcPrivateKey::try_from(pki.private_key)
          .map_err(|e| format!("Error decoding EcPrivateKey: {e}"))?
          .private_key;
        EcdsaSecretKey::from_curve_oid(param.to_string().as_ref(), sk_bytes).map(Self::Ecdsa)
      }
      // ed25519
      algorithm_oids::Ed25519 => {
        debug!("Read Ed25519 private key");
        // CurvePrivateKey ::= OCTET STRING, holding the 32 byte seed
        let seed = match pki.private_key {
          [0x04, 0x20, seed @ ..] if seed.len() == 32 => seed,
          _ => return Err("Invalid Ed25519 private key encoding".to_string()),
        };
        let seed = ed25519_compact::Seed::from_slice(seed).map_err(|e| e.to_string())?;
        let sk = ed25519_compact::KeyPair::from_seed(seed).sk;
        Ok(Self::Ed25519(sk))
      }
      oid => Err(format!("Unsupported PKCS#8 key algorithm: {oid}")),
    }
  }

  fn from_pkcs1_der(der: &[u8]) -> Result<Self, String> {
    let sk = RsaPrivateKey::from_pkcs1_der(der).map_err(|e| e.to_string())?;
    Ok(Self::Rsa(sk))
  }

  fn from_sec1_der(der: &[u8]) -> Result<Self, String> {
    let ec = sec1::EcPrivateKey::from_der(der).map_err(|e| e.to_string())?;
    let curve = ec
      .parameters
      .and_then(|params| params.named_curve())
      .ok_or_else(|| "SEC1 private key has no named curve".to_string())?;
    EcdsaSecretKey::from_curve_oid(curve.to_string().as_ref(), ec.private_key).map(Self::Ecdsa)
  }

  /// Get public key from secret key
  pub fn public_key(&self) -> PublicKey {
    match &self {
      Self::Rsa(key) => PublicKey::Rsa(key.to_public_key()),
      Self::Ecdsa(key) => PublicKey::Ecdsa(key.public_key()),
      Self::Ed25519(key) => PublicKey::Ed25519(key.public_key()),
    }
  }
}

impl super::SigningKey for SecretKey {
  /// Sign data
  fn sign(&self, data: &[u8]) -> AuthResult<Vec<u8>> {
    match &self {
      Self::Rsa(sk) => {
        let sk = pkcs1v15::SigningKey::<Sha256>::new(sk.clone());
        let sig = sk
          .try_sign_with_rng(&mut OsRng, data)
          .map_err(|e| AuthError::SignFailure(format!("rsa sign failed: {e}")))?;
        Ok(sig.to_vec())
      }
      Self::Ecdsa(sk) => sk.sign_der(data),
      // no pre-hash, ed25519 hashes internally
      Self::Ed25519(sk) => {
        let sig = sk.sign(data, None);
        Ok(sig.as_ref().to_vec())
      }
    }
  }

  fn alg(&self) -> AlgorithmName {
    match &self {
      Self::Rsa(_) => AlgorithmName::RsaV1_5Sha256,
      Self::Ecdsa(sk) => sk.alg(),
      Self::Ed25519(_) => AlgorithmName::Ed25519,
    }
  }
}

/* -------------------------------- */
/// ECDSA public key, tagged by curve
pub enum EcdsaPublicKey {
  /// NIST P-256
  P256(EcPublicKey<NistP256>),
  /// NIST P-384
  P384(EcPublicKey<NistP384>),
  /// NIST P-521
  P521(EcPublicKey<NistP521>),
}

impl EcdsaPublicKey {
  fn from_curve_oid(curve: &str, sec1_point: &[u8]) -> AuthResult<Self> {
    match curve {
      params_oids::Secp256r1 => {
        let pk = EcPublicKey::<NistP256>::from_sec1_bytes(sec1_point).map_err(|e| AuthError::KeyParseError(e.to_string()))?;
        Ok(Self::P256(pk))
      }
      params_oids::Secp384r1 => {
        let pk = EcPublicKey::<NistP384>::from_sec1_bytes(sec1_point).map_err(|e| AuthError::KeyParseError(e.to_string()))?;
        Ok(Self::P384(pk))
      }
      params_oids::Secp521r1 => {
        let pk = EcPublicKey::<NistP521>::from_sec1_bytes(sec1_point).map_err(|e| AuthError::KeyParseError(e.to_string()))?;
        Ok(Self::P521(pk))
      }
      _ => Err(AuthError::UnsupportedKeyAlgorithm(format!("ecdsa on curve {curve}"))),
    }
  }

  /// Bit size of the curve order
  pub fn curve_bits(&self) -> usize {
    match self {
      Self::P256(_) => 256,
      Self::P384(_) => 384,
      Self::P521(_) => 521,
    }
  }

  pub fn alg(&self) -> AlgorithmName {
    match self {
      Self::P256(_) => AlgorithmName::EcdsaP256,
      Self::P384(_) => AlgorithmName::EcdsaP384,
      Self::P521(_) => AlgorithmName::EcdsaP521,
    }
  }

  /// Verify a signature given as big-endian `r` and `s` over an already computed hash.
  /// A hash longer than the curve order is truncated to its leftmost bits, a shorter one is taken as is.
  pub fn verify_prehash_scalars(&self, r: &[u8], s: &[u8], prehash: &[u8]) -> AuthResult<()> {
    let rs = [r, s].concat();
    let failed = |e: ecdsa::Error| AuthError::SignatureVerificationFailed(e.to_string());
    match self {
      Self::P256(pk) => {
        let signature = ecdsa::Signature::<NistP256>::from_slice(&rs).map_err(failed)?;
        ecdsa::VerifyingKey::from(pk).verify_prehash(prehash, &signature).map_err(failed)
      }
      Self::P384(pk) => {
        let signature = ecdsa::Signature::<NistP384>::from_slice(&rs).map_err(failed)?;
        ecdsa::VerifyingKey::from(pk).verify_prehash(prehash, &signature).map_err(failed)
      }
      Self::P521(pk) => {
        let signature = ecdsa::Signature::<NistP521>::from_slice(&rs).map_err(failed)?;
        ecdsa::VerifyingKey::from(pk).verify_prehash(prehash, &signature).map_err(failed)
      }
    }
  }

  /// Verify an ASN.1/DER signature over the SHA-256 hash of data
  fn verify_der(&self, data: &[u8], signature: &[u8]) -> AuthResult<()> {
    let digest = Sha256::digest(data);
    match self {
      Self::P256(pk) => {
        let signature = ecdsa::Signature::<NistP256>::from_der(signature)
          .map_err(|e| AuthError::SignatureDecodeError(e.to_string()))?;
        let vk = ecdsa::VerifyingKey::from(pk);
        vk.verify_prehash(&digest, &signature)
          .map_err(|e| AuthError::SignatureVerificationFailed(e.to_string()))
      }
      Self::P384(pk) => {
        let signature = ecdsa::Signature::<NistP384>::from_der(signature)
          .map_err(|e| AuthError::SignatureDecodeError(e.to_string()))?;
        let vk = ecdsa::VerifyingKey::from(pk);
        vk.verify_prehash(&digest, &signature)
          .map_err(|e| AuthError::SignatureVerificationFailed(e.to_string()))
      }
      Self::P521(pk) => {
        let signature = ecdsa::Signature::<NistP521>::from_der(signature)
          .map_err(|e| AuthError::SignatureDecodeError(e.to_string()))?;
        let vk = ecdsa::VerifyingKey::from(pk);
        vk.verify_prehash(&p521_prehash(&digest), &signature)
          .map_err(|e| AuthError::SignatureVerificationFailed(e.to_string()))
      }
    }
  }
}

/// Left-pad a SHA-256 digest to the P-521 field size.
/// The integer value is unchanged, and the prehash is no longer shorter than the minimum the signer accepts.
fn p521_prehash(digest: &[u8]) -> p521::FieldBytes {
  let mut prehash = p521::FieldBytes::default();
  let len = prehash.len();
  let offset = len.saturating_sub(digest.len());
  prehash[offset..].copy_from_slice(&digest[..len - offset]);
  prehash
}

/* -------------------------------- */
/// Public key parsed from a SubjectPublicKeyInfo
pub enum PublicKey {
  /// rsa-v1_5-sha256
  Rsa(RsaPublicKey),
  /// ecdsa
  Ecdsa(EcdsaPublicKey),
  /// ed25519
  Ed25519(Ed25519PublicKey),
}

impl PublicKey {
  /// Convert from pem string
  pub fn from_pem(pem: &str) -> AuthResult<Self> {
    let (_label, doc) = Document::from_pem(pem).map_err(|e| AuthError::KeyParseError(e.to_string()))?;
    Self::from_der(doc.as_bytes())
  }

  /// Convert from SubjectPublicKeyInfo der bytes
  pub fn from_der(der: &[u8]) -> AuthResult<Self> {
    let spki_ref = SubjectPublicKeyInfoRef::from_der(der)
      .map_err(|e| AuthError::KeyParseError(format!("Error decoding SubjectPublicKeyInfo: {e}")))?;
    match spki_ref.algorithm.oid.to_string().as_ref() {
      // rsa
      algorithm_oids::RSA => {
        let pk = RsaPublicKey::from_public_key_der(der).map_err(|e| AuthError::KeyParseError(e.to_string()))?;
        Ok(Self::Rsa(pk))
      }
      // ec
      algorithm_oids::EC => {
        let param = spki_ref
          .algorithm
          .parameters_oid()
          .map_err(|e| AuthError::KeyParseError(e.to_string()))?;
        let public_key = spki_ref
          .subject_public_key
          .as_bytes()
          .ok_or(AuthError::KeyParseError("Invalid public key".to_string()))?;
        EcdsaPublicKey::from_curve_oid(param.to_string().as_ref(), public_key).map(Self::Ecdsa)
      }
      // ed25519
      algorithm_oids::Ed25519 => {
        let public_key = spki_ref
          .subject_public_key
          .as_bytes()
          .ok_or(AuthError::KeyParseError("Invalid public key".to_string()))?;
        let pk = Ed25519PublicKey::from_slice(public_key).map_err(|e| AuthError::KeyParseError(e.to_string()))?;
        Ok(Self::Ed25519(pk))
      }
      oid => Err(AuthError::UnsupportedKeyAlgorithm(format!("public key algorithm {oid}"))),
    }
  }
}

impl super::VerifyingKey for PublicKey {
  /// Verify a signature produced by [`SecretKey`]'s signing
  fn verify(&self, data: &[u8], signature: &[u8]) -> AuthResult<()> {
    match self {
      Self::Rsa(pk) => {
        let signature =
          pkcs1v15::Signature::try_from(signature).map_err(|e| AuthError::SignatureDecodeError(e.to_string()))?;
        let vk = pkcs1v15::VerifyingKey::<Sha256>::new(pk.clone());
        vk.verify(data, &signature)
          .map_err(|e| AuthError::SignatureVerificationFailed(e.to_string()))
      }
      Self::Ecdsa(pk) => pk.verify_der(data, signature),
      Self::Ed25519(pk) => {
        let sig =
          ed25519_compact::Signature::from_slice(signature).map_err(|e| AuthError::SignatureDecodeError(e.to_string()))?;
        pk.verify(data, &sig)
          .map_err(|e| AuthError::SignatureVerificationFailed(e.to_string()))
      }
    }
  }

  /// Get the algorithm name
  fn alg(&self) -> AlgorithmName {
    match self {
      Self::Rsa(_) => AlgorithmName::RsaV1_5Sha256,
      Self::Ecdsa(pk) => pk.alg(),
      Self::Ed25519(_) => AlgorithmName::Ed25519,
    }
  }
}
