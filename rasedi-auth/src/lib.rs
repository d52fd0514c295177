//! # rasedi-auth
//!
//! Authentication layer of the Rasedi payment API client.
//!
//! - Outgoing requests are signed with a caller supplied PEM private key (RSA, ECDSA or Ed25519,
//!   in PKCS#8, PKCS#1 or SEC1 containers) over `<method> || <key id> || <relative url>`.
//! - Inbound compact tokens (`header.payload.signature`) are verified against the published public
//!   keys, fetched on demand and cached. Their signatures are raw `R || S` ECDSA over SHA-512.

mod compact_token;
mod crypto;
mod error;
mod key_cache;
mod signer;
mod signing_input;
mod trace;

#[cfg(test)]
mod test_keys;

pub use compact_token::{CompactToken, CompactTokenVerifier, RawEcdsaSignature, VerifyPayload};
pub use error::{AuthError, AuthResult};
pub use key_cache::{KeyFetcher, PublicKeyCache, PublicKeyRecord, PublicKeySet};
pub use signer::RequestSigner;
pub use signing_input::SigningInput;

pub mod prelude {
  pub use crate::{
    compact_token::{CompactToken, CompactTokenVerifier, RawEcdsaSignature, VerifyPayload},
    crypto::{AlgorithmName, EcdsaPublicKey, EcdsaSecretKey, PublicKey, SecretKey, SigningKey, VerifyingKey},
    error::{AuthError, AuthResult},
    key_cache::{KeyFetcher, PublicKeyCache, PublicKeyRecord, PublicKeySet},
    signer::RequestSigner,
    signing_input::SigningInput,
  };
}

/* ----------------------------------------------------------------- */
