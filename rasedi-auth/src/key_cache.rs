use crate::{
  error::{AuthError, AuthResult},
  trace::*,
};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::{
  atomic::{AtomicU64, Ordering},
  Arc, PoisonError, RwLock,
};

/// A public key published by the API, PEM encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyRecord {
  pub id: String,
  #[serde(rename = "key")]
  pub pem_key: String,
}

impl PublicKeyRecord {
  pub fn new(id: impl Into<String>, pem_key: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      pem_key: pem_key.into(),
    }
  }
}

/// Immutable set of keys from a single fetch, keyed by id
pub type PublicKeySet = FxHashMap<String, PublicKeyRecord>;

/// Source of the current public key set (http endpoint, file, test double...)
pub trait KeyFetcher {
  type Error: std::error::Error + Send + Sync + 'static;

  fn fetch_public_keys(&self) -> Result<Vec<PublicKeyRecord>, Self::Error>;
}

impl<F, E> KeyFetcher for F
where
  F: Fn() -> Result<Vec<PublicKeyRecord>, E>,
  E: std::error::Error + Send + Sync + 'static,
{
  type Error = E;

  fn fetch_public_keys(&self) -> Result<Vec<PublicKeyRecord>, E> {
    self()
  }
}

/* -------------------------------- */
/// Key set tagged with the fetch that produced it
struct Snapshot {
  fetch_id: u64,
  keys: Arc<PublicKeySet>,
}

/// Most recently fetched public key set.
///
/// Lookups hit the network at most once: on a miss the whole set is refetched and replaced,
/// then looked up again. Readers always see either the old or the new set, never a mix.
pub struct PublicKeyCache<F> {
  fetcher: F,
  keys: RwLock<Snapshot>,
  last_fetch_id: AtomicU64,
}

impl<F> PublicKeyCache<F>
where
  F: KeyFetcher,
{
  /// Empty cache, nothing is fetched until the first lookup
  pub fn new(fetcher: F) -> Self {
    Self {
      fetcher,
      keys: RwLock::new(Snapshot {
        fetch_id: 0,
        keys: Arc::new(PublicKeySet::default()),
      }),
      last_fetch_id: AtomicU64::new(0),
    }
  }

  /// Find the key with the given id, refreshing once if it is not cached
  pub fn resolve(&self, key_id: &str) -> AuthResult<PublicKeyRecord> {
    if let Some(record) = self.snapshot().get(key_id) {
      debug!("Public key `{key_id}` found in cache");
      return Ok(record.clone());
    }

    debug!("Public key `{key_id}` not cached, refreshing");
    self
      .refresh()?
      .get(key_id)
      .cloned()
      .ok_or_else(|| AuthError::KeyNotFound(key_id.to_string()))
  }

  /// Fetch the key set and replace the cached one wholesale.
  /// On failure the cached set is left untouched. When fetches overlap, a result is only
  /// installed if no later-started fetch has been installed already.
  pub fn refresh(&self) -> AuthResult<Arc<PublicKeySet>> {
    let fetch_id = self.last_fetch_id.fetch_add(1, Ordering::SeqCst) + 1;
    let records = self
      .fetcher
      .fetch_public_keys()
      .map_err(|e| AuthError::FetchError(Box::new(e)))?;

    let mut keys = PublicKeySet::default();
    for record in records {
      if let Some(previous) = keys.insert(record.id.clone(), record) {
        warn!("Duplicate public key id `{}` in fetch result, keeping the last one", previous.id);
      }
    }
    let keys = Arc::new(keys);
    debug!("Public key cache refreshed with {} keys", keys.len());

    let mut current = self.keys.write().unwrap_or_else(PoisonError::into_inner);
    if current.fetch_id > fetch_id {
      debug!("Discarding public keys of fetch #{fetch_id}, #{} is newer", current.fetch_id);
      return Ok(current.keys.clone());
    }
    *current = Snapshot {
      fetch_id,
      keys: keys.clone(),
    };
    Ok(keys)
  }

  /// Current key set
  pub fn snapshot(&self) -> Arc<PublicKeySet> {
    self.keys.read().unwrap_or_else(PoisonError::into_inner).keys.clone()
  }

  pub fn len(&self) -> usize {
    self.snapshot().len()
  }

  pub fn is_empty(&self) -> bool {
    self.snapshot().is_empty()
  }
}
