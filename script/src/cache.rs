use bitcrypto::SHA256D;
use parking_lot::RwLock;
use primitives::bytes::Bytes;
use std::collections::{HashMap, HashSet};

/// Default capacity of the signature cache.
const DEFAULT_MAX_SIG_CACHE_ENTRIES: usize = 50_000;

/// Cache of already validated `(sighash, public key, signature)` triples.
/// Entries are only ever inserted after a successful verification, so a hit
/// proves the signature without touching secp256k1 again. Safe for
/// concurrent readers and writers.
pub struct SigCache {
	max_entries: usize,
	validated: RwLock<HashSet<(SHA256D, Bytes, Bytes)>>,
}

impl Default for SigCache {
	fn default() -> Self {
		SigCache::new(DEFAULT_MAX_SIG_CACHE_ENTRIES)
	}
}

impl SigCache {
	pub fn new(max_entries: usize) -> Self {
		SigCache {
			max_entries,
			validated: RwLock::new(HashSet::new()),
		}
	}

	pub fn contains(&self, sighash: &SHA256D, pubkey: &[u8], signature: &[u8]) -> bool {
		let validated = self.validated.read();
		validated.contains(&(*sighash, pubkey.into(), signature.into()))
	}

	pub fn insert(&self, sighash: SHA256D, pubkey: &[u8], signature: &[u8]) {
		let mut validated = self.validated.write();
		if validated.len() >= self.max_entries {
			// evict an arbitrary entry to stay within capacity
			if let Some(entry) = validated.iter().next().cloned() {
				validated.remove(&entry);
			}
		}
		validated.insert((sighash, pubkey.into(), signature.into()));
	}

	pub fn len(&self) -> usize {
		self.validated.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.validated.read().is_empty()
	}
}

/// Cache of computed signature hashes keyed by `(txid, input index)`. The
/// subscript of an input is fixed by the output it spends, so the digest
/// for a given key never changes. Safe for concurrent readers and writers.
#[derive(Default)]
pub struct HashCache {
	sighashes: RwLock<HashMap<(SHA256D, usize), SHA256D>>,
}

impl HashCache {
	pub fn new() -> Self {
		HashCache::default()
	}

	pub fn get(&self, transaction_hash: &SHA256D, input_index: usize) -> Option<SHA256D> {
		self.sighashes.read().get(&(*transaction_hash, input_index)).cloned()
	}

	pub fn insert(&self, transaction_hash: SHA256D, input_index: usize, sighash: SHA256D) {
		self.sighashes.write().insert((transaction_hash, input_index), sighash);
	}
}
