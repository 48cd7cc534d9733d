use bitcrypto::{dhash256, SHA256D};
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

/// Rows longer than this are hashed on the rayon pool.
const PARALLEL_THRESHOLD: usize = 250;

#[inline]
fn concat(a: &SHA256D, b: &SHA256D) -> [u8; 64] {
	let mut result = [0; 64];
	result[0..32].copy_from_slice(a as &[u8]);
	result[32..64].copy_from_slice(b as &[u8]);
	result
}

/// Calculates the root of the merkle tree of the passed transaction hashes.
/// The last hash of an odd-length row is paired with itself.
pub fn merkle_root(hashes: &[SHA256D]) -> SHA256D {
	if hashes.len() == 1 {
		return hashes[0];
	}

	let mut row = Vec::with_capacity((hashes.len() + 1) / 2);
	let mut i = 0;
	while i + 1 < hashes.len() {
		row.push((&hashes[i], &hashes[i + 1]));
		i += 2
	}

	if hashes.len() % 2 == 1 {
		let last = &hashes[hashes.len() - 1];
		row.push((last, last));
	}

	let next_row = if row.len() > PARALLEL_THRESHOLD {
		row.par_iter().map(|x| merkle_node_hash(&x.0, &x.1)).collect()
	} else {
		row.iter().map(|x| merkle_node_hash(&x.0, &x.1)).collect::<Vec<_>>()
	};

	merkle_root(&next_row)
}

/// Calculate merkle tree node hash
pub fn merkle_node_hash(left: &SHA256D, right: &SHA256D) -> SHA256D {
	dhash256(&concat(left, right))
}
