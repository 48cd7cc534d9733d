use crate::block_header::{block_header_hash, BlockHeader};
use bitcrypto::SHA256D;
use std::{cmp, fmt};

#[derive(Clone)]
pub struct IndexedBlockHeader {
	pub hash: SHA256D,
	pub raw: BlockHeader,
}

impl fmt::Debug for IndexedBlockHeader {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("IndexedBlockHeader")
			.field("hash", &self.hash)
			.field("raw", &self.raw)
			.finish()
	}
}

impl From<BlockHeader> for IndexedBlockHeader {
	fn from(header: BlockHeader) -> Self {
		Self::from_raw(header)
	}
}

impl IndexedBlockHeader {
	pub fn new(hash: SHA256D, header: BlockHeader) -> Self {
		IndexedBlockHeader { hash, raw: header }
	}

	/// Explicit conversion of the raw BlockHeader into IndexedBlockHeader.
	///
	/// Hashes the contents of block header.
	pub fn from_raw(header: BlockHeader) -> Self {
		IndexedBlockHeader::new(block_header_hash(&header), header)
	}
}

impl cmp::PartialEq for IndexedBlockHeader {
	fn eq(&self, other: &Self) -> bool {
		self.hash == other.hash
	}
}
