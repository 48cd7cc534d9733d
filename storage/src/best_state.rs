use bitcrypto::SHA256D;
use std::fmt;

/// Immutable snapshot of the best chain tip, captured once per template
/// generation.
#[derive(Clone, PartialEq, Default)]
pub struct BestState {
	/// Hash of the best block
	pub hash: SHA256D,
	/// Height of the best block (genesis block has zero height)
	pub height: u32,
	/// Median timestamp of the last several blocks, in seconds since the
	/// unix epoch. Every new block must carry a strictly greater timestamp.
	pub median_time: u32,
}

impl fmt::Debug for BestState {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("BestState")
			.field("hash", &self.hash)
			.field("height", &self.height)
			.field("median_time", &self.median_time)
			.finish()
	}
}
