/// Priority below which a transaction no longer qualifies for the
/// high-priority block area: one coin, one day old, in a 250 byte
/// transaction.
pub const MIN_HIGH_PRIORITY: f64 = 100_000_000f64 * 144.0 / 250.0;

/// Block generation policy. Everything here is miner preference, not
/// consensus; consensus limits live in the network parameters.
#[derive(Debug, Clone)]
pub struct Policy {
	/// Maximum size of a generated block, in bytes.
	pub block_max_size: u32,
	/// Fill the block with free transactions up to this size.
	pub block_min_size: u32,
	/// Size of the block area reserved for high-priority transactions.
	/// Zero disables the priority pass entirely.
	pub block_priority_size: u32,
	/// Fee rate in base units per kilobyte under which a transaction is
	/// considered free.
	pub tx_min_free_fee: u64,
}

impl Default for Policy {
	fn default() -> Self {
		Policy {
			block_max_size: 750_000,
			block_min_size: 0,
			block_priority_size: 50_000,
			tx_min_free_fee: 10_000,
		}
	}
}
