use bitcrypto::SHA256D;
use chain::IndexedTransaction;

/// A pending transaction as handed out by the source pool, along with the
/// metadata block assembly arbitrates on.
#[derive(Debug, Clone)]
pub struct TransactionDesc {
	pub transaction: IndexedTransaction,
	/// Fee the transaction pays, in base units.
	pub fee: u64,
	/// Priority when the transaction entered the pool. Kept for pool
	/// introspection; assembly recomputes priority at the template height.
	pub starting_priority: f64,
}

/// Source of the transactions considered for inclusion in a block. A
/// stable iteration order makes generated templates reproducible.
pub trait TransactionSource {
	/// Snapshot of the pending transactions eligible for mining.
	fn mining_descs(&self) -> Vec<TransactionDesc>;

	/// Whether the pool currently holds the passed transaction.
	fn have_transaction(&self, hash: &SHA256D) -> bool;
}
