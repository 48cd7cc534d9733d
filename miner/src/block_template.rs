use chain::Block;

/// A block that has yet to be solved, along with per-transaction details
/// about the fees and the number of signature operations it settles.
pub struct BlockTemplate {
	/// Block that is ready to be solved by miners. It is completely valid
	/// with the exception of satisfying the proof-of-work requirement.
	pub block: Block,
	/// Fee each transaction in the template pays in base units. The first
	/// transaction is the coinbase, so entry zero carries the negative of
	/// the sum of all other entries.
	pub fees: Vec<i64>,
	/// Number of signature operations each transaction in the template
	/// performs.
	pub sigop_counts: Vec<usize>,
	/// Height at which the template connects to the main chain.
	pub height: u32,
	/// Whether the coinbase pays to an address or is redeemable by anyone.
	/// Useful for callers which replace the coinbase with their own, such
	/// as external mining software.
	pub valid_pay_address: bool,
}
