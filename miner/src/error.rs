use derive_more::Display;

/// Template generation failures. Per-transaction problems are never
/// errors; a transaction that fails a gate is skipped and the loop keeps
/// draining.
#[derive(Debug, PartialEq, Display)]
pub enum Error {
	/// Coinbase script construction or address conversion failure
	#[display(fmt = "Failed to build coinbase: {}", _0)]
	Build(String),
	/// Chain snapshot, utxo fetch or difficulty query failure
	#[display(fmt = "Chain error: {}", _0)]
	Chain(storage::Error),
	/// The assembled block failed the final consensus validation. This is
	/// an internal invariant violation: the template must be discarded.
	#[display(fmt = "Assembled block failed validation: {}", _0)]
	Assemble(storage::Error),
	/// Validator key failed to sign the header
	#[display(fmt = "Failed to sign block header: {}", _0)]
	Signing(keys::Error),
}

impl From<keys::Error> for Error {
	fn from(e: keys::Error) -> Self {
		Error::Signing(e)
	}
}
