use chain::{Transaction, TransactionOutput};
use bitcrypto::SHA256D;
use std::collections::HashMap;

/// Unspent outputs of a single transaction. A `None` slot marks an output
/// that is spent or was never fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct UtxoEntry {
	/// Height of the block the transaction was confirmed in. Outputs added
	/// during block assembly carry the height of the block being built.
	pub height: u32,
	pub is_coinbase: bool,
	outputs: Vec<Option<TransactionOutput>>,
}

impl UtxoEntry {
	pub fn new(outputs: Vec<Option<TransactionOutput>>, height: u32, is_coinbase: bool) -> Self {
		UtxoEntry {
			height,
			is_coinbase,
			outputs,
		}
	}

	pub fn from_transaction(transaction: &Transaction, height: u32) -> Self {
		UtxoEntry {
			height,
			is_coinbase: transaction.is_coinbase(),
			outputs: transaction.outputs.iter().cloned().map(Some).collect(),
		}
	}

	pub fn output(&self, index: u32) -> Option<&TransactionOutput> {
		self.outputs.get(index as usize).and_then(Option::as_ref)
	}

	pub fn is_output_spent(&self, index: u32) -> bool {
		self.output(index).is_none()
	}

	pub fn spend_output(&mut self, index: u32) {
		if let Some(output) = self.outputs.get_mut(index as usize) {
			*output = None;
		}
	}

	pub fn is_fully_spent(&self) -> bool {
		self.outputs.iter().all(Option::is_none)
	}
}

/// Set of utxo entries relevant to the transactions being processed: the
/// confirmed outputs they reference plus outputs created while a block is
/// assembled.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UtxoViewpoint {
	entries: HashMap<SHA256D, UtxoEntry>,
}

impl UtxoViewpoint {
	pub fn new() -> Self {
		UtxoViewpoint::default()
	}

	pub fn lookup_entry(&self, hash: &SHA256D) -> Option<&UtxoEntry> {
		self.entries.get(hash)
	}

	pub fn add_entry(&mut self, hash: SHA256D, entry: UtxoEntry) {
		self.entries.insert(hash, entry);
	}

	/// Makes the outputs of the passed transaction available for lookup,
	/// replacing any previous entry with the same hash.
	pub fn add_transaction_outputs(&mut self, hash: SHA256D, transaction: &Transaction, height: u32) {
		self.entries.insert(hash, UtxoEntry::from_transaction(transaction, height));
	}

	/// Marks every output referenced by the passed transaction's inputs as
	/// spent. Unknown references are ignored.
	pub fn spend_transaction_inputs(&mut self, transaction: &Transaction) {
		for input in &transaction.inputs {
			if let Some(entry) = self.entries.get_mut(&input.previous_output.hash) {
				entry.spend_output(input.previous_output.index);
			}
		}
	}

	/// Adds all of the entries of `other` to this view. An existing entry
	/// wins over the incoming one unless it is absent or fully spent.
	pub fn merge(&mut self, other: UtxoViewpoint) {
		for (hash, entry) in other.entries {
			match self.entries.get(&hash) {
				Some(existing) if !existing.is_fully_spent() => (),
				_ => {
					self.entries.insert(hash, entry);
				}
			}
		}
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
