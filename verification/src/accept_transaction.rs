use crate::error::TransactionError;
use chain::IndexedTransaction;
use network::ConsensusParams;
use script::{Script, ThreadId};
use storage::UtxoViewpoint;

/// Checks that every input of the passed transaction spends a known,
/// unspent, mature output and that values stay within the monetary range.
/// Returns the transaction fee.
pub fn check_transaction_inputs(
	transaction: &IndexedTransaction,
	height: u32,
	view: &UtxoViewpoint,
	params: &ConsensusParams,
) -> Result<u64, TransactionError> {
	let acceptor = TransactionAcceptor::new(transaction, height, view, params);
	acceptor.check()
}

struct TransactionAcceptor<'a> {
	missing_inputs: TransactionMissingInputs<'a>,
	maturity: TransactionMaturity<'a>,
	overspent: TransactionOverspent<'a>,
}

impl<'a> TransactionAcceptor<'a> {
	fn new(transaction: &'a IndexedTransaction, height: u32, view: &'a UtxoViewpoint, params: &'a ConsensusParams) -> Self {
		trace!(target: "verification", "Tx input verification {}", transaction.hash);
		TransactionAcceptor {
			missing_inputs: TransactionMissingInputs::new(transaction, view),
			maturity: TransactionMaturity::new(transaction, view, height, params),
			overspent: TransactionOverspent::new(transaction, view, params),
		}
	}

	fn check(&self) -> Result<u64, TransactionError> {
		self.missing_inputs.check()?;
		self.maturity.check()?;
		self.overspent.check()
	}
}

/// Every referenced output must be present and unspent in the working
/// view. Outputs spent by transactions accepted earlier in the block are
/// already marked in the view, so this doubles as the double-spend check.
struct TransactionMissingInputs<'a> {
	transaction: &'a IndexedTransaction,
	view: &'a UtxoViewpoint,
}

impl<'a> TransactionMissingInputs<'a> {
	fn new(transaction: &'a IndexedTransaction, view: &'a UtxoViewpoint) -> Self {
		TransactionMissingInputs { transaction, view }
	}

	fn check(&self) -> Result<(), TransactionError> {
		let missing_index = self.transaction.raw.inputs.iter().position(|input| {
			self.view
				.lookup_entry(&input.previous_output.hash)
				.map(|entry| entry.is_output_spent(input.previous_output.index))
				.unwrap_or(true)
		});

		match missing_index {
			Some(index) => Err(TransactionError::Input(index)),
			None => Ok(()),
		}
	}
}

struct TransactionMaturity<'a> {
	transaction: &'a IndexedTransaction,
	view: &'a UtxoViewpoint,
	height: u32,
	maturity: u32,
}

impl<'a> TransactionMaturity<'a> {
	fn new(transaction: &'a IndexedTransaction, view: &'a UtxoViewpoint, height: u32, params: &ConsensusParams) -> Self {
		TransactionMaturity {
			transaction,
			view,
			height,
			maturity: params.coinbase_maturity,
		}
	}

	fn check(&self) -> Result<(), TransactionError> {
		let immature_spend = self
			.transaction
			.raw
			.inputs
			.iter()
			.any(|input| match self.view.lookup_entry(&input.previous_output.hash) {
				Some(entry) if entry.is_coinbase && self.height < entry.height + self.maturity => true,
				_ => false,
			});

		if immature_spend {
			Err(TransactionError::Maturity)
		} else {
			Ok(())
		}
	}
}

struct TransactionOverspent<'a> {
	transaction: &'a IndexedTransaction,
	view: &'a UtxoViewpoint,
	params: &'a ConsensusParams,
}

impl<'a> TransactionOverspent<'a> {
	fn new(transaction: &'a IndexedTransaction, view: &'a UtxoViewpoint, params: &'a ConsensusParams) -> Self {
		TransactionOverspent { transaction, view, params }
	}

	fn check(&self) -> Result<u64, TransactionError> {
		let mut available = 0u64;
		for input in &self.transaction.raw.inputs {
			let value = self
				.view
				.lookup_entry(&input.previous_output.hash)
				.and_then(|entry| entry.output(input.previous_output.index))
				.map(|output| output.value)
				.unwrap_or(0);

			if !self.params.is_valid_money(value) {
				return Err(TransactionError::ValueOutOfRange);
			}
			available = available.checked_add(value).ok_or(TransactionError::ValueOutOfRange)?;
			if !self.params.is_valid_money(available) {
				return Err(TransactionError::ValueOutOfRange);
			}
		}

		let mut spends = 0u64;
		for output in &self.transaction.raw.outputs {
			if !self.params.is_valid_money(output.value) {
				return Err(TransactionError::ValueOutOfRange);
			}
			spends = spends.checked_add(output.value).ok_or(TransactionError::ValueOutOfRange)?;
			if !self.params.is_valid_money(spends) {
				return Err(TransactionError::ValueOutOfRange);
			}
		}

		if spends > available {
			// the issue thread mints outputs out of thin air; everything
			// else must be funded by its inputs
			if is_issuance(self.transaction) {
				return Ok(0);
			}
			return Err(TransactionError::Overspend);
		}

		Ok(available - spends)
	}
}

/// An issuance continues the issue thread in its first output and is the
/// only transaction kind allowed to create more value than it consumes.
fn is_issuance(transaction: &IndexedTransaction) -> bool {
	transaction
		.raw
		.outputs
		.first()
		.map(|output| Script::new(output.script_pubkey.clone()).admin_thread_id() == Some(ThreadId::Issue))
		.unwrap_or(false)
}
