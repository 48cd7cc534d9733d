use crate::error::TransactionError;
use chain::IndexedTransaction;
use script::Script;
use storage::UtxoViewpoint;

/// Legacy signature operation count of a transaction: every signature and
/// thread check in its input and output scripts, multisig charged at the
/// maximum key count.
pub fn transaction_sigops(transaction: &IndexedTransaction) -> usize {
	let input_sigops: usize = transaction
		.raw
		.inputs
		.iter()
		.map(|input| Script::new(input.script_sig.clone()).sigops_count(false))
		.sum();
	let output_sigops: usize = transaction
		.raw
		.outputs
		.iter()
		.map(|output| Script::new(output.script_pubkey.clone()).sigops_count(false))
		.sum();

	input_sigops + output_sigops
}

/// Accurate signature operation count of the redeem scripts spending
/// pay-to-script-hash outputs, resolved through the working utxo view.
/// Fails when a referenced output is missing from the view.
pub fn transaction_p2sh_sigops(transaction: &IndexedTransaction, view: &UtxoViewpoint) -> Result<usize, TransactionError> {
	if transaction.raw.is_coinbase() {
		return Ok(0);
	}

	let mut sigops = 0;
	for (index, input) in transaction.raw.inputs.iter().enumerate() {
		let output = view
			.lookup_entry(&input.previous_output.hash)
			.and_then(|entry| entry.output(input.previous_output.index))
			.ok_or(TransactionError::Input(index))?;

		let script_pubkey = Script::new(output.script_pubkey.clone());
		let script_sig = Script::new(input.script_sig.clone());
		sigops += script_pubkey.pay_to_script_hash_sigops(&script_sig);
	}

	Ok(sigops)
}
