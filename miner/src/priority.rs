use chain::Transaction;
use ser::Serializable;
use storage::UtxoViewpoint;

/// Serialization overhead of an input that does not meaningfully carry
/// value: outpoint, sequence and a length byte, plus up to 110 bytes of
/// signature script.
const INPUT_OVERHEAD: usize = 41;
const MAX_DISCOUNTED_SCRIPT_SIG: usize = 110;

/// Computes the priority of a transaction at the given height: the sum of
/// `input value * input age` over its confirmed inputs, divided by the
/// size of the transaction with per-input overhead discounted. Inputs
/// missing from the view (unconfirmed parents) contribute no value age.
pub fn calc_priority(transaction: &Transaction, view: &UtxoViewpoint, next_height: u32) -> f64 {
	let mut input_value_age = 0f64;
	for input in &transaction.inputs {
		let entry = match view.lookup_entry(&input.previous_output.hash) {
			Some(entry) => entry,
			None => continue,
		};
		let value = match entry.output(input.previous_output.index) {
			Some(output) => output.value,
			None => continue,
		};

		let age = next_height.saturating_sub(entry.height);
		input_value_age += value as f64 * age as f64;
	}

	let serialized_size = Serializable::serialized_size(transaction);
	let overhead: usize = transaction
		.inputs
		.iter()
		.map(|input| INPUT_OVERHEAD + input.script_sig.len().min(MAX_DISCOUNTED_SCRIPT_SIG))
		.sum();

	if serialized_size <= overhead {
		return 0.0;
	}

	input_value_age / (serialized_size - overhead) as f64
}
