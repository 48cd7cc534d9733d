use crate::error::Error;
use crate::script::Script;
use bitcrypto::{dhash256, SHA256D};
use chain::Transaction;
use ser::Stream;

/// Supported signature hash types. The type byte is appended to every
/// signature; only `All` is produced and accepted by this chain.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SighashType {
	All,
}

impl SighashType {
	pub fn from_byte(byte: u8) -> Option<SighashType> {
		match byte {
			1 => Some(SighashType::All),
			_ => None,
		}
	}

	pub fn to_byte(self) -> u8 {
		match self {
			SighashType::All => 1,
		}
	}
}

/// Computes the digest an input signature commits to: the transaction with
/// every signature script blanked except the signed input, which carries
/// the subscript, followed by the sighash type.
pub fn signature_hash(transaction: &Transaction, input_index: usize, subscript: &Script, sighash_type: SighashType) -> Result<SHA256D, Error> {
	if input_index >= transaction.inputs.len() {
		return Err(Error::InvalidInputIndex);
	}

	let mut signed = transaction.clone();
	for (index, input) in signed.inputs.iter_mut().enumerate() {
		input.script_sig = if index == input_index {
			subscript.to_bytes()
		} else {
			Default::default()
		};
	}

	let mut stream = Stream::default();
	stream.append(&signed).append(&u32::from(sighash_type.to_byte()));
	Ok(dhash256(&stream.out()))
}

#[cfg(test)]
mod tests {
	use super::{signature_hash, SighashType};
	use crate::builder::Builder;
	use chain::{OutPoint, Transaction, TransactionInput, TransactionOutput};

	fn sample_transaction() -> Transaction {
		Transaction {
			version: 1,
			inputs: vec![
				TransactionInput {
					previous_output: OutPoint {
						hash: Default::default(),
						index: 0,
					},
					script_sig: "aabb".into(),
					sequence: 0xffff_ffff,
				},
				TransactionInput {
					previous_output: OutPoint {
						hash: Default::default(),
						index: 1,
					},
					script_sig: "ccdd".into(),
					sequence: 0xffff_ffff,
				},
			],
			outputs: vec![TransactionOutput {
				value: 10,
				script_pubkey: "51".into(),
			}],
			lock_time: 0,
		}
	}

	#[test]
	fn test_sighash_commits_to_signed_input_subscript() {
		let transaction = sample_transaction();
		let subscript = Builder::build_anyone_can_spend();

		let first = signature_hash(&transaction, 0, &subscript, SighashType::All).unwrap();
		let second = signature_hash(&transaction, 1, &subscript, SighashType::All).unwrap();
		assert_ne!(first, second);

		// existing signature scripts do not affect the digest
		let mut stripped = transaction.clone();
		stripped.inputs[0].script_sig = Default::default();
		stripped.inputs[1].script_sig = Default::default();
		assert_eq!(first, signature_hash(&stripped, 0, &subscript, SighashType::All).unwrap());
	}

	#[test]
	fn test_sighash_input_index_out_of_range() {
		let transaction = sample_transaction();
		let subscript = Builder::build_anyone_can_spend();
		assert!(signature_hash(&transaction, 2, &subscript, SighashType::All).is_err());
	}
}
