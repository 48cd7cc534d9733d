//! Chain transaction primitives.

use crate::constants::{LOCKTIME_THRESHOLD, MAX_PREV_OUT_INDEX, SEQUENCE_FINAL};
use bitcrypto::{dhash256, Hash, SHA256D};
use primitives::bytes::Bytes;
use ser::{deserialize, serialize, Deserializable, Error as ReaderError, Reader, Serializable, Stream};
use std::io;

/// Reference to an output of an earlier transaction.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct OutPoint {
	pub hash: SHA256D,
	pub index: u32,
}

impl Default for OutPoint {
	fn default() -> Self {
		OutPoint {
			hash: SHA256D::default(),
			index: Default::default(),
		}
	}
}

impl OutPoint {
	pub fn null() -> Self {
		OutPoint {
			hash: SHA256D::default(),
			index: MAX_PREV_OUT_INDEX,
		}
	}

	pub fn is_null(&self) -> bool {
		self.hash == SHA256D::default() && self.index == MAX_PREV_OUT_INDEX
	}
}

impl Serializable for OutPoint {
	fn serialize(&self, stream: &mut Stream) {
		stream.append(&self.hash).append(&self.index);
	}

	#[inline]
	fn serialized_size(&self) -> usize {
		36
	}
}

impl Deserializable for OutPoint {
	fn deserialize<T>(reader: &mut Reader<T>) -> Result<Self, ReaderError>
	where
		T: io::Read,
	{
		Ok(OutPoint {
			hash: reader.read()?,
			index: reader.read()?,
		})
	}
}

#[derive(Debug, PartialEq, Default, Clone)]
pub struct TransactionInput {
	pub previous_output: OutPoint,
	pub script_sig: Bytes,
	pub sequence: u32,
}

impl TransactionInput {
	/// The single input of a coinbase transaction: null previous outpoint,
	/// maximum sequence and the passed signature script.
	pub fn coinbase(script_sig: Bytes) -> Self {
		TransactionInput {
			previous_output: OutPoint::null(),
			script_sig,
			sequence: SEQUENCE_FINAL,
		}
	}

	pub fn is_final(&self) -> bool {
		self.sequence == SEQUENCE_FINAL
	}
}

impl Serializable for TransactionInput {
	fn serialize(&self, stream: &mut Stream) {
		stream.append(&self.previous_output).append(&self.script_sig).append(&self.sequence);
	}

	#[inline]
	fn serialized_size(&self) -> usize {
		self.previous_output.serialized_size() + self.script_sig.serialized_size() + 4
	}
}

impl Deserializable for TransactionInput {
	fn deserialize<T>(reader: &mut Reader<T>) -> Result<Self, ReaderError>
	where
		T: io::Read,
	{
		Ok(TransactionInput {
			previous_output: reader.read()?,
			script_sig: reader.read()?,
			sequence: reader.read()?,
		})
	}
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct TransactionOutput {
	pub value: u64,
	pub script_pubkey: Bytes,
}

impl Serializable for TransactionOutput {
	fn serialize(&self, stream: &mut Stream) {
		stream.append(&self.value).append(&self.script_pubkey);
	}

	#[inline]
	fn serialized_size(&self) -> usize {
		8 + self.script_pubkey.serialized_size()
	}
}

impl Deserializable for TransactionOutput {
	fn deserialize<T>(reader: &mut Reader<T>) -> Result<Self, ReaderError>
	where
		T: io::Read,
	{
		Ok(TransactionOutput {
			value: reader.read()?,
			script_pubkey: reader.read()?,
		})
	}
}

#[derive(Debug, PartialEq, Default, Clone)]
pub struct Transaction {
	pub version: i32,
	pub inputs: Vec<TransactionInput>,
	pub outputs: Vec<TransactionOutput>,
	pub lock_time: u32,
}

impl From<&'static str> for Transaction {
	fn from(s: &'static str) -> Self {
		let bytes: Bytes = s.parse().unwrap();
		deserialize(bytes.as_ref()).unwrap()
	}
}

impl Transaction {
	pub fn hash(&self) -> SHA256D {
		dhash256(&serialize(self))
	}

	pub fn is_empty(&self) -> bool {
		self.inputs.is_empty() || self.outputs.is_empty()
	}

	pub fn is_null(&self) -> bool {
		self.inputs.iter().any(|input| input.previous_output.is_null())
	}

	pub fn is_coinbase(&self) -> bool {
		self.inputs.len() == 1 && self.inputs[0].previous_output.is_null()
	}

	/// Returns true if the transaction can be included in a block with the
	/// given height and timestamp, per the locktime consensus rule.
	pub fn is_final_in_block(&self, block_height: u32, block_time: u32) -> bool {
		if self.lock_time == 0 {
			return true;
		}

		let max_lock_time = if self.lock_time < LOCKTIME_THRESHOLD {
			block_height
		} else {
			block_time
		};

		if self.lock_time < max_lock_time {
			return true;
		}

		// A transaction with a pending lock time is still final if every
		// input opted out via a maximum sequence number.
		self.inputs.iter().all(TransactionInput::is_final)
	}

	pub fn total_spends(&self) -> u64 {
		let mut result = 0u64;
		for output in &self.outputs {
			if u64::max_value() - result < output.value {
				return u64::max_value();
			}
			result += output.value;
		}
		result
	}

	pub fn serialized_size(&self) -> usize {
		Serializable::serialized_size(self)
	}
}

impl Serializable for Transaction {
	fn serialize(&self, stream: &mut Stream) {
		stream
			.append(&self.version)
			.append_list(&self.inputs)
			.append_list(&self.outputs)
			.append(&self.lock_time);
	}
}

impl Deserializable for Transaction {
	fn deserialize<T>(reader: &mut Reader<T>) -> Result<Self, ReaderError>
	where
		T: io::Read,
	{
		Ok(Transaction {
			version: reader.read()?,
			inputs: reader.read_list()?,
			outputs: reader.read_list()?,
			lock_time: reader.read()?,
		})
	}
}
