use crate::opcodes;
use crate::script::{Script, ThreadId};
use keys::{Address, AddressHash, Type};
use primitives::bytes::Bytes;

/// Incremental script construction.
#[derive(Default)]
pub struct Builder {
	data: Bytes,
}

impl Builder {
	/// Pay-to-address script of the kind the address calls for.
	pub fn build_pay_to_address(address: &Address) -> Script {
		match address.kind {
			Type::P2PKH => Builder::build_pay_to_public_key_hash(&address.hash),
			Type::P2SH => Builder::build_pay_to_script_hash(&address.hash),
		}
	}

	pub fn build_pay_to_public_key_hash(hash: &AddressHash) -> Script {
		Builder::default()
			.push_opcode(opcodes::OP_DUP)
			.push_opcode(opcodes::OP_HASH160)
			.push_data(&**hash)
			.push_opcode(opcodes::OP_EQUALVERIFY)
			.push_opcode(opcodes::OP_CHECKSIG)
			.into_script()
	}

	pub fn build_pay_to_script_hash(hash: &AddressHash) -> Script {
		Builder::default()
			.push_opcode(opcodes::OP_HASH160)
			.push_data(&**hash)
			.push_opcode(opcodes::OP_EQUAL)
			.into_script()
	}

	/// Output spendable without any signature.
	pub fn build_anyone_can_spend() -> Script {
		Builder::default().push_opcode(opcodes::OP_TRUE).into_script()
	}

	/// Provably unspendable output, used by zero-value coinbases to avoid
	/// creating a new utxo.
	pub fn build_unspendable() -> Script {
		Builder::default().push_opcode(opcodes::OP_RETURN).into_script()
	}

	/// Unspendable output carrying a data payload.
	pub fn build_null_data(data: &[u8]) -> Script {
		Builder::default().push_opcode(opcodes::OP_RETURN).push_data(data).into_script()
	}

	/// Administrative thread output script.
	pub fn build_admin_thread(thread: ThreadId) -> Script {
		Builder::default().push_small_int(thread.to_u8()).push_opcode(opcodes::OP_CHECKTHREAD).into_script()
	}

	pub fn push_opcode(mut self, opcode: u8) -> Self {
		self.data.push(opcode);
		self
	}

	/// Pushes `0..=16` with the dedicated small-integer opcodes.
	pub fn push_small_int(mut self, int: u8) -> Self {
		debug_assert!(int <= 16);
		let opcode = match int {
			0 => opcodes::OP_0,
			_ => opcodes::OP_1 + int - 1,
		};
		self.data.push(opcode);
		self
	}

	pub fn push_data(mut self, data: &[u8]) -> Self {
		let len = data.len();
		if len < opcodes::OP_PUSHDATA1 as usize {
			self.data.push(len as u8);
		} else if len < 0x100 {
			self.data.push(opcodes::OP_PUSHDATA1);
			self.data.push(len as u8);
		} else if len < 0x10000 {
			self.data.push(opcodes::OP_PUSHDATA2);
			self.data.push(len as u8);
			self.data.push((len >> 8) as u8);
		} else {
			self.data.push(opcodes::OP_PUSHDATA4);
			self.data.push(len as u8);
			self.data.push((len >> 8) as u8);
			self.data.push((len >> 16) as u8);
			self.data.push((len >> 24) as u8);
		}
		self.data.extend_from_slice(data);
		self
	}

	pub fn into_script(self) -> Script {
		Script::new(self.data)
	}

	pub fn into_bytes(self) -> Bytes {
		self.data
	}
}
