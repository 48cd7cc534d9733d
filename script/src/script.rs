use crate::error::Error;
use crate::opcodes::{self, decode_small_int};
use primitives::bytes::Bytes;
use std::{fmt, ops};

/// Maximum number of public keys per multisig script.
pub const MAX_PUBKEYS_PER_MULTISIG: usize = 20;

/// Administrative thread identifier carried by governance outputs.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum ThreadId {
	Root,
	Provision,
	Issue,
}

impl ThreadId {
	pub fn from_u8(value: u8) -> Option<ThreadId> {
		match value {
			0 => Some(ThreadId::Root),
			1 => Some(ThreadId::Provision),
			2 => Some(ThreadId::Issue),
			_ => None,
		}
	}

	pub fn to_u8(self) -> u8 {
		match self {
			ThreadId::Root => 0,
			ThreadId::Provision => 1,
			ThreadId::Issue => 2,
		}
	}
}

/// Standard script kinds recognized by this chain.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ScriptType {
	NonStandard,
	PayToPublicKeyHash,
	PayToScriptHash,
	NullData,
	AdminThread,
}

/// Single parsed script instruction.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Instruction<'a> {
	pub opcode: u8,
	pub data: Option<&'a [u8]>,
}

/// Serialized script, as stored in transaction outputs and inputs.
#[derive(PartialEq, Default, Clone)]
pub struct Script {
	data: Bytes,
}

impl From<&'static str> for Script {
	fn from(s: &'static str) -> Self {
		Script::new(s.into())
	}
}

impl From<Bytes> for Script {
	fn from(s: Bytes) -> Self {
		Script::new(s)
	}
}

impl From<Vec<u8>> for Script {
	fn from(v: Vec<u8>) -> Self {
		Script::new(v.into())
	}
}

impl From<Script> for Bytes {
	fn from(script: Script) -> Self {
		script.data
	}
}

impl ops::Deref for Script {
	type Target = [u8];

	fn deref(&self) -> &Self::Target {
		&self.data
	}
}

impl fmt::Debug for Script {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.data.fmt(f)
	}
}

impl Script {
	pub fn new(data: Bytes) -> Self {
		Script { data }
	}

	pub fn to_bytes(&self) -> Bytes {
		self.data.clone()
	}

	pub fn len(&self) -> usize {
		self.data.len()
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Extracts the instruction starting at `position`, returning it and the
	/// position of the next one.
	fn instruction_at(&self, position: usize) -> Result<(Instruction, usize), Error> {
		let opcode = self.data[position];
		let (data_len, len_bytes) = match opcode {
			0x01..=0x4b => (opcode as usize, 0),
			opcodes::OP_PUSHDATA1 => {
				if position + 1 >= self.data.len() {
					return Err(Error::MalformedScript);
				}
				(self.data[position + 1] as usize, 1)
			}
			opcodes::OP_PUSHDATA2 => {
				if position + 2 >= self.data.len() {
					return Err(Error::MalformedScript);
				}
				let len = self.data[position + 1] as usize | (self.data[position + 2] as usize) << 8;
				(len, 2)
			}
			opcodes::OP_PUSHDATA4 => {
				if position + 4 >= self.data.len() {
					return Err(Error::MalformedScript);
				}
				let mut len = 0usize;
				for i in 0..4 {
					len |= (self.data[position + 1 + i] as usize) << (8 * i);
				}
				(len, 4)
			}
			_ => {
				return Ok((Instruction { opcode, data: None }, position + 1));
			}
		};

		let data_start = position + 1 + len_bytes;
		let data_end = data_start.checked_add(data_len).ok_or(Error::MalformedScript)?;
		if data_end > self.data.len() {
			return Err(Error::MalformedScript);
		}

		let instruction = Instruction {
			opcode,
			data: Some(&self.data[data_start..data_end]),
		};
		Ok((instruction, data_end))
	}

	pub fn instructions(&self) -> Instructions {
		Instructions { script: self, position: 0 }
	}

	/// Returns every pushed data element, failing if the script contains
	/// anything else. Empty pushes (`OP_0`) yield empty slices.
	pub fn parse_pushes(&self) -> Result<Vec<&[u8]>, Error> {
		let mut pushes = Vec::new();
		for instruction in self.instructions() {
			let instruction = instruction?;
			match instruction.data {
				Some(data) => pushes.push(data),
				None if instruction.opcode == opcodes::OP_0 => pushes.push(&[] as &[u8]),
				None => return Err(Error::SignatureScriptNotPushOnly),
			}
		}
		Ok(pushes)
	}

	pub fn is_pay_to_public_key_hash(&self) -> bool {
		self.data.len() == 25
			&& self.data[0] == opcodes::OP_DUP
			&& self.data[1] == opcodes::OP_HASH160
			&& self.data[2] == 20
			&& self.data[23] == opcodes::OP_EQUALVERIFY
			&& self.data[24] == opcodes::OP_CHECKSIG
	}

	pub fn is_pay_to_script_hash(&self) -> bool {
		self.data.len() == 23 && self.data[0] == opcodes::OP_HASH160 && self.data[1] == 20 && self.data[22] == opcodes::OP_EQUAL
	}

	/// An unspendable output carrying optional payload data.
	pub fn is_null_data_script(&self) -> bool {
		!self.data.is_empty() && self.data[0] == opcodes::OP_RETURN
	}

	/// Payload of a null data script: the single data push following
	/// `OP_RETURN`. Bare `OP_RETURN` scripts and scripts carrying anything
	/// else yield nothing.
	pub fn null_data_payload(&self) -> Option<&[u8]> {
		if !self.is_null_data_script() {
			return None;
		}

		let mut instructions = self.instructions();
		instructions.next()?.ok()?;
		let payload = match instructions.next() {
			Some(Ok(instruction)) => instruction.data?,
			_ => return None,
		};
		match instructions.next() {
			None => Some(payload),
			_ => None,
		}
	}

	pub fn is_anyone_can_spend(&self) -> bool {
		self.data.len() == 1 && self.data[0] == opcodes::OP_TRUE
	}

	/// Returns the thread id of an administrative thread script:
	/// a small-integer thread id followed by `OP_CHECKTHREAD`.
	pub fn admin_thread_id(&self) -> Option<ThreadId> {
		if self.data.len() != 2 || self.data[1] != opcodes::OP_CHECKTHREAD {
			return None;
		}
		decode_small_int(self.data[0]).and_then(ThreadId::from_u8)
	}

	pub fn script_type(&self) -> ScriptType {
		if self.is_pay_to_public_key_hash() {
			ScriptType::PayToPublicKeyHash
		} else if self.is_pay_to_script_hash() {
			ScriptType::PayToScriptHash
		} else if self.admin_thread_id().is_some() {
			ScriptType::AdminThread
		} else if self.is_null_data_script() {
			ScriptType::NullData
		} else {
			ScriptType::NonStandard
		}
	}

	/// Parses a standard multisig script `OP_m <pubkey>.. OP_n
	/// OP_CHECKMULTISIG`, returning the threshold and public keys.
	pub fn parse_multisig(&self) -> Option<(u8, Vec<&[u8]>)> {
		let mut instructions = Vec::new();
		for instruction in self.instructions() {
			match instruction {
				Ok(instruction) => instructions.push(instruction),
				Err(_) => return None,
			}
		}

		if instructions.len() < 4 {
			return None;
		}
		if instructions[instructions.len() - 1].opcode != opcodes::OP_CHECKMULTISIG {
			return None;
		}

		let required = decode_small_int(instructions[0].opcode)?;
		let total = decode_small_int(instructions[instructions.len() - 2].opcode)?;
		let pubkeys: Vec<&[u8]> = instructions[1..instructions.len() - 2].iter().filter_map(|i| i.data).collect();

		if pubkeys.len() != total as usize || pubkeys.len() != instructions.len() - 3 {
			return None;
		}
		if required == 0 || required > total || total as usize > MAX_PUBKEYS_PER_MULTISIG {
			return None;
		}

		Some((required, pubkeys))
	}

	/// Counts signature operations. With `accurate` counting, the pubkey
	/// count preceding `OP_CHECKMULTISIG` is honored; legacy counting
	/// charges the maximum. A malformed tail stops the count.
	pub fn sigops_count(&self, accurate: bool) -> usize {
		let mut sigops = 0;
		let mut previous_opcode = opcodes::OP_RETURN;
		for instruction in self.instructions() {
			let instruction = match instruction {
				Ok(instruction) => instruction,
				Err(_) => break,
			};
			match instruction.opcode {
				opcodes::OP_CHECKSIG | opcodes::OP_CHECKSIGVERIFY | opcodes::OP_CHECKTHREAD => {
					sigops += 1;
				}
				opcodes::OP_CHECKMULTISIG | opcodes::OP_CHECKMULTISIGVERIFY => {
					sigops += match decode_small_int(previous_opcode) {
						Some(keys) if accurate && keys >= 1 => keys as usize,
						_ => MAX_PUBKEYS_PER_MULTISIG,
					};
				}
				_ => (),
			}
			previous_opcode = instruction.opcode;
		}
		sigops
	}

	/// Sigops of the redeem script spending this pay-to-script-hash output.
	/// Zero when the output is not P2SH or the signature script is not push
	/// only.
	pub fn pay_to_script_hash_sigops(&self, script_sig: &Script) -> usize {
		if !self.is_pay_to_script_hash() {
			return 0;
		}

		let pushes = match script_sig.parse_pushes() {
			Ok(pushes) => pushes,
			Err(_) => return 0,
		};

		match pushes.last() {
			Some(redeem) => Script::from(redeem.to_vec()).sigops_count(true),
			None => 0,
		}
	}
}

pub struct Instructions<'a> {
	script: &'a Script,
	position: usize,
}

impl<'a> Iterator for Instructions<'a> {
	type Item = Result<Instruction<'a>, Error>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.position >= self.script.len() {
			return None;
		}

		match self.script.instruction_at(self.position) {
			Ok((instruction, next)) => {
				self.position = next;
				Some(Ok(instruction))
			}
			Err(err) => {
				self.position = self.script.len();
				Some(Err(err))
			}
		}
	}
}
