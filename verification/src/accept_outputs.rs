use crate::error::TransactionError;
use chain::IndexedTransaction;
use keys::Public;
use script::{Script, ScriptType, ThreadId};
use storage::{KeySet, KeyViewpoint};

/// Checks the outputs of a pending transaction against the governance
/// state: admin thread placement, decodability and applicability of every
/// carried operation, and the standardness of value outputs.
pub fn check_transaction_outputs(transaction: &IndexedTransaction, key_view: &KeyViewpoint) -> Result<(), TransactionError> {
	trace!(target: "verification", "Tx output verification {}", transaction.hash);

	let scripts: Vec<Script> = transaction
		.raw
		.outputs
		.iter()
		.map(|output| Script::new(output.script_pubkey.clone()))
		.collect();

	let admin_thread = scripts.first().and_then(Script::admin_thread_id);

	// An admin thread script anywhere but output zero makes the
	// transaction invalid, whether or not it is an admin spend.
	if scripts.iter().skip(1).any(|script| script.admin_thread_id().is_some()) {
		return Err(TransactionError::MisplacedAdminThread);
	}

	match admin_thread {
		Some(thread) => check_admin_outputs(transaction, &scripts, thread, key_view),
		None => check_regular_outputs(transaction, &scripts),
	}
}

fn check_regular_outputs(transaction: &IndexedTransaction, scripts: &[Script]) -> Result<(), TransactionError> {
	for (index, script) in scripts.iter().enumerate() {
		match script.script_type() {
			ScriptType::PayToPublicKeyHash | ScriptType::PayToScriptHash => (),
			ScriptType::NullData => {
				// data carriers must not lock value
				if transaction.raw.outputs[index].value != 0 {
					return Err(TransactionError::NonStandardOutput(index));
				}
			}
			_ if script.is_anyone_can_spend() => (),
			_ => return Err(TransactionError::NonStandardOutput(index)),
		}
	}
	Ok(())
}

fn check_admin_outputs(
	transaction: &IndexedTransaction,
	scripts: &[Script],
	thread: ThreadId,
	key_view: &KeyViewpoint,
) -> Result<(), TransactionError> {
	// The thread continuation output never carries value.
	if transaction.raw.outputs[0].value != 0 {
		return Err(TransactionError::AdminThreadValue);
	}
	if scripts.len() == 1 {
		return Err(TransactionError::EmptyAdminTransaction);
	}

	// The issue thread mints value to standard outputs; the root and
	// provision threads carry key operations in data outputs.
	if thread == ThreadId::Issue {
		for (index, script) in scripts.iter().enumerate().skip(1) {
			match script.script_type() {
				ScriptType::PayToPublicKeyHash | ScriptType::PayToScriptHash => (),
				_ => return Err(TransactionError::NonStandardOutput(index)),
			}
		}
		return Ok(());
	}

	let mut issued_key_ids = 0;
	for (index, script) in scripts.iter().enumerate().skip(1) {
		if script.script_type() != ScriptType::NullData {
			return Err(TransactionError::NonStandardOutput(index));
		}
		if transaction.raw.outputs[index].value != 0 {
			return Err(TransactionError::AdminThreadValue);
		}

		let op = parse_admin_op(script).ok_or(TransactionError::UndecodableAdminOp(index))?;
		if op.thread() != thread {
			return Err(TransactionError::ForeignAdminOp(index));
		}

		match op {
			AdminOp::AddKey { set, key } => {
				if key_view.contains_key(set, &key) {
					return Err(TransactionError::DuplicateAdminKey);
				}
			}
			AdminOp::RevokeKey { set, key } => {
				if !key_view.contains_key(set, &key) {
					return Err(TransactionError::UnknownAdminKey);
				}
			}
			AdminOp::IssueKeyId { id, .. } => {
				issued_key_ids += 1;
				if id != key_view.last_key_id() + issued_key_ids {
					return Err(TransactionError::NonSequentialKeyId);
				}
			}
			AdminOp::RevokeKeyId { id } => {
				if key_view.key_id(id).is_none() {
					return Err(TransactionError::UnknownKeyId);
				}
			}
		}
	}

	Ok(())
}

/// Governance operations carried by admin transactions, one per data
/// output.
#[derive(Debug, PartialEq)]
enum AdminOp {
	AddKey { set: KeySet, key: Public },
	RevokeKey { set: KeySet, key: Public },
	IssueKeyId { id: u32, key: Public },
	RevokeKeyId { id: u32 },
}

impl AdminOp {
	/// The thread an operation is allowed to appear on.
	fn thread(&self) -> ThreadId {
		match *self {
			AdminOp::AddKey { set, .. } | AdminOp::RevokeKey { set, .. } => match set {
				KeySet::Provision | KeySet::Issue => ThreadId::Root,
				KeySet::Validate => ThreadId::Provision,
				// root keys can only rotate via chain restart
				KeySet::Root => ThreadId::Root,
			},
			AdminOp::IssueKeyId { .. } | AdminOp::RevokeKeyId { .. } => ThreadId::Provision,
		}
	}
}

/// Operation byte tags of the admin payload format.
mod op_tags {
	pub const PROVISION_KEY_ADD: u8 = 0x01;
	pub const PROVISION_KEY_REVOKE: u8 = 0x02;
	pub const ISSUE_KEY_ADD: u8 = 0x03;
	pub const ISSUE_KEY_REVOKE: u8 = 0x04;
	pub const VALIDATE_KEY_ADD: u8 = 0x11;
	pub const VALIDATE_KEY_REVOKE: u8 = 0x12;
	pub const KEY_ID_ISSUE: u8 = 0x13;
	pub const KEY_ID_REVOKE: u8 = 0x14;
}

/// Decodes the single data push of an admin data output:
/// `[tag][compressed key]` for key set operations,
/// `[tag][key id le][compressed key]` for key id issuance and
/// `[tag][key id le]` for key id revocation.
fn parse_admin_op(script: &Script) -> Option<AdminOp> {
	let payload = script.null_data_payload()?;
	let (tag, rest) = payload.split_first()?;

	let key_op = |set: KeySet, add: bool| -> Option<AdminOp> {
		if rest.len() != 33 {
			return None;
		}
		let key = Public::from_slice(rest).ok()?;
		Some(if add {
			AdminOp::AddKey { set, key }
		} else {
			AdminOp::RevokeKey { set, key }
		})
	};

	match *tag {
		op_tags::PROVISION_KEY_ADD => key_op(KeySet::Provision, true),
		op_tags::PROVISION_KEY_REVOKE => key_op(KeySet::Provision, false),
		op_tags::ISSUE_KEY_ADD => key_op(KeySet::Issue, true),
		op_tags::ISSUE_KEY_REVOKE => key_op(KeySet::Issue, false),
		op_tags::VALIDATE_KEY_ADD => key_op(KeySet::Validate, true),
		op_tags::VALIDATE_KEY_REVOKE => key_op(KeySet::Validate, false),
		op_tags::KEY_ID_ISSUE => {
			if rest.len() != 4 + 33 {
				return None;
			}
			let id = u32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]);
			let key = Public::from_slice(&rest[4..]).ok()?;
			Some(AdminOp::IssueKeyId { id, key })
		}
		op_tags::KEY_ID_REVOKE => {
			if rest.len() != 4 {
				return None;
			}
			let id = u32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]);
			Some(AdminOp::RevokeKeyId { id })
		}
		_ => None,
	}
}
