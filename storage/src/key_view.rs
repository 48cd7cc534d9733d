use keys::Public;
use script::ThreadId;
use std::collections::{BTreeMap, HashMap};

/// Identifier of an account-service-provider key provisioned on chain.
pub type KeyId = u32;

/// The administrative key sets tracked by chain governance.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum KeySet {
	/// Keys allowed to spend the root thread.
	Root,
	/// Keys allowed to spend the provision thread.
	Provision,
	/// Keys allowed to spend the issue thread.
	Issue,
	/// Keys allowed to sign block headers.
	Validate,
}

impl From<ThreadId> for KeySet {
	fn from(thread: ThreadId) -> Self {
		match thread {
			ThreadId::Root => KeySet::Root,
			ThreadId::Provision => KeySet::Provision,
			ThreadId::Issue => KeySet::Issue,
		}
	}
}

/// Snapshot of the governance key state at the parent tip, consulted by
/// output validation during block assembly.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct KeyViewpoint {
	admin_keys: HashMap<KeySet, Vec<Public>>,
	key_ids: BTreeMap<KeyId, Public>,
	last_key_id: KeyId,
}

impl KeyViewpoint {
	pub fn new() -> Self {
		KeyViewpoint::default()
	}

	pub fn set_admin_keys(&mut self, keys: HashMap<KeySet, Vec<Public>>) {
		self.admin_keys = keys;
	}

	pub fn set_key_ids(&mut self, key_ids: BTreeMap<KeyId, Public>) {
		self.key_ids = key_ids;
	}

	pub fn set_last_key_id(&mut self, last_key_id: KeyId) {
		self.last_key_id = last_key_id;
	}

	pub fn keys(&self, set: KeySet) -> &[Public] {
		self.admin_keys.get(&set).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn contains_key(&self, set: KeySet, key: &Public) -> bool {
		self.keys(set).contains(key)
	}

	pub fn key_id(&self, id: KeyId) -> Option<&Public> {
		self.key_ids.get(&id)
	}

	pub fn last_key_id(&self) -> KeyId {
		self.last_key_id
	}
}
