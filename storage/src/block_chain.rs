use crate::best_state::BestState;
use crate::error::Error;
use crate::key_view::{KeyId, KeySet};
use crate::utxo_view::UtxoViewpoint;
use chain::{IndexedBlock, Transaction};
use keys::Public;
use primitives::compact::Compact;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

/// Wall clock corrected by the median offset reported by network peers.
pub trait MedianTimeSource {
	/// The adjusted duration since the UNIX epoch.
	fn adjusted_time(&self) -> Duration;
}

/// Chain state a block template is generated against. Implementations must
/// answer against a consistent snapshot for concurrent readers.
pub trait BlockChain {
	/// Snapshot of the best tip.
	fn best_state(&self) -> BestState;

	/// Unspent outputs referenced by the passed transaction's inputs,
	/// restricted to the confirmed chain. Inputs spending unconfirmed
	/// outputs are simply absent from the returned view.
	fn fetch_utxo_view(&self, transaction: &Transaction) -> Result<UtxoViewpoint, Error>;

	/// Last account-service-provider key id assigned at the tip.
	fn last_key_id(&self) -> KeyId;

	/// Administrative key sets at the tip.
	fn admin_key_sets(&self) -> HashMap<KeySet, Vec<Public>>;

	/// Account-service-provider keys provisioned at the tip.
	fn key_ids(&self) -> BTreeMap<KeyId, Public>;

	/// Difficulty required of the next block.
	fn calc_next_required_difficulty(&self) -> Result<Compact, Error>;

	/// Full static consensus validation of a block connecting to the tip.
	fn check_connect_block(&self, block: &IndexedBlock) -> Result<(), Error>;
}

pub type SharedChain = Arc<dyn BlockChain + Send + Sync>;
