use crate::block_template::BlockTemplate;
use crate::error::Error;
use crate::policy::{Policy, MIN_HIGH_PRIORITY};
use crate::priority::calc_priority;
use crate::priority_queue::{CandidateTransaction, OrderingStrategy, TransactionPriorityQueue};
use crate::transaction_source::TransactionSource;
use bitcrypto::SHA256D;
use chain::constants::{MAX_BLOCK_HEADER_PAYLOAD, MAX_VAR_INT_PAYLOAD};
use chain::{merkle_root, Block, BlockHeader, IndexedBlock, IndexedTransaction, Transaction, TransactionInput, TransactionOutput};
use keys::{Address, Private};
use network::ConsensusParams;
use primitives::bytes::Bytes;
use script::{Builder, HashCache, Script, SigCache, VerificationFlags};
use ser::{serialize, CompactInteger};
use storage::{BestState, KeyViewpoint, MedianTimeSource, SharedChain, UtxoViewpoint};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use verification::{
	check_transaction_inputs, check_transaction_outputs, transaction_p2sh_sigops, transaction_sigops, validate_transaction_scripts,
};

/// Version of the blocks being generated. Defined as its own constant
/// rather than reusing a wire constant: a bump of the wire block version
/// must not silently change what this code produces.
const GENERATED_BLOCK_VERSION: u32 = 4;

/// Worst case number of bytes the block header and the transaction count
/// occupy, reserved up front and corrected once the count is known.
const BLOCK_HEADER_OVERHEAD: u32 = (MAX_BLOCK_HEADER_PAYLOAD + MAX_VAR_INT_PAYLOAD) as u32;

/// Marker pushed into the signature script of every generated coinbase.
const COINBASE_FLAGS: &[u8] = b"/prova/";

/// Returns whether the transaction carries an administrative thread
/// output. Such transactions enjoy unconditional selection priority.
fn is_admin_transaction(transaction: &Transaction) -> bool {
	transaction
		.outputs
		.iter()
		.any(|output| Script::new(output.script_pubkey.clone()).admin_thread_id().is_some())
}

/// Signature script of a generated coinbase: the coinbase flags as a
/// single data push.
fn standard_coinbase_script() -> Bytes {
	Builder::default().push_data(COINBASE_FLAGS).into_bytes()
}

/// Builds the coinbase paying the passed subsidy to the provided address,
/// or to an anyone-can-spend output when no address is configured. The
/// value is raised by the collected fees once selection is done.
///
/// The block height is stored in the locktime to keep coinbase txids
/// unique: with constant flags, two coinbases paying the same value to
/// the same script would otherwise hash identically.
fn create_coinbase_transaction(
	coinbase_script: Bytes,
	next_height: u32,
	subsidy: u64,
	pay_to_address: Option<&Address>,
) -> IndexedTransaction {
	let script_pubkey = match pay_to_address {
		Some(address) => Builder::build_pay_to_address(address),
		None => Builder::build_anyone_can_spend(),
	};

	let transaction = Transaction {
		version: 1,
		inputs: vec![TransactionInput::coinbase(coinbase_script)],
		outputs: vec![TransactionOutput {
			value: subsidy,
			script_pubkey: script_pubkey.into(),
		}],
		lock_time: next_height,
	};

	debug!(target: "miner", "Created coinbase tx: {:?}", serialize(&transaction));
	transaction.into()
}

/// Minimum allowed timestamp of a block building on the current tip: one
/// second after the median timestamp of the last several blocks.
fn minimum_median_time(best: &BestState) -> u32 {
	best.median_time + 1
}

/// Current adjusted time truncated to seconds, but never at or before the
/// median time of the last several blocks.
fn median_adjusted_time(best: &BestState, time_source: &dyn MedianTimeSource) -> u32 {
	let new_timestamp = time_source.adjusted_time().as_secs() as u32;
	let min_timestamp = minimum_median_time(best);
	if new_timestamp < min_timestamp {
		min_timestamp
	} else {
		new_timestamp
	}
}

/// Trace-logs every transaction stalled by skipping the passed one.
fn log_skipped_dependents(tx_hash: &SHA256D, dependers: &HashMap<SHA256D, Vec<SHA256D>>) {
	if let Some(children) = dependers.get(tx_hash) {
		for child in children {
			trace!(target: "miner", "Skipping tx {} since it depends on {}", child, tx_hash);
		}
	}
}

/// Generates block templates on top of the current best chain: selects
/// transactions from the source pool under the mining policy, settles the
/// subsidy and fees into a fresh coinbase and hands back a fully signed
/// block awaiting proof of work.
///
/// Transactions spending only confirmed outputs enter a priority queue
/// directly; transactions spending other pool members are parked until
/// every parent is included. The queue initially orders by priority
/// (value age over size) while the high-priority block area fills, then
/// switches to fee rate. Free transactions are admitted only below the
/// configured minimum block size, and any transaction that would overflow
/// the size or sigop budget, or that fails input, output or script
/// validation, is skipped together with its dependents.
pub struct BlockAssembler {
	policy: Policy,
	consensus: ConsensusParams,
	chain: SharedChain,
	tx_source: Arc<dyn TransactionSource + Send + Sync>,
	time_source: Arc<dyn MedianTimeSource + Send + Sync>,
	sig_cache: Arc<SigCache>,
	hash_cache: Arc<HashCache>,
}

impl BlockAssembler {
	pub fn new(
		policy: Policy,
		consensus: ConsensusParams,
		chain: SharedChain,
		tx_source: Arc<dyn TransactionSource + Send + Sync>,
		time_source: Arc<dyn MedianTimeSource + Send + Sync>,
		sig_cache: Arc<SigCache>,
		hash_cache: Arc<HashCache>,
	) -> Self {
		BlockAssembler {
			policy,
			consensus,
			chain,
			tx_source,
			time_source,
			sig_cache,
			hash_cache,
		}
	}

	/// Returns a new block template paying to the passed address, or to an
	/// anyone-can-spend output when no address is provided (useful when
	/// external mining software substitutes its own coinbase). The block
	/// is signed with the validator key and has passed the chain's full
	/// static validation; only the proof of work is missing.
	pub fn new_block_template(&self, pay_to_address: Option<&Address>, validate_key: &Private) -> Result<BlockTemplate, Error> {
		// Extend the most recently known best block.
		let best = self.chain.best_state();
		let next_height = best.height + 1;
		let adjusted_time_secs = self.time_source.adjusted_time().as_secs() as u32;

		// The coinbase is created first so configuration problems surface
		// before any selection work. Its value is corrected once the fees
		// are known.
		let subsidy = self.consensus.block_subsidy(next_height);
		let coinbase = create_coinbase_transaction(standard_coinbase_script(), next_height, subsidy, pay_to_address);
		let coinbase_sigops = transaction_sigops(&coinbase);

		let source_transactions = self.tx_source.mining_descs();
		let mut sorted_by_fee = self.policy.block_priority_size == 0;
		let mut queue = TransactionPriorityQueue::new(source_transactions.len(), sorted_by_fee);

		// Transactions accepted into the block, coinbase excluded until
		// final assembly. The working utxo view accumulates the confirmed
		// outputs candidates reference plus outputs accepted transactions
		// create; the key view freezes the governance state at the tip.
		let mut block_transactions: Vec<IndexedTransaction> = Vec::with_capacity(source_transactions.len());
		let mut block_utxos = UtxoViewpoint::new();
		let mut key_view = KeyViewpoint::new();
		key_view.set_last_key_id(self.chain.last_key_id());
		key_view.set_admin_keys(self.chain.admin_key_sets());
		key_view.set_key_ids(self.chain.key_ids());

		// dependers maps a pool transaction to the candidates waiting on
		// it; parked holds those candidates until their dependency set
		// drains.
		let mut dependers: HashMap<SHA256D, Vec<SHA256D>> = HashMap::new();
		let mut parked: HashMap<SHA256D, CandidateTransaction> = HashMap::new();

		let mut fees: Vec<i64> = Vec::with_capacity(source_transactions.len() + 1);
		let mut sigop_counts: Vec<usize> = Vec::with_capacity(source_transactions.len() + 1);
		fees.push(-1); // updated once the total is known
		sigop_counts.push(coinbase_sigops);

		debug!(target: "miner", "Considering {} transactions for inclusion to new block", source_transactions.len());

		'mempool: for desc in source_transactions {
			let tx = desc.transaction;

			// A block can't have more than one coinbase or contain
			// non-finalized transactions.
			if tx.raw.is_coinbase() {
				trace!(target: "miner", "Skipping coinbase tx {}", tx.hash);
				continue;
			}
			if !tx.raw.is_final_in_block(next_height, adjusted_time_secs) {
				trace!(target: "miner", "Skipping non-finalized tx {}", tx.hash);
				continue;
			}

			// Fetch the confirmed outputs this transaction references.
			// The mempool is deliberately not consulted: a parent pending
			// in the pool shows up as a missing input and becomes an
			// ordering dependency instead.
			let utxos = match self.chain.fetch_utxo_view(&tx.raw) {
				Ok(utxos) => utxos,
				Err(err) => {
					warn!(target: "miner", "Unable to fetch utxo view for tx {}: {}", tx.hash, err);
					continue;
				}
			};

			let mut depends_on = HashSet::new();
			for input in &tx.raw.inputs {
				let parent = input.previous_output.hash;
				let satisfied = utxos
					.lookup_entry(&parent)
					.map(|entry| !entry.is_output_spent(input.previous_output.index))
					.unwrap_or(false);
				if satisfied {
					continue;
				}

				if !self.tx_source.have_transaction(&parent) {
					trace!(
						target: "miner",
						"Skipping tx {} because it references unspent output {:?} which is not available",
						tx.hash,
						input.previous_output
					);
					continue 'mempool;
				}

				// The parent is pending in the source pool, so this
				// transaction must be ordered after it.
				depends_on.insert(parent);
			}

			// Metadata the queue arbitrates on: recomputed priority, the
			// truncating fee rate and the admin flag.
			let priority = calc_priority(&tx.raw, &utxos, next_height);
			let fee_per_kb = desc.fee * 1000 / tx.serialized_size() as u64;
			let is_admin = is_admin_transaction(&tx.raw);

			let candidate = CandidateTransaction {
				fee: desc.fee,
				priority,
				fee_per_kb,
				is_admin,
				depends_on,
				transaction: tx,
			};

			if candidate.depends_on.is_empty() {
				queue.push(candidate);
			} else {
				for parent in &candidate.depends_on {
					dependers.entry(*parent).or_insert_with(Vec::new).push(candidate.transaction.hash);
				}
				parked.insert(candidate.transaction.hash, candidate);
			}

			// Keep the referenced outputs available for later candidates
			// so they are not fetched twice.
			block_utxos.merge(utxos);
		}

		trace!(target: "miner", "Priority queue len {}, dependers len {}", queue.len(), dependers.len());

		// The running block size starts with the worst case header and
		// transaction count reservation plus the coinbase.
		let mut block_size = BLOCK_HEADER_OVERHEAD + coinbase.serialized_size() as u32;
		let mut block_sigops = coinbase_sigops;
		let mut total_fees = 0u64;

		// Choose which transactions make it into the block.
		while let Some(candidate) = queue.pop() {
			let tx_hash = candidate.transaction.hash;
			let tx_size = candidate.transaction.serialized_size() as u32;

			// Enforce maximum block size. Also check for overflow.
			let block_plus_tx = match block_size.checked_add(tx_size) {
				Some(size) if size < self.policy.block_max_size => size,
				_ => {
					trace!(target: "miner", "Skipping tx {} because it would exceed the max block size", tx_hash);
					log_skipped_dependents(&tx_hash, &dependers);
					continue;
				}
			};

			// Enforce maximum signature operations per block, before and
			// after resolving pay-to-script-hash redeem scripts through
			// the working view. Also check for overflow.
			let base_sigops = transaction_sigops(&candidate.transaction);
			match block_sigops.checked_add(base_sigops) {
				Some(total) if total <= self.consensus.max_block_sigops => (),
				_ => {
					trace!(target: "miner", "Skipping tx {} because it would exceed the maximum sigops per block", tx_hash);
					log_skipped_dependents(&tx_hash, &dependers);
					continue;
				}
			}

			let p2sh_sigops = match transaction_p2sh_sigops(&candidate.transaction, &block_utxos) {
				Ok(sigops) => sigops,
				Err(err) => {
					trace!(target: "miner", "Skipping tx {} due to error counting p2sh sigops: {}", tx_hash, err);
					log_skipped_dependents(&tx_hash, &dependers);
					continue;
				}
			};
			let tx_sigops = match base_sigops.checked_add(p2sh_sigops) {
				Some(sigops) => sigops,
				None => {
					trace!(target: "miner", "Skipping tx {} because its sigop count overflows", tx_hash);
					log_skipped_dependents(&tx_hash, &dependers);
					continue;
				}
			};
			match block_sigops.checked_add(tx_sigops) {
				Some(total) if total <= self.consensus.max_block_sigops => (),
				_ => {
					trace!(target: "miner", "Skipping tx {} because it would exceed the maximum sigops per block (p2sh)", tx_hash);
					log_skipped_dependents(&tx_hash, &dependers);
					continue;
				}
			}

			// Skip free transactions once the block is larger than the
			// minimum block size.
			if sorted_by_fee && candidate.fee_per_kb < self.policy.tx_min_free_fee && block_plus_tx >= self.policy.block_min_size {
				trace!(
					target: "miner",
					"Skipping tx {} with feePerKB {} < TxMinFreeFee {} and block size {} >= minBlockSize {}",
					tx_hash,
					candidate.fee_per_kb,
					self.policy.tx_min_free_fee,
					block_plus_tx,
					self.policy.block_min_size
				);
				log_skipped_dependents(&tx_hash, &dependers);
				continue;
			}

			// Prioritize by fee per kilobyte once the high-priority area
			// is filled or there are no more high-priority transactions.
			if !sorted_by_fee && (block_plus_tx >= self.policy.block_priority_size || candidate.priority <= MIN_HIGH_PRIORITY) {
				trace!(
					target: "miner",
					"Switching to sort by fees per kilobyte blockSize {} >= BlockPrioritySize {} || priority {:.2} <= minHighPriority {:.2}",
					block_plus_tx,
					self.policy.block_priority_size,
					candidate.priority,
					MIN_HIGH_PRIORITY
				);

				sorted_by_fee = true;
				queue.set_strategy(OrderingStrategy::ByFeeRate);

				// Put the transaction back and let it compete under the
				// fee order unless it exactly tops off the high-priority
				// area, in which case it is the area's final member.
				if block_plus_tx > self.policy.block_priority_size || candidate.priority < MIN_HIGH_PRIORITY {
					queue.push(candidate);
					continue;
				}
			}

			// Ensure the transaction inputs pass all of the necessary
			// preconditions before allowing it to be added to the block.
			if let Err(err) = check_transaction_inputs(&candidate.transaction, next_height, &block_utxos, &self.consensus) {
				trace!(target: "miner", "Skipping tx {} due to input check: {}", tx_hash, err);
				log_skipped_dependents(&tx_hash, &dependers);
				continue;
			}
			if let Err(err) = check_transaction_outputs(&candidate.transaction, &key_view) {
				trace!(target: "miner", "Skipping tx {} due to output check: {}", tx_hash, err);
				log_skipped_dependents(&tx_hash, &dependers);
				continue;
			}
			if let Err(err) = validate_transaction_scripts(
				&candidate.transaction,
				&block_utxos,
				&key_view,
				&VerificationFlags::standard(),
				&self.sig_cache,
				&self.hash_cache,
			) {
				trace!(target: "miner", "Skipping tx {} due to script validation: {}", tx_hash, err);
				log_skipped_dependents(&tx_hash, &dependers);
				continue;
			}

			// Spend the inputs in the working view and publish the new
			// outputs so later transactions can reference this one and
			// double spends are caught.
			block_utxos.spend_transaction_inputs(&candidate.transaction.raw);
			block_utxos.add_transaction_outputs(tx_hash, &candidate.transaction.raw, next_height);

			block_size = block_plus_tx;
			block_sigops += tx_sigops;
			total_fees += candidate.fee;
			fees.push(candidate.fee as i64);
			sigop_counts.push(tx_sigops);

			trace!(
				target: "miner",
				"Adding tx {} (priority {:.2}, feePerKB {})",
				tx_hash,
				candidate.priority,
				candidate.fee_per_kb
			);
			block_transactions.push(candidate.transaction);

			// Unpark any children that no longer wait on other parents.
			if let Some(children) = dependers.remove(&tx_hash) {
				for child_hash in children {
					let freed = match parked.get_mut(&child_hash) {
						Some(child) => {
							child.depends_on.remove(&tx_hash);
							child.depends_on.is_empty()
						}
						None => false,
					};
					if freed {
						if let Some(child) = parked.remove(&child_hash) {
							queue.push(child);
						}
					}
				}
			}
		}

		// Replace the worst case transaction count reservation with the
		// actual varint size, settle the fees into the coinbase and shrink
		// a zero value coinbase to an unspendable output.
		let transaction_count = block_transactions.len() + 1;
		block_size -= MAX_VAR_INT_PAYLOAD as u32 - CompactInteger::serialized_size(transaction_count as u64) as u32;

		let mut coinbase = coinbase.raw;
		coinbase.outputs[0].value += total_fees;
		fees[0] = -(total_fees as i64);

		if coinbase.outputs[0].value == 0 {
			let null_script = Builder::build_unspendable();
			block_size -= (coinbase.outputs[0].script_pubkey.len() - null_script.len()) as u32;
			coinbase.outputs[0].script_pubkey = null_script.into();
		}

		// The timestamp is potentially adjusted to come after the median
		// time of the last several blocks.
		let time = median_adjusted_time(&best, &*self.time_source);
		let bits = self.chain.calc_next_required_difficulty().map_err(Error::Chain)?;

		let mut transactions = Vec::with_capacity(transaction_count);
		transactions.push(IndexedTransaction::from_raw(coinbase));
		transactions.extend(block_transactions);

		let hashes: Vec<SHA256D> = transactions.iter().map(|tx| tx.hash).collect();
		let mut header = BlockHeader {
			version: GENERATED_BLOCK_VERSION,
			previous_header_hash: best.hash,
			merkle_root_hash: merkle_root(&hashes),
			time,
			bits,
			height: next_height,
			size: block_size,
			nonce: 0,
			signature: Default::default(),
		};
		header.sign(validate_key)?;

		let block = Block::new(header, transactions.into_iter().map(|tx| tx.raw).collect());

		// Finally, run the full static consensus checks the chain applies
		// on connect. A failure here is a selection bug, not an input
		// problem; the template must not be handed out.
		self.chain
			.check_connect_block(&IndexedBlock::from_raw(block.clone()))
			.map_err(Error::Assemble)?;

		debug!(
			target: "miner",
			"Created new block template ({} transactions, {} in fees, {} signature operations, {} bytes)",
			block.transactions.len(),
			total_fees,
			block_sigops,
			block_size
		);

		Ok(BlockTemplate {
			block,
			fees,
			sigop_counts,
			height: next_height,
			valid_pay_address: pay_to_address.is_some(),
		})
	}

	/// Refreshes the timestamp of an already assembled block to the current
	/// adjusted time and re-signs the header. Nothing else is touched; on
	/// networks where the required difficulty moves with time the caller
	/// asks the chain for fresh bits itself.
	pub fn update_block_time(&self, block: &mut Block, validate_key: &Private) -> Result<(), Error> {
		let best = self.chain.best_state();
		block.block_header.time = median_adjusted_time(&best, &*self.time_source);
		block.block_header.sign(validate_key)?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::transaction_source::TransactionDesc;
	use chain::constants::SEQUENCE_FINAL;
	use chain::OutPoint;
	use keys::{AddressHash, KeyPair, Public, Type};
	use network::Network;
	use primitives::compact::Compact;
	use script::{signature_hash, SighashType, ThreadId};
	use ser::deserialize;
	use storage::{BlockChain, KeyId, KeySet, UtxoEntry};
	use std::collections::BTreeMap;
	use std::time::Duration;

	const TEST_BITS: u32 = 0x2100_ffff;
	const MEDIAN_TIME: u32 = 1_000;
	const WALL_TIME: u64 = 2_000;

	struct TestChain {
		best: BestState,
		utxos: HashMap<SHA256D, UtxoEntry>,
		admin_keys: HashMap<KeySet, Vec<Public>>,
		max_block_size: usize,
	}

	impl TestChain {
		fn at_height(height: u32) -> Self {
			TestChain {
				best: BestState {
					hash: bitcrypto::dhash256(b"best block"),
					height,
					median_time: MEDIAN_TIME,
				},
				utxos: HashMap::new(),
				admin_keys: HashMap::new(),
				max_block_size: 1_000_000,
			}
		}
	}

	impl BlockChain for TestChain {
		fn best_state(&self) -> BestState {
			self.best.clone()
		}

		fn fetch_utxo_view(&self, transaction: &Transaction) -> Result<UtxoViewpoint, storage::Error> {
			let mut view = UtxoViewpoint::new();
			for input in &transaction.inputs {
				if let Some(entry) = self.utxos.get(&input.previous_output.hash) {
					view.add_entry(input.previous_output.hash, entry.clone());
				}
			}
			Ok(view)
		}

		fn last_key_id(&self) -> KeyId {
			0
		}

		fn admin_key_sets(&self) -> HashMap<KeySet, Vec<Public>> {
			self.admin_keys.clone()
		}

		fn key_ids(&self) -> BTreeMap<KeyId, Public> {
			BTreeMap::new()
		}

		fn calc_next_required_difficulty(&self) -> Result<Compact, storage::Error> {
			Ok(TEST_BITS.into())
		}

		fn check_connect_block(&self, block: &IndexedBlock) -> Result<(), storage::Error> {
			let header = &block.header.raw;
			if header.version != GENERATED_BLOCK_VERSION {
				return Err(storage::Error::CannotConnect("bad version".into()));
			}
			if header.height != self.best.height + 1 {
				return Err(storage::Error::CannotConnect("bad height".into()));
			}
			if header.previous_header_hash != self.best.hash {
				return Err(storage::Error::CannotConnect("bad parent".into()));
			}
			if header.time <= self.best.median_time {
				return Err(storage::Error::CannotConnect("timestamp not past median".into()));
			}
			if block.merkle_root() != header.merkle_root_hash {
				return Err(storage::Error::CannotConnect("bad merkle root".into()));
			}
			match block.transactions.first() {
				Some(coinbase) if coinbase.raw.is_coinbase() => (),
				_ => return Err(storage::Error::CannotConnect("missing coinbase".into())),
			}
			if block.transactions.iter().skip(1).any(|tx| tx.raw.is_coinbase()) {
				return Err(storage::Error::CannotConnect("extra coinbase".into()));
			}
			if block.size() > self.max_block_size {
				return Err(storage::Error::CannotConnect("oversized block".into()));
			}
			if (block.size() as u32) > header.size {
				return Err(storage::Error::CannotConnect("understated size".into()));
			}
			Ok(())
		}
	}

	#[derive(Default)]
	struct TestTransactionSource {
		descs: Vec<TransactionDesc>,
		claimed: HashSet<SHA256D>,
	}

	impl TransactionSource for TestTransactionSource {
		fn mining_descs(&self) -> Vec<TransactionDesc> {
			self.descs.clone()
		}

		fn have_transaction(&self, hash: &SHA256D) -> bool {
			self.claimed.contains(hash) || self.descs.iter().any(|desc| desc.transaction.hash == *hash)
		}
	}

	struct FixedTime(u64);

	impl MedianTimeSource for FixedTime {
		fn adjusted_time(&self) -> Duration {
			Duration::from_secs(self.0)
		}
	}

	fn key_pair(byte: u8) -> KeyPair {
		KeyPair::from_private(Private::from_secret([byte; 32])).unwrap()
	}

	fn validator() -> Private {
		Private::from_secret([42u8; 32])
	}

	fn test_policy() -> Policy {
		Policy {
			block_max_size: 50_000,
			block_min_size: 0,
			block_priority_size: 0,
			tx_min_free_fee: 0,
		}
	}

	fn assembler(chain: TestChain, source: TestTransactionSource, policy: Policy, time: u64) -> BlockAssembler {
		assembler_with_consensus(chain, source, policy, ConsensusParams::new(Network::Unitest), time)
	}

	fn assembler_with_consensus(
		chain: TestChain,
		source: TestTransactionSource,
		policy: Policy,
		consensus: ConsensusParams,
		time: u64,
	) -> BlockAssembler {
		BlockAssembler::new(
			policy,
			consensus,
			Arc::new(chain),
			Arc::new(source),
			Arc::new(FixedTime(time)),
			Arc::new(SigCache::default()),
			Arc::new(HashCache::new()),
		)
	}

	fn add_p2pkh_utxo(chain: &mut TestChain, tag: &[u8], key: &KeyPair, value: u64, height: u32) -> (SHA256D, Script) {
		let script = Builder::build_pay_to_public_key_hash(&key.public().address_hash());
		let hash = bitcrypto::dhash256(tag);
		let output = TransactionOutput {
			value,
			script_pubkey: script.to_bytes(),
		};
		chain.utxos.insert(hash, UtxoEntry::new(vec![Some(output)], height, false));
		(hash, script)
	}

	fn pay_output(key: &KeyPair, value: u64) -> TransactionOutput {
		TransactionOutput {
			value,
			script_pubkey: Builder::build_pay_to_public_key_hash(&key.public().address_hash()).into(),
		}
	}

	fn signed_spend(parent: SHA256D, subscript: &Script, signer: &KeyPair, outputs: Vec<TransactionOutput>) -> IndexedTransaction {
		let mut transaction = Transaction {
			version: 1,
			inputs: vec![TransactionInput {
				previous_output: OutPoint { hash: parent, index: 0 },
				script_sig: Default::default(),
				sequence: SEQUENCE_FINAL,
			}],
			outputs,
			lock_time: 0,
		};

		let sighash = signature_hash(&transaction, 0, subscript, SighashType::All).unwrap();
		let mut signature: Vec<u8> = signer.private().sign(&sighash).unwrap().into();
		signature.push(SighashType::All.to_byte());
		transaction.inputs[0].script_sig = Builder::default()
			.push_data(&signature)
			.push_data(signer.public())
			.into_bytes();

		transaction.into()
	}

	fn desc(transaction: IndexedTransaction, fee: u64) -> TransactionDesc {
		TransactionDesc {
			transaction,
			fee,
			starting_priority: 0.0,
		}
	}

	fn template_hashes(template: &BlockTemplate) -> Vec<SHA256D> {
		template.block.transactions.iter().map(Transaction::hash).collect()
	}

	fn assert_template_invariants(template: &BlockTemplate, policy: &Policy, consensus: &ConsensusParams) {
		assert_eq!(template.fees.iter().sum::<i64>(), 0);
		assert_eq!(template.fees.len(), template.block.transactions.len());
		assert_eq!(template.sigop_counts.len(), template.block.transactions.len());
		assert!(template.block.block_header.size <= policy.block_max_size);
		assert!(template.sigop_counts.iter().sum::<usize>() <= consensus.max_block_sigops);
		assert!(template.block.block_header.time > MEDIAN_TIME);
		assert_eq!(template.block.merkle_root(), template.block.block_header.merkle_root_hash);
	}

	#[test]
	fn test_empty_pool_builds_coinbase_only_block() {
		let generator = assembler(TestChain::at_height(99), Default::default(), test_policy(), WALL_TIME);
		let template = generator.new_block_template(None, &validator()).unwrap();

		assert_eq!(template.height, 100);
		assert_eq!(template.block.transactions.len(), 1);
		assert_eq!(template.fees, vec![0]);
		assert_eq!(template.sigop_counts, vec![0]);
		assert!(!template.valid_pay_address);

		let coinbase = &template.block.transactions[0];
		assert!(coinbase.is_coinbase());
		assert_eq!(coinbase.outputs[0].value, 50);
		assert!(Script::new(coinbase.outputs[0].script_pubkey.clone()).is_anyone_can_spend());
		assert_eq!(coinbase.lock_time, 100);

		let header = &template.block.block_header;
		assert_eq!(header.version, 4);
		assert_eq!(header.height, 100);
		assert_eq!(header.time, WALL_TIME as u32);
		assert_eq!(header.bits, TEST_BITS.into());
		assert_template_invariants(&template, &test_policy(), &ConsensusParams::new(Network::Unitest));
	}

	#[test]
	fn test_timestamp_is_clamped_past_median_time() {
		// wall clock lags the chain; the header must still move past the
		// median time of the last blocks
		let generator = assembler(TestChain::at_height(99), Default::default(), test_policy(), 500);
		let template = generator.new_block_template(None, &validator()).unwrap();
		assert_eq!(template.block.block_header.time, MEDIAN_TIME + 1);
	}

	#[test]
	fn test_coinbase_pays_to_provided_address() {
		let address = Address {
			kind: Type::P2PKH,
			hash: AddressHash::default(),
		};
		let generator = assembler(TestChain::at_height(99), Default::default(), test_policy(), WALL_TIME);
		let template = generator.new_block_template(Some(&address), &validator()).unwrap();

		assert!(template.valid_pay_address);
		let script = Script::new(template.block.transactions[0].outputs[0].script_pubkey.clone());
		assert!(script.is_pay_to_public_key_hash());
	}

	#[test]
	fn test_two_independent_transactions_ordered_by_fee_rate() {
		let key = key_pair(1);
		let mut chain = TestChain::at_height(99);
		let (parent_a, script_a) = add_p2pkh_utxo(&mut chain, b"parent a", &key, 300, 10);
		let (parent_b, script_b) = add_p2pkh_utxo(&mut chain, b"parent b", &key, 240, 10);

		let tx_high_fee = signed_spend(parent_a, &script_a, &key, vec![pay_output(&key, 200)]);
		let tx_low_fee = signed_spend(parent_b, &script_b, &key, vec![pay_output(&key, 200)]);
		let high_hash = tx_high_fee.hash;
		let low_hash = tx_low_fee.hash;

		let source = TestTransactionSource {
			// insertion order deliberately disagrees with the fee order
			descs: vec![desc(tx_low_fee, 40), desc(tx_high_fee, 100)],
			claimed: Default::default(),
		};

		let generator = assembler(chain, source, test_policy(), WALL_TIME);
		let template = generator.new_block_template(None, &validator()).unwrap();

		let hashes = template_hashes(&template);
		assert_eq!(hashes.len(), 3);
		assert_eq!(hashes[1], high_hash);
		assert_eq!(hashes[2], low_hash);
		assert_eq!(template.fees, vec![-140, 100, 40]);
		assert_eq!(template.block.transactions[0].outputs[0].value, 50 + 140);
		assert_template_invariants(&template, &test_policy(), &ConsensusParams::new(Network::Unitest));
	}

	#[test]
	fn test_parent_child_accepted_in_order() {
		let key = key_pair(1);
		let child_key = key_pair(2);
		let mut chain = TestChain::at_height(99);
		let (funding, funding_script) = add_p2pkh_utxo(&mut chain, b"funding", &key, 1_000, 10);

		let parent = signed_spend(funding, &funding_script, &key, vec![pay_output(&child_key, 900)]);
		let parent_hash = parent.hash;
		let parent_script = Script::new(parent.raw.outputs[0].script_pubkey.clone());
		let child = signed_spend(parent_hash, &parent_script, &child_key, vec![pay_output(&key, 850)]);
		let child_hash = child.hash;

		let source = TestTransactionSource {
			// the child is offered before its parent
			descs: vec![desc(child, 50), desc(parent, 100)],
			claimed: Default::default(),
		};

		let generator = assembler(chain, source, test_policy(), WALL_TIME);
		let template = generator.new_block_template(None, &validator()).unwrap();

		let hashes = template_hashes(&template);
		assert_eq!(hashes.len(), 3);
		assert_eq!(hashes[1], parent_hash);
		assert_eq!(hashes[2], child_hash);
		assert_eq!(template.fees, vec![-150, 100, 50]);
	}

	#[test]
	fn test_skipped_parent_stalls_child() {
		let key = key_pair(1);
		let child_key = key_pair(2);
		let mut chain = TestChain::at_height(99);
		let (funding, funding_script) = add_p2pkh_utxo(&mut chain, b"funding", &key, 1_000, 10);

		// padded outputs make the parent overflow the tiny block budget
		let mut parent_outputs = vec![pay_output(&child_key, 900)];
		parent_outputs.extend((0..20).map(|_| pay_output(&key, 1)));
		let parent = signed_spend(funding, &funding_script, &key, parent_outputs);
		let parent_script = Script::new(parent.raw.outputs[0].script_pubkey.clone());
		let child = signed_spend(parent.hash, &parent_script, &child_key, vec![pay_output(&key, 850)]);

		let mut policy = test_policy();
		policy.block_max_size = BLOCK_HEADER_OVERHEAD + 500;

		let source = TestTransactionSource {
			descs: vec![desc(parent, 80), desc(child, 50)],
			claimed: Default::default(),
		};

		let generator = assembler(chain, source, policy, WALL_TIME);
		let template = generator.new_block_template(None, &validator()).unwrap();

		// neither the oversized parent nor its dependent child made it
		assert_eq!(template.block.transactions.len(), 1);
	}

	#[test]
	fn test_unresolvable_dependency_stalls_candidate() {
		let key = key_pair(1);
		let chain = TestChain::at_height(99);

		// the claimed parent never shows up in the mining descriptors
		let phantom_parent = bitcrypto::dhash256(b"phantom");
		let orphan = signed_spend(phantom_parent, &Builder::build_anyone_can_spend(), &key, vec![pay_output(&key, 10)]);

		let mut claimed = HashSet::new();
		claimed.insert(phantom_parent);
		let source = TestTransactionSource {
			descs: vec![desc(orphan, 5)],
			claimed,
		};

		let generator = assembler(chain, source, test_policy(), WALL_TIME);
		let template = generator.new_block_template(None, &validator()).unwrap();
		assert_eq!(template.block.transactions.len(), 1);
	}

	#[test]
	fn test_missing_parent_drops_candidate_entirely() {
		let key = key_pair(1);
		let chain = TestChain::at_height(99);

		// parent neither confirmed nor in the pool
		let unknown_parent = bitcrypto::dhash256(b"unknown");
		let orphan = signed_spend(unknown_parent, &Builder::build_anyone_can_spend(), &key, vec![pay_output(&key, 10)]);

		let source = TestTransactionSource {
			descs: vec![desc(orphan, 5)],
			claimed: Default::default(),
		};

		let generator = assembler(chain, source, test_policy(), WALL_TIME);
		let template = generator.new_block_template(None, &validator()).unwrap();
		assert_eq!(template.block.transactions.len(), 1);
	}

	#[test]
	fn test_high_priority_transaction_exactly_fills_priority_area() {
		let key = key_pair(1);
		let mut chain = TestChain::at_height(99);
		// deep, valuable parent makes the spend high priority
		let (parent_a, script_a) = add_p2pkh_utxo(&mut chain, b"old parent", &key, 1_000_000_000_000, 1);
		let (parent_b, script_b) = add_p2pkh_utxo(&mut chain, b"new parent", &key, 2_000, 99);

		let tx_priority = signed_spend(parent_a, &script_a, &key, vec![pay_output(&key, 999_999_999_990)]);
		let tx_fee = signed_spend(parent_b, &script_b, &key, vec![pay_output(&key, 1_500)]);
		let priority_hash = tx_priority.hash;
		let fee_hash = tx_fee.hash;

		let coinbase_size = create_coinbase_transaction(standard_coinbase_script(), 100, 50, None).serialized_size() as u32;
		let mut policy = test_policy();
		policy.block_priority_size = BLOCK_HEADER_OVERHEAD + coinbase_size + tx_priority.serialized_size() as u32;

		let source = TestTransactionSource {
			descs: vec![desc(tx_fee, 500), desc(tx_priority, 10)],
			claimed: Default::default(),
		};

		let generator = assembler(chain, source, policy, WALL_TIME);
		let template = generator.new_block_template(None, &validator()).unwrap();

		// the high-priority transaction tops off the priority area and is
		// admitted despite its lower fee rate
		let hashes = template_hashes(&template);
		assert_eq!(hashes[1], priority_hash);
		assert_eq!(hashes[2], fee_hash);
	}

	#[test]
	fn test_priority_to_fee_transition_repushes_candidate() {
		let key = key_pair(1);
		let mut chain = TestChain::at_height(99);
		let (parent_a, script_a) = add_p2pkh_utxo(&mut chain, b"old parent", &key, 1_000_000_000_000, 1);
		let (parent_b, script_b) = add_p2pkh_utxo(&mut chain, b"new parent", &key, 2_000, 99);

		let tx_priority = signed_spend(parent_a, &script_a, &key, vec![pay_output(&key, 999_999_999_990)]);
		let tx_fee = signed_spend(parent_b, &script_b, &key, vec![pay_output(&key, 1_500)]);
		let priority_hash = tx_priority.hash;
		let fee_hash = tx_fee.hash;

		// priority area too small for anything: the first pop flips the
		// ordering and goes back into the queue
		let mut policy = test_policy();
		policy.block_priority_size = 1;

		let source = TestTransactionSource {
			descs: vec![desc(tx_priority, 10), desc(tx_fee, 500)],
			claimed: Default::default(),
		};

		let generator = assembler(chain, source, policy, WALL_TIME);
		let template = generator.new_block_template(None, &validator()).unwrap();

		let hashes = template_hashes(&template);
		assert_eq!(hashes[1], fee_hash);
		assert_eq!(hashes[2], priority_hash);
	}

	fn admin_fixture(chain: &mut TestChain, root_key: &KeyPair) -> IndexedTransaction {
		chain.admin_keys.insert(KeySet::Root, vec![root_key.public().clone()]);

		let thread_script = Builder::build_admin_thread(ThreadId::Root);
		let thread_outpoint = bitcrypto::dhash256(b"root thread");
		chain.utxos.insert(
			thread_outpoint,
			UtxoEntry::new(
				vec![Some(TransactionOutput {
					value: 0,
					script_pubkey: thread_script.to_bytes(),
				})],
				10,
				false,
			),
		);

		// continue the thread and provision a new key
		let mut payload = vec![0x01];
		payload.extend_from_slice(key_pair(9).public());
		let outputs = vec![
			TransactionOutput {
				value: 0,
				script_pubkey: thread_script.to_bytes(),
			},
			TransactionOutput {
				value: 0,
				script_pubkey: Builder::build_null_data(&payload).into(),
			},
		];

		signed_spend(thread_outpoint, &thread_script, root_key, outputs)
	}

	#[test]
	fn test_admin_transaction_selected_first_under_both_orders() {
		for block_priority_size in &[0u32, 50_000] {
			let key = key_pair(1);
			let root_key = key_pair(3);
			let mut chain = TestChain::at_height(99);
			let (parent, parent_script) = add_p2pkh_utxo(&mut chain, b"parent", &key, 10_000, 10);

			let admin_tx = admin_fixture(&mut chain, &root_key);
			let admin_hash = admin_tx.hash;
			let normal_tx = signed_spend(parent, &parent_script, &key, vec![pay_output(&key, 9_000)]);
			let normal_hash = normal_tx.hash;

			let mut policy = test_policy();
			policy.block_priority_size = *block_priority_size;

			let source = TestTransactionSource {
				descs: vec![desc(normal_tx, 1_000), desc(admin_tx, 0)],
				claimed: Default::default(),
			};

			let generator = assembler(chain, source, policy, WALL_TIME);
			let template = generator.new_block_template(None, &validator()).unwrap();

			let hashes = template_hashes(&template);
			assert_eq!(hashes.len(), 3);
			assert_eq!(hashes[1], admin_hash, "admin tx must lead with priority size {}", block_priority_size);
			assert_eq!(hashes[2], normal_hash);
		}
	}

	#[test]
	fn test_zero_value_coinbase_shrinks_to_null_script() {
		// six halvings in: the subsidy is gone, and with no fees the
		// coinbase pays nothing
		let generator = assembler(TestChain::at_height(899), Default::default(), test_policy(), WALL_TIME);
		let template = generator.new_block_template(None, &validator()).unwrap();

		let coinbase = &template.block.transactions[0];
		assert_eq!(coinbase.outputs[0].value, 0);
		let script = Script::new(coinbase.outputs[0].script_pubkey.clone());
		assert!(script.is_null_data_script());
		assert_eq!(script.len(), 1);
		assert_eq!(template.fees, vec![0]);
		assert_eq!(template.height, 900);
	}

	#[test]
	fn test_free_transaction_cutoff() {
		let key = key_pair(1);
		let mut chain = TestChain::at_height(99);
		let (parent, parent_script) = add_p2pkh_utxo(&mut chain, b"parent", &key, 10_000, 98);

		// fee rate ends up far below the free-fee threshold
		let transaction = signed_spend(parent, &parent_script, &key, vec![pay_output(&key, 9_999)]);
		let source = TestTransactionSource {
			descs: vec![desc(transaction, 1)],
			claimed: Default::default(),
		};

		let mut policy = test_policy();
		policy.tx_min_free_fee = 1_000;

		let generator = assembler(chain, source, policy, WALL_TIME);
		let template = generator.new_block_template(None, &validator()).unwrap();
		assert_eq!(template.block.transactions.len(), 1);
	}

	#[test]
	fn test_sigop_budget_excludes_transaction() {
		let key = key_pair(1);
		let mut chain = TestChain::at_height(99);
		let (parent, parent_script) = add_p2pkh_utxo(&mut chain, b"parent", &key, 10_000, 10);

		let transaction = signed_spend(parent, &parent_script, &key, vec![pay_output(&key, 9_000)]);
		let source = TestTransactionSource {
			descs: vec![desc(transaction, 1_000)],
			claimed: Default::default(),
		};

		let mut consensus = ConsensusParams::new(Network::Unitest);
		consensus.max_block_sigops = 0;

		let generator = assembler_with_consensus(chain, source, test_policy(), consensus, WALL_TIME);
		let template = generator.new_block_template(None, &validator()).unwrap();
		assert_eq!(template.block.transactions.len(), 1);
	}

	#[test]
	fn test_identical_inputs_produce_identical_blocks() {
		let build = || {
			let key = key_pair(1);
			let mut chain = TestChain::at_height(99);
			let (parent, parent_script) = add_p2pkh_utxo(&mut chain, b"parent", &key, 10_000, 10);
			let transaction = signed_spend(parent, &parent_script, &key, vec![pay_output(&key, 9_000)]);
			let source = TestTransactionSource {
				descs: vec![desc(transaction, 1_000)],
				claimed: Default::default(),
			};

			let generator = assembler(chain, source, test_policy(), WALL_TIME);
			generator.new_block_template(None, &validator()).unwrap()
		};

		let first = build();
		let second = build();
		// deterministic signing makes the templates identical to the byte
		assert_eq!(serialize(&first.block), serialize(&second.block));
	}

	#[test]
	fn test_block_serialization_round_trip() {
		let generator = assembler(TestChain::at_height(99), Default::default(), test_policy(), WALL_TIME);
		let template = generator.new_block_template(None, &validator()).unwrap();

		let serialized = serialize(&template.block);
		let restored: Block = deserialize(serialized.as_ref()).unwrap();
		assert_eq!(restored, template.block);
	}

	#[test]
	fn test_update_block_time_only_touches_header() {
		let key = key_pair(1);
		let mut chain = TestChain::at_height(99);
		let (parent, parent_script) = add_p2pkh_utxo(&mut chain, b"parent", &key, 10_000, 10);
		let transaction = signed_spend(parent, &parent_script, &key, vec![pay_output(&key, 9_000)]);
		let source = TestTransactionSource {
			descs: vec![desc(transaction, 1_000)],
			claimed: Default::default(),
		};

		let generator = assembler(chain, source, test_policy(), WALL_TIME);
		let template = generator.new_block_template(None, &validator()).unwrap();

		let mut block = template.block.clone();
		let refresher = assembler(TestChain::at_height(99), Default::default(), test_policy(), WALL_TIME + 90);
		refresher.update_block_time(&mut block, &validator()).unwrap();

		assert_eq!(block.block_header.time, (WALL_TIME + 90) as u32);
		assert_ne!(block.block_header.signature, template.block.block_header.signature);

		// everything else is untouched
		assert_eq!(block.transactions, template.block.transactions);
		assert_eq!(block.block_header.merkle_root_hash, template.block.block_header.merkle_root_hash);
		assert_eq!(block.block_header.size, template.block.block_header.size);
		assert_eq!(block.block_header.bits, template.block.block_header.bits);

		let public = KeyPair::from_private(validator()).unwrap().public().clone();
		assert_eq!(block.block_header.verify_signature(&public), Ok(true));
	}

	#[test]
	fn test_template_invariants_on_mixed_block() {
		let key = key_pair(1);
		let root_key = key_pair(3);
		let mut chain = TestChain::at_height(99);
		let (parent_a, script_a) = add_p2pkh_utxo(&mut chain, b"parent a", &key, 5_000, 10);
		let (parent_b, script_b) = add_p2pkh_utxo(&mut chain, b"parent b", &key, 3_000, 20);

		let admin_tx = admin_fixture(&mut chain, &root_key);
		let tx_a = signed_spend(parent_a, &script_a, &key, vec![pay_output(&key, 4_000)]);
		let tx_b = signed_spend(parent_b, &script_b, &key, vec![pay_output(&key, 2_500)]);

		let source = TestTransactionSource {
			descs: vec![desc(tx_a, 1_000), desc(admin_tx, 0), desc(tx_b, 500)],
			claimed: Default::default(),
		};

		let policy = test_policy();
		let consensus = ConsensusParams::new(Network::Unitest);
		let generator = assembler(chain, source, policy.clone(), WALL_TIME);
		let template = generator.new_block_template(None, &validator()).unwrap();

		assert_eq!(template.block.transactions.len(), 4);
		assert_eq!(template.fees[0], -1_500);
		assert_template_invariants(&template, &policy, &consensus);
	}
}
