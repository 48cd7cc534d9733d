use crate::error::TransactionError;
use bitcrypto::dhash160;
use chain::IndexedTransaction;
use script::{check_multisig, check_signature, Error as ScriptError, HashCache, Script, ScriptType, SigCache, VerificationFlags};
use storage::{KeySet, KeyViewpoint, UtxoViewpoint};

/// Verifies the spend authorization of every input of the passed
/// transaction against the scripts of the outputs it spends, using the
/// signature and sighash caches as accelerators. Administrative thread
/// spends are additionally authorized against the governance key sets.
pub fn validate_transaction_scripts(
	transaction: &IndexedTransaction,
	view: &UtxoViewpoint,
	key_view: &KeyViewpoint,
	flags: &VerificationFlags,
	sig_cache: &SigCache,
	hash_cache: &HashCache,
) -> Result<(), TransactionError> {
	trace!(target: "verification", "Tx script verification {}", transaction.hash);

	for (index, input) in transaction.raw.inputs.iter().enumerate() {
		let output = view
			.lookup_entry(&input.previous_output.hash)
			.and_then(|entry| entry.output(input.previous_output.index))
			.ok_or_else(|| TransactionError::UnknownReference(input.previous_output.hash))?;

		let script_pubkey = Script::new(output.script_pubkey.clone());
		let script_sig = Script::new(input.script_sig.clone());

		verify_input(transaction, index, &script_sig, &script_pubkey, key_view, flags, sig_cache, hash_cache)
			.map_err(|err| TransactionError::Signature(index, err))?;
	}

	Ok(())
}

fn verify_input(
	transaction: &IndexedTransaction,
	input_index: usize,
	script_sig: &Script,
	script_pubkey: &Script,
	key_view: &KeyViewpoint,
	flags: &VerificationFlags,
	sig_cache: &SigCache,
	hash_cache: &HashCache,
) -> Result<(), ScriptError> {
	match script_pubkey.script_type() {
		ScriptType::PayToPublicKeyHash => {
			let pushes = script_sig.parse_pushes()?;
			let (signature, pubkey) = match pushes.as_slice() {
				[signature, pubkey] => (*signature, *pubkey),
				_ => return Err(ScriptError::SignatureVerificationFailed),
			};

			// the pubkey must hash to the committed address hash
			if &dhash160(pubkey)[..] != &script_pubkey[3..23] {
				return Err(ScriptError::SignatureVerificationFailed);
			}

			check_signature(
				&transaction.raw,
				&transaction.hash,
				input_index,
				script_pubkey,
				signature,
				pubkey,
				flags,
				sig_cache,
				hash_cache,
			)
		}
		ScriptType::AdminThread => {
			let thread = match script_pubkey.admin_thread_id() {
				Some(thread) => thread,
				None => return Err(ScriptError::NonStandardScript),
			};
			let pushes = script_sig.parse_pushes()?;
			let (signature, pubkey) = match pushes.as_slice() {
				[signature, pubkey] => (*signature, *pubkey),
				_ => return Err(ScriptError::SignatureVerificationFailed),
			};

			// thread spends are authorized by key set membership
			let public = keys::Public::from_slice(pubkey).map_err(|_| ScriptError::InvalidPublicKeyEncoding)?;
			if !key_view.contains_key(KeySet::from(thread), &public) {
				return Err(ScriptError::SignatureVerificationFailed);
			}

			check_signature(
				&transaction.raw,
				&transaction.hash,
				input_index,
				script_pubkey,
				signature,
				pubkey,
				flags,
				sig_cache,
				hash_cache,
			)
		}
		ScriptType::PayToScriptHash if flags.verify_p2sh => {
			let pushes = script_sig.parse_pushes()?;
			let (redeem_bytes, mut signatures) = match pushes.split_last() {
				Some((redeem, signatures)) => (*redeem, signatures),
				None => return Err(ScriptError::SignatureVerificationFailed),
			};

			let redeem = Script::from(redeem_bytes.to_vec());
			if &dhash160(redeem_bytes)[..] != &script_pubkey[2..22] {
				return Err(ScriptError::RedeemScriptMismatch);
			}

			// tolerate the historical extra empty push of multisig spends
			if signatures.first().map_or(false, |first| first.is_empty()) {
				signatures = &signatures[1..];
			}

			let (required, pubkeys) = redeem.parse_multisig().ok_or(ScriptError::NonStandardScript)?;
			check_multisig(
				&transaction.raw,
				&transaction.hash,
				input_index,
				&redeem,
				signatures,
				&pubkeys,
				required as usize,
				flags,
				sig_cache,
				hash_cache,
			)
		}
		ScriptType::NullData => Err(ScriptError::UnspendableOutput),
		_ if script_pubkey.is_anyone_can_spend() => {
			if script_sig.is_empty() {
				Ok(())
			} else {
				Err(ScriptError::SignatureVerificationFailed)
			}
		}
		_ => Err(ScriptError::NonStandardScript),
	}
}
