use crate::cache::{HashCache, SigCache};
use crate::error::Error;
use crate::flags::VerificationFlags;
use crate::script::Script;
use crate::sighash::{signature_hash, SighashType};
use bitcrypto::SHA256D;
use chain::Transaction;
use keys::Public;

/// Verifies a single `(signature, public key)` pair of `transaction`'s
/// input against the subscript of the output it spends. The trailing byte
/// of `signature` is the sighash type. Consults the signature cache before
/// falling back to secp256k1 and feeds both caches on success.
pub fn check_signature(
	transaction: &Transaction,
	transaction_hash: &SHA256D,
	input_index: usize,
	subscript: &Script,
	signature: &[u8],
	pubkey: &[u8],
	flags: &VerificationFlags,
	sig_cache: &SigCache,
	hash_cache: &HashCache,
) -> Result<(), Error> {
	let (sighash_byte, der_signature) = signature.split_last().ok_or(Error::InvalidSignatureEncoding)?;

	// The chain only defines SIGHASH_ALL; anything else is rejected
	// regardless of the strict-encoding flag.
	let sighash_type = SighashType::from_byte(*sighash_byte).ok_or(Error::InvalidSighashType)?;

	if flags.verify_dersig && !is_valid_der_encoding(der_signature) {
		return Err(Error::InvalidSignatureEncoding);
	}
	if flags.verify_strictenc && !is_valid_pubkey_encoding(pubkey) {
		return Err(Error::InvalidPublicKeyEncoding);
	}

	let sighash = match hash_cache.get(transaction_hash, input_index) {
		Some(sighash) => sighash,
		None => {
			let sighash = signature_hash(transaction, input_index, subscript, sighash_type)?;
			hash_cache.insert(*transaction_hash, input_index, sighash);
			sighash
		}
	};

	if sig_cache.contains(&sighash, pubkey, der_signature) {
		return Ok(());
	}

	let public = Public::from_slice(pubkey).map_err(|_| Error::InvalidPublicKeyEncoding)?;
	match public.verify(&sighash, &der_signature.into()) {
		Ok(true) => {
			sig_cache.insert(sighash, pubkey, der_signature);
			Ok(())
		}
		_ => Err(Error::SignatureVerificationFailed),
	}
}

/// Verifies an `m`-of-`n` multisig spend: every signature must match one of
/// the public keys, in key order.
pub fn check_multisig(
	transaction: &Transaction,
	transaction_hash: &SHA256D,
	input_index: usize,
	subscript: &Script,
	signatures: &[&[u8]],
	pubkeys: &[&[u8]],
	required: usize,
	flags: &VerificationFlags,
	sig_cache: &SigCache,
	hash_cache: &HashCache,
) -> Result<(), Error> {
	if signatures.len() < required || signatures.len() > pubkeys.len() {
		return Err(Error::SignatureVerificationFailed);
	}

	let mut key_index = 0;
	for (signature_index, signature) in signatures.iter().enumerate() {
		let remaining_signatures = signatures.len() - signature_index;
		loop {
			// remaining keys cannot satisfy the remaining signatures
			if pubkeys.len() - key_index < remaining_signatures {
				return Err(Error::SignatureVerificationFailed);
			}

			let matched = check_signature(
				transaction,
				transaction_hash,
				input_index,
				subscript,
				signature,
				pubkeys[key_index],
				flags,
				sig_cache,
				hash_cache,
			);
			key_index += 1;
			if matched.is_ok() {
				break;
			}
		}
	}

	Ok(())
}

/// Structural DER check of an ECDSA signature (without the sighash byte):
/// `0x30 <len> 0x02 <r> 0x02 <s>` with minimal, non-negative integers.
fn is_valid_der_encoding(signature: &[u8]) -> bool {
	if signature.len() < 8 || signature.len() > 72 {
		return false;
	}
	if signature[0] != 0x30 || signature[1] as usize != signature.len() - 2 {
		return false;
	}

	let r_len = signature[3] as usize;
	if signature[2] != 0x02 || r_len == 0 || 5 + r_len >= signature.len() {
		return false;
	}
	let s_len = signature[5 + r_len] as usize;
	if signature[4 + r_len] != 0x02 || s_len == 0 || 6 + r_len + s_len != signature.len() {
		return false;
	}

	let r = &signature[4..4 + r_len];
	let s = &signature[6 + r_len..];
	if r[0] & 0x80 != 0 || s[0] & 0x80 != 0 {
		return false;
	}
	// no unnecessary leading zero bytes
	if r_len > 1 && r[0] == 0 && r[1] & 0x80 == 0 {
		return false;
	}
	if s_len > 1 && s[0] == 0 && s[1] & 0x80 == 0 {
		return false;
	}

	true
}

fn is_valid_pubkey_encoding(pubkey: &[u8]) -> bool {
	match pubkey.len() {
		33 => pubkey[0] == 0x02 || pubkey[0] == 0x03,
		65 => pubkey[0] == 0x04,
		_ => false,
	}
}

#[cfg(test)]
mod tests {
	use super::{check_signature, is_valid_pubkey_encoding};
	use crate::builder::Builder;
	use crate::cache::{HashCache, SigCache};
	use crate::error::Error;
	use crate::flags::VerificationFlags;
	use crate::sighash::{signature_hash, SighashType};
	use chain::{OutPoint, Transaction, TransactionInput, TransactionOutput};
	use keys::{KeyPair, Private};

	fn signed_input_fixture() -> (Transaction, KeyPair, Vec<u8>) {
		let key_pair = KeyPair::from_private(Private::from_secret([9u8; 32])).unwrap();
		let script_pubkey = Builder::build_pay_to_public_key_hash(&key_pair.public().address_hash());

		let transaction = Transaction {
			version: 1,
			inputs: vec![TransactionInput {
				previous_output: OutPoint {
					hash: Default::default(),
					index: 0,
				},
				script_sig: Default::default(),
				sequence: 0xffff_ffff,
			}],
			outputs: vec![TransactionOutput {
				value: 10,
				script_pubkey: Builder::build_anyone_can_spend().into(),
			}],
			lock_time: 0,
		};

		let sighash = signature_hash(&transaction, 0, &script_pubkey, SighashType::All).unwrap();
		let mut signature: Vec<u8> = key_pair.private().sign(&sighash).unwrap().into();
		signature.push(SighashType::All.to_byte());

		(transaction, key_pair, signature)
	}

	#[test]
	fn test_check_signature_accepts_valid_input() {
		let (transaction, key_pair, signature) = signed_input_fixture();
		let subscript = Builder::build_pay_to_public_key_hash(&key_pair.public().address_hash());
		let sig_cache = SigCache::default();
		let hash_cache = HashCache::new();

		let result = check_signature(
			&transaction,
			&transaction.hash(),
			0,
			&subscript,
			&signature,
			key_pair.public(),
			&VerificationFlags::standard(),
			&sig_cache,
			&hash_cache,
		);
		assert_eq!(result, Ok(()));

		// the verified triple is now served from the cache
		assert_eq!(sig_cache.len(), 1);
	}

	#[test]
	fn test_check_signature_rejects_wrong_key() {
		let (transaction, key_pair, signature) = signed_input_fixture();
		let subscript = Builder::build_pay_to_public_key_hash(&key_pair.public().address_hash());
		let other = KeyPair::from_private(Private::from_secret([10u8; 32])).unwrap();

		let result = check_signature(
			&transaction,
			&transaction.hash(),
			0,
			&subscript,
			&signature,
			other.public(),
			&VerificationFlags::standard(),
			&SigCache::default(),
			&HashCache::new(),
		);
		assert_eq!(result, Err(Error::SignatureVerificationFailed));
	}

	#[test]
	fn test_check_signature_rejects_unknown_sighash_type() {
		let (transaction, key_pair, mut signature) = signed_input_fixture();
		let subscript = Builder::build_pay_to_public_key_hash(&key_pair.public().address_hash());
		*signature.last_mut().unwrap() = 0x03;

		let result = check_signature(
			&transaction,
			&transaction.hash(),
			0,
			&subscript,
			&signature,
			key_pair.public(),
			&VerificationFlags::standard(),
			&SigCache::default(),
			&HashCache::new(),
		);
		assert_eq!(result, Err(Error::InvalidSighashType));
	}

	#[test]
	fn test_pubkey_encoding() {
		assert!(is_valid_pubkey_encoding(&[0x02; 33]));
		assert!(!is_valid_pubkey_encoding(&[0x05; 33]));
		assert!(!is_valid_pubkey_encoding(&[0x02; 32]));
	}
}
