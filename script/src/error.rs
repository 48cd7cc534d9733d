use std::fmt;

#[derive(Debug, PartialEq, Clone)]
pub enum Error {
	/// Script bytes end in the middle of a data push.
	MalformedScript,
	/// Signature script contains non-push instructions.
	SignatureScriptNotPushOnly,
	/// Signature is empty or not canonically DER encoded.
	InvalidSignatureEncoding,
	/// Public key is not a valid point encoding.
	InvalidPublicKeyEncoding,
	/// Unsupported sighash type byte.
	InvalidSighashType,
	/// Input index is out of range of the spending transaction.
	InvalidInputIndex,
	/// Signature did not verify against the public key.
	SignatureVerificationFailed,
	/// Redeem script hash does not match the pay-to-script-hash output.
	RedeemScriptMismatch,
	/// Script does not match any standard spendable form.
	NonStandardScript,
	/// Spending an output that is provably unspendable.
	UnspendableOutput,
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let msg = match *self {
			Error::MalformedScript => "malformed script",
			Error::SignatureScriptNotPushOnly => "signature script is not push only",
			Error::InvalidSignatureEncoding => "invalid signature encoding",
			Error::InvalidPublicKeyEncoding => "invalid public key encoding",
			Error::InvalidSighashType => "invalid sighash type",
			Error::InvalidInputIndex => "input index out of range",
			Error::SignatureVerificationFailed => "signature verification failed",
			Error::RedeemScriptMismatch => "redeem script does not match script hash",
			Error::NonStandardScript => "non standard script",
			Error::UnspendableOutput => "output is provably unspendable",
		};

		msg.fmt(f)
	}
}

impl std::error::Error for Error {}
