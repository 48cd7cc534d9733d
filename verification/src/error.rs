use bitcrypto::SHA256D;
use derive_more::Display;

#[derive(Debug, PartialEq, Display)]
pub enum TransactionError {
	/// Referenced output is unknown or already spent
	#[display(fmt = "Input {} spends an unknown or spent output", _0)]
	Input(usize),
	/// Coinbase output is spent before it matured
	#[display(fmt = "Attempt to spend an immature coinbase output")]
	Maturity,
	/// Input or output value is out of the monetary range
	#[display(fmt = "Transaction value is out of range")]
	ValueOutOfRange,
	/// Sum of outputs exceeds sum of inputs
	#[display(fmt = "Transaction tries to spend more than it provides")]
	Overspend,
	/// Output script is not one of the standard spendable kinds
	#[display(fmt = "Output {} carries a non standard script", _0)]
	NonStandardOutput(usize),
	/// Administrative thread output in a non admin position
	#[display(fmt = "Admin thread output must be the first output of an admin transaction")]
	MisplacedAdminThread,
	/// Admin thread output carrying a value
	#[display(fmt = "Admin thread output must carry a zero value")]
	AdminThreadValue,
	/// Admin transaction without any governance operation
	#[display(fmt = "Admin transaction carries no operations")]
	EmptyAdminTransaction,
	/// Admin operation payload cannot be decoded
	#[display(fmt = "Output {} carries an undecodable admin operation", _0)]
	UndecodableAdminOp(usize),
	/// Admin operation is not valid on this thread
	#[display(fmt = "Output {} carries an operation foreign to its thread", _0)]
	ForeignAdminOp(usize),
	/// Adding a key that is already part of the target set
	#[display(fmt = "Admin operation adds an already provisioned key")]
	DuplicateAdminKey,
	/// Revoking a key that is not part of the target set
	#[display(fmt = "Admin operation revokes an unknown key")]
	UnknownAdminKey,
	/// Issued key ids must extend the last assigned id sequentially
	#[display(fmt = "Issued key id is not sequential")]
	NonSequentialKeyId,
	/// Revoking a key id that was never issued
	#[display(fmt = "Admin operation revokes an unknown key id")]
	UnknownKeyId,
	/// Script verification failure
	#[display(fmt = "Input {} script verification failed: {}", _0, _1)]
	Signature(usize, script::Error),
	/// Referenced transaction is missing from the working view
	#[display(fmt = "Unknown reference {}", _0)]
	UnknownReference(SHA256D),
}

impl From<TransactionError> for String {
	fn from(e: TransactionError) -> String {
		format!("{}", e)
	}
}
