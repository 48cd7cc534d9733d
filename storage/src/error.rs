use derive_more::Display;

#[derive(Debug, PartialEq, Display)]
pub enum Error {
	/// Low level database error
	#[display(fmt = "Database error: {}", _0)]
	DatabaseError(String),
	/// Item not found
	#[display(fmt = "Item not found")]
	NotFound,
	/// Block failed the static consensus checks against the current tip
	#[display(fmt = "Cannot connect block: {}", _0)]
	CannotConnect(String),
}

impl From<Error> for String {
	fn from(e: Error) -> String {
		format!("{}", e)
	}
}
