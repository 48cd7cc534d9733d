//! Static transaction checks applied while a block template is assembled.
//! Each check validates one aspect of a pending transaction against the
//! working chain-state views; none of them mutates anything.

#[macro_use]
extern crate log;

extern crate chain;
extern crate keys;
extern crate network;
extern crate script;
extern crate storage;

mod accept_outputs;
mod accept_transaction;
mod error;
mod sigops;
mod validate_scripts;

pub use accept_outputs::check_transaction_outputs;
pub use accept_transaction::check_transaction_inputs;
pub use error::TransactionError;
pub use sigops::{transaction_p2sh_sigops, transaction_sigops};
pub use validate_scripts::validate_transaction_scripts;
