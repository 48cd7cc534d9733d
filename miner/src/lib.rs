//! Block template generation: selects pending transactions under the
//! mining policy and assembles them into a validator-signed block that is
//! valid under every static consensus rule except proof of work.

#[macro_use]
extern crate log;

extern crate chain;
extern crate keys;
extern crate network;
extern crate primitives;
extern crate script;
extern crate serialization as ser;
extern crate storage;
extern crate verification;

mod block_assembler;
mod block_template;
mod error;
mod policy;
mod priority;
mod priority_queue;
mod transaction_source;

pub use block_assembler::BlockAssembler;
pub use block_template::BlockTemplate;
pub use error::Error;
pub use policy::{Policy, MIN_HIGH_PRIORITY};
pub use priority::calc_priority;
pub use priority_queue::{CandidateTransaction, OrderingStrategy, TransactionPriorityQueue};
pub use transaction_source::{TransactionDesc, TransactionSource};
