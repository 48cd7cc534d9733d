extern crate chain;
extern crate keys;
extern crate primitives;
extern crate script;

mod best_state;
mod block_chain;
mod error;
mod key_view;
mod utxo_view;

pub use primitives::bytes;

pub use best_state::BestState;
pub use block_chain::{BlockChain, MedianTimeSource, SharedChain};
pub use error::Error;
pub use key_view::{KeySet, KeyViewpoint, KeyId};
pub use utxo_view::{UtxoEntry, UtxoViewpoint};
