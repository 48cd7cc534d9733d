extern crate primitives;
extern crate rayon;
extern crate serialization as ser;

pub use block::Block;
pub use block_header::{block_header_hash, BlockHeader};
pub use indexed_block::IndexedBlock;
pub use indexed_header::IndexedBlockHeader;
pub use indexed_transaction::IndexedTransaction;
pub use merkle_root::{merkle_node_hash, merkle_root};
pub use primitives::{bytes, compact};
pub use transaction::{OutPoint, Transaction, TransactionInput, TransactionOutput};

pub mod constants;

mod block;
mod block_header;
mod indexed_block;
mod indexed_header;
mod indexed_transaction;
mod merkle_root;
mod transaction;
