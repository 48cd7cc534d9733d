//! Validator and account keys of the chain.

extern crate rustc_hex as hex;
#[macro_use]
extern crate lazy_static;
extern crate primitives;
extern crate secp256k1;

mod address;
mod error;
pub mod generator;
mod keypair;
mod private;
mod public;
mod signature;

pub use primitives::bytes;

pub use address::{Address, Type};
use bitcrypto::{HASH160, SHA256D};
pub use error::Error;
pub use keypair::KeyPair;
pub use private::Private;
pub use public::Public;
pub use signature::Signature;

/// 20 bytes long hash derived from public `ripemd160(sha256(public))`
pub type AddressHash = HASH160;
/// 32 bytes long secret key
pub type Secret = [u8; 32];
/// 32 bytes long signable message
pub type Message = SHA256D;

lazy_static! {
	pub static ref SECP256K1: secp256k1::Secp256k1<secp256k1::All> = secp256k1::Secp256k1::new();
}
