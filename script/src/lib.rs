//! Script engine surface consumed by block assembly and transaction
//! validation: construction, classification, sigop accounting, sighash
//! computation and structural verification of the chain's standard script
//! kinds.

extern crate chain;
extern crate keys;
extern crate primitives;
extern crate serialization as ser;

mod builder;
mod cache;
mod error;
mod flags;
pub mod opcodes;
mod script;
mod sighash;
mod verify;

pub use self::builder::Builder;
pub use self::cache::{HashCache, SigCache};
pub use self::error::Error;
pub use self::flags::VerificationFlags;
pub use self::script::{Instruction, Script, ScriptType, ThreadId, MAX_PUBKEYS_PER_MULTISIG};
pub use self::sighash::{signature_hash, SighashType};
pub use self::verify::{check_signature, check_multisig};
