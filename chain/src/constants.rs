// Below this value lock_time is interpreted as a block height, above it as
// a unix timestamp.
pub const LOCKTIME_THRESHOLD: u32 = 500_000_000;

/// Sequence value which marks a transaction input as final.
pub const SEQUENCE_FINAL: u32 = 0xffff_ffff;

/// Previous-outpoint index sentinel used by coinbase inputs.
pub const MAX_PREV_OUT_INDEX: u32 = 0xffff_ffff;

/// Maximum number of bytes a serialized block header occupies: fixed header
/// fields plus the worst-case length-prefixed validator signature.
pub const MAX_BLOCK_HEADER_PAYLOAD: usize = 92 + 1 + MAX_SIGNATURE_PAYLOAD;

/// Maximum length of a DER encoded ECDSA signature.
pub const MAX_SIGNATURE_PAYLOAD: usize = 72;

/// Maximum number of bytes a serialized transaction count occupies.
pub const MAX_VAR_INT_PAYLOAD: usize = 9;
