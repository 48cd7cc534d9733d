use bitcrypto::{dhash256, SHA256D};
use keys::{Error as KeysError, Private, Public, Signature};
use primitives::bytes::Bytes;
use primitives::compact::Compact;
use ser::{serialize, Deserializable, Error as ReaderError, Reader, Serializable, Stream};
use std::{fmt, io};

/// Header of a block, carrying an explicit height and serialized size in
/// addition to the usual proof-of-work fields, and signed by a validator
/// key. The `nonce` and `signature` fields are excluded from the signable
/// digest so a solver can grind the nonce without invalidating the
/// signature.
#[derive(PartialEq, Clone, Default)]
pub struct BlockHeader {
	pub version: u32,
	pub previous_header_hash: SHA256D,
	pub merkle_root_hash: SHA256D,
	pub time: u32,
	pub bits: Compact,
	pub height: u32,
	pub size: u32,
	pub nonce: u64,
	pub signature: Bytes,
}

impl BlockHeader {
	/// Hash of the fully serialized header, including nonce and signature.
	pub fn hash(&self) -> SHA256D {
		block_header_hash(self)
	}

	/// Digest covered by the validator signature: every header field except
	/// the nonce and the signature itself.
	pub fn signable_hash(&self) -> SHA256D {
		let mut stream = Stream::default();
		stream
			.append(&self.version)
			.append(&self.previous_header_hash)
			.append(&self.merkle_root_hash)
			.append(&self.time)
			.append(&self.bits)
			.append(&self.height)
			.append(&self.size);
		dhash256(&stream.out())
	}

	/// Signs the header with the passed validator key, replacing any
	/// previous signature.
	pub fn sign(&mut self, key: &Private) -> Result<(), KeysError> {
		let signature = key.sign(&self.signable_hash())?;
		self.signature = Vec::from(signature).into();
		Ok(())
	}

	pub fn verify_signature(&self, public: &Public) -> Result<bool, KeysError> {
		let signature: Signature = (&self.signature[..]).into();
		public.verify(&self.signable_hash(), &signature)
	}
}

impl fmt::Debug for BlockHeader {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("BlockHeader")
			.field("version", &self.version)
			.field("previous_header_hash", &self.previous_header_hash)
			.field("merkle_root_hash", &self.merkle_root_hash)
			.field("time", &self.time)
			.field("bits", &self.bits)
			.field("height", &self.height)
			.field("size", &self.size)
			.field("nonce", &self.nonce)
			.field("signature", &self.signature)
			.finish()
	}
}

impl Serializable for BlockHeader {
	fn serialize(&self, stream: &mut Stream) {
		stream
			.append(&self.version)
			.append(&self.previous_header_hash)
			.append(&self.merkle_root_hash)
			.append(&self.time)
			.append(&self.bits)
			.append(&self.height)
			.append(&self.size)
			.append(&self.nonce)
			.append(&self.signature);
	}
}

impl Deserializable for BlockHeader {
	fn deserialize<T>(reader: &mut Reader<T>) -> Result<Self, ReaderError>
	where
		T: io::Read,
	{
		Ok(BlockHeader {
			version: reader.read()?,
			previous_header_hash: reader.read()?,
			merkle_root_hash: reader.read()?,
			time: reader.read()?,
			bits: reader.read()?,
			height: reader.read()?,
			size: reader.read()?,
			nonce: reader.read()?,
			signature: reader.read()?,
		})
	}
}

pub fn block_header_hash(header: &BlockHeader) -> SHA256D {
	dhash256(&serialize(header))
}
