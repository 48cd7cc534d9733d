use crate::{AddressHash, Error, Message, Signature, SECP256K1};
use bitcrypto::dhash160;
use hex::ToHex;
use secp256k1::key;
use secp256k1::{Error as SecpError, Message as SecpMessage, Signature as SecpSignature};
use std::{fmt, hash, ops};

/// Secret public key
#[derive(Clone)]
pub enum Public {
	/// Normal version of public key (0x04 byte + X and Y coordinate on curve)
	Normal([u8; 65]),
	/// Compressed version of public key (0x02 byte for even value of Y, 0x03 byte for odd value of Y + X coordinate)
	Compressed([u8; 33]),
}

impl Public {
	pub fn from_slice(data: &[u8]) -> Result<Self, Error> {
		match data.len() {
			33 => {
				let mut pk = [0; 33];
				pk.copy_from_slice(data);
				Ok(Public::Compressed(pk))
			}
			65 => {
				let mut pk = [0; 65];
				pk.copy_from_slice(data);
				Ok(Public::Normal(pk))
			}
			_ => Err(Error::InvalidPublic),
		}
	}

	pub fn address_hash(&self) -> AddressHash {
		dhash160(self)
	}

	pub fn verify(&self, message: &Message, signature: &Signature) -> Result<bool, Error> {
		let context = &SECP256K1;
		let public = key::PublicKey::from_slice(self)?;
		let mut signature = SecpSignature::from_der_lax(signature)?;
		signature.normalize_s();
		let message = SecpMessage::from_slice(&message[..])?;
		match context.verify(&message, &signature, &public) {
			Ok(_) => Ok(true),
			Err(SecpError::IncorrectSignature) => Ok(false),
			Err(x) => Err(x.into()),
		}
	}
}

impl ops::Deref for Public {
	type Target = [u8];

	fn deref(&self) -> &Self::Target {
		match *self {
			Public::Normal(ref bytes) => bytes,
			Public::Compressed(ref bytes) => bytes,
		}
	}
}

impl PartialEq for Public {
	fn eq(&self, other: &Self) -> bool {
		let s_slice: &[u8] = self;
		let o_slice: &[u8] = other;
		s_slice == o_slice
	}
}

impl Eq for Public {}

impl hash::Hash for Public {
	fn hash<H: hash::Hasher>(&self, state: &mut H) {
		let slice: &[u8] = self;
		slice.hash(state);
	}
}

impl fmt::Debug for Public {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			Public::Normal(ref bytes) => writeln!(f, "normal: {}", bytes.to_hex::<String>()),
			Public::Compressed(ref bytes) => writeln!(f, "compressed: {}", bytes.to_hex::<String>()),
		}
	}
}

impl fmt::Display for Public {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.to_hex::<String>().fmt(f)
	}
}
