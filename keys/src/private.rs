use crate::{Error, Message, Secret, Signature, SECP256K1};
use hex::ToHex;
use secp256k1::key;
use secp256k1::Message as SecpMessage;
use std::fmt;

/// Secret with additional network identifier and format type
#[derive(Default, PartialEq, Clone)]
pub struct Private {
	/// ECDSA key.
	pub secret: Secret,
	/// True if the public key corresponding to this key is compressed.
	pub compressed: bool,
}

impl Private {
	pub fn from_secret(secret: Secret) -> Self {
		Private { secret, compressed: true }
	}

	pub fn sign(&self, message: &Message) -> Result<Signature, Error> {
		let context = &SECP256K1;
		let secret = key::SecretKey::from_slice(&self.secret[..])?;
		let message = SecpMessage::from_slice(&message[..])?;
		let signature = context.sign(&message, &secret);
		let data = signature.serialize_der();
		Ok(data.to_vec().into())
	}
}

impl fmt::Debug for Private {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		writeln!(f, "secret: {}", self.secret.to_hex::<String>())?;
		writeln!(f, "compressed: {}", self.compressed)
	}
}
