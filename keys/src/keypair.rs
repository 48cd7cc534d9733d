use crate::{Error, Private, Public, SECP256K1};
use secp256k1::key;
use std::fmt;

#[derive(Clone, PartialEq)]
pub struct KeyPair {
	private: Private,
	public: Public,
}

impl fmt::Debug for KeyPair {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.private.fmt(f)?;
		writeln!(f, "public: {}", self.public)
	}
}

impl KeyPair {
	pub fn private(&self) -> &Private {
		&self.private
	}

	pub fn public(&self) -> &Public {
		&self.public
	}

	pub fn from_private(private: Private) -> Result<KeyPair, Error> {
		let context = &SECP256K1;
		let secret = key::SecretKey::from_slice(&private.secret[..])?;
		let pub_key = key::PublicKey::from_secret_key(context, &secret);

		let public = if private.compressed {
			Public::from_slice(&pub_key.serialize())?
		} else {
			Public::from_slice(&pub_key.serialize_uncompressed())?
		};

		Ok(KeyPair { private, public })
	}

	pub fn from_keypair(secret: key::SecretKey, public: key::PublicKey) -> Self {
		let mut secret_bytes = [0u8; 32];
		secret_bytes.copy_from_slice(&secret[..]);

		KeyPair {
			private: Private {
				secret: secret_bytes,
				compressed: true,
			},
			public: Public::Compressed(public.serialize()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::KeyPair;
	use crate::Private;

	#[test]
	fn test_keypair_from_private() {
		let private = Private::from_secret([1u8; 32]);
		let kp = KeyPair::from_private(private.clone()).unwrap();
		assert_eq!(kp.private(), &private);
		assert_eq!(kp.public().len(), 33);
	}

	#[test]
	fn test_sign_and_verify() {
		use bitcrypto::dhash256;

		let kp = KeyPair::from_private(Private::from_secret([42u8; 32])).unwrap();
		let message = dhash256(b"block header");
		let signature = kp.private().sign(&message).unwrap();
		assert_eq!(kp.public().verify(&message, &signature), Ok(true));

		let other = dhash256(b"another header");
		assert_eq!(kp.public().verify(&other, &signature), Ok(false));
	}
}
