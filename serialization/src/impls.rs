use crate::compact_integer::CompactInteger;
use crate::reader::{Deserializable, Error, Reader};
use crate::stream::{Serializable, Stream};
use bitcrypto::{Hash, HASH160, SHA256D};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use primitives::bytes::Bytes;
use primitives::compact::Compact;
use std::io;

impl Serializable for bool {
	#[inline]
	fn serialize(&self, s: &mut Stream) {
		let _ = s.append_slice(&[*self as u8]);
	}

	#[inline]
	fn serialized_size(&self) -> usize {
		1
	}
}

impl Serializable for u8 {
	#[inline]
	fn serialize(&self, s: &mut Stream) {
		let _ = s.append_slice(&[*self]);
	}

	#[inline]
	fn serialized_size(&self) -> usize {
		1
	}
}

macro_rules! impl_ser_for_int {
	($int: ty, $size: expr, $write: ident, $read: ident) => {
		impl Serializable for $int {
			#[inline]
			fn serialize(&self, s: &mut Stream) {
				let mut buffer = [0u8; $size];
				(&mut buffer[..]).$write::<LittleEndian>(*self).expect("serialization buffer is fixed-size");
				let _ = s.append_slice(&buffer);
			}

			#[inline]
			fn serialized_size(&self) -> usize {
				$size
			}
		}

		impl Deserializable for $int {
			#[inline]
			fn deserialize<T>(reader: &mut Reader<T>) -> Result<Self, Error>
			where
				T: io::Read,
			{
				Ok(reader.$read::<LittleEndian>()?)
			}
		}
	};
}

impl_ser_for_int!(i32, 4, write_i32, read_i32);
impl_ser_for_int!(i64, 8, write_i64, read_i64);
impl_ser_for_int!(u16, 2, write_u16, read_u16);
impl_ser_for_int!(u32, 4, write_u32, read_u32);
impl_ser_for_int!(u64, 8, write_u64, read_u64);

impl Deserializable for bool {
	#[inline]
	fn deserialize<T>(reader: &mut Reader<T>) -> Result<Self, Error>
	where
		T: io::Read,
	{
		let value = reader.read_u8()?;
		match value {
			0 => Ok(false),
			1 => Ok(true),
			_ => Err(Error::MalformedData),
		}
	}
}

impl Deserializable for u8 {
	#[inline]
	fn deserialize<T>(reader: &mut Reader<T>) -> Result<Self, Error>
	where
		T: io::Read,
	{
		Ok(reader.read_u8()?)
	}
}

impl Serializable for Bytes {
	fn serialize(&self, stream: &mut Stream) {
		stream.append(&CompactInteger::from(self.len())).append_slice(self);
	}

	#[inline]
	fn serialized_size(&self) -> usize {
		CompactInteger::serialized_size(self.len() as u64) + self.len()
	}
}

impl Deserializable for Bytes {
	fn deserialize<T>(reader: &mut Reader<T>) -> Result<Self, Error>
	where
		T: io::Read,
	{
		let len: usize = reader.read::<CompactInteger>()?.into();
		let mut bytes = Bytes::new_with_len(len);
		reader.read_slice(&mut bytes)?;
		Ok(bytes)
	}
}

impl Serializable for Compact {
	fn serialize(&self, stream: &mut Stream) {
		stream.append(&u32::from(*self));
	}

	#[inline]
	fn serialized_size(&self) -> usize {
		4
	}
}

impl Deserializable for Compact {
	fn deserialize<T>(reader: &mut Reader<T>) -> Result<Self, Error>
	where
		T: io::Read,
	{
		reader.read::<u32>().map(Compact::new)
	}
}

impl_ser_for_hash!(SHA256D, 32);
impl_ser_for_hash!(HASH160, 20);
