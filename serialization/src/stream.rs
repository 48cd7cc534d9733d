//! Stream used for serialization of Bitcoin structures

use crate::compact_integer::CompactInteger;
use primitives::bytes::Bytes;
use std::borrow::Borrow;

/// Serializes the struct and returns serialized bytes.
pub fn serialize<T>(t: &T) -> Bytes
where
	T: Serializable,
{
	let mut stream = Stream::default();
	stream.append(t);
	stream.out()
}

/// Serializes the list of structs and returns serialized bytes.
pub fn serialize_list<T, K>(t: &[K]) -> Bytes
where
	T: Serializable,
	K: Borrow<T>,
{
	let mut stream = Stream::default();
	stream.append_list(t);
	stream.out()
}

pub fn serialized_list_size<T, K>(t: &[K]) -> usize
where
	T: Serializable,
	K: Borrow<T>,
{
	CompactInteger::serialized_size(t.len() as u64) + t.iter().map(Borrow::borrow).map(Serializable::serialized_size).sum::<usize>()
}

pub trait Serializable {
	/// Serialize the struct and appends it to the end of stream.
	fn serialize(&self, s: &mut Stream);

	/// Hint about the size of serialized struct.
	fn serialized_size(&self) -> usize
	where
		Self: Sized,
	{
		// fallback implementation
		serialize(self).len()
	}
}

/// Stream used for serialization of Bitcoin structures
#[derive(Default)]
pub struct Stream {
	buffer: Vec<u8>,
}

impl Stream {
	/// New stream
	pub fn new() -> Self {
		Stream { buffer: Vec::new() }
	}

	/// Serializes the struct and appends it to the end of stream.
	pub fn append<T>(&mut self, t: &T) -> &mut Self
	where
		T: Serializable,
	{
		t.serialize(self);
		self
	}

	/// Appends raw bytes to the end of the stream.
	pub fn append_slice(&mut self, bytes: &[u8]) -> &mut Self {
		self.buffer.extend_from_slice(bytes);
		self
	}

	/// Appends a list of serializable structs to the end of the stream.
	pub fn append_list<T, K>(&mut self, t: &[K]) -> &mut Self
	where
		T: Serializable,
		K: Borrow<T>,
	{
		CompactInteger::from(t.len()).serialize(self);
		for i in t {
			i.borrow().serialize(self);
		}
		self
	}

	/// Full stream.
	pub fn out(self) -> Bytes {
		self.buffer.into()
	}
}
