use super::io::{BufferReader, Reader, Writer};
use super::traits::{Deserializable, Serializable, to_bytes};
use crate::error::{EipError, Result};
use std::ops::Deref;

/// Opaque bytes carried inside another entity: either owned, or a view into
/// the receive buffer they were parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload<'a> {
    Owned(Vec<u8>),
    Borrowed(&'a [u8]),
}

impl<'a> Payload<'a> {
    /// Serialize `value` into a fresh owned payload.
    pub fn encode(value: &dyn Serializable) -> Result<Payload<'static>> {
        to_bytes(value).map(Payload::Owned)
    }

    pub fn as_slice(&self) -> &[u8] {
        match self {
            Payload::Owned(v) => v,
            Payload::Borrowed(s) => s,
        }
    }

    pub fn is_borrowed(&self) -> bool {
        matches!(self, Payload::Borrowed(_))
    }

    /// Detach from the source buffer, copying only when the payload is a view.
    pub fn into_owned(self) -> Payload<'static> {
        match self {
            Payload::Owned(v) => Payload::Owned(v),
            Payload::Borrowed(s) => Payload::Owned(s.to_vec()),
        }
    }

    /// Decode the held bytes as `T`, treating the payload size as the
    /// declared length.
    pub fn decode<'s, T: Deserializable<'s>>(&'s self) -> Result<T> {
        let bytes = self.as_slice();
        let mut reader = BufferReader::new(bytes);
        T::deserialize_sized(&mut reader, bytes.len())
    }
}

impl Deref for Payload<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl From<Vec<u8>> for Payload<'static> {
    fn from(v: Vec<u8>) -> Self {
        Payload::Owned(v)
    }
}

impl<'a> From<&'a [u8]> for Payload<'a> {
    fn from(s: &'a [u8]) -> Self {
        Payload::Borrowed(s)
    }
}

impl Serializable for Payload<'_> {
    fn length(&self) -> usize {
        self.as_slice().len()
    }

    fn serialize(&self, writer: &mut dyn Writer) -> Result<()> {
        writer.write_bytes(self.as_slice())
    }
}

impl<'a> Deserializable<'a> for Payload<'a> {
    /// Only possible when the reader knows where its region ends.
    fn deserialize(reader: &mut dyn Reader<'a>) -> Result<Self> {
        match reader.remaining() {
            Some(n) => reader.read_buffer(n),
            None => Err(EipError::Unsupported("reading an unbounded payload from a stream")),
        }
    }

    fn deserialize_sized(reader: &mut dyn Reader<'a>, length: usize) -> Result<Self> {
        reader.read_buffer(length)
    }
}
