use super::io::{BufferWriter, Reader, Writer};
use crate::error::{EipError, Result};
use log::warn;

/// A wire-format entity that can be written to a [`Writer`].
///
/// `length()` is computed from the current field values on every call and
/// must equal the number of bytes `serialize` produces.
pub trait Serializable {
    fn length(&self) -> usize;

    fn serialize(&self, writer: &mut dyn Writer) -> Result<()>;
}

/// A wire-format entity that can be read back from a [`Reader`].
///
/// Two arities exist: `deserialize` for self-delimiting encodings and
/// `deserialize_sized` when an enclosing frame declares how many bytes
/// belong to this entity.
pub trait Deserializable<'a>: Sized {
    fn deserialize(reader: &mut dyn Reader<'a>) -> Result<Self>;

    fn deserialize_sized(reader: &mut dyn Reader<'a>, length: usize) -> Result<Self> {
        let start = reader.position();
        let value = Self::deserialize(reader)?;
        let used = reader.position() - start;
        if used != length {
            warn!("Declared length {} but {} bytes were consumed", length, used);
        }
        Ok(value)
    }
}

/// Serialize into a buffer sized exactly to `length()`.
pub fn to_bytes(value: &dyn Serializable) -> Result<Vec<u8>> {
    let expected = value.length();
    let mut buf = vec![0u8; expected];
    let written = {
        let mut writer = BufferWriter::new(&mut buf);
        value.serialize(&mut writer)?;
        writer.position()
    };
    if written != expected {
        return Err(EipError::length(format!(
            "serialized {} bytes but length() reported {}",
            written, expected
        )));
    }
    Ok(buf)
}
