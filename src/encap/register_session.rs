use crate::codec::{Deserializable, ReadExt, Reader, Serializable, WriteExt, Writer};
use crate::error::Result;

/// Encapsulation protocol version spoken by this client.
pub const EIP_PROTOCOL_VERSION: u16 = 1;

/// RegisterSession request and reply payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterSessionData {
    pub protocol_version: u16,
    pub options: u16,
}

impl RegisterSessionData {
    pub fn new(protocol_version: u16, options: u16) -> Self {
        RegisterSessionData { protocol_version, options }
    }
}

impl Default for RegisterSessionData {
    fn default() -> Self {
        RegisterSessionData { protocol_version: EIP_PROTOCOL_VERSION, options: 0 }
    }
}

impl Serializable for RegisterSessionData {
    fn length(&self) -> usize {
        4
    }

    fn serialize(&self, writer: &mut dyn Writer) -> Result<()> {
        writer.write(self.protocol_version)?;
        writer.write(self.options)
    }
}

impl<'a> Deserializable<'a> for RegisterSessionData {
    fn deserialize(reader: &mut dyn Reader<'a>) -> Result<Self> {
        let protocol_version = reader.read()?;
        let options = reader.read()?;
        Ok(RegisterSessionData { protocol_version, options })
    }
}
