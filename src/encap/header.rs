use crate::codec::{Deserializable, ReadExt, Reader, Serializable, WriteExt, Writer};
use crate::error::{EipError, Result};

/// Encapsulation command codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EncapCommand {
    #[default]
    Nop,
    ListServices,
    ListIdentity,
    ListInterfaces,
    RegisterSession,
    UnregisterSession,
    SendRrData,
    SendUnitData,
    Unknown(u16),
}

impl From<u16> for EncapCommand {
    fn from(v: u16) -> Self {
        match v {
            0x0000 => EncapCommand::Nop,
            0x0004 => EncapCommand::ListServices,
            0x0063 => EncapCommand::ListIdentity,
            0x0064 => EncapCommand::ListInterfaces,
            0x0065 => EncapCommand::RegisterSession,
            0x0066 => EncapCommand::UnregisterSession,
            0x006F => EncapCommand::SendRrData,
            0x0070 => EncapCommand::SendUnitData,
            other => EncapCommand::Unknown(other),
        }
    }
}

impl From<EncapCommand> for u16 {
    fn from(c: EncapCommand) -> u16 {
        match c {
            EncapCommand::Nop => 0x0000,
            EncapCommand::ListServices => 0x0004,
            EncapCommand::ListIdentity => 0x0063,
            EncapCommand::ListInterfaces => 0x0064,
            EncapCommand::RegisterSession => 0x0065,
            EncapCommand::UnregisterSession => 0x0066,
            EncapCommand::SendRrData => 0x006F,
            EncapCommand::SendUnitData => 0x0070,
            EncapCommand::Unknown(other) => other,
        }
    }
}

/// 24-byte encapsulation header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncapHeader {
    pub command: EncapCommand,
    /// Payload bytes following the header.
    pub length: u16,
    pub session_handle: u32,
    pub status: u32,
    /// Sender context, echoed back untouched by the target.
    pub context: [u8; 8],
    pub options: u32,
}

impl EncapHeader {
    pub const HEADER_LENGTH: usize = 24;

    pub fn new(command: EncapCommand, session_handle: u32) -> Self {
        EncapHeader { command, session_handle, ..Default::default() }
    }

    pub(crate) fn serialize_with_length(&self, writer: &mut dyn Writer, length: u16) -> Result<()> {
        writer.write(u16::from(self.command))?;
        writer.write(length)?;
        writer.write(self.session_handle)?;
        writer.write(self.status)?;
        writer.write_bytes(&self.context)?;
        writer.write(self.options)
    }
}

impl Serializable for EncapHeader {
    fn length(&self) -> usize {
        Self::HEADER_LENGTH
    }

    fn serialize(&self, writer: &mut dyn Writer) -> Result<()> {
        self.serialize_with_length(writer, self.length)
    }
}

impl<'a> Deserializable<'a> for EncapHeader {
    fn deserialize(reader: &mut dyn Reader<'a>) -> Result<Self> {
        let command = EncapCommand::from(reader.read::<u16>()?);
        let length = reader.read()?;
        let session_handle = reader.read()?;
        let status = reader.read()?;
        let mut context = [0u8; 8];
        reader.read_bytes(&mut context)?;
        let options = reader.read()?;
        Ok(EncapHeader {
            command,
            length,
            session_handle,
            status,
            context,
            options,
        })
    }

    fn deserialize_sized(reader: &mut dyn Reader<'a>, length: usize) -> Result<Self> {
        if length != Self::HEADER_LENGTH {
            return Err(EipError::length(format!(
                "encapsulation header is {} bytes, not {}",
                Self::HEADER_LENGTH,
                length
            )));
        }
        Self::deserialize(reader)
    }
}
