use super::forward_open::{read_reply_data, reply_size_words};
use super::path::Path;
use crate::codec::{Deserializable, Payload, ReadExt, Reader, Serializable, WriteExt, Writer};
use crate::error::{EipError, Result};

/// Forward Close request body (service 0x4E to the connection manager).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardCloseRequest {
    pub timeout_tick_size: u8,
    pub timeout_ticks: u8,
    pub connection_sn: u16,
    pub originator_vendor_id: u16,
    pub originator_sn: u32,
    pub path: Path,
}

impl ForwardCloseRequest {
    const FIXED_LENGTH: usize = 10;
}

impl Serializable for ForwardCloseRequest {
    fn length(&self) -> usize {
        Self::FIXED_LENGTH + self.path.length_with(true)
    }

    // The reserved byte sits between the path size and the path segments,
    // not in front of the size.
    fn serialize(&self, writer: &mut dyn Writer) -> Result<()> {
        writer.write(self.timeout_tick_size)?;
        writer.write(self.timeout_ticks)?;
        writer.write(self.connection_sn)?;
        writer.write(self.originator_vendor_id)?;
        writer.write(self.originator_sn)?;
        self.path.serialize_with(writer, true)
    }
}

impl<'a> Deserializable<'a> for ForwardCloseRequest {
    fn deserialize(_reader: &mut dyn Reader<'a>) -> Result<Self> {
        Err(EipError::Unsupported("deserializing a forward close request"))
    }

    fn deserialize_sized(_reader: &mut dyn Reader<'a>, _length: usize) -> Result<Self> {
        Err(EipError::Unsupported("deserializing a forward close request"))
    }
}

/// Successful Forward Close reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardCloseSuccess<'a> {
    pub connection_sn: u16,
    pub originator_vendor_id: u16,
    pub originator_sn: u32,
    pub response_data: Option<Payload<'a>>,
}

impl ForwardCloseSuccess<'_> {
    pub fn data(&self) -> &[u8] {
        self.response_data.as_deref().unwrap_or(&[])
    }

    pub fn into_owned(self) -> ForwardCloseSuccess<'static> {
        ForwardCloseSuccess {
            connection_sn: self.connection_sn,
            originator_vendor_id: self.originator_vendor_id,
            originator_sn: self.originator_sn,
            response_data: self.response_data.map(Payload::into_owned),
        }
    }
}

impl Serializable for ForwardCloseSuccess<'_> {
    fn length(&self) -> usize {
        10 + self.data().len()
    }

    fn serialize(&self, writer: &mut dyn Writer) -> Result<()> {
        let words = reply_size_words(self.data())?;
        writer.write(self.connection_sn)?;
        writer.write(self.originator_vendor_id)?;
        writer.write(self.originator_sn)?;
        writer.write(words)?;
        writer.write(0u8)?;
        writer.write_bytes(self.data())
    }
}

impl<'a> Deserializable<'a> for ForwardCloseSuccess<'a> {
    fn deserialize(reader: &mut dyn Reader<'a>) -> Result<Self> {
        let connection_sn = reader.read()?;
        let originator_vendor_id = reader.read()?;
        let originator_sn = reader.read()?;
        let response_data = read_reply_data(reader)?;
        Ok(ForwardCloseSuccess {
            connection_sn,
            originator_vendor_id,
            originator_sn,
            response_data,
        })
    }
}
