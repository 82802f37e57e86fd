use super::path::Path;
use crate::codec::{Deserializable, Payload, ReadExt, Reader, Serializable, WriteExt, Writer};
use crate::error::{EipError, Result};
use serde::{Deserialize, Serialize};

/// Connection priority, bits 26..27 of the network connection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ConnectionPriority {
    Low = 0,
    High = 1,
    #[default]
    Scheduled = 2,
    Urgent = 3,
}

/// Connection type, bits 29..30 of the network connection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ConnectionType {
    Null = 0,
    Multicast = 1,
    #[default]
    PointToPoint = 2,
}

/// Pack the 32-bit network connection parameters of a Large Forward Open.
///
/// | bits   | field                 |
/// |--------|-----------------------|
/// | 0..15  | connection size       |
/// | 25     | variable size         |
/// | 26..27 | priority              |
/// | 29..30 | connection type       |
/// | 31     | redundant owner/shared|
pub fn calc_connection_params(
    size: u16,
    variable: bool,
    priority: ConnectionPriority,
    connection_type: ConnectionType,
    shared: bool,
) -> u32 {
    u32::from(size)
        | (u32::from(variable) << 25)
        | ((priority as u32 & 0x03) << 26)
        | ((connection_type as u32 & 0x03) << 29)
        | (u32::from(shared) << 31)
}

/// Large Forward Open request body (service 0x5B to the connection manager).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardOpenRequest {
    pub timeout_tick_size: u8,
    pub timeout_ticks: u8,
    pub o_to_t_connection_id: u32,
    pub t_to_o_connection_id: u32,
    pub connection_sn: u16,
    pub originator_vendor_id: u16,
    pub originator_sn: u32,
    pub timeout_multiplier: u8,
    pub o_to_t_rpi: u32,
    pub o_to_t_conn_params: u32,
    pub t_to_o_rpi: u32,
    pub t_to_o_conn_params: u32,
    pub conn_type: u8,
    pub path: Path,
}

impl ForwardOpenRequest {
    const FIXED_LENGTH: usize = 39;

    pub fn set_o_to_t_params(
        &mut self,
        size: u16,
        variable: bool,
        priority: ConnectionPriority,
        connection_type: ConnectionType,
        shared: bool,
    ) {
        self.o_to_t_conn_params =
            calc_connection_params(size, variable, priority, connection_type, shared);
    }

    pub fn set_t_to_o_params(
        &mut self,
        size: u16,
        variable: bool,
        priority: ConnectionPriority,
        connection_type: ConnectionType,
        shared: bool,
    ) {
        self.t_to_o_conn_params =
            calc_connection_params(size, variable, priority, connection_type, shared);
    }
}

impl Serializable for ForwardOpenRequest {
    fn length(&self) -> usize {
        Self::FIXED_LENGTH + self.path.length_with(false)
    }

    fn serialize(&self, writer: &mut dyn Writer) -> Result<()> {
        writer.write(self.timeout_tick_size)?;
        writer.write(self.timeout_ticks)?;
        writer.write(self.o_to_t_connection_id)?;
        writer.write(self.t_to_o_connection_id)?;
        writer.write(self.connection_sn)?;
        writer.write(self.originator_vendor_id)?;
        writer.write(self.originator_sn)?;
        writer.write(self.timeout_multiplier)?;
        writer.write_zeros(3)?;
        writer.write(self.o_to_t_rpi)?;
        writer.write(self.o_to_t_conn_params)?;
        writer.write(self.t_to_o_rpi)?;
        writer.write(self.t_to_o_conn_params)?;
        writer.write(self.conn_type)?;
        self.path.serialize_with(writer, false)
    }
}

impl<'a> Deserializable<'a> for ForwardOpenRequest {
    fn deserialize(_reader: &mut dyn Reader<'a>) -> Result<Self> {
        Err(EipError::Unsupported("deserializing a forward open request"))
    }

    fn deserialize_sized(_reader: &mut dyn Reader<'a>, _length: usize) -> Result<Self> {
        Err(EipError::Unsupported("deserializing a forward open request"))
    }
}

/// Successful Forward Open reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardOpenSuccess<'a> {
    pub o_to_t_connection_id: u32,
    pub t_to_o_connection_id: u32,
    pub connection_sn: u16,
    pub originator_vendor_id: u16,
    pub originator_sn: u32,
    pub o_to_t_api: u32,
    pub t_to_o_api: u32,
    pub response_data: Option<Payload<'a>>,
}

impl ForwardOpenSuccess<'_> {
    pub fn data(&self) -> &[u8] {
        self.response_data.as_deref().unwrap_or(&[])
    }

    pub fn into_owned(self) -> ForwardOpenSuccess<'static> {
        ForwardOpenSuccess {
            o_to_t_connection_id: self.o_to_t_connection_id,
            t_to_o_connection_id: self.t_to_o_connection_id,
            connection_sn: self.connection_sn,
            originator_vendor_id: self.originator_vendor_id,
            originator_sn: self.originator_sn,
            o_to_t_api: self.o_to_t_api,
            t_to_o_api: self.t_to_o_api,
            response_data: self.response_data.map(Payload::into_owned),
        }
    }
}

impl Serializable for ForwardOpenSuccess<'_> {
    fn length(&self) -> usize {
        26 + self.data().len()
    }

    fn serialize(&self, writer: &mut dyn Writer) -> Result<()> {
        let words = reply_size_words(self.data())?;
        writer.write(self.o_to_t_connection_id)?;
        writer.write(self.t_to_o_connection_id)?;
        writer.write(self.connection_sn)?;
        writer.write(self.originator_vendor_id)?;
        writer.write(self.originator_sn)?;
        writer.write(self.o_to_t_api)?;
        writer.write(self.t_to_o_api)?;
        writer.write(words)?;
        writer.write(0u8)?;
        writer.write_bytes(self.data())
    }
}

impl<'a> Deserializable<'a> for ForwardOpenSuccess<'a> {
    fn deserialize(reader: &mut dyn Reader<'a>) -> Result<Self> {
        let o_to_t_connection_id = reader.read()?;
        let t_to_o_connection_id = reader.read()?;
        let connection_sn = reader.read()?;
        let originator_vendor_id = reader.read()?;
        let originator_sn = reader.read()?;
        let o_to_t_api = reader.read()?;
        let t_to_o_api = reader.read()?;
        let response_data = read_reply_data(reader)?;
        Ok(ForwardOpenSuccess {
            o_to_t_connection_id,
            t_to_o_connection_id,
            connection_sn,
            originator_vendor_id,
            originator_sn,
            o_to_t_api,
            t_to_o_api,
            response_data,
        })
    }
}

/// Reply size byte (in words) for a trailing reply blob.
pub(crate) fn reply_size_words(data: &[u8]) -> Result<u8> {
    if data.len() % 2 != 0 {
        return Err(EipError::length(format!(
            "reply data of {} bytes is not a whole number of words",
            data.len()
        )));
    }
    u8::try_from(data.len() / 2)
        .map_err(|_| EipError::length(format!("reply data of {} bytes is too long", data.len())))
}

/// Reply size (words), reserved byte, then that many words of data.
pub(crate) fn read_reply_data<'a>(reader: &mut dyn Reader<'a>) -> Result<Option<Payload<'a>>> {
    let words = reader.read::<u8>()?;
    reader.skip(1)?;
    match usize::from(words) * 2 {
        0 => Ok(None),
        n => reader.read_buffer(n).map(Some),
    }
}
