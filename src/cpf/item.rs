use crate::codec::{Deserializable, Payload, ReadExt, Reader, Serializable, WriteExt, Writer};
use crate::error::{EipError, Result};

/// Common Packet Format item type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CpfItemType {
    /// Null address item (0x0000)
    Null,
    /// ListIdentity response item (0x000C)
    ListIdentityResponse,
    /// Connected address item (0x00A1)
    ConnectionBased,
    /// Connected transport packet (0x00B1)
    ConnectedTransportPacket,
    /// Unconnected message (0x00B2)
    UnconnectedMessage,
    /// Sequenced address item (0x8002)
    SequencedAddress,
    Unknown(u16),
}

impl From<u16> for CpfItemType {
    fn from(v: u16) -> Self {
        match v {
            0x0000 => CpfItemType::Null,
            0x000C => CpfItemType::ListIdentityResponse,
            0x00A1 => CpfItemType::ConnectionBased,
            0x00B1 => CpfItemType::ConnectedTransportPacket,
            0x00B2 => CpfItemType::UnconnectedMessage,
            0x8002 => CpfItemType::SequencedAddress,
            other => CpfItemType::Unknown(other),
        }
    }
}

impl From<CpfItemType> for u16 {
    fn from(t: CpfItemType) -> u16 {
        match t {
            CpfItemType::Null => 0x0000,
            CpfItemType::ListIdentityResponse => 0x000C,
            CpfItemType::ConnectionBased => 0x00A1,
            CpfItemType::ConnectedTransportPacket => 0x00B1,
            CpfItemType::UnconnectedMessage => 0x00B2,
            CpfItemType::SequencedAddress => 0x8002,
            CpfItemType::Unknown(other) => other,
        }
    }
}

/// One typed item of a Common Packet Format packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpfItem<'a> {
    pub item_type: CpfItemType,
    pub data: Option<Payload<'a>>,
}

impl<'a> CpfItem<'a> {
    pub const HEADER_LENGTH: usize = 4;

    /// Null address item: type 0, no data.
    pub fn null() -> Self {
        CpfItem { item_type: CpfItemType::Null, data: None }
    }

    /// Item whose data is the encoding of `value`.
    pub fn new(item_type: CpfItemType, value: &dyn Serializable) -> Result<CpfItem<'static>> {
        Ok(CpfItem { item_type, data: Some(Payload::encode(value)?) })
    }

    pub fn from_payload(item_type: CpfItemType, data: Payload<'a>) -> Self {
        CpfItem { item_type, data: Some(data) }
    }

    pub fn data_length(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.len())
    }

    pub fn data(&self) -> &[u8] {
        self.data.as_deref().unwrap_or(&[])
    }

    /// Decode the item data as `T`.
    pub fn data_as<'s, T: Deserializable<'s>>(&'s self) -> Result<T> {
        match &self.data {
            Some(payload) => payload.decode(),
            None => Err(EipError::protocol(format!("{:?} item carries no data", self.item_type))),
        }
    }

    pub fn into_owned(self) -> CpfItem<'static> {
        CpfItem { item_type: self.item_type, data: self.data.map(Payload::into_owned) }
    }

    fn read_header(reader: &mut dyn Reader<'a>) -> Result<(CpfItemType, usize)> {
        let item_type = CpfItemType::from(reader.read::<u16>()?);
        let item_length = usize::from(reader.read::<u16>()?);
        Ok((item_type, item_length))
    }

    fn read_data(
        reader: &mut dyn Reader<'a>,
        item_type: CpfItemType,
        item_length: usize,
    ) -> Result<Self> {
        let data = match item_length {
            0 => None,
            n => Some(reader.read_buffer(n)?),
        };
        Ok(CpfItem { item_type, data })
    }
}

impl Serializable for CpfItem<'_> {
    fn length(&self) -> usize {
        Self::HEADER_LENGTH + self.data_length()
    }

    fn serialize(&self, writer: &mut dyn Writer) -> Result<()> {
        let data_len = u16::try_from(self.data_length()).map_err(|_| {
            EipError::length(format!("item data of {} bytes exceeds 65535", self.data_length()))
        })?;
        writer.write(u16::from(self.item_type))?;
        writer.write(data_len)?;
        writer.write_bytes(self.data())
    }
}

impl<'a> Deserializable<'a> for CpfItem<'a> {
    /// Outermost frame: the item's own length field is trusted and the reader
    /// bounds catch a truncated buffer.
    fn deserialize(reader: &mut dyn Reader<'a>) -> Result<Self> {
        let (item_type, item_length) = Self::read_header(reader)?;
        Self::read_data(reader, item_type, item_length)
    }

    /// The declared envelope must hold both the item header and the length
    /// the item reports for itself.
    fn deserialize_sized(reader: &mut dyn Reader<'a>, length: usize) -> Result<Self> {
        if length < Self::HEADER_LENGTH {
            return Err(EipError::length(format!(
                "CPF item needs at least {} bytes, envelope declares {}",
                Self::HEADER_LENGTH,
                length
            )));
        }
        let (item_type, item_length) = Self::read_header(reader)?;
        if length < item_length + Self::HEADER_LENGTH {
            return Err(EipError::length(format!(
                "CPF item reports {} data bytes but envelope only holds {}",
                item_length,
                length - Self::HEADER_LENGTH
            )));
        }
        Self::read_data(reader, item_type, item_length)
    }
}
