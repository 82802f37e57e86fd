use crate::cip::{MessageRouterRequest, MessageRouterResponse};
use crate::codec::{
    BufferReader, Deserializable, Payload, ReadExt, Reader, Serializable, WriteExt, Writer,
};
use crate::cpf::{CpfItem, CpfItemType, CpfPacket};
use crate::error::{EipError, Result};
use log::warn;

/// SendRRData request: interface handle, timeout, then a CPF packet with a
/// null address item and an unconnected message item wrapping `request`.
#[derive(Debug)]
pub struct RrDataRequest<'d> {
    pub interface_handle: u32,
    pub timeout: u16,
    pub request: MessageRouterRequest<'d>,
}

impl<'d> RrDataRequest<'d> {
    pub fn new(request: MessageRouterRequest<'d>) -> Self {
        RrDataRequest { interface_handle: 0, timeout: 0, request }
    }

    /// The entity placed in the unconnected message item.
    pub fn data(&self) -> &dyn Serializable {
        &self.request
    }
}

impl Serializable for RrDataRequest<'_> {
    fn length(&self) -> usize {
        // handle, timeout, item count, two item headers
        4 + 2 + 2 + 2 * CpfItem::HEADER_LENGTH + self.request.length()
    }

    fn serialize(&self, writer: &mut dyn Writer) -> Result<()> {
        writer.write(self.interface_handle)?;
        writer.write(self.timeout)?;
        let packet = CpfPacket::with_items(vec![
            CpfItem::null(),
            CpfItem::new(CpfItemType::UnconnectedMessage, self.data())?,
        ]);
        packet.serialize(writer)
    }
}

impl<'a> Deserializable<'a> for RrDataRequest<'_> {
    fn deserialize(_reader: &mut dyn Reader<'a>) -> Result<Self> {
        Err(EipError::Unsupported("deserializing an RR-Data request"))
    }

    fn deserialize_sized(_reader: &mut dyn Reader<'a>, _length: usize) -> Result<Self> {
        Err(EipError::Unsupported("deserializing an RR-Data request"))
    }
}

/// SendRRData reply carrying a message router response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RrDataResponse<'a> {
    pub interface_handle: u32,
    pub timeout: u16,
    pub response: MessageRouterResponse<'a>,
}

impl<'a> RrDataResponse<'a> {
    pub fn into_owned(self) -> RrDataResponse<'static> {
        RrDataResponse {
            interface_handle: self.interface_handle,
            timeout: self.timeout,
            response: self.response.into_owned(),
        }
    }

    /// Check the item layout of an unconnected reply and pull the message
    /// router response out of the data item.
    fn unwrap_packet(packet: CpfPacket<'a>) -> Result<MessageRouterResponse<'a>> {
        let mut items = packet.items.into_iter();
        let (address, data) = match (items.next(), items.next()) {
            (Some(address), Some(data)) => (address, data),
            _ => {
                return Err(EipError::protocol(
                    "RR-Data reply needs an address item and a data item",
                ));
            }
        };
        let extra = items.count();
        if extra > 0 {
            warn!("RR-Data reply carries {} unexpected extra CPF items", extra);
        }

        if address.item_type != CpfItemType::Null {
            return Err(EipError::protocol(format!(
                "RR-Data reply address item has type {:?}, expected Null",
                address.item_type
            )));
        }
        if address.data_length() != 0 {
            return Err(EipError::protocol(format!(
                "RR-Data reply null address item has length {}",
                address.data_length()
            )));
        }
        if data.item_type != CpfItemType::UnconnectedMessage {
            return Err(EipError::protocol(format!(
                "RR-Data reply data item has type {:?}, expected UnconnectedMessage",
                data.item_type
            )));
        }

        match data.data {
            Some(Payload::Borrowed(bytes)) => {
                let mut reader = BufferReader::new(bytes);
                MessageRouterResponse::deserialize_sized(&mut reader, bytes.len())
            }
            Some(Payload::Owned(bytes)) => {
                let mut reader = BufferReader::new(&bytes);
                MessageRouterResponse::deserialize_sized(&mut reader, bytes.len())
                    .map(MessageRouterResponse::into_owned)
            }
            None => Err(EipError::protocol("RR-Data reply data item is empty")),
        }
    }
}

impl Serializable for RrDataResponse<'_> {
    fn length(&self) -> usize {
        4 + 2 + 2 + 2 * CpfItem::HEADER_LENGTH + self.response.length()
    }

    fn serialize(&self, writer: &mut dyn Writer) -> Result<()> {
        writer.write(self.interface_handle)?;
        writer.write(self.timeout)?;
        let packet = CpfPacket::with_items(vec![
            CpfItem::null(),
            CpfItem::new(CpfItemType::UnconnectedMessage, &self.response)?,
        ]);
        packet.serialize(writer)
    }
}

impl<'a> Deserializable<'a> for RrDataResponse<'a> {
    fn deserialize(reader: &mut dyn Reader<'a>) -> Result<Self> {
        let interface_handle = reader.read()?;
        let timeout = reader.read()?;
        let packet = CpfPacket::deserialize(reader)?;
        let response = Self::unwrap_packet(packet)?;
        Ok(RrDataResponse { interface_handle, timeout, response })
    }
}
