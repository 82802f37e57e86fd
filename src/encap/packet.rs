use super::header::{EncapCommand, EncapHeader};
use crate::codec::{Deserializable, Payload, Reader, Serializable, Writer};
use crate::error::{EipError, Result};

/// Encapsulation header plus its payload; the unit sent over the control
/// socket.
///
/// `serialize` always writes the header length from the payload actually
/// attached, so a stale `header.length` never reaches the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncapPacket<'a> {
    pub header: EncapHeader,
    payload: Option<Payload<'a>>,
}

impl<'a> EncapPacket<'a> {
    pub fn new(command: EncapCommand, session_handle: u32) -> Self {
        EncapPacket { header: EncapHeader::new(command, session_handle), payload: None }
    }

    /// Packet carrying the encoding of `payload`.
    pub fn with_payload(
        command: EncapCommand,
        session_handle: u32,
        payload: &dyn Serializable,
    ) -> Result<EncapPacket<'static>> {
        let mut packet = EncapPacket::new(command, session_handle);
        packet.set_payload(payload)?;
        Ok(packet)
    }

    pub fn set_payload(&mut self, payload: &dyn Serializable) -> Result<()> {
        self.payload = Some(Payload::encode(payload)?);
        self.update_length()
    }

    pub fn set_raw_payload(&mut self, payload: Payload<'a>) -> Result<()> {
        self.payload = Some(payload);
        self.update_length()
    }

    pub fn clear_payload(&mut self) {
        self.payload = None;
        self.header.length = 0;
    }

    /// Refresh `header.length` from the attached payload.
    pub fn update_length(&mut self) -> Result<()> {
        self.header.length = self.payload_length()?;
        Ok(())
    }

    fn payload_length(&self) -> Result<u16> {
        let len = self.payload.as_ref().map_or(0, |p| p.len());
        u16::try_from(len)
            .map_err(|_| EipError::length(format!("payload of {} bytes exceeds 65535", len)))
    }

    pub fn payload(&self) -> Option<&Payload<'a>> {
        self.payload.as_ref()
    }

    pub fn payload_bytes(&self) -> &[u8] {
        self.payload.as_deref().unwrap_or(&[])
    }

    /// Decode the payload as `T`.
    pub fn payload_as<'s, T: Deserializable<'s>>(&'s self) -> Result<T> {
        match &self.payload {
            Some(payload) => payload.decode(),
            None => Err(EipError::protocol(format!(
                "{:?} packet carries no payload",
                self.header.command
            ))),
        }
    }

    pub fn into_owned(self) -> EncapPacket<'static> {
        EncapPacket { header: self.header, payload: self.payload.map(Payload::into_owned) }
    }

    fn read_payload(reader: &mut dyn Reader<'a>, header: EncapHeader) -> Result<Self> {
        let payload = match usize::from(header.length) {
            0 => None,
            n => Some(reader.read_buffer(n)?),
        };
        Ok(EncapPacket { header, payload })
    }
}

impl Serializable for EncapPacket<'_> {
    fn length(&self) -> usize {
        EncapHeader::HEADER_LENGTH + self.payload.as_ref().map_or(0, |p| p.len())
    }

    fn serialize(&self, writer: &mut dyn Writer) -> Result<()> {
        let length = self.payload_length()?;
        self.header.serialize_with_length(writer, length)?;
        if let Some(payload) = &self.payload {
            payload.serialize(writer)?;
        }
        Ok(())
    }
}

impl<'a> Deserializable<'a> for EncapPacket<'a> {
    fn deserialize(reader: &mut dyn Reader<'a>) -> Result<Self> {
        let header = EncapHeader::deserialize(reader)?;
        Self::read_payload(reader, header)
    }

    /// `length` is the transport frame size; it must match the header's
    /// payload length exactly.
    fn deserialize_sized(reader: &mut dyn Reader<'a>, length: usize) -> Result<Self> {
        let header = EncapHeader::deserialize(reader)?;
        let expected = usize::from(header.length) + EncapHeader::HEADER_LENGTH;
        if length != expected {
            return Err(EipError::length(format!(
                "frame of {} bytes does not match header length {} + {}",
                length,
                header.length,
                EncapHeader::HEADER_LENGTH
            )));
        }
        Self::read_payload(reader, header)
    }
}
