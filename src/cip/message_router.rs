use super::path::Path;
use crate::codec::{
    BufferReader, Deserializable, Payload, ReadExt, Reader, Serializable, WriteExt, Writer,
};
use crate::error::{EipError, Result};
use std::fmt;

/// Explicit request addressed to the CIP message router.
pub struct MessageRouterRequest<'d> {
    pub service: u8,
    pub path: Path,
    pub data: Option<&'d dyn Serializable>,
}

impl<'d> MessageRouterRequest<'d> {
    pub fn new(service: u8, path: Path, data: Option<&'d dyn Serializable>) -> Self {
        MessageRouterRequest { service, path, data }
    }
}

// `data` is a trait object, so only its encoded length is shown.
impl fmt::Debug for MessageRouterRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageRouterRequest")
            .field("service", &format_args!("{:#04x}", self.service))
            .field("path", &self.path)
            .field("data_length", &self.data.map(|d| d.length()))
            .finish()
    }
}

impl Serializable for MessageRouterRequest<'_> {
    fn length(&self) -> usize {
        1 + self.path.length() + self.data.map_or(0, |d| d.length())
    }

    fn serialize(&self, writer: &mut dyn Writer) -> Result<()> {
        writer.write(self.service)?;
        self.path.serialize(writer)?;
        if let Some(data) = self.data {
            data.serialize(writer)?;
        }
        Ok(())
    }
}

impl<'a> Deserializable<'a> for MessageRouterRequest<'_> {
    fn deserialize(_reader: &mut dyn Reader<'a>) -> Result<Self> {
        Err(EipError::Unsupported("deserializing a message router request"))
    }

    fn deserialize_sized(_reader: &mut dyn Reader<'a>, _length: usize) -> Result<Self> {
        Err(EipError::Unsupported("deserializing a message router request"))
    }
}

/// Reply from the CIP message router.
///
/// Wire layout: reply service, reserved byte, general status, additional
/// status size in words, additional status, then response data up to the
/// end of the enclosing item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageRouterResponse<'a> {
    pub service: u8,
    pub general_status: u8,
    pub additional_status: Option<Payload<'a>>,
    pub response_data: Option<Payload<'a>>,
}

impl<'a> MessageRouterResponse<'a> {
    pub fn is_success(&self) -> bool {
        self.general_status == 0
    }

    pub fn additional_status(&self) -> &[u8] {
        self.additional_status.as_deref().unwrap_or(&[])
    }

    pub fn data(&self) -> &[u8] {
        self.response_data.as_deref().unwrap_or(&[])
    }

    /// Decode the response data as `T`. Missing data decodes from an empty
    /// slice, which fails for anything that needs bytes.
    pub fn data_as<'s, T: Deserializable<'s>>(&'s self) -> Result<T> {
        match &self.response_data {
            Some(payload) => payload.decode(),
            None => {
                let mut reader: BufferReader<'s> = BufferReader::new(&[]);
                T::deserialize_sized(&mut reader, 0)
            }
        }
    }

    /// Turn a nonzero general status into an error.
    pub fn check_status(&self) -> Result<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(EipError::CipStatus {
                service: self.service,
                status: self.general_status,
                additional_status: self.additional_status().to_vec(),
            })
        }
    }

    pub fn into_owned(self) -> MessageRouterResponse<'static> {
        MessageRouterResponse {
            service: self.service,
            general_status: self.general_status,
            additional_status: self.additional_status.map(Payload::into_owned),
            response_data: self.response_data.map(Payload::into_owned),
        }
    }
}

impl Serializable for MessageRouterResponse<'_> {
    fn length(&self) -> usize {
        4 + self.additional_status().len() + self.data().len()
    }

    fn serialize(&self, writer: &mut dyn Writer) -> Result<()> {
        let additional = self.additional_status();
        if additional.len() % 2 != 0 || additional.len() / 2 > usize::from(u8::MAX) {
            return Err(EipError::length(format!(
                "additional status of {} bytes is not encodable in words",
                additional.len()
            )));
        }
        writer.write(self.service)?;
        writer.write(0u8)?;
        writer.write(self.general_status)?;
        writer.write((additional.len() / 2) as u8)?;
        writer.write_bytes(additional)?;
        writer.write_bytes(self.data())
    }
}

impl<'a> Deserializable<'a> for MessageRouterResponse<'a> {
    /// The reply does not delimit its response data, so the enclosing
    /// length is required.
    fn deserialize(_reader: &mut dyn Reader<'a>) -> Result<Self> {
        Err(EipError::Unsupported("deserializing a message router response without a length"))
    }

    fn deserialize_sized(reader: &mut dyn Reader<'a>, length: usize) -> Result<Self> {
        if length < 4 {
            return Err(EipError::length(format!(
                "message router response needs at least 4 bytes, got {}",
                length
            )));
        }
        let service = reader.read::<u8>()?;
        reader.skip(1)?;
        let general_status = reader.read::<u8>()?;
        let additional_words = reader.read::<u8>()?;
        let additional_len = usize::from(additional_words) * 2;
        if 4 + additional_len > length {
            return Err(EipError::length(format!(
                "additional status of {} bytes exceeds response length {}",
                additional_len, length
            )));
        }
        let additional_status = match additional_len {
            0 => None,
            n => Some(reader.read_buffer(n)?),
        };
        let response_data = match length - 4 - additional_len {
            0 => None,
            n => Some(reader.read_buffer(n)?),
        };
        Ok(MessageRouterResponse {
            service,
            general_status,
            additional_status,
            response_data,
        })
    }
}
