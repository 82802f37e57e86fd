use super::item::{CpfItem, CpfItemType};
use crate::codec::{Deserializable, ReadExt, Reader, Serializable, WriteExt, Writer};
use crate::error::{EipError, Result};

/// Data of a sequenced address item (type 0x8002) used on implicit I/O.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequencedAddressItem {
    pub connection_id: u32,
    pub sequence_number: u32,
}

impl SequencedAddressItem {
    pub fn new(connection_id: u32, sequence_number: u32) -> Self {
        SequencedAddressItem { connection_id, sequence_number }
    }

    /// Wrap into a CPF item of type 0x8002.
    pub fn to_item(&self) -> Result<CpfItem<'static>> {
        CpfItem::new(CpfItemType::SequencedAddress, self)
    }
}

impl Serializable for SequencedAddressItem {
    fn length(&self) -> usize {
        8
    }

    fn serialize(&self, writer: &mut dyn Writer) -> Result<()> {
        writer.write(self.connection_id)?;
        writer.write(self.sequence_number)
    }
}

impl<'a> Deserializable<'a> for SequencedAddressItem {
    fn deserialize(reader: &mut dyn Reader<'a>) -> Result<Self> {
        let connection_id = reader.read()?;
        let sequence_number = reader.read()?;
        Ok(SequencedAddressItem { connection_id, sequence_number })
    }
}

/// Connected data prefixed with a 16-bit sequence count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequencedDataItem<T> {
    pub sequence_number: u16,
    pub value: T,
}

impl<T> SequencedDataItem<T> {
    pub fn new(sequence_number: u16, value: T) -> Self {
        SequencedDataItem { sequence_number, value }
    }
}

impl<T: Serializable> Serializable for SequencedDataItem<T> {
    fn length(&self) -> usize {
        2 + self.value.length()
    }

    fn serialize(&self, writer: &mut dyn Writer) -> Result<()> {
        writer.write(self.sequence_number)?;
        self.value.serialize(writer)
    }
}

impl<'a, T: Deserializable<'a>> Deserializable<'a> for SequencedDataItem<T> {
    fn deserialize(reader: &mut dyn Reader<'a>) -> Result<Self> {
        let sequence_number = reader.read()?;
        let value = T::deserialize(reader)?;
        Ok(SequencedDataItem { sequence_number, value })
    }

    fn deserialize_sized(reader: &mut dyn Reader<'a>, length: usize) -> Result<Self> {
        if length < 2 {
            return Err(EipError::length(format!(
                "sequenced data needs at least 2 bytes, got {}",
                length
            )));
        }
        let sequence_number = reader.read()?;
        let value = T::deserialize_sized(reader, length - 2)?;
        Ok(SequencedDataItem { sequence_number, value })
    }
}
