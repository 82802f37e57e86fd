use super::item::{CpfItem, CpfItemType};
use crate::codec::{Deserializable, ReadExt, Reader, Serializable, WriteExt, Writer};
use crate::error::{EipError, Result};

/// Common Packet Format packet: an item count followed by the items.
///
/// Item order is significant; address item first, data item second.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpfPacket<'a> {
    pub items: Vec<CpfItem<'a>>,
}

impl<'a> CpfPacket<'a> {
    pub fn new() -> Self {
        CpfPacket { items: Vec::new() }
    }

    pub fn with_items(items: Vec<CpfItem<'a>>) -> Self {
        CpfPacket { items }
    }

    pub fn push(&mut self, item: CpfItem<'a>) {
        self.items.push(item);
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// First item of the given type.
    pub fn find(&self, item_type: CpfItemType) -> Option<&CpfItem<'a>> {
        self.items.iter().find(|item| item.item_type == item_type)
    }

    pub fn into_owned(self) -> CpfPacket<'static> {
        CpfPacket { items: self.items.into_iter().map(CpfItem::into_owned).collect() }
    }
}

impl Serializable for CpfPacket<'_> {
    fn length(&self) -> usize {
        2 + self.items.iter().map(|item| item.length()).sum::<usize>()
    }

    fn serialize(&self, writer: &mut dyn Writer) -> Result<()> {
        let count = u16::try_from(self.items.len())
            .map_err(|_| EipError::length(format!("{} CPF items exceed 65535", self.items.len())))?;
        writer.write(count)?;
        for item in &self.items {
            item.serialize(writer)?;
        }
        Ok(())
    }
}

impl<'a> Deserializable<'a> for CpfPacket<'a> {
    /// The item count alone bounds the loop. Preallocation is capped by
    /// what the reader can still hold, since the count comes off the wire.
    fn deserialize(reader: &mut dyn Reader<'a>) -> Result<Self> {
        let count = reader.read::<u16>()?;
        let room = reader.remaining().map_or(0, |r| r / CpfItem::HEADER_LENGTH);
        let mut items = Vec::with_capacity(usize::from(count).min(room));
        for _ in 0..count {
            items.push(CpfItem::deserialize(reader)?);
        }
        Ok(CpfPacket { items })
    }
}
