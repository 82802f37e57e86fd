use crate::codec::{Deserializable, Reader, Serializable, WriteExt, Writer};
use crate::error::{EipError, Result};

/// Logical segment type bytes (8-bit logical values).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SegmentType {
    LogicalClass = 0x20,
    LogicalInstance = 0x24,
    LogicalConnectionPoint = 0x2C,
    LogicalAttribute = 0x30,
}

/// Encoded CIP path: a run of 2-byte logical segments preceded by the path
/// size in 16-bit words.
///
/// Paths are only ever sent by this client, so they cannot be parsed back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    segments: Vec<u8>,
    pad_after_length: bool,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path whose default serialization emits a zero byte after the size.
    pub fn with_pad_after_length() -> Self {
        Path { segments: Vec::new(), pad_after_length: true }
    }

    /// Shorthand for the usual class / instance / attribute address.
    pub fn attribute(class_id: u8, instance_id: u8, attribute_id: u8) -> Self {
        let mut path = Path::new();
        path.add_logical_class(class_id)
            .add_logical_instance(instance_id)
            .add_logical_attribute(attribute_id);
        path
    }

    /// Shorthand for a class / instance address.
    pub fn instance(class_id: u8, instance_id: u8) -> Self {
        let mut path = Path::new();
        path.add_logical_class(class_id).add_logical_instance(instance_id);
        path
    }

    fn add_segment(&mut self, kind: SegmentType, value: u8) -> &mut Self {
        self.segments.push(kind as u8);
        self.segments.push(value);
        self
    }

    pub fn add_logical_class(&mut self, class_id: u8) -> &mut Self {
        self.add_segment(SegmentType::LogicalClass, class_id)
    }

    pub fn add_logical_instance(&mut self, instance_id: u8) -> &mut Self {
        self.add_segment(SegmentType::LogicalInstance, instance_id)
    }

    pub fn add_logical_attribute(&mut self, attribute_id: u8) -> &mut Self {
        self.add_segment(SegmentType::LogicalAttribute, attribute_id)
    }

    pub fn add_logical_connection_point(&mut self, connection_point: u8) -> &mut Self {
        self.add_segment(SegmentType::LogicalConnectionPoint, connection_point)
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len() / 2
    }

    pub fn pad_after_length(&self) -> bool {
        self.pad_after_length
    }

    /// Encoded size when serialized with an explicit pad choice.
    pub fn length_with(&self, pad_after_length: bool) -> usize {
        1 + self.segments.len() + usize::from(pad_after_length)
    }

    /// Serialize with an explicit pad choice, overriding the path's own.
    pub fn serialize_with(&self, writer: &mut dyn Writer, pad_after_length: bool) -> Result<()> {
        // size is in words, not bytes
        let words = u8::try_from(self.segment_count())
            .map_err(|_| EipError::length("path has more than 255 segments"))?;
        writer.write(words)?;
        if pad_after_length {
            writer.write(0u8)?;
        }
        writer.write_bytes(&self.segments)
    }
}

impl Serializable for Path {
    fn length(&self) -> usize {
        self.length_with(self.pad_after_length)
    }

    fn serialize(&self, writer: &mut dyn Writer) -> Result<()> {
        self.serialize_with(writer, self.pad_after_length)
    }
}

impl<'a> Deserializable<'a> for Path {
    fn deserialize(_reader: &mut dyn Reader<'a>) -> Result<Self> {
        Err(EipError::Unsupported("deserializing a CIP path"))
    }

    fn deserialize_sized(_reader: &mut dyn Reader<'a>, _length: usize) -> Result<Self> {
        Err(EipError::Unsupported("deserializing a CIP path"))
    }
}
