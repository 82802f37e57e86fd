use super::io::{ReadExt, Reader, WriteExt, Writer};
use super::traits::{Deserializable, Serializable};
use crate::error::Result;

/// Fixed-width value with a little-endian wire image.
///
/// `encode`/`decode` always use little-endian order, so the wire format is the
/// same on big-endian hosts.
pub trait Primitive: Copy {
    const SIZE: usize;

    /// `bytes` is exactly `SIZE` long.
    fn decode(bytes: &[u8]) -> Self;

    /// `out` is exactly `SIZE` long.
    fn encode(self, out: &mut [u8]);
}

macro_rules! impl_primitive {
    ($type:ty, $bytes:expr) => {
        impl Primitive for $type {
            const SIZE: usize = $bytes;

            fn decode(bytes: &[u8]) -> Self {
                let mut buf = [0u8; $bytes];
                buf.copy_from_slice(bytes);
                <$type>::from_le_bytes(buf)
            }

            fn encode(self, out: &mut [u8]) {
                out.copy_from_slice(&self.to_le_bytes());
            }
        }

        impl Serializable for $type {
            fn length(&self) -> usize {
                $bytes
            }

            fn serialize(&self, writer: &mut dyn Writer) -> Result<()> {
                writer.write(*self)
            }
        }

        impl<'a> Deserializable<'a> for $type {
            fn deserialize(reader: &mut dyn Reader<'a>) -> Result<Self> {
                reader.read::<$type>()
            }
        }
    };
}

impl_primitive!(u8, 1);
impl_primitive!(u16, 2);
impl_primitive!(u32, 4);
impl_primitive!(u64, 8);

impl_primitive!(i8, 1);
impl_primitive!(i16, 2);
impl_primitive!(i32, 4);
impl_primitive!(i64, 8);

impl_primitive!(f32, 4);
impl_primitive!(f64, 8);

// CIP BOOL: one byte, anything nonzero is true.
impl Primitive for bool {
    const SIZE: usize = 1;

    fn decode(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }

    fn encode(self, out: &mut [u8]) {
        out[0] = self as u8;
    }
}

impl Serializable for bool {
    fn length(&self) -> usize {
        1
    }

    fn serialize(&self, writer: &mut dyn Writer) -> Result<()> {
        writer.write(*self)
    }
}

impl<'a> Deserializable<'a> for bool {
    fn deserialize(reader: &mut dyn Reader<'a>) -> Result<Self> {
        reader.read::<bool>()
    }
}
