use super::payload::Payload;
use super::primitives::Primitive;
use crate::error::{EipError, Result};
use std::io::{ErrorKind, Read, Write};

/// Byte cursor that deserializers pull from.
///
/// `'a` is the lifetime of the bytes behind the cursor. Buffer-backed readers
/// hand out borrowed views from [`Reader::read_buffer`]; stream-backed readers
/// have nothing to borrow from and return owned copies instead.
pub trait Reader<'a> {
    /// Bytes consumed so far.
    fn position(&self) -> usize;

    /// Bytes left before the end of the region, when the cursor knows it.
    fn remaining(&self) -> Option<usize>;

    /// Fill `out` completely or fail without a partial read being visible.
    fn read_bytes(&mut self, out: &mut [u8]) -> Result<()>;

    /// Take the next `n` bytes as a payload, zero-copy where possible.
    fn read_buffer(&mut self, n: usize) -> Result<Payload<'a>>;

    fn skip(&mut self, n: usize) -> Result<()>;
}

/// Byte cursor that serializers push into.
pub trait Writer {
    fn position(&self) -> usize;

    /// Free capacity, or `None` for growable sinks.
    fn remaining(&self) -> Option<usize>;

    fn write_bytes(&mut self, data: &[u8]) -> Result<()>;
}

/// Typed little-endian reads on any [`Reader`], including `dyn Reader`.
pub trait ReadExt<'a>: Reader<'a> {
    fn read<T: Primitive>(&mut self) -> Result<T> {
        let mut buf = [0u8; 8];
        let slot = &mut buf[..T::SIZE];
        self.read_bytes(slot)?;
        Ok(T::decode(slot))
    }
}

impl<'a, R: Reader<'a> + ?Sized> ReadExt<'a> for R {}

/// Typed little-endian writes on any [`Writer`], including `dyn Writer`.
pub trait WriteExt: Writer {
    fn write<T: Primitive>(&mut self, value: T) -> Result<()> {
        let mut buf = [0u8; 8];
        let slot = &mut buf[..T::SIZE];
        value.encode(slot);
        self.write_bytes(slot)
    }

    /// Emit `n` zero bytes for reserved or padding fields.
    fn write_zeros(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            self.write_bytes(&[0])?;
        }
        Ok(())
    }
}

impl<W: Writer + ?Sized> WriteExt for W {}

/// Reader over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct BufferReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BufferReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        BufferReader { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let remaining = self.buf.len() - self.pos;
        if n > remaining {
            return Err(EipError::Overrun { needed: n, remaining });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Everything not yet consumed.
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }
}

impl<'a> Reader<'a> for BufferReader<'a> {
    fn position(&self) -> usize {
        self.pos
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.buf.len() - self.pos)
    }

    fn read_bytes(&mut self, out: &mut [u8]) -> Result<()> {
        let src = self.take(out.len())?;
        out.copy_from_slice(src);
        Ok(())
    }

    fn read_buffer(&mut self, n: usize) -> Result<Payload<'a>> {
        self.take(n).map(Payload::Borrowed)
    }

    fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }
}

/// Writer over a fixed-capacity mutable slice.
#[derive(Debug)]
pub struct BufferWriter<'b> {
    buf: &'b mut [u8],
    pos: usize,
}

impl<'b> BufferWriter<'b> {
    pub fn new(buf: &'b mut [u8]) -> Self {
        BufferWriter { buf, pos: 0 }
    }

    /// The bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }
}

impl Writer for BufferWriter<'_> {
    fn position(&self) -> usize {
        self.pos
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.buf.len() - self.pos)
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        let remaining = self.buf.len() - self.pos;
        if data.len() > remaining {
            return Err(EipError::Overrun { needed: data.len(), remaining });
        }
        self.buf[self.pos..self.pos + data.len()].copy_from_slice(data);
        self.pos += data.len();
        Ok(())
    }
}

impl Writer for Vec<u8> {
    fn position(&self) -> usize {
        self.len()
    }

    fn remaining(&self) -> Option<usize> {
        None
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.extend_from_slice(data);
        Ok(())
    }
}

/// Reader over any `std::io::Read`. A stream that ends early is a framing
/// error, not an I/O error.
pub struct StreamReader<R> {
    inner: R,
    pos: usize,
}

impl<R: Read> StreamReader<R> {
    pub fn new(inner: R) -> Self {
        StreamReader { inner, pos: 0 }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<'a, R: Read> Reader<'a> for StreamReader<R> {
    fn position(&self) -> usize {
        self.pos
    }

    fn remaining(&self) -> Option<usize> {
        None
    }

    fn read_bytes(&mut self, out: &mut [u8]) -> Result<()> {
        match self.inner.read_exact(out) {
            Ok(()) => {
                self.pos += out.len();
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(EipError::length(format!(
                "stream ended before {} bytes could be read at offset {}",
                out.len(),
                self.pos
            ))),
            Err(e) => Err(e.into()),
        }
    }

    fn read_buffer(&mut self, n: usize) -> Result<Payload<'a>> {
        let mut data = vec![0u8; n];
        self.read_bytes(&mut data)?;
        Ok(Payload::Owned(data))
    }

    fn skip(&mut self, n: usize) -> Result<()> {
        let mut scratch = [0u8; 64];
        let mut left = n;
        while left > 0 {
            let chunk = left.min(scratch.len());
            self.read_bytes(&mut scratch[..chunk])?;
            left -= chunk;
        }
        Ok(())
    }
}

/// Writer over any `std::io::Write`.
pub struct StreamWriter<W> {
    inner: W,
    pos: usize,
}

impl<W: Write> StreamWriter<W> {
    pub fn new(inner: W) -> Self {
        StreamWriter { inner, pos: 0 }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Writer for StreamWriter<W> {
    fn position(&self) -> usize {
        self.pos
    }

    fn remaining(&self) -> Option<usize> {
        None
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.inner.write_all(data)?;
        self.pos += data.len();
        Ok(())
    }
}
