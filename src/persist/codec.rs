//! Field-at-a-time binary codec.
//!
//! Counts are written as 8-byte little-endian `u64`, reals as the
//! little-endian bits of an IEEE-754 `f64`. A stream that ends early is
//! reported as [`NetError::CorruptData`] naming the field being read.

use std::io::{ErrorKind, Read, Write};

use crate::error::{NetError, Result};

pub struct BinaryWriter<W: Write> {
    inner: W,
}

impl<W: Write> BinaryWriter<W> {
    pub fn new(inner: W) -> Self {
        BinaryWriter { inner }
    }

    pub fn write_usize(&mut self, value: usize) -> Result<()> {
        self.inner.write_all(&(value as u64).to_le_bytes())?;
        Ok(())
    }

    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.inner.write_all(&value.to_bits().to_le_bytes())?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

pub struct BinaryReader<R: Read> {
    inner: R,
    offset: u64,
}

impl<R: Read> BinaryReader<R> {
    pub fn new(inner: R) -> Self {
        BinaryReader { inner, offset: 0 }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn read_usize(&mut self, field: &str) -> Result<usize> {
        let raw = u64::from_le_bytes(self.read_word(field)?);
        usize::try_from(raw).map_err(|_| {
            NetError::CorruptData(format!("{field} = {raw} does not fit in usize"))
        })
    }

    pub fn read_f64(&mut self, field: &str) -> Result<f64> {
        Ok(f64::from_bits(u64::from_le_bytes(self.read_word(field)?)))
    }

    fn read_word(&mut self, field: &str) -> Result<[u8; 8]> {
        let mut buf = [0u8; 8];
        match self.inner.read_exact(&mut buf) {
            Ok(()) => {
                self.offset += 8;
                Ok(buf)
            }
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(NetError::CorruptData(format!(
                "stream ended at byte {} while reading {field}",
                self.offset
            ))),
            Err(e) => Err(NetError::Io(e)),
        }
    }
}

/// Types with a fixed binary layout.
pub trait Encode {
    fn encode<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()>;
}

pub trait Decode: Sized {
    fn decode<R: Read>(reader: &mut BinaryReader<R>) -> Result<Self>;
}
