//! Sequential readers and writers the codecs are written against.
//!
//! Every decode path funnels into a [`Reader`] and every encode path into a
//! [`Writer`], so field order lives in exactly one place per record. The
//! adapters here wrap a byte slice or any `std::io` stream into those
//! capabilities.

use crate::utility::{HashDigest, NULL_HASH};
use std::io::{self, Cursor, Read, Write};

pub trait Reader {
    /// Fills `buf` completely or fails.
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// False once any read has failed.
    fn is_valid(&self) -> bool;

    fn read_byte(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.read_bytes(&mut buf)?;
        Ok(buf[0])
    }

    fn read_2_bytes_little_endian(&mut self) -> io::Result<u16> {
        let mut buf = [0u8; 2];
        self.read_bytes(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    fn read_4_bytes_little_endian(&mut self) -> io::Result<u32> {
        let mut buf = [0u8; 4];
        self.read_bytes(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn read_8_bytes_little_endian(&mut self) -> io::Result<u64> {
        let mut buf = [0u8; 8];
        self.read_bytes(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    fn read_hash(&mut self) -> io::Result<HashDigest> {
        let mut hash = NULL_HASH;
        self.read_bytes(&mut hash)?;
        Ok(hash)
    }

    // Non-minimal encodings are accepted.
    fn read_variable_uint_little_endian(&mut self) -> io::Result<u64> {
        let first_byte = self.read_byte()?;
        match first_byte {
            0xff => self.read_8_bytes_little_endian(),
            0xfe => Ok(self.read_4_bytes_little_endian()? as u64),
            0xfd => Ok(self.read_2_bytes_little_endian()? as u64),
            _ => Ok(first_byte as u64),
        }
    }
}

pub trait Writer {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;

    fn write_byte(&mut self, value: u8) -> io::Result<()> {
        self.write_bytes(&[value])
    }

    fn write_2_bytes_little_endian(&mut self, value: u16) -> io::Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    fn write_4_bytes_little_endian(&mut self, value: u32) -> io::Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    fn write_8_bytes_little_endian(&mut self, value: u64) -> io::Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    fn write_hash(&mut self, hash: &HashDigest) -> io::Result<()> {
        self.write_bytes(hash)
    }

    //ver: https://btcinformation.org/en/developer-reference#compactsize-unsigned-integers
    fn write_variable_uint_little_endian(&mut self, value: u64) -> io::Result<()> {
        match value {
            0..=0xfc => self.write_byte(value as u8),
            0xfd..=0xffff => {
                self.write_byte(0xfd)?;
                self.write_2_bytes_little_endian(value as u16)
            }
            0x10000..=0xffffffff => {
                self.write_byte(0xfe)?;
                self.write_4_bytes_little_endian(value as u32)
            }
            _ => {
                self.write_byte(0xff)?;
                self.write_8_bytes_little_endian(value)
            }
        }
    }
}

/// [`Reader`] over any `io::Read`. The first failed read poisons it: later
/// reads fail without touching the stream.
#[derive(Debug)]
pub struct IstreamReader<R> {
    inner: R,
    valid: bool,
}

/// Reader over an in-memory buffer.
pub type DataSource<'a> = IstreamReader<Cursor<&'a [u8]>>;

impl<R: Read> IstreamReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, valid: true }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<'a> IstreamReader<Cursor<&'a [u8]>> {
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self::new(Cursor::new(data))
    }
}

impl<T: AsRef<[u8]>> IstreamReader<Cursor<T>> {
    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.inner.position() as usize
    }

    pub fn is_exhausted(&self) -> bool {
        self.position() >= self.inner.get_ref().as_ref().len()
    }
}

impl<R: Read> Reader for IstreamReader<R> {
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<()> {
        if !self.valid {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "reader failed on an earlier read",
            ));
        }
        self.inner.read_exact(buf).map_err(|e| {
            self.valid = false;
            e
        })
    }

    fn is_valid(&self) -> bool {
        self.valid
    }
}

/// [`Writer`] over any `io::Write`.
#[derive(Debug)]
pub struct OstreamWriter<W> {
    inner: W,
}

impl<W: Write> OstreamWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Writer for OstreamWriter<W> {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)
    }
}
