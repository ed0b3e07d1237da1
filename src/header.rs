use crate::constants::commands::HEADERS;
use crate::constants::config::VERBOSE;
use crate::constants::header_constants::FIXED_HEADER_SIZE;
use crate::logger::log;
use crate::stream::{DataSource, IstreamReader, OstreamWriter, Reader, Writer};
use crate::utility::{double_hash, encode_hash, variable_uint_size, HashDigest, NULL_HASH};
use crate::Hashable;
use std::io;

//https://developer.bitcoin.org/reference/block_chain.html#block-headers
/// A block header.
///
/// `transaction_count` is only on the wire when the caller asks for it; the
/// header does not remember whether it was read with or without it.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Header {
    pub version: u32,
    pub previous_block_hash: HashDigest,
    pub merkle: HashDigest,
    pub timestamp: u32,
    pub bits: u32,
    pub nonce: u32,
    pub transaction_count: u64,
}

impl Header {
    pub const COMMAND: &'static str = HEADERS;

    pub fn new(
        version: u32,
        previous_block_hash: HashDigest,
        merkle: HashDigest,
        timestamp: u32,
        bits: u32,
        nonce: u32,
    ) -> Self {
        Self {
            version,
            previous_block_hash,
            merkle,
            timestamp,
            bits,
            nonce,
            transaction_count: 0,
        }
    }

    pub fn factory_from_data(data: &[u8], with_transaction_count: bool) -> Header {
        let mut instance = Header::default();
        instance.from_data(data, with_transaction_count);
        instance
    }

    pub fn factory_from_stream<R: io::Read>(stream: &mut R, with_transaction_count: bool) -> Header {
        let mut instance = Header::default();
        instance.from_stream(stream, with_transaction_count);
        instance
    }

    pub fn factory_from_reader<R: Reader>(source: &mut R, with_transaction_count: bool) -> Header {
        let mut instance = Header::default();
        instance.from_reader(source, with_transaction_count);
        instance
    }

    /// True if any of the six fixed fields is set. `transaction_count` is
    /// not considered.
    pub fn is_valid(&self) -> bool {
        self.version != 0
            || self.previous_block_hash != NULL_HASH
            || self.merkle != NULL_HASH
            || self.timestamp != 0
            || self.bits != 0
            || self.nonce != 0
    }

    pub fn reset(&mut self) {
        *self = Header::default();
    }

    /// Decodes from the start of `data`; trailing bytes are ignored.
    pub fn from_data(&mut self, data: &[u8], with_transaction_count: bool) -> bool {
        let mut source = DataSource::from_slice(data);
        self.from_reader(&mut source, with_transaction_count)
    }

    pub fn from_stream<R: io::Read>(&mut self, stream: &mut R, with_transaction_count: bool) -> bool {
        let mut source = IstreamReader::new(stream);
        self.from_reader(&mut source, with_transaction_count)
    }

    /// Resets the header, then reads it from `source`. On failure the header
    /// is left null.
    pub fn from_reader<R: Reader>(&mut self, source: &mut R, with_transaction_count: bool) -> bool {
        self.reset();

        let result = match self.read_fields(source, with_transaction_count) {
            Ok(()) => source.is_valid(),
            Err(error) => {
                log(&format!("Failed to decode block header: {}", error), VERBOSE);
                false
            }
        };

        if !result {
            self.reset();
        }
        result
    }

    fn read_fields<R: Reader>(&mut self, source: &mut R, with_transaction_count: bool) -> io::Result<()> {
        self.version = source.read_4_bytes_little_endian()?;
        self.previous_block_hash = source.read_hash()?;
        self.merkle = source.read_hash()?;
        self.timestamp = source.read_4_bytes_little_endian()?;
        self.bits = source.read_4_bytes_little_endian()?;
        self.nonce = source.read_4_bytes_little_endian()?;
        self.transaction_count = 0;
        if with_transaction_count {
            self.transaction_count = source.read_variable_uint_little_endian()?;
        }
        Ok(())
    }

    /// Panics if the bytes produced disagree with `serialized_size`.
    pub fn to_data(&self, with_transaction_count: bool) -> Vec<u8> {
        let size = self.serialized_size(with_transaction_count) as usize;
        let mut sink = OstreamWriter::new(Vec::with_capacity(size));
        self.to_writer(&mut sink, with_transaction_count)
            .expect("writing a header into memory cannot fail");

        let data = sink.into_inner();
        assert_eq!(data.len(), size, "header encoding disagrees with serialized_size");
        data
    }

    pub fn to_stream<W: io::Write>(&self, stream: &mut W, with_transaction_count: bool) -> io::Result<()> {
        let mut sink = OstreamWriter::new(stream);
        self.to_writer(&mut sink, with_transaction_count)?;
        sink.flush()
    }

    pub fn to_writer<W: Writer>(&self, sink: &mut W, with_transaction_count: bool) -> io::Result<()> {
        sink.write_4_bytes_little_endian(self.version)?;
        sink.write_hash(&self.previous_block_hash)?;
        sink.write_hash(&self.merkle)?;
        sink.write_4_bytes_little_endian(self.timestamp)?;
        sink.write_4_bytes_little_endian(self.bits)?;
        sink.write_4_bytes_little_endian(self.nonce)?;

        if with_transaction_count {
            sink.write_variable_uint_little_endian(self.transaction_count)?;
        }
        Ok(())
    }

    pub fn serialized_size(&self, with_transaction_count: bool) -> u64 {
        let mut size = FIXED_HEADER_SIZE as u64;
        if with_transaction_count {
            size += variable_uint_size(self.transaction_count);
        }
        size
    }

    /// Double hash of the 80 fixed bytes; never covers `transaction_count`.
    pub fn hash(&self) -> HashDigest {
        double_hash(&self.to_data(false))
    }
}

impl Hashable for Header {
    fn hash(&self) -> HashDigest {
        Header::hash(self)
    }
}

impl std::fmt::Display for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", encode_hash(&self.hash()))
    }
}
