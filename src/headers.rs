use crate::constants::commands::HEADERS;
use crate::constants::config::VERBOSE;
use crate::constants::header_constants::MAX_HEADERS;
use crate::header::Header;
use crate::logger::{self, log};
use crate::stream::{DataSource, IstreamReader, OstreamWriter, Reader, Writer};
use crate::utility::{encode_hash, into_hashmap, variable_uint_size, HashDigest};
use std::collections::HashMap;
use std::io;

//https://developer.bitcoin.org/reference/p2p_networking.html#headers
/// Payload of a `headers` message: a compact size count, then every header
/// followed by its transaction count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    pub elements: Vec<Header>,
}

impl Headers {
    pub const COMMAND: &'static str = HEADERS;

    pub fn new(elements: Vec<Header>) -> Self {
        Self { elements }
    }

    pub fn factory_from_data(data: &[u8]) -> Headers {
        let mut instance = Headers::default();
        instance.from_data(data);
        instance
    }

    pub fn factory_from_stream<R: io::Read>(stream: &mut R) -> Headers {
        let mut instance = Headers::default();
        instance.from_stream(stream);
        instance
    }

    pub fn factory_from_reader<R: Reader>(source: &mut R) -> Headers {
        let mut instance = Headers::default();
        instance.from_reader(source);
        instance
    }

    pub fn is_valid(&self) -> bool {
        !self.elements.is_empty()
    }

    pub fn reset(&mut self) {
        self.elements.clear();
    }

    pub fn from_data(&mut self, data: &[u8]) -> bool {
        let mut source = DataSource::from_slice(data);
        self.from_reader(&mut source)
    }

    pub fn from_stream<R: io::Read>(&mut self, stream: &mut R) -> bool {
        let mut source = IstreamReader::new(stream);
        self.from_reader(&mut source)
    }

    pub fn from_reader<R: Reader>(&mut self, source: &mut R) -> bool {
        self.reset();

        let result = match self.read_elements(source) {
            Ok(()) => source.is_valid(),
            Err(error) => {
                log(&format!("Failed to decode headers payload: {}", error), VERBOSE);
                false
            }
        };

        if !result {
            self.reset();
        } else if logger::is_verbose() {
            if let Some(hash) = self.last_header_hash() {
                log(
                    &format!(
                        "Read {} headers, last one is {}",
                        self.elements.len(),
                        encode_hash(&hash)
                    ),
                    VERBOSE,
                );
            }
        }
        result
    }

    fn read_elements<R: Reader>(&mut self, source: &mut R) -> io::Result<()> {
        let count = source.read_variable_uint_little_endian()?;
        if count > MAX_HEADERS {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("headers count {} exceeds limit of {}", count, MAX_HEADERS),
            ));
        }

        self.elements.reserve(count as usize);
        for index in 0..count {
            let mut header = Header::default();
            if !header.from_reader(source, true) {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("header {} of {} is truncated", index, count),
                ));
            }
            self.elements.push(header);
        }
        Ok(())
    }

    pub fn to_data(&self) -> Vec<u8> {
        let size = self.serialized_size() as usize;
        let mut sink = OstreamWriter::new(Vec::with_capacity(size));
        self.to_writer(&mut sink)
            .expect("writing headers into memory cannot fail");

        let data = sink.into_inner();
        assert_eq!(data.len(), size, "headers encoding disagrees with serialized_size");
        data
    }

    pub fn to_stream<W: io::Write>(&self, stream: &mut W) -> io::Result<()> {
        let mut sink = OstreamWriter::new(stream);
        self.to_writer(&mut sink)?;
        sink.flush()
    }

    pub fn to_writer<W: Writer>(&self, sink: &mut W) -> io::Result<()> {
        sink.write_variable_uint_little_endian(self.elements.len() as u64)?;
        for header in &self.elements {
            header.to_writer(sink, true)?;
        }
        Ok(())
    }

    pub fn serialized_size(&self) -> u64 {
        self.elements
            .iter()
            .map(|header| header.serialized_size(true))
            .sum::<u64>()
            + variable_uint_size(self.elements.len() as u64)
    }

    pub fn last_header_hash(&self) -> Option<HashDigest> {
        self.elements.last().map(Header::hash)
    }

    pub fn index_by_hash(&self) -> HashMap<HashDigest, Header> {
        into_hashmap(self.elements.clone())
    }

    /// True when every header points at the hash of the one before it.
    pub fn is_linked(&self) -> bool {
        self.elements
            .windows(2)
            .all(|pair| pair[1].previous_block_hash == pair[0].hash())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utility::NULL_HASH;
    use std::io::Cursor;

    fn chain_of(length: usize) -> Headers {
        let mut elements: Vec<Header> = Vec::with_capacity(length);
        let mut previous_block_hash = NULL_HASH;
        for height in 0..length {
            let header = Header::new(
                2,
                previous_block_hash,
                [height as u8; 32],
                1231006505 + height as u32 * 600,
                0x1d00ffff,
                height as u32,
            );
            previous_block_hash = header.hash();
            elements.push(header);
        }
        Headers::new(elements)
    }

    #[test]
    fn test_round_trip() {
        let headers = chain_of(5);
        let data = headers.to_data();
        assert_eq!(data.len() as u64, headers.serialized_size());
        assert_eq!(data.len(), 1 + 5 * 81);

        let decoded = Headers::factory_from_data(&data);
        assert_eq!(decoded, headers);
        assert!(decoded.is_valid());
    }

    #[test]
    fn test_empty_payload() {
        let headers = Headers::default();
        assert_eq!(headers.to_data(), vec![0x00]);

        let mut decoded = chain_of(2);
        assert!(decoded.from_data(&[0x00]));
        assert!(!decoded.is_valid());
        assert_eq!(decoded.last_header_hash(), None);
    }

    #[test]
    fn test_truncated_payload_resets() {
        let data = chain_of(3).to_data();
        let mut decoded = chain_of(1);
        assert!(!decoded.from_data(&data[..data.len() - 1]));
        assert_eq!(decoded, Headers::default());
    }

    #[test]
    fn test_count_above_limit_fails() {
        let mut sink = OstreamWriter::new(Vec::new());
        sink.write_variable_uint_little_endian(MAX_HEADERS + 1).unwrap();
        let mut data = sink.into_inner();
        data.extend(vec![0u8; 81]);
        let decoded = Headers::factory_from_data(&data);
        assert_eq!(decoded, Headers::default());
    }

    #[test]
    fn test_transaction_counts_survive() {
        let mut headers = chain_of(2);
        headers.elements[1].transaction_count = 300;
        let decoded = Headers::factory_from_data(&headers.to_data());
        assert_eq!(decoded.elements[1].transaction_count, 300);
        assert_eq!(decoded.serialized_size(), 1 + 81 + 83);
    }

    #[test]
    fn test_stream_round_trip() -> Result<(), io::Error> {
        let headers = chain_of(4);
        let mut stream = Cursor::new(Vec::new());
        headers.to_stream(&mut stream)?;
        stream.set_position(0);

        let decoded = Headers::factory_from_stream(&mut stream);
        assert_eq!(decoded, headers);
        Ok(())
    }

    #[test]
    fn test_linked_chain() {
        let mut headers = chain_of(4);
        assert!(headers.is_linked());
        assert_eq!(headers.last_header_hash(), Some(headers.elements[3].hash()));

        headers.elements[2].nonce += 1;
        assert!(!headers.is_linked());
    }

    #[test]
    fn test_index_by_hash() {
        let headers = chain_of(3);
        let index = headers.index_by_hash();
        assert_eq!(index.len(), 3);
        for header in &headers.elements {
            assert_eq!(index.get(&header.hash()), Some(header));
        }
    }

    #[test]
    fn test_command() {
        assert_eq!(Headers::COMMAND, Header::COMMAND);
    }
}
