use crate::constants::header_constants::HASH_SIZE;
use crate::Hashable;
use bitcoin_hashes::{sha256d, Hash};
use std::collections::HashMap;

pub type HashDigest = [u8; HASH_SIZE];

pub const NULL_HASH: HashDigest = [0; HASH_SIZE];

/// SHA-256 applied twice.
pub fn double_hash(bytes: &[u8]) -> HashDigest {
    sha256d::Hash::hash(bytes).to_byte_array()
}

/// Renders a digest the way block explorers show it: byte-reversed hex.
pub fn encode_hash(hash: &HashDigest) -> String {
    hash.iter().rev().map(|byte| format!("{:02x}", byte)).collect()
}

//ver: https://btcinformation.org/en/developer-reference#compactsize-unsigned-integers
pub fn variable_uint_size(value: u64) -> u64 {
    match value {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x10000..=0xffffffff => 5,
        _ => 9,
    }
}

/// Indexes elements by their identity hash. Later duplicates win.
pub fn into_hashmap<T>(elements: Vec<T>) -> HashMap<HashDigest, T>
where
    T: Hashable,
{
    elements
        .into_iter()
        .map(|element| (element.hash(), element))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_uint_size_boundaries() {
        assert_eq!(variable_uint_size(0), 1);
        assert_eq!(variable_uint_size(252), 1);
        assert_eq!(variable_uint_size(253), 3);
        assert_eq!(variable_uint_size(0xffff), 3);
        assert_eq!(variable_uint_size(0x10000), 5);
        assert_eq!(variable_uint_size(0xffffffff), 5);
        assert_eq!(variable_uint_size(0x100000000), 9);
        assert_eq!(variable_uint_size(u64::MAX), 9);
    }

    #[test]
    fn test_double_hash_of_empty_payload() {
        // SHA256(SHA256(<empty>)), the checksum of an empty p2p payload
        let hash = double_hash(&[]);
        assert_eq!(hash[..4], [0x5d, 0xf6, 0xe0, 0xe2]);
        assert_eq!(
            encode_hash(&hash),
            "56944c5d3f98413ef45cf54545538103cc9f298e0575820ad3591376e2e0f65d"
        );
    }

    #[test]
    fn test_encode_hash_reverses_bytes() {
        let mut hash = NULL_HASH;
        hash[0] = 0xab;
        let encoded = encode_hash(&hash);
        assert_eq!(encoded.len(), 64);
        assert!(encoded.ends_with("ab"));
        assert!(encoded.starts_with("00"));
    }
}
