//! Block header wire codec.
//!
//! Reads and writes the 80 byte block header, with its optional trailing
//! transaction count, and derives the header's identity hash.

pub mod config;
pub mod constants;
pub mod header;
pub mod headers;
pub mod logger;
pub mod stream;
pub mod utility;

pub use config::Config;
pub use header::Header;
pub use headers::Headers;
pub use stream::{DataSource, IstreamReader, OstreamWriter, Reader, Writer};
pub use utility::{HashDigest, NULL_HASH};

pub trait Hashable {
    fn hash(&self) -> HashDigest;
}
