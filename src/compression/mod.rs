//! Byte-stream decompressors for packaged asset data.
//!
//! Three codecs appear in the containers this crate serves: a ring-buffer
//! LZSS variant with a checksum trailer, LZO1X, and a chunked LZ4 variant
//! that carries a 64 KB dictionary across chunk boundaries.

pub mod lz4_chain;
pub mod lzo1x;
pub mod lzss;

pub use lz4_chain::decompress_lz4_chain;
pub use lzo1x::decompress_lzo1x;
pub use lzss::{ChecksumMode, LzssOutput, decompress_lzss};
