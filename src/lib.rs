//! # blockdec
//!
//! A pure-Rust library for decoding block-compressed textures and the
//! LZ-family streams used to package game assets.
//!
//! ## Supported Formats
//!
//! - **BC1/BC2/BC3** - DXT1/DXT3/DXT5 color blocks with optional alpha
//! - **BC4** - Single-channel interpolated blocks
//! - **BC7** - All eight modes, partitions, and channel rotations
//! - **LZSS** - Ring-buffer streams with a byte-sum checksum trailer
//! - **LZO1X** - The LZO1X-1 token grammar
//! - **LZ4** - Chunked block streams with a persistent 64 KB dictionary
//!
//! ## Quick Start
//!
//! ### Decoding a texture
//!
//! ```
//! use blockdec::texture::{TextureFormat, decode_texture};
//!
//! // A 4x4 BC1 texture is a single 8-byte block.
//! let block = [0x00, 0xF8, 0x00, 0xF8, 0x00, 0x00, 0x00, 0x00];
//! let rgba = decode_texture(&block, 4, 4, TextureFormat::Bc1)?;
//! assert_eq!(rgba.len(), 4 * 4 * 4);
//! # Ok::<(), blockdec::Error>(())
//! ```
//!
//! ### Decompressing a stream
//!
//! ```no_run
//! use blockdec::compression::{decompress_lzss, ChecksumMode};
//!
//! # let input: &[u8] = &[];
//! let output = decompress_lzss(input, 1024, ChecksumMode::Signed)?;
//! println!("consumed {} compressed bytes", output.bytes_consumed);
//! # Ok::<(), blockdec::Error>(())
//! ```
//!
//! ### Using the Prelude
//!
//! The prelude provides convenient access to commonly used types:
//!
//! ```
//! use blockdec::prelude::*;
//!
//! // Now you have access to:
//! // - TextureFormat, Channel, decode_texture
//! // - decompress_lzss, decompress_lzo1x, decompress_lz4_chain
//! // - Error, Result, and more
//! ```

pub mod compression;
pub mod error;
pub mod texture;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};

    // Texture exports
    pub use crate::texture::{Channel, TextureFormat, decode_texture};

    // Decompression exports
    pub use crate::compression::{
        ChecksumMode, LzssOutput, decompress_lz4_chain, decompress_lzo1x, decompress_lzss,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
