//! Error types for `blockdec`

use thiserror::Error;

/// The error type for `blockdec` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from stream operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unexpected end of input.
    #[error("unexpected end of input")]
    UnexpectedEof,

    // ==================== Texture Errors ====================
    /// The texture format has no decoder.
    #[error("unsupported texture format: {format}")]
    UnsupportedTextureFormat {
        /// Name of the format that cannot be decoded.
        format: &'static str,
    },

    /// The compressed texture data is shorter than the block grid requires.
    #[error("truncated texture data: need {expected} bytes, have {actual}")]
    TruncatedTextureData {
        /// Bytes required by the block grid for the given dimensions.
        expected: usize,
        /// Bytes actually supplied.
        actual: usize,
    },

    // ==================== Decompression Errors ====================
    /// A back-reference points before the start of the output.
    #[error("invalid back-reference: offset {offset} at output position {position}")]
    InvalidBackReference {
        /// The back-reference distance.
        offset: usize,
        /// The output position when the reference was read.
        position: usize,
    },

    /// Decoding a token would write past the declared output size.
    #[error("output overrun: {needed} bytes needed past declared size {declared}")]
    OutputOverrun {
        /// Bytes the current token would produce beyond the limit.
        needed: usize,
        /// The declared output size.
        declared: usize,
    },

    /// The stored checksum does not match the sum of the decompressed bytes.
    #[error("checksum mismatch: stored {stored}, computed {computed}")]
    ChecksumMismatch {
        /// The checksum stored in the stream trailer.
        stored: i64,
        /// The checksum computed over the output.
        computed: i64,
    },

    /// A chunk header carries flag bits that are not understood.
    #[error("invalid chunk flags: {flags:#04x}")]
    InvalidChunkFlags {
        /// The raw flag byte.
        flags: u8,
    },

    /// The decompressed output does not match the declared size.
    #[error("decompressed size mismatch: expected {expected}, produced {actual}")]
    DecompressedSizeMismatch {
        /// The size declared by the caller or stream header.
        expected: usize,
        /// The size actually produced.
        actual: usize,
    },

    /// The compressed stream was not fully consumed where the format requires it.
    #[error("compressed stream not fully consumed: {consumed} of {declared} bytes")]
    TrailingCompressedData {
        /// Bytes consumed from the compressed stream.
        consumed: usize,
        /// Bytes the stream declared.
        declared: usize,
    },

    // ==================== Generic/Fallback Errors ====================
    // Kept for edge cases but should be used sparingly.

    /// Generic decompression error (use specific variants when possible).
    #[error("decompression failed: {0}")]
    DecompressionError(String),
}

/// A specialized Result type for `blockdec` operations.
pub type Result<T> = std::result::Result<T, Error>;
