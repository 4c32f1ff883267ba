//! Ring-buffer LZSS decompressor with a checksum trailer.
//!
//! The stream interleaves flag bytes with payload: each flag bit selects a
//! literal byte or a two-byte back-reference into a 4096-byte ring that
//! starts out filled with spaces. Decompression stops once the declared
//! output size is reached, then a 4-byte little-endian checksum trailer is
//! verified against the sum of the output bytes.

use tracing::debug;

use crate::error::{Error, Result};

/// Ring buffer size; offsets wrap at this boundary.
const RING_SIZE: usize = 4096;

/// Ring write cursor starting position.
const RING_START: usize = 0xFEE;

const RING_MASK: usize = RING_SIZE - 1;

/// How the trailer checksum folds the output bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChecksumMode {
    /// Each output byte is added as a signed value.
    Signed,
    /// Each output byte is added as an unsigned value.
    Unsigned,
}

/// Result of an LZSS decompression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LzssOutput {
    /// The decompressed bytes.
    pub data: Vec<u8>,
    /// Input bytes consumed, including the 4-byte checksum trailer.
    pub bytes_consumed: usize,
}

/// Decompresses an LZSS stream into exactly `expected_size` bytes.
///
/// Streams carry no terminator; the declared size alone decides when
/// decompression stops. Input past the checksum trailer is left untouched,
/// so callers unpacking concatenated streams can resume at
/// [`LzssOutput::bytes_consumed`].
///
/// # Errors
/// Returns [`Error::UnexpectedEof`] when the stream ends mid-token or
/// before the trailer, [`Error::OutputOverrun`] when a back-reference would
/// write past `expected_size`, and [`Error::ChecksumMismatch`] when the
/// trailer does not match the folded output.
pub fn decompress_lzss(
    src: &[u8],
    expected_size: usize,
    checksum: ChecksumMode,
) -> Result<LzssOutput> {
    debug!(expected_size, ?checksum, "decompressing LZSS stream");

    let mut ring = [0x20u8; RING_SIZE];
    let mut write = RING_START;
    let mut flags: u32 = 0;
    let mut pos = 0;
    let mut data = Vec::with_capacity(expected_size);

    while data.len() < expected_size {
        // The high byte counts down how many flag bits remain.
        flags >>= 1;
        if flags & 0x100 == 0 {
            flags = 0xFF00 | u32::from(take(src, &mut pos)?);
        }

        if flags & 1 != 0 {
            let byte = take(src, &mut pos)?;
            data.push(byte);
            ring[write] = byte;
            write = (write + 1) & RING_MASK;
        } else {
            let b0 = usize::from(take(src, &mut pos)?);
            let b1 = usize::from(take(src, &mut pos)?);
            let offset = b0 | ((b1 & 0xF0) << 4);
            // The low nibble stores the copy length minus three.
            let copy_len = (b1 & 0x0F) + 3;

            let remaining = expected_size - data.len();
            if copy_len > remaining {
                return Err(Error::OutputOverrun {
                    needed: copy_len - remaining,
                    declared: expected_size,
                });
            }

            let mut read = write.wrapping_sub(offset) & RING_MASK;
            for _ in 0..copy_len {
                let byte = ring[read];
                read = (read + 1) & RING_MASK;
                data.push(byte);
                ring[write] = byte;
                write = (write + 1) & RING_MASK;
            }
        }
    }

    if src.len() < pos + 4 {
        return Err(Error::UnexpectedEof);
    }
    let stored = i32::from_le_bytes(src[pos..pos + 4].try_into().unwrap());
    pos += 4;

    let computed = data.iter().fold(0i32, |sum, &byte| match checksum {
        ChecksumMode::Signed => sum.wrapping_add(i32::from(byte as i8)),
        ChecksumMode::Unsigned => sum.wrapping_add(i32::from(byte)),
    });
    if stored != computed {
        return Err(Error::ChecksumMismatch {
            stored: i64::from(stored),
            computed: i64::from(computed),
        });
    }

    Ok(LzssOutput {
        data,
        bytes_consumed: pos,
    })
}

fn take(src: &[u8], pos: &mut usize) -> Result<u8> {
    let byte = *src.get(*pos).ok_or(Error::UnexpectedEof)?;
    *pos += 1;
    Ok(byte)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn with_trailer(mut stream: Vec<u8>, sum: i32) -> Vec<u8> {
        stream.extend_from_slice(&sum.to_le_bytes());
        stream
    }

    #[test]
    fn test_literal_run() {
        let src = with_trailer(vec![0xFF, b'a', b'b', b'c'], 294);

        let out = decompress_lzss(&src, 3, ChecksumMode::Signed).unwrap();
        assert_eq!(out.data, b"abc");
        assert_eq!(out.bytes_consumed, 8);
    }

    #[test]
    fn test_back_reference_repeats_recent_output() {
        // Three literals, then a reference 3 back copying 3 bytes.
        let src = with_trailer(vec![0x07, b'a', b'b', b'c', 0x03, 0x00], 588);

        let out = decompress_lzss(&src, 6, ChecksumMode::Signed).unwrap();
        assert_eq!(out.data, b"abcabc");
        assert_eq!(out.bytes_consumed, 10);
    }

    #[test]
    fn test_overlapping_reference_extends_a_run() {
        // One 'x', then a reference 1 back copying 5 bytes through itself.
        let src = with_trailer(vec![0x01, b'x', 0x01, 0x02], 720);

        let out = decompress_lzss(&src, 6, ChecksumMode::Signed).unwrap();
        assert_eq!(out.data, b"xxxxxx");
    }

    #[test]
    fn test_reference_into_untouched_ring_reads_spaces() {
        // A reference before any output lands in the space-filled ring.
        let src = with_trailer(vec![0x00, 0x00, 0x00], 96);

        let out = decompress_lzss(&src, 3, ChecksumMode::Signed).unwrap();
        assert_eq!(out.data, b"   ");
        assert_eq!(out.bytes_consumed, 7);
    }

    #[test]
    fn test_consumed_stops_after_trailer() {
        let mut src = with_trailer(vec![0xFF, b'a', b'b', b'c'], 294);
        src.extend_from_slice(&[0xDE, 0xAD]);

        let out = decompress_lzss(&src, 3, ChecksumMode::Signed).unwrap();
        assert_eq!(out.bytes_consumed, 8);
    }

    #[test]
    fn test_checksum_modes_fold_differently() {
        let unsigned = with_trailer(vec![0xFF, 0x80, 0x80], 256);
        let signed = with_trailer(vec![0xFF, 0x80, 0x80], -256);

        let out = decompress_lzss(&unsigned, 2, ChecksumMode::Unsigned).unwrap();
        assert_eq!(out.data, [0x80, 0x80]);
        let out = decompress_lzss(&signed, 2, ChecksumMode::Signed).unwrap();
        assert_eq!(out.data, [0x80, 0x80]);
    }

    #[test]
    fn test_checksum_mismatch() {
        let src = with_trailer(vec![0xFF, b'a', b'b', b'c'], 0);

        let err = decompress_lzss(&src, 3, ChecksumMode::Signed).unwrap_err();
        match err {
            Error::ChecksumMismatch { stored, computed } => {
                assert_eq!(stored, 0);
                assert_eq!(computed, 294);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_reference_past_declared_size_is_an_error() {
        // Copying 5 bytes with only 1 byte left before the declared size.
        let src = vec![0x01, b'x', 0x01, 0x02];

        let err = decompress_lzss(&src, 2, ChecksumMode::Signed).unwrap_err();
        match err {
            Error::OutputOverrun { needed, declared } => {
                assert_eq!(needed, 4);
                assert_eq!(declared, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_truncated_stream() {
        let err = decompress_lzss(&[0xFF, b'a'], 3, ChecksumMode::Signed).unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof));
    }

    #[test]
    fn test_missing_trailer() {
        let err = decompress_lzss(&[0xFF, b'a', b'b', b'c'], 3, ChecksumMode::Signed).unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof));
    }

    #[test]
    fn test_empty_output_still_verifies_trailer() {
        let out = decompress_lzss(&0i32.to_le_bytes(), 0, ChecksumMode::Signed).unwrap();
        assert_eq!(out.data, Vec::<u8>::new());
        assert_eq!(out.bytes_consumed, 4);
    }
}
