//! Chained LZ4 decompressor.
//!
//! The block starts with a 4-byte little-endian decompressed size, followed
//! by chunks of raw LZ4 data. Each chunk is prefixed by a 3-byte
//! little-endian compressed size and a flag byte whose top bit marks the
//! last chunk. Chunks are not independent: back-references may reach into a
//! 64 KB dictionary of previously decoded output carried across chunk
//! boundaries.

use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Bytes of prior output a chunk's back-references may reach into.
const DICT_SIZE: usize = 65536;

/// Chunk flag bit marking the final chunk.
const FLAG_LAST: u8 = 0x80;

/// Decompresses a chained LZ4 block of `block_size` compressed bytes.
///
/// Reads from `reader` until the last-chunk flag, then requires exactly
/// `block_size` bytes to have been consumed and the output to match the
/// size declared in the block header.
///
/// # Errors
/// Returns [`Error::Io`] when the reader fails or ends early,
/// [`Error::InvalidChunkFlags`] for unknown flag bits,
/// [`Error::InvalidBackReference`] for matches outside the window,
/// [`Error::TrailingCompressedData`] when the chunks do not account for
/// `block_size`, and [`Error::DecompressedSizeMismatch`] when the output
/// length differs from the header.
pub fn decompress_lz4_chain<R: Read>(reader: &mut R, block_size: usize) -> Result<Vec<u8>> {
    let target_size = reader.read_u32::<LittleEndian>()? as usize;
    let mut consumed = 4;

    debug!(block_size, target_size, "decompressing chained LZ4 block");

    let mut result = Vec::with_capacity(target_size);
    let mut dict: Vec<u8> = Vec::new();

    loop {
        let chunk_size = reader.read_u24::<LittleEndian>()? as usize;
        let flags = reader.read_u8()?;
        consumed += 4;
        if flags & !FLAG_LAST != 0 {
            return Err(Error::InvalidChunkFlags { flags });
        }
        trace!(chunk_size, flags, "lz4 chunk");

        let mut chunk = vec![0u8; chunk_size];
        reader.read_exact(&mut chunk)?;
        consumed += chunk_size;

        let out = decode_chunk(&chunk, &dict)?;
        result.extend_from_slice(&out);

        dict.extend_from_slice(&out);
        if dict.len() > DICT_SIZE {
            dict.drain(..dict.len() - DICT_SIZE);
        }

        if flags & FLAG_LAST != 0 {
            break;
        }
    }

    if consumed != block_size {
        return Err(Error::TrailingCompressedData {
            consumed,
            declared: block_size,
        });
    }
    if result.len() != target_size {
        return Err(Error::DecompressedSizeMismatch {
            expected: target_size,
            actual: result.len(),
        });
    }
    Ok(result)
}

/// Decodes one raw LZ4 chunk, resolving far back-references through `dict`.
fn decode_chunk(chunk: &[u8], dict: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut ip = 0;

    loop {
        let token = take(chunk, &mut ip)?;

        let mut literal_len = usize::from(token >> 4);
        if literal_len == 15 {
            literal_len = extended_length(chunk, &mut ip, literal_len)?;
        }
        let end = ip + literal_len;
        if end > chunk.len() {
            return Err(Error::UnexpectedEof);
        }
        out.extend_from_slice(&chunk[ip..end]);
        ip = end;

        // The final sequence carries literals only.
        if ip == chunk.len() {
            return Ok(out);
        }

        let lo = take(chunk, &mut ip)?;
        let hi = take(chunk, &mut ip)?;
        let offset = usize::from(u16::from_le_bytes([lo, hi]));

        let mut match_len = usize::from(token & 0x0F) + 4;
        if token & 0x0F == 15 {
            match_len = extended_length(chunk, &mut ip, match_len)?;
        }

        if offset == 0 || offset > dict.len() + out.len() {
            return Err(Error::InvalidBackReference {
                offset,
                position: dict.len() + out.len(),
            });
        }
        // Byte-wise: an offset shorter than the match repeats fresh output.
        for _ in 0..match_len {
            let byte = if offset <= out.len() {
                out[out.len() - offset]
            } else {
                dict[dict.len() - (offset - out.len())]
            };
            out.push(byte);
        }
    }
}

/// Accumulates a length continued through 0xFF bytes.
fn extended_length(chunk: &[u8], ip: &mut usize, base: usize) -> Result<usize> {
    let mut total = base;
    loop {
        let byte = take(chunk, ip)?;
        total += usize::from(byte);
        if byte != 255 {
            return Ok(total);
        }
    }
}

fn take(chunk: &[u8], ip: &mut usize) -> Result<u8> {
    let byte = *chunk.get(*ip).ok_or(Error::UnexpectedEof)?;
    *ip += 1;
    Ok(byte)
}
