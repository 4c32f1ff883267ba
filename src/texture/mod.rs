//! Block-compressed texture decoding.
//!
//! Every decoder takes compressed block data plus the texture dimensions
//! and returns a flat `width * height * 4` RGBA buffer. Partial blocks at
//! the right/bottom edges are clamped against the dimensions.

pub mod bc1;
pub mod bc2;
pub mod bc3;
pub mod bc4;
pub mod bc7;
mod bits;
mod color;

use rayon::prelude::*;
use tracing::debug;

use crate::error::{Error, Result};

/// Byte stride between pixel rows of a decoded 4x4 block buffer.
const BLOCK_PITCH: usize = 16;

/// Supported block-compressed texture formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// DXT1: 8-byte blocks, optional 1-bit alpha.
    Bc1,
    /// DXT3: 16-byte blocks with explicit 4-bit alpha.
    Bc2,
    /// DXT5: 16-byte blocks with interpolated alpha.
    Bc3,
    /// Single interpolated channel in 8-byte blocks.
    Bc4,
    /// Two interpolated channels; recognized but not decodable.
    Bc5,
    /// HDR endpoint blocks; recognized but not decodable.
    Bc6,
    /// Multi-mode 16-byte blocks with partitions and rotations.
    Bc7,
}

impl TextureFormat {
    /// Block size in bytes for this format.
    pub const fn block_size(self) -> usize {
        match self {
            Self::Bc1 | Self::Bc4 => 8,
            Self::Bc2 | Self::Bc3 | Self::Bc5 | Self::Bc6 | Self::Bc7 => 16,
        }
    }

    /// Compressed byte length of a `width` x `height` texture.
    pub const fn data_len(self, width: usize, height: usize) -> usize {
        width.div_ceil(4) * height.div_ceil(4) * self.block_size()
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Bc1 => "BC1",
            Self::Bc2 => "BC2",
            Self::Bc3 => "BC3",
            Self::Bc4 => "BC4",
            Self::Bc5 => "BC5",
            Self::Bc6 => "BC6",
            Self::Bc7 => "BC7",
        }
    }
}

/// Target channel for BC4 output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Channel {
    #[default]
    Red,
    Green,
    Blue,
    Alpha,
}

impl Channel {
    pub(crate) const fn rgba_index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
            Self::Alpha => 3,
        }
    }
}

/// Decodes texture data according to `format`.
///
/// BC1 decodes with its 1-bit alpha mode enabled and BC4 targets the red
/// channel; call the per-format entries directly to choose otherwise.
///
/// # Errors
/// Returns [`Error::UnsupportedTextureFormat`] for BC5/BC6 and
/// [`Error::TruncatedTextureData`] when `data` is shorter than the block
/// grid requires.
pub fn decode_texture(
    data: &[u8],
    width: usize,
    height: usize,
    format: TextureFormat,
) -> Result<Vec<u8>> {
    match format {
        TextureFormat::Bc1 => decode_bc1(data, width, height, true),
        TextureFormat::Bc2 => decode_bc2(data, width, height),
        TextureFormat::Bc3 => decode_bc3(data, width, height),
        TextureFormat::Bc4 => decode_bc4(data, width, height, Channel::Red),
        TextureFormat::Bc5 | TextureFormat::Bc6 => Err(Error::UnsupportedTextureFormat {
            format: format.name(),
        }),
        TextureFormat::Bc7 => decode_bc7(data, width, height),
    }
}

/// Decodes BC1 (DXT1) texture data.
///
/// # Errors
/// Returns [`Error::TruncatedTextureData`] when `data` is too short.
pub fn decode_bc1(data: &[u8], width: usize, height: usize, use_alpha: bool) -> Result<Vec<u8>> {
    decode_blocks(data, width, height, TextureFormat::Bc1, |block, out| {
        bc1::decode_block(block, out, BLOCK_PITCH, use_alpha);
    })
}

/// Decodes BC2 (DXT3) texture data.
///
/// # Errors
/// Returns [`Error::TruncatedTextureData`] when `data` is too short.
pub fn decode_bc2(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    decode_blocks(data, width, height, TextureFormat::Bc2, |block, out| {
        bc2::decode_block(block, out, BLOCK_PITCH);
    })
}

/// Decodes BC3 (DXT5) texture data.
///
/// # Errors
/// Returns [`Error::TruncatedTextureData`] when `data` is too short.
pub fn decode_bc3(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    decode_blocks(data, width, height, TextureFormat::Bc3, |block, out| {
        bc3::decode_block(block, out, BLOCK_PITCH);
    })
}

/// Decodes BC4 texture data into `channel` of the RGBA output.
///
/// # Errors
/// Returns [`Error::TruncatedTextureData`] when `data` is too short.
pub fn decode_bc4(data: &[u8], width: usize, height: usize, channel: Channel) -> Result<Vec<u8>> {
    decode_blocks(data, width, height, TextureFormat::Bc4, |block, out| {
        bc4::decode_block(block, out, BLOCK_PITCH, channel);
    })
}

/// Decodes BC7 texture data.
///
/// Reserved blocks (no mode bit set) fill their texels with opaque magenta
/// rather than failing.
///
/// # Errors
/// Returns [`Error::TruncatedTextureData`] when `data` is too short.
pub fn decode_bc7(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    decode_blocks(data, width, height, TextureFormat::Bc7, |block, out| {
        bc7::decode_block(block, out, BLOCK_PITCH);
    })
}

/// Walks the block grid, decoding block rows in parallel.
///
/// Each rayon task owns one output band (the four pixel rows under one
/// block row), so writes never overlap.
fn decode_blocks<F>(
    data: &[u8],
    width: usize,
    height: usize,
    format: TextureFormat,
    decode: F,
) -> Result<Vec<u8>>
where
    F: Fn(&[u8], &mut [u8; 64]) + Sync,
{
    if width == 0 || height == 0 {
        return Ok(Vec::new());
    }

    let expected = format.data_len(width, height);
    if data.len() < expected {
        return Err(Error::TruncatedTextureData {
            expected,
            actual: data.len(),
        });
    }

    debug!(width, height, format = format.name(), "decoding texture");

    let blocks_x = width.div_ceil(4);
    let block_size = format.block_size();
    let row_bytes = width * 4;

    let mut rgba = vec![0u8; width * height * 4];
    rgba.par_chunks_mut(row_bytes * 4)
        .enumerate()
        .for_each(|(by, band)| {
            let rows = band.len() / row_bytes;
            let mut block_rgba = [0u8; 64];
            for bx in 0..blocks_x {
                let start = (by * blocks_x + bx) * block_size;
                decode(&data[start..start + block_size], &mut block_rgba);

                for py in 0..rows {
                    for px in 0..4 {
                        let fx = bx * 4 + px;
                        if fx >= width {
                            continue;
                        }
                        let src = (py * 4 + px) * 4;
                        let dst = py * row_bytes + fx * 4;
                        band[dst..dst + 4].copy_from_slice(&block_rgba[src..src + 4]);
                    }
                }
            }
        });

    Ok(rgba)
}
