//! BC1 (DXT1) block decoding.

use super::color::color_palette;

/// Decodes an 8-byte BC1 block into a 4x4 RGBA region of `output`.
///
/// `pitch` is the byte stride between output pixel rows. With the raw
/// endpoints ordered `c0 <= c1` the block is in 3-color mode and
/// `use_alpha` decides whether index-3 texels come out transparent.
pub fn decode_block(block: &[u8], output: &mut [u8], pitch: usize, use_alpha: bool) {
    decode_color_block(block, output, pitch, false, use_alpha);
}

/// Color-block walker shared with the BC2/BC3 tails.
///
/// BC2 and BC3 carry alpha outside the color block, so they pass
/// `opaque_only` to pin the palette to 4-color mode.
pub(crate) fn decode_color_block(
    block: &[u8],
    output: &mut [u8],
    pitch: usize,
    opaque_only: bool,
    use_alpha: bool,
) {
    let c0 = u16::from_le_bytes(block[0..2].try_into().unwrap());
    let c1 = u16::from_le_bytes(block[2..4].try_into().unwrap());
    let indices = u32::from_le_bytes(block[4..8].try_into().unwrap());

    let palette = color_palette(c0, c1, opaque_only, use_alpha);

    for y in 0..4 {
        for x in 0..4 {
            let index = ((indices >> (2 * (y * 4 + x))) & 0x3) as usize;
            let dst = y * pitch + x * 4;
            output[dst..dst + 4].copy_from_slice(&palette[index]);
        }
    }
}
