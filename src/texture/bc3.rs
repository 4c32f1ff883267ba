//! BC3 (DXT5) block decoding.

use super::bc1::decode_color_block;
use super::color::scalar_palette;

/// Decodes a 16-byte BC3 block into a 4x4 RGBA region of `output`.
pub fn decode_block(block: &[u8], output: &mut [u8], pitch: usize) {
    decode_color_block(&block[8..16], output, pitch, true, false);
    decode_scalar_block(&block[0..8], output, pitch, 3);
}

/// Interpolated scalar block shared by BC3 alpha and BC4.
///
/// Endpoints sit in bytes 0-1; the 16 3-bit indices are packed from bit 16
/// of the little-endian block word. The decoded value lands in byte
/// `channel` of each output pixel.
pub(crate) fn decode_scalar_block(block: &[u8], output: &mut [u8], pitch: usize, channel: usize) {
    let a0 = block[0];
    let a1 = block[1];
    let palette = scalar_palette(a0, a1);

    let indices = u64::from_le_bytes(block[0..8].try_into().unwrap()) >> 16;
    for y in 0..4 {
        for x in 0..4 {
            let index = ((indices >> (3 * (y * 4 + x))) & 0x7) as usize;
            output[y * pitch + x * 4 + channel] = palette[index];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_endpoint_indices_pick_endpoints() {
        let mut block = [0u8; 16];
        block[0] = 200; // a0
        block[1] = 10; // a1
        // Texel 0 index 0 (a0), texel 1 index 1 (a1); rest 0.
        block[2] = 0b0000_1000;
        // Opaque white color tail.
        block[8] = 0xFF;
        block[9] = 0xFF;

        let mut out = [0u8; 64];
        decode_block(&block, &mut out, 16);

        assert_eq!(out[3], 200);
        assert_eq!(out[7], 10);
        assert_eq!(out[11], 200);
        assert_eq!(&out[0..3], [255, 255, 255]);
    }

    #[test]
    fn test_fifths_palette_extremes() {
        let mut block = [0u8; 16];
        block[0] = 10; // a0 <= a1 selects the 6-step palette
        block[1] = 200;
        // Texel 0 index 6 (always 0), texel 1 index 7 (always 255).
        block[2] = 0b0011_1110;

        let mut out = [0u8; 64];
        decode_block(&block, &mut out, 16);

        assert_eq!(out[3], 0);
        assert_eq!(out[7], 255);
    }

    #[test]
    fn test_index_rows_span_bytes() {
        let mut block = [0u8; 16];
        block[0] = 255;
        block[1] = 0;
        // Last texel (3,3) uses bits 45..48 of the index field: index 1.
        block[7] = 0b0010_0000;

        let mut out = [0u8; 64];
        decode_block(&block, &mut out, 16);

        assert_eq!(out[3 * 16 + 3 * 4 + 3], 0);
        assert_eq!(out[3], 255);
    }
}
