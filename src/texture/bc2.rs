//! BC2 (DXT3) block decoding.

use super::bc1::decode_color_block;

/// Decodes a 16-byte BC2 block into a 4x4 RGBA region of `output`.
///
/// The first 8 bytes hold 16 explicit alpha nibbles, texel n at bits `4n`;
/// the last 8 bytes are a color block pinned to 4-color mode.
pub fn decode_block(block: &[u8], output: &mut [u8], pitch: usize) {
    decode_color_block(&block[8..16], output, pitch, true, false);

    let alpha = u64::from_le_bytes(block[0..8].try_into().unwrap());
    for y in 0..4 {
        for x in 0..4 {
            let nibble = ((alpha >> (4 * (y * 4 + x))) & 0xF) as u8;
            output[y * pitch + x * 4 + 3] = (nibble << 4) | nibble;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_explicit_alpha_expansion() {
        let mut block = [0u8; 16];
        // Texel 0 alpha nibble 0x0, texel 1 nibble 0xF, texel 2 nibble 0x8.
        block[0] = 0xF0;
        block[1] = 0x08;
        // White color block.
        block[8] = 0xFF;
        block[9] = 0xFF;

        let mut out = [0u8; 64];
        decode_block(&block, &mut out, 16);

        assert_eq!(out[3], 0x00);
        assert_eq!(out[7], 0xFF);
        assert_eq!(out[11], 0x88);
        assert_eq!(&out[0..3], [255, 255, 255]);
    }

    #[test]
    fn test_color_tail_never_uses_transparent_mode() {
        let mut block = [0u8; 16];
        // Full alpha everywhere.
        block[0..8].copy_from_slice(&[0xFF; 8]);
        // c0 == c1 == 0, all indices 3: in BC1 this would be the 3-color
        // arm; the BC2 tail must still interpolate four opaque colors.
        block[12..16].copy_from_slice(&[0xFF; 4]);

        let mut out = [0u8; 64];
        decode_block(&block, &mut out, 16);
        for pixel in out.chunks_exact(4) {
            assert_eq!(pixel, [0, 0, 0, 255]);
        }
    }
}
