//! BC4 single-channel block decoding.

use super::Channel;
use super::bc3::decode_scalar_block;

/// Decodes an 8-byte BC4 block into a 4x4 RGBA region of `output`.
///
/// The decoded scalar lands in `channel`; the other color channels are 0
/// and alpha defaults to 255.
pub fn decode_block(block: &[u8], output: &mut [u8], pitch: usize, channel: Channel) {
    for y in 0..4 {
        for x in 0..4 {
            let dst = y * pitch + x * 4;
            output[dst..dst + 4].copy_from_slice(&[0, 0, 0, 255]);
        }
    }
    decode_scalar_block(block, output, pitch, channel.rgba_index());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_red_channel_default_layout() {
        let mut block = [0u8; 8];
        block[0] = 128;
        block[1] = 64;

        let mut out = [0u8; 64];
        decode_block(&block, &mut out, 16, Channel::Red);
        for pixel in out.chunks_exact(4) {
            assert_eq!(pixel, [128, 0, 0, 255]);
        }
    }

    #[test]
    fn test_alpha_channel_selection() {
        let mut block = [0u8; 8];
        block[0] = 77;
        block[1] = 1;

        let mut out = [0u8; 64];
        decode_block(&block, &mut out, 16, Channel::Alpha);
        for pixel in out.chunks_exact(4) {
            assert_eq!(pixel, [0, 0, 0, 77]);
        }
    }

    #[test]
    fn test_stale_output_is_cleared() {
        let block = [50, 40, 0, 0, 0, 0, 0, 0];

        let mut out = [0xEE; 64];
        decode_block(&block, &mut out, 16, Channel::Green);
        for pixel in out.chunks_exact(4) {
            assert_eq!(pixel, [0, 50, 0, 255]);
        }
    }
}
