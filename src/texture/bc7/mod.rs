//! BC7 block decoding.
//!
//! A block is 128 bits consumed low bit first. The mode is the position of
//! the lowest set bit of byte 0 (mode m costs m+1 bits); the rest of the
//! stream is mode-dependent: partition id, rotation/selection bits,
//! endpoint fields in channel-major order, parity bits, then the packed
//! per-pixel indices.

mod tables;

use tracing::trace;

use super::bits::BlockStream;
use tables::{
    ALPHA_BITS, ANCHOR_SECOND_OF_THREE, ANCHOR_SECOND_OF_TWO, ANCHOR_THIRD_OF_THREE, COLOR_BITS,
    PARTITIONS_2, PARTITIONS_3, WEIGHTS_2, WEIGHTS_3, WEIGHTS_4,
};

/// Modes carrying parity bits (shared per subset in mode 1, per endpoint
/// otherwise).
const PBIT_MODES: u8 = 0b1100_1011;

/// Fill color for reserved blocks.
const RESERVED_FILL: [u8; 4] = [255, 0, 255, 255];

/// Decodes a 16-byte BC7 block into a 4x4 RGBA region of `output`.
///
/// Blocks with no mode bit set in byte 0 are reserved; they fill their
/// texels with opaque magenta instead of failing.
pub fn decode_block(block: &[u8], output: &mut [u8], pitch: usize) {
    let words: &[u8; 16] = block[0..16].try_into().unwrap();
    let mut stream = BlockStream::new(words);

    let Some(mode) = read_mode(&mut stream) else {
        for y in 0..4 {
            for x in 0..4 {
                let dst = y * pitch + x * 4;
                output[dst..dst + 4].copy_from_slice(&RESERVED_FILL);
            }
        }
        return;
    };

    let num_partitions = match mode {
        0 | 2 => 3,
        1 | 3 | 7 => 2,
        _ => 1,
    };
    let partition = match mode {
        0 => stream.read_bits(4) as usize,
        1 | 2 | 3 | 7 => stream.read_bits(6) as usize,
        _ => 0,
    };
    trace!(mode, partition, "bc7 block");

    let mut rotation = 0;
    let mut index_selection = 0;
    if mode == 4 || mode == 5 {
        rotation = stream.read_bits(2);
        if mode == 4 {
            index_selection = stream.read_bit();
        }
    }

    let num_endpoints = num_partitions * 2;
    let color_bits = COLOR_BITS[mode];
    let alpha_bits = ALPHA_BITS[mode];

    let mut endpoints = [[0u32; 4]; 6];
    for channel in 0..3 {
        for endpoint in endpoints.iter_mut().take(num_endpoints) {
            endpoint[channel] = stream.read_bits(color_bits);
        }
    }
    if alpha_bits > 0 {
        for endpoint in endpoints.iter_mut().take(num_endpoints) {
            endpoint[3] = stream.read_bits(alpha_bits);
        }
    }

    let has_pbits = PBIT_MODES & (1 << mode) != 0;
    if has_pbits {
        for endpoint in endpoints.iter_mut().take(num_endpoints) {
            for channel in 0..4 {
                endpoint[channel] <<= 1;
            }
        }
        if mode == 1 {
            // One parity bit per subset, applied to the RGB fields of both
            // of its endpoints.
            let p0 = stream.read_bit();
            let p1 = stream.read_bit();
            for channel in 0..3 {
                endpoints[0][channel] |= p0;
                endpoints[1][channel] |= p0;
                endpoints[2][channel] |= p1;
                endpoints[3][channel] |= p1;
            }
        } else {
            for endpoint in endpoints.iter_mut().take(num_endpoints) {
                let parity = stream.read_bit();
                for channel in 0..4 {
                    endpoint[channel] |= parity;
                }
            }
        }
    }

    let pbit = u32::from(has_pbits);
    for endpoint in endpoints.iter_mut().take(num_endpoints) {
        for channel in 0..3 {
            endpoint[channel] = expand_to_8bit(endpoint[channel], color_bits + pbit);
        }
        endpoint[3] = if alpha_bits == 0 {
            0xFF
        } else {
            expand_to_8bit(endpoint[3], alpha_bits + pbit)
        };
    }

    let index_bits = match mode {
        0 | 1 => 3,
        6 => 4,
        _ => 2,
    };
    let index_bits2 = match mode {
        4 => 3,
        5 => 2,
        _ => 0,
    };
    let weights: &[u32] = match index_bits {
        2 => &WEIGHTS_2,
        3 => &WEIGHTS_3,
        _ => &WEIGHTS_4,
    };
    let weights2: &[u32] = if index_bits2 == 3 {
        &WEIGHTS_3
    } else {
        &WEIGHTS_2
    };

    // All primary indices precede all secondary indices in the stream, so
    // the primary set is read in one pass up front. Anchor pixels (pixel 0
    // and each further subset's anchor) drop their top bit.
    let mut indices = [0u8; 16];
    for (pixel, index) in indices.iter_mut().enumerate() {
        let subset = subset_for_pixel(num_partitions, partition, pixel);
        let anchored = pixel == anchor_for_subset(num_partitions, partition, subset);
        *index = stream.read_bits(index_bits - u32::from(anchored)) as u8;
    }

    for (pixel, &index) in indices.iter().enumerate() {
        let subset = subset_for_pixel(num_partitions, partition, pixel);
        let e0 = endpoints[subset * 2];
        let e1 = endpoints[subset * 2 + 1];
        let index = index as usize;

        let mut texel = [0u32; 4];
        if index_bits2 == 0 {
            for channel in 0..4 {
                texel[channel] = interpolate(e0[channel], e1[channel], weights, index);
            }
        } else {
            let width = if pixel == 0 {
                index_bits2 - 1
            } else {
                index_bits2
            };
            let index2 = stream.read_bits(width) as usize;
            // Mode 4's selection bit swaps which index stream drives color.
            let (cw, ci, aw, ai) = if index_selection == 0 {
                (weights, index, weights2, index2)
            } else {
                (weights2, index2, weights, index)
            };
            for channel in 0..3 {
                texel[channel] = interpolate(e0[channel], e1[channel], cw, ci);
            }
            texel[3] = interpolate(e0[3], e1[3], aw, ai);
        }

        match rotation {
            1 => texel.swap(3, 0),
            2 => texel.swap(3, 1),
            3 => texel.swap(3, 2),
            _ => {}
        }

        let dst = (pixel / 4) * pitch + (pixel % 4) * 4;
        for (channel, &value) in texel.iter().enumerate() {
            output[dst + channel] = value as u8;
        }
    }
}

/// Returns the block mode, or `None` for a reserved block.
fn read_mode(stream: &mut BlockStream) -> Option<usize> {
    (0..8).find(|_| stream.read_bit() == 1)
}

/// Replicates the top bits of a `width`-bit value down to fill 8 bits.
fn expand_to_8bit(value: u32, width: u32) -> u32 {
    let shifted = value << (8 - width);
    shifted | (shifted >> width)
}

fn subset_for_pixel(num_partitions: usize, partition: usize, pixel: usize) -> usize {
    match num_partitions {
        2 => ((PARTITIONS_2[partition] >> pixel) & 1) as usize,
        3 => ((PARTITIONS_3[partition] >> (2 * pixel)) & 3) as usize,
        _ => 0,
    }
}

fn anchor_for_subset(num_partitions: usize, partition: usize, subset: usize) -> usize {
    match (num_partitions, subset) {
        (2, 1) => ANCHOR_SECOND_OF_TWO[partition] as usize,
        (3, 1) => ANCHOR_SECOND_OF_THREE[partition] as usize,
        (3, 2) => ANCHOR_THIRD_OF_THREE[partition] as usize,
        _ => 0,
    }
}

/// `((64-w)*e0 + w*e1 + 32) >> 6` with the fixed weight tables.
fn interpolate(e0: u32, e1: u32, weights: &[u32], index: usize) -> u32 {
    let w = weights[index];
    ((64 - w) * e0 + w * e1 + 32) >> 6
}
