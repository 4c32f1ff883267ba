use blockdec::prelude::*;
use std::io::Cursor;

/// A solid-white BC1 block: both endpoints 0xFFFF, all indices 0.
const WHITE_BC1: [u8; 8] = [0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00];

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn lzss_literal_stream(data: &[u8]) -> Vec<u8> {
    assert!(data.len() <= 8, "one flag byte covers eight literals");
    let mut stream = vec![0xFF];
    stream.extend_from_slice(data);
    let sum = data.iter().fold(0i32, |sum, &b| sum + i32::from(b));
    stream.extend_from_slice(&sum.to_le_bytes());
    stream
}

#[test]
fn test_texture_dispatch_output_sizes() {
    init_tracing();
    for format in [
        TextureFormat::Bc1,
        TextureFormat::Bc2,
        TextureFormat::Bc3,
        TextureFormat::Bc4,
        TextureFormat::Bc7,
    ] {
        let data = vec![0u8; format.data_len(8, 8)];
        let rgba = decode_texture(&data, 8, 8, format).unwrap();
        assert_eq!(rgba.len(), 8 * 8 * 4, "{format:?}");
    }
}

#[test]
fn test_lzss_stream_feeds_texture_decode() {
    // A packaged texture: the BC1 block travels LZSS-compressed.
    let stream = lzss_literal_stream(&WHITE_BC1);

    let unpacked = decompress_lzss(&stream, 8, ChecksumMode::Unsigned).unwrap();
    assert_eq!(unpacked.bytes_consumed, stream.len());

    let rgba = decode_texture(&unpacked.data, 4, 4, TextureFormat::Bc1).unwrap();
    for pixel in rgba.chunks_exact(4) {
        assert_eq!(pixel, [255, 255, 255, 255]);
    }
}

#[test]
fn test_lzss_concatenated_streams() {
    let mut joined = lzss_literal_stream(b"first");
    let first_len = joined.len();
    joined.extend_from_slice(&lzss_literal_stream(b"second!!"));

    let first = decompress_lzss(&joined, 5, ChecksumMode::Unsigned).unwrap();
    assert_eq!(first.data, b"first");
    assert_eq!(first.bytes_consumed, first_len);

    let second = decompress_lzss(&joined[first.bytes_consumed..], 8, ChecksumMode::Unsigned).unwrap();
    assert_eq!(second.data, b"second!!");
}

#[test]
fn test_lzo1x_stream_feeds_texture_decode() {
    // 8 literals for the block, then the end-of-stream marker.
    let mut stream = vec![25];
    stream.extend_from_slice(&WHITE_BC1);
    stream.extend_from_slice(&[17, 0, 0]);

    let unpacked = decompress_lzo1x(&stream, 8).unwrap();
    let rgba = decode_texture(&unpacked, 4, 4, TextureFormat::Bc1).unwrap();
    assert_eq!(&rgba[0..4], [255, 255, 255, 255]);
}

#[test]
fn test_decoding_is_deterministic() {
    let data = vec![0x3C; TextureFormat::Bc7.data_len(16, 16)];
    let first = decode_texture(&data, 16, 16, TextureFormat::Bc7).unwrap();
    let second = decode_texture(&data, 16, 16, TextureFormat::Bc7).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_lz4_chain_round_trip() {
    init_tracing();
    let data = b"block-compressed assets travel in chained LZ4 chunks ".repeat(40);
    let chunk = lz4_flex::block::compress(&data);

    let mut block = (data.len() as u32).to_le_bytes().to_vec();
    block.extend_from_slice(&(chunk.len() as u32).to_le_bytes()[..3]);
    block.push(0x80);
    block.extend_from_slice(&chunk);

    let out = decompress_lz4_chain(&mut Cursor::new(&block), block.len()).unwrap();
    assert_eq!(out, data);
}
