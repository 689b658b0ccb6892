//! Integration tests for the full codec.
//!
//! These tests verify end-to-end behavior: count -> build tree -> write
//! header -> encode body -> read header -> decode body, with verification
//! that output matches input, plus the failure modes of corrupt streams.

use huffproc_core::{
    bitio::BitReader,
    compress, compress_bytes, decompress, decompress_bytes,
    error::{FormatError, TruncatedStreamError},
    framing::read_header,
    Codebook, Error, FrequencyTable, SENTINEL,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn round_trip(data: &[u8]) {
    let compressed = compress_bytes(data).expect("compression failed");
    let decoded = decompress_bytes(&compressed).expect("decompression failed");
    assert_eq!(decoded, data, "output doesn't match input");
}

/// Random bytes drawn from a skewed distribution over a small alphabet.
fn skewed_data(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            let r: f64 = rng.gen();
            (r * r * 40.0) as u8 + b'0'
        })
        .collect()
}

#[test]
fn test_round_trip_text() {
    round_trip(b"The quick brown fox jumps over the lazy dog. ".repeat(100).as_slice());
}

#[test]
fn test_round_trip_empty() {
    round_trip(b"");
}

#[test]
fn test_round_trip_single_byte() {
    round_trip(b"A");
    round_trip(&[0x00]);
    round_trip(&[0xFF]);
}

#[test]
fn test_all_symbols() {
    let input_data: Vec<u8> = (0..=255).collect();
    round_trip(&input_data);
}

#[test]
fn test_random_inputs() {
    let mut rng = ChaCha8Rng::seed_from_u64(12345);
    for _ in 0..50 {
        let len = rng.gen_range(0..2000);
        let data: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
        round_trip(&data);
    }
}

#[test]
fn test_large_data() {
    let input_data = vec![b'X'; 128 * 1024];
    let compressed = compress_bytes(&input_data).unwrap();

    // One bit per byte plus header
    assert!(compressed.len() < input_data.len() / 7);
    assert_eq!(decompress_bytes(&compressed).unwrap(), input_data);
}

#[test]
fn test_skewed_data_compresses() {
    let data = skewed_data(7, 20_000);
    let compressed = compress_bytes(&data).unwrap();
    assert!(compressed.len() < data.len());
    assert_eq!(decompress_bytes(&compressed).unwrap(), data);
}

#[test]
fn test_deterministic_output() {
    let data = skewed_data(99, 5000);
    assert_eq!(compress_bytes(&data).unwrap(), compress_bytes(&data).unwrap());
}

#[test]
fn test_separate_count_and_encode_handles() {
    let data = skewed_data(3, 10_000);

    // Count from one reader, encode from another, as the CLI does with files
    let freqs = FrequencyTable::from_reader(data.as_slice()).unwrap();
    let mut out = Vec::new();
    let metrics = compress(&freqs, std::io::Cursor::new(&data), &mut out).unwrap();

    assert_eq!(metrics.raw_bytes, data.len() as u64);
    assert_eq!(out, compress_bytes(&data).unwrap());

    let mut decoded = Vec::new();
    decompress(out.as_slice(), &mut decoded).unwrap();
    assert_eq!(decoded, data);
}

#[test]
fn test_header_tree_matches_codebook() {
    let data = b"abracadabra alakazam";
    let book = Codebook::from_frequencies(&FrequencyTable::from_bytes(data));
    let compressed = compress_bytes(data).unwrap();

    let tree = read_header(&mut BitReader::new(compressed.as_slice())).unwrap();
    let symbols = |leaves: Vec<(u16, u64)>| leaves.into_iter().map(|(s, _)| s).collect::<Vec<_>>();
    assert_eq!(symbols(tree.leaves()), symbols(book.tree().leaves()));
    assert!(tree.leaves().iter().any(|&(s, _)| s == SENTINEL));
}

#[test]
fn test_magic_corruption_detected() {
    let compressed = compress_bytes(b"test data for magic validation").unwrap();

    for bit in 0..32 {
        let mut corrupt = compressed.clone();
        corrupt[bit / 8] ^= 0x80 >> (bit % 8);
        assert!(
            matches!(
                decompress_bytes(&corrupt),
                Err(Error::Format(FormatError::InvalidMagic { .. }))
            ),
            "bit {bit} flip not detected"
        );
    }
}

#[test]
fn test_truncation_detected() {
    let data = skewed_data(11, 3000);
    let compressed = compress_bytes(&data).unwrap();

    for cut in 1..=16 {
        let truncated = &compressed[..compressed.len() - cut];
        assert!(
            matches!(
                decompress_bytes(truncated),
                Err(Error::Truncated(TruncatedStreamError::Body { .. }))
            ),
            "cut of {cut} bytes not detected"
        );
    }
}

#[test]
fn test_every_prefix_fails_cleanly() {
    let compressed = compress_bytes(b"short input with a few symbols").unwrap();

    for len in 0..compressed.len() {
        let result = decompress_bytes(&compressed[..len]);
        match result {
            Err(Error::Format(FormatError::MissingMagic { .. })) => assert!(len < 4),
            Err(Error::Truncated(_)) => assert!(len >= 4),
            other => panic!("prefix of {len} bytes gave {other:?}"),
        }
    }
}

#[test]
fn test_garbage_never_panics() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    for _ in 0..200 {
        let len = rng.gen_range(0..256);
        let mut data: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
        if data.len() >= 4 && rng.gen_bool(0.5) {
            data[..4].copy_from_slice(&[0xFA, 0xCE, 0x82, 0x00]);
        }
        // Any outcome is fine as long as it is a value, not a panic
        let _ = decompress_bytes(&data);
    }
}
