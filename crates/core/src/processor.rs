//! End-to-end compress and decompress.
//!
//! Compression runs frequency counting, tree construction, code extraction,
//! header writing and body encoding in that order. Counting is a separate
//! stage: `compress` takes the finished `FrequencyTable` plus a fresh reader
//! over the same bytes.
//!
//! Decompression reads the header and walks the rebuilt tree; no code table
//! is built on that side.

use std::io::{Read, Write};

use tracing::debug;

use crate::bitio::{BitReader, BitWriter};
use crate::body::{decode_body, encode_body};
use crate::codebook::Codebook;
use crate::error::Result;
use crate::framing::{read_header, write_header};
use crate::freq::FrequencyTable;
use crate::metrics::{CodecMetrics, Operation};

/// Compress the bytes of `input` into `output`.
///
/// `freqs` must count exactly the bytes `input` yields; a byte that was not
/// counted fails with `EncodeError::MissingCode`. The last partial byte is
/// padded and flushed whether or not encoding succeeds.
pub fn compress<R: Read, W: Write>(
    freqs: &FrequencyTable,
    input: R,
    output: W,
) -> Result<CodecMetrics> {
    let mut metrics = CodecMetrics::new(Operation::Compress);
    let book = Codebook::from_frequencies(freqs);

    let mut writer = BitWriter::new(output);
    write_header(book.tree(), &mut writer)?;
    metrics.header_bits = writer.bit_len();

    let raw = encode_body(input, book.table(), &mut writer)?;
    metrics.body_bits = writer.bit_len() - metrics.header_bits;
    metrics.output_bytes = writer.byte_len();
    writer.finish()?;

    metrics.raw_bytes = raw;
    metrics.input_bytes = raw;
    metrics.leaf_count = book.tree().leaf_count();
    metrics.max_code_len = book.table().max_len();
    metrics.complete();

    debug!(
        raw = metrics.raw_bytes,
        compressed = metrics.output_bytes,
        "compressed"
    );
    Ok(metrics)
}

/// Compress an in-memory buffer.
pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let freqs = FrequencyTable::from_bytes(data);
    let mut out = Vec::new();
    compress(&freqs, data, &mut out)?;
    Ok(out)
}

/// Decompress the stream in `input` into `output`.
///
/// Decoding stops at the sentinel; bytes after it are not read. On error,
/// `output` may hold a prefix of the payload; use `decompress_bytes` (or
/// decode into a buffer) when partial output must never be observed.
pub fn decompress<R: Read, W: Write>(input: R, output: W) -> Result<CodecMetrics> {
    let mut metrics = CodecMetrics::new(Operation::Decompress);

    let mut reader = BitReader::new(input);
    let tree = read_header(&mut reader)?;
    metrics.header_bits = reader.position();

    let decoded = decode_body(&tree, &mut reader, output)?;
    metrics.body_bits = reader.position() - metrics.header_bits;

    metrics.input_bytes = reader.position().div_ceil(8);
    metrics.output_bytes = decoded;
    metrics.raw_bytes = decoded;
    metrics.leaf_count = tree.leaf_count();
    metrics.max_code_len = tree.depth();
    metrics.complete();

    debug!(
        compressed = metrics.input_bytes,
        raw = metrics.raw_bytes,
        "decompressed"
    );
    Ok(metrics)
}

/// Decompress an in-memory buffer. Nothing is returned unless decoding
/// reaches the sentinel.
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decompress(data, &mut out)?;
    Ok(out)
}
