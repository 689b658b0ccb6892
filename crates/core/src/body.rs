//! Payload encoding and decoding.
//!
//! The body is the codeword of every input byte in order, followed by the
//! sentinel's codeword. No length is stored anywhere: the decoder stops when
//! it reaches the sentinel leaf, and running out of bits before that point is
//! an error.

use std::io::{self, Read, Write};

use tracing::debug;

use crate::bitio::{BitReader, BitWriter};
use crate::codebook::CodeTable;
use crate::error::{EncodeError, FormatError, Result, TruncatedStreamError};
use crate::tree::{HuffNode, HuffTree, Symbol, SENTINEL};

/// Decoded bytes are handed to the output in blocks of this size.
const OUTPUT_CHUNK: usize = 8 * 1024;

/// Encode every byte `input` yields, then the sentinel.
///
/// Returns the number of input bytes encoded.
///
/// # Errors
/// - `EncodeError::MissingCode` if a byte has no code in `table`
/// - `EncodeError::MissingSentinel` if `table` has no sentinel code
/// - `Error::Io` if reading or writing fails
pub fn encode_body<R: Read, W: Write>(
    mut input: R,
    table: &CodeTable,
    writer: &mut BitWriter<W>,
) -> Result<u64> {
    let sentinel = table.get(SENTINEL).ok_or(EncodeError::MissingSentinel)?;
    let start = writer.bit_len();
    let mut buf = [0u8; 8192];
    let mut offset = 0u64;

    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        for &byte in &buf[..n] {
            let code = table
                .get(byte as Symbol)
                .ok_or(EncodeError::MissingCode { byte, offset })?;
            code.write_to(writer)?;
            offset += 1;
        }
    }

    sentinel.write_to(writer)?;
    debug!(bytes = offset, bits = writer.bit_len() - start, "encoded body");
    Ok(offset)
}

/// Walk `tree` bit by bit, writing each decoded byte to `output`, until the
/// sentinel leaf is reached.
///
/// Returns the number of bytes decoded. On error, `output` may already hold
/// a prefix of the payload.
///
/// # Errors
/// - `TruncatedStreamError::Body` if the bits run out before the sentinel
/// - `FormatError::SingleLeaf` if the tree root is a leaf
/// - `Error::Io` if reading or writing fails
pub fn decode_body<R: Read, W: Write>(
    tree: &HuffTree,
    reader: &mut BitReader<R>,
    mut output: W,
) -> Result<u64> {
    let root = tree.root();
    if root.is_leaf() {
        return Err(FormatError::SingleLeaf.into());
    }

    let start = reader.position();
    let mut pending = Vec::with_capacity(OUTPUT_CHUNK);
    let mut decoded = 0u64;
    let mut node = root;

    loop {
        match node {
            HuffNode::Leaf { symbol, .. } => {
                if *symbol == SENTINEL {
                    break;
                }
                pending.push(*symbol as u8);
                decoded += 1;
                if pending.len() == OUTPUT_CHUNK {
                    output.write_all(&pending)?;
                    pending.clear();
                }
                node = root;
            }
            HuffNode::Internal { left, right, .. } => {
                let bit = reader.read_bit()?.ok_or_else(|| TruncatedStreamError::Body {
                    bits_read: reader.position(),
                    decoded,
                })?;
                node = if bit { right } else { left };
            }
        }
    }

    output.write_all(&pending)?;
    output.flush()?;
    debug!(bytes = decoded, bits = reader.position() - start, "decoded body");
    Ok(decoded)
}
