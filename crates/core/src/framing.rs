//! Stream header: magic number and serialized tree.
//!
//! # Header Format
//!
//! ```text
//! +--------------------+
//! | Magic (32 bits)    |  0xFACE8200
//! +--------------------+
//! | Tree (preorder)    |  internal node: 0, left subtree, right subtree
//! | (variable)         |  leaf:          1, 9-bit symbol
//! +--------------------+
//! ```
//!
//! The tree is self-delimiting: its recursive shape tells the reader where it
//! ends, so no node count or length field is stored. Weights are not stored;
//! a tree read back from a header carries weight 0 everywhere.
//!
//! # Validation
//!
//! Reading rejects anything `HuffTree::build` could not have produced:
//! symbols above 256, duplicate leaves, a missing sentinel leaf, a lone leaf
//! at the root, and nesting deeper than `MAX_DEPTH`.

use std::io::{Read, Write};

use tracing::debug;

use crate::bitio::{BitReader, BitWriter};
use crate::error::{FormatError, Result, TruncatedStreamError};
use crate::tree::{HuffNode, HuffTree, Symbol, ALPHABET_SIZE, MAX_DEPTH, SENTINEL, SYMBOL_BITS};

/// Magic number opening every compressed stream.
pub const MAGIC: u32 = 0xFACE_8200;

/// Width of the magic number.
pub const MAGIC_BITS: usize = 32;

/// Write magic and tree.
pub fn write_header<W: Write>(tree: &HuffTree, writer: &mut BitWriter<W>) -> Result<()> {
    let start = writer.bit_len();
    writer.write_bits(MAGIC as u64, MAGIC_BITS)?;
    write_node(tree.root(), writer)?;
    debug!(bits = writer.bit_len() - start, "wrote header");
    Ok(())
}

fn write_node<W: Write>(node: &HuffNode, writer: &mut BitWriter<W>) -> Result<()> {
    match node {
        HuffNode::Leaf { symbol, .. } => {
            writer.write_bit(true)?;
            writer.write_bits(*symbol as u64, SYMBOL_BITS)
        }
        HuffNode::Internal { left, right, .. } => {
            writer.write_bit(false)?;
            write_node(left, writer)?;
            write_node(right, writer)
        }
    }
}

/// Check the magic number.
///
/// # Errors
/// - `FormatError::MissingMagic` if the stream is shorter than 32 bits
/// - `FormatError::InvalidMagic` if the value differs
pub fn read_magic<R: Read>(reader: &mut BitReader<R>) -> Result<()> {
    let actual = match reader.read_bits(MAGIC_BITS)? {
        Some(value) => value as u32,
        None => {
            return Err(FormatError::MissingMagic {
                bits_available: reader.position(),
            }
            .into())
        }
    };
    if actual != MAGIC {
        return Err(FormatError::InvalidMagic {
            expected: MAGIC,
            actual,
        }
        .into());
    }
    Ok(())
}

/// Check the magic number and rebuild the tree.
///
/// # Errors
/// - `FormatError` for a bad magic number or a malformed tree
/// - `TruncatedStreamError::Header` if the stream ends inside the tree
pub fn read_header<R: Read>(reader: &mut BitReader<R>) -> Result<HuffTree> {
    read_magic(reader)?;

    let start = reader.position();
    let mut seen = [false; ALPHABET_SIZE];
    let root = read_node(reader, &mut seen, 0)?;

    if root.is_leaf() {
        return Err(FormatError::SingleLeaf.into());
    }
    if !seen[SENTINEL as usize] {
        return Err(FormatError::MissingSentinel.into());
    }

    let tree = HuffTree::from_root(root);
    debug!(
        bits = reader.position() - start,
        leaves = tree.leaf_count(),
        "read header"
    );
    Ok(tree)
}

fn read_node<R: Read>(
    reader: &mut BitReader<R>,
    seen: &mut [bool; ALPHABET_SIZE],
    depth: usize,
) -> Result<HuffNode> {
    let is_leaf = reader.read_bit()?.ok_or_else(|| truncated(reader))?;

    if is_leaf {
        let position = reader.position();
        let symbol = reader
            .read_bits(SYMBOL_BITS)?
            .ok_or_else(|| truncated(reader))? as Symbol;

        if symbol as usize >= ALPHABET_SIZE {
            return Err(FormatError::InvalidSymbol { symbol, position }.into());
        }
        if std::mem::replace(&mut seen[symbol as usize], true) {
            return Err(FormatError::DuplicateSymbol { symbol, position }.into());
        }
        return Ok(HuffNode::leaf(symbol, 0));
    }

    if depth >= MAX_DEPTH {
        return Err(FormatError::TooDeep { max: MAX_DEPTH }.into());
    }
    let left = read_node(reader, seen, depth + 1)?;
    let right = read_node(reader, seen, depth + 1)?;
    Ok(HuffNode::merge(left, right))
}

fn truncated<R: Read>(reader: &BitReader<R>) -> TruncatedStreamError {
    TruncatedStreamError::Header {
        bits_read: reader.position(),
    }
}
