//! Error types for the huffproc codec.
//!
//! All operations return structured errors rather than panicking, including
//! on arbitrary (possibly hostile) compressed input.

use thiserror::Error;

/// Top-level error type for all codec operations.
///
/// Each variant corresponds to a specific failure domain:
/// - Bit I/O: misuse of the bit reader/writer
/// - Format: the stream is not a valid huffproc stream
/// - Truncated: the stream ends before the sentinel is decoded
/// - Encode: the input does not match the code table it is encoded with
/// - I/O: the underlying reader or writer failed
#[derive(Debug, Error)]
pub enum Error {
    /// Bit I/O operation was called with invalid arguments
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Magic value or header tree is invalid
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Stream ended before decoding finished
    #[error("truncated stream: {0}")]
    Truncated(#[from] TruncatedStreamError),

    /// Input could not be encoded with the given code table
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Underlying reader or writer failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bit-level I/O errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// Invalid bit count (more than 64 bits in one call)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),

    /// Value has bits set above the requested width
    #[error("value {value:#x} does not fit in {count} bits")]
    ValueTooWide { value: u64, count: usize },
}

/// The stream is not a well-formed compressed stream.
///
/// Detected at decode start (magic) or while rebuilding the tree.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Fewer than 32 bits available, so no magic value could be read
    #[error("missing magic number: stream holds only {bits_available} bits")]
    MissingMagic { bits_available: u64 },

    /// Magic value does not match
    #[error("invalid magic number: expected {expected:#010x}, got {actual:#010x}")]
    InvalidMagic { expected: u32, actual: u32 },

    /// Leaf carries a 9-bit value outside the alphabet
    #[error("invalid symbol {symbol} in header at bit {position}")]
    InvalidSymbol { symbol: u16, position: u64 },

    /// Two leaves carry the same symbol
    #[error("duplicate symbol {symbol} in header at bit {position}")]
    DuplicateSymbol { symbol: u16, position: u64 },

    /// Tree has no leaf for the end-of-payload sentinel
    #[error("header tree has no sentinel leaf")]
    MissingSentinel,

    /// Tree is a lone leaf, which has no decodable codes
    #[error("header tree has a single leaf")]
    SingleLeaf,

    /// Tree nests deeper than any valid tree can
    #[error("header tree exceeds maximum depth {max}")]
    TooDeep { max: usize },
}

/// The stream ran out of bits before decoding completed.
#[derive(Debug, Error)]
pub enum TruncatedStreamError {
    /// Ran out inside the serialized tree
    #[error("stream ended inside header after {bits_read} bits")]
    Header { bits_read: u64 },

    /// Ran out before the sentinel leaf was reached
    #[error("stream ended after {bits_read} bits ({decoded} bytes decoded) without a sentinel")]
    Body { bits_read: u64, decoded: u64 },
}

/// Encoding errors.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Input byte has no code (it was absent when frequencies were counted)
    #[error("byte {byte:#04x} at offset {offset} has no code in the table")]
    MissingCode { byte: u8, offset: u64 },

    /// Table has no code for the end-of-payload sentinel
    #[error("code table has no sentinel code")]
    MissingSentinel,
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
