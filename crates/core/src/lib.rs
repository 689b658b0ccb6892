//! huffproc-core: lossless Huffman compression with a self-describing header
//!
//! A compressed stream is a 32-bit magic number, the Huffman tree in
//! preorder, the codeword of every input byte, and finally the codeword of
//! an end-of-payload sentinel. No length field is stored; decoding ends when
//! the sentinel leaf is reached.
//!
//! # Architecture
//!
//! The codec is split into stages, leaf dependencies first:
//! - `bitio`: Bit-level reading/writing over `Read`/`Write`
//! - `freq`: Byte frequency counting
//! - `tree`: Huffman tree construction
//! - `codebook`: Code table extraction
//! - `framing`: Magic number and tree serialization
//! - `body`: Payload encoding and decoding
//! - `processor`: The full compress/decompress pipelines
//! - `metrics`: Observable codec behavior
//!
//! # Example
//! ```
//! use huffproc_core::{compress_bytes, decompress_bytes};
//!
//! let compressed = compress_bytes(b"abracadabra").unwrap();
//! assert_eq!(decompress_bytes(&compressed).unwrap(), b"abracadabra");
//! ```
//!
//! # Design Principles
//!
//! - **No panics**: All errors are structured, including on corrupt input
//! - **Deterministic**: Equal input always yields bit-identical output
//! - **Stateless**: Every call builds its own tree; nothing is shared

pub mod bitio;
pub mod body;
pub mod codebook;
pub mod error;
pub mod framing;
pub mod freq;
pub mod metrics;
pub mod processor;
pub mod tree;

// Re-export commonly used types
pub use codebook::{Code, CodeTable, Codebook};
pub use error::{Error, Result};
pub use freq::FrequencyTable;
pub use metrics::{CodecMetrics, Operation};
pub use processor::{compress, compress_bytes, decompress, decompress_bytes};
pub use tree::{HuffNode, HuffTree, Symbol, SENTINEL};
