//! Code table extraction.
//!
//! A depth-first walk of the tree assigns `0` to every left branch and `1`
//! to every right branch; the path to a leaf is that leaf's code.

use std::fmt;
use std::io::Write;

use tracing::{debug, trace};

use crate::bitio::BitWriter;
use crate::error::Result;
use crate::freq::FrequencyTable;
use crate::tree::{HuffNode, HuffTree, Symbol, ALPHABET_SIZE};

/// A codeword: bits packed MSB-first into 64-bit words.
///
/// Codes can be up to 256 bits long, so a single integer is not enough.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Code {
    words: Vec<u64>,
    len: usize,
}

impl Code {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append one bit.
    pub fn push(&mut self, bit: bool) {
        if self.len % 64 == 0 {
            self.words.push(0);
        }
        if bit {
            self.words[self.len / 64] |= 1 << (63 - self.len % 64);
        }
        self.len += 1;
    }

    /// Remove the last bit.
    pub fn pop(&mut self) -> Option<bool> {
        if self.len == 0 {
            return None;
        }
        let bit = self.bit(self.len - 1);
        self.len -= 1;
        let word = self.len / 64;
        self.words[word] &= !(1 << (63 - self.len % 64));
        if self.len % 64 == 0 {
            self.words.pop();
        }
        Some(bit)
    }

    /// Bit at `index`; `index` must be below `len`.
    pub fn bit(&self, index: usize) -> bool {
        (self.words[index / 64] >> (63 - index % 64)) & 1 == 1
    }

    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|i| self.bit(i))
    }

    /// True if `prefix` is a prefix of this code (or equal to it).
    pub fn starts_with(&self, prefix: &Code) -> bool {
        prefix.len <= self.len && (0..prefix.len).all(|i| self.bit(i) == prefix.bit(i))
    }

    /// Append the code to `writer`, leading zeros included.
    pub fn write_to<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        for (i, &word) in self.words.iter().enumerate() {
            let n = (self.len - i * 64).min(64);
            writer.write_bits(word >> (64 - n), n)?;
        }
        Ok(())
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol to code mapping for one tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    /// Collect the root-to-leaf path of every leaf.
    pub fn from_tree(tree: &HuffTree) -> Self {
        let mut codes = vec![None; ALPHABET_SIZE];
        let mut path = Code::new();
        extract(tree.root(), &mut path, &mut codes);
        Self { codes }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(symbol as usize).and_then(Option::as_ref)
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of the longest code.
    pub fn max_len(&self) -> usize {
        self.codes.iter().flatten().map(Code::len).max().unwrap_or(0)
    }

    /// (symbol, code) pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_ref().map(|c| (symbol as Symbol, c)))
    }
}

fn extract(node: &HuffNode, path: &mut Code, codes: &mut [Option<Code>]) {
    match node {
        HuffNode::Leaf { symbol, .. } => {
            trace!(symbol, code = %path, "assigned code");
            codes[*symbol as usize] = Some(path.clone());
        }
        HuffNode::Internal { left, right, .. } => {
            path.push(false);
            extract(left, path, codes);
            path.pop();
            path.push(true);
            extract(right, path, codes);
            path.pop();
        }
    }
}

/// Tree and code table for the compress side.
#[derive(Debug, Clone)]
pub struct Codebook {
    tree: HuffTree,
    table: CodeTable,
}

impl Codebook {
    /// Build the tree for `freqs` and extract its codes.
    pub fn from_frequencies(freqs: &FrequencyTable) -> Self {
        let tree = HuffTree::build(freqs);
        let table = CodeTable::from_tree(&tree);
        debug!(codes = table.len(), max_len = table.max_len(), "extracted code table");
        Self { tree, table }
    }

    pub fn tree(&self) -> &HuffTree {
        &self.tree
    }

    pub fn table(&self) -> &CodeTable {
        &self.table
    }

    pub fn code(&self, symbol: Symbol) -> Option<&Code> {
        self.table.get(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::SENTINEL;

    fn codebook(data: &[u8]) -> Codebook {
        Codebook::from_frequencies(&FrequencyTable::from_bytes(data))
    }

    fn code_from_str(s: &str) -> Code {
        let mut code = Code::new();
        for c in s.chars() {
            code.push(c == '1');
        }
        code
    }

    #[test]
    fn test_code_push_pop_display() {
        let mut code = code_from_str("1011");
        assert_eq!(code.to_string(), "1011");
        assert_eq!(code.pop(), Some(true));
        assert_eq!(code.pop(), Some(true));
        assert_eq!(code.to_string(), "10");
        code.push(false);
        assert_eq!(code, code_from_str("100"));
    }

    #[test]
    fn test_long_code_spans_words() {
        let pattern: String = (0..130).map(|i| if i % 3 == 0 { '1' } else { '0' }).collect();
        let code = code_from_str(&pattern);
        assert_eq!(code.len(), 130);
        assert_eq!(code.to_string(), pattern);

        let mut writer = BitWriter::new(Vec::new());
        code.write_to(&mut writer).unwrap();
        assert_eq!(writer.bit_len(), 130);
        let bytes = writer.finish().unwrap();
        assert_eq!(bytes.len(), 17);
        assert_eq!(bytes[0], 0b1001_0010);
    }

    #[test]
    fn test_leading_zeros_preserved() {
        let mut writer = BitWriter::new(Vec::new());
        code_from_str("0001").write_to(&mut writer).unwrap();
        code_from_str("0001").write_to(&mut writer).unwrap();
        assert_eq!(writer.finish().unwrap(), vec![0b0001_0001]);
    }

    #[test]
    fn test_minimal_alphabet_gets_one_bit_codes() {
        let book = codebook(b"aaaa");
        assert_eq!(book.table().len(), 2);
        assert_eq!(book.code(b'a' as Symbol).unwrap().to_string(), "1");
        assert_eq!(book.code(SENTINEL).unwrap().to_string(), "0");
    }

    #[test]
    fn test_empty_input_codes() {
        let book = codebook(b"");
        assert_eq!(book.code(0).unwrap().to_string(), "0");
        assert_eq!(book.code(SENTINEL).unwrap().to_string(), "1");
    }

    #[test]
    fn test_prefix_free_and_nonempty() {
        let book = codebook(b"she sells sea shells by the sea shore, 0123456789");
        let codes: Vec<_> = book.table().iter().collect();
        for (a, code_a) in &codes {
            assert!(!code_a.is_empty());
            for (b, code_b) in &codes {
                if a != b {
                    assert!(!code_a.starts_with(code_b), "{a} / {b}");
                }
            }
        }
    }

    #[test]
    fn test_coverage() {
        let data = b"hello, world";
        let book = codebook(data);
        let freqs = FrequencyTable::from_bytes(data);
        for byte in 0..=255u8 {
            assert_eq!(book.code(byte as Symbol).is_some(), freqs.count(byte) > 0);
        }
        assert!(book.code(SENTINEL).is_some());
        assert_eq!(book.table().len(), freqs.distinct() + 1);
    }

    #[test]
    fn test_max_len_bounded_by_leaves() {
        let data: Vec<u8> = (0..=255).collect();
        let book = codebook(&data);
        assert_eq!(book.table().len(), ALPHABET_SIZE);
        assert!(book.table().max_len() < ALPHABET_SIZE);
        assert_eq!(book.table().max_len(), book.tree().depth());
    }
}
