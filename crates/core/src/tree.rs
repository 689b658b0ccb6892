//! Huffman tree construction.
//!
//! The alphabet is the 256 byte values plus an end-of-payload sentinel. The
//! tree is built by greedily merging the two lightest nodes of a min-priority
//! queue until one node is left.
//!
//! # Tie-breaking
//!
//! Every queue entry carries an insertion sequence number. Leaves are queued
//! in ascending symbol order (bytes, then the sentinel) and every merged node
//! takes the next number. Among equal weights the lower sequence number is
//! removed first, and the first node removed becomes the left child. The same
//! histogram therefore always yields the same tree.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::freq::FrequencyTable;

/// An alphabet value: a byte (0-255) or the sentinel (256).
pub type Symbol = u16;

/// End-of-payload marker. Never produced by real input.
pub const SENTINEL: Symbol = 256;

/// Number of distinct symbols, sentinel included.
pub const ALPHABET_SIZE: usize = 257;

/// Width of a symbol field in the serialized tree.
pub const SYMBOL_BITS: usize = 9;

/// Deepest leaf a tree of `ALPHABET_SIZE` distinct leaves can have.
pub const MAX_DEPTH: usize = ALPHABET_SIZE - 1;

/// A node of the Huffman tree. Internal nodes own both children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        symbol: Symbol,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn leaf(symbol: Symbol, weight: u64) -> Self {
        HuffNode::Leaf { symbol, weight }
    }

    /// Join two subtrees under a new internal node.
    pub fn merge(left: Self, right: Self) -> Self {
        let weight = left.weight() + right.weight();
        HuffNode::Internal {
            weight,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    fn collect_leaves(&self, out: &mut Vec<(Symbol, u64)>) {
        match self {
            HuffNode::Leaf { symbol, weight } => out.push((*symbol, *weight)),
            HuffNode::Internal { left, right, .. } => {
                left.collect_leaves(out);
                right.collect_leaves(out);
            }
        }
    }

    fn depth(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// Priority queue entry: lightest weight first, then lowest sequence number.
struct QueueEntry {
    weight: u64,
    seq: u64,
    node: HuffNode,
}

impl QueueEntry {
    fn new(node: HuffNode, seq: u64) -> Self {
        Self {
            weight: node.weight(),
            seq,
            node,
        }
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap
        (other.weight, other.seq).cmp(&(self.weight, self.seq))
    }
}

/// A prefix-code tree over bytes plus the sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffTree {
    root: HuffNode,
}

impl HuffTree {
    /// Build the tree for a histogram.
    ///
    /// The sentinel always gets a leaf of weight 0. When the histogram is
    /// empty a weight-0 leaf for byte 0 is added as well, so the root is
    /// never a lone leaf and every code is at least one bit long.
    pub fn build(freqs: &FrequencyTable) -> Self {
        let mut heap = BinaryHeap::with_capacity(ALPHABET_SIZE);
        let mut seq = 0u64;

        for (byte, count) in freqs.iter() {
            heap.push(QueueEntry::new(HuffNode::leaf(byte as Symbol, count), seq));
            seq += 1;
        }
        if heap.is_empty() {
            heap.push(QueueEntry::new(HuffNode::leaf(0, 0), seq));
            seq += 1;
        }
        heap.push(QueueEntry::new(HuffNode::leaf(SENTINEL, 0), seq));
        seq += 1;

        let root = loop {
            match (heap.pop(), heap.pop()) {
                (Some(left), Some(right)) => {
                    heap.push(QueueEntry::new(HuffNode::merge(left.node, right.node), seq));
                    seq += 1;
                }
                (Some(last), None) => break last.node,
                (None, _) => unreachable!("queue is seeded with at least two leaves"),
            }
        };

        let tree = Self { root };
        debug!(
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            weight = tree.root.weight(),
            "built huffman tree"
        );
        tree
    }

    /// Wrap an already validated root.
    pub(crate) fn from_root(root: HuffNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &HuffNode {
        &self.root
    }

    /// Leaves as (symbol, weight), left to right.
    pub fn leaves(&self) -> Vec<(Symbol, u64)> {
        let mut out = Vec::new();
        self.root.collect_leaves(&mut out);
        out
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}
