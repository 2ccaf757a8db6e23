//! Huffman code tree construction and traversal.
//!
//! The tree is built by the classic greedy merge: every present byte starts
//! as a leaf, and the two lightest nodes are repeatedly combined under a new
//! internal node until one root remains.
//!
//! # Tie-break
//!
//! Nodes are ordered by the pair `(weight, rank)`. A leaf's rank is its
//! symbol value (0-255); the n-th internal node created gets rank `256 + n`.
//! The order is total, so identical frequency tables always produce
//! identical trees. The first node popped becomes the left child.

use crate::frequency::FrequencyTable;
use crate::table::{CodeTable, MAX_CODE_LEN};
use huffarc_core::BitReader;
use huffarc_core::error::{HuffArcError, Result};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::io::Read;
use tracing::debug;

/// A node of the code tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Terminal node holding a byte value.
    Leaf {
        /// The byte this leaf decodes to.
        symbol: u8,
        /// Occurrence count (0 for deserialized trees).
        weight: u64,
    },
    /// Node with exactly two children.
    Internal {
        /// Sum of the children's weights.
        weight: u64,
        /// Subtree reached by a `0` bit.
        left: Box<Node>,
        /// Subtree reached by a `1` bit.
        right: Box<Node>,
    },
}

impl Node {
    /// Create an internal node over two children.
    pub fn internal(left: Node, right: Node) -> Self {
        Node::Internal {
            weight: left.weight().saturating_add(right.weight()),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// The node's weight.
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    /// Check if this is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// The leaf's symbol, if this is a leaf.
    pub fn symbol(&self) -> Option<u8> {
        match self {
            Node::Leaf { symbol, .. } => Some(*symbol),
            Node::Internal { .. } => None,
        }
    }

    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn same_shape(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Leaf { symbol: a, .. }, Node::Leaf { symbol: b, .. }) => a == b,
            (
                Node::Internal {
                    left: l1,
                    right: r1,
                    ..
                },
                Node::Internal {
                    left: l2,
                    right: r2,
                    ..
                },
            ) => l1.same_shape(l2) && r1.same_shape(r2),
            _ => false,
        }
    }
}

/// Priority queue entry: a subtree keyed by `(weight, rank)`.
#[derive(Debug)]
struct Pending {
    weight: u64,
    rank: u32,
    node: Node,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.weight, self.rank).cmp(&(other.weight, other.rank))
    }
}

/// A Huffman code tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTree {
    root: Node,
}

impl CodeTree {
    /// Build a tree from a frequency table.
    ///
    /// Fails with [`HuffArcError::EmptyInput`] if the table is empty. A table
    /// with a single symbol yields a tree that is just one leaf.
    pub fn build(frequencies: &FrequencyTable) -> Result<Self> {
        let mut heap: BinaryHeap<Reverse<Pending>> = frequencies
            .iter()
            .map(|(symbol, weight)| {
                Reverse(Pending {
                    weight,
                    rank: symbol as u32,
                    node: Node::Leaf { symbol, weight },
                })
            })
            .collect();

        let mut next_rank = 256u32;
        while heap.len() > 1 {
            let (Some(Reverse(left)), Some(Reverse(right))) = (heap.pop(), heap.pop()) else {
                break;
            };
            let node = Node::internal(left.node, right.node);
            heap.push(Reverse(Pending {
                weight: node.weight(),
                rank: next_rank,
                node,
            }));
            next_rank += 1;
        }

        let root = heap
            .pop()
            .map(|Reverse(pending)| pending.node)
            .ok_or(HuffArcError::EmptyInput)?;

        let tree = Self { root };
        debug!(
            symbols = tree.leaf_count(),
            depth = tree.depth(),
            total = tree.root.weight(),
            "built code tree"
        );
        Ok(tree)
    }

    /// Wrap an existing root node.
    ///
    /// Fails with [`HuffArcError::CorruptedTree`] if any leaf would get a
    /// code longer than [`MAX_CODE_LEN`] bits.
    pub fn from_root(root: Node) -> Result<Self> {
        let depth = root.depth();
        if depth > MAX_CODE_LEN as usize {
            return Err(HuffArcError::corrupted_tree(
                0,
                format!("tree depth {} exceeds {} bits", depth, MAX_CODE_LEN),
            ));
        }
        Ok(Self { root })
    }

    /// The root node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Number of leaves (distinct symbols).
    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Length of the longest root-to-leaf path (0 for a single leaf).
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Compare shape and leaf symbols, ignoring weights.
    pub fn structurally_eq(&self, other: &CodeTree) -> bool {
        self.root.same_shape(&other.root)
    }

    /// Generate the code table by depth-first traversal.
    pub fn codes(&self) -> CodeTable {
        CodeTable::from_tree(self)
    }

    /// Decode one symbol by walking from the root: `0` goes left, `1` right.
    ///
    /// A single-leaf tree consumes exactly one bit per symbol.
    pub fn decode_symbol<R: Read>(&self, reader: &mut BitReader<R>) -> Result<u8> {
        let mut node = &self.root;
        if let Node::Leaf { symbol, .. } = node {
            reader.read_bit()?;
            return Ok(*symbol);
        }

        loop {
            match node {
                Node::Leaf { symbol, .. } => return Ok(*symbol),
                Node::Internal { left, right, .. } => {
                    node = if reader.read_bit()? {
                        right.as_ref()
                    } else {
                        left.as_ref()
                    };
                }
            }
        }
    }
}
