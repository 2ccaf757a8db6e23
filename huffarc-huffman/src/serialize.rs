//! Compact tree serialization.
//!
//! The tree is written in preorder. A leaf is two bytes, `01` followed by
//! its symbol; an internal node is the byte `00` followed by its left and
//! then its right subtree. The structure delimits itself, so no length or
//! count is stored.
//!
//! ```text
//! "AAAAABBBCC" ->   root
//!                  /    \
//!                 A      *
//!                       / \
//!                      C   B
//!
//! 00  01 41  00  01 43  01 42
//! ```

use crate::table::MAX_CODE_LEN;
use crate::tree::{CodeTree, Node};
use huffarc_core::error::{HuffArcError, Result};

/// Tag byte preceding an internal node.
pub const INTERNAL_TAG: u8 = 0;

/// Tag byte preceding a leaf's symbol.
pub const LEAF_TAG: u8 = 1;

/// Largest possible serialized tree: 256 leaves and 255 internal nodes.
pub const MAX_SERIALIZED_LEN: usize = 256 * 2 + 255;

/// Serialize a tree.
pub fn serialize(tree: &CodeTree) -> Vec<u8> {
    let mut out = Vec::with_capacity(serialized_len(tree));
    write_node(tree.root(), &mut out);
    out
}

/// Number of bytes `serialize` produces for `tree`.
pub fn serialized_len(tree: &CodeTree) -> usize {
    // A full binary tree with n leaves has n - 1 internal nodes
    let leaves = tree.leaf_count();
    leaves * 2 + (leaves - 1)
}

fn write_node(node: &Node, out: &mut Vec<u8>) {
    match node {
        Node::Leaf { symbol, .. } => out.extend_from_slice(&[LEAF_TAG, *symbol]),
        Node::Internal { left, right, .. } => {
            out.push(INTERNAL_TAG);
            write_node(left, out);
            write_node(right, out);
        }
    }
}

/// Deserialize a tree from the start of `data`.
///
/// Returns the tree and the number of bytes consumed; bytes after the tree
/// are left untouched. Leaves of the result have weight 0.
///
/// # Errors
///
/// - [`HuffArcError::TruncatedTree`] if `data` ends before the tree does
/// - [`HuffArcError::CorruptedTree`] on an unknown tag byte, a repeated
///   symbol, or a leaf deeper than the maximum code length
pub fn deserialize(data: &[u8]) -> Result<(CodeTree, usize)> {
    let mut parser = Parser {
        data,
        offset: 0,
        seen: [false; 256],
    };
    let root = parser.node(0)?;
    let tree = CodeTree::from_root(root)?;
    Ok((tree, parser.offset))
}

struct Parser<'a> {
    data: &'a [u8],
    offset: usize,
    seen: [bool; 256],
}

impl Parser<'_> {
    fn byte(&mut self) -> Result<u8> {
        let byte = *self
            .data
            .get(self.offset)
            .ok_or_else(|| HuffArcError::truncated_tree(self.offset))?;
        self.offset += 1;
        Ok(byte)
    }

    fn node(&mut self, depth: usize) -> Result<Node> {
        if depth > MAX_CODE_LEN as usize {
            return Err(HuffArcError::corrupted_tree(
                self.offset,
                format!("nesting exceeds {} levels", MAX_CODE_LEN),
            ));
        }

        let tag_offset = self.offset;
        match self.byte()? {
            LEAF_TAG => {
                let symbol = self.byte()?;
                if std::mem::replace(&mut self.seen[symbol as usize], true) {
                    return Err(HuffArcError::corrupted_tree(
                        tag_offset,
                        format!("symbol {:#04x} appears twice", symbol),
                    ));
                }
                Ok(Node::Leaf { symbol, weight: 0 })
            }
            INTERNAL_TAG => {
                let left = self.node(depth + 1)?;
                let right = self.node(depth + 1)?;
                Ok(Node::internal(left, right))
            }
            tag => Err(HuffArcError::corrupted_tree(
                tag_offset,
                format!("unknown node tag {}", tag),
            )),
        }
    }
}
