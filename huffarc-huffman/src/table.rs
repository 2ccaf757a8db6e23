//! Code table generation.
//!
//! Codes are assigned by a depth-first walk of the tree, appending `0` for
//! each left descent and `1` for each right descent. A tree consisting of a
//! single leaf has no edges to walk, so that leaf is given the one-bit code
//! `0` instead of an empty code.

use crate::frequency::FrequencyTable;
use crate::tree::{CodeTree, Node};
use huffarc_core::BitWriter;
use huffarc_core::error::{HuffArcError, Result};
use std::fmt;
use std::io::Write;

/// Maximum code length in bits.
///
/// Trees built from `u64` counts never get deeper than 92 levels; the limit
/// only matters for deserialized trees.
pub const MAX_CODE_LEN: u8 = 128;

/// A non-empty prefix code, stored MSB-first in the low `len` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    bits: u128,
    len: u8,
}

impl Code {
    /// Create a code from its bit value and length.
    pub fn new(bits: u128, len: u8) -> Self {
        debug_assert!(len <= MAX_CODE_LEN);
        let mask = if len >= 128 {
            u128::MAX
        } else {
            (1u128 << len) - 1
        };
        Self {
            bits: bits & mask,
            len,
        }
    }

    fn push(self, bit: bool) -> Self {
        Self {
            bits: (self.bits << 1) | bit as u128,
            len: self.len + 1,
        }
    }

    /// Code value; the first bit is the most significant of the low `len` bits.
    pub fn bits(&self) -> u128 {
        self.bits
    }

    /// Number of bits in the code.
    pub fn len(&self) -> u8 {
        self.len
    }

    /// Whether the code has no bits. Never true for codes in a `CodeTable`.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The code's bits in transmission order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).rev().map(move |i| (self.bits >> i) & 1 != 0)
    }

    /// Check whether this code is a prefix of (or equal to) `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        if self.len > other.len {
            return false;
        }
        if self.len == 0 {
            return true;
        }
        (other.bits >> (other.len - self.len)) == self.bits
    }

    /// Append the code to a bit stream.
    #[inline]
    pub fn write_to<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        if self.len <= 64 {
            writer.write_bits(self.bits as u64, self.len)
        } else {
            for bit in self.iter() {
                writer.write_bit(bit)?;
            }
            Ok(())
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Mapping from byte value to its code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    /// Derive the table from a tree.
    pub fn from_tree(tree: &CodeTree) -> Self {
        let mut codes = vec![None; 256];
        match tree.root() {
            Node::Leaf { symbol, .. } => codes[*symbol as usize] = Some(Code::new(0, 1)),
            root => assign(root, Code::new(0, 0), &mut codes),
        }
        Self { codes }
    }

    /// Code for `symbol`, or `None` if it has none.
    pub fn get(&self, symbol: u8) -> Option<Code> {
        self.codes[symbol as usize]
    }

    /// Code for `symbol`.
    ///
    /// Fails with [`HuffArcError::UnknownSymbol`] if the byte was not in the
    /// data the tree was built from.
    pub fn encode(&self, symbol: u8) -> Result<Code> {
        self.get(symbol)
            .ok_or_else(|| HuffArcError::unknown_symbol(symbol))
    }

    /// Symbols and their codes, ascending by symbol.
    pub fn iter(&self) -> impl Iterator<Item = (u8, Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.map(|c| (symbol as u8, c)))
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    /// Whether the table holds no codes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of the longest code.
    pub fn max_len(&self) -> u8 {
        self.iter().map(|(_, c)| c.len()).max().unwrap_or(0)
    }

    /// Exact number of payload bits needed to encode data with these counts.
    pub fn encoded_bits(&self, frequencies: &FrequencyTable) -> Result<u64> {
        frequencies.iter().try_fold(0u64, |total, (symbol, count)| {
            let code = self.encode(symbol)?;
            Ok(total + count * code.len() as u64)
        })
    }
}

fn assign(node: &Node, prefix: Code, codes: &mut [Option<Code>]) {
    match node {
        Node::Leaf { symbol, .. } => codes[*symbol as usize] = Some(prefix),
        Node::Internal { left, right, .. } => {
            assign(left, prefix.push(false), codes);
            assign(right, prefix.push(true), codes);
        }
    }
}
