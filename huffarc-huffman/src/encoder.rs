//! Huffman encoder (compression).

use crate::frequency::FrequencyTable;
use crate::serialize::serialize;
use crate::table::CodeTable;
use crate::tree::CodeTree;
use huffarc_core::BitWriter;
use huffarc_core::error::Result;
use std::io::Write;
use tracing::debug;

/// Static Huffman encoder built from a frequency table.
#[derive(Debug, Clone)]
pub struct HuffmanEncoder {
    /// Code tree (stored in the container).
    tree: CodeTree,
    /// Code table derived from the tree (used for encoding).
    table: CodeTable,
}

impl HuffmanEncoder {
    /// Build the tree and code table for the given counts.
    pub fn new(frequencies: &FrequencyTable) -> Result<Self> {
        let tree = CodeTree::build(frequencies)?;
        let table = tree.codes();
        debug!(
            symbols = table.len(),
            max_code_len = table.max_len(),
            "generated code table"
        );
        Ok(Self { tree, table })
    }

    /// Count `data` and build an encoder for it.
    pub fn from_data(data: &[u8]) -> Result<Self> {
        Self::new(&FrequencyTable::count(data))
    }

    /// The code tree.
    pub fn tree(&self) -> &CodeTree {
        &self.tree
    }

    /// The code table.
    pub fn table(&self) -> &CodeTable {
        &self.table
    }

    /// The tree in its serialized form.
    pub fn serialized_tree(&self) -> Vec<u8> {
        serialize(&self.tree)
    }

    /// Exact payload size in bits for data with the given counts.
    pub fn encoded_bits(&self, frequencies: &FrequencyTable) -> Result<u64> {
        self.table.encoded_bits(frequencies)
    }

    /// Append the codes for every byte of `data` to `writer`.
    ///
    /// The writer is not flushed, so several inputs can share one stream.
    pub fn encode<W: Write>(&self, data: &[u8], writer: &mut BitWriter<W>) -> Result<()> {
        for &byte in data {
            self.table.encode(byte)?.write_to(writer)?;
        }
        Ok(())
    }

    /// Encode `data` into a standalone, zero-padded payload.
    pub fn encode_to_vec(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        {
            let mut writer = BitWriter::new(&mut output);
            self.encode(data, &mut writer)?;
            writer.finish()?;
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huffarc_core::HuffArcError;

    #[test]
    fn test_encode_example() {
        let encoder = HuffmanEncoder::from_data(b"AAAAABBBCC").unwrap();
        let payload = encoder.encode_to_vec(b"AAAAABBBCC").unwrap();
        // 00000 111111 1010 + 1 padding bit
        assert_eq!(payload, vec![0b0000_0111, 0b1111_0100]);
        assert_eq!(
            encoder.serialized_tree(),
            vec![0, 1, b'A', 0, 1, b'C', 1, b'B']
        );
    }

    #[test]
    fn test_encode_unknown_symbol() {
        let encoder = HuffmanEncoder::from_data(b"abc").unwrap();
        assert!(matches!(
            encoder.encode_to_vec(b"abd"),
            Err(HuffArcError::UnknownSymbol { symbol: b'd' })
        ));
    }

    #[test]
    fn test_encode_single_symbol() {
        let encoder = HuffmanEncoder::from_data(&[0xEE; 10]).unwrap();
        let payload = encoder.encode_to_vec(&[0xEE; 10]).unwrap();
        // Ten one-bit codes: 2 bytes, all zero
        assert_eq!(payload, vec![0, 0]);
    }

    #[test]
    fn test_encoded_bits_matches_output() {
        let data = b"she sells sea shells by the sea shore";
        let freq = FrequencyTable::count(data);
        let encoder = HuffmanEncoder::new(&freq).unwrap();
        let bits = encoder.encoded_bits(&freq).unwrap();
        let payload = encoder.encode_to_vec(data).unwrap();
        assert_eq!(payload.len() as u64, bits.div_ceil(8));
    }

    #[test]
    fn test_encode_empty_fails() {
        assert!(matches!(
            HuffmanEncoder::from_data(b""),
            Err(HuffArcError::EmptyInput)
        ));
    }
}
