//! Huffman decoder (decompression).

use crate::serialize::deserialize;
use crate::tree::CodeTree;
use huffarc_core::BitReader;
use huffarc_core::error::{HuffArcError, Result};
use std::io::{Read, Write};

/// Output is handed to the sink in chunks of this size.
const CHUNK_SIZE: usize = 64 * 1024;

/// Static Huffman decoder driven by a code tree.
#[derive(Debug, Clone)]
pub struct HuffmanDecoder {
    tree: CodeTree,
}

impl HuffmanDecoder {
    /// Create a decoder for the given tree.
    pub fn new(tree: CodeTree) -> Self {
        Self { tree }
    }

    /// Create a decoder from a serialized tree that must span all of `data`.
    pub fn from_serialized(data: &[u8]) -> Result<Self> {
        let (tree, consumed) = deserialize(data)?;
        if consumed != data.len() {
            return Err(HuffArcError::corrupted_tree(
                consumed,
                format!("{} trailing bytes after tree", data.len() - consumed),
            ));
        }
        Ok(Self::new(tree))
    }

    /// The code tree.
    pub fn tree(&self) -> &CodeTree {
        &self.tree
    }

    /// Decode exactly `count` symbols.
    ///
    /// Decoding is bounded by `count`, never by the end of the stream: the
    /// padding bits of the final byte are left unread.
    pub fn decode<R: Read>(&self, reader: &mut BitReader<R>, count: usize) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(count.min(CHUNK_SIZE * 16));
        for _ in 0..count {
            output.push(self.tree.decode_symbol(reader)?);
        }
        Ok(output)
    }

    /// Decode exactly `count` symbols into `sink`.
    pub fn decode_into<R: Read, W: Write>(
        &self,
        reader: &mut BitReader<R>,
        count: u64,
        sink: &mut W,
    ) -> Result<()> {
        let mut chunk = Vec::with_capacity(CHUNK_SIZE);
        let mut remaining = count;
        while remaining > 0 {
            let take = remaining.min(CHUNK_SIZE as u64);
            chunk.clear();
            for _ in 0..take {
                chunk.push(self.tree.decode_symbol(reader)?);
            }
            sink.write_all(&chunk)?;
            remaining -= take;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::HuffmanEncoder;
    use std::io::Cursor;

    #[test]
    fn test_decode_example() {
        let decoder =
            HuffmanDecoder::from_serialized(&[0, 1, b'A', 0, 1, b'C', 1, b'B']).unwrap();
        let mut reader = BitReader::new(Cursor::new(vec![0b0000_0111, 0b1111_0100]));
        let output = decoder.decode(&mut reader, 10).unwrap();
        assert_eq!(output, b"AAAAABBBCC");
        // The padding bit is never consumed
        assert_eq!(reader.bits_read(), 15);
    }

    #[test]
    fn test_padding_not_decoded() {
        // 'B' is code 0, so padding zeros would decode as extra 'B's
        let data = b"AAB";
        let encoder = HuffmanEncoder::from_data(data).unwrap();
        let payload = encoder.encode_to_vec(data).unwrap();
        assert_eq!(payload.len(), 1);

        let decoder = HuffmanDecoder::new(encoder.tree().clone());
        let output = decoder
            .decode(&mut BitReader::new(Cursor::new(&payload)), data.len())
            .unwrap();
        assert_eq!(output, data);
    }

    #[test]
    fn test_decode_truncated_stream() {
        let data = b"abcdefgh".repeat(4);
        let encoder = HuffmanEncoder::from_data(&data).unwrap();
        let mut payload = encoder.encode_to_vec(&data).unwrap();
        payload.pop();

        let decoder = HuffmanDecoder::new(encoder.tree().clone());
        let result = decoder.decode(&mut BitReader::new(Cursor::new(&payload)), data.len());
        assert!(matches!(result, Err(HuffArcError::UnexpectedEnd { .. })));
    }

    #[test]
    fn test_decode_into_chunks() {
        let data: Vec<u8> = (0..(CHUNK_SIZE * 2 + 123))
            .map(|i| (i % 7) as u8 * 31)
            .collect();
        let encoder = HuffmanEncoder::from_data(&data).unwrap();
        let payload = encoder.encode_to_vec(&data).unwrap();

        let decoder = HuffmanDecoder::new(encoder.tree().clone());
        let mut sink = Vec::new();
        decoder
            .decode_into(
                &mut BitReader::new(Cursor::new(&payload)),
                data.len() as u64,
                &mut sink,
            )
            .unwrap();
        assert_eq!(sink, data);
    }

    #[test]
    fn test_from_serialized_trailing_bytes() {
        assert!(matches!(
            HuffmanDecoder::from_serialized(&[1, b'a', 0]),
            Err(HuffArcError::CorruptedTree { offset: 2, .. })
        ));
    }
}
