//! # HuffArc Huffman
//!
//! Static, byte-oriented Huffman coding.
//!
//! ## Pipeline
//!
//! ```text
//! bytes ─► FrequencyTable ─► CodeTree ─┬─► CodeTable ─► BitWriter (payload)
//!                                      └─► serialize  ─► tree bytes
//!
//! tree bytes ─► deserialize ─► CodeTree ─► BitReader-driven walk ─► bytes
//! ```
//!
//! - [`FrequencyTable`]: byte occurrence counts
//! - [`CodeTree`]: greedy minimum-weight merge with a total-order tie-break
//! - [`CodeTable`]: prefix-free codes assigned by tree traversal
//! - [`serialize`]/[`deserialize`]: preorder tag-byte tree encoding
//! - [`HuffmanEncoder`]/[`HuffmanDecoder`]: bit-stream payload coding
//!
//! ## Example
//!
//! ```rust
//! use huffarc_huffman::{compress, decompress};
//!
//! let original = b"AAAAABBBCC";
//! let packed = compress(original).unwrap();
//!
//! // 8 tree bytes + 2 payload bytes
//! assert_eq!(packed.len(), 10);
//!
//! let unpacked = decompress(&packed, original.len()).unwrap();
//! assert_eq!(unpacked, original);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod decoder;
mod encoder;
mod frequency;
pub mod serialize;
mod table;
mod tree;

pub use decoder::HuffmanDecoder;
pub use encoder::HuffmanEncoder;
pub use frequency::FrequencyTable;
pub use huffarc_core::error::{HuffArcError, Result};
pub use serialize::{deserialize, serialize};
pub use table::{Code, CodeTable, MAX_CODE_LEN};
pub use tree::{CodeTree, Node};

use huffarc_core::{BitReader, BitWriter};

/// Compress `data` into a serialized tree followed by the bit-stream payload.
///
/// The original length is not stored; pass it to [`decompress`].
///
/// # Errors
///
/// [`HuffArcError::EmptyInput`] if `data` is empty.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let encoder = HuffmanEncoder::from_data(data)?;
    let mut output = encoder.serialized_tree();
    {
        let mut writer = BitWriter::new(&mut output);
        encoder.encode(data, &mut writer)?;
        writer.finish()?;
    }
    Ok(output)
}

/// Decompress the output of [`compress`], producing `original_size` bytes.
pub fn decompress(data: &[u8], original_size: usize) -> Result<Vec<u8>> {
    let (tree, consumed) = deserialize(data)?;
    let decoder = HuffmanDecoder::new(tree);
    let mut reader = BitReader::new(&data[consumed..]);
    decoder.decode(&mut reader, original_size)
}
