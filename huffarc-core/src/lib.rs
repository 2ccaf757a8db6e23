//! # HuffArc Core
//!
//! Core components for the HuffArc archiver.
//!
//! - [`bitstream`]: MSB-first bit-level I/O for prefix codes
//! - [`entry`]: Directory archive entry records
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! HuffArc is layered the same way from the bottom up:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L4: CLI                                                 │
//! │     huffarc compress / compress-dir / decompress       │
//! ├─────────────────────────────────────────────────────────┤
//! │ L3: Container                                           │
//! │     Header, serialized tree, entry records, payload    │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec                                               │
//! │     Frequency model, code tree, code table             │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: BitStream (this crate)                              │
//! │     BitReader/BitWriter, EntryRecord, errors           │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use huffarc_core::bitstream::{BitReader, BitWriter};
//! use std::io::Cursor;
//!
//! let mut output = Vec::new();
//! {
//!     let mut writer = BitWriter::new(&mut output);
//!     writer.write_byte(0xAB).unwrap();
//!     writer.write_bit(true).unwrap();
//! }
//! assert_eq!(output, vec![0xAB, 0x80]);
//!
//! let mut reader = BitReader::new(Cursor::new(output));
//! assert_eq!(reader.read_byte().unwrap(), 0xAB);
//! assert!(reader.read_bit().unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod entry;
pub mod error;

// Re-exports for convenience
pub use bitstream::{BitReader, BitStream, BitWriter, Mode};
pub use entry::{EntryRecord, MAX_PATH_LEN};
pub use error::{HuffArcError, Result};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitstream::{BitReader, BitWriter};
    pub use crate::entry::EntryRecord;
    pub use crate::error::{HuffArcError, Result};
}
