//! Error types for HuffArc operations.
//!
//! Every failure in the workspace is reported through [`HuffArcError`]. All
//! errors are local and final: a failed compress or decompress operation is
//! aborted and the specific kind is surfaced to the caller.

use crate::bitstream::Mode;
use std::io;
use thiserror::Error;

/// The main error type for HuffArc operations.
#[derive(Debug, Error)]
pub enum HuffArcError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// There are no bytes to build a frequency model from.
    #[error("Empty input: cannot build a Huffman code from zero bytes")]
    EmptyInput,

    /// A bit operation was attempted in the wrong direction.
    #[error("Mode mismatch: bit stream is open for {actual}, operation requires {expected}")]
    ModeMismatch {
        /// Direction the operation needs.
        expected: Mode,
        /// Direction the stream was opened in.
        actual: Mode,
    },

    /// The bit stream ended before the declared size was satisfied.
    #[error("Unexpected end of bit stream at bit position {bit_position}")]
    UnexpectedEnd {
        /// Number of bits consumed before the stream ran dry.
        bit_position: u64,
    },

    /// Invalid magic number in the container header.
    #[error("Invalid magic number: expected {expected:02x?}, found {found:02x?}")]
    InvalidMagic {
        /// Expected magic bytes.
        expected: Vec<u8>,
        /// Actual magic bytes found.
        found: Vec<u8>,
    },

    /// Container written by an unknown format version.
    #[error("Unsupported format version: {version}")]
    UnsupportedVersion {
        /// The version byte found in the header.
        version: u8,
    },

    /// Serialized tree ended before its structure was complete.
    #[error("Truncated tree: ran out of bytes at offset {offset}")]
    TruncatedTree {
        /// Offset into the serialized tree where more bytes were needed.
        offset: usize,
    },

    /// Serialized tree bytes do not describe a valid tree.
    #[error("Corrupted tree at offset {offset}: {message}")]
    CorruptedTree {
        /// Offset into the serialized tree.
        offset: usize,
        /// Description of the problem.
        message: String,
    },

    /// Encode requested for a byte that has no code.
    #[error("Unknown symbol: byte {symbol:#04x} is not in the code table")]
    UnknownSymbol {
        /// The byte value without a code.
        symbol: u8,
    },

    /// A name or path does not fit its 16-bit length field.
    #[error("Path too long: {length} bytes exceeds maximum of {max}")]
    PathTooLong {
        /// Length of the path in bytes.
        length: usize,
        /// Maximum representable length.
        max: usize,
    },

    /// Invalid header format.
    #[error("Invalid header: {message}")]
    InvalidHeader {
        /// Description of the header error.
        message: String,
    },

    /// Path traversal attack detected (e.g., "../" in an entry path).
    #[error("Path traversal detected in entry: {path}")]
    PathTraversal {
        /// The suspicious path.
        path: String,
    },

    /// Declared output is larger than the configured limit.
    #[error("Output too large: {size} bytes exceeds limit of {limit} bytes")]
    OutputTooLarge {
        /// Declared decompressed size.
        size: u64,
        /// Configured maximum.
        limit: u64,
    },

    /// Entry not found in archive or entry source.
    #[error("Entry not found: {path}")]
    EntryNotFound {
        /// Path of the missing entry.
        path: String,
    },
}

/// Result type alias for HuffArc operations.
pub type Result<T> = std::result::Result<T, HuffArcError>;

impl HuffArcError {
    /// Create a mode mismatch error.
    pub fn mode_mismatch(expected: Mode, actual: Mode) -> Self {
        Self::ModeMismatch { expected, actual }
    }

    /// Create an unexpected end error.
    pub fn unexpected_end(bit_position: u64) -> Self {
        Self::UnexpectedEnd { bit_position }
    }

    /// Create an invalid magic error.
    pub fn invalid_magic(expected: impl Into<Vec<u8>>, found: impl Into<Vec<u8>>) -> Self {
        Self::InvalidMagic {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an unsupported version error.
    pub fn unsupported_version(version: u8) -> Self {
        Self::UnsupportedVersion { version }
    }

    /// Create a truncated tree error.
    pub fn truncated_tree(offset: usize) -> Self {
        Self::TruncatedTree { offset }
    }

    /// Create a corrupted tree error.
    pub fn corrupted_tree(offset: usize, message: impl Into<String>) -> Self {
        Self::CorruptedTree {
            offset,
            message: message.into(),
        }
    }

    /// Create an unknown symbol error.
    pub fn unknown_symbol(symbol: u8) -> Self {
        Self::UnknownSymbol { symbol }
    }

    /// Create a path too long error.
    pub fn path_too_long(length: usize, max: usize) -> Self {
        Self::PathTooLong { length, max }
    }

    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create a path traversal error.
    pub fn path_traversal(path: impl Into<String>) -> Self {
        Self::PathTraversal { path: path.into() }
    }

    /// Create an output too large error.
    pub fn output_too_large(size: u64, limit: u64) -> Self {
        Self::OutputTooLarge { size, limit }
    }

    /// Create an entry not found error.
    pub fn entry_not_found(path: impl Into<String>) -> Self {
        Self::EntryNotFound { path: path.into() }
    }
}
