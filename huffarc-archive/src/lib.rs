//! # HuffArc Archive
//!
//! The HUFF container format.
//!
//! A HUFF archive holds either one compressed file or a whole directory
//! tree. Both kinds start with a [`ContainerHeader`] and the serialized
//! code tree; a directory archive follows it with an entry count, the
//! [`EntryRecord`]s, and one byte-aligned payload segment per file. All
//! files of a directory share the tree built from their combined byte
//! frequencies.
//!
//! ```text
//! single file:  header | tree | payload
//! directory:    header | tree | count | record... | segment...
//! ```
//!
//! ## Example
//!
//! ```rust
//! use huffarc_archive::{
//!     EntryRecord, ExtractOptions, HuffReader, HuffWriter, MemorySink, MemorySource,
//! };
//! use std::io::Cursor;
//!
//! let mut source = MemorySource::new();
//! source.insert("notes/a.txt", b"to be or not to be".to_vec());
//! source.insert("notes/b.txt", b"that is the question".to_vec());
//! let mut entries = vec![EntryRecord::directory("notes")];
//! entries.extend(source.entries());
//!
//! let mut archive = Vec::new();
//! HuffWriter::new(&mut archive)
//!     .write_directory("notes", &entries, &mut source)
//!     .unwrap();
//!
//! let reader = HuffReader::new(Cursor::new(archive)).unwrap();
//! assert_eq!(reader.entries().len(), 3);
//!
//! let mut sink = MemorySink::new();
//! reader.extract_all(&mut sink, &ExtractOptions::default()).unwrap();
//! assert_eq!(sink.get("notes/b.txt"), Some(&b"that is the question"[..]));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod header;
mod reader;
mod sink;
mod source;
mod writer;

// Re-exports
pub use header::{ArchiveKind, ContainerHeader, MAGIC, VERSION};
pub use huffarc_core::EntryRecord;
pub use reader::{DEFAULT_MAX_OUTPUT_SIZE, ExtractOptions, HuffReader};
pub use sink::{DirectorySink, EntrySink, MemorySink};
pub use source::{DirectorySource, EntrySource, MemorySource, walk_directory};
pub use writer::{ArchiveStats, HuffWriter};
