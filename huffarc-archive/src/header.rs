//! HUFF container header.
//!
//! Every archive starts with a fixed-width header followed by the archive
//! name. All integers are little-endian.
//!
//! ```text
//! offset  size  field
//!      0     4  magic "HUFF"
//!      4     1  version
//!      5     8  original size (sum of file sizes for directories)
//!     13     4  serialized tree size
//!     17     4  data size (reserved, always 0)
//!     21     1  kind: 0 = file, 1 = directory
//!     22     2  name length
//!     24     n  name (UTF-8)
//!   24+n     2  reserved (0)
//! ```

use huffarc_core::MAX_PATH_LEN;
use huffarc_core::error::{HuffArcError, Result};
use std::fmt;
use std::io::{self, Read, Write};
use tracing::trace;

/// HUFF magic bytes.
pub const MAGIC: [u8; 4] = *b"HUFF";

/// Current format version.
pub const VERSION: u8 = 1;

/// Size of the header without the name.
pub const HEADER_FIXED_LEN: usize = 4 + 1 + 8 + 4 + 4 + 1 + 2 + 2;

/// What an archive holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// A single compressed file.
    File,
    /// A directory tree sharing one code tree.
    Directory,
}

impl ArchiveKind {
    fn to_byte(self) -> u8 {
        match self {
            ArchiveKind::File => 0,
            ArchiveKind::Directory => 1,
        }
    }

    fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0 => Ok(ArchiveKind::File),
            1 => Ok(ArchiveKind::Directory),
            other => Err(HuffArcError::invalid_header(format!(
                "unknown archive kind {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveKind::File => write!(f, "file"),
            ArchiveKind::Directory => write!(f, "directory"),
        }
    }
}

/// Container header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Format version.
    pub version: u8,
    /// Total number of uncompressed bytes.
    pub original_size: u64,
    /// Length of the serialized tree following the header.
    pub tree_size: u32,
    /// Reserved.
    pub data_size: u32,
    /// Archive kind.
    pub kind: ArchiveKind,
    /// Original file or directory name.
    pub name: String,
}

impl ContainerHeader {
    /// Create a header for the current format version.
    pub fn new(
        kind: ArchiveKind,
        name: impl Into<String>,
        original_size: u64,
        tree_size: u32,
    ) -> Self {
        Self {
            version: VERSION,
            original_size,
            tree_size,
            data_size: 0,
            kind,
            name: name.into(),
        }
    }

    /// Whether this header describes a directory archive.
    pub fn is_directory(&self) -> bool {
        self.kind == ArchiveKind::Directory
    }

    /// Number of bytes the header occupies when written.
    pub fn encoded_len(&self) -> usize {
        HEADER_FIXED_LEN + self.name.len()
    }

    /// Write the header.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        let name = self.name.as_bytes();
        if name.len() > MAX_PATH_LEN {
            return Err(HuffArcError::path_too_long(name.len(), MAX_PATH_LEN));
        }

        writer.write_all(&MAGIC)?;
        writer.write_all(&[self.version])?;
        writer.write_all(&self.original_size.to_le_bytes())?;
        writer.write_all(&self.tree_size.to_le_bytes())?;
        writer.write_all(&self.data_size.to_le_bytes())?;
        writer.write_all(&[self.kind.to_byte()])?;
        writer.write_all(&(name.len() as u16).to_le_bytes())?;
        writer.write_all(name)?;
        writer.write_all(&0u16.to_le_bytes())?;
        Ok(())
    }

    /// Read a header.
    ///
    /// The magic is checked before any other field is read. Input that is
    /// empty or does not start like `HUFF` is reported as `InvalidMagic`;
    /// only a cut-off `HUFF` prefix is an I/O error.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = Vec::with_capacity(MAGIC.len());
        reader.by_ref().take(MAGIC.len() as u64).read_to_end(&mut magic)?;
        if magic.is_empty() || !MAGIC.starts_with(&magic) {
            return Err(HuffArcError::invalid_magic(MAGIC.to_vec(), magic));
        }
        if magic.len() < MAGIC.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "archive ends inside the magic bytes",
            )
            .into());
        }

        let mut version = [0u8; 1];
        reader.read_exact(&mut version)?;
        if version[0] != VERSION {
            return Err(HuffArcError::unsupported_version(version[0]));
        }

        let mut buf = [0u8; 19];
        reader.read_exact(&mut buf)?;
        let original_size = u64::from_le_bytes([
            buf[0], buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7],
        ]);
        let tree_size = u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
        let data_size = u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]);
        let kind = ArchiveKind::from_byte(buf[16])?;
        let name_len = u16::from_le_bytes([buf[17], buf[18]]) as usize;

        let mut name = vec![0u8; name_len];
        reader.read_exact(&mut name)?;
        let name = String::from_utf8(name)
            .map_err(|_| HuffArcError::invalid_header("archive name is not valid UTF-8"))?;

        let mut reserved = [0u8; 2];
        reader.read_exact(&mut reserved)?;

        trace!(
            version = version[0],
            original_size,
            tree_size,
            data_size,
            %kind,
            name = %name,
            "read container header"
        );

        Ok(Self {
            version: version[0],
            original_size,
            tree_size,
            data_size,
            kind,
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_header_layout() {
        let header = ContainerHeader::new(ArchiveKind::File, "a.txt", 10, 8);
        let mut buf = Vec::new();
        header.write(&mut buf).unwrap();

        assert_eq!(buf.len(), header.encoded_len());
        assert_eq!(&buf[0..4], b"HUFF");
        assert_eq!(buf[4], 1);
        assert_eq!(&buf[5..13], &[10, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&buf[13..17], &[8, 0, 0, 0]);
        assert_eq!(&buf[17..21], &[0, 0, 0, 0]);
        assert_eq!(buf[21], 0);
        assert_eq!(&buf[22..24], &[5, 0]);
        assert_eq!(&buf[24..29], b"a.txt");
        assert_eq!(&buf[29..31], &[0, 0]);

        let parsed = ContainerHeader::read(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_directory_kind() {
        let header = ContainerHeader::new(ArchiveKind::Directory, "docs", 123, 40);
        let mut buf = Vec::new();
        header.write(&mut buf).unwrap();
        assert_eq!(buf[21], 1);

        let parsed = ContainerHeader::read(&mut Cursor::new(&buf)).unwrap();
        assert!(parsed.is_directory());
        assert_eq!(parsed.kind.to_string(), "directory");
    }

    #[test]
    fn test_invalid_magic_checked_first() {
        // Only the four magic bytes are present
        let result = ContainerHeader::read(&mut Cursor::new(b"PK\x03\x04"));
        match result {
            Err(HuffArcError::InvalidMagic { expected, found }) => {
                assert_eq!(expected, b"HUFF");
                assert_eq!(found, b"PK\x03\x04");
            }
            other => panic!("expected InvalidMagic, got {:?}", other),
        }
    }

    #[test]
    fn test_short_input_is_invalid_magic() {
        let inputs: [&[u8]; 4] = [b"", b"PK", b"H", b"HUX"];
        for input in inputs {
            match ContainerHeader::read(&mut Cursor::new(input)) {
                Err(HuffArcError::InvalidMagic { found, .. }) => assert_eq!(found, input),
                other => panic!("expected InvalidMagic for {:?}, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_truncated_magic_prefix_is_io_error() {
        let result = ContainerHeader::read(&mut Cursor::new(b"HU"));
        match result {
            Err(HuffArcError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("expected Io(UnexpectedEof), got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_version() {
        let mut buf = Vec::new();
        ContainerHeader::new(ArchiveKind::File, "x", 1, 2)
            .write(&mut buf)
            .unwrap();
        buf[4] = 2;
        assert!(matches!(
            ContainerHeader::read(&mut Cursor::new(&buf)),
            Err(HuffArcError::UnsupportedVersion { version: 2 })
        ));
    }

    #[test]
    fn test_unknown_kind() {
        let mut buf = Vec::new();
        ContainerHeader::new(ArchiveKind::File, "x", 1, 2)
            .write(&mut buf)
            .unwrap();
        buf[21] = 9;
        assert!(matches!(
            ContainerHeader::read(&mut Cursor::new(&buf)),
            Err(HuffArcError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_name_too_long() {
        let name = "n".repeat(MAX_PATH_LEN + 1);
        let header = ContainerHeader::new(ArchiveKind::File, name, 1, 2);
        assert!(matches!(
            header.write(&mut Vec::new()),
            Err(HuffArcError::PathTooLong { .. })
        ));
    }

    #[test]
    fn test_truncated_header() {
        let mut buf = Vec::new();
        ContainerHeader::new(ArchiveKind::File, "name", 1, 2)
            .write(&mut buf)
            .unwrap();
        buf.truncate(20);
        assert!(matches!(
            ContainerHeader::read(&mut Cursor::new(&buf)),
            Err(HuffArcError::Io(_))
        ));
    }
}
