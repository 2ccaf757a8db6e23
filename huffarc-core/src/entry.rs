//! Directory archive entry records.
//!
//! An `EntryRecord` describes one file or directory inside a directory
//! archive. Records are self-delimiting on the wire:
//!
//! ```text
//! +-------------+------------+--------------+-----------------+----------+
//! | path length | path bytes | original size| compressed size | dir flag |
//! |   u16 LE    |  (UTF-8)   |    u64 LE    |     u64 LE      |    u8    |
//! +-------------+------------+--------------+-----------------+----------+
//! ```

use crate::error::{HuffArcError, Result};
use std::io::{Read, Write};
use std::path::{Component, Path, PathBuf};

/// Maximum path length representable in a record or header.
pub const MAX_PATH_LEN: usize = u16::MAX as usize;

/// Size of the fixed-width part of a record (everything but the path).
pub const RECORD_FIXED_LEN: usize = 2 + 8 + 8 + 1;

/// Metadata for one object in a directory archive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntryRecord {
    /// Path relative to the archived directory, `/`-separated.
    pub path: String,
    /// Original (uncompressed) size in bytes.
    pub size: u64,
    /// Size of this entry's payload segment in bytes.
    pub compressed_size: u64,
    /// Whether this entry is a directory.
    pub is_dir: bool,
}

impl EntryRecord {
    /// Create a record for a regular file.
    pub fn file(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
            compressed_size: 0,
            is_dir: false,
        }
    }

    /// Create a record for a directory.
    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            size: 0,
            compressed_size: 0,
            is_dir: true,
        }
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        !self.is_dir
    }

    /// Compressed size as a percentage of the original size.
    pub fn compression_ratio(&self) -> f64 {
        if self.size == 0 {
            return 0.0;
        }
        (self.compressed_size as f64 / self.size as f64) * 100.0
    }

    /// Number of bytes this record occupies when written.
    pub fn encoded_len(&self) -> usize {
        RECORD_FIXED_LEN + self.path.len()
    }

    /// Get the path with traversal components removed.
    ///
    /// Root prefixes, `.` and `..` components are dropped so the result can
    /// always be joined under an extraction directory.
    pub fn sanitized_path(&self) -> PathBuf {
        let mut result = PathBuf::new();
        for component in Path::new(&self.path).components() {
            if let Component::Normal(part) = component {
                result.push(part);
            }
        }
        result
    }

    /// Reject absolute paths and `..` components.
    pub fn validate_path(&self) -> Result<()> {
        let path = Path::new(&self.path);
        let unsafe_component = path.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if unsafe_component || self.path.starts_with('/') || self.path.starts_with('\\') {
            return Err(HuffArcError::path_traversal(&self.path));
        }
        Ok(())
    }

    /// Write the record.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        let path = self.path.as_bytes();
        if path.len() > MAX_PATH_LEN {
            return Err(HuffArcError::path_too_long(path.len(), MAX_PATH_LEN));
        }

        writer.write_all(&(path.len() as u16).to_le_bytes())?;
        writer.write_all(path)?;
        writer.write_all(&self.size.to_le_bytes())?;
        writer.write_all(&self.compressed_size.to_le_bytes())?;
        writer.write_all(&[self.is_dir as u8])?;
        Ok(())
    }

    /// Read a record.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut len_buf = [0u8; 2];
        reader.read_exact(&mut len_buf)?;
        let path_len = u16::from_le_bytes(len_buf) as usize;

        let mut path = vec![0u8; path_len];
        reader.read_exact(&mut path)?;
        let path = String::from_utf8(path)
            .map_err(|_| HuffArcError::invalid_header("entry path is not valid UTF-8"))?;

        let mut buf = [0u8; 17];
        reader.read_exact(&mut buf)?;
        let size = u64::from_le_bytes([
            buf[0], buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7],
        ]);
        let compressed_size = u64::from_le_bytes([
            buf[8], buf[9], buf[10], buf[11], buf[12], buf[13], buf[14], buf[15],
        ]);
        let is_dir = match buf[16] {
            0 => false,
            1 => true,
            flag => {
                return Err(HuffArcError::invalid_header(format!(
                    "invalid directory flag {} for entry {}",
                    flag, path
                )));
            }
        };

        Ok(Self {
            path,
            size,
            compressed_size,
            is_dir,
        })
    }
}
