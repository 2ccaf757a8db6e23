//! Where directory archive contents come from.
//!
//! [`HuffWriter::write_directory`](crate::HuffWriter::write_directory)
//! reads every file twice: once to count byte frequencies and once to
//! encode it. An [`EntrySource`] supplies those bytes by entry path.

use huffarc_core::EntryRecord;
use huffarc_core::error::{HuffArcError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Supplies the contents of file entries.
pub trait EntrySource {
    /// Read the full contents of the file at `path`.
    fn read_entry(&mut self, path: &str) -> Result<Vec<u8>>;
}

impl<S: EntrySource + ?Sized> EntrySource for &mut S {
    fn read_entry(&mut self, path: &str) -> Result<Vec<u8>> {
        (**self).read_entry(path)
    }
}

/// Reads entries from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Create a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl EntrySource for DirectorySource {
    fn read_entry(&mut self, path: &str) -> Result<Vec<u8>> {
        let full = self.root.join(path);
        fs::read(&full).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => HuffArcError::entry_not_found(path),
            _ => HuffArcError::Io(e),
        })
    }
}

/// In-memory entry source.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), data.into());
    }

    /// File records for every file, sorted by path.
    pub fn entries(&self) -> Vec<EntryRecord> {
        self.files
            .iter()
            .map(|(path, data)| EntryRecord::file(path.clone(), data.len() as u64))
            .collect()
    }
}

impl EntrySource for MemorySource {
    fn read_entry(&mut self, path: &str) -> Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| HuffArcError::entry_not_found(path))
    }
}

/// List everything under `root` as entry records.
///
/// Paths are relative to `root` and `/`-separated. Siblings are sorted by
/// name and every directory comes before its contents. Anything that is
/// neither a regular file nor a directory (symlinks, sockets) is skipped.
pub fn walk_directory(root: impl AsRef<Path>) -> Result<Vec<EntryRecord>> {
    let root = root.as_ref();
    if !fs::metadata(root)?.is_dir() {
        return Err(HuffArcError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("not a directory: {}", root.display()),
        )));
    }

    let mut entries = Vec::new();
    walk(root, "", &mut entries)?;
    debug!(root = %root.display(), entries = entries.len(), "walked directory");
    Ok(entries)
}

fn walk(dir: &Path, prefix: &str, entries: &mut Vec<EntryRecord>) -> Result<()> {
    let mut children = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    children.sort_by_key(|child| child.file_name());

    for child in children {
        let file_name = child.file_name();
        let name = file_name.to_str().ok_or_else(|| {
            HuffArcError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("file name is not valid UTF-8: {}", child.path().display()),
            ))
        })?;
        let path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", prefix, name)
        };

        let file_type = child.file_type()?;
        if file_type.is_dir() {
            entries.push(EntryRecord::directory(path.clone()));
            walk(&child.path(), &path, entries)?;
        } else if file_type.is_file() {
            let size = child.metadata()?.len();
            entries.push(EntryRecord::file(path, size));
        } else {
            debug!(path = %path, "skipping special file");
        }
    }
    Ok(())
}
