//! Where extracted contents go.

use huffarc_core::EntryRecord;
use huffarc_core::error::Result;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Receives extracted entries.
pub trait EntrySink {
    /// Create the directory described by `entry`.
    fn create_dir(&mut self, entry: &EntryRecord) -> Result<()>;

    /// Store the decoded contents of a file entry.
    fn write_file(&mut self, entry: &EntryRecord, data: &[u8]) -> Result<()>;

    /// Whether a file for `entry` already exists.
    fn exists(&self, _entry: &EntryRecord) -> bool {
        false
    }
}

impl<S: EntrySink + ?Sized> EntrySink for &mut S {
    fn create_dir(&mut self, entry: &EntryRecord) -> Result<()> {
        (**self).create_dir(entry)
    }

    fn write_file(&mut self, entry: &EntryRecord, data: &[u8]) -> Result<()> {
        (**self).write_file(entry, data)
    }

    fn exists(&self, entry: &EntryRecord) -> bool {
        (**self).exists(entry)
    }
}

/// Extracts entries below a directory on disk.
///
/// Entry paths are sanitized before being joined to the root, so nothing
/// is ever written outside it.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    /// Create a sink rooted at `root`. The directory is created on demand.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn target(&self, entry: &EntryRecord) -> PathBuf {
        self.root.join(entry.sanitized_path())
    }
}

impl EntrySink for DirectorySink {
    fn create_dir(&mut self, entry: &EntryRecord) -> Result<()> {
        let target = self.target(entry);
        fs::create_dir_all(&target)?;
        debug!(path = %target.display(), "created directory");
        Ok(())
    }

    fn write_file(&mut self, entry: &EntryRecord, data: &[u8]) -> Result<()> {
        let target = self.target(entry);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, data)?;
        debug!(path = %target.display(), bytes = data.len(), "wrote file");
        Ok(())
    }

    fn exists(&self, entry: &EntryRecord) -> bool {
        self.target(entry).is_file()
    }
}

/// Collects extracted entries in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// Extracted files by path.
    pub files: BTreeMap<String, Vec<u8>>,
    /// Extracted directories.
    pub dirs: BTreeSet<String>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of the file at `path`.
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }
}

impl EntrySink for MemorySink {
    fn create_dir(&mut self, entry: &EntryRecord) -> Result<()> {
        self.dirs.insert(entry.path.clone());
        Ok(())
    }

    fn write_file(&mut self, entry: &EntryRecord, data: &[u8]) -> Result<()> {
        self.files.insert(entry.path.clone(), data.to_vec());
        Ok(())
    }

    fn exists(&self, entry: &EntryRecord) -> bool {
        self.files.contains_key(&entry.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_sink_writes_nested() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path().join("out"));

        let entry = EntryRecord::file("a/b/c.txt", 3);
        assert!(!sink.exists(&entry));
        sink.write_file(&entry, b"abc").unwrap();
        assert!(sink.exists(&entry));
        assert_eq!(fs::read(dir.path().join("out/a/b/c.txt")).unwrap(), b"abc");

        sink.create_dir(&EntryRecord::directory("empty")).unwrap();
        assert!(dir.path().join("out/empty").is_dir());
    }

    #[test]
    fn test_directory_sink_sanitizes() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("out");
        let mut sink = DirectorySink::new(&root);

        sink.write_file(&EntryRecord::file("../escape.txt", 1), b"x")
            .unwrap();
        assert!(root.join("escape.txt").is_file());
        assert!(!dir.path().join("escape.txt").exists());
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::new();
        sink.create_dir(&EntryRecord::directory("d")).unwrap();
        sink.write_file(&EntryRecord::file("d/f", 2), b"hi").unwrap();

        assert!(sink.dirs.contains("d"));
        assert_eq!(sink.get("d/f"), Some(&b"hi"[..]));
        assert!(sink.exists(&EntryRecord::file("d/f", 2)));
        assert_eq!(sink.get("nope"), None);
    }
}
