//! Utility functions for the CLI.

use huffarc_archive::{ArchiveStats, EntryRecord, EntrySink, EntrySource};
use huffarc_core::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Create a progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░ ");
    pb.set_style(style);
    pb
}

/// File name of `path` as UTF-8, used as the archive name.
pub fn archive_name(path: &Path) -> std::result::Result<String, Box<dyn std::error::Error>> {
    let resolved;
    let name = match path.file_name() {
        Some(name) => name,
        None => {
            resolved = path.canonicalize()?;
            resolved
                .file_name()
                .ok_or_else(|| format!("cannot determine a name for {}", path.display()))?
        }
    };
    let name = name
        .to_str()
        .ok_or_else(|| format!("name is not valid UTF-8: {}", path.display()))?;
    Ok(name.to_string())
}

/// Absolute form of an output path that may not exist yet.
pub fn resolve_output_path(
    path: &Path,
) -> std::result::Result<PathBuf, Box<dyn std::error::Error>> {
    let file_name = path
        .file_name()
        .ok_or_else(|| format!("output is not a file path: {}", path.display()))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok(parent.canonicalize()?.join(file_name))
}

/// Print compression statistics.
pub fn print_stats(stats: &ArchiveStats, elapsed: Duration) {
    println!("Entries: {}", stats.entry_count);
    println!("Original size: {} bytes", stats.original_size);
    println!("Compressed size: {} bytes", stats.archive_size);
    println!("Compression ratio: {:.2}%", stats.compression_ratio());
    println!("Space saving: {:.2}%", stats.space_saving());
    println!("Time: {:.3} s", elapsed.as_secs_f64());
}

/// Print entries in a formatted table.
pub fn print_entries(entries: &[EntryRecord]) {
    println!("{:>10} {:>10} {:>7}  Name", "Size", "Compressed", "Ratio");
    println!("{}", "-".repeat(50));

    let mut total_size = 0u64;
    let mut total_compressed = 0u64;
    let mut files = 0usize;

    for entry in entries {
        let ratio = if entry.size > 0 {
            format!("{:.1}%", entry.compression_ratio())
        } else {
            "-".to_string()
        };
        let type_prefix = if entry.is_dir { "d " } else { "  " };

        println!(
            "{:>10} {:>10} {:>7}  {}{}",
            entry.size, entry.compressed_size, ratio, type_prefix, entry.path
        );

        if entry.is_file() {
            files += 1;
            total_size += entry.size;
            total_compressed += entry.compressed_size;
        }
    }

    println!("{}", "-".repeat(50));
    let total_ratio = if total_size > 0 {
        total_compressed as f64 / total_size as f64 * 100.0
    } else {
        0.0
    };
    println!(
        "{:>10} {:>10} {:>6.1}%  {} files",
        total_size, total_compressed, total_ratio, files
    );
}

/// Printable form of a byte for code table listings.
pub fn display_symbol(symbol: u8) -> String {
    if symbol.is_ascii_graphic() {
        format!("'{}'", symbol as char)
    } else {
        format!("0x{:02X}", symbol)
    }
}

/// Entry source that advances a progress bar on every read.
pub struct ProgressSource<S> {
    inner: S,
    bar: ProgressBar,
}

impl<S> ProgressSource<S> {
    pub fn new(inner: S, bar: ProgressBar) -> Self {
        Self { inner, bar }
    }
}

impl<S: EntrySource> EntrySource for ProgressSource<S> {
    fn read_entry(&mut self, path: &str) -> Result<Vec<u8>> {
        self.bar.set_message(path.to_string());
        let data = self.inner.read_entry(path)?;
        self.bar.inc(1);
        Ok(data)
    }
}

/// Entry sink that advances a progress bar on every file.
pub struct ProgressSink<S> {
    inner: S,
    bar: ProgressBar,
}

impl<S> ProgressSink<S> {
    pub fn new(inner: S, bar: ProgressBar) -> Self {
        Self { inner, bar }
    }
}

impl<S: EntrySink> EntrySink for ProgressSink<S> {
    fn create_dir(&mut self, entry: &EntryRecord) -> Result<()> {
        self.inner.create_dir(entry)
    }

    fn write_file(&mut self, entry: &EntryRecord, data: &[u8]) -> Result<()> {
        self.bar.set_message(entry.path.clone());
        self.inner.write_file(entry, data)?;
        self.bar.inc(1);
        Ok(())
    }

    fn exists(&self, entry: &EntryRecord) -> bool {
        self.inner.exists(entry)
    }
}
