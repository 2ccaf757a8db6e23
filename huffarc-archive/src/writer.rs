//! Archive writer.

use crate::header::{ArchiveKind, ContainerHeader};
use crate::source::EntrySource;
use huffarc_core::error::{HuffArcError, Result};
use huffarc_core::{BitWriter, EntryRecord};
use huffarc_huffman::{FrequencyTable, HuffmanEncoder};
use std::io::{self, Write};
use tracing::debug;

/// Summary of a finished archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArchiveStats {
    /// Total uncompressed bytes.
    pub original_size: u64,
    /// Bytes written to the archive, header included.
    pub archive_size: u64,
    /// Number of entries (1 for a single-file archive).
    pub entry_count: usize,
    /// Serialized tree size.
    pub tree_size: usize,
}

impl ArchiveStats {
    /// Archive size as a percentage of the original size.
    pub fn compression_ratio(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (self.archive_size as f64 / self.original_size as f64) * 100.0
    }

    /// Percentage of the original size saved (negative if the archive grew).
    pub fn space_saving(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        100.0 - self.compression_ratio()
    }
}

/// Writes HUFF archives.
///
/// One writer produces one archive; the sink is written front to back and
/// never seeked.
#[derive(Debug)]
pub struct HuffWriter<W: Write> {
    writer: W,
    written: u64,
}

impl<W: Write> HuffWriter<W> {
    /// Create a writer over `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Get a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Unwrap the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn put(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.written += bytes.len() as u64;
        Ok(())
    }

    fn put_header(&mut self, header: &ContainerHeader) -> Result<()> {
        header.write(&mut self.writer)?;
        self.written += header.encoded_len() as u64;
        Ok(())
    }

    fn put_payload(&mut self, encoder: &HuffmanEncoder, data: &[u8]) -> Result<u64> {
        let bytes = {
            let mut bits = BitWriter::new(&mut self.writer);
            encoder.encode(data, &mut bits)?;
            bits.finish()?
        };
        self.written += bytes;
        Ok(bytes)
    }

    /// Write a single-file archive for `data` stored under `name`.
    ///
    /// Fails with [`HuffArcError::EmptyInput`] if `data` is empty.
    pub fn write_file(&mut self, name: &str, data: &[u8]) -> Result<ArchiveStats> {
        let start = self.written;
        let encoder = HuffmanEncoder::from_data(data)?;
        let tree = encoder.serialized_tree();

        let header = ContainerHeader::new(
            ArchiveKind::File,
            name,
            data.len() as u64,
            tree.len() as u32,
        );
        self.put_header(&header)?;
        self.put(&tree)?;
        let payload = self.put_payload(&encoder, data)?;
        self.writer.flush()?;

        debug!(
            archive = name,
            original = data.len(),
            symbols = encoder.tree().leaf_count(),
            tree = tree.len(),
            payload,
            "wrote single-file archive"
        );

        Ok(ArchiveStats {
            original_size: data.len() as u64,
            archive_size: self.written - start,
            entry_count: 1,
            tree_size: tree.len(),
        })
    }

    /// Write a directory archive holding `entries`, reading file contents
    /// from `source`.
    ///
    /// Sizes in `entries` are ignored; the bytes `source` returns are what
    /// gets stored. Each file is read twice, so its contents must not change
    /// while the archive is written.
    pub fn write_directory<S: EntrySource>(
        &mut self,
        name: &str,
        entries: &[EntryRecord],
        source: &mut S,
    ) -> Result<ArchiveStats> {
        let start = self.written;
        let count = u32::try_from(entries.len()).map_err(|_| {
            HuffArcError::invalid_header(format!("too many entries: {}", entries.len()))
        })?;

        // First pass: per-file and combined frequencies
        let mut records = entries.to_vec();
        let mut combined = FrequencyTable::new();
        let mut per_file = Vec::with_capacity(records.len());
        let mut original_size = 0u64;
        for record in &mut records {
            record.validate_path()?;
            record.compressed_size = 0;
            if record.is_dir {
                record.size = 0;
                per_file.push(None);
                continue;
            }
            let data = source.read_entry(&record.path)?;
            record.size = data.len() as u64;
            original_size += record.size;
            let frequencies = FrequencyTable::count(&data);
            combined.merge(&frequencies);
            per_file.push(Some(frequencies));
        }

        let encoder = if combined.is_empty() {
            None
        } else {
            Some(HuffmanEncoder::new(&combined)?)
        };
        if let Some(encoder) = &encoder {
            for (record, frequencies) in records.iter_mut().zip(&per_file) {
                if let Some(frequencies) = frequencies {
                    record.compressed_size = encoder.encoded_bits(frequencies)?.div_ceil(8);
                }
            }
        }
        let tree = encoder
            .as_ref()
            .map(HuffmanEncoder::serialized_tree)
            .unwrap_or_default();

        let header = ContainerHeader::new(
            ArchiveKind::Directory,
            name,
            original_size,
            tree.len() as u32,
        );
        self.put_header(&header)?;
        self.put(&tree)?;
        self.put(&count.to_le_bytes())?;
        for record in &records {
            record.write(&mut self.writer)?;
            self.written += record.encoded_len() as u64;
        }

        // Second pass: one byte-aligned segment per non-empty file
        if let Some(encoder) = &encoder {
            for record in records.iter().filter(|r| r.is_file() && r.size > 0) {
                let data = source.read_entry(&record.path)?;
                if data.len() as u64 != record.size {
                    return Err(changed_while_archiving(&record.path));
                }
                let payload = self.put_payload(encoder, &data)?;
                if payload != record.compressed_size {
                    return Err(changed_while_archiving(&record.path));
                }
                debug!(
                    path = %record.path,
                    size = record.size,
                    compressed = payload,
                    "encoded entry"
                );
            }
        }
        self.writer.flush()?;

        debug!(
            archive = name,
            entries = records.len(),
            original = original_size,
            symbols = combined.distinct(),
            tree = tree.len(),
            "wrote directory archive"
        );

        Ok(ArchiveStats {
            original_size,
            archive_size: self.written - start,
            entry_count: records.len(),
            tree_size: tree.len(),
        })
    }
}

fn changed_while_archiving(path: &str) -> HuffArcError {
    HuffArcError::Io(io::Error::other(format!(
        "{} changed while being archived",
        path
    )))
}
