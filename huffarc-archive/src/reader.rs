//! Archive reader.

use crate::header::ContainerHeader;
use crate::sink::EntrySink;
use huffarc_core::error::{HuffArcError, Result};
use huffarc_core::{BitReader, EntryRecord};
use huffarc_huffman::serialize::MAX_SERIALIZED_LEN;
use huffarc_huffman::{CodeTree, HuffmanDecoder};
use std::io::{self, Read, Write};
use tracing::debug;

/// Default cap on the total decompressed size (16 GiB).
pub const DEFAULT_MAX_OUTPUT_SIZE: u64 = 16 * 1024 * 1024 * 1024;

/// Options for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Replace files that already exist in the sink.
    pub overwrite: bool,
    /// Refuse archives whose declared size exceeds this many bytes.
    pub max_output_size: u64,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            max_output_size: DEFAULT_MAX_OUTPUT_SIZE,
        }
    }
}

/// Reads HUFF archives.
///
/// `new` parses everything ahead of the payload: header, code tree and, for
/// directory archives, the entry records. The payload is then consumed once
/// by [`read_file`](Self::read_file), [`extract_all`](Self::extract_all) or
/// [`verify`](Self::verify).
#[derive(Debug)]
pub struct HuffReader<R: Read> {
    reader: R,
    header: ContainerHeader,
    decoder: Option<HuffmanDecoder>,
    entries: Vec<EntryRecord>,
}

impl<R: Read> HuffReader<R> {
    /// Open an archive.
    pub fn new(mut reader: R) -> Result<Self> {
        let header = ContainerHeader::read(&mut reader)?;
        let decoder = read_tree(&mut reader, header.tree_size)?;

        if decoder.is_none() && (!header.is_directory() || header.original_size > 0) {
            return Err(HuffArcError::invalid_header(format!(
                "{} archive of {} bytes has no code tree",
                header.kind, header.original_size
            )));
        }

        let entries = if header.is_directory() {
            read_entries(&mut reader, &header)?
        } else {
            Vec::new()
        };

        debug!(
            kind = %header.kind,
            name = %header.name,
            original = header.original_size,
            entries = entries.len(),
            "opened archive"
        );

        Ok(Self {
            reader,
            header,
            decoder,
            entries,
        })
    }

    /// The container header.
    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    /// Entry records (empty for single-file archives).
    pub fn entries(&self) -> &[EntryRecord] {
        &self.entries
    }

    /// The code tree, absent for directory archives without file bytes.
    pub fn tree(&self) -> Option<&CodeTree> {
        self.decoder.as_ref().map(HuffmanDecoder::tree)
    }

    /// Whether this is a directory archive.
    pub fn is_directory(&self) -> bool {
        self.header.is_directory()
    }

    /// Decode a single-file archive into memory.
    ///
    /// The default output limit applies.
    pub fn read_file(self) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        self.decode_to(&mut data)?;
        Ok(data)
    }

    /// Stream the payload of a single-file archive into `out`, returning the
    /// number of bytes written.
    ///
    /// The default output limit applies.
    pub fn decode_to<W: Write>(mut self, out: &mut W) -> Result<u64> {
        if self.is_directory() {
            return Err(HuffArcError::invalid_header(
                "directory archives must be extracted entry by entry",
            ));
        }
        check_limit(self.header.original_size, DEFAULT_MAX_OUTPUT_SIZE)?;
        let decoder = self
            .decoder
            .as_ref()
            .ok_or_else(|| HuffArcError::invalid_header("archive has no code tree"))?;

        let mut bits = BitReader::new(&mut self.reader);
        decoder.decode_into(&mut bits, self.header.original_size, out)?;
        out.flush()?;
        Ok(self.header.original_size)
    }

    /// Decode every entry into `sink`, returning the number of bytes
    /// produced.
    ///
    /// A single-file archive yields one file entry named after the header.
    /// The declared size is checked against `options.max_output_size` before
    /// any payload is decoded.
    pub fn extract_all<S: EntrySink>(
        self,
        sink: &mut S,
        options: &ExtractOptions,
    ) -> Result<u64> {
        check_limit(self.header.original_size, options.max_output_size)?;

        let Self {
            mut reader,
            header,
            decoder,
            entries,
        } = self;

        if !header.is_directory() {
            let entry = EntryRecord::file(header.name.clone(), header.original_size);
            entry.validate_path()?;
            if entry.sanitized_path().as_os_str().is_empty() {
                return Err(HuffArcError::invalid_header(
                    "archive has an empty file name",
                ));
            }
            check_overwrite(sink, &entry, options)?;

            let decoder = decoder
                .as_ref()
                .ok_or_else(|| HuffArcError::invalid_header("archive has no code tree"))?;
            let mut bits = BitReader::new(&mut reader);
            let data = decoder.decode(&mut bits, to_usize(entry.size)?)?;
            sink.write_file(&entry, &data)?;
            return Ok(entry.size);
        }

        let mut total = 0u64;
        for entry in &entries {
            if entry.is_dir {
                sink.create_dir(entry)?;
                continue;
            }
            check_overwrite(sink, entry, options)?;

            let data = decode_segment(&mut reader, decoder.as_ref(), entry)?;
            sink.write_file(entry, &data)?;
            total += entry.size;
            debug!(path = %entry.path, size = entry.size, "extracted entry");
        }
        Ok(total)
    }

    /// Decode the whole payload without storing it, returning the number of
    /// bytes that would be produced.
    pub fn verify(self) -> Result<u64> {
        let options = ExtractOptions {
            overwrite: true,
            ..ExtractOptions::default()
        };
        let mut sink = CountingSink::default();
        self.extract_all(&mut sink, &options)?;
        Ok(sink.bytes)
    }
}

fn read_tree<R: Read>(reader: &mut R, tree_size: u32) -> Result<Option<HuffmanDecoder>> {
    let size = tree_size as usize;
    if size == 0 {
        return Ok(None);
    }
    if size > MAX_SERIALIZED_LEN {
        return Err(HuffArcError::corrupted_tree(
            0,
            format!(
                "declared tree size {} exceeds maximum of {}",
                size, MAX_SERIALIZED_LEN
            ),
        ));
    }

    let mut bytes = Vec::with_capacity(size);
    reader.take(size as u64).read_to_end(&mut bytes)?;
    if bytes.len() < size {
        return Err(HuffArcError::truncated_tree(bytes.len()));
    }
    HuffmanDecoder::from_serialized(&bytes).map(Some)
}

fn read_entries<R: Read>(reader: &mut R, header: &ContainerHeader) -> Result<Vec<EntryRecord>> {
    let mut count = [0u8; 4];
    reader.read_exact(&mut count)?;
    let count = u32::from_le_bytes(count) as usize;

    let mut entries = Vec::with_capacity(count.min(4096));
    let mut total = 0u64;
    for _ in 0..count {
        let entry = EntryRecord::read(reader)?;
        entry.validate_path()?;
        if entry.is_dir && (entry.size != 0 || entry.compressed_size != 0) {
            return Err(HuffArcError::invalid_header(format!(
                "directory entry {} has a payload",
                entry.path
            )));
        }
        total = total.checked_add(entry.size).ok_or_else(|| {
            HuffArcError::invalid_header("entry sizes overflow a 64-bit total")
        })?;
        entries.push(entry);
    }

    if total != header.original_size {
        return Err(HuffArcError::invalid_header(format!(
            "entry sizes sum to {} but header declares {}",
            total, header.original_size
        )));
    }
    Ok(entries)
}

fn decode_segment<R: Read>(
    reader: &mut R,
    decoder: Option<&HuffmanDecoder>,
    entry: &EntryRecord,
) -> Result<Vec<u8>> {
    let mut segment = reader.take(entry.compressed_size);
    let data = if entry.size == 0 {
        Vec::new()
    } else {
        let decoder = decoder
            .ok_or_else(|| HuffArcError::invalid_header("archive has no code tree"))?;
        let mut bits = BitReader::new(&mut segment);
        decoder.decode(&mut bits, to_usize(entry.size)?)?
    };
    // Skip whatever the decoder left of the segment
    io::copy(&mut segment, &mut io::sink())?;
    Ok(data)
}

fn check_limit(size: u64, limit: u64) -> Result<()> {
    if size > limit {
        return Err(HuffArcError::output_too_large(size, limit));
    }
    Ok(())
}

fn to_usize(size: u64) -> Result<usize> {
    usize::try_from(size).map_err(|_| HuffArcError::output_too_large(size, usize::MAX as u64))
}

fn check_overwrite<S: EntrySink>(
    sink: &S,
    entry: &EntryRecord,
    options: &ExtractOptions,
) -> Result<()> {
    if !options.overwrite && sink.exists(entry) {
        return Err(HuffArcError::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", entry.path),
        )));
    }
    Ok(())
}

#[derive(Debug, Default)]
struct CountingSink {
    bytes: u64,
}

impl EntrySink for CountingSink {
    fn create_dir(&mut self, _entry: &EntryRecord) -> Result<()> {
        Ok(())
    }

    fn write_file(&mut self, _entry: &EntryRecord, data: &[u8]) -> Result<()> {
        self.bytes += data.len() as u64;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::ArchiveKind;
    use crate::sink::MemorySink;
    use crate::source::MemorySource;
    use crate::writer::HuffWriter;
    use std::io::Cursor;

    fn file_archive(name: &str, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        HuffWriter::new(&mut out).write_file(name, data).unwrap();
        out
    }

    fn sample_directory() -> Vec<u8> {
        let mut source = MemorySource::new();
        source.insert("docs/a.txt", b"hello huffman".to_vec());
        source.insert("docs/empty", Vec::new());
        source.insert("z.bin", vec![0u8, 1, 2, 3, 255, 255, 255]);
        let mut entries = vec![EntryRecord::directory("docs")];
        entries.extend(source.entries());

        let mut out = Vec::new();
        HuffWriter::new(&mut out)
            .write_directory("root", &entries, &mut source)
            .unwrap();
        out
    }

    #[test]
    fn test_read_file_roundtrip() {
        let archive = file_archive("x.txt", b"AAAAABBBCC");
        let reader = HuffReader::new(Cursor::new(&archive)).unwrap();
        assert_eq!(reader.header().name, "x.txt");
        assert_eq!(reader.header().kind, ArchiveKind::File);
        assert_eq!(reader.tree().unwrap().leaf_count(), 3);
        assert!(reader.entries().is_empty());
        assert_eq!(reader.read_file().unwrap(), b"AAAAABBBCC");
    }

    #[test]
    fn test_extract_single_file() {
        let archive = file_archive("x.txt", b"data data data");
        let mut sink = MemorySink::new();
        let bytes = HuffReader::new(Cursor::new(&archive))
            .unwrap()
            .extract_all(&mut sink, &ExtractOptions::default())
            .unwrap();
        assert_eq!(bytes, 14);
        assert_eq!(sink.get("x.txt"), Some(&b"data data data"[..]));
    }

    #[test]
    fn test_extract_directory() {
        let archive = sample_directory();
        let reader = HuffReader::new(Cursor::new(&archive)).unwrap();
        assert!(reader.is_directory());
        assert_eq!(reader.entries().len(), 4);
        assert_eq!(reader.header().original_size, 20);

        let mut sink = MemorySink::new();
        let bytes = reader
            .extract_all(&mut sink, &ExtractOptions::default())
            .unwrap();
        assert_eq!(bytes, 20);
        assert!(sink.dirs.contains("docs"));
        assert_eq!(sink.get("docs/a.txt"), Some(&b"hello huffman"[..]));
        assert_eq!(sink.get("docs/empty"), Some(&b""[..]));
        assert_eq!(sink.get("z.bin"), Some(&[0u8, 1, 2, 3, 255, 255, 255][..]));
    }

    #[test]
    fn test_decode_to_streams_payload() {
        let text = b"streaming through a writer, chunk by chunk. ".repeat(2000);
        let archive = file_archive("s.txt", &text);
        let mut out = Cursor::new(Vec::new());
        let bytes = HuffReader::new(Cursor::new(&archive))
            .unwrap()
            .decode_to(&mut out)
            .unwrap();
        assert_eq!(bytes, text.len() as u64);
        assert_eq!(out.into_inner(), text);

        let reader = HuffReader::new(Cursor::new(sample_directory())).unwrap();
        assert!(matches!(
            reader.decode_to(&mut Vec::new()),
            Err(HuffArcError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_read_file_rejects_directory() {
        let reader = HuffReader::new(Cursor::new(sample_directory())).unwrap();
        assert!(matches!(
            reader.read_file(),
            Err(HuffArcError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_output_limit() {
        let archive = file_archive("big", &[7u8; 1000]);
        let options = ExtractOptions {
            max_output_size: 999,
            ..ExtractOptions::default()
        };
        let result = HuffReader::new(Cursor::new(&archive))
            .unwrap()
            .extract_all(&mut MemorySink::new(), &options);
        assert!(matches!(
            result,
            Err(HuffArcError::OutputTooLarge {
                size: 1000,
                limit: 999
            })
        ));
    }

    #[test]
    fn test_no_overwrite() {
        let archive = file_archive("x", b"abc");
        let mut sink = MemorySink::new();
        sink.files.insert("x".to_string(), b"old".to_vec());

        let result = HuffReader::new(Cursor::new(&archive))
            .unwrap()
            .extract_all(&mut sink, &ExtractOptions::default());
        assert!(matches!(
            result,
            Err(HuffArcError::Io(ref e)) if e.kind() == io::ErrorKind::AlreadyExists
        ));
        assert_eq!(sink.get("x"), Some(&b"old"[..]));

        let options = ExtractOptions {
            overwrite: true,
            ..ExtractOptions::default()
        };
        HuffReader::new(Cursor::new(&archive))
            .unwrap()
            .extract_all(&mut sink, &options)
            .unwrap();
        assert_eq!(sink.get("x"), Some(&b"abc"[..]));
    }

    #[test]
    fn test_verify() {
        let archive = sample_directory();
        let reader = HuffReader::new(Cursor::new(&archive)).unwrap();
        assert_eq!(reader.verify().unwrap(), 20);

        let mut truncated = archive.clone();
        truncated.pop();
        let result = HuffReader::new(Cursor::new(&truncated)).unwrap().verify();
        assert!(matches!(result, Err(HuffArcError::UnexpectedEnd { .. })));
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let mut archive = sample_directory();
        // original_size lives at bytes 5..13
        archive[5] = archive[5].wrapping_add(1);
        assert!(matches!(
            HuffReader::new(Cursor::new(&archive)),
            Err(HuffArcError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_oversized_tree_rejected() {
        let mut archive = file_archive("x", b"abc");
        archive[13..17].copy_from_slice(&10_000u32.to_le_bytes());
        assert!(matches!(
            HuffReader::new(Cursor::new(&archive)),
            Err(HuffArcError::CorruptedTree { offset: 0, .. })
        ));
    }
}
