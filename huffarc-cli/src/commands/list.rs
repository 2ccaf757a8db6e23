//! List command implementation.

use crate::utils::print_entries;
use huffarc_archive::{ContainerHeader, EntryRecord, HuffReader};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// JSON serializable entry data for archive listings.
#[derive(Debug, Serialize, Deserialize)]
struct EntryJson {
    path: String,
    size: u64,
    compressed_size: u64,
    ratio: f64,
    is_dir: bool,
}

impl EntryJson {
    fn from_entry(entry: &EntryRecord) -> Self {
        Self {
            path: entry.path.clone(),
            size: entry.size,
            compressed_size: entry.compressed_size,
            ratio: entry.compression_ratio(),
            is_dir: entry.is_dir,
        }
    }
}

/// JSON output for archive listing.
#[derive(Debug, Serialize, Deserialize)]
struct ArchiveListJson {
    archive: String,
    kind: String,
    name: String,
    version: u8,
    original_size: u64,
    archive_size: u64,
    tree_size: u32,
    entries: Vec<EntryJson>,
}

pub fn cmd_list(archive: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let archive_size = fs::metadata(archive)?.len();
    let file = File::open(archive)?;
    let reader = HuffReader::new(BufReader::new(file))?;
    let header = reader.header();
    let entries = listed_entries(header, reader.entries(), archive_size);

    if json {
        let output = ArchiveListJson {
            archive: archive.display().to_string(),
            kind: header.kind.to_string(),
            name: header.name.clone(),
            version: header.version,
            original_size: header.original_size,
            archive_size,
            tree_size: header.tree_size,
            entries: entries.iter().map(EntryJson::from_entry).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Archive: {} ({}, {})", archive.display(), header.kind, header.name);
    println!();
    print_entries(&entries);
    Ok(())
}

/// Entries to show. A single-file archive is listed as one entry whose
/// compressed size is its payload.
fn listed_entries(
    header: &ContainerHeader,
    entries: &[EntryRecord],
    archive_size: u64,
) -> Vec<EntryRecord> {
    if header.is_directory() {
        return entries.to_vec();
    }
    let overhead = header.encoded_len() as u64 + header.tree_size as u64;
    let mut entry = EntryRecord::file(header.name.clone(), header.original_size);
    entry.compressed_size = archive_size.saturating_sub(overhead);
    vec![entry]
}
