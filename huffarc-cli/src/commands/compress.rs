//! Compress commands.

use crate::utils::{
    ProgressSource, archive_name, create_progress_bar, print_stats, resolve_output_path,
};
use huffarc_archive::{DirectorySource, EntryRecord, HuffWriter, walk_directory};
use huffarc_core::HuffArcError;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

pub fn cmd_compress(input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let data = fs::read(input)?;
    if data.is_empty() {
        return Err(HuffArcError::EmptyInput.into());
    }
    let name = archive_name(input)?;

    info!(input = %input.display(), bytes = data.len(), "compressing file");
    let file = File::create(output)?;
    let mut writer = HuffWriter::new(BufWriter::new(file));
    let stats = writer.write_file(&name, &data)?;

    println!("Compressed {} -> {}", input.display(), output.display());
    print_stats(&stats, start.elapsed());
    Ok(())
}

pub fn cmd_compress_dir(
    input: &Path,
    output: &Path,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let output_path = resolve_output_path(output)?;
    let root = input.canonicalize()?;
    let mut entries = walk_directory(input)?;
    entries.retain(|e| {
        let is_output = e.is_file() && root.join(&e.path) == output_path;
        if is_output {
            debug!(path = %e.path, "skipping the output archive");
        }
        !is_output
    });
    let name = archive_name(input)?;
    let files = entries.iter().filter(|e| e.is_file()).count() as u64;

    info!(
        input = %input.display(),
        entries = entries.len(),
        files,
        "compressing directory"
    );

    let pb = create_progress_bar(progress_len(&entries), progress);
    let mut source = ProgressSource::new(DirectorySource::new(input), pb.clone());

    let file = File::create(output)?;
    let mut writer = HuffWriter::new(BufWriter::new(file));
    let stats = writer.write_directory(&name, &entries, &mut source)?;
    pb.finish_and_clear();

    println!("Compressed {} -> {}", input.display(), output.display());
    print_stats(&stats, start.elapsed());
    Ok(())
}

/// Number of source reads `write_directory` performs: every file once for
/// counting, non-empty files again for encoding.
fn progress_len(entries: &[EntryRecord]) -> u64 {
    entries
        .iter()
        .filter(|e| e.is_file())
        .map(|e| if e.size > 0 { 2 } else { 1 })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_len_skips_empty_files_on_second_pass() {
        let entries = vec![
            EntryRecord::directory("docs"),
            EntryRecord::file("docs/a.txt", 12),
            EntryRecord::file("docs/empty", 0),
            EntryRecord::file("b.bin", 3),
        ];
        assert_eq!(progress_len(&entries), 5);
        assert_eq!(progress_len(&[]), 0);
    }
}
