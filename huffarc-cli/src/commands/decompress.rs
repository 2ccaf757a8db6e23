//! Decompress command implementation.

use crate::utils::{ProgressSink, create_progress_bar};
use huffarc_archive::{DirectorySink, ExtractOptions, HuffReader};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;
use tracing::info;

pub fn cmd_decompress(
    archive: &Path,
    output: &Path,
    force: bool,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let file = File::open(archive)?;
    let reader = HuffReader::new(BufReader::new(file))?;

    let files = if reader.is_directory() {
        reader.entries().iter().filter(|e| e.is_file()).count() as u64
    } else {
        1
    };
    info!(
        archive = %archive.display(),
        kind = %reader.header().kind,
        output = %output.display(),
        "extracting"
    );

    fs::create_dir_all(output)?;
    let pb = create_progress_bar(files, progress);
    let mut sink = ProgressSink::new(DirectorySink::new(output), pb.clone());
    let options = ExtractOptions {
        overwrite: force,
        ..ExtractOptions::default()
    };
    let bytes = reader.extract_all(&mut sink, &options)?;
    pb.finish_and_clear();

    println!(
        "Extracted {} files ({} bytes) to {} in {:.3} s",
        files,
        bytes,
        output.display(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
