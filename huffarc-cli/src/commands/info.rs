//! Info command implementation.

use crate::utils::display_symbol;
use huffarc_archive::HuffReader;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

pub fn cmd_info(archive: &Path, show_codes: bool) -> Result<(), Box<dyn std::error::Error>> {
    let metadata = fs::metadata(archive)?;
    let file = File::open(archive)?;
    let reader = HuffReader::new(BufReader::new(file))?;
    let header = reader.header();

    println!("Archive Information");
    println!("===================");
    println!("File: {}", archive.display());
    println!("Size: {} bytes", metadata.len());

    println!();
    println!("HUFF Header:");
    println!("  Version: {}", header.version);
    println!("  Kind: {}", header.kind);
    println!("  Name: {}", header.name);
    println!("  Original size: {} bytes", header.original_size);
    println!("  Tree size: {} bytes", header.tree_size);

    if reader.is_directory() {
        let entries = reader.entries();
        println!();
        println!("Contents:");
        println!(
            "  Files: {}",
            entries.iter().filter(|e| e.is_file()).count()
        );
        println!(
            "  Directories: {}",
            entries.iter().filter(|e| e.is_dir).count()
        );
    }

    let Some(tree) = reader.tree() else {
        println!();
        println!("Code tree: none (archive holds no file data)");
        return Ok(());
    };
    let table = tree.codes();

    println!();
    println!("Code Tree:");
    println!("  Symbols: {}", tree.leaf_count());
    println!("  Depth: {}", tree.depth());
    println!("  Longest code: {} bits", table.max_len());

    if show_codes {
        println!();
        println!("{:>6}  {:>4}  Code", "Symbol", "Bits");
        println!("{}", "-".repeat(40));
        for (symbol, code) in table.iter() {
            println!("{:>6}  {:>4}  {}", display_symbol(symbol), code.len(), code);
        }
    }
    Ok(())
}
