//! HuffArc CLI - static Huffman archiver
//!
//! Compresses single files or whole directories into HUFF archives.

mod commands;
mod logger;
mod utils;

use clap::{ArgAction, Parser, Subcommand};
use commands::{cmd_compress, cmd_compress_dir, cmd_decompress, cmd_info, cmd_list, cmd_test};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "huffarc")]
#[command(author, version, about = "HuffArc - static Huffman archiver")]
#[command(long_about = "
HuffArc compresses files and directories with a static Huffman code.
Each archive stores its own code tree, so it can be decoded on its own.

Examples:
  huffarc compress notes.txt notes.huff
  huffarc compress-dir project project.huff
  huffarc decompress project.huff -o restored
  huffarc list project.huff --json
  huffarc test notes.huff
  huffarc -v info notes.huff
")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Disable progress bars
    #[arg(long, global = true)]
    no_progress: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a single file
    #[command(visible_alias = "compress-file", alias = "c")]
    Compress {
        /// File to compress
        input: PathBuf,

        /// Archive to create
        output: PathBuf,
    },

    /// Compress a directory tree
    #[command(alias = "cd")]
    CompressDir {
        /// Directory to compress
        input: PathBuf,

        /// Archive to create
        output: PathBuf,
    },

    /// Extract an archive
    #[command(alias = "x")]
    Decompress {
        /// Archive to extract
        archive: PathBuf,

        /// Output directory, same as --output
        #[arg(value_name = "OUTPUT_DIR", conflicts_with = "output")]
        output_dir: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// List the contents of an archive
    #[command(alias = "l")]
    List {
        /// Archive to list
        archive: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Test archive integrity by decoding it without writing
    #[command(alias = "t")]
    Test {
        /// Archive to test
        archive: PathBuf,
    },

    /// Show header fields and code tree statistics
    #[command(alias = "i")]
    Info {
        /// Archive to inspect
        archive: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init(cli.verbose, cli.quiet) {
        eprintln!("Warning: could not install logger: {}", e);
    }
    let progress = !cli.no_progress && !cli.quiet;

    let result = match cli.command {
        Commands::Compress { input, output } => cmd_compress(&input, &output),
        Commands::CompressDir { input, output } => cmd_compress_dir(&input, &output, progress),
        Commands::Decompress {
            archive,
            output_dir,
            output,
            force,
        } => {
            let output = output_dir.unwrap_or(output);
            cmd_decompress(&archive, &output, force, progress)
        }
        Commands::List { archive, json } => cmd_list(&archive, json),
        Commands::Test { archive } => cmd_test(&archive),
        Commands::Info { archive } => cmd_info(&archive, cli.verbose > 0),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
