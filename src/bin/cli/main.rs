//! CLI tool for rezip archive operations.

mod commands;
mod exit_codes;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

/// ZIP archive tool with atomic whole-archive rewrites
#[derive(Parser)]
#[command(name = "rezip")]
#[command(author, version, about = "ZIP archive tool", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Suppress per-entry notices
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create archive from a file or directory (alias: c)
    #[command(alias = "c")]
    Create {
        /// Archive file to create
        archive: PathBuf,

        /// Source file or directory to archive
        source: PathBuf,

        /// Compression level (0-9)
        #[arg(short = 'l', long, default_value = "6", value_parser = clap::value_parser!(u32).range(0..=9))]
        level: u32,
    },

    /// List archive contents (alias: l)
    #[command(alias = "l")]
    List {
        /// Archive file to list
        archive: PathBuf,
    },

    /// Extract all entries (alias: x)
    #[command(alias = "x")]
    Extract {
        /// Archive file to extract
        archive: PathBuf,

        /// Output directory
        #[arg(short = 'o', long, default_value = ".")]
        output: PathBuf,
    },

    /// Add files to an existing archive (alias: a)
    #[command(alias = "a")]
    Add {
        /// Archive file to modify
        archive: PathBuf,

        /// Files to add
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Remove entries from an existing archive (alias: d)
    #[command(alias = "d")]
    Remove {
        /// Archive file to modify
        archive: PathBuf,

        /// Entry names to remove
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Re-encode an archive at a different compression level
    Level {
        /// Archive file to modify
        archive: PathBuf,

        /// New compression level (0-9)
        #[arg(value_parser = clap::value_parser!(u32).range(0..=9))]
        level: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Create {
            archive,
            source,
            level,
        } => commands::create(&archive, &source, level, cli.quiet),
        Commands::List { archive } => commands::list(&archive),
        Commands::Extract { archive, output } => commands::extract(&archive, &output, cli.quiet),
        Commands::Add { archive, files } => commands::add(&archive, files, cli.quiet),
        Commands::Remove { archive, names } => commands::remove(&archive, &names, cli.quiet),
        Commands::Level { archive, level } => commands::change_level(&archive, level, cli.quiet),
    };

    process::exit(exit_code.code());
}
