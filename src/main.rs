//! CLI entry point for the tile collapse generator

use clap::Parser;
use tilecollapse::io::cli::{Cli, FileProcessor};

fn main() -> tilecollapse::Result<()> {
    let cli = Cli::parse();
    let mut processor = FileProcessor::new(cli);
    processor.install_logger()?;
    processor.process()?;
    Ok(())
}
