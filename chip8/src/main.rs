use std::path::PathBuf;

use clap::Parser;

mod keymap;
mod run;

/// A CHIP-8 virtual machine
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to a raw CHIP-8 ROM image
    rom: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    run::run(args.rom)
}
