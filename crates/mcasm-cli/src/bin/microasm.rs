use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use mcasm_cli::{init_tracing, load_microcode, OutputPaths};
use mcasm_rs::MicrocodeRom;

#[derive(Parser, Debug)]
#[command(author, version, about = "Pack microcode records into a 24-bit control store image")]
struct Opts {
    /// JSON array of micro-instruction records
    #[arg(value_name = "MICROFILE", default_value = "microcode.json")]
    input: PathBuf,
}

fn main() -> Result<()> {
    init_tracing();
    let opts = Opts::parse();

    let records = load_microcode(&opts.input)?;
    let rom = MicrocodeRom::assemble(&records).context("microcode assembly failed")?;
    if !rom.warnings().is_empty() {
        warn!(count = rom.warnings().len(), "microcode assembled with warnings");
    }

    print!("{}", rom.listing());

    let out = OutputPaths::for_input(&opts.input);
    rom.artifacts()?.write(&out.binary, &out.memimage)?;

    info!(binary = %out.binary.display(), image = %out.memimage.display(), "assembly complete");
    Ok(())
}
