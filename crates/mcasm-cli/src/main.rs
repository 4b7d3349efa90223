use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use mcasm_cli::{init_tracing, OutputPaths};
use mcasm_rs::{assemble, Artifacts, OutputConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Assemble a program into .bin and .logisimimg images")]
struct Opts {
    /// Assembly source (one instruction, label or DB directive per line)
    #[arg(value_name = "ASMFILE", default_value = "program.asm")]
    input: PathBuf,
}

fn main() -> Result<()> {
    init_tracing();
    let opts = Opts::parse();

    let src = std::fs::read_to_string(&opts.input)
        .with_context(|| format!("reading {}", opts.input.display()))?;
    info!(input = %opts.input.display(), "assembling");

    let asm = assemble(&src).context("assembly failed")?;
    for (name, addr) in asm.symbols.iter() {
        info!("  {name:<10}: {addr:#04x} ({addr})");
    }

    let out = OutputPaths::for_input(&opts.input);
    let artifacts = Artifacts::render(&asm.image, OutputConfig::program())?;
    artifacts.write(&out.binary, &out.memimage)?;

    info!(binary = %out.binary.display(), image = %out.memimage.display(), "assembly successful");
    Ok(())
}
