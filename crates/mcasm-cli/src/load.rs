use std::io;
use std::path::{Path, PathBuf};

use mcasm_rs::MicroInstructionRecord;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("microcode input file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read a JSON array of micro-instruction records.
pub fn load_microcode(path: &Path) -> Result<Vec<MicroInstructionRecord>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound { path: path.to_path_buf() },
        _ => LoadError::Io { path: path.to_path_buf(), source },
    })?;
    parse_microcode(&text).map_err(|source| LoadError::Parse { path: path.to_path_buf(), source })
}

pub fn parse_microcode(text: &str) -> Result<Vec<MicroInstructionRecord>, serde_json::Error> {
    serde_json::from_str(text)
}
