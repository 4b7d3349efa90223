use std::path::{Path, PathBuf};

pub const BIN_EXT: &str = "bin";
pub const MEMIMAGE_EXT: &str = "logisimimg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub binary: PathBuf,
    pub memimage: PathBuf,
}

impl OutputPaths {
    /// Outputs sit next to the input with its extension replaced.
    pub fn for_input(input: &Path) -> Self {
        Self {
            binary: input.with_extension(BIN_EXT),
            memimage: input.with_extension(MEMIMAGE_EXT),
        }
    }
}
