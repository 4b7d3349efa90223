pub mod assembler;
pub mod error;
pub mod image;
pub mod instructions;
pub mod microcode;
pub mod operand;
pub mod output;
pub mod source;
pub mod symbols;

pub use assembler::{assemble, Assembler, Assembly, Layout};
pub use error::{AsmError, AsmErrorKind, MicroError, OutputError, TableError};
pub use image::CodeImage;
pub use microcode::{MicroInstructionRecord, MicrocodeRom};
pub use output::{Artifacts, OutputConfig};
pub use symbols::SymbolTable;
