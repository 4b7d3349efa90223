use thiserror::Error;

use crate::microcode::MemoryAction;

/// What went wrong while assembling a line. Every variant carries the literal
/// text that caused it (label name, operand, mnemonic).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmErrorKind {
    #[error("duplicate label definition '{0}'")]
    DuplicateLabel(String),
    #[error("undefined label '{0}'")]
    UndefinedLabel(String),
    #[error("operand '{0}' out of 8-bit range")]
    OutOfRange(String),
    #[error("invalid number format for operand '{0}'")]
    MalformedNumber(String),
    #[error("unknown mnemonic '{0}'")]
    UnknownMnemonic(String),
    #[error("DB directive requires operands")]
    EmptyDirective,
    #[error("malformed DB operand list '{0}'")]
    MalformedDirective(String),
}

/// A fatal assembly error pinned to a 1-based source line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} (at line {line}: \"{text}\")")]
pub struct AsmError {
    pub kind: AsmErrorKind,
    pub line: usize,
    pub text: String,
}

impl AsmError {
    pub fn new(kind: AsmErrorKind, line: usize, text: &str) -> Self {
        Self {
            kind,
            line,
            text: text.trim().to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MicroError {
    #[error("malformed microcode address '{address}' for instruction: {description}")]
    MalformedAddress { address: String, description: String },
    #[error("address {address} is out of range for instruction: {description}")]
    AddressOutOfRange { address: String, description: String },
    #[error("duplicate address {address} for instruction: {description}")]
    DuplicateAddress { address: String, description: String },
    #[error(
        "unsupported combination at {address}: MBR in writeTo = {mbr_written}, memoryAction = {action}"
    )]
    UnsupportedCombination {
        address: String,
        mbr_written: bool,
        action: MemoryAction,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("instruction forms '{first}' and '{second}' can match the same text")]
    Ambiguous { first: String, second: String },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputError {
    #[error("memory image word size must be a multiple of 8 bits up to 64, got {0}")]
    WordWidth(u32),
}
