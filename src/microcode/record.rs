use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sentinel for `next`: take the next micro-address from the MBR.
pub const NEXT_FROM_MEMORY: &str = "mbr";

/// One micro-instruction as described in the microcode source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MicroInstructionRecord {
    #[serde(default)]
    pub description: Option<String>,
    /// Hex text, `0x00` through `0x3F`.
    pub address: String,
    #[serde(default)]
    pub b_bus: Option<String>,
    #[serde(default)]
    pub write_to: Option<Vec<String>>,
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default)]
    pub memory_action: MemoryAction,
    #[serde(default)]
    pub next: NextAddress,
    #[serde(default, rename = "jZ")]
    pub jz: bool,
}

impl MicroInstructionRecord {
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("N/A")
    }

    pub fn destinations(&self) -> &[String] {
        self.write_to.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum MemoryAction {
    #[default]
    None,
    Read,
    Write,
}

impl fmt::Display for MemoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MemoryAction::None => "none",
            MemoryAction::Read => "read",
            MemoryAction::Write => "write",
        })
    }
}

impl FromStr for MemoryAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(MemoryAction::None),
            "read" => Ok(MemoryAction::Read),
            "write" => Ok(MemoryAction::Write),
            _ => Err(format!("unknown memoryAction '{s}' (expected none, read or write)")),
        }
    }
}

impl TryFrom<String> for MemoryAction {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Where the sequencer goes after this micro-instruction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NextAddress {
    /// Derive the address from memory (J = 0).
    #[default]
    FromMemory,
    /// Explicit micro-address text, e.g. `0x1F` (J = 1).
    Explicit(String),
}

impl From<String> for NextAddress {
    fn from(s: String) -> Self {
        if s.trim().eq_ignore_ascii_case(NEXT_FROM_MEMORY) {
            NextAddress::FromMemory
        } else {
            NextAddress::Explicit(s)
        }
    }
}

impl From<NextAddress> for String {
    fn from(n: NextAddress) -> Self {
        match n {
            NextAddress::FromMemory => NEXT_FROM_MEMORY.to_string(),
            NextAddress::Explicit(s) => s,
        }
    }
}

/// Parse `0x`-prefixed hex. `None` when the text is not of that shape.
pub(crate) fn parse_hex(text: &str) -> Option<i64> {
    let t = text.trim();
    let digits = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X"))?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    i64::from_str_radix(digits, 16).ok()
}
