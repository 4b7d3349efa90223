use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt::Write as _;

use tracing::info;

use super::fields::{encode, FieldWarning};
use super::record::{parse_hex, MicroInstructionRecord};
use crate::error::{MicroError, OutputError};
use crate::image::CodeImage;
use crate::output::{self, Artifacts, OutputConfig};

/// Highest micro-address (6-bit sequencer).
pub const MAX_ADDRESS: u8 = 0x3F;
pub const ROM_WORDS: usize = MAX_ADDRESS as usize + 1;
pub const WORD_BYTES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomEntry {
    pub word: u32,
    pub description: String,
}

/// Assembled control store: micro-address to control word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MicrocodeRom {
    entries: BTreeMap<u8, RomEntry>,
    warnings: Vec<(u8, FieldWarning)>,
}

fn parse_address(record: &MicroInstructionRecord) -> Result<u8, MicroError> {
    let value = parse_hex(&record.address).ok_or_else(|| MicroError::MalformedAddress {
        address: record.address.clone(),
        description: record.description().to_string(),
    })?;
    if !(0..=i64::from(MAX_ADDRESS)).contains(&value) {
        return Err(MicroError::AddressOutOfRange {
            address: record.address.clone(),
            description: record.description().to_string(),
        });
    }
    Ok(value as u8)
}

impl MicrocodeRom {
    /// Encode every record. Any bad address or unsupported memory
    /// combination aborts the whole ROM.
    pub fn assemble(records: &[MicroInstructionRecord]) -> Result<Self, MicroError> {
        let mut rom = Self::default();
        for record in records {
            let addr = parse_address(record)?;
            let slot = match rom.entries.entry(addr) {
                Entry::Occupied(_) => {
                    return Err(MicroError::DuplicateAddress {
                        address: record.address.clone(),
                        description: record.description().to_string(),
                    })
                }
                Entry::Vacant(slot) => slot,
            };
            let encoded = encode(record)?;
            slot.insert(RomEntry {
                word: encoded.word,
                description: record.description().to_string(),
            });
            rom.warnings
                .extend(encoded.warnings.into_iter().map(|w| (addr, w)));
        }
        info!(
            words = rom.entries.len(),
            warnings = rom.warnings.len(),
            "microcode assembled"
        );
        Ok(rom)
    }

    pub fn get(&self, addr: u8) -> Option<u32> {
        self.entries.get(&addr).map(|e| e.word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &RomEntry)> {
        self.entries.iter().map(|(a, e)| (*a, e))
    }

    pub fn warnings(&self) -> &[(u8, FieldWarning)] {
        &self.warnings
    }

    /// Byte view: word `n` occupies bytes `3n..3n+3`, most significant first.
    pub fn to_image(&self) -> CodeImage {
        self.entries
            .iter()
            .flat_map(|(addr, e)| {
                let base = u32::from(*addr) * WORD_BYTES as u32;
                let [_, hi, mid, lo] = e.word.to_be_bytes();
                [(base, hi), (base + 1, mid), (base + 2, lo)]
            })
            .collect()
    }

    /// Full ROM image: all 64 words, undefined ones zero.
    pub fn binary(&self) -> Vec<u8> {
        let mut rom = vec![0u8; ROM_WORDS * WORD_BYTES];
        for (addr, val) in self.to_image().iter() {
            rom[addr as usize] = val;
        }
        rom
    }

    pub fn memimage(&self) -> Result<String, OutputError> {
        output::memimage(&self.to_image(), OutputConfig::microcode())
    }

    pub fn artifacts(&self) -> Result<Artifacts, OutputError> {
        Ok(Artifacts {
            binary: self.binary(),
            memimage: self.memimage()?,
        })
    }

    /// Human-readable table of every defined word.
    pub fn listing(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Address | Hex Value | Binary Value                     | Description");
        let _ = writeln!(out, "--------|-----------|----------------------------------|-------------");
        for (addr, e) in self.iter() {
            let _ = writeln!(
                out,
                "0x{addr:02X}    | 0x{:06X}  | {:<32} | {}",
                e.word,
                nibbles(e.word),
                e.description
            );
        }
        out
    }
}

/// 24-bit binary, space every four digits.
fn nibbles(word: u32) -> String {
    let bits = format!("{:024b}", word & 0xFF_FFFF);
    bits.as_bytes()
        .chunks(4)
        .map(|c| String::from_utf8_lossy(c).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
