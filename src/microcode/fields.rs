use std::ops::Range;

use bitflags::bitflags;
use bitvec::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::record::{parse_hex, MemoryAction, MicroInstructionRecord, NextAddress};
use super::rom::MAX_ADDRESS;
use crate::error::MicroError;

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlLines: u32 {
const MAR = 1 << 0; // register write-enables
const MBR = 1 << 1;
const PC = 1 << 2;
const SP = 1 << 3;
const B = 1 << 4;
const A = 1 << 5;
const BUF = 1 << 6;
const OUT = 1 << 7;
const MEM_WRITE = 1 << 8;
const J = 1 << 16; // take the explicit next address
const JZ = 1 << 17; // jump on zero flag
}
}

pub const BUS_FIELD: Range<usize> = 9..12;
pub const ALU_FIELD: Range<usize> = 12..16;
pub const NEXT_FIELD: Range<usize> = 18..24;

/// Destination registers accepted in `writeTo`.
pub const WRITE_ENABLES: &[(&str, ControlLines)] = &[
    ("MAR", ControlLines::MAR),
    ("MBR", ControlLines::MBR),
    ("PC", ControlLines::PC),
    ("SP", ControlLines::SP),
    ("B", ControlLines::B),
    ("A", ControlLines::A),
    ("BUF", ControlLines::BUF),
    ("OUT", ControlLines::OUT),
];

/// B-bus sources; `0b111` is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BusSource {
    A = 0b000,
    B = 0b001,
    Sp = 0b010,
    Pc = 0b011,
    Mbr = 0b100,
    Mar = 0b101,
    Input = 0b110,
}

impl BusSource {
    pub const ALL: [BusSource; 7] = [
        BusSource::A,
        BusSource::B,
        BusSource::Sp,
        BusSource::Pc,
        BusSource::Mbr,
        BusSource::Mar,
        BusSource::Input,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BusSource::A => "A",
            BusSource::B => "B",
            BusSource::Sp => "SP",
            BusSource::Pc => "PC",
            BusSource::Mbr => "MBR",
            BusSource::Mar => "MAR",
            BusSource::Input => "INPUT",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name().eq_ignore_ascii_case(s))
    }
}

/// ALU functions; codes 9..=15 are reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AluOp {
    A = 0,
    B = 1,
    APlus1 = 2,
    BPlus1 = 3,
    APlusB = 4,
    AMinusB = 5,
    AAndB = 6,
    AOrB = 7,
    BMinus1 = 8,
}

impl AluOp {
    pub const ALL: [AluOp; 9] = [
        AluOp::A,
        AluOp::B,
        AluOp::APlus1,
        AluOp::BPlus1,
        AluOp::APlusB,
        AluOp::AMinusB,
        AluOp::AAndB,
        AluOp::AOrB,
        AluOp::BMinus1,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AluOp::A => "A",
            AluOp::B => "B",
            AluOp::APlus1 => "APLUS1",
            AluOp::BPlus1 => "BPLUS1",
            AluOp::APlusB => "APLUSB",
            AluOp::AMinusB => "AMINUSB",
            AluOp::AAndB => "AANDB",
            AluOp::AOrB => "AORB",
            AluOp::BMinus1 => "BMINUS1",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name().eq_ignore_ascii_case(s))
    }
}

/// A field that could not be encoded. The field is left zero and encoding
/// carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldWarning {
    #[error("unknown register in writeTo: {0}")]
    UnknownRegister(String),
    #[error("unknown bBus source: {0}")]
    UnknownBusSource(String),
    #[error("unknown ALU operation: {0}")]
    UnknownOperation(String),
    #[error("next address {0} out of range, masked to 6 bits")]
    NextOutOfRange(String),
    #[error("invalid next address format: {0}")]
    MalformedNext(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub word: u32,
    pub warnings: Vec<FieldWarning>,
}

/// Pack one record into its control word.
///
/// ```text
///  23      18 17 16 15  12 11  9  8  7                0
/// | next addr|JZ| J| ALU  | bBus |MW| OUT BUF A B SP PC MBR MAR |
/// ```
pub fn encode(record: &MicroInstructionRecord) -> Result<Encoded, MicroError> {
    let mut lines = ControlLines::empty();
    let mut warnings = Vec::new();

    // MBR is only driven through the memory-action table below.
    let mut mbr_written = false;
    for reg in record.destinations() {
        if reg.eq_ignore_ascii_case("MBR") {
            mbr_written = true;
            continue;
        }
        match WRITE_ENABLES.iter().find(|(name, _)| name.eq_ignore_ascii_case(reg)) {
            Some((_, bit)) => lines |= *bit,
            None => warnings.push(FieldWarning::UnknownRegister(reg.clone())),
        }
    }

    lines |= match (mbr_written, record.memory_action) {
        (false, MemoryAction::None) => ControlLines::empty(),
        (false, MemoryAction::Read) => ControlLines::MBR,
        (false, MemoryAction::Write) => ControlLines::MEM_WRITE,
        (true, MemoryAction::None) => ControlLines::MEM_WRITE | ControlLines::MBR,
        (true, action) => {
            return Err(MicroError::UnsupportedCombination {
                address: record.address.clone(),
                mbr_written,
                action,
            })
        }
    };

    let bus = match record.b_bus.as_deref() {
        None => 0,
        Some(name) => BusSource::from_name(name).map_or_else(
            || {
                warnings.push(FieldWarning::UnknownBusSource(name.to_string()));
                0
            },
            |b| b as u8,
        ),
    };

    let alu = match record.operation.as_deref() {
        None => 0,
        Some(name) => AluOp::from_name(name).map_or_else(
            || {
                warnings.push(FieldWarning::UnknownOperation(name.to_string()));
                0
            },
            |op| op as u8,
        ),
    };

    let next = match &record.next {
        NextAddress::FromMemory => 0,
        NextAddress::Explicit(text) => {
            lines |= ControlLines::J;
            match parse_hex(text) {
                None => {
                    warnings.push(FieldWarning::MalformedNext(text.clone()));
                    0
                }
                Some(v) if !(0..=i64::from(MAX_ADDRESS)).contains(&v) => {
                    warnings.push(FieldWarning::NextOutOfRange(text.clone()));
                    (v & i64::from(MAX_ADDRESS)) as u8
                }
                Some(v) => v as u8,
            }
        }
    };

    lines.set(ControlLines::JZ, record.jz);

    let mut word = BitArray::<[u32; 1], Lsb0>::new([lines.bits()]);
    word[BUS_FIELD].store_le(bus);
    word[ALU_FIELD].store_le(alu);
    if lines.contains(ControlLines::J) {
        word[NEXT_FIELD].store_le(next);
    }

    for w in &warnings {
        warn!(address = %record.address, "{w}");
    }
    Ok(Encoded {
        word: word.into_inner()[0],
        warnings,
    })
}
