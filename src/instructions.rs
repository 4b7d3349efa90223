use std::fmt;

use crate::error::{AsmErrorKind, TableError};
use crate::operand;
use crate::symbols::SymbolTable;

/// Register keywords. In a value slot a keyword is read as a label of the
/// same name, unless a form with that register in the slot also matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg {
    A,
    B,
    Sp,
}

impl Reg {
    pub const ALL: [Reg; 3] = [Reg::A, Reg::B, Reg::Sp];

    pub fn keyword(self) -> &'static str {
        match self {
            Reg::A => "A",
            Reg::B => "B",
            Reg::Sp => "SP",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Reg> {
        Self::ALL
            .into_iter()
            .find(|r| r.keyword().eq_ignore_ascii_case(s))
    }
}

/// One operand position of an instruction form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Exactly this register.
    Reg(Reg),
    /// Immediate number or label.
    Value,
    /// `[value]`, a memory address.
    Mem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Opcode only.
    Implied,
    /// Opcode followed by one byte taken from the form's value/memory slot.
    Byte,
}

#[derive(Debug, Clone, Copy)]
pub struct InstrDesc {
    pub mnemonic: &'static str,
    pub slots: &'static [Slot],
    pub opcode: u8,
    pub encoding: Encoding,
}

impl InstrDesc {
    pub fn operand_bytes(&self) -> u32 {
        match self.encoding {
            Encoding::Implied => 0,
            Encoding::Byte => 1,
        }
    }

    pub fn size(&self) -> u32 {
        1 + self.operand_bytes()
    }

    /// Operand bytes for this form. `at` is the address the first operand
    /// byte will occupy.
    pub fn encode_operands(
        &self,
        operand: Option<&str>,
        symbols: &SymbolTable,
        at: u32,
    ) -> Result<Vec<u8>, AsmErrorKind> {
        match (self.encoding, operand) {
            (Encoding::Implied, _) => Ok(Vec::new()),
            (Encoding::Byte, Some(text)) => {
                tracing::trace!(at, operand = text, "resolving operand");
                Ok(vec![operand::parse_byte(text, symbols)?])
            }
            (Encoding::Byte, None) => Err(AsmErrorKind::UnknownMnemonic(self.to_string())),
        }
    }

    fn register_slots(&self) -> usize {
        self.slots.iter().filter(|s| matches!(s, Slot::Reg(_))).count()
    }

    /// Every slot is the same as `other`'s or is a register where `other`
    /// takes a value, so whenever both match a line this form is the one meant.
    fn dominates(&self, other: &InstrDesc) -> bool {
        self.slots.iter().zip(other.slots).all(|(a, b)| {
            a == b || matches!((a, b), (Slot::Reg(_), Slot::Value))
        })
    }

    /// Both forms can match one line and neither is the more specific one.
    fn ambiguous_with(&self, other: &InstrDesc) -> bool {
        let can_share_text = self.mnemonic.eq_ignore_ascii_case(other.mnemonic)
            && self.slots.len() == other.slots.len()
            && self.slots.iter().zip(other.slots).all(|(a, b)| slots_overlap(*a, *b));
        can_share_text
            && (self.slots == other.slots || !(self.dominates(other) || other.dominates(self)))
    }
}

/// A register keyword can fill its register slot or name a label in a value
/// slot; everything else matches only its own kind.
fn slots_overlap(a: Slot, b: Slot) -> bool {
    match (a, b) {
        (Slot::Reg(x), Slot::Reg(y)) => x == y,
        (Slot::Reg(_), Slot::Value) | (Slot::Value, Slot::Reg(_)) => true,
        (Slot::Value, Slot::Value) | (Slot::Mem, Slot::Mem) => true,
        _ => false,
    }
}

impl fmt::Display for InstrDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic)?;
        for (i, slot) in self.slots.iter().enumerate() {
            f.write_str(if i == 0 { " " } else { ", " })?;
            match slot {
                Slot::Reg(r) => f.write_str(r.keyword())?,
                Slot::Value => f.write_str("value")?,
                Slot::Mem => f.write_str("[value]")?,
            }
        }
        Ok(())
    }
}

const NONE: &[Slot] = &[];
const A: Slot = Slot::Reg(Reg::A);
const B: Slot = Slot::Reg(Reg::B);
const SP: Slot = Slot::Reg(Reg::Sp);

const fn implied(mnemonic: &'static str, slots: &'static [Slot], opcode: u8) -> InstrDesc {
    InstrDesc {
        mnemonic,
        slots,
        opcode,
        encoding: Encoding::Implied,
    }
}

const fn byte(mnemonic: &'static str, slots: &'static [Slot], opcode: u8) -> InstrDesc {
    InstrDesc {
        mnemonic,
        slots,
        opcode,
        encoding: Encoding::Byte,
    }
}

pub const TABLE: &[InstrDesc] = &[
    implied("NOP", NONE, 0x01),
    implied("INPUT", NONE, 0x02),
    implied("OUTPUT", NONE, 0x03),
    byte("JMP", &[Slot::Value], 0x04),
    byte("MOV", &[A, Slot::Value], 0x06),
    implied("INC", &[A], 0x08),
    implied("MOV", &[B, A], 0x09),
    implied("ADD", &[A, B], 0x0A),
    implied("HALT", NONE, 0x0C),
    byte("MOV", &[SP, Slot::Value], 0x0D),
    implied("PUSH", &[A], 0x0F),
    implied("POP", &[A], 0x13),
    byte("MOV", &[A, Slot::Mem], 0x16),
    byte("JZ", &[Slot::Value], 0x1A),
    byte("MOV", &[Slot::Mem, A], 0x20),
    implied("INC", &[B], 0x24),
    implied("DEC", &[A], 0x25),
    implied("DEC", &[B], 0x26),
    implied("ADD", &[B, A], 0x27),
    implied("SUB", &[A, B], 0x29),
    implied("SUB", &[B, A], 0x2B),
    implied("SWAP", &[A, B], 0x2D),
    byte("MOV", &[B, Slot::Value], 0x30),
];

/// A classified operand as written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operand<'a> {
    /// A register keyword, which may also be a label reference.
    Reg(Reg, &'a str),
    Value(&'a str),
    Mem(&'a str),
    Invalid,
}

impl<'a> Operand<'a> {
    fn classify(text: &'a str) -> Self {
        if let Some(r) = Reg::from_keyword(text) {
            return Operand::Reg(r, text);
        }
        if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            let inner = inner.trim();
            return if is_value_token(inner) {
                Operand::Mem(inner)
            } else {
                Operand::Invalid
            };
        }
        if is_value_token(text) {
            Operand::Value(text)
        } else {
            Operand::Invalid
        }
    }

    fn fits(self, slot: Slot) -> bool {
        match (slot, self) {
            (Slot::Reg(want), Operand::Reg(got, _)) => want == got,
            (Slot::Value, Operand::Value(_) | Operand::Reg(..)) => true,
            (Slot::Mem, Operand::Mem(_)) => true,
            _ => false,
        }
    }

    fn text(self) -> Option<&'a str> {
        match self {
            Operand::Value(t) | Operand::Mem(t) | Operand::Reg(_, t) => Some(t),
            Operand::Invalid => None,
        }
    }
}

/// `#`? then word characters and signs. Whether the text is a well-formed
/// number or a known label is decided when the operand is encoded.
fn is_value_token(s: &str) -> bool {
    let body = s.strip_prefix(operand::IMMEDIATE_MARKER).unwrap_or(s);
    !body.is_empty()
        && body
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+'))
}

/// Split `MNEMONIC op, op` into the mnemonic and its trimmed operands.
pub fn split_instruction(text: &str) -> (&str, Vec<&str>) {
    let text = text.trim();
    match text.split_once(char::is_whitespace) {
        None => (text, Vec::new()),
        Some((mnemonic, rest)) => {
            let rest = rest.trim();
            if rest.is_empty() {
                (mnemonic, Vec::new())
            } else {
                (mnemonic, rest.split(',').map(str::trim).collect())
            }
        }
    }
}

/// A form resolved against one line of source.
#[derive(Debug, Clone, Copy)]
pub struct Matched<'a> {
    pub desc: &'static InstrDesc,
    /// Text of the value or memory operand, with brackets removed.
    pub operand: Option<&'a str>,
}

/// The validated instruction table. Construction fails if two forms could
/// both match one line without one being strictly more register-specific,
/// so resolution never depends on table order.
#[derive(Debug, Clone)]
pub struct InstructionSet {
    forms: &'static [InstrDesc],
}

impl InstructionSet {
    pub fn new(forms: &'static [InstrDesc]) -> Result<Self, TableError> {
        for (i, first) in forms.iter().enumerate() {
            if let Some(second) = forms[i + 1..].iter().find(|f| first.ambiguous_with(f)) {
                return Err(TableError::Ambiguous {
                    first: first.to_string(),
                    second: second.to_string(),
                });
            }
        }
        Ok(Self { forms })
    }

    /// The CPU's instruction set. `TABLE` is checked by
    /// `standard_table_is_unambiguous` below.
    pub fn standard() -> Self {
        Self { forms: TABLE }
    }

    pub fn forms(&self) -> &'static [InstrDesc] {
        self.forms
    }

    /// The matching form with the most register slots; `MOV B, A` is the
    /// register move, `JMP a` jumps to label `a`.
    pub fn resolve<'a>(&self, text: &'a str) -> Option<Matched<'a>> {
        let (mnemonic, raw) = split_instruction(text);
        let operands: Vec<Operand<'a>> = raw.into_iter().map(Operand::classify).collect();
        let desc = self
            .forms
            .iter()
            .filter(|desc| {
                desc.mnemonic.eq_ignore_ascii_case(mnemonic)
                    && desc.slots.len() == operands.len()
                    && desc.slots.iter().zip(&operands).all(|(s, o)| o.fits(*s))
            })
            .max_by_key(|desc| desc.register_slots())?;
        let operand = desc
            .slots
            .iter()
            .zip(&operands)
            .find(|(slot, _)| !matches!(slot, Slot::Reg(_)))
            .and_then(|(_, o)| o.text());
        Some(Matched { desc, operand })
    }
}

impl Default for InstructionSet {
    fn default() -> Self {
        Self::standard()
    }
}
