use tracing::{debug, info};

use crate::error::{AsmError, AsmErrorKind};
use crate::image::CodeImage;
use crate::instructions::{split_instruction, InstructionSet, Matched};
use crate::operand;
use crate::source::{self, SourceLine};
use crate::symbols::SymbolTable;

pub const DATA_DIRECTIVE: &str = "DB";

/// What a single line assembles to.
#[derive(Debug, Clone)]
enum Statement<'a> {
    Empty,
    Instr(Matched<'a>),
    Data(Vec<&'a str>),
}

impl Statement<'_> {
    fn size(&self) -> u32 {
        match self {
            Statement::Empty => 0,
            Statement::Instr(m) => m.desc.size(),
            Statement::Data(items) => items.len() as u32,
        }
    }
}

/// Result of pass 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub symbols: SymbolTable,
    /// Final location counter, i.e. the program size in bytes.
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    pub symbols: SymbolTable,
    pub image: CodeImage,
}

/// Two-pass assembler. Both passes classify each line the same way, so pass 1
/// sizes exactly what pass 2 emits.
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    set: InstructionSet,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instructions(set: InstructionSet) -> Self {
        Self { set }
    }

    fn classify<'a>(&self, line: &SourceLine<'a>) -> Result<Statement<'a>, AsmError> {
        if line.body.is_empty() {
            return Ok(Statement::Empty);
        }
        if let Some(m) = self.set.resolve(line.body) {
            return Ok(Statement::Instr(m));
        }
        let (mnemonic, _) = split_instruction(line.body);
        if mnemonic.eq_ignore_ascii_case(DATA_DIRECTIVE) {
            let operands = line.body[mnemonic.len()..].trim();
            if operands.is_empty() {
                return Err(AsmError::new(AsmErrorKind::EmptyDirective, line.number, line.raw));
            }
            let items: Vec<&str> = operands.split(',').map(str::trim).collect();
            if items.iter().any(|s| s.is_empty()) {
                return Err(AsmError::new(
                    AsmErrorKind::MalformedDirective(operands.to_string()),
                    line.number,
                    line.raw,
                ));
            }
            return Ok(Statement::Data(items));
        }
        Err(AsmError::new(
            AsmErrorKind::UnknownMnemonic(mnemonic.to_ascii_uppercase()),
            line.number,
            line.raw,
        ))
    }

    /// Bind labels and size every line. Emits nothing.
    pub fn pass1(&self, src: &str) -> Result<Layout, AsmError> {
        let mut symbols = SymbolTable::new();
        let mut lc: u32 = 0;
        for line in source::lines(src) {
            if let Some(label) = line.label {
                symbols
                    .define(label, lc)
                    .map_err(|kind| AsmError::new(kind, line.number, line.raw))?;
                debug!(label, addr = lc, "label defined");
            }
            lc += self.classify(&line)?.size();
        }
        info!(labels = symbols.len(), size = lc, "pass 1 complete");
        Ok(Layout { symbols, size: lc })
    }

    /// Encode every line against a complete symbol table.
    pub fn pass2(&self, src: &str, symbols: &SymbolTable) -> Result<CodeImage, AsmError> {
        let mut image = CodeImage::new();
        let mut lc: u32 = 0;
        for line in source::lines(src) {
            let at_line = |kind: AsmErrorKind| AsmError::new(kind, line.number, line.raw);
            let start = lc;
            let bytes = match self.classify(&line)? {
                Statement::Empty => continue,
                Statement::Instr(m) => {
                    image.write_u8(lc, m.desc.opcode);
                    lc += 1;
                    m.desc
                        .encode_operands(m.operand, symbols, lc)
                        .map_err(at_line)?
                }
                Statement::Data(items) => items
                    .into_iter()
                    .map(|item| operand::parse_byte(item, symbols))
                    .collect::<Result<Vec<u8>, _>>()
                    .map_err(at_line)?,
            };
            for b in &bytes {
                image.write_u8(lc, *b);
                lc += 1;
            }
            debug!(
                addr = start,
                line = line.raw.trim(),
                bytes = ?(start..lc).filter_map(|a| image.read_u8(a)).collect::<Vec<_>>(),
                "assembled"
            );
        }
        info!(bytes = image.len(), "pass 2 complete");
        Ok(image)
    }

    pub fn assemble(&self, src: &str) -> Result<Assembly, AsmError> {
        let layout = self.pass1(src)?;
        let image = self.pass2(src, &layout.symbols)?;
        debug_assert_eq!(image.end(), layout.size, "pass 1 and pass 2 disagree on size");
        Ok(Assembly {
            symbols: layout.symbols,
            image,
        })
    }
}

/// Assemble with the standard instruction set.
pub fn assemble(src: &str) -> Result<Assembly, AsmError> {
    Assembler::new().assemble(src)
}
