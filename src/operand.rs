use crate::error::AsmErrorKind;
use crate::symbols::SymbolTable;

pub const IMMEDIATE_MARKER: char = '#';

/// Accepts both signed and unsigned 8-bit readings.
pub const MIN_VALUE: i64 = -128;
pub const MAX_VALUE: i64 = 255;

/// Resolve one operand of an instruction or `DB` to the byte that gets
/// emitted: an optional `#`, then `0x` hex, signed decimal, or a label.
pub fn parse_byte(text: &str, symbols: &SymbolTable) -> Result<u8, AsmErrorKind> {
    let text = text.trim();
    let body = text.strip_prefix(IMMEDIATE_MARKER).unwrap_or(text).trim();
    let malformed = || AsmErrorKind::MalformedNumber(body.to_string());

    if body.is_empty() {
        return Err(malformed());
    }

    let value = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(malformed());
        }
        i64::from_str_radix(hex, 16).map_err(|_| malformed())?
    } else if is_numeric(body) {
        body.parse::<i64>().map_err(|_| malformed())?
    } else {
        let addr = symbols
            .get(body)
            .ok_or_else(|| AsmErrorKind::UndefinedLabel(body.to_string()))?;
        if addr > 0xFF {
            return Err(AsmErrorKind::OutOfRange(body.to_string()));
        }
        return Ok(addr as u8);
    };

    if !(MIN_VALUE..=MAX_VALUE).contains(&value) {
        return Err(AsmErrorKind::OutOfRange(body.to_string()));
    }
    Ok(value as u8)
}

fn is_numeric(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    digits.starts_with(|c: char| c.is_ascii_digit())
}
