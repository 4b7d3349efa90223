pub const COMMENT: char = ';';

/// A non-blank source line with its comment removed and label split off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// 1-based.
    pub number: usize,
    pub raw: &'a str,
    pub label: Option<&'a str>,
    /// Instruction or directive text, trimmed; may be empty.
    pub body: &'a str,
}

pub fn lines(src: &str) -> impl Iterator<Item = SourceLine<'_>> {
    src.lines().enumerate().filter_map(|(i, raw)| {
        let code = strip_comment(raw).trim();
        if code.is_empty() {
            return None;
        }
        let (label, body) = split_label(code);
        Some(SourceLine {
            number: i + 1,
            raw,
            label,
            body: body.trim(),
        })
    })
}

pub fn strip_comment(line: &str) -> &str {
    line.split_once(COMMENT).map_or(line, |(code, _)| code)
}

/// `ident:` at the start of the text, where ident is `[A-Za-z_][A-Za-z0-9_]*`.
pub fn split_label(text: &str) -> (Option<&str>, &str) {
    let Some((name, rest)) = text.split_once(':') else {
        return (None, text);
    };
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if head_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        (Some(name), rest)
    } else {
        (None, text)
    }
}
