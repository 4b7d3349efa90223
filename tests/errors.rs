use mcasm_rs::{assemble, AsmError, AsmErrorKind};
use pretty_assertions::assert_eq;

fn fail(src: &str) -> AsmError {
    assemble(src).unwrap_err()
}

#[test]
fn duplicate_label_cites_second_definition() {
    let err = fail("foo: NOP\n\nFOO: HALT");
    assert_eq!(err.kind, AsmErrorKind::DuplicateLabel("foo".into()));
    assert_eq!(err.line, 3);
    assert_eq!(err.text, "FOO: HALT");
}

#[test]
fn undefined_label_cites_instruction_line() {
    let err = fail("NOP\nMOV A, #unknown_label");
    assert_eq!(err.kind, AsmErrorKind::UndefinedLabel("unknown_label".into()));
    assert_eq!(err.line, 2);
    assert_eq!(err.text, "MOV A, #unknown_label");
}

#[test]
fn out_of_range_operand() {
    let err = fail("MOV A, 300");
    assert_eq!(err.kind, AsmErrorKind::OutOfRange("300".into()));
    assert_eq!(err.line, 1);
}

#[test]
fn label_past_8_bits_cannot_be_an_operand() {
    let mut src = String::from("JMP end\n");
    for _ in 0..130 {
        src.push_str("MOV A, 0\n");
    }
    src.push_str("end: HALT\n");
    let err = fail(&src);
    assert_eq!(err.kind, AsmErrorKind::OutOfRange("end".into()));
    assert_eq!(err.line, 1);
}

#[test]
fn malformed_number_in_db() {
    let err = fail("DB 1, 0xZZ");
    assert_eq!(err.kind, AsmErrorKind::MalformedNumber("0xZZ".into()));
}

#[test]
fn signed_hex_is_malformed_everywhere() {
    let kind = AsmErrorKind::MalformedNumber("0x-1".into());
    assert_eq!(fail("MOV A, 0x-1").kind, kind);
    assert_eq!(fail("DB 0x-1").kind, kind);
    assert_eq!(fail("JMP #0x-1").kind, kind);
}

#[test]
fn unknown_mnemonic_reports_line_and_text() {
    let err = fail("NOP\n  frob A ; what\n");
    assert_eq!(err.kind, AsmErrorKind::UnknownMnemonic("FROB".into()));
    assert_eq!(err.line, 2);
    assert_eq!(err.text, "frob A ; what");
}

#[test]
fn known_mnemonic_with_wrong_operands_is_unknown() {
    let err = fail("MOV C, 1");
    assert_eq!(err.kind, AsmErrorKind::UnknownMnemonic("MOV".into()));
}

#[test]
fn db_without_operands() {
    assert_eq!(fail("x: DB").kind, AsmErrorKind::EmptyDirective);
    assert_eq!(fail("DB   ; nothing").kind, AsmErrorKind::EmptyDirective);
}

#[test]
fn db_with_empty_item() {
    assert_eq!(fail("DB 1,,2").kind, AsmErrorKind::MalformedDirective("1,,2".into()));
}

#[test]
fn pass1_errors_stop_before_pass2() {
    // The undefined label on line 1 is never reached: pass 1 fails first.
    let err = fail("JMP nowhere\nbogus");
    assert_eq!(err.kind, AsmErrorKind::UnknownMnemonic("BOGUS".into()));
    assert_eq!(err.line, 2);
}

#[test]
fn error_message_is_readable() {
    let err = fail("MOV A, #nope");
    assert_eq!(err.to_string(), "undefined label 'nope' (at line 1: \"MOV A, #nope\")");
}
