use mcasm_rs::{assemble, Assembler};
use pretty_assertions::assert_eq;

#[test]
fn label_and_jump_example() {
    let asm = assemble("START: MOV A, #5\nJMP START").unwrap();
    assert_eq!(asm.symbols.get("start"), Some(0));
    assert_eq!(asm.image.to_dense(), vec![0x06, 0x05, 0x04, 0x00]);
}

#[test]
fn forward_and_backward_references_agree() {
    let src = "\
        JMP target      ; forward
        NOP
target: HALT
        JZ  TARGET      ; backward, different case
";
    let asm = assemble(src).unwrap();
    assert_eq!(asm.symbols.get("target"), Some(3));
    assert_eq!(asm.image.to_dense(), vec![0x04, 0x03, 0x01, 0x0C, 0x1A, 0x03]);
}

#[test]
fn db_occupies_one_byte_per_literal() {
    let asm = assemble("NOP\ntable: DB 1,2,3\nMOV A, [table]").unwrap();
    assert_eq!(asm.symbols.get("table"), Some(1));
    assert_eq!(asm.image.read_u8(1), Some(1));
    assert_eq!(asm.image.read_u8(2), Some(2));
    assert_eq!(asm.image.read_u8(3), Some(3));
    assert_eq!(asm.image.read_u8(4), Some(0x16));
    assert_eq!(asm.image.read_u8(5), Some(0x01));
}

#[test]
fn db_accepts_mixed_literals_and_labels() {
    let asm = assemble("here: db 0x10, -1, #255, here ,HERE").unwrap();
    assert_eq!(asm.image.to_dense(), vec![0x10, 0xFF, 0xFF, 0x00, 0x00]);
}

#[test]
fn pass2_ends_where_pass1_predicted() {
    let src = "\
; every form once
        NOP
        INPUT
        OUTPUT
loop:   JMP loop
        MOV A, 1
        INC A
        MOV B, A
        ADD A, B
        HALT
        MOV SP, 0xFF
        PUSH A
        POP A
        MOV A, [var]
        JZ loop
        MOV [var], A
        INC B
        DEC A
        DEC B
        ADD B, A
        SUB A, B
        SUB B, A
        SWAP A, B
        MOV B, #var
var:    DB 0
";
    let asm = Assembler::new();
    let layout = asm.pass1(src).unwrap();
    let image = asm.pass2(src, &layout.symbols).unwrap();
    assert_eq!(image.end(), layout.size);
    assert_eq!(layout.size, 31);
    assert_eq!(layout.symbols.get("var"), Some(30));
    assert_eq!(
        image.to_dense(),
        vec![
            0x01, 0x02, 0x03, 0x04, 0x03, 0x06, 0x01, 0x08, 0x09, 0x0A, 0x0C, 0x0D, 0xFF, 0x0F,
            0x13, 0x16, 0x1E, 0x1A, 0x03, 0x20, 0x1E, 0x24, 0x25, 0x26, 0x27, 0x29, 0x2B, 0x2D,
            0x30, 0x1E, 0x00,
        ]
    );
}

#[test]
fn mnemonics_and_registers_ignore_case_and_spacing() {
    let a = assemble("mov   a ,  #0x2A\nswap a,b").unwrap();
    let b = assemble("MOV A,#0x2a\nSWAP A , B").unwrap();
    assert_eq!(a.image, b.image);
    assert_eq!(a.image.to_dense(), vec![0x06, 0x2A, 0x2D]);
}

#[test]
fn register_form_wins_over_label_of_same_name() {
    let asm = assemble("MOV B, A\nMOV B, #a\na: HALT").unwrap();
    assert_eq!(asm.image.to_dense(), vec![0x09, 0x30, 0x03, 0x0C]);
}

#[test]
fn labels_named_like_registers_are_operands() {
    let src = "a: NOP\nb: JMP a\nsp: MOV A, b\nMOV SP, sp\nJZ b\nMOV B, A";
    let asm = assemble(src).unwrap();
    assert_eq!(
        asm.image.to_dense(),
        vec![0x01, 0x04, 0x00, 0x06, 0x01, 0x0D, 0x03, 0x1A, 0x01, 0x09]
    );
}

#[test]
fn empty_program() {
    let asm = assemble("; nothing here\n\n   \n").unwrap();
    assert!(asm.image.is_empty());
    assert!(asm.symbols.is_empty());
}
