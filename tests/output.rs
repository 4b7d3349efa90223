use mcasm_rs::output::{binary, memimage};
use mcasm_rs::{assemble, Artifacts, CodeImage, OutputConfig};
use pretty_assertions::assert_eq;

#[test]
fn binary_is_dense_up_to_max_address() {
    let img: CodeImage = [(0, 0x11), (4, 0x22)].into_iter().collect();
    let bytes = binary(&img);
    assert_eq!(bytes.len(), 5);
    assert_eq!(bytes, vec![0x11, 0, 0, 0, 0x22]);
}

#[test]
fn empty_program_outputs() {
    let asm = assemble("").unwrap();
    let out = Artifacts::render(&asm.image, OutputConfig::program()).unwrap();
    assert!(out.binary.is_empty());
    assert_eq!(out.memimage, "v2.0 raw\n0\n");
}

#[test]
fn memimage_words_are_lowercase_without_padding() {
    let asm = assemble("MOV A, 0xAB\nNOP\nDB 0, 0x0f").unwrap();
    let text = memimage(&asm.image, OutputConfig::program()).unwrap();
    assert_eq!(text, "v2.0 raw\n6 ab 1 0 f\n");
}

#[test]
fn assigned_zero_word_is_kept_but_gaps_are_not() {
    // Explicit trailing zero byte stays in the output.
    let asm = assemble("NOP\nDB 0").unwrap();
    assert_eq!(memimage(&asm.image, OutputConfig::program()).unwrap(), "v2.0 raw\n1 0\n");

    // An assigned zero in a later word keeps that word; nothing past it.
    let img: CodeImage = [(0, 0x01), (7, 0x00)].into_iter().collect();
    let text = memimage(&img, OutputConfig { word_bits: 16 }).unwrap();
    assert_eq!(text, "v2.0 raw\n100 0 0 0\n");
}

#[test]
fn artifacts_write_both_files() {
    let dir = std::env::temp_dir();
    let tag = std::process::id();
    let bin = dir.join(format!("_mcasm_out_{tag}.bin"));
    let img = dir.join(format!("_mcasm_out_{tag}.logisimimg"));

    let asm = assemble("START: MOV A, #5\nJMP START").unwrap();
    Artifacts::render(&asm.image, OutputConfig::program())
        .unwrap()
        .write(&bin, &img)
        .unwrap();

    assert_eq!(std::fs::read(&bin).unwrap(), vec![0x06, 0x05, 0x04, 0x00]);
    assert_eq!(std::fs::read_to_string(&img).unwrap(), "v2.0 raw\n6 5 4 0\n");
    let _ = std::fs::remove_file(&bin);
    let _ = std::fs::remove_file(&img);
}

#[test]
fn failed_write_leaves_no_binary_behind() {
    let dir = std::env::temp_dir();
    let tag = std::process::id();
    let bin = dir.join(format!("_mcasm_partial_{tag}.bin"));
    let img = dir.join(format!("_mcasm_no_such_dir_{tag}")).join("out.logisimimg");

    let asm = assemble("NOP\nHALT").unwrap();
    let out = Artifacts::render(&asm.image, OutputConfig::program()).unwrap();
    assert!(out.write(&bin, &img).is_err());

    assert!(!bin.exists());
    assert!(!dir.join(format!("_mcasm_partial_{tag}.bin.part")).exists());
    assert!(!img.exists());
}
