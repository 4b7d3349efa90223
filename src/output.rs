use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::OutputError;
use crate::image::CodeImage;

pub const MEMIMAGE_HEADER: &str = "v2.0 raw";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Memory-image word width in bits; a multiple of 8.
    pub word_bits: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::program()
    }
}

impl OutputConfig {
    /// Program memory: one byte per word.
    pub fn program() -> Self {
        Self { word_bits: 8 }
    }

    /// Control store: 24-bit words.
    pub fn microcode() -> Self {
        Self { word_bits: 24 }
    }

    pub fn bytes_per_word(&self) -> Result<usize, OutputError> {
        if self.word_bits % 8 != 0 || self.word_bits > 64 {
            return Err(OutputError::WordWidth(self.word_bits));
        }
        Ok((self.word_bits / 8) as usize)
    }
}

/// Dense bytes from address 0 through the highest assigned address.
pub fn binary(image: &CodeImage) -> Vec<u8> {
    image.to_dense()
}

/// Render the memory-image text: header line, then one line of
/// space-separated lowercase hex words, most significant byte first.
///
/// Output stops at the last word holding any assigned byte, even when that
/// word's value is zero. An empty image renders as a single `0`.
pub fn memimage(image: &CodeImage, cfg: OutputConfig) -> Result<String, OutputError> {
    let bytes_per_word = cfg.bytes_per_word()?;
    let mut out = format!("{MEMIMAGE_HEADER}\n");

    if bytes_per_word == 0 {
        out.push('\n');
        return Ok(out);
    }
    let total_words = image
        .max_address()
        .map_or(0, |max| max as usize / bytes_per_word + 1);

    let mut words = Vec::with_capacity(total_words);
    let mut last_assigned = None;
    for idx in 0..total_words {
        let mut value = 0u64;
        let mut assigned = false;
        for i in 0..bytes_per_word {
            let addr = (idx * bytes_per_word + i) as u32;
            let byte = image.read_u8(addr);
            assigned |= byte.is_some();
            value = (value << 8) | u64::from(byte.unwrap_or(0));
        }
        words.push(value);
        if assigned {
            last_assigned = Some(idx);
        }
    }

    match last_assigned {
        None => out.push('0'),
        Some(last) => {
            let payload: Vec<String> = words[..=last].iter().map(|w| format!("{w:x}")).collect();
            out.push_str(&payload.join(" "));
        }
    }
    out.push('\n');
    Ok(out)
}

/// Both output files, rendered in memory so nothing is written unless the
/// whole run succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub binary: Vec<u8>,
    pub memimage: String,
}

impl Artifacts {
    pub fn render(image: &CodeImage, cfg: OutputConfig) -> Result<Self, OutputError> {
        Ok(Self {
            binary: binary(image),
            memimage: memimage(image, cfg)?,
        })
    }

    /// Write both files or neither. Each is staged next to its target and
    /// renamed into place once both have been written.
    pub fn write(&self, bin_path: &Path, image_path: &Path) -> Result<()> {
        let staged_bin = staging_path(bin_path);
        let staged_image = staging_path(image_path);
        let staged = stage(&staged_bin, &self.binary)
            .and_then(|()| stage(&staged_image, self.memimage.as_bytes()))
            .and_then(|()| commit(&staged_bin, bin_path));
        if staged.is_err() {
            let _ = fs::remove_file(&staged_bin);
            let _ = fs::remove_file(&staged_image);
            return staged;
        }
        commit(&staged_image, image_path).map_err(|e| {
            let _ = fs::remove_file(bin_path);
            let _ = fs::remove_file(&staged_image);
            e
        })
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

fn stage(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}

fn commit(staged: &Path, target: &Path) -> Result<()> {
    fs::rename(staged, target).with_context(|| format!("writing {}", target.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_width_must_be_byte_multiple() {
        assert_eq!(OutputConfig { word_bits: 12 }.bytes_per_word(), Err(OutputError::WordWidth(12)));
        assert_eq!(OutputConfig { word_bits: 72 }.bytes_per_word(), Err(OutputError::WordWidth(72)));
        assert_eq!(OutputConfig::microcode().bytes_per_word(), Ok(3));
    }

    #[test]
    fn zero_width_emits_no_words() {
        let img: CodeImage = [(0, 1)].into_iter().collect();
        let text = memimage(&img, OutputConfig { word_bits: 0 }).unwrap();
        assert_eq!(text, "v2.0 raw\n\n");
    }

    #[test]
    fn wide_words_pack_big_endian() {
        let img: CodeImage = [(0, 0x01), (1, 0x02), (2, 0x03), (5, 0x04)].into_iter().collect();
        let text = memimage(&img, OutputConfig::microcode()).unwrap();
        assert_eq!(text, "v2.0 raw\n10203 4\n");
    }
}
