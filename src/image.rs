use std::collections::BTreeMap;

/// Sparse, address-ordered byte image produced by pass 2.
///
/// Only bytes that were explicitly emitted are present; an emitted zero is
/// distinct from an address that was never written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeImage {
    bytes: BTreeMap<u32, u8>,
}

impl CodeImage {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn write_u8(&mut self, addr: u32, val: u8) {
        self.bytes.insert(addr, val);
    }

    pub fn read_u8(&self, addr: u32) -> Option<u8> {
        self.bytes.get(&addr).copied()
    }

    pub fn is_assigned(&self, addr: u32) -> bool {
        self.bytes.contains_key(&addr)
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of assigned bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn max_address(&self) -> Option<u32> {
        self.bytes.keys().next_back().copied()
    }

    /// One past the highest assigned address, or 0 for an empty image.
    pub fn end(&self) -> u32 {
        self.max_address().map_or(0, |a| a + 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u8)> + '_ {
        self.bytes.iter().map(|(a, b)| (*a, *b))
    }

    /// Dense copy from address 0 to the highest assigned address, gaps zeroed.
    pub fn to_dense(&self) -> Vec<u8> {
        let mut mem = vec![0u8; self.end() as usize];
        for (addr, val) in self.iter() {
            mem[addr as usize] = val;
        }
        mem
    }
}

impl FromIterator<(u32, u8)> for CodeImage {
    fn from_iter<I: IntoIterator<Item = (u32, u8)>>(iter: I) -> Self {
        Self {
            bytes: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_copy_zero_fills_gaps() {
        let img: CodeImage = [(0, 0xAA), (3, 0x00), (5, 0x11)].into_iter().collect();
        assert_eq!(img.end(), 6);
        assert_eq!(img.to_dense(), vec![0xAA, 0, 0, 0, 0, 0x11]);
        assert!(img.is_assigned(3));
        assert!(!img.is_assigned(4));
    }

    #[test]
    fn empty_image() {
        let img = CodeImage::new();
        assert_eq!(img.max_address(), None);
        assert_eq!(img.end(), 0);
        assert!(img.to_dense().is_empty());
    }
}
