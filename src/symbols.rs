use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::error::AsmErrorKind;

/// Label name (stored lower-cased) to address, filled by pass 1 only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    labels: BTreeMap<String, u32>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn define(&mut self, name: &str, addr: u32) -> Result<(), AsmErrorKind> {
        match self.labels.entry(name.to_ascii_lowercase()) {
            Entry::Occupied(e) => Err(AsmErrorKind::DuplicateLabel(e.key().clone())),
            Entry::Vacant(e) => {
                e.insert(addr);
                Ok(())
            }
        }
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<u32> {
        self.labels.get(&name.to_ascii_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.labels.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
