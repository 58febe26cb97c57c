// Mon Jan 19 2026 - Alex

use crate::memory::Address;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ExportedSymbol {
    pub name: String,
    pub address: Address,
}

#[derive(Default)]
pub struct ExportTable {
    exports: HashMap<String, ExportedSymbol>,
    by_address: HashMap<u64, String>,
}

impl ExportTable {
    pub fn new() -> Self {
        Self {
            exports: HashMap::new(),
            by_address: HashMap::new(),
        }
    }

    pub fn add(&mut self, export: ExportedSymbol) {
        self.by_address.insert(export.address.as_u64(), export.name.clone());
        self.exports.insert(export.name.clone(), export);
    }

    pub fn get_by_name(&self, name: &str) -> Option<&ExportedSymbol> {
        self.exports.get(name)
    }

    pub fn get_by_address(&self, addr: Address) -> Option<&ExportedSymbol> {
        self.by_address.get(&addr.as_u64()).and_then(|name| self.exports.get(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExportedSymbol> {
        self.exports.values()
    }

    pub fn len(&self) -> usize {
        self.exports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exports.is_empty()
    }
}
