// Tue Jan 20 2026 - Alex

use crate::memory::{Address, ModuleImage};
use crate::pattern::{Pattern, SignatureDefinition};
use rayon::prelude::*;

const CALL_REL32: u8 = 0xE8;

/// Byte-pattern search over a module's code region.
pub struct SignatureScanner {
    chunk_size: usize,
    use_parallel: bool,
}

impl SignatureScanner {
    pub fn new() -> Self {
        Self {
            chunk_size: 0x10000,
            use_parallel: false,
        }
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    pub fn use_parallel(mut self, parallel: bool) -> Self {
        self.use_parallel = parallel;
        self
    }

    /// Tries `definitions` in declaration order and returns the first
    /// definition that matches anywhere in the code region. Later
    /// definitions are never consulted once an earlier one hits; there is no
    /// scoring across matches.
    pub fn scan(&self, module: &ModuleImage, definitions: &[SignatureDefinition]) -> Option<Address> {
        for definition in definitions {
            if let Some(match_addr) = self.scan_pattern(module, &definition.pattern) {
                return if definition.xref {
                    self.resolve_call_site(module, match_addr)
                } else {
                    Some(match_addr)
                };
            }
        }
        None
    }

    pub fn scan_pattern(&self, module: &ModuleImage, pattern: &Pattern) -> Option<Address> {
        let code = module.code_bytes();
        let start = module.code().start;

        if self.use_parallel {
            self.scan_parallel(code, start, pattern)
        } else {
            pattern.find_in(code).map(|offset| start + offset as u64)
        }
    }

    fn scan_parallel(&self, code: &[u8], start: Address, pattern: &Pattern) -> Option<Address> {
        if pattern.is_empty() || code.len() < pattern.len() {
            return None;
        }

        let overlap = pattern.len() - 1;
        let step = self.chunk_size.max(pattern.len());

        (0..code.len())
            .into_par_iter()
            .step_by(step)
            .filter_map(|offset| {
                let end = (offset + step + overlap).min(code.len());
                pattern.find_in(&code[offset..end]).map(|hit| offset + hit)
            })
            .min()
            .map(|offset| start + offset as u64)
    }

    /// Reads the relative call at a match site flagged `xref` and returns
    /// its destination.
    pub fn resolve_call_site(&self, module: &ModuleImage, match_addr: Address) -> Option<Address> {
        if module.read_u8(match_addr).ok()? != CALL_REL32 {
            return None;
        }
        let rel = module.read_i32(match_addr + 1).ok()?;
        Some(match_addr.offset(5 + rel as i64))
    }
}

impl Default for SignatureScanner {
    fn default() -> Self {
        Self::new()
    }
}
