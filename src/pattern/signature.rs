// Tue Jan 20 2026 - Alex

use crate::pattern::Pattern;

/// One scannable definition for a target routine.
///
/// When `xref` is set the match site is the `E8 rel32` call into the real
/// target, not the target itself; the scanner reads the displacement and
/// returns the call destination.
#[derive(Debug, Clone)]
pub struct SignatureDefinition {
    pub pattern: Pattern,
    pub xref: bool,
}

impl SignatureDefinition {
    pub fn new(pattern: Pattern) -> Self {
        Self { pattern, xref: false }
    }

    pub fn from_hex(hex: &str) -> Self {
        Self::new(Pattern::from_hex(hex))
    }

    pub fn with_xref(mut self) -> Self {
        self.xref = true;
        self
    }
}
