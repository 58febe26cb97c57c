// Sat Jan 24 2026 - Alex

use crate::memory::Address;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("ambiguous call shape while locating {routine}: {candidates} targets at {address}")]
    AmbiguousCallTarget {
        routine: &'static str,
        address: Address,
        candidates: usize,
    },

    #[error("unsupported binary: every strategy for {routine} failed (module base {module_base})")]
    UnsupportedBinary {
        routine: &'static str,
        module_base: Address,
    },
}
