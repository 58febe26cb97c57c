// Tue Jan 27 2026 - Alex

use crate::discovery::DiscoveryError;
use crate::hook::HookError;
use crate::memory::MemoryError;
use crate::symbol::SymbolError;
use crate::versioning::RegistryError;
use thiserror::Error;

/// Top-level error for context operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Memory(#[from] MemoryError),

    #[error(transparent)]
    Symbol(#[from] SymbolError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Hook(#[from] HookError),

    #[error("an interop context is already bound for shim dispatch")]
    AlreadyBound,
}
