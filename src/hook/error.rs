// Sun Jan 25 2026 - Alex

use crate::memory::Address;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HookError {
    #[error("hook already installed at {address}")]
    AlreadyInstalled { address: Address },

    #[error("cannot decode prologue instruction {opcode:#04x} at {address}")]
    UnsupportedPrologue { address: Address, opcode: u8 },

    #[error("changing page protection at {address} failed (errno {errno})")]
    ProtectFailed { address: Address, errno: i32 },

    #[error("trampoline buffer allocation failed (errno {errno})")]
    TrampolineAllocFailed { errno: i32 },
}
