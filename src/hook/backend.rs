// Sun Jan 25 2026 - Alex

use crate::hook::HookError;
use crate::memory::Address;

/// Redirects the function at `target` to `handler` and returns an address
/// that reaches the original behavior.
///
/// One install per target, ever; re-hooking an address is undefined.
pub trait DetourBackend: Send + Sync {
    /// # Safety
    /// `target` must be a hookable code location the backend understands and
    /// no other thread may be mid-patch at the same address.
    unsafe fn install(&self, target: Address, handler: Address) -> Result<Address, HookError>;
}
