// Sun Jan 25 2026 - Alex

use crate::hook::{DetourBackend, HookError, TrampolineSlot};
use crate::memory::Address;
use log::debug;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// Couples a detour backend with trampoline publication and enforces the
/// one-install-per-address rule the backends themselves leave undefined.
pub struct HookInstaller<B: DetourBackend> {
    backend: B,
    installed: Mutex<HashSet<Address>>,
}

impl<B: DetourBackend> HookInstaller<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            installed: Mutex::new(HashSet::new()),
        }
    }

    /// Detours `target` to `handler` and publishes the trampoline into the
    /// returned slot. Share the slot with the handler before calling this;
    /// a handler entered before publication spin-waits on it.
    ///
    /// # Safety
    /// Same contract as the backend's `install`.
    pub unsafe fn install(
        &self,
        target: Address,
        handler: Address,
    ) -> Result<Arc<TrampolineSlot>, HookError> {
        let slot = Arc::new(TrampolineSlot::new());
        self.install_into(target, handler, &slot)?;
        Ok(slot)
    }

    /// As `install`, but publishes into a caller-owned slot.
    ///
    /// # Safety
    /// Same contract as the backend's `install`.
    pub unsafe fn install_into(
        &self,
        target: Address,
        handler: Address,
        slot: &TrampolineSlot,
    ) -> Result<(), HookError> {
        if !self.installed.lock().insert(target) {
            return Err(HookError::AlreadyInstalled { address: target });
        }
        let trampoline = self.backend.install(target, handler)?;
        slot.publish(trampoline);
        debug!("hooked {} -> {} (trampoline {})", target, handler, trampoline);
        Ok(())
    }
}
