// Sun Jan 25 2026 - Alex

use crate::memory::Address;
use std::sync::atomic::{AtomicU64, Ordering};

/// Published address of a hook's path back to the original function.
///
/// A handler can start receiving calls the instant its detour lands, which
/// may be before the installer has stored the trampoline. Readers that hit
/// that window spin; they never block, and a published value is never torn
/// (single aligned atomic store).
#[derive(Debug)]
pub struct TrampolineSlot {
    slot: AtomicU64,
}

impl TrampolineSlot {
    pub fn new() -> Self {
        Self { slot: AtomicU64::new(0) }
    }

    pub fn publish(&self, trampoline: Address) {
        self.slot.store(trampoline.as_u64(), Ordering::Release);
    }

    pub fn try_get(&self) -> Option<Address> {
        match self.slot.load(Ordering::Acquire) {
            0 => None,
            value => Some(Address::new(value)),
        }
    }

    /// Spin until the trampoline is published.
    pub fn wait(&self) -> Address {
        loop {
            if let Some(trampoline) = self.try_get() {
                return trampoline;
            }
            core::hint::spin_loop();
        }
    }
}

impl Default for TrampolineSlot {
    fn default() -> Self {
        Self::new()
    }
}
