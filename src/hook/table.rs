// Sun Jan 25 2026 - Alex

use crate::hook::{DetourBackend, HookError};
use crate::memory::Address;
use std::sync::atomic::{AtomicU64, Ordering};

/// Function-pointer table standing in for patchable code in tests. Callers
/// dispatch through `get`; hooking swaps the slot.
pub struct DispatchTable {
    slots: Box<[AtomicU64]>,
}

impl DispatchTable {
    pub fn new(len: usize) -> Self {
        let slots = (0..len).map(|_| AtomicU64::new(0)).collect::<Vec<_>>();
        Self { slots: slots.into_boxed_slice() }
    }

    pub fn set(&self, index: usize, target: Address) {
        self.slots[index].store(target.as_u64(), Ordering::Release);
    }

    pub fn get(&self, index: usize) -> Address {
        Address::new(self.slots[index].load(Ordering::Acquire))
    }

    /// Address of the slot itself, usable as a detour target.
    pub fn slot_address(&self, index: usize) -> Address {
        Address::from_ptr(&self.slots[index] as *const AtomicU64)
    }
}

/// Backend that detours through a `DispatchTable` slot: the handler goes
/// into the slot and the previous occupant is the trampoline. Lets the whole
/// hook coordination run in-process without touching live code.
pub struct TableDetour;

impl TableDetour {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TableDetour {
    fn default() -> Self {
        Self::new()
    }
}

impl DetourBackend for TableDetour {
    unsafe fn install(&self, target: Address, handler: Address) -> Result<Address, HookError> {
        // target points at an AtomicU64 slot owned by a DispatchTable
        let slot = &*(target.as_ptr() as *const AtomicU64);
        let previous = slot.swap(handler.as_u64(), Ordering::AcqRel);
        Ok(Address::new(previous))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_swaps_slot_and_returns_old_target() {
        let table = DispatchTable::new(4);
        table.set(2, Address::new(0x1111));

        let backend = TableDetour::new();
        let trampoline =
            unsafe { backend.install(table.slot_address(2), Address::new(0x2222)) }.unwrap();

        assert_eq!(trampoline, Address::new(0x1111));
        assert_eq!(table.get(2), Address::new(0x2222));
    }
}
