// Mon Jan 19 2026 - Alex

use crate::memory::Address;
use std::alloc::{alloc_zeroed as std_alloc_zeroed, Layout};

/// Allocates `size` bytes of zeroed memory for a native struct.
///
/// Injected structs are handed to the VM and stay referenced for the life of
/// the process, so the allocation is never reclaimed.
pub fn alloc_zeroed(size: usize) -> Address {
    assert!(size > 0, "zero-sized native struct allocation");
    let layout = Layout::from_size_align(size, 8).expect("invalid struct layout");
    let ptr = unsafe { std_alloc_zeroed(layout) };
    assert!(!ptr.is_null(), "native struct allocation of {} bytes failed", size);
    Address::from_ptr(ptr)
}
