// Mon Jan 19 2026 - Alex
//
// Unchecked field access against live native memory. Reads and writes go
// straight through the pointer, so they are immediately visible to the VM.
// Callers supply offsets from the resolved version-specific layout tables.

use crate::memory::Address;

pub unsafe fn read_u8(base: Address, offset: usize) -> u8 {
    base.as_ptr().add(offset).read()
}

pub unsafe fn read_u16(base: Address, offset: usize) -> u16 {
    (base.as_ptr().add(offset) as *const u16).read_unaligned()
}

pub unsafe fn read_u32(base: Address, offset: usize) -> u32 {
    (base.as_ptr().add(offset) as *const u32).read_unaligned()
}

pub unsafe fn read_i32(base: Address, offset: usize) -> i32 {
    (base.as_ptr().add(offset) as *const i32).read_unaligned()
}

pub unsafe fn read_u64(base: Address, offset: usize) -> u64 {
    (base.as_ptr().add(offset) as *const u64).read_unaligned()
}

pub unsafe fn read_ptr(base: Address, offset: usize) -> Address {
    Address::new((base.as_ptr().add(offset) as *const u64).read_unaligned())
}

pub unsafe fn write_u8(base: Address, offset: usize, value: u8) {
    base.as_mut_ptr().add(offset).write(value);
}

pub unsafe fn write_u16(base: Address, offset: usize, value: u16) {
    (base.as_mut_ptr().add(offset) as *mut u16).write_unaligned(value);
}

pub unsafe fn write_u32(base: Address, offset: usize, value: u32) {
    (base.as_mut_ptr().add(offset) as *mut u32).write_unaligned(value);
}

pub unsafe fn write_i32(base: Address, offset: usize, value: i32) {
    (base.as_mut_ptr().add(offset) as *mut i32).write_unaligned(value);
}

pub unsafe fn write_u64(base: Address, offset: usize, value: u64) {
    (base.as_mut_ptr().add(offset) as *mut u64).write_unaligned(value);
}

pub unsafe fn write_ptr(base: Address, offset: usize, value: Address) {
    (base.as_mut_ptr().add(offset) as *mut u64).write_unaligned(value.as_u64());
}
