// Thu Jan 22 2026 - Alex

use crate::memory::{alloc_zeroed, raw, Address};
use crate::structs::handles::AssemblyHandle;

/// Field offsets of one assembly-descriptor layout revision. `aname_name` is
/// the name pointer inside the inline assembly-name struct.
pub struct AssemblyLayout {
    pub size: usize,
    pub image: usize,
    pub token: usize,
    pub aname_name: usize,
}

pub const ASSEMBLY_LAYOUT_V16: AssemblyLayout = AssemblyLayout {
    size: 0x50,
    image: 0x00,
    token: 0x08,
    aname_name: 0x10,
};

pub const ASSEMBLY_LAYOUT_V24: AssemblyLayout = AssemblyLayout {
    size: 0x60,
    image: 0x00,
    token: 0x08,
    aname_name: 0x18,
};

pub trait AssemblyAccessor: Send + Sync {
    fn size(&self) -> usize;
    fn allocate(&self) -> AssemblyHandle;
    fn wrap(&self, addr: Address) -> Option<AssemblyHandle>;

    fn image(&self, h: AssemblyHandle) -> Address;
    fn set_image(&self, h: AssemblyHandle, v: Address);
    fn token(&self, h: AssemblyHandle) -> u32;
    fn set_token(&self, h: AssemblyHandle, v: u32);
    fn name(&self, h: AssemblyHandle) -> Address;
    fn set_name(&self, h: AssemblyHandle, v: Address);
}

pub struct LayoutAssemblyAccessor {
    layout: &'static AssemblyLayout,
}

impl LayoutAssemblyAccessor {
    pub fn new(layout: &'static AssemblyLayout) -> Self {
        Self { layout }
    }
}

impl AssemblyAccessor for LayoutAssemblyAccessor {
    fn size(&self) -> usize {
        self.layout.size
    }

    fn allocate(&self) -> AssemblyHandle {
        AssemblyHandle::new(alloc_zeroed(self.layout.size))
    }

    fn wrap(&self, addr: Address) -> Option<AssemblyHandle> {
        if addr.is_null() {
            None
        } else {
            Some(AssemblyHandle::new(addr))
        }
    }

    fn image(&self, h: AssemblyHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.image) }
    }

    fn set_image(&self, h: AssemblyHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.image, v) }
    }

    fn token(&self, h: AssemblyHandle) -> u32 {
        unsafe { raw::read_u32(h.address(), self.layout.token) }
    }

    fn set_token(&self, h: AssemblyHandle, v: u32) {
        unsafe { raw::write_u32(h.address(), self.layout.token, v) }
    }

    fn name(&self, h: AssemblyHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.aname_name) }
    }

    fn set_name(&self, h: AssemblyHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.aname_name, v) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_null_returns_none() {
        let accessor = LayoutAssemblyAccessor::new(&ASSEMBLY_LAYOUT_V16);
        assert!(accessor.wrap(Address::zero()).is_none());
    }

    #[test]
    fn test_name_lives_in_the_inline_aname() {
        for layout in [&ASSEMBLY_LAYOUT_V16, &ASSEMBLY_LAYOUT_V24] {
            let accessor = LayoutAssemblyAccessor::new(layout);
            let h = accessor.allocate();
            accessor.set_name(h, Address::new(0x1234));
            accessor.set_image(h, Address::new(0x5678));
            assert_eq!(accessor.name(h), Address::new(0x1234));
            assert_eq!(accessor.image(h), Address::new(0x5678));
        }
    }
}
