// Thu Jan 22 2026 - Alex

use crate::memory::{alloc_zeroed, raw, Address};
use crate::structs::handles::ImageHandle;

/// Field offsets of one image-descriptor layout revision. `name_no_ext`
/// only exists on newer layouts; callers probe `has_name_no_ext` instead of
/// branching on versions.
pub struct ImageLayout {
    pub size: usize,
    pub name: usize,
    pub name_no_ext: Option<usize>,
    pub assembly: usize,
    pub token_count: usize,
    pub dynamic: usize,
}

pub const IMAGE_LAYOUT_V16: ImageLayout = ImageLayout {
    size: 0x28,
    name: 0x00,
    name_no_ext: None,
    assembly: 0x08,
    token_count: 0x10,
    dynamic: 0x14,
};

pub const IMAGE_LAYOUT_V24: ImageLayout = ImageLayout {
    size: 0x30,
    name: 0x00,
    name_no_ext: Some(0x08),
    assembly: 0x10,
    token_count: 0x18,
    dynamic: 0x1C,
};

pub trait ImageAccessor: Send + Sync {
    fn size(&self) -> usize;
    fn allocate(&self) -> ImageHandle;
    fn wrap(&self, addr: Address) -> Option<ImageHandle>;

    fn name(&self, h: ImageHandle) -> Address;
    fn set_name(&self, h: ImageHandle, v: Address);
    fn has_name_no_ext(&self) -> bool;
    fn name_no_ext(&self, h: ImageHandle) -> Option<Address>;
    fn set_name_no_ext(&self, h: ImageHandle, v: Address);
    fn assembly(&self, h: ImageHandle) -> Address;
    fn set_assembly(&self, h: ImageHandle, v: Address);
    fn token_count(&self, h: ImageHandle) -> u32;
    fn set_token_count(&self, h: ImageHandle, v: u32);
    fn dynamic(&self, h: ImageHandle) -> u8;
    fn set_dynamic(&self, h: ImageHandle, v: u8);
}

pub struct LayoutImageAccessor {
    layout: &'static ImageLayout,
}

impl LayoutImageAccessor {
    pub fn new(layout: &'static ImageLayout) -> Self {
        Self { layout }
    }
}

impl ImageAccessor for LayoutImageAccessor {
    fn size(&self) -> usize {
        self.layout.size
    }

    fn allocate(&self) -> ImageHandle {
        ImageHandle::new(alloc_zeroed(self.layout.size))
    }

    fn wrap(&self, addr: Address) -> Option<ImageHandle> {
        if addr.is_null() {
            None
        } else {
            Some(ImageHandle::new(addr))
        }
    }

    fn name(&self, h: ImageHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.name) }
    }

    fn set_name(&self, h: ImageHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.name, v) }
    }

    fn has_name_no_ext(&self) -> bool {
        self.layout.name_no_ext.is_some()
    }

    fn name_no_ext(&self, h: ImageHandle) -> Option<Address> {
        self.layout
            .name_no_ext
            .map(|offset| unsafe { raw::read_ptr(h.address(), offset) })
    }

    fn set_name_no_ext(&self, h: ImageHandle, v: Address) {
        if let Some(offset) = self.layout.name_no_ext {
            unsafe { raw::write_ptr(h.address(), offset, v) }
        }
    }

    fn assembly(&self, h: ImageHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.assembly) }
    }

    fn set_assembly(&self, h: ImageHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.assembly, v) }
    }

    fn token_count(&self, h: ImageHandle) -> u32 {
        unsafe { raw::read_u32(h.address(), self.layout.token_count) }
    }

    fn set_token_count(&self, h: ImageHandle, v: u32) {
        unsafe { raw::write_u32(h.address(), self.layout.token_count, v) }
    }

    fn dynamic(&self, h: ImageHandle) -> u8 {
        unsafe { raw::read_u8(h.address(), self.layout.dynamic) }
    }

    fn set_dynamic(&self, h: ImageHandle, v: u8) {
        unsafe { raw::write_u8(h.address(), self.layout.dynamic, v) }
    }
}
