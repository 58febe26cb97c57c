// Thu Jan 22 2026 - Alex

use crate::memory::{alloc_zeroed, raw, Address};
use crate::structs::handles::{ClassHandle, FieldHandle};

pub struct FieldLayout {
    pub size: usize,
    pub name: usize,
    pub type_ptr: usize,
    pub parent: usize,
    pub offset: usize,
    pub token: usize,
}

pub const FIELD_LAYOUT_V16: FieldLayout = FieldLayout {
    size: 0x20,
    name: 0x00,
    type_ptr: 0x08,
    parent: 0x10,
    offset: 0x18,
    token: 0x1C,
};

pub const FIELD_LAYOUT_V24: FieldLayout = FieldLayout {
    size: 0x20,
    name: 0x00,
    type_ptr: 0x08,
    parent: 0x10,
    offset: 0x1C,
    token: 0x18,
};

pub trait FieldAccessor: Send + Sync {
    fn size(&self) -> usize;
    fn allocate(&self) -> FieldHandle;
    fn wrap(&self, addr: Address) -> Option<FieldHandle>;

    fn name(&self, h: FieldHandle) -> Address;
    fn set_name(&self, h: FieldHandle, v: Address);
    fn type_ptr(&self, h: FieldHandle) -> Address;
    fn set_type_ptr(&self, h: FieldHandle, v: Address);
    fn parent(&self, h: FieldHandle) -> Option<ClassHandle>;
    fn set_parent(&self, h: FieldHandle, v: ClassHandle);
    fn offset(&self, h: FieldHandle) -> i32;
    fn set_offset(&self, h: FieldHandle, v: i32);
    fn token(&self, h: FieldHandle) -> u32;
    fn set_token(&self, h: FieldHandle, v: u32);
    /// Address of the field entry `index` slots after this one in the
    /// owning class's field array.
    fn sibling(&self, h: FieldHandle, index: usize) -> FieldHandle;
}

pub struct LayoutFieldAccessor {
    layout: &'static FieldLayout,
}

impl LayoutFieldAccessor {
    pub fn new(layout: &'static FieldLayout) -> Self {
        Self { layout }
    }
}

impl FieldAccessor for LayoutFieldAccessor {
    fn size(&self) -> usize {
        self.layout.size
    }

    fn allocate(&self) -> FieldHandle {
        FieldHandle::new(alloc_zeroed(self.layout.size))
    }

    fn wrap(&self, addr: Address) -> Option<FieldHandle> {
        if addr.is_null() {
            None
        } else {
            Some(FieldHandle::new(addr))
        }
    }

    fn name(&self, h: FieldHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.name) }
    }

    fn set_name(&self, h: FieldHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.name, v) }
    }

    fn type_ptr(&self, h: FieldHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.type_ptr) }
    }

    fn set_type_ptr(&self, h: FieldHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.type_ptr, v) }
    }

    fn parent(&self, h: FieldHandle) -> Option<ClassHandle> {
        let parent = unsafe { raw::read_ptr(h.address(), self.layout.parent) };
        if parent.is_null() {
            None
        } else {
            Some(ClassHandle::new(parent))
        }
    }

    fn set_parent(&self, h: FieldHandle, v: ClassHandle) {
        unsafe { raw::write_ptr(h.address(), self.layout.parent, v.address()) }
    }

    fn offset(&self, h: FieldHandle) -> i32 {
        unsafe { raw::read_i32(h.address(), self.layout.offset) }
    }

    fn set_offset(&self, h: FieldHandle, v: i32) {
        unsafe { raw::write_i32(h.address(), self.layout.offset, v) }
    }

    fn token(&self, h: FieldHandle) -> u32 {
        unsafe { raw::read_u32(h.address(), self.layout.token) }
    }

    fn set_token(&self, h: FieldHandle, v: u32) {
        unsafe { raw::write_u32(h.address(), self.layout.token, v) }
    }

    fn sibling(&self, h: FieldHandle, index: usize) -> FieldHandle {
        FieldHandle::new(h.address() + (index * self.layout.size) as u64)
    }
}
