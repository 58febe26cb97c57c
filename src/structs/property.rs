// Thu Jan 22 2026 - Alex

use crate::memory::{alloc_zeroed, raw, Address};
use crate::structs::handles::{ClassHandle, MethodHandle, PropertyHandle};

pub struct PropertyLayout {
    pub size: usize,
    pub parent: usize,
    pub name: usize,
    pub get: usize,
    pub set: usize,
    pub attrs: usize,
}

pub const PROPERTY_LAYOUT_V16: PropertyLayout = PropertyLayout {
    size: 0x28,
    parent: 0x00,
    name: 0x08,
    get: 0x10,
    set: 0x18,
    attrs: 0x20,
};

pub const PROPERTY_LAYOUT_V24: PropertyLayout = PropertyLayout {
    size: 0x30,
    parent: 0x00,
    name: 0x08,
    get: 0x10,
    set: 0x18,
    attrs: 0x20,
};

pub trait PropertyAccessor: Send + Sync {
    fn size(&self) -> usize;
    fn allocate(&self) -> PropertyHandle;
    fn wrap(&self, addr: Address) -> Option<PropertyHandle>;

    fn parent(&self, h: PropertyHandle) -> Option<ClassHandle>;
    fn set_parent(&self, h: PropertyHandle, v: ClassHandle);
    fn name(&self, h: PropertyHandle) -> Address;
    fn set_name(&self, h: PropertyHandle, v: Address);
    fn get_method(&self, h: PropertyHandle) -> Option<MethodHandle>;
    fn set_get_method(&self, h: PropertyHandle, v: MethodHandle);
    fn set_method(&self, h: PropertyHandle) -> Option<MethodHandle>;
    fn set_set_method(&self, h: PropertyHandle, v: MethodHandle);
    fn attrs(&self, h: PropertyHandle) -> u32;
    fn set_attrs(&self, h: PropertyHandle, v: u32);
}

pub struct LayoutPropertyAccessor {
    layout: &'static PropertyLayout,
}

impl LayoutPropertyAccessor {
    pub fn new(layout: &'static PropertyLayout) -> Self {
        Self { layout }
    }

    fn method_at(&self, h: PropertyHandle, offset: usize) -> Option<MethodHandle> {
        let method = unsafe { raw::read_ptr(h.address(), offset) };
        if method.is_null() {
            None
        } else {
            Some(MethodHandle::new(method))
        }
    }
}

impl PropertyAccessor for LayoutPropertyAccessor {
    fn size(&self) -> usize {
        self.layout.size
    }

    fn allocate(&self) -> PropertyHandle {
        PropertyHandle::new(alloc_zeroed(self.layout.size))
    }

    fn wrap(&self, addr: Address) -> Option<PropertyHandle> {
        if addr.is_null() {
            None
        } else {
            Some(PropertyHandle::new(addr))
        }
    }

    fn parent(&self, h: PropertyHandle) -> Option<ClassHandle> {
        let parent = unsafe { raw::read_ptr(h.address(), self.layout.parent) };
        if parent.is_null() {
            None
        } else {
            Some(ClassHandle::new(parent))
        }
    }

    fn set_parent(&self, h: PropertyHandle, v: ClassHandle) {
        unsafe { raw::write_ptr(h.address(), self.layout.parent, v.address()) }
    }

    fn name(&self, h: PropertyHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.name) }
    }

    fn set_name(&self, h: PropertyHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.name, v) }
    }

    fn get_method(&self, h: PropertyHandle) -> Option<MethodHandle> {
        self.method_at(h, self.layout.get)
    }

    fn set_get_method(&self, h: PropertyHandle, v: MethodHandle) {
        unsafe { raw::write_ptr(h.address(), self.layout.get, v.address()) }
    }

    fn set_method(&self, h: PropertyHandle) -> Option<MethodHandle> {
        self.method_at(h, self.layout.set)
    }

    fn set_set_method(&self, h: PropertyHandle, v: MethodHandle) {
        unsafe { raw::write_ptr(h.address(), self.layout.set, v.address()) }
    }

    fn attrs(&self, h: PropertyHandle) -> u32 {
        unsafe { raw::read_u32(h.address(), self.layout.attrs) }
    }

    fn set_attrs(&self, h: PropertyHandle, v: u32) {
        unsafe { raw::write_u32(h.address(), self.layout.attrs, v) }
    }
}
