// Thu Jan 22 2026 - Alex

use crate::memory::{alloc_zeroed, raw, Address};
use crate::structs::handles::{ClassHandle, EventHandle, MethodHandle};

pub struct EventLayout {
    pub size: usize,
    pub name: usize,
    pub type_ptr: usize,
    pub parent: usize,
    pub add: usize,
    pub remove: usize,
    pub raise: usize,
}

pub const EVENT_LAYOUT_V16: EventLayout = EventLayout {
    size: 0x38,
    name: 0x00,
    type_ptr: 0x08,
    parent: 0x10,
    add: 0x18,
    remove: 0x20,
    raise: 0x28,
};

pub const EVENT_LAYOUT_V24: EventLayout = EventLayout {
    size: 0x40,
    name: 0x00,
    type_ptr: 0x08,
    parent: 0x10,
    add: 0x18,
    remove: 0x20,
    raise: 0x28,
};

pub trait EventAccessor: Send + Sync {
    fn size(&self) -> usize;
    fn allocate(&self) -> EventHandle;
    fn wrap(&self, addr: Address) -> Option<EventHandle>;

    fn name(&self, h: EventHandle) -> Address;
    fn set_name(&self, h: EventHandle, v: Address);
    fn type_ptr(&self, h: EventHandle) -> Address;
    fn set_type_ptr(&self, h: EventHandle, v: Address);
    fn parent(&self, h: EventHandle) -> Option<ClassHandle>;
    fn set_parent(&self, h: EventHandle, v: ClassHandle);
    fn add(&self, h: EventHandle) -> Option<MethodHandle>;
    fn set_add(&self, h: EventHandle, v: MethodHandle);
    fn remove(&self, h: EventHandle) -> Option<MethodHandle>;
    fn set_remove(&self, h: EventHandle, v: MethodHandle);
    fn raise(&self, h: EventHandle) -> Option<MethodHandle>;
    fn set_raise(&self, h: EventHandle, v: MethodHandle);
}

pub struct LayoutEventAccessor {
    layout: &'static EventLayout,
}

impl LayoutEventAccessor {
    pub fn new(layout: &'static EventLayout) -> Self {
        Self { layout }
    }

    fn method_at(&self, h: EventHandle, offset: usize) -> Option<MethodHandle> {
        let method = unsafe { raw::read_ptr(h.address(), offset) };
        if method.is_null() {
            None
        } else {
            Some(MethodHandle::new(method))
        }
    }
}

impl EventAccessor for LayoutEventAccessor {
    fn size(&self) -> usize {
        self.layout.size
    }

    fn allocate(&self) -> EventHandle {
        EventHandle::new(alloc_zeroed(self.layout.size))
    }

    fn wrap(&self, addr: Address) -> Option<EventHandle> {
        if addr.is_null() {
            None
        } else {
            Some(EventHandle::new(addr))
        }
    }

    fn name(&self, h: EventHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.name) }
    }

    fn set_name(&self, h: EventHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.name, v) }
    }

    fn type_ptr(&self, h: EventHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.type_ptr) }
    }

    fn set_type_ptr(&self, h: EventHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.type_ptr, v) }
    }

    fn parent(&self, h: EventHandle) -> Option<ClassHandle> {
        let parent = unsafe { raw::read_ptr(h.address(), self.layout.parent) };
        if parent.is_null() {
            None
        } else {
            Some(ClassHandle::new(parent))
        }
    }

    fn set_parent(&self, h: EventHandle, v: ClassHandle) {
        unsafe { raw::write_ptr(h.address(), self.layout.parent, v.address()) }
    }

    fn add(&self, h: EventHandle) -> Option<MethodHandle> {
        self.method_at(h, self.layout.add)
    }

    fn set_add(&self, h: EventHandle, v: MethodHandle) {
        unsafe { raw::write_ptr(h.address(), self.layout.add, v.address()) }
    }

    fn remove(&self, h: EventHandle) -> Option<MethodHandle> {
        self.method_at(h, self.layout.remove)
    }

    fn set_remove(&self, h: EventHandle, v: MethodHandle) {
        unsafe { raw::write_ptr(h.address(), self.layout.remove, v.address()) }
    }

    fn raise(&self, h: EventHandle) -> Option<MethodHandle> {
        self.method_at(h, self.layout.raise)
    }

    fn set_raise(&self, h: EventHandle, v: MethodHandle) {
        unsafe { raw::write_ptr(h.address(), self.layout.raise, v.address()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_null_returns_none() {
        let accessor = LayoutEventAccessor::new(&EVENT_LAYOUT_V16);
        assert!(accessor.wrap(Address::zero()).is_none());
    }

    #[test]
    fn test_handler_methods_roundtrip() {
        let accessor = LayoutEventAccessor::new(&EVENT_LAYOUT_V24);
        let h = accessor.allocate();

        assert!(accessor.raise(h).is_none());
        accessor.set_add(h, MethodHandle::new(Address::new(0xA)));
        accessor.set_remove(h, MethodHandle::new(Address::new(0xB)));
        accessor.set_raise(h, MethodHandle::new(Address::new(0xC)));
        assert_eq!(accessor.add(h).unwrap().address(), Address::new(0xA));
        assert_eq!(accessor.remove(h).unwrap().address(), Address::new(0xB));
        assert_eq!(accessor.raise(h).unwrap().address(), Address::new(0xC));
    }
}
