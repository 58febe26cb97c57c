// Thu Jan 22 2026 - Alex

use crate::memory::{alloc_zeroed, raw, Address};
use crate::structs::handles::{ClassHandle, MethodHandle};

/// Field offsets of one method-descriptor layout revision.
/// `reflection_method` is the offset of the native method pointer inside a
/// managed reflection-method object, used by `method_from_reflection`.
pub struct MethodLayout {
    pub size: usize,
    pub method_ptr: usize,
    pub invoker: usize,
    pub name: usize,
    pub class: usize,
    pub return_type: usize,
    pub parameters: usize,
    pub flags: usize,
    pub slot: usize,
    pub parameter_count: usize,
    pub token: usize,
    pub reflection_method: usize,
}

pub const METHOD_LAYOUT_V16: MethodLayout = MethodLayout {
    size: 0x40,
    method_ptr: 0x00,
    invoker: 0x08,
    name: 0x10,
    class: 0x18,
    return_type: 0x20,
    parameters: 0x28,
    flags: 0x30,
    slot: 0x34,
    parameter_count: 0x36,
    token: 0x38,
    reflection_method: 0x10,
};

pub const METHOD_LAYOUT_V24: MethodLayout = MethodLayout {
    size: 0x48,
    method_ptr: 0x00,
    invoker: 0x08,
    name: 0x10,
    class: 0x18,
    return_type: 0x20,
    parameters: 0x28,
    token: 0x30,
    flags: 0x34,
    slot: 0x38,
    parameter_count: 0x3A,
    reflection_method: 0x10,
};

pub trait MethodAccessor: Send + Sync {
    fn size(&self) -> usize;
    fn allocate(&self) -> MethodHandle;
    fn wrap(&self, addr: Address) -> Option<MethodHandle>;

    fn method_ptr(&self, h: MethodHandle) -> Address;
    fn set_method_ptr(&self, h: MethodHandle, v: Address);
    fn invoker(&self, h: MethodHandle) -> Address;
    fn set_invoker(&self, h: MethodHandle, v: Address);
    fn name(&self, h: MethodHandle) -> Address;
    fn set_name(&self, h: MethodHandle, v: Address);
    fn class(&self, h: MethodHandle) -> Option<ClassHandle>;
    fn set_class(&self, h: MethodHandle, v: ClassHandle);
    fn return_type(&self, h: MethodHandle) -> Address;
    fn set_return_type(&self, h: MethodHandle, v: Address);
    fn parameters(&self, h: MethodHandle) -> Address;
    fn set_parameters(&self, h: MethodHandle, v: Address);
    fn flags(&self, h: MethodHandle) -> u16;
    fn set_flags(&self, h: MethodHandle, v: u16);
    fn slot(&self, h: MethodHandle) -> u16;
    fn set_slot(&self, h: MethodHandle, v: u16);
    fn parameter_count(&self, h: MethodHandle) -> u8;
    fn set_parameter_count(&self, h: MethodHandle, v: u8);
    fn token(&self, h: MethodHandle) -> u32;
    fn set_token(&self, h: MethodHandle, v: u32);
    /// Resolves the native method descriptor from a managed
    /// reflection-method object.
    fn method_from_reflection(&self, reflection_obj: Address) -> Option<MethodHandle>;
}

pub struct LayoutMethodAccessor {
    layout: &'static MethodLayout,
}

impl LayoutMethodAccessor {
    pub fn new(layout: &'static MethodLayout) -> Self {
        Self { layout }
    }
}

impl MethodAccessor for LayoutMethodAccessor {
    fn size(&self) -> usize {
        self.layout.size
    }

    fn allocate(&self) -> MethodHandle {
        MethodHandle::new(alloc_zeroed(self.layout.size))
    }

    fn wrap(&self, addr: Address) -> Option<MethodHandle> {
        if addr.is_null() {
            None
        } else {
            Some(MethodHandle::new(addr))
        }
    }

    fn method_ptr(&self, h: MethodHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.method_ptr) }
    }

    fn set_method_ptr(&self, h: MethodHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.method_ptr, v) }
    }

    fn invoker(&self, h: MethodHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.invoker) }
    }

    fn set_invoker(&self, h: MethodHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.invoker, v) }
    }

    fn name(&self, h: MethodHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.name) }
    }

    fn set_name(&self, h: MethodHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.name, v) }
    }

    fn class(&self, h: MethodHandle) -> Option<ClassHandle> {
        let class = unsafe { raw::read_ptr(h.address(), self.layout.class) };
        if class.is_null() {
            None
        } else {
            Some(ClassHandle::new(class))
        }
    }

    fn set_class(&self, h: MethodHandle, v: ClassHandle) {
        unsafe { raw::write_ptr(h.address(), self.layout.class, v.address()) }
    }

    fn return_type(&self, h: MethodHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.return_type) }
    }

    fn set_return_type(&self, h: MethodHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.return_type, v) }
    }

    fn parameters(&self, h: MethodHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.parameters) }
    }

    fn set_parameters(&self, h: MethodHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.parameters, v) }
    }

    fn flags(&self, h: MethodHandle) -> u16 {
        unsafe { raw::read_u16(h.address(), self.layout.flags) }
    }

    fn set_flags(&self, h: MethodHandle, v: u16) {
        unsafe { raw::write_u16(h.address(), self.layout.flags, v) }
    }

    fn slot(&self, h: MethodHandle) -> u16 {
        unsafe { raw::read_u16(h.address(), self.layout.slot) }
    }

    fn set_slot(&self, h: MethodHandle, v: u16) {
        unsafe { raw::write_u16(h.address(), self.layout.slot, v) }
    }

    fn parameter_count(&self, h: MethodHandle) -> u8 {
        unsafe { raw::read_u8(h.address(), self.layout.parameter_count) }
    }

    fn set_parameter_count(&self, h: MethodHandle, v: u8) {
        unsafe { raw::write_u8(h.address(), self.layout.parameter_count, v) }
    }

    fn token(&self, h: MethodHandle) -> u32 {
        unsafe { raw::read_u32(h.address(), self.layout.token) }
    }

    fn set_token(&self, h: MethodHandle, v: u32) {
        unsafe { raw::write_u32(h.address(), self.layout.token, v) }
    }

    fn method_from_reflection(&self, reflection_obj: Address) -> Option<MethodHandle> {
        if reflection_obj.is_null() {
            return None;
        }
        let method = unsafe { raw::read_ptr(reflection_obj, self.layout.reflection_method) };
        self.wrap(method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_null_returns_none() {
        let accessor = LayoutMethodAccessor::new(&METHOD_LAYOUT_V16);
        assert!(accessor.wrap(Address::zero()).is_none());
    }

    #[test]
    fn test_packed_tail_fields_roundtrip() {
        for layout in [&METHOD_LAYOUT_V16, &METHOD_LAYOUT_V24] {
            let accessor = LayoutMethodAccessor::new(layout);
            let h = accessor.allocate();
            accessor.set_flags(h, 0x0016);
            accessor.set_slot(h, 12);
            accessor.set_parameter_count(h, 3);
            accessor.set_token(h, 0x0600_0042);

            assert_eq!(accessor.flags(h), 0x0016);
            assert_eq!(accessor.slot(h), 12);
            assert_eq!(accessor.parameter_count(h), 3);
            assert_eq!(accessor.token(h), 0x0600_0042);
        }
    }

    #[test]
    fn test_method_from_reflection_reads_through_object() {
        let accessor = LayoutMethodAccessor::new(&METHOD_LAYOUT_V16);
        let method = accessor.allocate();

        let mut reflection_obj = [0u8; 0x20];
        let obj_addr = Address::from_ptr(reflection_obj.as_ptr());
        unsafe { raw::write_ptr(obj_addr, 0x10, method.address()) };

        assert_eq!(accessor.method_from_reflection(obj_addr), Some(method));
        assert_eq!(accessor.method_from_reflection(Address::zero()), None);
        let _ = reflection_obj;
    }
}
