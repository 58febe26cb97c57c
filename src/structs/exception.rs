// Thu Jan 22 2026 - Alex

use crate::memory::{alloc_zeroed, raw, Address};
use crate::structs::handles::{ClassHandle, ExceptionHandle};

/// Exceptions are managed objects: the descriptor starts with the object
/// header (class pointer plus monitor word) and the offsets below follow it.
pub struct ExceptionLayout {
    pub size: usize,
    pub class: usize,
    pub message: usize,
    pub inner: usize,
}

pub const EXCEPTION_LAYOUT_V16: ExceptionLayout = ExceptionLayout {
    size: 0x90,
    class: 0x00,
    message: 0x18,
    inner: 0x20,
};

pub const EXCEPTION_LAYOUT_V24: ExceptionLayout = ExceptionLayout {
    size: 0x98,
    class: 0x00,
    message: 0x20,
    inner: 0x28,
};

pub trait ExceptionAccessor: Send + Sync {
    fn size(&self) -> usize;
    fn allocate(&self) -> ExceptionHandle;
    fn wrap(&self, addr: Address) -> Option<ExceptionHandle>;

    fn class(&self, h: ExceptionHandle) -> Option<ClassHandle>;
    fn set_class(&self, h: ExceptionHandle, v: ClassHandle);
    fn message(&self, h: ExceptionHandle) -> Address;
    fn set_message(&self, h: ExceptionHandle, v: Address);
    fn inner(&self, h: ExceptionHandle) -> Option<ExceptionHandle>;
    fn set_inner(&self, h: ExceptionHandle, v: ExceptionHandle);
}

pub struct LayoutExceptionAccessor {
    layout: &'static ExceptionLayout,
}

impl LayoutExceptionAccessor {
    pub fn new(layout: &'static ExceptionLayout) -> Self {
        Self { layout }
    }
}

impl ExceptionAccessor for LayoutExceptionAccessor {
    fn size(&self) -> usize {
        self.layout.size
    }

    fn allocate(&self) -> ExceptionHandle {
        ExceptionHandle::new(alloc_zeroed(self.layout.size))
    }

    fn wrap(&self, addr: Address) -> Option<ExceptionHandle> {
        if addr.is_null() {
            None
        } else {
            Some(ExceptionHandle::new(addr))
        }
    }

    fn class(&self, h: ExceptionHandle) -> Option<ClassHandle> {
        let class = unsafe { raw::read_ptr(h.address(), self.layout.class) };
        if class.is_null() {
            None
        } else {
            Some(ClassHandle::new(class))
        }
    }

    fn set_class(&self, h: ExceptionHandle, v: ClassHandle) {
        unsafe { raw::write_ptr(h.address(), self.layout.class, v.address()) }
    }

    fn message(&self, h: ExceptionHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.message) }
    }

    fn set_message(&self, h: ExceptionHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.message, v) }
    }

    fn inner(&self, h: ExceptionHandle) -> Option<ExceptionHandle> {
        let inner = unsafe { raw::read_ptr(h.address(), self.layout.inner) };
        if inner.is_null() {
            None
        } else {
            Some(ExceptionHandle::new(inner))
        }
    }

    fn set_inner(&self, h: ExceptionHandle, v: ExceptionHandle) {
        unsafe { raw::write_ptr(h.address(), self.layout.inner, v.address()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_null_returns_none() {
        let accessor = LayoutExceptionAccessor::new(&EXCEPTION_LAYOUT_V16);
        assert!(accessor.wrap(Address::zero()).is_none());
    }

    #[test]
    fn test_inner_chain() {
        let accessor = LayoutExceptionAccessor::new(&EXCEPTION_LAYOUT_V24);
        let outer = accessor.allocate();
        let inner = accessor.allocate();

        assert!(accessor.inner(outer).is_none());
        accessor.set_inner(outer, inner);
        assert_eq!(accessor.inner(outer), Some(inner));
    }
}
