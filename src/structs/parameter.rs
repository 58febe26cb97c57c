// Thu Jan 22 2026 - Alex

use crate::memory::{alloc_zeroed, raw, Address};
use crate::structs::handles::ParameterHandle;

/// Field offsets of one parameter-descriptor layout revision. Newer layouts
/// collapse the descriptor to a bare type pointer array, dropping name,
/// position and token; those offsets become `None` and callers probe
/// `has_name_pos_token`.
pub struct ParameterLayout {
    pub size: usize,
    pub name: Option<usize>,
    pub position: Option<usize>,
    pub token: Option<usize>,
    pub type_ptr: usize,
}

pub const PARAMETER_LAYOUT_V16: ParameterLayout = ParameterLayout {
    size: 0x18,
    name: Some(0x00),
    position: Some(0x08),
    token: Some(0x0C),
    type_ptr: 0x10,
};

pub const PARAMETER_LAYOUT_V27: ParameterLayout = ParameterLayout {
    size: 0x08,
    name: None,
    position: None,
    token: None,
    type_ptr: 0x00,
};

pub trait ParameterAccessor: Send + Sync {
    fn size(&self) -> usize;
    fn allocate(&self) -> ParameterHandle;
    /// Parameters live in contiguous arrays owned by their method.
    fn allocate_array(&self, count: usize) -> ParameterHandle;
    fn wrap(&self, addr: Address) -> Option<ParameterHandle>;
    /// Element `index` of an array allocated by `allocate_array`.
    fn element(&self, array: ParameterHandle, index: usize) -> ParameterHandle;

    fn has_name_pos_token(&self) -> bool;
    fn name(&self, h: ParameterHandle) -> Option<Address>;
    fn set_name(&self, h: ParameterHandle, v: Address);
    fn position(&self, h: ParameterHandle) -> Option<i32>;
    fn set_position(&self, h: ParameterHandle, v: i32);
    fn token(&self, h: ParameterHandle) -> Option<u32>;
    fn set_token(&self, h: ParameterHandle, v: u32);
    fn type_ptr(&self, h: ParameterHandle) -> Address;
    fn set_type_ptr(&self, h: ParameterHandle, v: Address);
}

pub struct LayoutParameterAccessor {
    layout: &'static ParameterLayout,
}

impl LayoutParameterAccessor {
    pub fn new(layout: &'static ParameterLayout) -> Self {
        Self { layout }
    }
}

impl ParameterAccessor for LayoutParameterAccessor {
    fn size(&self) -> usize {
        self.layout.size
    }

    fn allocate(&self) -> ParameterHandle {
        ParameterHandle::new(alloc_zeroed(self.layout.size))
    }

    fn allocate_array(&self, count: usize) -> ParameterHandle {
        ParameterHandle::new(alloc_zeroed(self.layout.size * count.max(1)))
    }

    fn wrap(&self, addr: Address) -> Option<ParameterHandle> {
        if addr.is_null() {
            None
        } else {
            Some(ParameterHandle::new(addr))
        }
    }

    fn element(&self, array: ParameterHandle, index: usize) -> ParameterHandle {
        ParameterHandle::new(array.address() + (index * self.layout.size) as u64)
    }

    fn has_name_pos_token(&self) -> bool {
        self.layout.name.is_some()
    }

    fn name(&self, h: ParameterHandle) -> Option<Address> {
        self.layout.name.map(|offset| unsafe { raw::read_ptr(h.address(), offset) })
    }

    fn set_name(&self, h: ParameterHandle, v: Address) {
        if let Some(offset) = self.layout.name {
            unsafe { raw::write_ptr(h.address(), offset, v) }
        }
    }

    fn position(&self, h: ParameterHandle) -> Option<i32> {
        self.layout.position.map(|offset| unsafe { raw::read_i32(h.address(), offset) })
    }

    fn set_position(&self, h: ParameterHandle, v: i32) {
        if let Some(offset) = self.layout.position {
            unsafe { raw::write_i32(h.address(), offset, v) }
        }
    }

    fn token(&self, h: ParameterHandle) -> Option<u32> {
        self.layout.token.map(|offset| unsafe { raw::read_u32(h.address(), offset) })
    }

    fn set_token(&self, h: ParameterHandle, v: u32) {
        if let Some(offset) = self.layout.token {
            unsafe { raw::write_u32(h.address(), offset, v) }
        }
    }

    fn type_ptr(&self, h: ParameterHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.type_ptr) }
    }

    fn set_type_ptr(&self, h: ParameterHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.type_ptr, v) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_null_returns_none() {
        let accessor = LayoutParameterAccessor::new(&PARAMETER_LAYOUT_V16);
        assert!(accessor.wrap(Address::zero()).is_none());
    }

    #[test]
    fn test_name_pos_token_probe() {
        let old = LayoutParameterAccessor::new(&PARAMETER_LAYOUT_V16);
        let new = LayoutParameterAccessor::new(&PARAMETER_LAYOUT_V27);
        assert!(old.has_name_pos_token());
        assert!(!new.has_name_pos_token());

        let h = new.allocate();
        assert_eq!(new.name(h), None);
        assert_eq!(new.position(h), None);
        assert_eq!(new.token(h), None);
    }

    #[test]
    fn test_array_elements_stride_by_size() {
        for layout in [&PARAMETER_LAYOUT_V16, &PARAMETER_LAYOUT_V27] {
            let accessor = LayoutParameterAccessor::new(layout);
            let array = accessor.allocate_array(3);

            for i in 0..3 {
                let element = accessor.element(array, i);
                accessor.set_type_ptr(element, Address::new(0x100 + i as u64));
            }
            for i in 0..3 {
                let element = accessor.element(array, i);
                assert_eq!(accessor.type_ptr(element), Address::new(0x100 + i as u64));
            }
        }
    }
}
