// Thu Jan 22 2026 - Alex

use crate::memory::{alloc_zeroed, raw, Address};
use crate::structs::handles::TypeHandle;

/// Element kind stored in a native type descriptor. Values follow the VM's
/// metadata encoding; only the ones the bridge inspects are spelled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TypeKind {
    End = 0x00,
    Void = 0x01,
    Boolean = 0x02,
    Char = 0x03,
    I4 = 0x08,
    U4 = 0x09,
    I8 = 0x0A,
    U8 = 0x0B,
    R4 = 0x0C,
    R8 = 0x0D,
    String = 0x0E,
    Ptr = 0x0F,
    ByRef = 0x10,
    ValueType = 0x11,
    Class = 0x12,
    Var = 0x13,
    Array = 0x14,
    GenericInst = 0x15,
    Object = 0x1C,
    SzArray = 0x1D,
}

impl TypeKind {
    pub fn from_u8(raw: u8) -> Option<Self> {
        let kind = match raw {
            0x00 => TypeKind::End,
            0x01 => TypeKind::Void,
            0x02 => TypeKind::Boolean,
            0x03 => TypeKind::Char,
            0x08 => TypeKind::I4,
            0x09 => TypeKind::U4,
            0x0A => TypeKind::I8,
            0x0B => TypeKind::U8,
            0x0C => TypeKind::R4,
            0x0D => TypeKind::R8,
            0x0E => TypeKind::String,
            0x0F => TypeKind::Ptr,
            0x10 => TypeKind::ByRef,
            0x11 => TypeKind::ValueType,
            0x12 => TypeKind::Class,
            0x13 => TypeKind::Var,
            0x14 => TypeKind::Array,
            0x15 => TypeKind::GenericInst,
            0x1C => TypeKind::Object,
            0x1D => TypeKind::SzArray,
            _ => return None,
        };
        Some(kind)
    }
}

/// Field offsets of one type-descriptor layout revision. The trailing flag
/// byte repacked across metadata revisions, so bit positions are part of the
/// table.
pub struct TypeLayout {
    pub size: usize,
    pub data: usize,
    pub attrs: usize,
    pub kind: usize,
    pub bits: usize,
    pub byref_bit: u8,
    pub pinned_bit: u8,
}

pub const TYPE_LAYOUT_V16: TypeLayout = TypeLayout {
    size: 0x10,
    data: 0x00,
    attrs: 0x08,
    kind: 0x0A,
    bits: 0x0B,
    byref_bit: 0,
    pinned_bit: 1,
};

pub const TYPE_LAYOUT_V27: TypeLayout = TypeLayout {
    size: 0x10,
    data: 0x00,
    attrs: 0x08,
    kind: 0x0A,
    bits: 0x0B,
    byref_bit: 1,
    pinned_bit: 2,
};

pub trait TypeAccessor: Send + Sync {
    fn size(&self) -> usize;
    fn allocate(&self) -> TypeHandle;
    fn wrap(&self, addr: Address) -> Option<TypeHandle>;

    /// The payload word: typedef index, class pointer or generic handle
    /// depending on `kind`.
    fn data(&self, h: TypeHandle) -> Address;
    fn set_data(&self, h: TypeHandle, v: Address);
    fn attrs(&self, h: TypeHandle) -> u16;
    fn set_attrs(&self, h: TypeHandle, v: u16);
    fn kind(&self, h: TypeHandle) -> Option<TypeKind>;
    fn raw_kind(&self, h: TypeHandle) -> u8;
    fn set_kind(&self, h: TypeHandle, v: TypeKind);
    fn byref(&self, h: TypeHandle) -> bool;
    fn set_byref(&self, h: TypeHandle, v: bool);
    fn pinned(&self, h: TypeHandle) -> bool;
    fn set_pinned(&self, h: TypeHandle, v: bool);
}

pub struct LayoutTypeAccessor {
    layout: &'static TypeLayout,
}

impl LayoutTypeAccessor {
    pub fn new(layout: &'static TypeLayout) -> Self {
        Self { layout }
    }

    fn bit(&self, h: TypeHandle, bit: u8) -> bool {
        let bits = unsafe { raw::read_u8(h.address(), self.layout.bits) };
        bits & (1 << bit) != 0
    }

    fn set_bit(&self, h: TypeHandle, bit: u8, v: bool) {
        let mut bits = unsafe { raw::read_u8(h.address(), self.layout.bits) };
        if v {
            bits |= 1 << bit;
        } else {
            bits &= !(1 << bit);
        }
        unsafe { raw::write_u8(h.address(), self.layout.bits, bits) };
    }
}

impl TypeAccessor for LayoutTypeAccessor {
    fn size(&self) -> usize {
        self.layout.size
    }

    fn allocate(&self) -> TypeHandle {
        TypeHandle::new(alloc_zeroed(self.layout.size))
    }

    fn wrap(&self, addr: Address) -> Option<TypeHandle> {
        if addr.is_null() {
            None
        } else {
            Some(TypeHandle::new(addr))
        }
    }

    fn data(&self, h: TypeHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.data) }
    }

    fn set_data(&self, h: TypeHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.data, v) }
    }

    fn attrs(&self, h: TypeHandle) -> u16 {
        unsafe { raw::read_u16(h.address(), self.layout.attrs) }
    }

    fn set_attrs(&self, h: TypeHandle, v: u16) {
        unsafe { raw::write_u16(h.address(), self.layout.attrs, v) }
    }

    fn kind(&self, h: TypeHandle) -> Option<TypeKind> {
        TypeKind::from_u8(self.raw_kind(h))
    }

    fn raw_kind(&self, h: TypeHandle) -> u8 {
        unsafe { raw::read_u8(h.address(), self.layout.kind) }
    }

    fn set_kind(&self, h: TypeHandle, v: TypeKind) {
        unsafe { raw::write_u8(h.address(), self.layout.kind, v as u8) }
    }

    fn byref(&self, h: TypeHandle) -> bool {
        self.bit(h, self.layout.byref_bit)
    }

    fn set_byref(&self, h: TypeHandle, v: bool) {
        self.set_bit(h, self.layout.byref_bit, v)
    }

    fn pinned(&self, h: TypeHandle) -> bool {
        self.bit(h, self.layout.pinned_bit)
    }

    fn set_pinned(&self, h: TypeHandle, v: bool) {
        self.set_bit(h, self.layout.pinned_bit, v)
    }
}
