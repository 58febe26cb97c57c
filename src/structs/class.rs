// Thu Jan 22 2026 - Alex

use crate::memory::{alloc_zeroed, raw, Address};
use crate::structs::handles::{ClassHandle, ImageHandle, TypeHandle};
use bitflags::bitflags;

bitflags! {
    /// Init-state bits of a class descriptor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClassFlags: u32 {
        const INITIALIZED            = 1 << 0;
        const INIT_PENDING           = 1 << 1;
        const SIZE_INITED            = 1 << 2;
        const VALUE_TYPE             = 1 << 3;
        const ENUM_TYPE              = 1 << 4;
        const HAS_FINALIZER          = 1 << 5;
        const HAS_REFERENCES         = 1 << 6;
        const IS_GENERIC             = 1 << 7;
        const IS_VTABLE_INITIALIZED  = 1 << 8;
    }
}

/// Field offsets of one class-descriptor layout revision.
///
/// `byval_arg` and `this_arg` are type descriptors embedded inline, so their
/// accessors yield handles into the class struct rather than pointer reads.
/// The vtable is a tail array of `vtable_slot_size` entries after `size`.
pub struct ClassLayout {
    pub size: usize,
    pub vtable_slot_size: usize,
    pub image: usize,
    pub name: usize,
    pub namespaze: usize,
    pub parent: usize,
    pub element_class: usize,
    pub byval_arg: usize,
    pub this_arg: usize,
    pub static_fields: usize,
    pub fields: usize,
    pub methods: usize,
    pub instance_size: usize,
    pub actual_size: usize,
    pub native_size: usize,
    pub flags: usize,
    pub typedef_token: usize,
    pub field_count: usize,
    pub method_count: usize,
    pub vtable_count: usize,
}

pub const CLASS_LAYOUT_V16: ClassLayout = ClassLayout {
    size: 0x80,
    vtable_slot_size: 0x10,
    image: 0x00,
    name: 0x08,
    namespaze: 0x10,
    parent: 0x18,
    element_class: 0x20,
    byval_arg: 0x28,
    this_arg: 0x38,
    static_fields: 0x48,
    fields: 0x50,
    methods: 0x58,
    instance_size: 0x60,
    actual_size: 0x64,
    native_size: 0x68,
    flags: 0x6C,
    typedef_token: 0x70,
    field_count: 0x74,
    method_count: 0x76,
    vtable_count: 0x78,
};

pub const CLASS_LAYOUT_V24: ClassLayout = ClassLayout {
    size: 0x88,
    vtable_slot_size: 0x10,
    image: 0x00,
    name: 0x10,
    namespaze: 0x18,
    parent: 0x20,
    element_class: 0x28,
    byval_arg: 0x30,
    this_arg: 0x40,
    static_fields: 0x50,
    fields: 0x58,
    methods: 0x60,
    instance_size: 0x68,
    actual_size: 0x6C,
    native_size: 0x70,
    flags: 0x74,
    typedef_token: 0x78,
    field_count: 0x7C,
    method_count: 0x7E,
    vtable_count: 0x80,
};

pub const CLASS_LAYOUT_V27: ClassLayout = ClassLayout {
    size: 0x90,
    vtable_slot_size: 0x10,
    image: 0x00,
    name: 0x10,
    namespaze: 0x18,
    byval_arg: 0x20,
    this_arg: 0x30,
    element_class: 0x40,
    parent: 0x48,
    static_fields: 0x50,
    fields: 0x58,
    methods: 0x60,
    instance_size: 0x68,
    actual_size: 0x6C,
    native_size: 0x70,
    flags: 0x74,
    typedef_token: 0x78,
    field_count: 0x7C,
    method_count: 0x7E,
    vtable_count: 0x80,
};

pub trait ClassAccessor: Send + Sync {
    fn size(&self) -> usize;
    fn allocate(&self) -> ClassHandle;
    /// Classes carry their vtable as a tail array, so injected classes size
    /// the allocation by slot count up front.
    fn allocate_with_vtable(&self, slots: usize) -> ClassHandle;
    fn wrap(&self, addr: Address) -> Option<ClassHandle>;

    fn image(&self, h: ClassHandle) -> Address;
    fn set_image(&self, h: ClassHandle, v: Address);
    fn name(&self, h: ClassHandle) -> Address;
    fn set_name(&self, h: ClassHandle, v: Address);
    fn namespaze(&self, h: ClassHandle) -> Address;
    fn set_namespaze(&self, h: ClassHandle, v: Address);
    fn parent(&self, h: ClassHandle) -> Address;
    fn set_parent(&self, h: ClassHandle, v: Address);
    fn element_class(&self, h: ClassHandle) -> Address;
    fn set_element_class(&self, h: ClassHandle, v: Address);
    fn byval_arg(&self, h: ClassHandle) -> TypeHandle;
    fn this_arg(&self, h: ClassHandle) -> TypeHandle;
    fn static_fields(&self, h: ClassHandle) -> Address;
    fn set_static_fields(&self, h: ClassHandle, v: Address);
    fn fields(&self, h: ClassHandle) -> Address;
    fn set_fields(&self, h: ClassHandle, v: Address);
    fn methods(&self, h: ClassHandle) -> Address;
    fn set_methods(&self, h: ClassHandle, v: Address);
    fn instance_size(&self, h: ClassHandle) -> u32;
    fn set_instance_size(&self, h: ClassHandle, v: u32);
    fn actual_size(&self, h: ClassHandle) -> u32;
    fn set_actual_size(&self, h: ClassHandle, v: u32);
    fn native_size(&self, h: ClassHandle) -> i32;
    fn set_native_size(&self, h: ClassHandle, v: i32);
    fn flags(&self, h: ClassHandle) -> ClassFlags;
    fn set_flags(&self, h: ClassHandle, v: ClassFlags);
    fn typedef_token(&self, h: ClassHandle) -> u32;
    fn set_typedef_token(&self, h: ClassHandle, v: u32);
    fn field_count(&self, h: ClassHandle) -> u16;
    fn set_field_count(&self, h: ClassHandle, v: u16);
    fn method_count(&self, h: ClassHandle) -> u16;
    fn set_method_count(&self, h: ClassHandle, v: u16);
    fn vtable_count(&self, h: ClassHandle) -> u16;
    fn set_vtable_count(&self, h: ClassHandle, v: u16);
    /// Address of vtable slot `index` in the tail array.
    fn vtable_slot(&self, h: ClassHandle, index: usize) -> Address;
    /// Resolves the class owning an image-relative view, used by the
    /// image accessor when wrapping classes of an image.
    fn owning_image(&self, h: ClassHandle) -> Option<ImageHandle>;
}

pub struct LayoutClassAccessor {
    layout: &'static ClassLayout,
}

impl LayoutClassAccessor {
    pub fn new(layout: &'static ClassLayout) -> Self {
        Self { layout }
    }
}

impl ClassAccessor for LayoutClassAccessor {
    fn size(&self) -> usize {
        self.layout.size
    }

    fn allocate(&self) -> ClassHandle {
        ClassHandle::new(alloc_zeroed(self.layout.size))
    }

    fn allocate_with_vtable(&self, slots: usize) -> ClassHandle {
        ClassHandle::new(alloc_zeroed(self.layout.size + slots * self.layout.vtable_slot_size))
    }

    fn wrap(&self, addr: Address) -> Option<ClassHandle> {
        if addr.is_null() {
            None
        } else {
            Some(ClassHandle::new(addr))
        }
    }

    fn image(&self, h: ClassHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.image) }
    }

    fn set_image(&self, h: ClassHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.image, v) }
    }

    fn name(&self, h: ClassHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.name) }
    }

    fn set_name(&self, h: ClassHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.name, v) }
    }

    fn namespaze(&self, h: ClassHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.namespaze) }
    }

    fn set_namespaze(&self, h: ClassHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.namespaze, v) }
    }

    fn parent(&self, h: ClassHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.parent) }
    }

    fn set_parent(&self, h: ClassHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.parent, v) }
    }

    fn element_class(&self, h: ClassHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.element_class) }
    }

    fn set_element_class(&self, h: ClassHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.element_class, v) }
    }

    fn byval_arg(&self, h: ClassHandle) -> TypeHandle {
        TypeHandle::new(h.address() + self.layout.byval_arg as u64)
    }

    fn this_arg(&self, h: ClassHandle) -> TypeHandle {
        TypeHandle::new(h.address() + self.layout.this_arg as u64)
    }

    fn static_fields(&self, h: ClassHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.static_fields) }
    }

    fn set_static_fields(&self, h: ClassHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.static_fields, v) }
    }

    fn fields(&self, h: ClassHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.fields) }
    }

    fn set_fields(&self, h: ClassHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.fields, v) }
    }

    fn methods(&self, h: ClassHandle) -> Address {
        unsafe { raw::read_ptr(h.address(), self.layout.methods) }
    }

    fn set_methods(&self, h: ClassHandle, v: Address) {
        unsafe { raw::write_ptr(h.address(), self.layout.methods, v) }
    }

    fn instance_size(&self, h: ClassHandle) -> u32 {
        unsafe { raw::read_u32(h.address(), self.layout.instance_size) }
    }

    fn set_instance_size(&self, h: ClassHandle, v: u32) {
        unsafe { raw::write_u32(h.address(), self.layout.instance_size, v) }
    }

    fn actual_size(&self, h: ClassHandle) -> u32 {
        unsafe { raw::read_u32(h.address(), self.layout.actual_size) }
    }

    fn set_actual_size(&self, h: ClassHandle, v: u32) {
        unsafe { raw::write_u32(h.address(), self.layout.actual_size, v) }
    }

    fn native_size(&self, h: ClassHandle) -> i32 {
        unsafe { raw::read_i32(h.address(), self.layout.native_size) }
    }

    fn set_native_size(&self, h: ClassHandle, v: i32) {
        unsafe { raw::write_i32(h.address(), self.layout.native_size, v) }
    }

    fn flags(&self, h: ClassHandle) -> ClassFlags {
        ClassFlags::from_bits_truncate(unsafe { raw::read_u32(h.address(), self.layout.flags) })
    }

    fn set_flags(&self, h: ClassHandle, v: ClassFlags) {
        unsafe { raw::write_u32(h.address(), self.layout.flags, v.bits()) }
    }

    fn typedef_token(&self, h: ClassHandle) -> u32 {
        unsafe { raw::read_u32(h.address(), self.layout.typedef_token) }
    }

    fn set_typedef_token(&self, h: ClassHandle, v: u32) {
        unsafe { raw::write_u32(h.address(), self.layout.typedef_token, v) }
    }

    fn field_count(&self, h: ClassHandle) -> u16 {
        unsafe { raw::read_u16(h.address(), self.layout.field_count) }
    }

    fn set_field_count(&self, h: ClassHandle, v: u16) {
        unsafe { raw::write_u16(h.address(), self.layout.field_count, v) }
    }

    fn method_count(&self, h: ClassHandle) -> u16 {
        unsafe { raw::read_u16(h.address(), self.layout.method_count) }
    }

    fn set_method_count(&self, h: ClassHandle, v: u16) {
        unsafe { raw::write_u16(h.address(), self.layout.method_count, v) }
    }

    fn vtable_count(&self, h: ClassHandle) -> u16 {
        unsafe { raw::read_u16(h.address(), self.layout.vtable_count) }
    }

    fn set_vtable_count(&self, h: ClassHandle, v: u16) {
        unsafe { raw::write_u16(h.address(), self.layout.vtable_count, v) }
    }

    fn vtable_slot(&self, h: ClassHandle, index: usize) -> Address {
        h.address() + (self.layout.size + index * self.layout.vtable_slot_size) as u64
    }

    fn owning_image(&self, h: ClassHandle) -> Option<ImageHandle> {
        let image = self.image(h);
        if image.is_null() {
            None
        } else {
            Some(ImageHandle::new(image))
        }
    }
}
