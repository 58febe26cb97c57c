// Fri Jan 23 2026 - Alex
//
// Static registration table of every versioned accessor implementation,
// with the lowest VM version each layout applies to.

use crate::structs::assembly::{LayoutAssemblyAccessor, ASSEMBLY_LAYOUT_V16, ASSEMBLY_LAYOUT_V24};
use crate::structs::class::{LayoutClassAccessor, CLASS_LAYOUT_V16, CLASS_LAYOUT_V24, CLASS_LAYOUT_V27};
use crate::structs::event::{LayoutEventAccessor, EVENT_LAYOUT_V16, EVENT_LAYOUT_V24};
use crate::structs::exception::{LayoutExceptionAccessor, EXCEPTION_LAYOUT_V16, EXCEPTION_LAYOUT_V24};
use crate::structs::field::{LayoutFieldAccessor, FIELD_LAYOUT_V16, FIELD_LAYOUT_V24};
use crate::structs::image::{LayoutImageAccessor, IMAGE_LAYOUT_V16, IMAGE_LAYOUT_V24};
use crate::structs::method::{LayoutMethodAccessor, METHOD_LAYOUT_V16, METHOD_LAYOUT_V24};
use crate::structs::parameter::{LayoutParameterAccessor, PARAMETER_LAYOUT_V16, PARAMETER_LAYOUT_V27};
use crate::structs::property::{LayoutPropertyAccessor, PROPERTY_LAYOUT_V16, PROPERTY_LAYOUT_V24};
use crate::structs::ty::{LayoutTypeAccessor, TYPE_LAYOUT_V16, TYPE_LAYOUT_V27};
use crate::structs::{
    AssemblyAccessor, ClassAccessor, EventAccessor, ExceptionAccessor, FieldAccessor,
    ImageAccessor, MethodAccessor, ParameterAccessor, PropertyAccessor, TypeAccessor,
};
use crate::versioning::{AccessorFactory, Capability, HandlerRegistry, RegistryError, VmVersion};
use std::sync::Arc;

pub fn assembly_v16() -> Arc<dyn AssemblyAccessor> {
    Arc::new(LayoutAssemblyAccessor::new(&ASSEMBLY_LAYOUT_V16))
}

pub fn assembly_v24() -> Arc<dyn AssemblyAccessor> {
    Arc::new(LayoutAssemblyAccessor::new(&ASSEMBLY_LAYOUT_V24))
}

pub fn class_v16() -> Arc<dyn ClassAccessor> {
    Arc::new(LayoutClassAccessor::new(&CLASS_LAYOUT_V16))
}

pub fn class_v24() -> Arc<dyn ClassAccessor> {
    Arc::new(LayoutClassAccessor::new(&CLASS_LAYOUT_V24))
}

pub fn class_v27() -> Arc<dyn ClassAccessor> {
    Arc::new(LayoutClassAccessor::new(&CLASS_LAYOUT_V27))
}

pub fn event_v16() -> Arc<dyn EventAccessor> {
    Arc::new(LayoutEventAccessor::new(&EVENT_LAYOUT_V16))
}

pub fn event_v24() -> Arc<dyn EventAccessor> {
    Arc::new(LayoutEventAccessor::new(&EVENT_LAYOUT_V24))
}

pub fn exception_v16() -> Arc<dyn ExceptionAccessor> {
    Arc::new(LayoutExceptionAccessor::new(&EXCEPTION_LAYOUT_V16))
}

pub fn exception_v24() -> Arc<dyn ExceptionAccessor> {
    Arc::new(LayoutExceptionAccessor::new(&EXCEPTION_LAYOUT_V24))
}

pub fn field_v16() -> Arc<dyn FieldAccessor> {
    Arc::new(LayoutFieldAccessor::new(&FIELD_LAYOUT_V16))
}

pub fn field_v24() -> Arc<dyn FieldAccessor> {
    Arc::new(LayoutFieldAccessor::new(&FIELD_LAYOUT_V24))
}

pub fn image_v16() -> Arc<dyn ImageAccessor> {
    Arc::new(LayoutImageAccessor::new(&IMAGE_LAYOUT_V16))
}

pub fn image_v24() -> Arc<dyn ImageAccessor> {
    Arc::new(LayoutImageAccessor::new(&IMAGE_LAYOUT_V24))
}

pub fn method_v16() -> Arc<dyn MethodAccessor> {
    Arc::new(LayoutMethodAccessor::new(&METHOD_LAYOUT_V16))
}

pub fn method_v24() -> Arc<dyn MethodAccessor> {
    Arc::new(LayoutMethodAccessor::new(&METHOD_LAYOUT_V24))
}

pub fn parameter_v16() -> Arc<dyn ParameterAccessor> {
    Arc::new(LayoutParameterAccessor::new(&PARAMETER_LAYOUT_V16))
}

pub fn parameter_v27() -> Arc<dyn ParameterAccessor> {
    Arc::new(LayoutParameterAccessor::new(&PARAMETER_LAYOUT_V27))
}

pub fn property_v16() -> Arc<dyn PropertyAccessor> {
    Arc::new(LayoutPropertyAccessor::new(&PROPERTY_LAYOUT_V16))
}

pub fn property_v24() -> Arc<dyn PropertyAccessor> {
    Arc::new(LayoutPropertyAccessor::new(&PROPERTY_LAYOUT_V24))
}

pub fn type_v16() -> Arc<dyn TypeAccessor> {
    Arc::new(LayoutTypeAccessor::new(&TYPE_LAYOUT_V16))
}

pub fn type_v27() -> Arc<dyn TypeAccessor> {
    Arc::new(LayoutTypeAccessor::new(&TYPE_LAYOUT_V27))
}

/// Registers every known layout with its floor version.
pub fn stock_registrations(registry: &HandlerRegistry) -> Result<(), RegistryError> {
    let v5_3 = VmVersion::new(5, 3, 0);
    let v2018_1 = VmVersion::new(2018, 1, 0);
    let v2019_1 = VmVersion::new(2019, 1, 0);
    let v2019_3 = VmVersion::new(2019, 3, 0);
    let v2021_2 = VmVersion::new(2021, 2, 0);

    let table: [(Capability, VmVersion, AccessorFactory); 21] = [
        (Capability::Assembly, v5_3, AccessorFactory::Assembly(assembly_v16)),
        (Capability::Assembly, v2018_1, AccessorFactory::Assembly(assembly_v24)),
        (Capability::Class, v5_3, AccessorFactory::Class(class_v16)),
        (Capability::Class, v2019_3, AccessorFactory::Class(class_v24)),
        (Capability::Class, v2021_2, AccessorFactory::Class(class_v27)),
        (Capability::Event, v5_3, AccessorFactory::Event(event_v16)),
        (Capability::Event, v2019_1, AccessorFactory::Event(event_v24)),
        (Capability::Exception, v5_3, AccessorFactory::Exception(exception_v16)),
        (Capability::Exception, v2019_1, AccessorFactory::Exception(exception_v24)),
        (Capability::Field, v5_3, AccessorFactory::Field(field_v16)),
        (Capability::Field, v2019_1, AccessorFactory::Field(field_v24)),
        (Capability::Image, v5_3, AccessorFactory::Image(image_v16)),
        (Capability::Image, v2018_1, AccessorFactory::Image(image_v24)),
        (Capability::Method, v5_3, AccessorFactory::Method(method_v16)),
        (Capability::Method, v2019_3, AccessorFactory::Method(method_v24)),
        (Capability::Parameter, v5_3, AccessorFactory::Parameter(parameter_v16)),
        (Capability::Parameter, v2021_2, AccessorFactory::Parameter(parameter_v27)),
        (Capability::Property, v5_3, AccessorFactory::Property(property_v16)),
        (Capability::Property, v2019_1, AccessorFactory::Property(property_v24)),
        (Capability::Type, v5_3, AccessorFactory::Type(type_v16)),
        (Capability::Type, v2021_2, AccessorFactory::Type(type_v27)),
    ];

    for (capability, min_version, factory) in table {
        registry.register(capability, min_version, factory)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Address;

    #[test]
    fn test_wrap_null_is_none_for_every_capability() {
        let registry = HandlerRegistry::new();
        stock_registrations(&registry).unwrap();
        registry.configure(VmVersion::new(2019, 3, 15)).unwrap();
        let active = registry.active().unwrap();

        let null = Address::zero();
        assert!(active.assembly().wrap(null).is_none());
        assert!(active.class().wrap(null).is_none());
        assert!(active.event().wrap(null).is_none());
        assert!(active.exception().wrap(null).is_none());
        assert!(active.field().wrap(null).is_none());
        assert!(active.image().wrap(null).is_none());
        assert!(active.method().wrap(null).is_none());
        assert!(active.parameter().wrap(null).is_none());
        assert!(active.property().wrap(null).is_none());
        assert!(active.ty().wrap(null).is_none());
    }

    #[test]
    fn test_allocate_is_zeroed_for_every_capability() {
        let registry = HandlerRegistry::new();
        stock_registrations(&registry).unwrap();
        registry.configure(VmVersion::new(2021, 2, 0)).unwrap();
        let active = registry.active().unwrap();

        let allocations = [
            (active.assembly().allocate().address(), active.assembly().size()),
            (active.class().allocate().address(), active.class().size()),
            (active.event().allocate().address(), active.event().size()),
            (active.exception().allocate().address(), active.exception().size()),
            (active.field().allocate().address(), active.field().size()),
            (active.image().allocate().address(), active.image().size()),
            (active.method().allocate().address(), active.method().size()),
            (active.parameter().allocate().address(), active.parameter().size()),
            (active.property().allocate().address(), active.property().size()),
            (active.ty().allocate().address(), active.ty().size()),
        ];

        for (addr, size) in allocations {
            let bytes = unsafe { std::slice::from_raw_parts(addr.as_ptr(), size) };
            assert!(bytes.iter().all(|&b| b == 0), "allocation not zeroed across {} bytes", size);
        }
    }

    #[test]
    fn test_version_floors_pick_expected_layouts() {
        let registry = HandlerRegistry::new();
        stock_registrations(&registry).unwrap();

        registry.configure(VmVersion::new(2020, 1, 0)).unwrap();
        let active = registry.active().unwrap();
        assert_eq!(active.selected_version(Capability::Class), VmVersion::new(2019, 3, 0));
        assert_eq!(active.selected_version(Capability::Parameter), VmVersion::new(5, 3, 0));
        assert!(active.parameter().has_name_pos_token());

        registry.configure(VmVersion::new(2021, 3, 4)).unwrap();
        let active = registry.active().unwrap();
        assert_eq!(active.selected_version(Capability::Parameter), VmVersion::new(2021, 2, 0));
        assert!(!active.parameter().has_name_pos_token());
    }
}
