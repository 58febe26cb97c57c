// Tue Jan 27 2026 - Alex
//
// The interception logic of each hooked routine, separated from detour
// plumbing so it runs under test without patching anything. `native` stands
// for the trampoline call; shims pass a closure that spin-waits and jumps.

use crate::inject::InjectedRegistry;
use crate::memory::Address;
use crate::structs::TypeKind;
use crate::versioning::ActiveHandlerSet;
use log::trace;

/// Namespace+name class lookup. Native goes first; only a miss consults the
/// injected registry, so real VM classes always shadow injected ones.
pub fn class_by_name(
    injected: &InjectedRegistry,
    image: Address,
    namespace: &str,
    name: &str,
    native: impl FnOnce() -> Address,
) -> Address {
    let found = native();
    if !found.is_null() {
        return found;
    }
    match injected.lookup_by_name(namespace, name, image) {
        Some(class) => {
            trace!("{}::{} resolved from injected registry: {}", namespace, name, class);
            class
        }
        None => Address::zero(),
    }
}

/// Type-definition-index lookup. Negative indices are injected tokens and
/// never reach the VM; everything else passes through.
pub fn class_from_typedef_index(
    injected: &InjectedRegistry,
    index: i64,
    native: impl FnOnce() -> Address,
) -> Address {
    if index < 0 {
        return injected.lookup_by_token(index).unwrap_or_else(Address::zero);
    }
    native()
}

/// Type-descriptor-to-class lookup. An injected class's type descriptor
/// carries its negative token in the data word with a CLASS or VALUETYPE
/// kind; anything else is the VM's business.
pub fn class_from_type(
    active: &ActiveHandlerSet,
    injected: &InjectedRegistry,
    type_ptr: Address,
    native: impl FnOnce() -> Address,
) -> Address {
    let types = active.ty();
    if let Some(h) = types.wrap(type_ptr) {
        let data = types.data(h).as_u64() as i64;
        if data < 0 && matches!(types.kind(h), Some(TypeKind::Class | TypeKind::ValueType)) {
            if let Some(class) = injected.lookup_by_token(data) {
                return class;
            }
        }
    }
    native()
}

/// Static-field default-value lookup. An override returns its blob and
/// surfaces the field's element-class byval type through the out-param; the
/// VM's metadata has no row for injected fields.
pub fn field_default_value(
    active: &ActiveHandlerSet,
    injected: &InjectedRegistry,
    field_ptr: Address,
    native: impl FnOnce() -> (Address, Address),
) -> (Address, Address) {
    let fields = active.field();
    let classes = active.class();

    if let Some(h) = fields.wrap(field_ptr) {
        if let Some(default) = injected.field_default_override(field_ptr) {
            let type_ptr = fields
                .parent(h)
                .and_then(|parent| classes.wrap(classes.element_class(parent)))
                .map(|element| classes.byval_arg(element).address())
                .unwrap_or_else(Address::zero);
            return (default.blob, type_ptr);
        }
    }
    native()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::stock_registrations;
    use crate::versioning::{HandlerRegistry, VmVersion};

    fn configured_registry() -> HandlerRegistry {
        let registry = HandlerRegistry::new();
        stock_registrations(&registry).unwrap();
        registry.configure(VmVersion::new(2019, 3, 15)).unwrap();
        registry
    }

    #[test]
    fn test_class_by_name_passes_native_hit_through() {
        let injected = InjectedRegistry::new();
        injected.register_name("MyNs", "MyClass", Address::new(0xAAAA), &[Address::new(0x100)]);

        let result = class_by_name(&injected, Address::new(0x100), "MyNs", "MyClass", || {
            Address::new(0xBEEF)
        });
        assert_eq!(result, Address::new(0xBEEF));
    }

    #[test]
    fn test_class_by_name_falls_back_to_injected_on_native_miss() {
        let injected = InjectedRegistry::new();
        injected.register_name("MyNs", "MyClass", Address::new(0xAAAA), &[Address::new(0x100)]);

        let hit = class_by_name(&injected, Address::new(0x100), "MyNs", "MyClass", Address::zero);
        assert_eq!(hit, Address::new(0xAAAA));

        // same pair, different image: not registered there
        let miss = class_by_name(&injected, Address::new(0x200), "MyNs", "MyClass", Address::zero);
        assert!(miss.is_null());
    }

    #[test]
    fn test_typedef_index_negative_is_injected_only() {
        let injected = InjectedRegistry::new();
        let token = injected.register_token(Address::new(0xAAAA));
        assert_eq!(token, -2);

        let hit = class_from_typedef_index(&injected, -2, || panic!("native must not run"));
        assert_eq!(hit, Address::new(0xAAAA));

        let unknown = class_from_typedef_index(&injected, -99, || panic!("native must not run"));
        assert!(unknown.is_null());

        let positive = class_from_typedef_index(&injected, 7, || Address::new(0xCAFE));
        assert_eq!(positive, Address::new(0xCAFE));
    }

    #[test]
    fn test_type_with_negative_data_and_class_kind_hits_token_map() {
        let registry = configured_registry();
        let active = registry.active().unwrap();
        let injected = InjectedRegistry::new();
        let token = injected.register_token(Address::new(0xAAAA));

        let types = active.ty();
        let descriptor = types.allocate();
        types.set_data(descriptor, Address::new(token as u64));
        types.set_kind(descriptor, TypeKind::Class);

        let hit = class_from_type(&registry.active().unwrap(), &injected, descriptor.address(), || {
            panic!("native must not run")
        });
        assert_eq!(hit, Address::new(0xAAAA));

        // positive data word: not injected, native wins
        types.set_data(descriptor, Address::new(0x30));
        let native = class_from_type(&registry.active().unwrap(), &injected, descriptor.address(), || {
            Address::new(0xCAFE)
        });
        assert_eq!(native, Address::new(0xCAFE));
    }

    #[test]
    fn test_field_default_override_surfaces_element_byval_type() {
        let registry = configured_registry();
        let active = registry.active().unwrap();
        let injected = InjectedRegistry::new();

        let classes = active.class();
        let fields = active.field();

        let element = classes.allocate();
        let parent = classes.allocate();
        classes.set_element_class(parent, element.address());

        let field = fields.allocate();
        fields.set_parent(field, parent);
        injected.override_field_default(field.address(), 42);

        let (blob, type_ptr) =
            field_default_value(active, &injected, field.address(), || panic!("native must not run"));
        assert_eq!(unsafe { crate::memory::raw::read_u64(blob, 0) }, 42);
        assert_eq!(type_ptr, classes.byval_arg(element).address());
    }

    #[test]
    fn test_field_without_override_uses_native() {
        let registry = configured_registry();
        let active = registry.active().unwrap();
        let injected = InjectedRegistry::new();

        let field = active.field().allocate();
        let (blob, type_ptr) = field_default_value(active, &injected, field.address(), || {
            (Address::new(0x1), Address::new(0x2))
        });
        assert_eq!((blob, type_ptr), (Address::new(0x1), Address::new(0x2)));
    }
}
