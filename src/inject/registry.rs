// Mon Jan 26 2026 - Alex

use crate::memory::{alloc_zeroed, raw, Address};
use dashmap::DashMap;
use log::trace;
use std::sync::atomic::{AtomicI64, Ordering};

/// Default-value override for an injected static field, consulted by the
/// field-default-value hook instead of the VM's metadata blob. `blob` points
/// at the little-endian value bytes and lives until process exit, matching
/// what the VM hands out for real metadata blobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefault {
    pub value: i64,
    pub blob: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct NameKey {
    namespace: String,
    name: String,
    module: Address,
}

/// Injected classes, keyed by their synthetic tokens and by name.
///
/// Tokens are strictly negative so they can never collide with real
/// type-definition indices, and strictly decreasing so concurrent
/// registrations never collide with each other. Both maps are append-only;
/// hook handlers read them on hot paths without taking a global lock.
pub struct InjectedRegistry {
    // next token is counter - 1; first issued token is -2
    counter: AtomicI64,
    by_token: DashMap<i64, Address, ahash::RandomState>,
    by_name: DashMap<NameKey, Address, ahash::RandomState>,
    field_defaults: DashMap<Address, FieldDefault, ahash::RandomState>,
}

impl InjectedRegistry {
    pub fn new() -> Self {
        Self {
            counter: AtomicI64::new(-1),
            by_token: DashMap::default(),
            by_name: DashMap::default(),
            field_defaults: DashMap::default(),
        }
    }

    /// Issues the next token and binds it to `class_ptr`.
    pub fn register_token(&self, class_ptr: Address) -> i64 {
        let token = self.counter.fetch_sub(1, Ordering::AcqRel) - 1;
        self.by_token.insert(token, class_ptr);
        trace!("injected class {} registered as token {}", class_ptr, token);
        token
    }

    /// Binds `(namespace, name)` to `class_ptr` within each of `modules`.
    /// The same pair may map to different classes in different modules.
    pub fn register_name(
        &self,
        namespace: &str,
        name: &str,
        class_ptr: Address,
        modules: &[Address],
    ) {
        for &module in modules {
            let key = NameKey {
                namespace: namespace.to_string(),
                name: name.to_string(),
                module,
            };
            self.by_name.insert(key, class_ptr);
        }
    }

    pub fn lookup_by_token(&self, token: i64) -> Option<Address> {
        self.by_token.get(&token).map(|entry| *entry)
    }

    pub fn lookup_by_name(&self, namespace: &str, name: &str, module: Address) -> Option<Address> {
        let key = NameKey {
            namespace: namespace.to_string(),
            name: name.to_string(),
            module,
        };
        self.by_name.get(&key).map(|entry| *entry)
    }

    pub fn override_field_default(&self, field_ptr: Address, value: i64) {
        let blob = alloc_zeroed(std::mem::size_of::<i64>());
        unsafe { raw::write_u64(blob, 0, value as u64) };
        self.field_defaults.insert(field_ptr, FieldDefault { value, blob });
    }

    pub fn field_default_override(&self, field_ptr: Address) -> Option<FieldDefault> {
        self.field_defaults.get(&field_ptr).map(|entry| *entry)
    }

    pub fn injected_count(&self) -> usize {
        self.by_token.len()
    }
}

impl Default for InjectedRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_first_token_is_minus_two() {
        let registry = InjectedRegistry::new();
        let token = registry.register_token(Address::new(0xAAAA));
        assert_eq!(token, -2);
        assert_eq!(registry.lookup_by_token(-2), Some(Address::new(0xAAAA)));
        assert_eq!(registry.lookup_by_token(-3), None);
    }

    #[test]
    fn test_concurrent_tokens_are_distinct_and_strictly_negative() {
        let registry = InjectedRegistry::new();

        let batches: Vec<Vec<i64>> = crossbeam::thread::scope(|scope| {
            (0..8u64)
                .map(|t| {
                    let registry = &registry;
                    scope.spawn(move |_| {
                        (0..100)
                            .map(|i| registry.register_token(Address::new(0x1000 + t * 0x100 + i)))
                            .collect()
                    })
                })
                .collect::<Vec<_>>()
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect()
        })
        .unwrap();

        let mut seen = HashSet::new();
        for token in batches.into_iter().flatten() {
            assert!(token <= -2);
            assert!(seen.insert(token), "token {} issued twice", token);
        }
        assert_eq!(seen.len(), 800);
        assert_eq!(registry.injected_count(), 800);
    }

    #[test]
    fn test_name_lookup_is_scoped_per_module() {
        let registry = InjectedRegistry::new();
        registry.register_name("MyNs", "MyClass", Address::new(0xAAAA), &[Address::new(0x100)]);
        registry.register_name("MyNs", "MyClass", Address::new(0xBBBB), &[Address::new(0x200)]);

        assert_eq!(
            registry.lookup_by_name("MyNs", "MyClass", Address::new(0x100)),
            Some(Address::new(0xAAAA))
        );
        assert_eq!(
            registry.lookup_by_name("MyNs", "MyClass", Address::new(0x200)),
            Some(Address::new(0xBBBB))
        );
        assert_eq!(registry.lookup_by_name("MyNs", "MyClass", Address::new(0x300)), None);
        assert_eq!(registry.lookup_by_name("OtherNs", "MyClass", Address::new(0x100)), None);
    }

    #[test]
    fn test_one_registration_can_span_several_modules() {
        let registry = InjectedRegistry::new();
        registry.register_name(
            "MyNs",
            "MyClass",
            Address::new(0xAAAA),
            &[Address::new(0x100), Address::new(0x200)],
        );

        for module in [0x100u64, 0x200] {
            assert_eq!(
                registry.lookup_by_name("MyNs", "MyClass", Address::new(module)),
                Some(Address::new(0xAAAA))
            );
        }
        assert_eq!(registry.lookup_by_name("MyNs", "MyClass", Address::new(0x300)), None);
    }

    #[test]
    fn test_field_default_override_allocates_readable_blob() {
        let registry = InjectedRegistry::new();
        let field = Address::new(0x4000);

        assert!(registry.field_default_override(field).is_none());
        registry.override_field_default(field, 7);

        let default = registry.field_default_override(field).unwrap();
        assert_eq!(default.value, 7);
        assert!(!default.blob.is_null());
        assert_eq!(unsafe { crate::memory::raw::read_u64(default.blob, 0) }, 7);
    }
}
