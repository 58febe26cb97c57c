// Fri Jan 23 2026 - Alex

use crate::structs::{
    AssemblyAccessor, ClassAccessor, EventAccessor, ExceptionAccessor, FieldAccessor,
    ImageAccessor, MethodAccessor, ParameterAccessor, PropertyAccessor, TypeAccessor,
};
use crate::versioning::{Capability, MetadataVersion, RegistryError, VmVersion};
use log::error;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicPtr, Ordering};
use std::sync::Arc;

/// Constructor for one versioned accessor implementation. The variant pins
/// the capability a registration belongs to.
#[derive(Clone)]
pub enum AccessorFactory {
    Assembly(fn() -> Arc<dyn AssemblyAccessor>),
    Class(fn() -> Arc<dyn ClassAccessor>),
    Event(fn() -> Arc<dyn EventAccessor>),
    Exception(fn() -> Arc<dyn ExceptionAccessor>),
    Field(fn() -> Arc<dyn FieldAccessor>),
    Image(fn() -> Arc<dyn ImageAccessor>),
    Method(fn() -> Arc<dyn MethodAccessor>),
    Parameter(fn() -> Arc<dyn ParameterAccessor>),
    Property(fn() -> Arc<dyn PropertyAccessor>),
    Type(fn() -> Arc<dyn TypeAccessor>),
}

impl AccessorFactory {
    pub fn capability(&self) -> Capability {
        match self {
            AccessorFactory::Assembly(_) => Capability::Assembly,
            AccessorFactory::Class(_) => Capability::Class,
            AccessorFactory::Event(_) => Capability::Event,
            AccessorFactory::Exception(_) => Capability::Exception,
            AccessorFactory::Field(_) => Capability::Field,
            AccessorFactory::Image(_) => Capability::Image,
            AccessorFactory::Method(_) => Capability::Method,
            AccessorFactory::Parameter(_) => Capability::Parameter,
            AccessorFactory::Property(_) => Capability::Property,
            AccessorFactory::Type(_) => Capability::Type,
        }
    }
}

pub struct Registration {
    pub min_version: VmVersion,
    pub factory: AccessorFactory,
}

/// One resolved accessor per capability, built atomically for a configured
/// VM version. Consumers re-read the current set on every use instead of
/// caching accessors across calls.
pub struct ActiveHandlerSet {
    version: VmVersion,
    metadata: MetadataVersion,
    selected: HashMap<Capability, VmVersion>,
    assembly: Arc<dyn AssemblyAccessor>,
    class: Arc<dyn ClassAccessor>,
    event: Arc<dyn EventAccessor>,
    exception: Arc<dyn ExceptionAccessor>,
    field: Arc<dyn FieldAccessor>,
    image: Arc<dyn ImageAccessor>,
    method: Arc<dyn MethodAccessor>,
    parameter: Arc<dyn ParameterAccessor>,
    property: Arc<dyn PropertyAccessor>,
    ty: Arc<dyn TypeAccessor>,
}

impl ActiveHandlerSet {
    pub fn version(&self) -> VmVersion {
        self.version
    }

    pub fn metadata(&self) -> MetadataVersion {
        self.metadata
    }

    /// The floor version of the implementation picked for `capability`.
    pub fn selected_version(&self, capability: Capability) -> VmVersion {
        self.selected[&capability]
    }

    pub fn assembly(&self) -> &Arc<dyn AssemblyAccessor> {
        &self.assembly
    }

    pub fn class(&self) -> &Arc<dyn ClassAccessor> {
        &self.class
    }

    pub fn event(&self) -> &Arc<dyn EventAccessor> {
        &self.event
    }

    pub fn exception(&self) -> &Arc<dyn ExceptionAccessor> {
        &self.exception
    }

    pub fn field(&self) -> &Arc<dyn FieldAccessor> {
        &self.field
    }

    pub fn image(&self) -> &Arc<dyn ImageAccessor> {
        &self.image
    }

    pub fn method(&self) -> &Arc<dyn MethodAccessor> {
        &self.method
    }

    pub fn parameter(&self) -> &Arc<dyn ParameterAccessor> {
        &self.parameter
    }

    pub fn property(&self) -> &Arc<dyn PropertyAccessor> {
        &self.property
    }

    pub fn ty(&self) -> &Arc<dyn TypeAccessor> {
        &self.ty
    }
}

/// Registry of versioned accessor implementations.
///
/// `configure` rebuilds the whole active set and publishes it with a single
/// pointer store, so readers either see the previous complete set or the new
/// complete set. Previous snapshots stay alive until the registry drops;
/// hook handlers may still be running against them during a reconfiguration.
pub struct HandlerRegistry {
    entries: Mutex<HashMap<Capability, Vec<Registration>>>,
    active: AtomicPtr<ActiveHandlerSet>,
    snapshots: Mutex<Vec<Box<ActiveHandlerSet>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            active: AtomicPtr::new(std::ptr::null_mut()),
            snapshots: Mutex::new(Vec::new()),
        }
    }

    /// Registers an implementation with the lowest VM version it supports.
    /// Supporting a new VM revision is only ever a new registration;
    /// resolution below never changes.
    pub fn register(
        &self,
        capability: Capability,
        min_version: VmVersion,
        factory: AccessorFactory,
    ) -> Result<(), RegistryError> {
        if factory.capability() != capability {
            return Err(RegistryError::CapabilityMismatch {
                capability,
                factory: factory.capability(),
            });
        }
        self.entries
            .lock()
            .entry(capability)
            .or_default()
            .push(Registration { min_version, factory });
        Ok(())
    }

    /// Picks, per capability, the implementation with the greatest
    /// `min_version <= version` and publishes the recomputed set.
    pub fn configure(&self, version: VmVersion) -> Result<(), RegistryError> {
        let entries = self.entries.lock();

        let mut selected = HashMap::new();
        let mut factories: HashMap<Capability, AccessorFactory> = HashMap::new();
        for capability in Capability::ALL {
            let registrations = entries.get(&capability).map(Vec::as_slice).unwrap_or(&[]);
            let pick = Self::select(registrations, version).ok_or_else(|| {
                error!("no {} accessor registered for VM {}", capability, version);
                RegistryError::NoHandler { capability, version }
            })?;
            selected.insert(capability, pick.min_version);
            factories.insert(capability, pick.factory.clone());
        }

        let mut take = |capability: Capability| factories.remove(&capability).unwrap();
        let assembly = match take(Capability::Assembly) {
            AccessorFactory::Assembly(f) => f(),
            _ => unreachable!(),
        };
        let class = match take(Capability::Class) {
            AccessorFactory::Class(f) => f(),
            _ => unreachable!(),
        };
        let event = match take(Capability::Event) {
            AccessorFactory::Event(f) => f(),
            _ => unreachable!(),
        };
        let exception = match take(Capability::Exception) {
            AccessorFactory::Exception(f) => f(),
            _ => unreachable!(),
        };
        let field = match take(Capability::Field) {
            AccessorFactory::Field(f) => f(),
            _ => unreachable!(),
        };
        let image = match take(Capability::Image) {
            AccessorFactory::Image(f) => f(),
            _ => unreachable!(),
        };
        let method = match take(Capability::Method) {
            AccessorFactory::Method(f) => f(),
            _ => unreachable!(),
        };
        let parameter = match take(Capability::Parameter) {
            AccessorFactory::Parameter(f) => f(),
            _ => unreachable!(),
        };
        let property = match take(Capability::Property) {
            AccessorFactory::Property(f) => f(),
            _ => unreachable!(),
        };
        let ty = match take(Capability::Type) {
            AccessorFactory::Type(f) => f(),
            _ => unreachable!(),
        };

        let set = Box::new(ActiveHandlerSet {
            version,
            metadata: version.metadata(),
            selected,
            assembly,
            class,
            event,
            exception,
            field,
            image,
            method,
            parameter,
            property,
            ty,
        });

        let ptr = &*set as *const ActiveHandlerSet as *mut ActiveHandlerSet;
        // the Box keeps the snapshot alive; publication is the pointer store
        self.snapshots.lock().push(set);
        self.active.store(ptr, Ordering::Release);
        Ok(())
    }

    /// Current active set. Callers must not cache the reference across
    /// reconfigurations; re-resolve on every use.
    pub fn active(&self) -> Result<&ActiveHandlerSet, RegistryError> {
        let ptr = self.active.load(Ordering::Acquire);
        if ptr.is_null() {
            return Err(RegistryError::NotConfigured);
        }
        // snapshots are only freed when the registry drops
        Ok(unsafe { &*ptr })
    }

    fn select(registrations: &[Registration], version: VmVersion) -> Option<&Registration> {
        registrations
            .iter()
            .filter(|r| r.min_version <= version)
            .max_by_key(|r| r.min_version)
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::field::{LayoutFieldAccessor, FIELD_LAYOUT_V16};
    use crate::structs::{stock, stock_registrations};

    fn field_factory_a() -> Arc<dyn FieldAccessor> {
        Arc::new(LayoutFieldAccessor::new(&FIELD_LAYOUT_V16))
    }

    /// Covers every capability at `min` so `configure` has a full set to pick
    /// from regardless of the version under test.
    fn register_all_at(registry: &HandlerRegistry, min: VmVersion) {
        let factories = [
            AccessorFactory::Assembly(stock::assembly_v16),
            AccessorFactory::Class(stock::class_v16),
            AccessorFactory::Event(stock::event_v16),
            AccessorFactory::Exception(stock::exception_v16),
            AccessorFactory::Field(stock::field_v16),
            AccessorFactory::Image(stock::image_v16),
            AccessorFactory::Method(stock::method_v16),
            AccessorFactory::Parameter(stock::parameter_v16),
            AccessorFactory::Property(stock::property_v16),
            AccessorFactory::Type(stock::type_v16),
        ];
        for factory in factories {
            registry.register(factory.capability(), min, factory).unwrap();
        }
    }

    #[test]
    fn test_resolution_picks_greatest_floor_not_exceeding_configured() {
        let registry = HandlerRegistry::new();
        register_all_at(&registry, VmVersion::new(1, 0, 0));

        // field gets two higher floors, one on each side of 2.5.0
        for min in [VmVersion::new(2, 0, 0), VmVersion::new(3, 0, 0)] {
            registry
                .register(Capability::Field, min, AccessorFactory::Field(field_factory_a))
                .unwrap();
        }

        registry.configure(VmVersion::new(2, 5, 0)).unwrap();
        let active = registry.active().unwrap();
        assert_eq!(active.selected_version(Capability::Field), VmVersion::new(2, 0, 0));
        assert_eq!(active.selected_version(Capability::Class), VmVersion::new(1, 0, 0));
    }

    #[test]
    fn test_no_qualifying_handler_is_fatal_and_names_capability() {
        let registry = HandlerRegistry::new();
        stock_registrations(&registry).unwrap();

        let err = registry.configure(VmVersion::new(1, 0, 0)).unwrap_err();
        match err {
            RegistryError::NoHandler { capability: _, version } => {
                assert_eq!(version, VmVersion::new(1, 0, 0));
            }
            other => panic!("unexpected error: {}", other),
        }
        let message = err.to_string();
        assert!(message.contains("1.0.0"));
    }

    #[test]
    fn test_capability_mismatch_rejected() {
        let registry = HandlerRegistry::new();
        let err = registry
            .register(Capability::Class, VmVersion::new(5, 3, 0), AccessorFactory::Field(field_factory_a))
            .unwrap_err();
        assert!(matches!(err, RegistryError::CapabilityMismatch { .. }));
    }

    #[test]
    fn test_unconfigured_registry_refuses_resolution() {
        let registry = HandlerRegistry::new();
        assert!(matches!(registry.active(), Err(RegistryError::NotConfigured)));
    }

    #[test]
    fn test_reconfiguration_swaps_whole_set() {
        let registry = HandlerRegistry::new();
        stock_registrations(&registry).unwrap();

        registry.configure(VmVersion::new(5, 6, 0)).unwrap();
        let before = registry.active().unwrap();
        assert!(!before.image().has_name_no_ext());

        registry.configure(VmVersion::new(2019, 3, 15)).unwrap();
        let after = registry.active().unwrap();
        assert!(after.image().has_name_no_ext());
        assert_eq!(after.version(), VmVersion::new(2019, 3, 15));
        // the older snapshot is still alive for in-flight readers
        assert_eq!(before.version(), VmVersion::new(5, 6, 0));
    }
}
