// Tue Jan 27 2026 - Alex

use crate::discovery::{stock, DiscoveredFunction, FunctionDiscovery};
use crate::hook::{DetourBackend, HookInstaller, TrampolineSlot};
use crate::inject::InjectedRegistry;
use crate::memory::{Address, ModuleImage};
use crate::runtime::bootstrap::{create_injected_module, InjectedModule};
use crate::runtime::BridgeError;
use crate::structs::stock_registrations;
use crate::versioning::{ActiveHandlerSet, HandlerRegistry, VmVersion};
use log::info;
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicBool, Ordering};

/// The five located routines of one module.
#[derive(Debug, Clone, Copy)]
pub struct DiscoveredRoutines {
    pub class_by_name: DiscoveredFunction,
    pub class_from_typedef_index: DiscoveredFunction,
    pub class_from_type: DiscoveredFunction,
    pub field_default_value: DiscoveredFunction,
    pub class_init: DiscoveredFunction,
}

/// Handler entry points the four interceptable routines get detoured to.
/// The class initializer is located but never hooked.
#[derive(Debug, Clone, Copy)]
pub struct HookTargets {
    pub class_by_name: Address,
    pub class_from_typedef_index: Address,
    pub class_from_type: Address,
    pub field_default_value: Address,
}

/// Per-routine trampoline slots. Handlers spin-wait on these, so they exist
/// (and are shareable) before any detour lands.
#[derive(Default)]
pub struct Trampolines {
    pub class_by_name: TrampolineSlot,
    pub class_from_typedef_index: TrampolineSlot,
    pub class_from_type: TrampolineSlot,
    pub field_default_value: TrampolineSlot,
}

/// Everything one attached VM module needs: the module image, the configured
/// accessor registry, the injected-class registry, discovery results and
/// hook state. Contexts are self-contained; several can coexist in a
/// process, each against its own module.
pub struct InteropContext {
    module: ModuleImage,
    version: VmVersion,
    registry: HandlerRegistry,
    injected: InjectedRegistry,
    routines: OnceCell<DiscoveredRoutines>,
    trampolines: Trampolines,
    hooks_installed: AtomicBool,
    injected_module: OnceCell<InjectedModule>,
}

impl InteropContext {
    /// Binds to `module` and configures the accessor registry for `version`.
    /// Fails fast when any capability lacks a qualifying implementation.
    pub fn attach(module: ModuleImage, version: VmVersion) -> Result<Self, BridgeError> {
        let registry = HandlerRegistry::new();
        stock_registrations(&registry)?;
        registry.configure(version)?;
        info!(
            "attached to {} (VM {}, metadata {:?})",
            module.name(),
            version,
            version.metadata()
        );

        Ok(Self {
            module,
            version,
            registry,
            injected: InjectedRegistry::new(),
            routines: OnceCell::new(),
            trampolines: Trampolines::default(),
            hooks_installed: AtomicBool::new(false),
            injected_module: OnceCell::new(),
        })
    }

    pub fn module(&self) -> &ModuleImage {
        &self.module
    }

    pub fn version(&self) -> VmVersion {
        self.version
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Current accessor set. Re-resolve on every use; never cache across a
    /// reconfiguration.
    pub fn active(&self) -> Result<&ActiveHandlerSet, BridgeError> {
        Ok(self.registry.active()?)
    }

    pub fn injected(&self) -> &InjectedRegistry {
        &self.injected
    }

    pub fn trampolines(&self) -> &Trampolines {
        &self.trampolines
    }

    /// Locates the five internal routines, once. Later calls return the
    /// first result.
    pub fn discover(&self) -> Result<&DiscoveredRoutines, BridgeError> {
        self.routines.get_or_try_init(|| {
            let discovery = FunctionDiscovery::new(&self.module, self.version.metadata());
            Ok(DiscoveredRoutines {
                class_by_name: discovery.locate(&stock::class_by_name())?,
                class_from_typedef_index: discovery.locate(&stock::class_from_typedef_index())?,
                class_from_type: discovery.locate(&stock::class_from_type())?,
                field_default_value: discovery.locate(&stock::field_default_value())?,
                class_init: discovery.locate(&stock::class_init())?,
            })
        })
    }

    /// Detours the four interceptable routines to `targets` and publishes
    /// their trampolines. First successful call wins; later calls are
    /// no-ops. A failed call clears the guard again so the caller can retry
    /// instead of running half-hooked.
    ///
    /// # Safety
    /// Same contract as the backend's `install` for each discovered address.
    pub unsafe fn install_hooks<B: DetourBackend>(
        &self,
        backend: B,
        targets: &HookTargets,
    ) -> Result<(), BridgeError> {
        if self
            .hooks_installed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(());
        }

        let result = self.install_all(backend, targets);
        if result.is_err() {
            self.hooks_installed.store(false, Ordering::Release);
        }
        result
    }

    unsafe fn install_all<B: DetourBackend>(
        &self,
        backend: B,
        targets: &HookTargets,
    ) -> Result<(), BridgeError> {
        let routines = *self.discover()?;
        let installer = HookInstaller::new(backend);
        installer.install_into(
            routines.class_by_name.address,
            targets.class_by_name,
            &self.trampolines.class_by_name,
        )?;
        installer.install_into(
            routines.class_from_typedef_index.address,
            targets.class_from_typedef_index,
            &self.trampolines.class_from_typedef_index,
        )?;
        installer.install_into(
            routines.class_from_type.address,
            targets.class_from_type,
            &self.trampolines.class_from_type,
        )?;
        installer.install_into(
            routines.field_default_value.address,
            targets.field_default_value,
            &self.trampolines.field_default_value,
        )?;
        Ok(())
    }

    /// Address of the class initializer; injection code calls it directly,
    /// nothing intercepts it.
    pub fn class_init(&self) -> Option<Address> {
        self.routines.get().map(|r| r.class_init.address)
    }

    /// The assembly/image pair owning this context's injected classes,
    /// created on first use.
    pub fn injected_module(&self) -> Result<&InjectedModule, BridgeError> {
        self.injected_module
            .get_or_try_init(|| Ok(create_injected_module(self.active()?, "InjectedAssembly")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::DiscoveryPath;
    use crate::hook::HookError;
    use parking_lot::Mutex;

    fn call(rel: i32) -> [u8; 5] {
        let mut bytes = [0xE8, 0, 0, 0, 0];
        bytes[1..].copy_from_slice(&rel.to_le_bytes());
        bytes
    }

    fn put_call(code: &mut [u8], at: usize, dest: usize) {
        let rel = dest as i64 - (at as i64 + 5);
        code[at..at + 5].copy_from_slice(&call(rel as i32));
    }

    /// Module shaped so every stock recipe resolves: export thunks with the
    /// expected call chains plus one class-init signature site.
    fn discoverable_module() -> ModuleImage {
        let mut code = vec![0xCC; 0x180];

        // vm_class_from_name thunk -> 0x80
        put_call(&mut code, 0x00, 0x80);
        code[0x05] = 0xC3;
        // vm_image_get_class thunk -> helper 0x90; helper calls 0xA0 then 0xB0
        put_call(&mut code, 0x10, 0x90);
        code[0x15] = 0xC3;
        put_call(&mut code, 0x90, 0xA0);
        put_call(&mut code, 0x95, 0xB0);
        code[0x9A] = 0xC3;
        // vm_class_from_type thunk -> 0xC0
        put_call(&mut code, 0x20, 0xC0);
        code[0x25] = 0xC3;
        // vm_field_static_get_value thunk -> 0xD0; 0xD0 calls 0xE0 then 0xF0
        // (the internal variant); 0xF0 calls 0x110 then 0x120
        put_call(&mut code, 0x30, 0xD0);
        code[0x35] = 0xC3;
        put_call(&mut code, 0xD0, 0xE0);
        put_call(&mut code, 0xD5, 0xF0);
        code[0xDA] = 0xC3;
        put_call(&mut code, 0xF0, 0x110);
        put_call(&mut code, 0xF5, 0x120);
        code[0xFA] = 0xC3;
        // class-init call site: E8 rel32 followed by 0F B7 47 28 83
        put_call(&mut code, 0x40, 0x100);
        code[0x45..0x4A].copy_from_slice(&[0x0F, 0xB7, 0x47, 0x28, 0x83]);

        for target in [0x80, 0xA0, 0xB0, 0xC0, 0xE0, 0x100, 0x110, 0x120] {
            code[target] = 0x90;
            code[target + 1] = 0xC3;
        }

        ModuleImage::synthetic("vm.dll")
            .base(Address::new(0x1000))
            .code(code)
            .export("vm_class_from_name", Address::new(0x1000))
            .export("vm_image_get_class", Address::new(0x1010))
            .export("vm_class_from_type", Address::new(0x1020))
            .export("vm_field_static_get_value", Address::new(0x1030))
            .build()
    }

    /// Records installs without touching the target addresses, which are
    /// virtual in a synthetic module.
    struct RecordingBackend {
        installs: Mutex<Vec<(Address, Address)>>,
    }

    impl RecordingBackend {
        fn new() -> Self {
            Self { installs: Mutex::new(Vec::new()) }
        }
    }

    impl DetourBackend for &RecordingBackend {
        unsafe fn install(&self, target: Address, handler: Address) -> Result<Address, HookError> {
            self.installs.lock().push((target, handler));
            Ok(target + 0x10_0000)
        }
    }

    /// Fails the first `failures` installs, then behaves like the recorder.
    struct FlakyBackend {
        failures: Mutex<u32>,
        installs: Mutex<Vec<(Address, Address)>>,
    }

    impl FlakyBackend {
        fn new(failures: u32) -> Self {
            Self {
                failures: Mutex::new(failures),
                installs: Mutex::new(Vec::new()),
            }
        }
    }

    impl DetourBackend for &FlakyBackend {
        unsafe fn install(&self, target: Address, handler: Address) -> Result<Address, HookError> {
            let mut failures = self.failures.lock();
            if *failures > 0 {
                *failures -= 1;
                return Err(HookError::ProtectFailed { address: target, errno: 13 });
            }
            self.installs.lock().push((target, handler));
            Ok(target + 0x10_0000)
        }
    }

    fn targets() -> HookTargets {
        HookTargets {
            class_by_name: Address::new(0x9000),
            class_from_typedef_index: Address::new(0x9010),
            class_from_type: Address::new(0x9020),
            field_default_value: Address::new(0x9030),
        }
    }

    #[test]
    fn test_discover_locates_all_five_routines() {
        let ctx = InteropContext::attach(discoverable_module(), VmVersion::new(2019, 3, 15)).unwrap();
        let routines = ctx.discover().unwrap();

        assert_eq!(routines.class_by_name.address, Address::new(0x1080));
        assert_eq!(routines.class_from_typedef_index.address, Address::new(0x10A0));
        assert_eq!(routines.class_from_type.address, Address::new(0x10C0));
        assert_eq!(routines.field_default_value.address, Address::new(0x1110));
        assert_eq!(routines.class_init.address, Address::new(0x1100));
        assert_eq!(routines.class_init.via, DiscoveryPath::Signature);
        assert_eq!(ctx.class_init(), Some(Address::new(0x1100)));
    }

    #[test]
    fn test_install_hooks_is_idempotent_and_publishes_trampolines() {
        let ctx = InteropContext::attach(discoverable_module(), VmVersion::new(2019, 3, 15)).unwrap();
        let backend = RecordingBackend::new();

        unsafe { ctx.install_hooks(&backend, &targets()) }.unwrap();
        unsafe { ctx.install_hooks(&backend, &targets()) }.unwrap();

        let installs = backend.installs.lock();
        assert_eq!(installs.len(), 4);
        assert!(installs.contains(&(Address::new(0x1080), Address::new(0x9000))));
        // class_init never hooked
        assert!(!installs.iter().any(|(target, _)| *target == Address::new(0x1100)));

        assert_eq!(
            ctx.trampolines().class_by_name.try_get(),
            Some(Address::new(0x1080 + 0x10_0000))
        );
        assert!(ctx.trampolines().field_default_value.try_get().is_some());
    }

    #[test]
    fn test_failed_install_can_be_retried() {
        let ctx = InteropContext::attach(discoverable_module(), VmVersion::new(2019, 3, 15)).unwrap();
        let backend = FlakyBackend::new(1);

        let first = unsafe { ctx.install_hooks(&backend, &targets()) };
        assert!(matches!(first, Err(BridgeError::Hook(_))));

        unsafe { ctx.install_hooks(&backend, &targets()) }.unwrap();
        assert_eq!(backend.installs.lock().len(), 4);
        assert!(ctx.trampolines().class_by_name.try_get().is_some());

        // and the success sticks: a third call is a no-op
        unsafe { ctx.install_hooks(&backend, &targets()) }.unwrap();
        assert_eq!(backend.installs.lock().len(), 4);
    }

    #[test]
    fn test_attach_fails_for_unknown_vm_version() {
        let result = InteropContext::attach(discoverable_module(), VmVersion::new(1, 0, 0));
        assert!(matches!(result, Err(BridgeError::Registry(_))));
    }

    #[test]
    fn test_injected_module_is_created_once() {
        let ctx = InteropContext::attach(discoverable_module(), VmVersion::new(2019, 3, 15)).unwrap();
        let first = *ctx.injected_module().unwrap();
        let second = *ctx.injected_module().unwrap();
        assert_eq!(first.image.address(), second.image.address());
        assert_eq!(first.assembly.address(), second.assembly.address());
    }
}
