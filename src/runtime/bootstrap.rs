// Tue Jan 27 2026 - Alex

use crate::memory::{alloc_zeroed, Address};
use crate::structs::{AssemblyHandle, ImageHandle};
use crate::versioning::ActiveHandlerSet;
use log::debug;

/// Assembly + image pair that owns every injected class of a context.
#[derive(Debug, Clone, Copy)]
pub struct InjectedModule {
    pub assembly: AssemblyHandle,
    pub image: ImageHandle,
}

/// Nul-terminated copy of `s` in never-freed memory, for name fields the VM
/// reads as C strings.
pub fn alloc_cstring(s: &str) -> Address {
    let addr = alloc_zeroed(s.len() + 1);
    unsafe {
        std::ptr::copy_nonoverlapping(s.as_ptr(), addr.as_mut_ptr(), s.len());
    }
    addr
}

/// Builds the synthetic assembly/image pair injected classes are attached
/// to: named, cross-linked, and marked dynamic so the VM's metadata walkers
/// skip it.
pub fn create_injected_module(active: &ActiveHandlerSet, name: &str) -> InjectedModule {
    let assemblies = active.assembly();
    let images = active.image();

    let assembly = assemblies.allocate();
    let image = images.allocate();

    let bare_name = alloc_cstring(name);
    let dll_name = alloc_cstring(&format!("{}.dll", name));

    assemblies.set_name(assembly, bare_name);
    assemblies.set_image(assembly, image.address());

    images.set_name(image, dll_name);
    if images.has_name_no_ext() {
        images.set_name_no_ext(image, bare_name);
    }
    images.set_assembly(image, assembly.address());
    images.set_dynamic(image, 1);

    debug!("injected module '{}' created (assembly {:?}, image {:?})", name, assembly, image);
    InjectedModule { assembly, image }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::stock_registrations;
    use crate::versioning::{HandlerRegistry, VmVersion};
    use std::ffi::CStr;

    fn active_at(version: VmVersion) -> HandlerRegistry {
        let registry = HandlerRegistry::new();
        stock_registrations(&registry).unwrap();
        registry.configure(version).unwrap();
        registry
    }

    unsafe fn cstr_at(addr: Address) -> &'static str {
        CStr::from_ptr(addr.as_ptr() as *const _).to_str().unwrap()
    }

    #[test]
    fn test_pair_is_linked_named_and_dynamic() {
        let registry = active_at(VmVersion::new(2019, 3, 15));
        let active = registry.active().unwrap();

        let module = create_injected_module(active, "InjectedAssembly");

        let assemblies = active.assembly();
        let images = active.image();
        assert_eq!(assemblies.image(module.assembly), module.image.address());
        assert_eq!(images.assembly(module.image), module.assembly.address());
        assert_eq!(images.dynamic(module.image), 1);

        unsafe {
            assert_eq!(cstr_at(assemblies.name(module.assembly)), "InjectedAssembly");
            assert_eq!(cstr_at(images.name(module.image)), "InjectedAssembly.dll");
            assert_eq!(cstr_at(images.name_no_ext(module.image).unwrap()), "InjectedAssembly");
        }
    }

    #[test]
    fn test_old_layout_has_no_bare_name_field() {
        let registry = active_at(VmVersion::new(5, 6, 0));
        let active = registry.active().unwrap();

        let module = create_injected_module(active, "InjectedAssembly");
        assert!(active.image().name_no_ext(module.image).is_none());
    }
}
