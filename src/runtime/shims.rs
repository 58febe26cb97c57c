// Tue Jan 27 2026 - Alex
//
// extern "C" entry points the detours jump to. The VM calls these with no
// context argument, so exactly one InteropContext per process can be bound
// for shim dispatch; everything else about contexts stays instance-based.

use crate::memory::Address;
use crate::runtime::{handlers, BridgeError, HookTargets, InteropContext};
use once_cell::sync::OnceCell;
use std::ffi::CStr;
use std::os::raw::c_char;
use std::sync::Arc;

static CONTEXT: OnceCell<Arc<InteropContext>> = OnceCell::new();

/// Binds `context` as the process-wide dispatch target. One shot.
pub fn bind(context: Arc<InteropContext>) -> Result<(), BridgeError> {
    CONTEXT.set(context).map_err(|_| BridgeError::AlreadyBound)
}

fn context() -> Option<&'static Arc<InteropContext>> {
    CONTEXT.get()
}

pub type ClassByNameFn = unsafe extern "C" fn(u64, *const c_char, *const c_char) -> u64;
pub type ClassFromTypedefIndexFn = unsafe extern "C" fn(i32) -> u64;
pub type ClassFromTypeFn = unsafe extern "C" fn(u64) -> u64;
pub type FieldDefaultValueFn = unsafe extern "C" fn(u64, *mut u64) -> u64;

/// The shim addresses, in the shape `InteropContext::install_hooks` takes.
pub fn hook_targets() -> HookTargets {
    HookTargets {
        class_by_name: Address::from_ptr(class_by_name as *const ()),
        class_from_typedef_index: Address::from_ptr(class_from_typedef_index as *const ()),
        class_from_type: Address::from_ptr(class_from_type as *const ()),
        field_default_value: Address::from_ptr(field_default_value as *const ()),
    }
}

/// # Safety
/// Called by the VM through the detour; pointer arguments follow the native
/// routine's contract.
pub unsafe extern "C" fn class_by_name(
    image: u64,
    namespace: *const c_char,
    name: *const c_char,
) -> u64 {
    let Some(ctx) = context() else { return 0 };
    let native = || unsafe {
        let f: ClassByNameFn =
            std::mem::transmute(ctx.trampolines().class_by_name.wait().as_u64());
        Address::new(f(image, namespace, name))
    };
    if namespace.is_null() || name.is_null() {
        return native().as_u64();
    }
    let ns = CStr::from_ptr(namespace).to_string_lossy();
    let nm = CStr::from_ptr(name).to_string_lossy();
    handlers::class_by_name(ctx.injected(), Address::new(image), &ns, &nm, native).as_u64()
}

/// # Safety
/// Called by the VM through the detour.
pub unsafe extern "C" fn class_from_typedef_index(index: i32) -> u64 {
    let Some(ctx) = context() else { return 0 };
    handlers::class_from_typedef_index(ctx.injected(), index as i64, || unsafe {
        let f: ClassFromTypedefIndexFn =
            std::mem::transmute(ctx.trampolines().class_from_typedef_index.wait().as_u64());
        Address::new(f(index))
    })
    .as_u64()
}

/// # Safety
/// Called by the VM through the detour; `type_ptr` must be a live type
/// descriptor or null.
pub unsafe extern "C" fn class_from_type(type_ptr: u64) -> u64 {
    let Some(ctx) = context() else { return 0 };
    let Ok(active) = ctx.active() else { return 0 };
    handlers::class_from_type(active, ctx.injected(), Address::new(type_ptr), || unsafe {
        let f: ClassFromTypeFn =
            std::mem::transmute(ctx.trampolines().class_from_type.wait().as_u64());
        Address::new(f(type_ptr))
    })
    .as_u64()
}

/// # Safety
/// Called by the VM through the detour; `type_out` is the native routine's
/// out-param and may be null.
pub unsafe extern "C" fn field_default_value(field: u64, type_out: *mut u64) -> u64 {
    let Some(ctx) = context() else { return 0 };
    let Ok(active) = ctx.active() else { return 0 };
    let (blob, ty) = handlers::field_default_value(active, ctx.injected(), Address::new(field), || unsafe {
        let f: FieldDefaultValueFn =
            std::mem::transmute(ctx.trampolines().field_default_value.wait().as_u64());
        let mut out = 0u64;
        let blob = f(field, &mut out);
        (Address::new(blob), Address::new(out))
    });
    if !type_out.is_null() {
        *type_out = ty.as_u64();
    }
    blob.as_u64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::{DispatchTable, HookInstaller, TableDetour};
    use crate::memory::ModuleImage;
    use crate::versioning::VmVersion;

    unsafe extern "C" fn native_class_by_name(
        _image: u64,
        _namespace: *const c_char,
        name: *const c_char,
    ) -> u64 {
        // the "VM": knows exactly one class
        if CStr::from_ptr(name).to_bytes() == b"Known" {
            0xBEEF
        } else {
            0
        }
    }

    #[test]
    fn test_hook_targets_are_distinct_function_addresses() {
        let targets = hook_targets();
        let all = [
            targets.class_by_name,
            targets.class_from_typedef_index,
            targets.class_from_type,
            targets.field_default_value,
        ];
        for (i, a) in all.iter().enumerate() {
            assert!(!a.is_null());
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    // The shims dispatch through a process-wide context, so everything that
    // needs a bound context lives in this one test.
    #[test]
    fn test_end_to_end_dispatch_through_hooked_table() {
        let _ = env_logger::builder().is_test(true).try_init();

        let module = ModuleImage::synthetic("vm.dll")
            .base(Address::new(0x1000))
            .code(vec![0x90; 0x10])
            .build();
        let ctx = Arc::new(InteropContext::attach(module, VmVersion::new(2019, 3, 15)).unwrap());
        bind(Arc::clone(&ctx)).unwrap();
        assert!(matches!(bind(Arc::clone(&ctx)), Err(BridgeError::AlreadyBound)));

        let token = ctx.injected().register_token(Address::new(0xAAAA));
        assert_eq!(token, -2);
        assert_eq!(ctx.injected().lookup_by_token(-2), Some(Address::new(0xAAAA)));
        ctx.injected()
            .register_name("MyNs", "MyClass", Address::new(0xAAAA), &[Address::new(0x100)]);

        // the "VM" dispatches class-by-name through slot 0
        let table = DispatchTable::new(1);
        table.set(0, Address::from_ptr(native_class_by_name as *const ()));

        let installer = HookInstaller::new(TableDetour::new());
        unsafe {
            installer
                .install_into(
                    table.slot_address(0),
                    hook_targets().class_by_name,
                    &ctx.trampolines().class_by_name,
                )
                .unwrap();
        }

        let dispatch: ClassByNameFn = unsafe { std::mem::transmute(table.get(0).as_u64()) };

        // native miss, injected fallback
        let injected = unsafe {
            dispatch(
                0x100,
                b"MyNs\0".as_ptr() as *const c_char,
                b"MyClass\0".as_ptr() as *const c_char,
            )
        };
        assert_eq!(injected, 0xAAAA);

        // native hit passes through untouched
        let known = unsafe {
            dispatch(
                0x100,
                b"Sys\0".as_ptr() as *const c_char,
                b"Known\0".as_ptr() as *const c_char,
            )
        };
        assert_eq!(known, 0xBEEF);

        // unknown everywhere: null
        let missing = unsafe {
            dispatch(
                0x100,
                b"MyNs\0".as_ptr() as *const c_char,
                b"Nope\0".as_ptr() as *const c_char,
            )
        };
        assert_eq!(missing, 0);

        // typedef-index shim answers injected tokens without a trampoline
        let by_index = unsafe { class_from_typedef_index(-2) };
        assert_eq!(by_index, 0xAAAA);
    }
}
