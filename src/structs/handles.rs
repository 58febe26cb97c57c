// Thu Jan 22 2026 - Alex
//
// Opaque handles over raw native struct addresses. A handle only promises
// that the address was produced by the active accessor's `wrap` or
// `allocate`; all layout knowledge stays with the accessor.

use crate::memory::Address;
use std::fmt;

macro_rules! struct_handle {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(Address);

        impl $name {
            pub fn new(addr: Address) -> Self {
                Self(addr)
            }

            pub fn address(self) -> Address {
                self.0
            }

            pub fn is_null(self) -> bool {
                self.0.is_null()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

struct_handle!(AssemblyHandle);
struct_handle!(ClassHandle);
struct_handle!(EventHandle);
struct_handle!(ExceptionHandle);
struct_handle!(FieldHandle);
struct_handle!(ImageHandle);
struct_handle!(MethodHandle);
struct_handle!(ParameterHandle);
struct_handle!(PropertyHandle);
struct_handle!(TypeHandle);
