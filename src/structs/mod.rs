// Thu Jan 22 2026 - Alex

pub mod assembly;
pub mod class;
pub mod event;
pub mod exception;
pub mod field;
pub mod handles;
pub mod image;
pub mod method;
pub mod parameter;
pub mod property;
pub mod stock;
pub mod ty;

pub use assembly::{AssemblyAccessor, AssemblyLayout, LayoutAssemblyAccessor};
pub use class::{ClassAccessor, ClassFlags, ClassLayout, LayoutClassAccessor};
pub use event::{EventAccessor, EventLayout, LayoutEventAccessor};
pub use exception::{ExceptionAccessor, ExceptionLayout, LayoutExceptionAccessor};
pub use field::{FieldAccessor, FieldLayout, LayoutFieldAccessor};
pub use handles::{
    AssemblyHandle, ClassHandle, EventHandle, ExceptionHandle, FieldHandle, ImageHandle,
    MethodHandle, ParameterHandle, PropertyHandle, TypeHandle,
};
pub use image::{ImageAccessor, ImageLayout, LayoutImageAccessor};
pub use method::{LayoutMethodAccessor, MethodAccessor, MethodLayout};
pub use parameter::{LayoutParameterAccessor, ParameterAccessor, ParameterLayout};
pub use property::{LayoutPropertyAccessor, PropertyAccessor, PropertyLayout};
pub use stock::stock_registrations;
pub use ty::{LayoutTypeAccessor, TypeAccessor, TypeKind, TypeLayout};
