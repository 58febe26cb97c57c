// Mon Jan 19 2026 - Alex

pub mod address;
pub mod alloc;
pub mod error;
pub mod module;
pub mod raw;

pub use address::Address;
pub use alloc::alloc_zeroed;
pub use error::MemoryError;
pub use module::{CodeRegion, ModuleImage, SyntheticModuleBuilder};
