// Wed Jan 21 2026 - Alex

pub mod capability;
pub mod error;
pub mod registry;
pub mod version;

pub use capability::Capability;
pub use error::RegistryError;
pub use registry::{AccessorFactory, ActiveHandlerSet, HandlerRegistry, Registration};
pub use version::{MetadataVersion, VmVersion};
