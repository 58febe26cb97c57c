// Mon Jan 19 2026 - Alex

#![allow(dead_code)]
#![allow(clippy::missing_safety_doc)]

pub mod memory;
pub mod pattern;
pub mod symbol;
pub mod xref;
pub mod discovery;
pub mod hook;
pub mod versioning;
pub mod structs;
pub mod inject;
pub mod runtime;

pub use memory::{Address, MemoryError, ModuleImage};
pub use pattern::{Pattern, SignatureDefinition, SignatureScanner};
pub use symbol::ExportResolver;
pub use xref::{CallTracer, RelCallTracer};
pub use discovery::{DiscoveredFunction, FunctionDiscovery, FunctionRecipe};
pub use hook::{DetourBackend, HookInstaller, TableDetour, TrampolineSlot};
pub use versioning::{Capability, HandlerRegistry, VmVersion};
pub use inject::InjectedRegistry;
pub use runtime::{BridgeError, InteropContext};
