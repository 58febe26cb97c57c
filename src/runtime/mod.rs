// Tue Jan 27 2026 - Alex

pub mod bootstrap;
pub mod context;
pub mod error;
pub mod handlers;
pub mod shims;

pub use bootstrap::InjectedModule;
pub use context::{DiscoveredRoutines, HookTargets, InteropContext, Trampolines};
pub use error::BridgeError;
