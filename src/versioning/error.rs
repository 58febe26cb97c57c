// Wed Jan 21 2026 - Alex

use crate::versioning::{Capability, VmVersion};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("No {capability} accessor registered for VM {version}; this likely indicates a severe error somewhere")]
    NoHandler { capability: Capability, version: VmVersion },
    #[error("Factory for {factory} registered under capability {capability}")]
    CapabilityMismatch { capability: Capability, factory: Capability },
    #[error("Registry used before a VM version was configured")]
    NotConfigured,
}
