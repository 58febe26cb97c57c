// Mon Jan 19 2026 - Alex

use crate::memory::{Address, ModuleImage};
use crate::symbol::SymbolError;
use log::trace;

/// Resolves named exported symbols of a module to addresses.
pub struct ExportResolver<'a> {
    module: &'a ModuleImage,
}

impl<'a> ExportResolver<'a> {
    pub fn new(module: &'a ModuleImage) -> Self {
        Self { module }
    }

    /// Required lookup: a miss is fatal for discovery, so it surfaces as an
    /// error naming both the symbol and the module searched.
    pub fn resolve(&self, name: &str) -> Result<Address, SymbolError> {
        match self.try_resolve(name) {
            Some(addr) => {
                trace!("{}: {}", name, addr);
                Ok(addr)
            }
            None => Err(SymbolError::ExportNotFound {
                symbol: name.to_string(),
                module: self.module.name().to_string(),
            }),
        }
    }

    pub fn try_resolve(&self, name: &str) -> Option<Address> {
        self.module.exports().get_by_name(name).map(|e| e.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::ModuleImage;

    #[test]
    fn test_resolve_present_export() {
        let module = ModuleImage::synthetic("vm.dll")
            .export("vm_class_from_name", Address::new(0x4040))
            .build();
        let resolver = ExportResolver::new(&module);

        assert_eq!(resolver.resolve("vm_class_from_name").unwrap(), Address::new(0x4040));
    }

    #[test]
    fn test_missing_required_export_names_symbol_and_module() {
        let module = ModuleImage::synthetic("vm.dll").build();
        let resolver = ExportResolver::new(&module);

        let err = resolver.resolve("vm_not_there").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("vm_not_there"));
        assert!(message.contains("vm.dll"));

        assert!(resolver.try_resolve("vm_not_there").is_none());
    }
}
