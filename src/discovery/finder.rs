// Sat Jan 24 2026 - Alex

use crate::discovery::{DiscoveryError, FunctionRecipe};
use crate::memory::{Address, ModuleImage};
use crate::pattern::SignatureScanner;
use crate::symbol::ExportResolver;
use crate::versioning::MetadataVersion;
use crate::xref::{CallTracer, RelCallTracer};
use log::{debug, trace, warn};

/// Which strategy of a recipe produced the address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryPath {
    CallChain,
    Signature,
    FallbackExport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveredFunction {
    pub name: &'static str,
    pub address: Address,
    pub via: DiscoveryPath,
}

/// Evaluates recipes against one module: anchor export, hop chain (with the
/// metadata-gated alternate), signature fallbacks, fallback export, in that
/// order. Exhausting every strategy is fatal.
pub struct FunctionDiscovery<'a> {
    module: &'a ModuleImage,
    metadata: MetadataVersion,
    tracer: Box<dyn CallTracer>,
    scanner: SignatureScanner,
}

impl<'a> FunctionDiscovery<'a> {
    pub fn new(module: &'a ModuleImage, metadata: MetadataVersion) -> Self {
        Self {
            module,
            metadata,
            tracer: Box::new(RelCallTracer::new()),
            scanner: SignatureScanner::new(),
        }
    }

    pub fn with_tracer(mut self, tracer: Box<dyn CallTracer>) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn with_scanner(mut self, scanner: SignatureScanner) -> Self {
        self.scanner = scanner;
        self
    }

    pub fn locate(&self, recipe: &FunctionRecipe) -> Result<DiscoveredFunction, DiscoveryError> {
        let resolver = ExportResolver::new(self.module);

        if let Some(anchor) = recipe.anchor {
            match resolver.try_resolve(anchor) {
                Some(start) => {
                    let address = self.walk(recipe, start)?;
                    return Ok(DiscoveredFunction {
                        name: recipe.name,
                        address,
                        via: DiscoveryPath::CallChain,
                    });
                }
                None => {
                    debug!("{}: anchor {} not exported by {}", recipe.name, anchor, self.module.name());
                }
            }
        }

        if !recipe.signatures.is_empty() {
            if let Some(address) = self.scanner.scan(self.module, &recipe.signatures) {
                trace!("{}: signature hit at {}", recipe.name, address);
                return Ok(DiscoveredFunction {
                    name: recipe.name,
                    address,
                    via: DiscoveryPath::Signature,
                });
            }
            warn!(
                "{}: all {} signatures exhausted in {}",
                recipe.name,
                recipe.signatures.len(),
                self.module.name()
            );
        }

        if let Some(export) = recipe.fallback_export {
            if let Some(address) = resolver.try_resolve(export) {
                trace!("{}: fallback export {} at {}", recipe.name, export, address);
                return Ok(DiscoveredFunction {
                    name: recipe.name,
                    address,
                    via: DiscoveryPath::FallbackExport,
                });
            }
        }

        Err(DiscoveryError::UnsupportedBinary {
            routine: recipe.name,
            module_base: self.module.base(),
        })
    }

    fn walk(&self, recipe: &FunctionRecipe, start: Address) -> Result<Address, DiscoveryError> {
        let mut cursor = start;
        for (i, hop) in recipe.chain_for(self.metadata).iter().enumerate() {
            let targets = self.tracer.jump_targets(self.module, cursor);
            let next = hop.pick(recipe.name, cursor, &targets)?;
            trace!("{}: hop {} {} -> {} ({} targets)", recipe.name, i, cursor, next, targets.len());
            cursor = next;
        }
        Ok(cursor)
    }
}
