// Sat Jan 24 2026 - Alex

use crate::discovery::DiscoveryError;
use crate::memory::Address;
use crate::pattern::SignatureDefinition;
use crate::versioning::MetadataVersion;

/// How to pick the next address among the call targets of one hop.
///
/// A hop that finds no targets at all means the callee was inlined into the
/// current function; every selection then stays at the current address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HopSelect {
    /// Exactly one target must survive; more than one is fatal.
    Single,
    First,
    Last,
}

impl HopSelect {
    pub fn pick(
        &self,
        routine: &'static str,
        current: Address,
        targets: &[Address],
    ) -> Result<Address, DiscoveryError> {
        if targets.is_empty() {
            return Ok(current);
        }
        match self {
            HopSelect::Single if targets.len() > 1 => Err(DiscoveryError::AmbiguousCallTarget {
                routine,
                address: current,
                candidates: targets.len(),
            }),
            HopSelect::Single | HopSelect::First => Ok(targets[0]),
            HopSelect::Last => Ok(targets[targets.len() - 1]),
        }
    }
}

/// Replacement hop chain used when the module's metadata format is at least
/// `min_metadata`. Newer formats add indirection to some call shapes.
pub struct MetadataAlternate {
    pub min_metadata: MetadataVersion,
    pub hops: Vec<HopSelect>,
}

/// Everything needed to locate one unexported routine: an export to start
/// from, a fixed hop chain through its call graph, and the fallbacks to try
/// when the chain does not apply to this binary.
///
/// Hop counts and selections are tuned against observed binaries per VM
/// family; there is no structural check that the resolved address is the
/// intended routine.
pub struct FunctionRecipe {
    pub name: &'static str,
    pub anchor: Option<&'static str>,
    pub hops: Vec<HopSelect>,
    pub alternate: Option<MetadataAlternate>,
    pub signatures: Vec<SignatureDefinition>,
    pub fallback_export: Option<&'static str>,
}

impl FunctionRecipe {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            anchor: None,
            hops: Vec::new(),
            alternate: None,
            signatures: Vec::new(),
            fallback_export: None,
        }
    }

    pub fn anchor(mut self, export: &'static str) -> Self {
        self.anchor = Some(export);
        self
    }

    pub fn hop(mut self, select: HopSelect) -> Self {
        self.hops.push(select);
        self
    }

    pub fn alternate_when_metadata_at_least(
        mut self,
        min_metadata: MetadataVersion,
        hops: Vec<HopSelect>,
    ) -> Self {
        self.alternate = Some(MetadataAlternate { min_metadata, hops });
        self
    }

    pub fn signature(mut self, definition: SignatureDefinition) -> Self {
        self.signatures.push(definition);
        self
    }

    pub fn fallback_export(mut self, export: &'static str) -> Self {
        self.fallback_export = Some(export);
        self
    }

    /// The hop chain applicable under `metadata`.
    pub fn chain_for(&self, metadata: MetadataVersion) -> &[HopSelect] {
        match &self.alternate {
            Some(alt) if metadata >= alt.min_metadata => &alt.hops,
            _ => &self.hops,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_rejects_multiple_targets() {
        let targets = [Address::new(0x10), Address::new(0x20)];
        let err = HopSelect::Single
            .pick("some_routine", Address::new(0x1), &targets)
            .unwrap_err();
        assert!(matches!(
            err,
            DiscoveryError::AmbiguousCallTarget { candidates: 2, .. }
        ));
    }

    #[test]
    fn test_empty_targets_stay_at_current() {
        for select in [HopSelect::Single, HopSelect::First, HopSelect::Last] {
            let picked = select.pick("r", Address::new(0x42), &[]).unwrap();
            assert_eq!(picked, Address::new(0x42));
        }
    }

    #[test]
    fn test_first_and_last_selection() {
        let targets = [Address::new(0x10), Address::new(0x20), Address::new(0x30)];
        assert_eq!(
            HopSelect::First.pick("r", Address::zero(), &targets).unwrap(),
            Address::new(0x10)
        );
        assert_eq!(
            HopSelect::Last.pick("r", Address::zero(), &targets).unwrap(),
            Address::new(0x30)
        );
    }

    #[test]
    fn test_alternate_chain_gated_on_metadata() {
        let recipe = FunctionRecipe::new("r")
            .hop(HopSelect::Single)
            .alternate_when_metadata_at_least(
                MetadataVersion(29),
                vec![HopSelect::Single, HopSelect::Last],
            );

        assert_eq!(recipe.chain_for(MetadataVersion(27)).len(), 1);
        assert_eq!(recipe.chain_for(MetadataVersion(29)).len(), 2);
        assert_eq!(recipe.chain_for(MetadataVersion(31)).len(), 2);
    }
}
