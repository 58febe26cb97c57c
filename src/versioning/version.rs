// Wed Jan 21 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The VM release triple supplied by configuration before first use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VmVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl VmVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    pub fn metadata(&self) -> MetadataVersion {
        MetadataVersion::from_vm(*self)
    }
}

impl fmt::Display for VmVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for VmVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('.');
        let mut next = |name: &str| -> Result<u32, String> {
            parts
                .next()
                .map(|p| p.parse::<u32>().map_err(|e| format!("bad {} in '{}': {}", name, s, e)))
                .unwrap_or(Ok(0))
        };
        let major = next("major")?;
        let minor = next("minor")?;
        let patch = next("patch")?;
        Ok(Self { major, minor, patch })
    }
}

/// Coarse ordinal of the VM's metadata file format. Call shapes in the
/// binary differ across format revisions, so discovery recipes branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MetadataVersion(pub u32);

impl MetadataVersion {
    /// Floors observed across VM releases; only the coarse ordering matters
    /// to the recipes.
    pub fn from_vm(version: VmVersion) -> Self {
        let floors = [
            (VmVersion::new(2021, 2, 0), 29),
            (VmVersion::new(2020, 2, 0), 27),
            (VmVersion::new(2019, 1, 0), 24),
            (VmVersion::new(2017, 1, 0), 23),
        ];
        for (floor, ordinal) in floors {
            if version >= floor {
                return Self(ordinal);
            }
        }
        Self(16)
    }

    pub fn at_least(&self, ordinal: u32) -> bool {
        self.0 >= ordinal
    }
}
