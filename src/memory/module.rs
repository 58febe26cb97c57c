// Mon Jan 19 2026 - Alex

use crate::memory::{Address, MemoryError};
use crate::symbol::{ExportTable, ExportedSymbol};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

const IMAGE_SCN_MEM_EXECUTE: u32 = 0x2000_0000;

/// The executable region of a module: its bytes plus the virtual range they
/// occupy in the hosting process.
#[derive(Debug, Clone, Copy)]
pub struct CodeRegion {
    pub start: Address,
    pub len: usize,
}

impl CodeRegion {
    pub fn end(&self) -> Address {
        self.start + self.len as u64
    }

    pub fn contains(&self, addr: Address) -> bool {
        addr.is_within_range(self.start, self.end())
    }
}

enum CodeStore {
    Owned(Vec<u8>),
    Live { ptr: *const u8, len: usize },
}

// Live variants view the hosting process's own module memory, which is
// process-global and never unmapped while we run.
unsafe impl Send for CodeStore {}
unsafe impl Sync for CodeStore {}

/// Memory image of one loaded native module: base address, named export
/// table and code section bytes.
pub struct ModuleImage {
    name: String,
    base: Address,
    code: CodeRegion,
    store: CodeStore,
    exports: ExportTable,
}

impl ModuleImage {
    /// Parses a PE from disk. The export table and the first executable
    /// section are lifted at their preferred virtual addresses.
    pub fn from_pe(path: &Path) -> Result<Self, MemoryError> {
        let file = File::open(path)?;
        let map = unsafe { Mmap::map(&file)? };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_pe_bytes(&name, &map)
    }

    pub fn from_pe_bytes(name: &str, bytes: &[u8]) -> Result<Self, MemoryError> {
        let pe = goblin::pe::PE::parse(bytes)
            .map_err(|e| MemoryError::BinaryParseError(e.to_string()))?;
        let base = Address::new(pe.image_base as u64);

        let section = pe
            .sections
            .iter()
            .find(|s| s.characteristics & IMAGE_SCN_MEM_EXECUTE != 0)
            .ok_or_else(|| MemoryError::NoCodeSection(name.to_string()))?;

        let raw_start = section.pointer_to_raw_data as usize;
        let raw_len = (section.size_of_raw_data as usize).min(bytes.len().saturating_sub(raw_start));
        let code_bytes = bytes[raw_start..raw_start + raw_len].to_vec();
        let code = CodeRegion {
            start: base + section.virtual_address as u64,
            len: code_bytes.len(),
        };

        let mut exports = ExportTable::new();
        for export in &pe.exports {
            if let Some(export_name) = export.name {
                exports.add(ExportedSymbol {
                    name: export_name.to_string(),
                    address: base + export.rva as u64,
                });
            }
        }

        Ok(Self {
            name: name.to_string(),
            base,
            code,
            store: CodeStore::Owned(code_bytes),
            exports,
        })
    }

    /// Views a module already mapped into the current process.
    ///
    /// # Safety
    /// `code_start..code_start + code_len` must stay mapped and readable for
    /// the lifetime of the image.
    pub unsafe fn from_live(name: &str, base: Address, code_start: Address, code_len: usize, exports: ExportTable) -> Self {
        Self {
            name: name.to_string(),
            base,
            code: CodeRegion { start: code_start, len: code_len },
            store: CodeStore::Live { ptr: code_start.as_ptr(), len: code_len },
            exports,
        }
    }

    pub fn synthetic(name: &str) -> SyntheticModuleBuilder {
        SyntheticModuleBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> Address {
        self.base
    }

    pub fn code(&self) -> CodeRegion {
        self.code
    }

    pub fn code_bytes(&self) -> &[u8] {
        match &self.store {
            CodeStore::Owned(bytes) => bytes,
            CodeStore::Live { ptr, len } => unsafe { std::slice::from_raw_parts(*ptr, *len) },
        }
    }

    pub fn exports(&self) -> &ExportTable {
        &self.exports
    }

    /// Bounds-checked view of `len` bytes of code at `addr`.
    pub fn slice_at(&self, addr: Address, len: usize) -> Result<&[u8], MemoryError> {
        let offset = addr - self.code.start;
        if offset < 0 || offset as usize + len > self.code.len {
            return Err(MemoryError::OutOfBounds(addr.as_u64()));
        }
        let offset = offset as usize;
        Ok(&self.code_bytes()[offset..offset + len])
    }

    pub fn read_u8(&self, addr: Address) -> Result<u8, MemoryError> {
        Ok(self.slice_at(addr, 1)?[0])
    }

    pub fn read_i32(&self, addr: Address) -> Result<i32, MemoryError> {
        let bytes = self.slice_at(addr, 4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

/// Builds an in-memory module for tests: caller lays out code bytes and
/// exports at chosen virtual addresses.
pub struct SyntheticModuleBuilder {
    name: String,
    base: Address,
    code: Vec<u8>,
    exports: ExportTable,
}

impl SyntheticModuleBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            base: Address::new(0x1000_0000),
            code: Vec::new(),
            exports: ExportTable::new(),
        }
    }

    pub fn base(mut self, base: Address) -> Self {
        self.base = base;
        self
    }

    pub fn code(mut self, bytes: Vec<u8>) -> Self {
        self.code = bytes;
        self
    }

    pub fn export(mut self, name: &str, addr: Address) -> Self {
        self.exports.add(ExportedSymbol { name: name.to_string(), address: addr });
        self
    }

    pub fn build(self) -> ModuleImage {
        let len = self.code.len();
        ModuleImage {
            name: self.name,
            base: self.base,
            code: CodeRegion { start: self.base, len },
            store: CodeStore::Owned(self.code),
            exports: self.exports,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_module_layout() {
        let module = ModuleImage::synthetic("vm.dll")
            .base(Address::new(0x1000))
            .code(vec![0x90; 64])
            .export("vm_class_from_name", Address::new(0x1010))
            .build();

        assert_eq!(module.base(), Address::new(0x1000));
        assert_eq!(module.code().len, 64);
        assert_eq!(
            module.exports().get_by_name("vm_class_from_name").unwrap().address,
            Address::new(0x1010)
        );
    }

    #[test]
    fn test_slice_at_bounds() {
        let module = ModuleImage::synthetic("vm.dll")
            .base(Address::new(0x1000))
            .code(vec![1, 2, 3, 4])
            .build();

        assert_eq!(module.slice_at(Address::new(0x1001), 2).unwrap(), &[2, 3]);
        assert!(module.slice_at(Address::new(0x1003), 2).is_err());
        assert!(module.slice_at(Address::new(0x0FFF), 1).is_err());
    }

    #[test]
    fn test_read_i32_little_endian() {
        let module = ModuleImage::synthetic("vm.dll")
            .base(Address::new(0x1000))
            .code(vec![0xE8, 0x10, 0x00, 0x00, 0x00])
            .build();

        assert_eq!(module.read_u8(Address::new(0x1000)).unwrap(), 0xE8);
        assert_eq!(module.read_i32(Address::new(0x1001)).unwrap(), 0x10);
    }
}
