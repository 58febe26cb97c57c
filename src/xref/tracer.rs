// Tue Jan 20 2026 - Alex

use crate::memory::{Address, ModuleImage};

/// Jump-target query over a function's instruction stream: the addresses it
/// unconditionally calls or tail-jumps to, in program order.
///
/// Full instruction decoding lives outside this crate; hosts with a real
/// disassembler plug it in through this trait.
pub trait CallTracer: Send + Sync {
    fn jump_targets(&self, module: &ModuleImage, addr: Address) -> Vec<Address>;
}

const CALL_REL32: u8 = 0xE8;
const JMP_REL32: u8 = 0xE9;
const RET: u8 = 0xC3;
const INT3: u8 = 0xCC;

/// Minimal x86-64 follower: collects `E8 rel32` call targets from a function
/// until the first `ret`, padding byte or unconditional `E9 rel32` tail jump
/// (whose target is also collected). Sufficient for the VM thunk shapes the
/// discovery recipes walk; anything denser needs an external tracer.
pub struct RelCallTracer {
    max_scan: usize,
}

impl RelCallTracer {
    pub fn new() -> Self {
        Self { max_scan: 0x200 }
    }

    pub fn with_max_scan(mut self, max_scan: usize) -> Self {
        self.max_scan = max_scan;
        self
    }
}

impl Default for RelCallTracer {
    fn default() -> Self {
        Self::new()
    }
}

impl CallTracer for RelCallTracer {
    fn jump_targets(&self, module: &ModuleImage, addr: Address) -> Vec<Address> {
        let mut targets = Vec::new();
        let mut cursor = addr;
        let end = module.code().end();

        for _ in 0..self.max_scan {
            if !module.code().contains(cursor) {
                break;
            }
            let opcode = match module.read_u8(cursor) {
                Ok(b) => b,
                Err(_) => break,
            };

            match opcode {
                CALL_REL32 | JMP_REL32 => {
                    if cursor + 5 > end {
                        break;
                    }
                    if let Ok(rel) = module.read_i32(cursor + 1) {
                        targets.push(cursor.offset(5 + rel as i64));
                    }
                    if opcode == JMP_REL32 {
                        break;
                    }
                    cursor = cursor + 5;
                }
                RET | INT3 => break,
                _ => cursor = cursor + 1,
            }
        }

        targets
    }
}
