// Sun Jan 25 2026 - Alex
//
// x86-64 inline patching. The target's first whole instructions (enough to
// cover a 12-byte absolute jump) move into an executable trampoline buffer,
// followed by a jump back; the freed prologue bytes become an absolute jump
// to the handler.

use crate::hook::{DetourBackend, HookError};
use crate::memory::Address;

// mov rax, imm64 (10 bytes) + jmp rax (2 bytes)
const PATCH_LEN: usize = 12;
const TRAMPOLINE_CAPACITY: usize = 64;

/// Bytes of one instruction at the start of `code`, for the prologue forms
/// compilers actually emit. Anything else is refused rather than guessed;
/// splitting an instruction would leave the trampoline executing garbage.
fn instruction_len(code: &[u8], at: Address) -> Result<usize, HookError> {
    let unsupported = |opcode| HookError::UnsupportedPrologue { address: at, opcode };
    match code {
        [] => Err(unsupported(0)),
        // push r64 / pop r64 / nop
        [0x50..=0x5F, ..] | [0x90, ..] => Ok(1),
        // REX.B push/pop r8-r15
        [0x41, 0x50..=0x5F, ..] => Ok(2),
        // sub rsp, imm8
        [0x48, 0x83, 0xEC, _, ..] => Ok(4),
        // sub rsp, imm32
        [0x48, 0x81, 0xEC, _, _, _, _, ..] => Ok(7),
        // mov r64, r64 (register-direct only)
        [0x48 | 0x49 | 0x4C, 0x89 | 0x8B, modrm, ..] if modrm >> 6 == 0b11 => Ok(3),
        // mov [rsp+disp8], r64 (spill of an argument register)
        [0x48 | 0x4C, 0x89, modrm, 0x24, _, ..] if modrm >> 6 == 0b01 && modrm & 0x07 == 0x04 => {
            Ok(5)
        }
        [opcode, ..] => Err(unsupported(*opcode)),
    }
}

/// Whole-instruction byte count covering at least `PATCH_LEN` bytes.
fn prologue_len(code: &[u8], at: Address) -> Result<usize, HookError> {
    let mut len = 0;
    while len < PATCH_LEN {
        len += instruction_len(&code[len..], at + len as u64)?;
    }
    Ok(len)
}

fn write_abs_jump(buf: &mut [u8], destination: Address) {
    buf[0] = 0x48;
    buf[1] = 0xB8;
    buf[2..10].copy_from_slice(&destination.as_u64().to_le_bytes());
    buf[10] = 0xFF;
    buf[11] = 0xE0;
}

pub struct InlineDetour;

impl InlineDetour {
    pub fn new() -> Self {
        Self
    }

    #[cfg(unix)]
    unsafe fn alloc_trampoline(&self) -> Result<Address, HookError> {
        let buf = libc::mmap(
            std::ptr::null_mut(),
            TRAMPOLINE_CAPACITY,
            libc::PROT_READ | libc::PROT_WRITE | libc::PROT_EXEC,
            libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
            -1,
            0,
        );
        if buf == libc::MAP_FAILED {
            return Err(HookError::TrampolineAllocFailed {
                errno: std::io::Error::last_os_error().raw_os_error().unwrap_or(0),
            });
        }
        Ok(Address::from_ptr(buf as *const u8))
    }

    #[cfg(unix)]
    unsafe fn unprotect(&self, target: Address, len: usize) -> Result<(), HookError> {
        let page = libc::sysconf(libc::_SC_PAGESIZE) as u64;
        let start = target.as_u64() & !(page - 1);
        let span = (target.as_u64() + len as u64 - start).next_multiple_of(page) as usize;
        if libc::mprotect(
            start as *mut libc::c_void,
            span,
            libc::PROT_READ | libc::PROT_WRITE | libc::PROT_EXEC,
        ) != 0
        {
            return Err(HookError::ProtectFailed {
                address: target,
                errno: std::io::Error::last_os_error().raw_os_error().unwrap_or(0),
            });
        }
        Ok(())
    }
}

impl Default for InlineDetour {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
impl DetourBackend for InlineDetour {
    unsafe fn install(&self, target: Address, handler: Address) -> Result<Address, HookError> {
        let prologue = std::slice::from_raw_parts(target.as_ptr(), 32);
        let keep = prologue_len(prologue, target)?;

        let trampoline = self.alloc_trampoline()?;
        let buf = std::slice::from_raw_parts_mut(trampoline.as_mut_ptr(), TRAMPOLINE_CAPACITY);
        buf[..keep].copy_from_slice(&prologue[..keep]);
        write_abs_jump(&mut buf[keep..keep + PATCH_LEN], target + keep as u64);

        self.unprotect(target, keep)?;
        let patch = std::slice::from_raw_parts_mut(target.as_mut_ptr(), keep);
        write_abs_jump(&mut patch[..PATCH_LEN], handler);
        // pad any instruction tail so a mid-prologue jump lands on int3
        patch[PATCH_LEN..].fill(0xCC);

        Ok(trampoline)
    }
}
