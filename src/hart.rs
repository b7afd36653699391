//! Processor core
//!
//! The Hart is the simplest possible RISC-V-family hardware thread:
//! its only state is the tuple (registers, pc), and each call to
//! step() executes exactly one instruction against the address space
//! the hart owns. There is no pipeline and no privilege machinery;
//! one step is one atomic state transition.
//!
//! step() returns any fault to the caller instead of panicking or
//! swallowing it; the driver loop decides whether to keep stepping.
//! A fetch or decode fault leaves pc at the faulting instruction, so
//! the driver can report where execution stopped.

use thiserror::Error;

use crate::instr::decode::{Branch, DecodeError, Instr, Load};
use crate::utils::{interpret_u32_as_signed, sign_extend};

use self::memory::{AddressSpace, MemoryError};
use self::registers::{RegisterError, Registers};

pub mod memory;
pub mod registers;

/// What to do when decode hits an opcode outside the implemented set
///
/// Fault surfaces the decode error through step(). Advance reproduces
/// the permissive behavior of treating the word as a no-op that still
/// takes its pc += 4, which exists for differential testing against
/// implementations with that behavior.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum UnknownInstr {
    #[default]
    Fault,
    Advance,
}

/// RISC-V hardware thread
///
/// Registers and pc are zero-initialised at creation. The hart has
/// exclusive ownership of its address space; external code that needs
/// to touch memory between steps does so through overlay storage
/// handles, or through the mem field directly.
#[derive(Debug)]
pub struct Hart {
    pub pc: u32,
    pub registers: Registers,
    pub mem: AddressSpace,
    pub unknown_instr: UnknownInstr,
}

#[derive(Error, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Trap {
    #[error("instruction fetch failed: {0}")]
    FetchFailed(MemoryError),
    #[error("instruction decode failed: {0}")]
    DecodeFailed(DecodeError),
    #[error("instruction execution failed: {0}")]
    ExecutionFailed(ExecutionError),
}

#[derive(Error, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ExecutionError {
    #[error("memory access error: {0}")]
    MemoryError(MemoryError),
    #[error("register access error: {0}")]
    RegisterError(RegisterError),
}

impl From<MemoryError> for ExecutionError {
    fn from(e: MemoryError) -> ExecutionError {
        ExecutionError::MemoryError(e)
    }
}

impl From<RegisterError> for ExecutionError {
    fn from(e: RegisterError) -> ExecutionError {
        ExecutionError::RegisterError(e)
    }
}

impl From<ExecutionError> for Trap {
    fn from(e: ExecutionError) -> Trap {
        Trap::ExecutionFailed(e)
    }
}

impl Hart {
    pub fn new(mem: AddressSpace) -> Self {
        Self {
            pc: 0,
            registers: Registers::default(),
            mem,
            unknown_instr: UnknownInstr::default(),
        }
    }

    /// Add 4 to the program counter, wrapping if necessary
    fn increment_pc(&mut self) {
        self.pc = self.pc.wrapping_add(4);
    }

    /// Fetch, decode and execute one instruction
    ///
    /// Not reentrant: the caller's loop is the only scheduler. Any
    /// fault is returned synchronously; calling step() again after a
    /// fault retries from the hart's current state.
    pub fn step(&mut self) -> Result<(), Trap> {
        let word = self.mem.read32(self.pc).map_err(Trap::FetchFailed)?;
        let instr = match Instr::try_from(word) {
            Ok(instr) => instr,
            Err(err) => match self.unknown_instr {
                UnknownInstr::Fault => return Err(Trap::DecodeFailed(err)),
                UnknownInstr::Advance => {
                    self.increment_pc();
                    return Ok(());
                }
            },
        };
        self.execute(instr)?;
        Ok(())
    }

    fn execute(&mut self, instr: Instr) -> Result<(), ExecutionError> {
        match instr {
            Instr::Lui { dest, u_immediate } => {
                self.registers.write(dest, u_immediate)?;
                self.increment_pc();
            }
            Instr::Auipc { dest, u_immediate } => {
                self.registers.write(dest, u_immediate.wrapping_add(self.pc))?;
                self.increment_pc();
            }
            Instr::Jal { dest, offset } => {
                self.registers.write(dest, self.pc.wrapping_add(4))?;
                self.pc = self.pc.wrapping_add(offset);
            }
            Instr::Jalr { dest, base, offset } => {
                // dest is written before the target is computed, so
                // jalr with dest == base jumps via the link value
                self.registers.write(dest, self.pc.wrapping_add(4))?;
                self.pc = self.registers.read(base)?.wrapping_add(offset);
            }
            Instr::Branch {
                mnemonic,
                src1,
                src2,
                offset,
            } => {
                let src1 = self.registers.read(src1)?;
                let src2 = self.registers.read(src2)?;
                let branch_taken = match mnemonic {
                    Branch::Beq => src1 == src2,
                    Branch::Bne => src1 != src2,
                    Branch::Blt => interpret_u32_as_signed(src1) < interpret_u32_as_signed(src2),
                    Branch::Bge => interpret_u32_as_signed(src1) >= interpret_u32_as_signed(src2),
                    Branch::Bltu => src1 < src2,
                    Branch::Bgeu => src1 >= src2,
                };
                if branch_taken {
                    self.pc = self.pc.wrapping_add(offset);
                } else {
                    self.increment_pc();
                }
            }
            Instr::Load {
                mnemonic,
                dest,
                base,
                offset,
            } => {
                let addr = self.registers.read(base)?.wrapping_add(offset);
                let word = self.mem.read32(addr)?;
                let value = match mnemonic {
                    Load::Lb => sign_extend(word & 0xff, 7),
                    Load::Lh => sign_extend(word & 0xffff, 15),
                    Load::Lw => word,
                    Load::Lbu => word & 0xff,
                    Load::Lhu => word & 0xffff,
                };
                self.registers.write(dest, value)?;
                self.increment_pc();
            }
        }
        Ok(())
    }
}
