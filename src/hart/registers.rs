use thiserror::Error;

/// The 32 general-purpose registers
///
/// Instructions address the registers numerically; x0 is the
/// architectural zero constant, so reads of it return 0 and writes to
/// it are discarded rather than stored.
#[derive(Debug, Default)]
pub struct Registers {
    registers: [u32; 32],
}

#[derive(Error, Clone, Copy, PartialEq, Eq, Debug)]
pub enum RegisterError {
    #[error("encountered invalid register index {0}")]
    InvalidIndex(u8),
}

impl Registers {
    pub fn read(&self, which: u8) -> Result<u32, RegisterError> {
        if which > 31 {
            Err(RegisterError::InvalidIndex(which))
        } else {
            Ok(self.registers[usize::from(which)])
        }
    }

    pub fn write(&mut self, which: u8, value: u32) -> Result<(), RegisterError> {
        if which > 31 {
            Err(RegisterError::InvalidIndex(which))
        } else {
            if which != 0 {
                self.registers[usize::from(which)] = value;
            }
            Ok(())
        }
    }
}
