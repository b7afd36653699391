//! Instruction words
//!
//! Decoding a fetched u32 into the Instr enum, the inverse encoding
//! used to assemble instruction words, and the opcode/funct3 constants
//! shared by both directions.

pub mod decode;
pub mod encode;
pub mod opcodes;
