//! Instruction encoding
//!
//! The bit-exact inverse of decode: build u32 instruction words from
//! operand fields. The per-format builders take raw field values; the
//! per-instruction functions below them take register indexes and a
//! signed offset, and mask the offset into the format's immediate
//! fields. Used by tests to assemble programs into memory, and usable
//! by a driver for the same purpose.

use super::opcodes::*;
use crate::utils::mask;

/// Mask a value to n least significant bits and shift it left by s bits
fn mask_and_shift(value: u32, n_bits: u32, shift: u32) -> u32 {
    (mask(n_bits) & value) << shift
}

/// Make an I-type instruction
pub fn itype(imm: u32, rs1: u32, funct3: u32, rd: u32, opcode: u32) -> u32 {
    mask_and_shift(imm, 12, 20)
        | mask_and_shift(rs1, 5, 15)
        | mask_and_shift(funct3, 3, 12)
        | mask_and_shift(rd, 5, 7)
        | mask_and_shift(opcode, 7, 0)
}

/// Make an S-type instruction (imm[11:5] and imm[4:0] are split
/// across the word)
pub fn stype(imm: u32, rs2: u32, rs1: u32, funct3: u32, opcode: u32) -> u32 {
    mask_and_shift(imm >> 5, 7, 25)
        | mask_and_shift(rs2, 5, 20)
        | mask_and_shift(rs1, 5, 15)
        | mask_and_shift(funct3, 3, 12)
        | mask_and_shift(imm, 5, 7)
        | mask_and_shift(opcode, 7, 0)
}

/// Make a B-type instruction. Bit 0 of imm is discarded (branch
/// offsets are even).
pub fn btype(imm: u32, rs2: u32, rs1: u32, funct3: u32, opcode: u32) -> u32 {
    mask_and_shift(imm >> 12, 1, 31)
        | mask_and_shift(imm >> 5, 6, 25)
        | mask_and_shift(rs2, 5, 20)
        | mask_and_shift(rs1, 5, 15)
        | mask_and_shift(funct3, 3, 12)
        | mask_and_shift(imm >> 1, 4, 8)
        | mask_and_shift(imm >> 11, 1, 7)
        | mask_and_shift(opcode, 7, 0)
}

/// Make a U-type instruction. The 20-bit imm field lands in bits
/// 31:12 of the word.
pub fn ujtype(imm: u32, rd: u32, opcode: u32) -> u32 {
    mask_and_shift(imm, 20, 12) | mask_and_shift(rd, 5, 7) | mask_and_shift(opcode, 7, 0)
}

/// Make a J-type instruction from a byte offset. Bit 0 of the offset
/// is discarded (jump offsets are even).
pub fn jtype(offset: u32, rd: u32, opcode: u32) -> u32 {
    mask_and_shift(offset >> 20, 1, 31)
        | mask_and_shift(offset >> 1, 10, 21)
        | mask_and_shift(offset >> 11, 1, 20)
        | mask_and_shift(offset >> 12, 8, 12)
        | mask_and_shift(rd, 5, 7)
        | mask_and_shift(opcode, 7, 0)
}

pub fn lui(rd: u8, u_immediate: u32) -> u32 {
    ujtype(u_immediate, rd.into(), OP_LUI)
}

pub fn auipc(rd: u8, u_immediate: u32) -> u32 {
    ujtype(u_immediate, rd.into(), OP_AUIPC)
}

pub fn jal(rd: u8, offset: i32) -> u32 {
    jtype(offset as u32, rd.into(), OP_JAL)
}

pub fn jalr(rd: u8, base: u8, offset: i32) -> u32 {
    itype(offset as u32, base.into(), FUNCT3_JALR, rd.into(), OP_JALR)
}

fn branch(funct3: u32, src1: u8, src2: u8, offset: i32) -> u32 {
    btype(offset as u32, src2.into(), src1.into(), funct3, OP_BRANCH)
}

pub fn beq(src1: u8, src2: u8, offset: i32) -> u32 {
    branch(FUNCT3_BEQ, src1, src2, offset)
}

pub fn bne(src1: u8, src2: u8, offset: i32) -> u32 {
    branch(FUNCT3_BNE, src1, src2, offset)
}

pub fn blt(src1: u8, src2: u8, offset: i32) -> u32 {
    branch(FUNCT3_BLT, src1, src2, offset)
}

pub fn bge(src1: u8, src2: u8, offset: i32) -> u32 {
    branch(FUNCT3_BGE, src1, src2, offset)
}

pub fn bltu(src1: u8, src2: u8, offset: i32) -> u32 {
    branch(FUNCT3_BLTU, src1, src2, offset)
}

pub fn bgeu(src1: u8, src2: u8, offset: i32) -> u32 {
    branch(FUNCT3_BGEU, src1, src2, offset)
}

fn load(funct3: u32, rd: u8, base: u8, offset: i32) -> u32 {
    itype(offset as u32, base.into(), funct3, rd.into(), OP_LOAD)
}

pub fn lb(rd: u8, base: u8, offset: i32) -> u32 {
    load(FUNCT3_B, rd, base, offset)
}

pub fn lh(rd: u8, base: u8, offset: i32) -> u32 {
    load(FUNCT3_H, rd, base, offset)
}

pub fn lw(rd: u8, base: u8, offset: i32) -> u32 {
    load(FUNCT3_W, rd, base, offset)
}

pub fn lbu(rd: u8, base: u8, offset: i32) -> u32 {
    load(FUNCT3_BU, rd, base, offset)
}

pub fn lhu(rd: u8, base: u8, offset: i32) -> u32 {
    load(FUNCT3_HU, rd, base, offset)
}
