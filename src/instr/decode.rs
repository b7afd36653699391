//! Instruction decoding
//!
//! This file is where a u32 instruction word is converted into the
//! Instr enum, which holds the operand fields in a form ready for
//! execution. Fields are pulled out by explicit shift/mask functions
//! per format (there is no reliance on bit-field struct layout), and
//! immediates are returned already sign-extended to 32 bits, so the
//! execution step can use them directly in wrapping arithmetic.

use thiserror::Error;

use super::opcodes::*;
use crate::utils::{extract_field, sign_extend};

pub fn opcode(instr: u32) -> u32 {
    extract_field(instr, 6, 0)
}

pub fn funct3(instr: u32) -> u32 {
    extract_field(instr, 14, 12)
}

pub fn funct7(instr: u32) -> u32 {
    extract_field(instr, 31, 25)
}

pub fn rd(instr: u32) -> u8 {
    extract_field(instr, 11, 7) as u8
}

pub fn rs1(instr: u32) -> u8 {
    extract_field(instr, 19, 15) as u8
}

pub fn rs2(instr: u32) -> u8 {
    extract_field(instr, 24, 20) as u8
}

/// I-type immediate: bits 31:20, sign-extended from bit 11
pub fn imm_itype(instr: u32) -> u32 {
    sign_extend(extract_field(instr, 31, 20), 11)
}

/// S-type immediate: {31:25, 11:7}, sign-extended from bit 11
pub fn imm_stype(instr: u32) -> u32 {
    let imm = (extract_field(instr, 31, 25) << 5) | extract_field(instr, 11, 7);
    sign_extend(imm, 11)
}

/// B-type immediate: {31, 7, 30:25, 11:8, 1'b0}, sign-extended from
/// bit 12. Bit 0 is implicitly zero (branch offsets are even).
pub fn imm_btype(instr: u32) -> u32 {
    let imm12 = extract_field(instr, 31, 31);
    let imm11 = extract_field(instr, 7, 7);
    let imm10_5 = extract_field(instr, 30, 25);
    let imm4_1 = extract_field(instr, 11, 8);
    let imm = (imm12 << 12) | (imm11 << 11) | (imm10_5 << 5) | (imm4_1 << 1);
    sign_extend(imm, 12)
}

/// U-type immediate: bits 31:12 placed in the high 20 bits, low 12
/// bits zero. No sign extension beyond that placement.
pub fn imm_utype(instr: u32) -> u32 {
    extract_field(instr, 31, 12) << 12
}

/// J-type immediate: {31, 19:12, 20, 30:21, 1'b0}, sign-extended from
/// bit 20. Bit 0 is implicitly zero (jump offsets are even).
pub fn imm_jtype(instr: u32) -> u32 {
    let imm20 = extract_field(instr, 31, 31);
    let imm19_12 = extract_field(instr, 19, 12);
    let imm11 = extract_field(instr, 20, 20);
    let imm10_1 = extract_field(instr, 30, 21);
    let imm = (imm20 << 20) | (imm19_12 << 12) | (imm11 << 11) | (imm10_1 << 1);
    sign_extend(imm, 20)
}

/// Decoded instructions
///
/// Field names follow the instruction set reference: dest/base/src
/// hold 5-bit register indexes, and every offset or immediate is the
/// full sign-extended 32-bit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instr {
    /// Load u_immediate into bits 31:12 of dest, filling the low 12
    /// bits with zeros. u_immediate arrives already shifted.
    Lui { dest: u8, u_immediate: u32 },
    /// Add u_immediate (already shifted into bits 31:12) to pc and
    /// place the result in dest.
    Auipc { dest: u8, u_immediate: u32 },
    /// Store pc+4 in dest and set pc = pc + offset, where offset is a
    /// multiple of 2.
    Jal { dest: u8, offset: u32 },
    /// Store pc+4 in dest and set pc = base + offset. The offset may
    /// be even or odd.
    Jalr { dest: u8, base: u8, offset: u32 },
    /// If the condition named by mnemonic holds between src1 and src2,
    /// set pc = pc + offset; else fall through to the next instruction.
    /// Blt/Bge compare as signed, Bltu/Bgeu as unsigned.
    Branch {
        mnemonic: Branch,
        src1: u8,
        src2: u8,
        offset: u32,
    },
    /// Load from address base + offset into dest. Lb/Lh sign-extend
    /// the loaded byte/halfword, Lbu/Lhu zero-extend, Lw loads a full
    /// word.
    Load {
        mnemonic: Load,
        dest: u8,
        base: u8,
        offset: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Beq,
    Bne,
    Blt,
    Bge,
    Bltu,
    Bgeu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Load {
    Lb,
    Lh,
    Lw,
    Lbu,
    Lhu,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("got invalid or unimplemented opcode 0x{0:02x}")]
    UnimplementedOpcode(u32),
    #[error("got invalid or unimplemented funct3 {funct3} for opcode 0x{opcode:02x}")]
    UnimplementedFunct3 { opcode: u32, funct3: u32 },
}

impl TryFrom<u32> for Instr {
    type Error = DecodeError;

    /// Decode an instruction word. Dispatches on the opcode (low 7
    /// bits), then on funct3 where the opcode names a family.
    fn try_from(instr: u32) -> Result<Self, Self::Error> {
        match opcode(instr) {
            OP_LUI => Ok(Instr::Lui {
                dest: rd(instr),
                u_immediate: imm_utype(instr),
            }),
            OP_AUIPC => Ok(Instr::Auipc {
                dest: rd(instr),
                u_immediate: imm_utype(instr),
            }),
            OP_JAL => Ok(Instr::Jal {
                dest: rd(instr),
                offset: imm_jtype(instr),
            }),
            OP_JALR => match funct3(instr) {
                FUNCT3_JALR => Ok(Instr::Jalr {
                    dest: rd(instr),
                    base: rs1(instr),
                    offset: imm_itype(instr),
                }),
                funct3 => Err(DecodeError::UnimplementedFunct3 {
                    opcode: OP_JALR,
                    funct3,
                }),
            },
            OP_BRANCH => {
                let mnemonic = match funct3(instr) {
                    FUNCT3_BEQ => Branch::Beq,
                    FUNCT3_BNE => Branch::Bne,
                    FUNCT3_BLT => Branch::Blt,
                    FUNCT3_BGE => Branch::Bge,
                    FUNCT3_BLTU => Branch::Bltu,
                    FUNCT3_BGEU => Branch::Bgeu,
                    funct3 => {
                        return Err(DecodeError::UnimplementedFunct3 {
                            opcode: OP_BRANCH,
                            funct3,
                        })
                    }
                };
                Ok(Instr::Branch {
                    mnemonic,
                    src1: rs1(instr),
                    src2: rs2(instr),
                    offset: imm_btype(instr),
                })
            }
            OP_LOAD => {
                let mnemonic = match funct3(instr) {
                    FUNCT3_B => Load::Lb,
                    FUNCT3_H => Load::Lh,
                    FUNCT3_W => Load::Lw,
                    FUNCT3_BU => Load::Lbu,
                    FUNCT3_HU => Load::Lhu,
                    funct3 => {
                        return Err(DecodeError::UnimplementedFunct3 {
                            opcode: OP_LOAD,
                            funct3,
                        })
                    }
                };
                Ok(Instr::Load {
                    mnemonic,
                    dest: rd(instr),
                    base: rs1(instr),
                    offset: imm_itype(instr),
                })
            }
            op => Err(DecodeError::UnimplementedOpcode(op)),
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::instr::encode;

    #[test]
    fn check_common_fields() {
        // beq x3, x7, 0 has rs1=3, rs2=7, funct3=0, opcode=OP_BRANCH
        let instr = encode::beq(3, 7, 0);
        assert_eq!(opcode(instr), OP_BRANCH);
        assert_eq!(rs1(instr), 3);
        assert_eq!(rs2(instr), 7);
        assert_eq!(funct3(instr), FUNCT3_BEQ);
    }

    #[test]
    fn check_itype_immediate_sign_extension() {
        let instr = encode::itype(0xffc, 1, FUNCT3_JALR, 2, OP_JALR);
        assert_eq!(imm_itype(instr), 0xffff_fffc);
        let instr = encode::itype(0x7ff, 1, FUNCT3_JALR, 2, OP_JALR);
        assert_eq!(imm_itype(instr), 0x7ff);
    }

    #[test]
    fn check_stype_immediate_sign_extension() {
        let instr = encode::stype(0xffc, 4, 5, FUNCT3_W, OP_STORE);
        assert_eq!(imm_stype(instr), 0xffff_fffc);
        let instr = encode::stype(0x7ff, 4, 5, FUNCT3_W, OP_STORE);
        assert_eq!(imm_stype(instr), 0x7ff);
    }

    #[test]
    fn check_btype_immediate_sign_extension() {
        // A branch offset of -4 must decode to 0xfffffffc
        let instr = encode::beq(1, 2, -4);
        assert_eq!(imm_btype(instr), 0xffff_fffc);
        let instr = encode::beq(1, 2, 0xffe);
        assert_eq!(imm_btype(instr), 0xffe);
    }

    #[test]
    fn check_btype_immediate_bit_zero_is_clear() {
        let instr = encode::bne(1, 2, -2);
        assert_eq!(imm_btype(instr) & 1, 0);
    }

    #[test]
    fn check_utype_immediate_fills_high_bits() {
        let instr = encode::lui(2, 0xabcde);
        assert_eq!(imm_utype(instr), 0xabcd_e000);
        // A set bit 19 of the field is not a sign bit
        let instr = encode::lui(2, 0xfffff);
        assert_eq!(imm_utype(instr), 0xffff_f000);
    }

    #[test]
    fn check_jtype_immediate_sign_extension() {
        let instr = encode::jal(1, -4);
        assert_eq!(imm_jtype(instr), 0xffff_fffc);
        let instr = encode::jal(1, 0xffe);
        assert_eq!(imm_jtype(instr), 0xffe);
    }

    #[test]
    fn check_decode_lui() {
        let instr = Instr::try_from(encode::lui(2, 53)).unwrap();
        assert_eq!(
            instr,
            Instr::Lui {
                dest: 2,
                u_immediate: 53 << 12
            }
        );
    }

    #[test]
    fn check_decode_jalr() {
        let instr = Instr::try_from(encode::jalr(4, 6, -4)).unwrap();
        assert_eq!(
            instr,
            Instr::Jalr {
                dest: 4,
                base: 6,
                offset: 0xffff_fffc
            }
        );
    }

    #[test]
    fn check_decode_branch() {
        let instr = Instr::try_from(encode::bltu(1, 2, 12)).unwrap();
        assert_eq!(
            instr,
            Instr::Branch {
                mnemonic: Branch::Bltu,
                src1: 1,
                src2: 2,
                offset: 12
            }
        );
    }

    #[test]
    fn check_decode_load() {
        let instr = Instr::try_from(encode::lhu(5, 3, -8)).unwrap();
        assert_eq!(
            instr,
            Instr::Load {
                mnemonic: Load::Lhu,
                dest: 5,
                base: 3,
                offset: 0xffff_fff8
            }
        );
    }

    #[test]
    fn check_unimplemented_opcode() {
        // A store is not in the implemented set
        let instr = encode::stype(0, 1, 2, FUNCT3_W, OP_STORE);
        assert_eq!(
            Instr::try_from(instr),
            Err(DecodeError::UnimplementedOpcode(OP_STORE))
        );
    }

    #[test]
    fn check_unimplemented_funct3() {
        // Branch funct3 2 is not defined
        let instr = encode::btype(0, 1, 2, 0b010, OP_BRANCH);
        assert_eq!(
            Instr::try_from(instr),
            Err(DecodeError::UnimplementedFunct3 {
                opcode: OP_BRANCH,
                funct3: 0b010
            })
        );
    }
}
