use std::ops::{BitAnd, Shl, Shr};

use num::Integer;

/// Make an n_bits-long mask (all ones)
pub fn mask<T>(n_bits: T) -> T
where
    T: Integer + Shl<Output = T>,
{
    (T::one() << n_bits) - T::one()
}

/// Obtain value[end:start] (verilog notation) from value
pub fn extract_field<T>(value: T, end: T, start: T) -> T
where
    T: Copy + Integer + Shl<Output = T> + Shr<Output = T> + BitAnd<Output = T>,
{
    mask(end - start + T::one()) & (value >> start)
}

/// Reinterpret the bit pattern of a u32 as an i32 (value-preserving,
/// no pointer punning)
pub fn interpret_u32_as_signed(value: u32) -> i32 {
    i32::from_ne_bytes(value.to_ne_bytes())
}

/// Take an unsigned value (u8, u16 or u32), and a bit position for the
/// sign bit, and copy the value of the sign bit into all the higher bits
/// of the u32.
pub fn sign_extend<T: Into<u32>>(value: T, sign_bit_position: u32) -> u32 {
    let value: u32 = value.into();
    let sign_bit = 1 & (value >> sign_bit_position);
    if sign_bit == 1 {
        let sign_extension = 0xffff_ffff - mask(sign_bit_position);
        value | sign_extension
    } else {
        value
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn check_mask() {
        assert_eq!(mask(0u32), 0);
        assert_eq!(mask(3u32), 0b111);
        assert_eq!(mask(12u32), 0xfff);
    }

    #[test]
    fn check_extract_field() {
        let value = 0xdead_beefu32;
        assert_eq!(extract_field(value, 6, 0), 0x6f);
        assert_eq!(extract_field(value, 31, 12), 0xdeadb);
        assert_eq!(extract_field(value, 31, 31), 1);
    }

    #[test]
    fn check_sign_extend_negative() {
        // 12-bit -4 becomes 32-bit -4
        assert_eq!(sign_extend(0xffcu32, 11), 0xffff_fffc);
        assert_eq!(sign_extend(0xffu8, 7), 0xffff_ffff);
    }

    #[test]
    fn check_sign_extend_positive() {
        assert_eq!(sign_extend(0x7fcu32, 11), 0x7fc);
        assert_eq!(sign_extend(0x7fu8, 7), 0x7f);
    }

    #[test]
    fn check_interpret_u32_as_signed() {
        assert_eq!(interpret_u32_as_signed(0xffff_ffff), -1);
        assert_eq!(interpret_u32_as_signed(5), 5);
    }
}
