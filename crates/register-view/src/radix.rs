//! Word rendering in each supported radix.
//!
//! One chopped word comes in, one string goes out. Dispatch is an exhaustive
//! match over [`Radix`] so a new radix forces every rule here to be revisited.

use thiserror::Error;

use crate::notation::Radix;
use crate::value::RawValue;

/// A radix/width combination with no defined encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("no {radix:?} encoding for {unit_bits}-bit words")]
pub struct UnsupportedFormatError {
    /// The requested radix.
    pub radix: Radix,
    /// The word width that radix cannot encode.
    pub unit_bits: u16,
}

/// Renders one chopped word in `radix` at `unit_bits` display width.
///
/// # Errors
///
/// [`UnsupportedFormatError`] for [`Radix::Float`] at widths other than
/// 16, 32, or 64 bits.
pub fn format_word(
    radix: Radix,
    unit_bits: u16,
    word: &RawValue,
) -> Result<String, UnsupportedFormatError> {
    match radix {
        Radix::Hex => Ok(format_hex(unit_bits, word)),
        Radix::Octal => Ok(format_octal(unit_bits, word)),
        Radix::Binary => Ok(format_binary(unit_bits, word)),
        Radix::UnsignedDecimal => Ok(format_unsigned(word)),
        Radix::SignedDecimal => Ok(format_signed(unit_bits, word)),
        Radix::Float => format_float(unit_bits, word),
        Radix::Character => Ok(format_characters(unit_bits, word)),
    }
}

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

fn format_hex(unit_bits: u16, word: &RawValue) -> String {
    let digits = unit_bits.div_ceil(4);
    let mut out = String::with_capacity(2 + usize::from(digits));
    out.push_str("0x");
    for i in (0..digits).rev() {
        let nibble = (word.byte(i / 2) >> ((i % 2) * 4)) & 0xF;
        out.push(HEX_DIGITS[usize::from(nibble)] as char);
    }
    out
}

fn format_octal(unit_bits: u16, word: &RawValue) -> String {
    let digits = unit_bits.div_ceil(3);
    let mut out = String::with_capacity(2 + usize::from(digits));
    out.push_str("0o");
    for i in (0..digits).rev() {
        let mut digit = 0_u8;
        for bit in 0..3 {
            if word.bit(i * 3 + bit) {
                digit |= 1 << bit;
            }
        }
        out.push((b'0' + digit) as char);
    }
    out
}

fn format_binary(unit_bits: u16, word: &RawValue) -> String {
    let mut out = String::with_capacity(2 + usize::from(unit_bits));
    out.push_str("0b");
    for i in (0..unit_bits).rev() {
        out.push(if word.bit(i) { '1' } else { '0' });
    }
    out
}

fn format_unsigned(word: &RawValue) -> String {
    decimal_string(word)
}

fn format_signed(unit_bits: u16, word: &RawValue) -> String {
    if unit_bits > 0 && word.bit(unit_bits - 1) {
        format!("-{}", decimal_string(&word.negated()))
    } else {
        decimal_string(word)
    }
}

/// Decimal digits of an up-to-512-bit value by repeated division by ten
/// over 64-bit limbs.
#[allow(clippy::cast_possible_truncation)]
fn decimal_string(word: &RawValue) -> String {
    let mut limbs = [0_u64; 8];
    for (i, limb) in limbs.iter_mut().enumerate() {
        let mut le = [0_u8; 8];
        for (j, byte) in le.iter_mut().enumerate() {
            *byte = word.byte(u16::try_from(i * 8 + j).unwrap_or(u16::MAX));
        }
        *limb = u64::from_le_bytes(le);
    }

    if limbs.iter().all(|&l| l == 0) {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while limbs.iter().any(|&l| l != 0) {
        let mut remainder = 0_u64;
        for limb in limbs.iter_mut().rev() {
            let current = (u128::from(remainder) << 64) | u128::from(*limb);
            *limb = (current / 10) as u64;
            remainder = (current % 10) as u64;
        }
        digits.push(b'0' + remainder as u8);
    }

    digits.iter().rev().map(|&d| d as char).collect()
}

fn format_float(unit_bits: u16, word: &RawValue) -> Result<String, UnsupportedFormatError> {
    match unit_bits {
        16 => {
            let bits = u16::from_le_bytes([word.byte(0), word.byte(1)]);
            Ok(binary16_to_f32(bits).to_string())
        }
        32 => {
            let bits = u32::from_le_bytes([word.byte(0), word.byte(1), word.byte(2), word.byte(3)]);
            Ok(f32::from_bits(bits).to_string())
        }
        64 => {
            let mut le = [0_u8; 8];
            for (i, byte) in le.iter_mut().enumerate() {
                *byte = word.byte(u16::try_from(i).unwrap_or(0));
            }
            Ok(f64::from_bits(u64::from_le_bytes(le)).to_string())
        }
        _ => Err(UnsupportedFormatError {
            radix: Radix::Float,
            unit_bits,
        }),
    }
}

/// Decodes an IEEE-754 binary16 bit pattern.
fn binary16_to_f32(bits: u16) -> f32 {
    let sign = if bits & 0x8000 == 0 { 1.0_f32 } else { -1.0 };
    let exponent = (bits >> 10) & 0x1F;
    let fraction = bits & 0x03FF;
    match exponent {
        0 => sign * f32::from(fraction) * (2.0_f32).powi(-24),
        0x1F => {
            if fraction == 0 {
                sign * f32::INFINITY
            } else {
                f32::NAN
            }
        }
        _ => sign * f32::from(0x0400 | fraction) * (2.0_f32).powi(i32::from(exponent) - 25),
    }
}

fn format_characters(unit_bits: u16, word: &RawValue) -> String {
    (0..unit_bits / 8).map(|i| glyph(word.byte(i))).collect()
}

/// Visible glyph for one decoded byte.
#[allow(clippy::cast_lossless)]
const fn glyph(byte: u8) -> char {
    match byte {
        0x0A => '↵',
        0x20 => '␣',
        0x7F => '␡',
        0x00..=0x1F => match char::from_u32(0x2400 + byte as u32) {
            Some(picture) => picture,
            None => '.',
        },
        0x80..=0x9F => '.',
        _ => byte as char,
    }
}
