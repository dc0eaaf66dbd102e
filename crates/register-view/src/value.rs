//! Wide unsigned values with byte-granular extraction and chopping.
//!
//! Every bound and unit in the query notation is a multiple of eight bits,
//! so values are stored as fixed little-endian byte arrays and the
//! mask-and-shift arithmetic operates byte-wise. Bytes past the declared
//! width are kept zero.

use crate::slice::RangeError;

/// Storage size of one value in bytes.
pub const VALUE_BYTES: usize = 64;

/// Widest representable value in bits.
pub const MAX_VALUE_BITS: u16 = 512;

/// An unsigned integer up to 512 bits wide, paired with its declared width.
///
/// Byte `0` holds bits `0..8`. All constructors mask the stored bytes to the
/// declared width, so equality is value equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RawValue {
    bytes: [u8; VALUE_BYTES],
    bits: u16,
}

impl RawValue {
    /// The zero value of the given width (clamped to [`MAX_VALUE_BITS`]).
    #[must_use]
    pub const fn zero(bits: u16) -> Self {
        Self {
            bytes: [0; VALUE_BYTES],
            bits: clamp_bits(bits),
        }
    }

    /// A value from a `u64`, declared `bits` wide.
    #[must_use]
    pub const fn from_u64(value: u64, bits: u16) -> Self {
        let le = value.to_le_bytes();
        let mut bytes = [0_u8; VALUE_BYTES];
        let mut i = 0;
        while i < le.len() {
            bytes[i] = le[i];
            i += 1;
        }
        Self {
            bytes,
            bits: clamp_bits(bits),
        }
        .masked()
    }

    /// A value from a `u128`, declared `bits` wide.
    #[must_use]
    pub const fn from_u128(value: u128, bits: u16) -> Self {
        let le = value.to_le_bytes();
        let mut bytes = [0_u8; VALUE_BYTES];
        let mut i = 0;
        while i < le.len() {
            bytes[i] = le[i];
            i += 1;
        }
        Self {
            bytes,
            bits: clamp_bits(bits),
        }
        .masked()
    }

    /// A value from little-endian bytes, declared `bits` wide. Input bytes
    /// past the declared width (or past [`VALUE_BYTES`]) are ignored.
    #[must_use]
    pub fn from_le_bytes(src: &[u8], bits: u16) -> Self {
        let take = src.len().min(VALUE_BYTES);
        let mut bytes = [0_u8; VALUE_BYTES];
        bytes[..take].copy_from_slice(&src[..take]);
        Self {
            bytes,
            bits: clamp_bits(bits),
        }
        .masked()
    }

    /// Folds 64-bit lanes into one wide value, lane `i` contributing
    /// `lane_i << (64*i)`. This is how vector-register sources assemble a
    /// value from per-lane fetches; lanes past eight are ignored.
    #[must_use]
    pub fn from_lanes(lanes: &[u64]) -> Self {
        let take = lanes.len().min(VALUE_BYTES / 8);
        let mut bytes = [0_u8; VALUE_BYTES];
        for (i, lane) in lanes.iter().take(take).enumerate() {
            bytes[i * 8..(i + 1) * 8].copy_from_slice(&lane.to_le_bytes());
        }
        Self {
            bytes,
            bits: u16::try_from(take * 64).unwrap_or(MAX_VALUE_BITS),
        }
    }

    /// Declared width in bits.
    #[must_use]
    pub const fn bits(&self) -> u16 {
        self.bits
    }

    /// Declared width in whole bytes.
    #[must_use]
    pub const fn byte_len(&self) -> u16 {
        self.bits.div_ceil(8)
    }

    /// Little-endian view of the value's declared bytes.
    #[must_use]
    pub fn le_bytes(&self) -> &[u8] {
        &self.bytes[..usize::from(self.byte_len())]
    }

    /// Reads the byte holding bits `8*index ..`; zero past the width.
    #[must_use]
    pub const fn byte(&self, index: u16) -> u8 {
        if (index as usize) < VALUE_BYTES {
            self.bytes[index as usize]
        } else {
            0
        }
    }

    /// Reads one bit; zero past the declared width.
    #[must_use]
    pub const fn bit(&self, index: u16) -> bool {
        if index >= self.bits {
            return false;
        }
        (self.bytes[(index / 8) as usize] >> (index % 8)) & 1 == 1
    }

    /// `true` when every declared bit is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.le_bytes().iter().all(|&b| b == 0)
    }

    /// The value as a `u128` when its set bits fit in one.
    #[must_use]
    pub fn as_u128(&self) -> Option<u128> {
        if self.bytes[16..].iter().any(|&b| b != 0) {
            return None;
        }
        let mut le = [0_u8; 16];
        le.copy_from_slice(&self.bytes[..16]);
        Some(u128::from_le_bytes(le))
    }

    /// Selects bytes `lower..upper`, right-aligned to bit 0.
    ///
    /// Byte-wise equivalent of masking bits `8*lower..8*upper` and shifting
    /// the result down by `8*lower`. Bounds are normalized by magnitude and
    /// bytes past the declared width read as zero.
    #[must_use]
    pub fn extract(&self, lower_byte: u16, upper_byte: u16) -> Self {
        let cap = MAX_VALUE_BITS / 8;
        let lower = lower_byte.min(upper_byte).min(cap);
        let upper = lower_byte.max(upper_byte).min(cap);
        self.extract_bits(lower * 8, (upper - lower) * 8)
    }

    /// Splits the value into `ceil(bits / unit_bits)` words of `unit_bits`
    /// each, right-aligned, least-significant word first.
    ///
    /// # Errors
    ///
    /// [`RangeError::EmptySlice`] when the value or the unit is zero-width.
    pub fn chop(&self, unit_bits: u16) -> Result<Vec<Self>, RangeError> {
        if unit_bits == 0 || self.bits == 0 {
            return Err(RangeError::EmptySlice);
        }
        let count = self.bits.div_ceil(unit_bits);
        let mut words = Vec::with_capacity(usize::from(count));
        for word in 0..count {
            words.push(self.extract_bits(word * unit_bits, unit_bits));
        }
        Ok(words)
    }

    /// Two's-complement negation within the declared width.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn negated(&self) -> Self {
        let mut out = *self;
        let len = usize::from(self.byte_len());
        for byte in &mut out.bytes[..len] {
            *byte = !*byte;
        }
        let mut carry = 1_u16;
        for byte in &mut out.bytes[..len] {
            let sum = u16::from(*byte) + carry;
            *byte = (sum & 0xFF) as u8;
            carry = sum >> 8;
        }
        out.masked()
    }

    fn extract_bits(&self, start: u16, len: u16) -> Self {
        let mut out = Self::zero(len);
        let byte_shift = start / 8;
        let bit_shift = start % 8;
        for i in 0..out.byte_len() {
            let low = self.byte(byte_shift + i) >> bit_shift;
            let high = if bit_shift == 0 {
                0
            } else {
                self.byte(byte_shift + i + 1) << (8 - bit_shift)
            };
            out.bytes[usize::from(i)] = low | high;
        }
        out.masked()
    }

    const fn masked(mut self) -> Self {
        let len = self.byte_len() as usize;
        let mut i = len;
        while i < VALUE_BYTES {
            self.bytes[i] = 0;
            i += 1;
        }
        let partial = self.bits % 8;
        if partial != 0 && len > 0 {
            self.bytes[len - 1] &= 0xFF >> (8 - partial);
        }
        self
    }
}

const fn clamp_bits(bits: u16) -> u16 {
    if bits > MAX_VALUE_BITS {
        MAX_VALUE_BITS
    } else {
        bits
    }
}
