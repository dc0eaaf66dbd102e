//! Radix and word-unit enumerants for the display notation.

/// Numeral system (or float/character encoding) used to render one word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Radix {
    /// Zero-padded hexadecimal with a `0x` prefix.
    Hex,
    /// Zero-padded octal with a `0o` prefix.
    Octal,
    /// Two's-complement decimal over the word width.
    SignedDecimal,
    /// Plain unsigned decimal.
    UnsignedDecimal,
    /// Zero-padded binary with a `0b` prefix.
    Binary,
    /// IEEE-754 reinterpretation of the word's bit pattern.
    Float,
    /// Byte-wise character decode with visible glyphs for control bytes.
    Character,
}

impl Radix {
    /// Decodes a notation radix character (`x o d u b f c`).
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'x' => Some(Self::Hex),
            'o' => Some(Self::Octal),
            'd' => Some(Self::SignedDecimal),
            'u' => Some(Self::UnsignedDecimal),
            'b' => Some(Self::Binary),
            'f' => Some(Self::Float),
            'c' => Some(Self::Character),
            _ => None,
        }
    }

    /// Returns the notation character for this radix.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Hex => 'x',
            Self::Octal => 'o',
            Self::SignedDecimal => 'd',
            Self::UnsignedDecimal => 'u',
            Self::Binary => 'b',
            Self::Float => 'f',
            Self::Character => 'c',
        }
    }
}

/// Word width used when chopping a slice into independently formatted words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Unit {
    /// Format the whole slice as one word.
    #[default]
    Natural,
    /// 8-bit words.
    Byte,
    /// 16-bit words.
    Word,
    /// 32-bit words.
    Dword,
    /// 64-bit words.
    Qword,
    /// 80-bit words.
    Tword,
    /// 128-bit words.
    Oword,
    /// 256-bit words.
    Yword,
    /// 512-bit words.
    Zword,
}

impl Unit {
    /// Decodes an explicit word width in bits.
    #[must_use]
    pub const fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            8 => Some(Self::Byte),
            16 => Some(Self::Word),
            32 => Some(Self::Dword),
            64 => Some(Self::Qword),
            80 => Some(Self::Tword),
            128 => Some(Self::Oword),
            256 => Some(Self::Yword),
            512 => Some(Self::Zword),
            _ => None,
        }
    }

    /// Width in bits of one chopped word; `natural_bits` substitutes for
    /// [`Unit::Natural`].
    #[must_use]
    pub const fn bits(self, natural_bits: u16) -> u16 {
        match self {
            Self::Natural => natural_bits,
            Self::Byte => 8,
            Self::Word => 16,
            Self::Dword => 32,
            Self::Qword => 64,
            Self::Tword => 80,
            Self::Oword => 128,
            Self::Yword => 256,
            Self::Zword => 512,
        }
    }
}

/// How one query renders: the radix plus the chopping unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct NotationSpec {
    /// Numeral system for each chopped word.
    pub radix: Radix,
    /// Word width the slice is chopped into.
    pub unit: Unit,
}

impl Default for NotationSpec {
    fn default() -> Self {
        Self {
            radix: Radix::Hex,
            unit: Unit::Natural,
        }
    }
}
