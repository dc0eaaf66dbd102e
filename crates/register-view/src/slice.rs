//! Byte-slice bounds and their resolution against a register width.
//!
//! Bounds are byte units in the order the user wrote them. The written order
//! decides the display byte order; the resolved bounds are always normalized
//! to `lower <= upper`.

use thiserror::Error;

/// One bound of a byte slice as written in the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ByteBound {
    /// An explicit byte index.
    Index(u16),
    /// The register's most-significant edge, substituted for an omitted
    /// leading bound.
    FromMsb,
    /// The register's least-significant edge, substituted for an omitted
    /// trailing bound.
    ToLsb,
}

/// A byte range over a register, kept in the order the user wrote it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct SliceSpec {
    /// The bound written before the colon.
    pub from: ByteBound,
    /// The bound written after the colon.
    pub to: ByteBound,
}

impl Default for SliceSpec {
    /// The entire register.
    fn default() -> Self {
        Self {
            from: ByteBound::FromMsb,
            to: ByteBound::ToLsb,
        }
    }
}

impl SliceSpec {
    /// The slice selecting the single byte `index` (the `name[k]` subscript
    /// form, read as `{from: k+1, to: k}`).
    #[must_use]
    pub const fn single_byte(index: u16) -> Self {
        Self {
            from: ByteBound::Index(index.saturating_add(1)),
            to: ByteBound::Index(index),
        }
    }
}

/// Byte bounds normalized to `lower <= upper`, plus the display byte order
/// implied by the order the bounds were written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ResolvedSlice {
    /// Inclusive lower byte bound.
    pub lower: u16,
    /// Exclusive upper byte bound.
    pub upper: u16,
    /// `true` when the written bounds increase toward the most-significant
    /// byte.
    pub big_endian: bool,
}

impl ResolvedSlice {
    /// Number of bytes the slice selects.
    #[must_use]
    pub const fn byte_len(&self) -> u16 {
        self.upper - self.lower
    }

    /// Number of bits the slice selects.
    #[must_use]
    pub const fn bit_len(&self) -> u16 {
        self.byte_len() * 8
    }
}

/// Slice bounds that cannot be applied to the register's width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum RangeError {
    /// A resolved bound lies past the register's last byte.
    #[error("slice bound {bound} exceeds register width of {width_bytes} bytes")]
    BoundExceedsWidth {
        /// The offending byte bound.
        bound: u16,
        /// The register's width in bytes.
        width_bytes: u16,
    },
    /// The slice selects no bytes at all.
    #[error("slice selects no bytes")]
    EmptySlice,
}

/// Substitutes sentinel bounds against `natural_bits`, normalizes the bound
/// order, and derives the display byte order from the written order.
///
/// # Errors
///
/// [`RangeError::BoundExceedsWidth`] when a bound lies past the register's
/// last byte, [`RangeError::EmptySlice`] when both bounds resolve to the
/// same byte.
pub fn resolve(slice: &SliceSpec, natural_bits: u16) -> Result<ResolvedSlice, RangeError> {
    let width_bytes = natural_bits / 8;
    let from = substitute(slice.from, width_bytes);
    let to = substitute(slice.to, width_bytes);

    for bound in [from, to] {
        if bound > width_bytes {
            return Err(RangeError::BoundExceedsWidth { bound, width_bytes });
        }
    }
    if from == to {
        return Err(RangeError::EmptySlice);
    }

    Ok(ResolvedSlice {
        lower: from.min(to),
        upper: from.max(to),
        big_endian: from < to,
    })
}

const fn substitute(bound: ByteBound, width_bytes: u16) -> u16 {
    match bound {
        ByteBound::Index(index) => index,
        ByteBound::FromMsb => width_bytes,
        ByteBound::ToLsb => 0,
    }
}
