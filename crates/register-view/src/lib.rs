//! Register query notation parser and wide-value formatting core.
//!
//! Turns query strings like `rbx[1:3]:o32` into rendered register values:
//! a name, an optional byte slice, and an optional radix/unit notation,
//! applied to raw values up to 512 bits wide, with change highlighting
//! against the previously seen value.

/// Query notation tokenizer and parser.
pub mod grammar;
pub use grammar::{parse, split_queries, GrammarError, GrammarErrorKind, RegisterQuery};

/// Radix and word-unit enumerants for the display notation.
pub mod notation;
pub use notation::{NotationSpec, Radix, Unit};

/// Byte-slice bounds and their resolution against a register width.
pub mod slice;
pub use slice::{resolve, ByteBound, RangeError, ResolvedSlice, SliceSpec};

/// Wide unsigned values with byte-granular extraction and chopping.
pub mod value;
pub use value::{RawValue, MAX_VALUE_BITS, VALUE_BYTES};

/// Word rendering in each supported radix.
pub mod radix;
pub use radix::{format_word, UnsupportedFormatError};

/// Change highlighting between the current and previous rendering.
pub mod highlight;
pub use highlight::{highlight, highlight_words, Highlight};

/// Pipeline driver and collaborator seams.
pub mod view;
pub use view::{
    format_query, view_register, BitWidthLookup, PreviousValueCache, QueryError, RawValueSource,
    RegisterView, SubstringWidths,
};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
