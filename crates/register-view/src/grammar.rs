//! Query notation tokenizer and parser.
//!
//! The grammar is deliberately closed: a dedicated scanner over exactly this
//! shape, with an error span for anything outside it.
//!
//! ```text
//! query      := name [ slicepart ] [ ':' notation ]
//! slicepart  := '[' [ bound ] ':' [ bound ] ']' | '[' bound ']'
//! bound      := signed-integer-literal
//! notation   := radixchar [ unsigned-integer-literal ]
//! radixchar  := 'x' | 'o' | 'd' | 'u' | 'b' | 'f' | 'c'
//! name       := identifier (register name, sigil already stripped)
//! ```
//!
//! The subscript form `name[k]` denotes the slice `{from: k+1, to: k}`.
//! Two inputs recover silently instead of failing: an unrecognized radix
//! character falls back to hex, and a numeric unit outside the enumerated
//! widths falls back to the natural width. Everything else that deviates
//! from the grammar is a [`GrammarError`].

use std::fmt;

use crate::notation::{NotationSpec, Radix, Unit};
use crate::slice::{ByteBound, SliceSpec};

/// A parsed register query: the unit of work for one query string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterQuery {
    /// Register name with no leading sigil.
    pub name: String,
    /// Requested byte slice; defaults to the whole register.
    pub slice: SliceSpec,
    /// Requested rendering; defaults to hex over the natural width.
    pub notation: NotationSpec,
}

/// Query text that does not match the notation grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GrammarError {
    /// Byte offset into the query text where parsing failed.
    pub position: usize,
    /// What went wrong there.
    pub kind: GrammarErrorKind,
}

/// Classification of grammar failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GrammarErrorKind {
    /// The query has no register name.
    MissingName,
    /// `[` without a matching `]`.
    UnterminatedSlice,
    /// A slice bound that is not an integer byte index.
    InvalidBound(String),
    /// `:` with nothing after it (the radix character is absent).
    MissingNotation,
    /// A notation unit suffix that is not an unsigned integer.
    InvalidUnit(String),
    /// Text remaining after a complete query.
    TrailingInput(String),
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl fmt::Display for GrammarErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName => write!(f, "missing register name"),
            Self::UnterminatedSlice => write!(f, "unterminated slice: missing `]`"),
            Self::InvalidBound(b) => write!(f, "invalid slice bound: {b}"),
            Self::MissingNotation => write!(f, "missing notation after `:`"),
            Self::InvalidUnit(u) => write!(f, "invalid notation unit: {u}"),
            Self::TrailingInput(t) => write!(f, "unexpected trailing input: {t}"),
        }
    }
}

impl std::error::Error for GrammarError {}

/// Parses one query string into an immutable [`RegisterQuery`].
///
/// Surrounding whitespace is ignored; error positions refer to the original
/// input.
///
/// # Errors
///
/// [`GrammarError`] when the text does not match the query grammar.
pub fn parse(text: &str) -> Result<RegisterQuery, GrammarError> {
    let start = text.len() - text.trim_start().len();
    let query = text.trim();

    let name_len = identifier_len(query);
    if name_len == 0 {
        return Err(GrammarError {
            position: start,
            kind: GrammarErrorKind::MissingName,
        });
    }
    let name = &query[..name_len];
    let mut cursor = name_len;

    let mut slice = SliceSpec::default();
    if query[cursor..].starts_with('[') {
        let Some(close) = query[cursor..].find(']') else {
            return Err(GrammarError {
                position: start + cursor,
                kind: GrammarErrorKind::UnterminatedSlice,
            });
        };
        slice = parse_slice_body(&query[cursor + 1..cursor + close], start + cursor + 1)?;
        cursor += close + 1;
    }

    let mut notation = NotationSpec::default();
    if let Some(rest) = query[cursor..].strip_prefix(':') {
        notation = parse_notation(rest, start + cursor + 1)?;
    } else if cursor < query.len() {
        return Err(GrammarError {
            position: start + cursor,
            kind: GrammarErrorKind::TrailingInput(query[cursor..].to_string()),
        });
    }

    Ok(RegisterQuery {
        name: name.to_string(),
        slice,
        notation,
    })
}

/// Splits a `$`-delimited query list into individual query strings.
///
/// Front ends hand over argument text with the register sigil still in
/// place; this strips it, trims each segment, and drops empty ones.
#[must_use]
pub fn split_queries(input: &str) -> Vec<&str> {
    input
        .split('$')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

fn identifier_len(text: &str) -> usize {
    let mut chars = text.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return 0,
    }
    for (index, c) in chars {
        if !c.is_ascii_alphanumeric() && c != '_' {
            return index;
        }
    }
    text.len()
}

fn parse_slice_body(inner: &str, position: usize) -> Result<SliceSpec, GrammarError> {
    inner.find(':').map_or_else(
        || {
            let index = parse_bound(inner, position)?;
            Ok(SliceSpec::single_byte(index))
        },
        |colon| {
            let left = inner[..colon].trim();
            let right = inner[colon + 1..].trim();
            let from = if left.is_empty() {
                ByteBound::FromMsb
            } else {
                ByteBound::Index(parse_bound(left, position)?)
            };
            let to = if right.is_empty() {
                ByteBound::ToLsb
            } else {
                ByteBound::Index(parse_bound(right, position + colon + 1)?)
            };
            Ok(SliceSpec { from, to })
        },
    )
}

fn parse_bound(text: &str, position: usize) -> Result<u16, GrammarError> {
    let text = text.trim();
    text.parse::<i64>()
        .ok()
        .and_then(|value| u16::try_from(value).ok())
        .ok_or_else(|| GrammarError {
            position,
            kind: GrammarErrorKind::InvalidBound(text.to_string()),
        })
}

fn parse_notation(text: &str, position: usize) -> Result<NotationSpec, GrammarError> {
    let Some(radix_char) = text.chars().next() else {
        return Err(GrammarError {
            position,
            kind: GrammarErrorKind::MissingNotation,
        });
    };
    // Unrecognized radix characters fall back to hex.
    let radix = Radix::from_char(radix_char).unwrap_or(Radix::Hex);

    let suffix = &text[radix_char.len_utf8()..];
    let unit = if suffix.is_empty() {
        Unit::Natural
    } else {
        let bits = suffix.parse::<u32>().map_err(|_| GrammarError {
            position: position + radix_char.len_utf8(),
            kind: GrammarErrorKind::InvalidUnit(suffix.to_string()),
        })?;
        // Numeric units outside the enumerated widths fall back to natural.
        u16::try_from(bits)
            .ok()
            .and_then(Unit::from_bits)
            .unwrap_or(Unit::Natural)
    };

    Ok(NotationSpec { radix, unit })
}
