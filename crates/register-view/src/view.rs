//! Pipeline driver and collaborator seams.
//!
//! The core never touches a live process. Raw bytes, register widths, and
//! previously seen values all arrive through the traits here; the pipeline
//! itself is pure (parse, resolve, extract, chop, format, highlight).

use thiserror::Error;

use crate::grammar::{self, GrammarError, RegisterQuery};
use crate::highlight::{highlight_words, Highlight};
use crate::radix::{format_word, UnsupportedFormatError};
use crate::slice::{resolve, RangeError, ResolvedSlice};
use crate::value::RawValue;

/// Any failure while parsing or formatting one query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The query text does not match the notation grammar.
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    /// The slice cannot be applied to the register's width.
    #[error(transparent)]
    Range(#[from] RangeError),
    /// The radix/width combination has no defined encoding.
    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormatError),
}

/// Supplies raw register values from the debug target.
pub trait RawValueSource {
    /// Fetches the current value of the named register. `None` while the
    /// register is unavailable (no execution frame, no such register),
    /// which is an expected steady state rather than an error.
    fn fetch(&self, name: &str) -> Option<RawValue>;
}

/// Maps register names to their natural bit width.
pub trait BitWidthLookup {
    /// Natural width in bits of the named register.
    fn width_of(&self, name: &str) -> u16;
}

/// Read-only access to values snapshotted at the previous stop event.
pub trait PreviousValueCache {
    /// The previously recorded value of the named register, `None` when
    /// nothing was recorded.
    fn previous(&self, name: &str) -> Option<RawValue>;
}

/// Name-substring width table, built once and read-only thereafter.
///
/// The default table encodes the vector-register naming convention: names
/// containing `xmm`, `ymm`, or `zmm` are 128, 256, or 512 bits wide and
/// everything else is a 64-bit general-purpose register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstringWidths {
    rules: Vec<(String, u16)>,
    default_bits: u16,
}

impl Default for SubstringWidths {
    fn default() -> Self {
        Self::new(
            vec![
                ("xmm".to_string(), 128),
                ("ymm".to_string(), 256),
                ("zmm".to_string(), 512),
            ],
            64,
        )
    }
}

impl SubstringWidths {
    /// Builds a table from `(substring, bits)` rules checked in order, with
    /// `default_bits` for names matching no rule.
    #[must_use]
    pub const fn new(rules: Vec<(String, u16)>, default_bits: u16) -> Self {
        Self {
            rules,
            default_bits,
        }
    }

    /// Number of 64-bit lanes a [`RawValueSource`] fetches and folds for
    /// this name (see [`RawValue::from_lanes`]).
    #[must_use]
    pub fn lane_count(&self, name: &str) -> u16 {
        self.width_of(name).div_ceil(64)
    }
}

impl BitWidthLookup for SubstringWidths {
    fn width_of(&self, name: &str) -> u16 {
        self.rules
            .iter()
            .find(|(pattern, _)| name.contains(pattern.as_str()))
            .map_or(self.default_bits, |(_, bits)| *bits)
    }
}

/// Fully rendered output for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterView {
    /// Register name as written in the query.
    pub name: String,
    /// `true` when the written bound order selects big-endian display.
    pub big_endian: bool,
    /// Rendered words, least significant first, each split for change
    /// highlighting.
    pub words: Vec<Highlight>,
}

impl RegisterView {
    /// Renders a single word bare, or a chopped sequence as a bracketed
    /// comma-joined list.
    #[must_use]
    pub fn render(&self) -> String {
        match self.words.as_slice() {
            [word] => word.text(),
            words => {
                let joined = words
                    .iter()
                    .map(Highlight::text)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{joined}]")
            }
        }
    }
}

/// Runs resolve, extract, chop, and format for one parsed query.
///
/// # Errors
///
/// [`RangeError`] for out-of-range or empty slices and
/// [`UnsupportedFormatError`] for illegal radix/width combinations.
pub fn format_query(
    query: &RegisterQuery,
    natural_bits: u16,
    raw: &RawValue,
) -> Result<Vec<String>, QueryError> {
    let resolved = resolve(&query.slice, natural_bits)?;
    format_resolved(query, &resolved, raw)
}

fn format_resolved(
    query: &RegisterQuery,
    resolved: &ResolvedSlice,
    raw: &RawValue,
) -> Result<Vec<String>, QueryError> {
    let extracted = raw.extract(resolved.lower, resolved.upper);
    let unit_bits = query.notation.unit.bits(resolved.bit_len());
    let words = extracted.chop(unit_bits)?;
    words
        .iter()
        .map(|word| format_word(query.notation.radix, unit_bits, word).map_err(QueryError::from))
        .collect()
}

/// Full control flow for one query string, including change highlighting
/// against the previous-value cache.
///
/// Returns `Ok(None)` when the raw value source reports the register
/// unavailable.
///
/// # Errors
///
/// [`GrammarError`] for unparseable query text, plus everything
/// [`format_query`] can return.
pub fn view_register(
    text: &str,
    widths: &dyn BitWidthLookup,
    source: &dyn RawValueSource,
    cache: &dyn PreviousValueCache,
) -> Result<Option<RegisterView>, QueryError> {
    let query = grammar::parse(text)?;
    let natural_bits = widths.width_of(&query.name);
    let resolved = resolve(&query.slice, natural_bits)?;

    let Some(raw) = source.fetch(&query.name) else {
        return Ok(None);
    };
    let current = format_resolved(&query, &resolved, &raw)?;
    let previous = cache
        .previous(&query.name)
        .map(|prev| format_resolved(&query, &resolved, &prev))
        .transpose()?;

    Ok(Some(RegisterView {
        name: query.name,
        big_endian: resolved.big_endian,
        words: highlight_words(&current, previous.as_deref()),
    }))
}

#[cfg(test)]
mod tests {
    use super::{format_query, BitWidthLookup, SubstringWidths};
    use crate::grammar::parse;
    use crate::value::RawValue;

    #[test]
    fn default_width_table_follows_the_name_convention() {
        let widths = SubstringWidths::default();
        assert_eq!(widths.width_of("rax"), 64);
        assert_eq!(widths.width_of("xmm8"), 128);
        assert_eq!(widths.width_of("ymm5"), 256);
        assert_eq!(widths.width_of("zmm0"), 512);
    }

    #[test]
    fn lane_counts_follow_the_width_table() {
        let widths = SubstringWidths::default();
        assert_eq!(widths.lane_count("rax"), 1);
        assert_eq!(widths.lane_count("xmm8"), 2);
        assert_eq!(widths.lane_count("zmm0"), 8);
    }

    #[test]
    fn custom_rules_are_checked_in_order() {
        let widths = SubstringWidths::new(vec![("st".to_string(), 80)], 32);
        assert_eq!(widths.width_of("st0"), 80);
        assert_eq!(widths.width_of("eax"), 32);
    }

    #[test]
    fn format_query_runs_the_whole_pipeline() {
        let query = parse("rax").expect("valid query");
        let raw = RawValue::from_u64(0xDEAD_BEEF, 64);
        let words = format_query(&query, 64, &raw).expect("formatted");
        assert_eq!(words, vec!["0x00000000deadbeef".to_string()]);
    }

    #[test]
    fn format_query_chops_into_unit_words() {
        let query = parse("rax:x16").expect("valid query");
        let raw = RawValue::from_u64(0x1122_3344_5566_7788, 64);
        let words = format_query(&query, 64, &raw).expect("formatted");
        assert_eq!(words, vec!["0x7788", "0x5566", "0x3344", "0x1122"]);
    }
}
