//! End-to-end query pipeline tests over stub collaborators.

use proptest::prelude::*;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

use std::collections::HashMap;

use register_view::{
    parse, resolve, view_register, ByteBound, GrammarErrorKind, PreviousValueCache, QueryError,
    RangeError, RawValue, RawValueSource, SliceSpec, SubstringWidths,
};

#[derive(Default)]
struct StaticSource {
    values: HashMap<String, RawValue>,
}

impl StaticSource {
    fn with(mut self, name: &str, value: RawValue) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }
}

impl RawValueSource for StaticSource {
    fn fetch(&self, name: &str) -> Option<RawValue> {
        self.values.get(name).copied()
    }
}

#[derive(Default)]
struct SnapshotCache {
    values: HashMap<String, RawValue>,
}

impl SnapshotCache {
    fn with(mut self, name: &str, value: RawValue) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }
}

impl PreviousValueCache for SnapshotCache {
    fn previous(&self, name: &str) -> Option<RawValue> {
        self.values.get(name).copied()
    }
}

fn widths() -> SubstringWidths {
    SubstringWidths::default()
}

#[test]
fn bare_query_formats_hex_over_the_natural_width() {
    let source = StaticSource::default().with("rax", RawValue::from_u64(0xDEAD_BEEF, 64));
    let view = view_register("rax", &widths(), &source, &SnapshotCache::default())
        .expect("valid query")
        .expect("available register");

    assert_eq!(view.name, "rax");
    assert!(!view.big_endian);
    assert_eq!(view.words.len(), 1);
    assert_eq!(view.words[0].unchanged, "");
    assert_eq!(view.words[0].changed, "0x00000000deadbeef");
    assert_eq!(view.render(), "0x00000000deadbeef");
}

#[test]
fn unavailable_register_is_reported_as_absence() {
    let result = view_register(
        "rax",
        &widths(),
        &StaticSource::default(),
        &SnapshotCache::default(),
    );
    assert_eq!(result, Ok(None));
}

#[test]
fn malformed_query_surfaces_a_grammar_error() {
    let result = view_register(
        "rax[",
        &widths(),
        &StaticSource::default(),
        &SnapshotCache::default(),
    );
    assert!(matches!(
        result,
        Err(QueryError::Grammar(error))
            if error.kind == GrammarErrorKind::UnterminatedSlice
    ));
}

#[test]
fn slice_past_the_register_width_surfaces_a_range_error() {
    let source = StaticSource::default().with("rax", RawValue::from_u64(1, 64));
    let result = view_register("rax[9:]", &widths(), &source, &SnapshotCache::default());
    assert_eq!(
        result,
        Err(QueryError::Range(RangeError::BoundExceedsWidth {
            bound: 9,
            width_bytes: 8
        }))
    );
}

#[test]
fn float_is_legal_at_sixteen_bits_and_nowhere_odd() {
    let source = StaticSource::default().with("rax", RawValue::from_u64(0x3E00, 64));

    let view = view_register("rax:f16", &widths(), &source, &SnapshotCache::default())
        .expect("binary16 is a legal float width")
        .expect("available register");
    assert_eq!(view.words.len(), 4);
    assert_eq!(view.words[0].changed, "1.5");

    let result = view_register("rax:f80", &widths(), &source, &SnapshotCache::default());
    assert!(matches!(
        result,
        Err(QueryError::UnsupportedFormat(error)) if error.unit_bits == 80
    ));
}

#[test]
fn change_highlighting_splits_at_the_first_differing_digit() {
    let widths = SubstringWidths::new(Vec::new(), 16);
    let source = StaticSource::default().with("pc", RawValue::from_u64(0x1234, 16));
    let cache = SnapshotCache::default().with("pc", RawValue::from_u64(0x1134, 16));

    let view = view_register("pc", &widths, &source, &cache)
        .expect("valid query")
        .expect("available register");
    assert_eq!(view.words[0].unchanged, "0x1");
    assert_eq!(view.words[0].changed, "234");
}

#[test]
fn unchanged_register_has_an_empty_changed_suffix() {
    let value = RawValue::from_u64(0xDEAD_BEEF, 64);
    let source = StaticSource::default().with("rax", value);
    let cache = SnapshotCache::default().with("rax", value);

    let view = view_register("rax", &widths(), &source, &cache)
        .expect("valid query")
        .expect("available register");
    assert_eq!(view.words[0].unchanged, "0x00000000deadbeef");
    assert_eq!(view.words[0].changed, "");
}

#[test]
fn chopped_words_highlight_positionally() {
    let source = StaticSource::default().with("xmm0", RawValue::from_lanes(&[0x1111, 0x2222]));
    let cache = SnapshotCache::default().with("xmm0", RawValue::from_lanes(&[0x1111, 0x2322]));

    let view = view_register("xmm0:x64", &widths(), &source, &cache)
        .expect("valid query")
        .expect("available register");
    assert_eq!(view.words.len(), 2);
    assert_eq!(view.words[0].changed, "");
    assert_eq!(view.words[0].unchanged, "0x0000000000001111");
    assert_eq!(view.words[1].unchanged, "0x0000000000002");
    assert_eq!(view.words[1].changed, "222");
}

#[test]
fn chopped_sequences_render_bracketed_least_significant_first() {
    let source = StaticSource::default().with("rax", RawValue::from_u64(0x1122_3344_5566_7788, 64));
    let view = view_register("rax:x16", &widths(), &source, &SnapshotCache::default())
        .expect("valid query")
        .expect("available register");
    assert_eq!(view.render(), "[0x7788, 0x5566, 0x3344, 0x1122]");
}

#[test]
fn ascending_bounds_flag_big_endian_display() {
    let source = StaticSource::default().with("rax", RawValue::from_u64(0xAABB_CCDD, 64));
    let view = view_register("rax[1:3]", &widths(), &source, &SnapshotCache::default())
        .expect("valid query")
        .expect("available register");
    assert!(view.big_endian);
    assert_eq!(view.words[0].changed, "0xbbcc");
}

#[test]
fn subscript_selects_one_byte_of_the_register() {
    let source = StaticSource::default().with("rbp", RawValue::from_u64(0xAABB_CCDD, 64));
    let view = view_register("rbp[1]", &widths(), &source, &SnapshotCache::default())
        .expect("valid query")
        .expect("available register");
    assert!(!view.big_endian);
    assert_eq!(view.render(), "0xcc");
}

#[test]
fn character_query_decodes_a_vector_slice() {
    let lanes = [
        0,
        0,
        u64::from_le_bytes(*b"ABCDEFGH"),
        u64::from_le_bytes(*b"IJKLMNOP"),
    ];
    let source = StaticSource::default().with("ymm5", RawValue::from_lanes(&lanes));
    let view = view_register("ymm5[32:16]:c", &widths(), &source, &SnapshotCache::default())
        .expect("valid query")
        .expect("available register");
    assert_eq!(view.render(), "ABCDEFGHIJKLMNOP");
}

#[test]
fn sigil_delimited_lists_flow_through_the_pipeline() {
    let source = StaticSource::default()
        .with("rdi", RawValue::from_u64(0, 64))
        .with("r9", RawValue::from_u64(0xFFFF_FFFF_FF, 64));
    let queries = register_view::split_queries("$rdi $r9[3:]");
    assert_eq!(queries.len(), 2);
    for text in queries {
        let view = view_register(text, &widths(), &source, &SnapshotCache::default())
            .expect("valid query")
            .expect("available register");
        assert!(!view.words.is_empty());
    }
}

proptest! {
    #[test]
    fn property_resolution_orders_bounds_and_flags_written_order(a in 0_u16..=8, b in 0_u16..=8) {
        let slice = SliceSpec {
            from: ByteBound::Index(a),
            to: ByteBound::Index(b),
        };
        match resolve(&slice, 64) {
            Ok(resolved) => {
                prop_assert!(resolved.lower <= resolved.upper);
                prop_assert_eq!(resolved.lower, a.min(b));
                prop_assert_eq!(resolved.upper, a.max(b));
                prop_assert_eq!(resolved.big_endian, a < b);
            }
            Err(RangeError::EmptySlice) => prop_assert_eq!(a, b),
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    #[test]
    fn property_chopping_preserves_every_bit(value in any::<u128>(), unit_index in 0_usize..5) {
        let unit_bits = [8_u16, 16, 32, 64, 80][unit_index];
        let raw = RawValue::from_u128(value, 128);
        let words = raw.chop(unit_bits).unwrap();
        prop_assert_eq!(words.len(), usize::from(128_u16.div_ceil(unit_bits)));

        let mut reassembled = [0_u8; 16];
        for (position, word) in words.iter().enumerate() {
            for bit in 0..unit_bits {
                let target = u16::try_from(position).unwrap() * unit_bits + bit;
                if target < 128 {
                    if word.bit(bit) {
                        reassembled[usize::from(target / 8)] |= 1 << (target % 8);
                    }
                } else {
                    prop_assert!(!word.bit(bit), "stray bit past the value width");
                }
            }
        }
        prop_assert_eq!(u128::from_le_bytes(reassembled), value);
    }

    #[test]
    fn property_parsing_is_idempotent(
        name in "[a-z][a-z0-9]{0,4}",
        a in 0_u16..=64,
        b in 0_u16..=64,
        radix in prop::sample::select(vec!['x', 'o', 'd', 'u', 'b', 'f', 'c']),
        unit in prop::sample::select(vec![8_u16, 16, 32, 64, 128]),
    ) {
        let text = format!("{name}[{a}:{b}]:{radix}{unit}");
        let first = parse(&text).unwrap();
        let second = parse(&text).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn property_signed_matches_unsigned_below_the_sign_bit(value in 0_u64..0x8000_0000_0000_0000) {
        let raw = RawValue::from_u64(value, 64);
        let query_signed = parse("r0:d").unwrap();
        let query_unsigned = parse("r0:u").unwrap();
        let signed = register_view::format_query(&query_signed, 64, &raw).unwrap();
        let unsigned = register_view::format_query(&query_unsigned, 64, &raw).unwrap();
        prop_assert_eq!(signed, unsigned);
    }
}
