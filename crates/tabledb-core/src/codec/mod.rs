//! Order-preserving key encoding for field values.
//!
//! This module translates typed field values into byte strings whose
//! lexicographic order equals the value order, so that the underlying
//! store's natural key order reproduces the requested sort order.
//!
//! # Encoding Design
//!
//! Every encoding produces a closed character set (decimal digits, a sign
//! prefix, padded ASCII, or a fixed sentinel), so an encoded component can
//! never contain the `/` separator used to assemble keys.
//!
//! ## Integers
//!
//! Integers become a sign prefix plus 19 zero-padded decimal digits:
//! `'1'` for non-negative values followed by the value itself, `'0'` for
//! negative values followed by the 9's complement of the absolute value.
//! The complement makes larger magnitudes sort lower, and the prefix keeps
//! every negative below every non-negative.
//!
//! ## Floats
//!
//! The IEEE-754 bits are mapped through the standard monotone transform:
//! positive values get their sign bit flipped, negative values get all bits
//! flipped, and NaN maps to the maximum. The resulting integer is printed
//! as 20 zero-padded decimal digits. Fixed width and sign-aware, the same
//! principle as the integer encoding.
//!
//! ## Strings
//!
//! Strings are right-padded with a sentinel byte below all printable ASCII
//! to a per-index pad length, so fixed-width comparison reproduces string
//! order and shorter strings sort before longer ones sharing a prefix.
//! Strings longer than the pad length are truncated (with a warning). A pad
//! length of zero uses the string verbatim.
//!
//! ## Booleans
//!
//! `false` and `true`, textually, which already compare in value order.
//!
//! ## Null
//!
//! The empty byte string, which turns any key built from it into a pure
//! prefix ("list everything under this index").
//!
//! # Descending Order
//!
//! Descending components are produced by appending a terminator byte to the
//! ascending encoding and inverting every byte (`b -> 0xFF - b`), applied
//! uniformly for all types. The terminator inverts to `0xFF`, which sorts
//! after every inverted content byte, so a string that is a prefix of
//! another sorts *after* its extensions: exactly descending order, even
//! without padding. Inverted bytes land at `0x80` and above, so they too
//! can never collide with the `/` separator.
//!
//! # Example
//!
//! ```
//! use tabledb_core::codec::encode_value;
//! use tabledb_core::Value;
//!
//! let neg = encode_value(&Value::Int(-5), 0);
//! let pos = encode_value(&Value::Int(5), 0);
//!
//! // Negative numbers sort before positive numbers
//! assert!(neg < pos);
//! ```

use crate::types::Value;


/// Separator between key components.
pub const SEPARATOR: u8 = b'/';

/// Sentinel byte used to right-pad strings. Below all printable ASCII, so a
/// padded short string sorts before a longer string sharing its prefix.
pub const STRING_PAD: u8 = 0x05;

/// `10^19 - 1`, the all-nines value used for the 9's complement. An `i64`
/// magnitude needs at most 19 decimal digits.
const NINES: u64 = 9_999_999_999_999_999_999;

/// Constant for flipping the sign bit of a 64-bit pattern.
const SIGN_FLIP: u64 = 0x8000_0000_0000_0000;

/// Terminator appended before inversion for descending components. Inverts
/// to `0xFF`, placing a value after every extension of itself.
const TERMINATOR: u8 = 0x00;

/// Encode a value into its order-preserving ascending representation.
///
/// `pad` is the string pad length declared on the index; it only affects
/// string values.
#[must_use]
pub fn encode_value(value: &Value, pad: usize) -> Vec<u8> {
    match value {
        Value::Null => Vec::new(),
        Value::Bool(b) => {
            if *b {
                b"true".to_vec()
            } else {
                b"false".to_vec()
            }
        }
        Value::Int(i) => encode_int(*i),
        Value::Float(f) => encode_float(*f),
        Value::String(s) => encode_string(s, pad),
    }
}

/// Encode a value for a descending component: the ascending encoding plus a
/// terminator, with every byte inverted.
///
/// Null stays empty so a key built from it remains a pure prefix.
#[must_use]
pub fn encode_value_desc(value: &Value, pad: usize) -> Vec<u8> {
    if value.is_null() {
        return Vec::new();
    }
    invert_component(&encode_value(value, pad))
}

/// Turn an ascending component into its descending counterpart by appending
/// the terminator and inverting every byte.
#[must_use]
pub fn invert_component(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 1);
    out.extend_from_slice(bytes);
    out.push(TERMINATOR);
    invert(&mut out);
    out
}

/// Invert every byte of an encoded component, reversing its sort order.
pub fn invert(bytes: &mut [u8]) {
    for b in bytes {
        *b = 0xFF - *b;
    }
}

fn encode_int(i: i64) -> Vec<u8> {
    if i >= 0 {
        format!("1{i:019}").into_bytes()
    } else {
        let complement = NINES - i.unsigned_abs();
        format!("0{complement:019}").into_bytes()
    }
}

fn encode_float(f: f64) -> Vec<u8> {
    let bits = f.to_bits();
    let ordered = if f.is_nan() {
        // NaN sorts after all other values.
        u64::MAX
    } else if bits & SIGN_FLIP == 0 {
        bits ^ SIGN_FLIP
    } else {
        !bits
    };
    format!("{ordered:020}").into_bytes()
}

fn encode_string(s: &str, pad: usize) -> Vec<u8> {
    let bytes = s.as_bytes();
    if pad == 0 {
        return bytes.to_vec();
    }
    if bytes.len() > pad {
        tracing::warn!(
            pad,
            len = bytes.len(),
            "string longer than index pad length, truncating for key encoding"
        );
        return bytes[..pad].to_vec();
    }
    let mut out = bytes.to_vec();
    out.resize(pad, STRING_PAD);
    out
}

/// Assemble a full index key:
/// `<namespace>/<index>/<orderValue>/<filterValue>/<primaryKey>`.
#[must_use]
pub fn index_key(
    namespace: &str,
    index: &str,
    order: &[u8],
    filter: &[u8],
    primary: &[u8],
) -> Vec<u8> {
    let mut key = Vec::with_capacity(
        namespace.len() + index.len() + order.len() + filter.len() + primary.len() + 4,
    );
    key.extend_from_slice(namespace.as_bytes());
    key.push(SEPARATOR);
    key.extend_from_slice(index.as_bytes());
    key.push(SEPARATOR);
    key.extend_from_slice(order);
    key.push(SEPARATOR);
    key.extend_from_slice(filter);
    key.push(SEPARATOR);
    key.extend_from_slice(primary);
    key
}

/// Assemble the prefix covering every key of one index:
/// `<namespace>/<index>/`.
#[must_use]
pub fn index_prefix(namespace: &str, index: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(namespace.len() + index.len() + 2);
    prefix.extend_from_slice(namespace.as_bytes());
    prefix.push(SEPARATOR);
    prefix.extend_from_slice(index.as_bytes());
    prefix.push(SEPARATOR);
    prefix
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn enc(value: &Value) -> Vec<u8> {
        encode_value(value, 0)
    }

    // ========================================================================
    // Integer ordering
    // ========================================================================

    #[test]
    fn int_boundary_values_are_ordered() {
        let values = [i64::MIN, i64::MIN + 1, -1000, -2, -1, 0, 1, 2, 1000, i64::MAX - 1, i64::MAX];
        for pair in values.windows(2) {
            let a = enc(&Value::Int(pair[0]));
            let b = enc(&Value::Int(pair[1]));
            assert!(a < b, "{} should sort before {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn int_encoding_is_fixed_width() {
        for i in [i64::MIN, -1, 0, 1, i64::MAX] {
            assert_eq!(enc(&Value::Int(i)).len(), 20, "failed for {i}");
        }
    }

    #[test]
    fn negative_ints_sort_below_non_negative() {
        assert!(enc(&Value::Int(-1)) < enc(&Value::Int(0)));
        assert!(enc(&Value::Int(i64::MIN)) < enc(&Value::Int(i64::MAX)));
    }

    // ========================================================================
    // Float ordering
    // ========================================================================

    #[test]
    fn float_values_are_ordered() {
        let values = [
            f64::NEG_INFINITY,
            -1000.0,
            -1.0,
            -f64::MIN_POSITIVE,
            -0.0,
            0.0,
            f64::MIN_POSITIVE,
            0.1,
            1.0,
            1000.0,
            f64::INFINITY,
        ];
        for pair in values.windows(2) {
            let a = enc(&Value::Float(pair[0]));
            let b = enc(&Value::Float(pair[1]));
            assert!(a <= b, "{} should not sort after {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn float_nan_sorts_last() {
        let nan = enc(&Value::Float(f64::NAN));
        assert!(enc(&Value::Float(f64::INFINITY)) < nan);
        assert!(enc(&Value::Float(f64::MAX)) < nan);
    }

    #[test]
    fn float_encoding_is_fixed_width() {
        for f in [f64::NEG_INFINITY, -1.5, 0.0, 2.5, f64::INFINITY, f64::NAN] {
            assert_eq!(enc(&Value::Float(f)).len(), 20, "failed for {f}");
        }
    }

    // ========================================================================
    // String ordering
    // ========================================================================

    #[test]
    fn strings_are_ordered_verbatim_without_pad() {
        let values = ["", "a", "aa", "ab", "b", "hello", "world"];
        for pair in values.windows(2) {
            let a = enc(&Value::String(pair[0].into()));
            let b = enc(&Value::String(pair[1].into()));
            assert!(a < b, "{:?} should sort before {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn padded_shorter_string_sorts_before_longer_with_same_prefix() {
        let a = encode_value(&Value::String("abcd".into()), 12);
        let b = encode_value(&Value::String("abcde".into()), 12);
        assert_eq!(a.len(), 12);
        assert_eq!(b.len(), 12);
        assert!(a < b);
    }

    #[test]
    fn strings_longer_than_pad_are_truncated() {
        let encoded = encode_value(&Value::String("abcdefgh".into()), 4);
        assert_eq!(encoded, b"abcd");
    }

    #[test]
    fn pad_sentinel_is_below_printable_ascii() {
        assert!(STRING_PAD < b' ');
        assert_ne!(STRING_PAD, SEPARATOR);
    }

    // ========================================================================
    // Booleans and null
    // ========================================================================

    #[test]
    fn false_sorts_before_true() {
        assert!(enc(&Value::Bool(false)) < enc(&Value::Bool(true)));
    }

    #[test]
    fn bool_encoding_is_textual() {
        assert_eq!(enc(&Value::Bool(false)), b"false");
        assert_eq!(enc(&Value::Bool(true)), b"true");
    }

    #[test]
    fn null_encodes_empty() {
        assert!(enc(&Value::Null).is_empty());
        assert!(encode_value_desc(&Value::Null, 0).is_empty());
    }

    // ========================================================================
    // Descending order
    // ========================================================================

    #[test]
    fn descending_reverses_int_order() {
        let a = encode_value_desc(&Value::Int(20), 0);
        let b = encode_value_desc(&Value::Int(30), 0);
        assert!(b < a);
    }

    #[test]
    fn descending_reverses_padded_string_order() {
        let a = encode_value_desc(&Value::String("abcd".into()), 12);
        let b = encode_value_desc(&Value::String("abcde".into()), 12);
        assert!(b < a);
    }

    #[test]
    fn descending_orders_unpadded_prefix_strings() {
        // "a" < "aa" ascending, so "aa" must come first descending; the
        // inverted terminator places a string after its extensions.
        let a = encode_value_desc(&Value::String("a".into()), 0);
        let aa = encode_value_desc(&Value::String("aa".into()), 0);
        assert!(aa < a);
    }

    #[test]
    fn descending_bytes_avoid_the_separator() {
        for value in [
            Value::Int(-42),
            Value::Float(1.25),
            Value::Bool(true),
            Value::String("post/tag".into()),
        ] {
            let encoded = encode_value_desc(&value, 8);
            assert!(
                !encoded.contains(&SEPARATOR),
                "descending encoding of {value:?} contains the separator"
            );
        }
    }

    // ========================================================================
    // Key assembly
    // ========================================================================

    #[test]
    fn key_layout_joins_components_with_slashes() {
        let key = index_key("users", "age", b"ORD", b"FLT", b"PK");
        assert_eq!(key, b"users/age/ORD/FLT/PK");
    }

    #[test]
    fn index_prefix_covers_its_keys() {
        let prefix = index_prefix("users", "age");
        let key = index_key("users", "age", b"1", b"1", b"7");
        assert!(key.starts_with(&prefix));

        let other = index_key("users", "tag", b"1", b"1", b"7");
        assert!(!other.starts_with(&prefix));
    }

    #[test]
    fn null_components_collapse_to_pure_prefix() {
        let key = index_key("ns", "idx", b"", b"", b"pk");
        assert_eq!(key, b"ns/idx///pk");
    }
}
