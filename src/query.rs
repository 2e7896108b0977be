//! Query-string decoding.
//!
//! The query suffix of a request target is decoded into a flat
//! string-to-string map. Duplicate keys are resolved last-wins by design; a
//! repeated key never silently becomes an array.

use std::collections::HashMap;

use crate::error::QueryDecodeError;

/// Decode the query suffix of `target` into a key/value map.
///
/// A target without `?` yields an empty map. The remainder after the first
/// `?` splits on `&`; each candidate pair splits on its first `=` (a pair
/// without `=` gets an empty value, empty candidates are skipped). Both
/// halves are strictly percent-decoded: every `%` must be followed by two
/// hex digits and the decoded bytes must be UTF-8, otherwise the whole
/// decode fails. `+` is left alone, matching component-decoding semantics
/// rather than form semantics.
pub fn decode(target: &str) -> Result<HashMap<String, String>, QueryDecodeError> {
    let Some(pos) = target.find('?') else {
        return Ok(HashMap::new());
    };

    let mut params = HashMap::new();
    for pair in target[pos + 1..].split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        // insert() overwrites: later occurrences win.
        params.insert(decode_component(key)?, decode_component(value)?);
    }
    Ok(params)
}

fn decode_component(raw: &str) -> Result<String, QueryDecodeError> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            match (bytes.get(i + 1), bytes.get(i + 2)) {
                (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                    i += 3;
                }
                _ => return Err(QueryDecodeError::BadEscape(raw.to_string())),
            }
        } else {
            i += 1;
        }
    }

    match urlencoding::decode(raw) {
        Ok(decoded) => Ok(decoded.into_owned()),
        Err(_) => Err(QueryDecodeError::NotUtf8(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_query_yields_empty_map() {
        assert!(decode("/p").unwrap().is_empty());
    }

    #[test]
    fn decodes_pairs_and_escapes() {
        let params = decode("/p?name=Jo%20e&age=23").unwrap();
        assert_eq!(params.get("name").map(String::as_str), Some("Jo e"));
        assert_eq!(params.get("age").map(String::as_str), Some("23"));
    }

    #[test]
    fn duplicate_keys_are_last_wins() {
        let params = decode("/p?k=1&k=2").unwrap();
        assert_eq!(params.get("k").map(String::as_str), Some("2"));
    }

    #[test]
    fn pair_without_equals_gets_empty_value() {
        let params = decode("/p?flag&x=1").unwrap();
        assert_eq!(params.get("flag").map(String::as_str), Some(""));
    }

    #[test]
    fn plus_is_not_a_space() {
        let params = decode("/p?q=a+b").unwrap();
        assert_eq!(params.get("q").map(String::as_str), Some("a+b"));
    }

    #[test]
    fn truncated_escape_is_rejected() {
        assert_eq!(
            decode("/p?k=%2"),
            Err(QueryDecodeError::BadEscape("%2".to_string()))
        );
    }

    #[test]
    fn non_hex_escape_is_rejected() {
        assert!(matches!(
            decode("/p?k=%zz"),
            Err(QueryDecodeError::BadEscape(_))
        ));
    }

    #[test]
    fn non_utf8_escape_is_rejected() {
        assert!(matches!(
            decode("/p?k=%FF"),
            Err(QueryDecodeError::NotUtf8(_))
        ));
    }
}
