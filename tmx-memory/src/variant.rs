// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Vendor variant paths.
//!
//! Every unit in the vendor export names its origin with a flattened
//! path such as `en:#:checkout:#:[2]:#:title`. The first segment is
//! the source locale, the rest is the meta key. Array indices are
//! bracketed and 1-based in the vendor format; we store them 0-based,
//! so the path above becomes the meta key `checkout.1.title`.

use crate::error::MalformedPathError;

/// Separator between segments of a variant path.
pub const DELIMITER: &str = ":#:";

/// A decoded variant path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPath {
    pub locale: String,
    pub meta_key: String,
}

/// Decode a vendor variant path into its locale and meta key.
///
/// # Examples
///
/// ```
/// use tmx_memory::variant::decode;
///
/// let path = decode("en:#:foo:#:[2]:#:bar").unwrap();
/// assert_eq!(path.locale, "en");
/// assert_eq!(path.meta_key, "foo.1.bar");
/// ```
pub fn decode(path: &str) -> Result<VariantPath, MalformedPathError> {
    let Some((locale, rest)) = path.split_once(DELIMITER) else {
        return Err(MalformedPathError::MissingDelimiter(path.to_string()));
    };
    if locale.is_empty() {
        return Err(MalformedPathError::EmptySegment(path.to_string()));
    }

    let segments = rest
        .split(DELIMITER)
        .map(|segment| match segment {
            "" => Err(MalformedPathError::EmptySegment(path.to_string())),
            _ => decode_segment(segment),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(VariantPath {
        locale: locale.to_string(),
        meta_key: segments.join("."),
    })
}

fn decode_segment(segment: &str) -> Result<String, MalformedPathError> {
    let Some(index) = segment
        .strip_prefix('[')
        .and_then(|segment| segment.strip_suffix(']'))
    else {
        return Ok(segment.to_string());
    };

    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|_| MalformedPathError::NonNumericIndex(index.to_string()))?;
    match index.checked_sub(1) {
        Some(index) => Ok(index.to_string()),
        None => Err(MalformedPathError::ZeroIndex),
    }
}

/// Encode a locale and meta key as a vendor variant path.
///
/// Numeric meta key segments in canonical form (no sign, no leading
/// zeros) are treated as array indices and written back in the
/// bracketed 1-based form. Other segments are written as they are.
///
/// Decoding the result gives back `meta_key` as long as none of its
/// dot-separated segments is empty or wrapped in brackets.
pub fn encode(locale: &str, meta_key: &str) -> String {
    let mut path = String::from(locale);
    for segment in meta_key.split('.') {
        path.push_str(DELIMITER);
        let index = segment
            .parse::<usize>()
            .ok()
            .filter(|index| index.to_string() == segment)
            .and_then(|index| index.checked_add(1));
        match index {
            Some(index) => path.push_str(&format!("[{index}]")),
            None => path.push_str(segment),
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_strips_locale() {
        let path = decode("en:#:foo:#:bar").unwrap();
        assert_eq!(path.locale, "en");
        assert_eq!(path.meta_key, "foo.bar");
    }

    #[test]
    fn test_decode_array_index_is_zero_based() {
        // The vendor counts from 1.
        assert_eq!(decode("en:#:foo:#:[2]:#:bar").unwrap().meta_key, "foo.1.bar");
        assert_eq!(decode("en:#:items:#:[1]").unwrap().meta_key, "items.0");
    }

    #[test]
    fn test_decode_single_segment() {
        assert_eq!(decode("de-DE:#:teapot").unwrap().meta_key, "teapot");
    }

    #[test]
    fn test_decode_keeps_unbracketed_numbers() {
        assert_eq!(decode("en:#:errors:#:404").unwrap().meta_key, "errors.404");
    }

    #[test]
    fn test_decode_missing_delimiter() {
        assert_eq!(
            decode("en.foo.bar"),
            Err(MalformedPathError::MissingDelimiter("en.foo.bar".into()))
        );
        assert_eq!(
            decode(""),
            Err(MalformedPathError::MissingDelimiter("".into()))
        );
    }

    #[test]
    fn test_decode_empty_segments() {
        assert!(matches!(
            decode(":#:foo"),
            Err(MalformedPathError::EmptySegment(_))
        ));
        assert!(matches!(
            decode("en:#:"),
            Err(MalformedPathError::EmptySegment(_))
        ));
        assert!(matches!(
            decode("en:#:foo:#::#:bar"),
            Err(MalformedPathError::EmptySegment(_))
        ));
    }

    #[test]
    fn test_decode_non_numeric_index() {
        assert_eq!(
            decode("en:#:foo:#:[two]"),
            Err(MalformedPathError::NonNumericIndex("two".into()))
        );
        assert_eq!(
            decode("en:#:foo:#:[-1]"),
            Err(MalformedPathError::NonNumericIndex("-1".into()))
        );
    }

    #[test]
    fn test_decode_zero_index() {
        assert_eq!(decode("en:#:foo:#:[0]"), Err(MalformedPathError::ZeroIndex));
    }

    #[test]
    fn test_encode_brackets_numeric_segments() {
        assert_eq!(encode("en", "foo.1.bar"), "en:#:foo:#:[2]:#:bar");
        assert_eq!(encode("en", "teapot"), "en:#:teapot");
    }

    #[test]
    fn test_encode_keeps_leading_zeros() {
        let decoded = decode("en:#:errors:#:007").unwrap();
        assert_eq!(decoded.meta_key, "errors.007");
        let path = encode(&decoded.locale, &decoded.meta_key);
        assert_eq!(path, "en:#:errors:#:007");
        assert_eq!(decode(&path).unwrap(), decoded);
        assert_eq!(encode("en", "errors.0"), "en:#:errors:#:[1]");
    }

    #[test]
    fn test_encode_is_inverse_of_decode() {
        let path = "fr:#:checkout:#:[3]:#:steps:#:[1]:#:title";
        let decoded = decode(path).unwrap();
        assert_eq!(encode(&decoded.locale, &decoded.meta_key), path);
    }
}
