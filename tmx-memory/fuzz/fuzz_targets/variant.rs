#![no_main]

use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use tmx_memory::variant::{decode, encode};

fuzz_target!(|path: &str| {
    if let Ok(decoded) = decode(path) {
        // Array indices are never negative.
        assert!(!decoded.meta_key.contains('-') || path.contains('-'));

        let reencoded = encode(&decoded.locale, &decoded.meta_key);
        let bracketed = |segment: &str| segment.starts_with('[') && segment.ends_with(']');
        if decoded
            .meta_key
            .split('.')
            .all(|segment| !segment.is_empty() && !bracketed(segment))
        {
            assert_eq!(decode(&reencoded), Ok(decoded));
        }
    }
});
