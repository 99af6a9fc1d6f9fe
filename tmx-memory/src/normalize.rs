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

//! Normalize text before comparing it.
//!
//! Vendor exports and caller phrases disagree in small ways: one side
//! writes `ñ` as a single code point, the other as `n` plus a combining
//! tilde; one side keeps the line breaks from a template, the other
//! does not; one side writes `&larr;`, the other `←`. Normalized text
//! is only ever compared, never emitted.

use std::borrow::Cow;
use std::fmt;

use quick_xml::escape::{resolve_html5_entity, unescape_with};
use unicode_normalization::UnicodeNormalization;

/// Text in canonical form, suitable for equality checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize `text` for comparison.
///
/// HTML character references are decoded, the result is put in
/// Unicode canonical composition (NFC) and whitespace runs are
/// collapsed to single spaces with leading and trailing whitespace
/// removed.
///
/// # Examples
///
/// ```
/// use tmx_memory::normalize::normalize;
///
/// let decomposed = "espan\u{303}ol";
/// assert_eq!(normalize(decomposed), normalize("español"));
/// assert_eq!(normalize("  foo \n bar ").as_str(), "foo bar");
/// ```
pub fn normalize(text: &str) -> NormalizedText {
    let decoded = decode_entities(text);
    let composed = decoded.nfc().collect::<String>();
    NormalizedText(composed.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Decode HTML character references, leaving `text` untouched if it
/// contains a bare `&` or an unknown entity.
fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    unescape_with(text, resolve_html5_entity).unwrap_or(Cow::Borrowed(text))
}
