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

//! TMX documents for tests.

use quick_xml::escape::escape;

/// Wrap `units` in a TMX document with the given `header`.
pub(crate) fn tmx_with_header(header: &str, units: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<tmx version="1.4">
{header}
<body>
{units}
</body>
</tmx>
"#
    )
}

/// A document with one unit per `(variant, source, target)` triple,
/// translated from `en` to `locale`.
pub(crate) fn tmx(locale: &str, units: &[(&str, &str, &str)]) -> String {
    let units = units
        .iter()
        .map(|(variant, source, target)| {
            format!(
                r#"<tu>
  <prop type="x-smartling-string-variant">{}</prop>
  <tuv xml:lang="en"><seg>{}</seg></tuv>
  <tuv xml:lang="{locale}"><seg>{}</seg></tuv>
</tu>"#,
                escape(*variant),
                escape(*source),
                escape(*target)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    tmx_with_header(r#"<header creationtool="tests" srclang="en"/>"#, &units)
}
