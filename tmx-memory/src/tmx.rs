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

//! Build per-locale indices from a TMX export.
//!
//! The vendor exports one `<tu>` per stored string. The variant path
//! naming the string lives in a `<prop type="x-smartling-string-variant">`,
//! and each `<tuv>` holds the text in one language:
//!
//! ```xml
//! <tmx version="1.4">
//!   <header srclang="en-US"/>
//!   <body>
//!     <tu>
//!       <prop type="x-smartling-string-variant">en:#:checkout:#:title</prop>
//!       <tuv xml:lang="en-US"><seg>Check out</seg></tuv>
//!       <tuv xml:lang="de-DE"><seg>Zur Kasse</seg></tuv>
//!     </tu>
//!   </body>
//! </tmx>
//! ```
//!
//! A unit which cannot be used (bad variant path, missing segments) is
//! skipped with a warning. Only a document which is not TMX at all
//! fails the build.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, warn};

use crate::error::{CorpusLoadError, Result};
use crate::variant;

/// Inline TMX elements whose text content is part of the segment.
const INLINE_ELEMENTS: &[&str] = &["bpt", "ept", "ph", "it", "hi", "ut", "sub"];

/// One stored string in one target locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
    meta_key: String,
    source_text: String,
    target_text: String,
}

impl TranslationUnit {
    pub fn new(
        meta_key: impl Into<String>,
        source_text: impl Into<String>,
        target_text: impl Into<String>,
    ) -> Self {
        Self {
            meta_key: meta_key.into(),
            source_text: source_text.into(),
            target_text: target_text.into(),
        }
    }

    pub fn meta_key(&self) -> &str {
        &self.meta_key
    }

    /// The untranslated text, as the vendor stored it.
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// The translated text, possibly with `{i}` markers.
    pub fn target_text(&self) -> &str {
        &self.target_text
    }
}

/// Translation units of one locale, grouped by meta key.
///
/// Units sharing a meta key are all kept, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleIndex {
    units: HashMap<String, Vec<TranslationUnit>>,
}

/// Counts describing a [`LocaleIndex`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub meta_keys: usize,
    pub units: usize,
    /// Meta keys with more than one unit.
    pub duplicated_keys: usize,
}

impl LocaleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `unit` to the bucket of its meta key.
    pub fn push(&mut self, unit: TranslationUnit) {
        self.units
            .entry(unit.meta_key.clone())
            .or_default()
            .push(unit);
    }

    /// All units stored under `meta_key`, in document order.
    pub fn get(&self, meta_key: &str) -> &[TranslationUnit] {
        self.units.get(meta_key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains_key(&self, meta_key: &str) -> bool {
        self.units.contains_key(meta_key)
    }

    /// Meta keys in lexicographic order.
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys = self.units.keys().map(String::as_str).collect::<Vec<_>>();
        keys.sort_unstable();
        keys
    }

    /// Number of distinct meta keys.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            meta_keys: self.units.len(),
            units: self.units.values().map(Vec::len).sum(),
            duplicated_keys: self.units.values().filter(|units| units.len() > 1).count(),
        }
    }
}

impl FromIterator<TranslationUnit> for LocaleIndex {
    fn from_iter<I: IntoIterator<Item = TranslationUnit>>(iter: I) -> Self {
        let mut index = LocaleIndex::new();
        for unit in iter {
            index.push(unit);
        }
        index
    }
}

/// Locale indices keyed by target locale.
pub type CorpusIndex = BTreeMap<String, LocaleIndex>;

#[derive(Debug)]
struct Segment {
    lang: Option<String>,
    text: String,
}

#[derive(Debug, Default)]
struct RawUnit {
    tuid: Option<String>,
    variant: Option<String>,
    segments: Vec<Segment>,
}

#[derive(Debug, Default)]
struct Document {
    source_locale: Option<String>,
    units: Vec<RawUnit>,
}

/// A unit with a decoded meta key and the source segment split off.
#[derive(Debug)]
struct ParsedUnit {
    meta_key: String,
    source_text: String,
    targets: Vec<Segment>,
}

fn attribute(start: &BytesStart<'_>, names: &[&str]) -> Result<Option<String>> {
    for attr in start.attributes() {
        let attr = attr?;
        if names.iter().any(|name| attr.key.as_ref() == name.as_bytes()) {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn same_locale(lang: Option<&str>, locale: &str) -> bool {
    lang.is_some_and(|lang| lang.eq_ignore_ascii_case(locale))
}

/// Read the units out of a TMX document.
fn parse_document(document: &str) -> Result<Document> {
    let mut reader = Reader::from_str(document);
    reader.config_mut().trim_text(false);

    let mut doc = Document::default();
    let mut seen_root = false;
    let mut seen_body = false;
    let mut unit: Option<RawUnit> = None;
    // The `type` and text of the `<prop>` being read.
    let mut prop: Option<(String, String)> = None;
    let mut lang: Option<String> = None;
    let mut seg: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if !seen_root => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if name != "tmx" {
                    return Err(CorpusLoadError::NotTmx(name));
                }
                seen_root = true;
            }
            Event::Start(e) => match e.local_name().as_ref() {
                b"header" => doc.source_locale = attribute(&e, &["srclang"])?,
                b"body" => seen_body = true,
                b"tu" => {
                    unit = Some(RawUnit {
                        tuid: attribute(&e, &["tuid"])?,
                        ..RawUnit::default()
                    })
                }
                b"prop" if unit.is_some() && seg.is_none() => {
                    let kind = attribute(&e, &["type"])?.unwrap_or_default();
                    prop = Some((kind, String::new()));
                }
                b"tuv" => lang = attribute(&e, &["xml:lang", "lang"])?,
                b"seg" => seg = Some(String::new()),
                name if seg.is_some() => {
                    if !INLINE_ELEMENTS.iter().any(|inline| inline.as_bytes() == name) {
                        debug!(
                            element = %String::from_utf8_lossy(name),
                            "Unknown element inside segment"
                        );
                    }
                }
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"header" => doc.source_locale = attribute(&e, &["srclang"])?,
                b"body" => seen_body = true,
                b"seg" => {
                    if let Some(unit) = unit.as_mut() {
                        unit.segments.push(Segment {
                            lang: lang.clone(),
                            text: String::new(),
                        });
                    }
                }
                _ => {}
            },
            Event::Text(e) => {
                if let Some(text) = seg.as_mut().or(prop.as_mut().map(|(_, text)| text)) {
                    text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(text) = seg.as_mut().or(prop.as_mut().map(|(_, text)| text)) {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"seg" => {
                    if let (Some(text), Some(unit)) = (seg.take(), unit.as_mut()) {
                        unit.segments.push(Segment {
                            lang: lang.clone(),
                            text,
                        });
                    }
                }
                b"tuv" => lang = None,
                b"prop" => {
                    if let (Some((kind, text)), Some(unit)) = (prop.take(), unit.as_mut()) {
                        if kind.ends_with("string-variant") {
                            unit.variant = Some(text.trim().to_string());
                        }
                    }
                }
                b"tu" => {
                    if let Some(unit) = unit.take() {
                        doc.units.push(unit);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(CorpusLoadError::NoRoot);
    }
    if !seen_body {
        return Err(CorpusLoadError::MissingBody);
    }
    Ok(doc)
}

/// Builds [`LocaleIndex`]es from TMX documents.
#[derive(Debug, Clone, Default)]
pub struct TmxIndexBuilder {
    source_locale: Option<String>,
}

impl TmxIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `locale` to pick the source segment instead of the
    /// `srclang` of the document header.
    pub fn with_source_locale(mut self, locale: impl Into<String>) -> Self {
        self.source_locale = Some(locale.into());
        self
    }

    fn parse_units(&self, document: &str) -> Result<Vec<ParsedUnit>> {
        let doc = parse_document(document)?;
        let source_locale = self.source_locale.as_deref().or(doc.source_locale.as_deref());
        Ok(doc
            .units
            .into_iter()
            .filter_map(|unit| resolve_unit(unit, source_locale))
            .collect())
    }

    /// Build an index for every target locale found in `document`.
    pub fn build(&self, document: &str) -> Result<CorpusIndex> {
        let mut corpus = CorpusIndex::new();
        for unit in self.parse_units(document)? {
            if unit.targets.is_empty() {
                warn!(meta_key = %unit.meta_key, "Skipping translation unit without target segment");
                continue;
            }
            for target in unit.targets {
                let Some(lang) = target.lang else {
                    warn!(meta_key = %unit.meta_key, "Skipping target segment without language");
                    continue;
                };
                corpus.entry(lang).or_default().push(TranslationUnit::new(
                    unit.meta_key.as_str(),
                    unit.source_text.as_str(),
                    target.text,
                ));
            }
        }
        debug!(locales = corpus.len(), "Built translation memory corpus");
        Ok(corpus)
    }

    /// Build the index of a single `locale`.
    ///
    /// Use this for per-locale exports: the target segment is the one
    /// in `locale`, or the only non-source segment of the unit.
    pub fn build_locale(&self, document: &str, locale: &str) -> Result<LocaleIndex> {
        let mut index = LocaleIndex::new();
        for mut unit in self.parse_units(document)? {
            let position = unit
                .targets
                .iter()
                .position(|target| same_locale(target.lang.as_deref(), locale))
                .or_else(|| (unit.targets.len() == 1).then_some(0));
            let Some(position) = position else {
                warn!(meta_key = %unit.meta_key, locale, "Skipping translation unit without target segment");
                continue;
            };
            let target = unit.targets.swap_remove(position);
            index.push(TranslationUnit::new(
                unit.meta_key,
                unit.source_text,
                target.text,
            ));
        }
        debug!(locale, meta_keys = index.len(), "Built translation memory index");
        Ok(index)
    }

    /// Read and build the TMX document at `path`.
    pub fn build_from_path(&self, path: &Path) -> Result<CorpusIndex> {
        let document = fs::read_to_string(path).map_err(|source| CorpusLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.build(&document)
    }
}

fn resolve_unit(mut unit: RawUnit, source_locale: Option<&str>) -> Option<ParsedUnit> {
    let Some(path) = unit.variant.as_deref().or(unit.tuid.as_deref()) else {
        warn!("Skipping translation unit without variant path");
        return None;
    };
    let meta_key = match variant::decode(path) {
        Ok(decoded) => decoded.meta_key,
        Err(err) => {
            warn!(path, %err, "Skipping translation unit with malformed variant path");
            return None;
        }
    };

    let source = match source_locale {
        Some(locale) => unit
            .segments
            .iter()
            .position(|segment| same_locale(segment.lang.as_deref(), locale)),
        None => (!unit.segments.is_empty()).then_some(0),
    };
    let Some(source) = source else {
        warn!(meta_key = %meta_key, "Skipping translation unit without source segment");
        return None;
    };

    let source = unit.segments.remove(source);
    Some(ParsedUnit {
        meta_key,
        source_text: source.text,
        targets: unit.segments,
    })
}
