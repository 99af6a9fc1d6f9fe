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

//! Look up translations for caller phrases.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use tracing::{debug, debug_span};

use crate::checksum::{checksum, Checksum};
use crate::config::MemoryConfig;
use crate::error::Result;
use crate::normalize::normalize;
use crate::placeholders::{realign, tokenize};
use crate::tmx::{CorpusIndex, LocaleIndex, TmxIndexBuilder, TranslationUnit};

/// A source phrase known to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    /// The untranslated text, with `%{name}` placeholders and markup.
    pub key: String,
    /// Dotted path of the phrase, such as `checkout.steps.0.title`.
    pub meta_key: String,
}

impl Phrase {
    pub fn new(key: impl Into<String>, meta_key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            meta_key: meta_key.into(),
        }
    }
}

#[derive(Debug)]
struct LocaleEntry {
    index: LocaleIndex,
    checksum: OnceLock<Checksum>,
}

/// An immutable translation memory.
///
/// Build it once per download of the vendor export and share it
/// between threads; lookups only read.
#[derive(Debug)]
pub struct TranslationMemory {
    locales: BTreeMap<String, LocaleEntry>,
    config: MemoryConfig,
}

impl TranslationMemory {
    pub fn new(corpus: CorpusIndex, config: MemoryConfig) -> Self {
        let locales = corpus
            .into_iter()
            .map(|(locale, index)| {
                let entry = LocaleEntry {
                    index,
                    checksum: OnceLock::new(),
                };
                (locale, entry)
            })
            .collect();
        Self { locales, config }
    }

    /// Build a memory from per-locale TMX exports.
    pub fn from_documents<'a, I>(documents: I, config: MemoryConfig) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let _span = debug_span!(
            "build_memory",
            repo = %config.repo_name,
            serializer = %config.serializer_id
        )
        .entered();
        let builder = TmxIndexBuilder::new();
        let mut corpus = CorpusIndex::new();
        for (locale, document) in documents {
            corpus.insert(locale.to_string(), builder.build_locale(document, locale)?);
        }
        Ok(Self::new(corpus, config))
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Locales with an index, in sorted order.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }

    fn entry(&self, locale: &str) -> Option<&LocaleEntry> {
        self.locales.get(locale).or_else(|| {
            self.locales
                .iter()
                .find(|(known, _)| known.eq_ignore_ascii_case(locale))
                .map(|(_, entry)| entry)
        })
    }

    pub fn index(&self, locale: &str) -> Option<&LocaleIndex> {
        self.entry(locale).map(|entry| &entry.index)
    }

    /// Units which may hold the translation of `meta_key`.
    ///
    /// Pluralized keys are looked up with each plural strategy in turn
    /// before falling back to the key itself.
    fn candidates<'a>(&self, index: &'a LocaleIndex, meta_key: &str) -> &'a [TranslationUnit] {
        for key in self.config.plurals.candidate_keys(meta_key) {
            let units = index.get(&key);
            if !units.is_empty() {
                debug!(meta_key, key = %key, "Found plural candidates");
                return units;
            }
        }
        index.get(meta_key)
    }

    /// Pick the unit translating `phrase` among `candidates`.
    fn select<'a>(
        candidates: &'a [TranslationUnit],
        phrase: &Phrase,
    ) -> Option<&'a TranslationUnit> {
        match candidates {
            [] => None,
            [unit] => Some(unit),
            _ => {
                let key = normalize(&phrase.key);
                candidates
                    .iter()
                    .find(|unit| normalize(unit.source_text()) == key)
            }
        }
    }

    /// Translate `phrase` into `locale`.
    ///
    /// Returns the phrase key unchanged if there is no translation, or
    /// if several units share the meta key and none has the phrase key
    /// as its source text.
    pub fn translation_for(&self, locale: &str, phrase: &Phrase) -> String {
        let _span = debug_span!(
            "translation_for",
            repo = %self.config.repo_name,
            serializer = %self.config.serializer_id,
            locale,
            meta_key = %phrase.meta_key
        )
        .entered();

        let Some(index) = self.index(locale) else {
            debug!("No translation memory for locale");
            return phrase.key.clone();
        };
        let candidates = self.candidates(index, &phrase.meta_key);
        let Some(unit) = Self::select(candidates, phrase) else {
            debug!(
                candidates = candidates.len(),
                "No translation unit matches phrase"
            );
            return phrase.key.clone();
        };

        let tokens = tokenize(&phrase.key);
        realign(unit.target_text(), unit.source_text(), &tokens)
    }

    /// Translate several phrases into `locale`.
    pub fn translations_for<'p, I>(&self, locale: &str, phrases: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'p Phrase>,
    {
        phrases
            .into_iter()
            .map(|phrase| self.translation_for(locale, phrase))
            .collect()
    }

    /// Fingerprint of the index for `locale`.
    ///
    /// A locale without an index has the fingerprint of an empty index.
    pub fn checksum_for(&self, locale: &str) -> Checksum {
        match self.entry(locale) {
            Some(entry) => *entry.checksum.get_or_init(|| checksum(&entry.index)),
            None => checksum(&LocaleIndex::new()),
        }
    }
}
