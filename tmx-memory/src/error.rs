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

//! Errors surfaced while loading a translation memory.
//!
//! Lookups never fail: a missing locale, a missing meta key or an
//! ambiguous duplicate all fall back to the untranslated phrase. Only
//! loading a corpus can go wrong.

use std::path::PathBuf;

use thiserror::Error;

/// A variant path could not be decoded into a locale and meta key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedPathError {
    #[error("variant path {0:?} has no `:#:` delimiter")]
    MissingDelimiter(String),
    #[error("variant path {0:?} has an empty segment")]
    EmptySegment(String),
    #[error("array index {0:?} is not a number")]
    NonNumericIndex(String),
    #[error("array index [0] is out of range, indices start at 1")]
    ZeroIndex,
}

/// The corpus could not be read as a TMX document at all.
#[derive(Error, Debug)]
pub enum CorpusLoadError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Invalid attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
    #[error("Document has no root element")]
    NoRoot,
    #[error("Expected a <tmx> root element, found <{0}>")]
    NotTmx(String),
    #[error("Document has no <body> element")]
    MissingBody,
    #[error("Could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CorpusLoadError>;
