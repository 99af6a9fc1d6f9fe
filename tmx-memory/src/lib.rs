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

//! Translation memory matching.
//!
//! The functions here map a vendor's translation memory export (a TMX
//! document) back onto the phrases it was made from. The vendor sees
//! positional `{0}` markers where the caller has `%{name}` placeholders
//! and HTML tags; this crate finds the unit translating a phrase and
//! puts the caller's placeholders and markup back.
//!
//! ```
//! use tmx_memory::{MemoryConfig, Phrase, TmxIndexBuilder, TranslationMemory};
//!
//! let document = r#"<tmx version="1.4">
//!   <header srclang="en"/>
//!   <body>
//!     <tu>
//!       <prop type="x-smartling-string-variant">en:#:greeting</prop>
//!       <tuv xml:lang="en"><seg>Hello there {0}</seg></tuv>
//!       <tuv xml:lang="es"><seg>Hola {0}</seg></tuv>
//!     </tu>
//!   </body>
//! </tmx>"#;
//!
//! let corpus = TmxIndexBuilder::new().build(document).unwrap();
//! let memory = TranslationMemory::new(corpus, MemoryConfig::default());
//! let phrase = Phrase::new("Hello there %{name}", "greeting");
//! assert_eq!(memory.translation_for("es", &phrase), "Hola %{name}");
//! ```

pub mod checksum;
pub mod config;
pub mod error;
pub mod memory;
pub mod normalize;
pub mod placeholders;
pub mod plurals;
pub mod tmx;
pub mod variant;

#[cfg(test)]
mod testing;

pub use checksum::Checksum;
pub use config::MemoryConfig;
pub use error::{CorpusLoadError, MalformedPathError};
pub use memory::{Phrase, TranslationMemory};
pub use tmx::{CorpusIndex, LocaleIndex, TmxIndexBuilder, TranslationUnit};
