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

//! Configuration of a translation memory.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::plurals::PluralPolicy;

/// Settings for building and querying a translation memory.
///
/// Every field is optional in the JSON form:
///
/// ```
/// use tmx_memory::config::MemoryConfig;
///
/// let config = MemoryConfig::from_json_str(r#"{"repo-name": "storefront"}"#).unwrap();
/// assert_eq!(config.repo_name, "storefront");
/// assert_eq!(config.serializer_id, "yaml/rails");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MemoryConfig {
    /// Repository the memory belongs to. Only used as log context.
    pub repo_name: String,
    /// Serializer the phrases were uploaded with. Only used as log
    /// context.
    pub serializer_id: String,
    pub plurals: PluralPolicy,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            repo_name: String::from("default"),
            serializer_id: String::from("yaml/rails"),
            plurals: PluralPolicy::default(),
        }
    }
}

impl MemoryConfig {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Could not parse translation memory configuration")
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Could not read configuration from {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("Invalid configuration in {path:?}"))
    }
}
