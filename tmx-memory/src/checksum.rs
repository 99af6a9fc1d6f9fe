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

//! Stable fingerprints of locale indices.
//!
//! The fingerprint is used as a cache key by the callers, so it must
//! only depend on the content of the index: meta keys are visited in
//! sorted order, units in document order, and every field is length
//! prefixed before hashing with SHA-256.

use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::tmx::LocaleIndex;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Checksum([u8; 32]);

impl Checksum {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected 64 hexadecimal digits, got {0:?}")]
pub struct ParseChecksumError(String);

impl FromStr for Checksum {
    type Err = ParseChecksumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseChecksumError(s.to_string());
        if s.len() != 64 || !s.is_ascii() {
            return Err(invalid());
        }
        let mut bytes = [0; 32];
        for (byte, pair) in bytes.iter_mut().zip(s.as_bytes().chunks(2)) {
            let pair = std::str::from_utf8(pair).map_err(|_| invalid())?;
            *byte = u8::from_str_radix(pair, 16).map_err(|_| invalid())?;
        }
        Ok(Checksum(bytes))
    }
}

fn update_field(hasher: &mut Sha256, field: &str) {
    hasher.update((field.len() as u64).to_le_bytes());
    hasher.update(field.as_bytes());
}

/// Compute the fingerprint of `index`.
pub fn checksum(index: &LocaleIndex) -> Checksum {
    let mut hasher = Sha256::new();
    let keys = index.sorted_keys();
    hasher.update((keys.len() as u64).to_le_bytes());
    for meta_key in keys {
        let units = index.get(meta_key);
        update_field(&mut hasher, meta_key);
        hasher.update((units.len() as u64).to_le_bytes());
        for unit in units {
            update_field(&mut hasher, unit.source_text());
            update_field(&mut hasher, unit.target_text());
        }
    }
    Checksum(hasher.finalize().into())
}
