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

//! Plural-form lookup strategies.
//!
//! Callers key plural forms with a trailing CLDR category, such as
//! `cart.items.one` and `cart.items.other`. The vendor may store them
//! differently, so a [`PluralPolicy`] tries an ordered list of
//! strategies, each turning the caller's meta key into a key to look up
//! in the translation memory.

use serde::Deserialize;

use crate::normalize::normalize;

/// The CLDR plural categories.
pub const CLDR_FORMS: &[&str] = &["zero", "one", "two", "few", "many", "other"];

/// One way of spelling a plural key in the translation memory.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PluralStrategy {
    /// All forms live under the base key, told apart by source text.
    VendorBaseKey,
    /// The caller's own spelling: `base.one`.
    CallerSuffix,
}

impl PluralStrategy {
    pub fn lookup_key(&self, base: &str, form: &str) -> String {
        match self {
            PluralStrategy::VendorBaseKey => base.to_string(),
            PluralStrategy::CallerSuffix => format!("{base}.{form}"),
        }
    }
}

/// Recognized plural suffixes and the order in which to try the
/// strategies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PluralPolicy {
    pub forms: Vec<String>,
    pub strategies: Vec<PluralStrategy>,
}

impl Default for PluralPolicy {
    fn default() -> Self {
        Self {
            forms: CLDR_FORMS.iter().map(|form| form.to_string()).collect(),
            strategies: vec![PluralStrategy::VendorBaseKey, PluralStrategy::CallerSuffix],
        }
    }
}

impl PluralPolicy {
    /// Split `meta_key` into base key and plural form, if it ends in a
    /// recognized plural suffix.
    ///
    /// ```
    /// use tmx_memory::plurals::PluralPolicy;
    ///
    /// let policy = PluralPolicy::default();
    /// assert_eq!(policy.split("cart.items.one"), Some(("cart.items", "one")));
    /// assert_eq!(policy.split("cart.items"), None);
    /// ```
    pub fn split<'a>(&self, meta_key: &'a str) -> Option<(&'a str, &'a str)> {
        let (base, form) = meta_key.rsplit_once('.')?;
        if base.is_empty() {
            return None;
        }
        let suffix = normalize(form);
        self.forms
            .iter()
            .any(|known| normalize(known) == suffix)
            .then_some((base, form))
    }

    /// Keys to try, in order, for a pluralized `meta_key`.
    ///
    /// Empty if `meta_key` has no plural suffix.
    pub fn candidate_keys(&self, meta_key: &str) -> Vec<String> {
        let Some((base, form)) = self.split(meta_key) else {
            return Vec::new();
        };
        self.strategies
            .iter()
            .map(|strategy| strategy.lookup_key(base, form))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_recognized_forms() {
        let policy = PluralPolicy::default();
        assert_eq!(policy.split("teapot.one"), Some(("teapot", "one")));
        assert_eq!(policy.split("a.b.other"), Some(("a.b", "other")));
        assert_eq!(policy.split("teapot.lid"), None);
        assert_eq!(policy.split("one"), None);
        assert_eq!(policy.split(".one"), None);
    }

    #[test]
    fn test_default_candidate_keys() {
        let policy = PluralPolicy::default();
        assert_eq!(
            policy.candidate_keys("teapot.one"),
            vec!["teapot".to_string(), "teapot.one".to_string()]
        );
        assert!(policy.candidate_keys("teapot").is_empty());
    }

    #[test]
    fn test_custom_strategies() {
        let policy = PluralPolicy {
            forms: vec!["singular".into(), "plural".into()],
            strategies: vec![PluralStrategy::CallerSuffix, PluralStrategy::VendorBaseKey],
        };
        assert_eq!(
            policy.candidate_keys("teapot.plural"),
            vec!["teapot.plural".to_string(), "teapot".to_string()]
        );
        assert!(policy.candidate_keys("teapot.other").is_empty());
    }

    #[test]
    fn test_deserialize_policy() {
        let policy: PluralPolicy =
            serde_json::from_str(r#"{"strategies": ["caller-suffix"]}"#).unwrap();
        assert_eq!(policy.strategies, vec![PluralStrategy::CallerSuffix]);
        assert_eq!(policy.forms.len(), CLDR_FORMS.len());
    }

    #[test]
    fn test_deserialize_bracketed_strategy_is_an_error() {
        // Bracketed path segments are array indices, never plural forms.
        let result =
            serde_json::from_str::<PluralPolicy>(r#"{"strategies": ["vendor-bracketed-form"]}"#);
        assert!(result.is_err());
    }
}
