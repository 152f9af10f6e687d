//! Immutable label table: locale → key → template.
//!
//! A [`LabelStore`] is validated once when it is built and never mutated
//! afterwards. Re-localizing a running process means building a new store
//! and swapping it in through [`crate::reload::LabelHandle`].
//!
//! # Invariants
//!
//! 1. The default locale is always present.
//! 2. Every template is a plain string; nesting deeper than two levels is
//!    rejected at load time.
//! 3. Non-default locales may omit keys; lookups for those keys fall back to
//!    the default locale in [`crate::resolver`].

use std::collections::{BTreeSet, HashMap, HashSet};

use serde_json::Value;

use crate::error::{LabelError, LabelResult};
use crate::interpolate::placeholder_names;

/// Locale identifier (e.g. `"en"`, `"fr"`).
pub type Locale = String;

/// Label key holding the human-readable name of a locale.
pub const LANGUAGE_KEY: &str = "LANGUAGE";

/// Templates for a single locale.
#[derive(Debug, Clone, Default)]
pub struct LocaleLabels {
    labels: HashMap<String, String>,
}

impl LocaleLabels {
    /// Look up a template by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.labels.contains_key(key)
    }

    /// Number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate over all keys in this locale.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocaleLabels {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            labels: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// The validated, read-only label table.
#[derive(Debug, Clone)]
pub struct LabelStore {
    locales: HashMap<Locale, LocaleLabels>,
    default_locale: Locale,
}

impl LabelStore {
    /// Build a store from an untyped two-level table.
    ///
    /// Fails with [`LabelError::MalformedTable`] when `table` is not an
    /// object of objects of strings, or when `default_locale` is absent.
    pub fn load(table: &Value, default_locale: &str) -> LabelResult<Self> {
        let top = table.as_object().ok_or_else(|| {
            LabelError::malformed(format!(
                "expected an object of locales at the top level, found {}",
                kind_of(table)
            ))
        })?;

        let mut locales = HashMap::with_capacity(top.len());
        for (locale, entries) in top {
            let entries = entries.as_object().ok_or_else(|| {
                LabelError::malformed(format!(
                    "locale '{locale}' must map to an object of labels, found {}",
                    kind_of(entries)
                ))
            })?;

            let mut labels = HashMap::with_capacity(entries.len());
            for (key, template) in entries {
                let template = template.as_str().ok_or_else(|| {
                    LabelError::malformed(format!(
                        "label '{locale}.{key}' must be a string, found {}",
                        kind_of(template)
                    ))
                })?;
                labels.insert(key.clone(), template.to_string());
            }
            locales.insert(locale.clone(), LocaleLabels { labels });
        }

        Self::from_locales(default_locale, locales)
    }

    /// Build a store from already-typed locale tables.
    pub fn from_locales<L>(
        default_locale: &str,
        locales: impl IntoIterator<Item = (L, LocaleLabels)>,
    ) -> LabelResult<Self>
    where
        L: Into<Locale>,
    {
        let locales: HashMap<Locale, LocaleLabels> = locales
            .into_iter()
            .map(|(locale, labels)| (locale.into(), labels))
            .collect();

        if !locales.contains_key(default_locale) {
            return Err(LabelError::malformed(format!(
                "default locale '{default_locale}' is absent"
            )));
        }

        Ok(Self {
            locales,
            default_locale: default_locale.to_string(),
        })
    }

    /// The Drive label table compiled into the crate, with `en` as default.
    pub fn bundled() -> LabelResult<Self> {
        crate::loader::bundled()
    }

    /// The locale every other locale falls back to.
    #[must_use]
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Raw template for exactly (`locale`, `key`), without fallback.
    #[must_use]
    pub fn get(&self, locale: &str, key: &str) -> Option<&str> {
        self.locales.get(locale).and_then(|labels| labels.get(key))
    }

    #[must_use]
    pub fn has_locale(&self, locale: &str) -> bool {
        self.locales.contains_key(locale)
    }

    /// All registered locales, sorted.
    #[must_use]
    pub fn locales(&self) -> BTreeSet<&str> {
        self.locales.keys().map(String::as_str).collect()
    }

    /// The store's own copy of a locale tag.
    pub(crate) fn locale_tag(&self, locale: &str) -> Option<&str> {
        self.locales
            .get_key_value(locale)
            .map(|(tag, _)| tag.as_str())
    }

    /// Labels of one locale.
    #[must_use]
    pub fn labels(&self, locale: &str) -> Option<&LocaleLabels> {
        self.locales.get(locale)
    }

    /// Every locale paired with its display name (its own `LANGUAGE`
    /// label, or the locale code when it has none), sorted by locale.
    #[must_use]
    pub fn languages(&self) -> Vec<(String, String)> {
        self.locales()
            .into_iter()
            .map(|locale| {
                let name = self.get(locale, LANGUAGE_KEY).unwrap_or(locale);
                (locale.to_string(), name.to_string())
            })
            .collect()
    }

    /// Compare every locale against the default locale's key set.
    ///
    /// Missing keys are tolerated at runtime (they fall back), so this is a
    /// diagnostic for table maintainers, not a load-time check.
    #[must_use]
    pub fn coverage_report(&self) -> CoverageReport {
        let reference = &self.locales[&self.default_locale];
        let reference_keys: HashSet<&str> = reference.keys().collect();
        let total = reference_keys.len();

        let locales = self
            .locales()
            .into_iter()
            .map(|tag| {
                let labels = &self.locales[tag];

                let mut missing: Vec<String> = reference_keys
                    .iter()
                    .filter(|key| !labels.contains_key(key))
                    .map(|key| key.to_string())
                    .collect();
                missing.sort_unstable();

                let mut extra: Vec<String> = labels
                    .keys()
                    .filter(|key| !reference_keys.contains(key))
                    .map(String::from)
                    .collect();
                extra.sort_unstable();

                let mut placeholder_mismatches: Vec<String> = labels
                    .labels
                    .iter()
                    .filter_map(|(key, template)| {
                        let base = reference.get(key)?;
                        let ours: BTreeSet<String> =
                            placeholder_names(template).into_iter().collect();
                        let theirs: BTreeSet<String> =
                            placeholder_names(base).into_iter().collect();
                        (ours != theirs).then(|| key.clone())
                    })
                    .collect();
                placeholder_mismatches.sort_unstable();

                let present = total.saturating_sub(missing.len());
                let coverage_percent = if total == 0 {
                    100.0
                } else {
                    (present as f32 / total as f32) * 100.0
                };

                LocaleCoverage {
                    locale: tag.to_string(),
                    present,
                    missing,
                    extra,
                    placeholder_mismatches,
                    coverage_percent,
                }
            })
            .collect();

        CoverageReport {
            default_locale: self.default_locale.clone(),
            total_keys: total,
            locales,
        }
    }
}

/// Completeness of every locale relative to the default locale.
#[derive(Debug, Clone)]
pub struct CoverageReport {
    pub default_locale: String,
    /// Number of keys in the default locale.
    pub total_keys: usize,
    /// Per-locale data, sorted by locale.
    pub locales: Vec<LocaleCoverage>,
}

impl CoverageReport {
    /// True when no locale misses a key or disagrees on placeholders.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.locales
            .iter()
            .all(|l| l.missing.is_empty() && l.placeholder_mismatches.is_empty())
    }
}

/// Per-locale coverage statistics.
#[derive(Debug, Clone)]
pub struct LocaleCoverage {
    pub locale: String,
    /// Default-locale keys this locale defines itself.
    pub present: usize,
    /// Default-locale keys this locale lacks (served by fallback).
    pub missing: Vec<String>,
    /// Keys this locale defines that the default locale does not.
    pub extra: Vec<String>,
    /// Keys whose placeholder names differ from the default template.
    pub placeholder_mismatches: Vec<String>,
    /// Coverage as a percentage (0.0–100.0).
    pub coverage_percent: f32,
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
