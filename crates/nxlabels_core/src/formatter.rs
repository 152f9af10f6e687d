//! Locale-aware date and relative-time rendering.
//!
//! Date patterns are ordinary labels (`DATE_FORMAT`, `DATETIME_FORMAT`)
//! holding strftime-style tokens, so field order and separators are locale
//! data. `%x`/`%X` expand to the preferred date (`%m/%d/%y`) and time
//! (`%H:%M:%S`) representations.
//!
//! Relative phrases use fixed buckets:
//!
//! | Seconds | Label | `interval` |
//! |---------|-------|------------|
//! | `< 60` (including negative) | `NOW` | none |
//! | `< 3600` | `MINS_AGO` | `s / 60` |
//! | otherwise | `HOURS_AGO` | `s / 3600` |
//!
//! The phrase is not pluralized: `1 minutes ago` is rendered as-is.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDateTime;

use crate::error::{LabelError, LabelResult};
use crate::interpolate::{interpolate, Interpolated};
use crate::resolver::Resolver;
use crate::store::LabelStore;

pub const DATE_FORMAT: &str = "DATE_FORMAT";
pub const DATETIME_FORMAT: &str = "DATETIME_FORMAT";
pub const NOW: &str = "NOW";
pub const MINS_AGO: &str = "MINS_AGO";
pub const HOURS_AGO: &str = "HOURS_AGO";

/// Placeholder receiving the bucketed count in relative-time labels.
pub const INTERVAL_VAR: &str = "interval";

const MINUTE: i64 = 60;
const HOUR: i64 = 3600;

/// Labels whose template is a date pattern rather than a sentence.
#[must_use]
pub fn is_date_pattern_key(key: &str) -> bool {
    matches!(key, DATE_FORMAT | DATETIME_FORMAT)
}

/// Labels produced by [`LocaleFormatter::format_relative`].
#[must_use]
pub fn is_relative_key(key: &str) -> bool {
    matches!(key, NOW | MINS_AGO | HOURS_AGO)
}

/// Bucket of an elapsed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeBucket {
    Now,
    Minutes(i64),
    Hours(i64),
}

impl RelativeBucket {
    #[must_use]
    pub fn from_seconds(seconds: i64) -> Self {
        if seconds < MINUTE {
            Self::Now
        } else if seconds < HOUR {
            Self::Minutes(seconds / MINUTE)
        } else {
            Self::Hours(seconds / HOUR)
        }
    }

    /// Label rendering this bucket.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Now => NOW,
            Self::Minutes(_) => MINS_AGO,
            Self::Hours(_) => HOURS_AGO,
        }
    }

    /// Value bound to `{{ interval }}`, if any.
    #[must_use]
    pub fn interval(&self) -> Option<i64> {
        match self {
            Self::Now => None,
            Self::Minutes(n) | Self::Hours(n) => Some(*n),
        }
    }
}

/// Expand a strftime-style pattern, or `None` if it has an unknown token or
/// cannot be rendered for a zone-less instant.
#[must_use]
pub fn expand_pattern(pattern: &str, instant: &NaiveDateTime) -> Option<String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return None;
    }
    let mut text = String::with_capacity(pattern.len() * 2);
    write!(text, "{}", instant.format_with_items(items.iter())).ok()?;
    Some(text)
}

/// Date and relative-time rendering over a borrowed store.
#[derive(Debug, Clone, Copy)]
pub struct LocaleFormatter<'a> {
    resolver: Resolver<'a>,
}

impl<'a> LocaleFormatter<'a> {
    pub fn new(store: &'a LabelStore) -> Self {
        Self {
            resolver: Resolver::new(store),
        }
    }

    /// Render `instant` with the pattern stored under `pattern_key`.
    ///
    /// A locale whose pattern has an unknown token is rendered with the
    /// default locale's pattern instead.
    pub fn format_date(
        &self,
        locale: &str,
        instant: &NaiveDateTime,
        pattern_key: &str,
    ) -> LabelResult<String> {
        let resolution = self.resolver.resolve(locale, pattern_key)?;
        if let Some(text) = expand_pattern(resolution.template, instant) {
            return Ok(text);
        }

        let default = self.resolver.store().default_locale();
        if resolution.locale != default {
            let pattern = self.resolver.template(default, pattern_key)?;
            if let Some(text) = expand_pattern(pattern, instant) {
                return Ok(text);
            }
        }

        Err(LabelError::InvalidDatePattern {
            key: pattern_key.to_string(),
            locale: resolution.locale.to_string(),
            pattern: resolution.template.to_string(),
        })
    }

    /// Render an elapsed interval as `NOW`, `MINS_AGO` or `HOURS_AGO`.
    pub fn format_relative(&self, locale: &str, interval_seconds: i64) -> LabelResult<Interpolated> {
        let bucket = RelativeBucket::from_seconds(interval_seconds);
        let template = self.resolver.template(locale, bucket.key())?;
        Ok(match bucket.interval() {
            Some(n) => {
                let n = n.to_string();
                interpolate(template, &[(INTERVAL_VAR, n.as_str())])
            }
            None => interpolate(template, &[] as &[(&str, &str)]),
        })
    }
}
