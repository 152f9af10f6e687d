//! The caller-facing Facade: resolve a label, localize temporal bindings,
//! interpolate.
//!
//! [`Translator`] owns a shared snapshot of the store and takes the locale as
//! an explicit argument on every call. Callers that want a "current
//! language" keep a [`LocaleScope`] of their own instead of a process-wide
//! setting, so several locales can be rendered side by side.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::bindings::{Bindings, Value};
use crate::error::{LabelError, LabelResult};
use crate::formatter::{
    is_date_pattern_key, is_relative_key, LocaleFormatter, RelativeBucket, DATETIME_FORMAT,
    INTERVAL_VAR,
};
use crate::interpolate::{interpolate, placeholder_names, Interpolated, VarSource};
use crate::resolver::{Fallback, Resolution, Resolver};
use crate::store::{LabelStore, Locale};

/// Binding holding the instant for date-pattern labels.
pub const DATE_VAR: &str = "date";

/// Output of [`Translator::translate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    /// Placeholders left unresolved, in order of first appearance.
    pub missing: Vec<String>,
    pub key: String,
    /// Locale that supplied the template.
    pub locale: String,
    pub fallback: Option<Fallback>,
}

impl Translation {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// The text, or [`LabelError::UnresolvedPlaceholders`] if anything is
    /// unbound. For development and test callers.
    pub fn strict(self) -> LabelResult<String> {
        if self.missing.is_empty() {
            Ok(self.text)
        } else {
            Err(LabelError::UnresolvedPlaceholders {
                key: self.key,
                names: self.missing,
            })
        }
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Facade over one immutable [`LabelStore`] snapshot.
///
/// Cloning is cheap; all clones share the same store.
#[derive(Debug, Clone)]
pub struct Translator {
    store: Arc<LabelStore>,
    strict: bool,
}

impl Translator {
    pub fn new(store: Arc<LabelStore>) -> Self {
        Self {
            store,
            strict: false,
        }
    }

    /// Treat unresolved placeholders as errors.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn store(&self) -> &LabelStore {
        &self.store
    }

    pub fn default_locale(&self) -> &str {
        self.store.default_locale()
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.store)
    }

    pub fn formatter(&self) -> LocaleFormatter<'_> {
        LocaleFormatter::new(&self.store)
    }

    /// Render `key` for `locale`.
    ///
    /// * Date-pattern keys (`DATE_FORMAT`, `DATETIME_FORMAT`) render the
    ///   [`Value::Instant`] bound to `date`; without one the raw pattern is
    ///   returned and `date` is reported missing.
    /// * Relative-time keys (`NOW`, `MINS_AGO`, `HOURS_AGO`) with a
    ///   [`Value::Interval`] bound to `interval` render the bucket the
    ///   interval falls in. `locale` and `fallback` describe that bucket's
    ///   label.
    /// * Any other template has its `Instant`/`Interval` bindings rendered
    ///   through `DATETIME_FORMAT` and the relative-time labels before
    ///   substitution.
    pub fn translate(
        &self,
        locale: &str,
        key: &str,
        bindings: &Bindings,
    ) -> LabelResult<Translation> {
        let relative = match bindings.get(INTERVAL_VAR) {
            Some(Value::Interval(seconds)) if is_relative_key(key) => Some(*seconds),
            _ => None,
        };

        // The bucket label is what gets rendered, so diagnostics follow it.
        let rendered_key = match relative {
            Some(seconds) => RelativeBucket::from_seconds(seconds).key(),
            None => key,
        };
        let resolution = self.resolver().resolve(locale, rendered_key)?;
        trace_fallback(locale, rendered_key, &resolution);

        let rendered = if let Some(seconds) = relative {
            self.formatter().format_relative(locale, seconds)?
        } else if is_date_pattern_key(key) {
            match bindings.get(DATE_VAR) {
                Some(Value::Instant(instant)) => Interpolated {
                    text: self.formatter().format_date(locale, instant, key)?,
                    missing: Vec::new(),
                },
                // The pattern is kept, but the unbound instant is reported.
                _ => Interpolated {
                    text: resolution.template.to_string(),
                    missing: vec![DATE_VAR.to_string()],
                },
            }
        } else {
            self.render_template(locale, resolution.template, bindings)?
        };

        let translation = Translation {
            text: rendered.text,
            missing: rendered.missing,
            key: key.to_string(),
            locale: resolution.locale.to_string(),
            fallback: resolution.fallback,
        };

        if self.strict && !translation.is_complete() {
            return Err(LabelError::UnresolvedPlaceholders {
                key: translation.key,
                names: translation.missing,
            });
        }
        Ok(translation)
    }

    /// Render a label that takes no bindings.
    pub fn text(&self, locale: &str, key: &str) -> LabelResult<String> {
        self.translate(locale, key, &Bindings::new()).map(|t| t.text)
    }

    pub fn format_date(
        &self,
        locale: &str,
        instant: &NaiveDateTime,
        pattern_key: &str,
    ) -> LabelResult<String> {
        self.formatter().format_date(locale, instant, pattern_key)
    }

    pub fn format_relative(&self, locale: &str, interval_seconds: i64) -> LabelResult<Interpolated> {
        self.formatter().format_relative(locale, interval_seconds)
    }

    /// A caller-owned "current locale" bound to this translator.
    pub fn scope(&self, locale: impl Into<Locale>) -> LocaleScope {
        LocaleScope::new(self.clone(), locale)
    }

    fn render_template(
        &self,
        locale: &str,
        template: &str,
        bindings: &Bindings,
    ) -> LabelResult<Interpolated> {
        if !bindings.iter().any(|(_, value)| value.is_temporal()) {
            return Ok(interpolate(template, bindings));
        }

        // Only referenced values are formatted, so an unused instant can't
        // fail the render.
        let formatter = self.formatter();
        let mut localized = HashMap::new();
        for name in placeholder_names(template) {
            let text = match bindings.get(&name) {
                Some(Value::Instant(instant)) => {
                    formatter.format_date(locale, instant, DATETIME_FORMAT)?
                }
                Some(Value::Interval(seconds)) => formatter.format_relative(locale, *seconds)?.text,
                _ => continue,
            };
            localized.insert(name, text);
        }

        Ok(interpolate(
            template,
            &Layered {
                top: &localized,
                base: bindings,
            },
        ))
    }
}

/// Pre-rendered values shadowing the caller's bindings.
struct Layered<'a> {
    top: &'a HashMap<String, String>,
    base: &'a Bindings,
}

impl VarSource for Layered<'_> {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.top.lookup(name).or_else(|| self.base.lookup(name))
    }
}

fn trace_fallback(requested: &str, key: &str, resolution: &Resolution<'_>) {
    match resolution.fallback {
        Some(Fallback::UnknownLocale) => {
            nxl_log_debug!(requested, key, used = resolution.locale, "unknown locale, using default");
        }
        Some(Fallback::MissingKey) => {
            nxl_log_debug!(requested, key, used = resolution.locale, "label not translated, using default");
        }
        None => {}
    }
}

/// A translator paired with the locale its owner is currently using.
#[derive(Debug, Clone)]
pub struct LocaleScope {
    translator: Translator,
    locale: Locale,
}

impl LocaleScope {
    pub fn new(translator: Translator, locale: impl Into<Locale>) -> Self {
        Self {
            translator,
            locale: locale.into(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Switch the language for subsequent calls on this scope only.
    pub fn set_locale(&mut self, locale: impl Into<Locale>) {
        self.locale = locale.into();
    }

    /// Whether the store has the scope's locale (otherwise every call
    /// renders the default locale).
    pub fn is_supported(&self) -> bool {
        self.translator.store().has_locale(&self.locale)
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn translate(&self, key: &str, bindings: &Bindings) -> LabelResult<Translation> {
        self.translator.translate(&self.locale, key, bindings)
    }

    pub fn text(&self, key: &str) -> LabelResult<String> {
        self.translator.text(&self.locale, key)
    }

    pub fn format_date(&self, instant: &NaiveDateTime, pattern_key: &str) -> LabelResult<String> {
        self.translator.format_date(&self.locale, instant, pattern_key)
    }

    pub fn format_relative(&self, interval_seconds: i64) -> LabelResult<Interpolated> {
        self.translator.format_relative(&self.locale, interval_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn translator() -> Translator {
        let table = json!({
            "en": {
                "CONNECT": "Connect",
                "QUIT": "Quit",
                "CONFLICTS_SYSTRAY": "{{ conflicted_files }} conflicts",
                "UPDATING_VERSION": "Updating to {{ version }}",
                "LAST_SYNCHRONIZED": "Last synchronization: {{ date }}",
                "NOW": "Now",
                "MINS_AGO": "{{interval}} minutes ago",
                "HOURS_AGO": "{{interval}} hours ago",
                "DATE_FORMAT": "%x",
                "DATETIME_FORMAT": "%x %X"
            },
            "fr": {
                "CONNECT": "Connexion",
                "CONFLICTS_SYSTRAY": "{{ conflicted_files }} conflits",
                "LAST_SYNCHRONIZED": "Dernière synchronisation: {{ date }}",
                "MINS_AGO": "{{interval}} minutes",
                "DATETIME_FORMAT": "%d/%m/%Y %H:%M"
            }
        });
        Translator::new(Arc::new(LabelStore::load(&table, "en").unwrap()))
    }

    fn instant() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2016, 3, 4)
            .and_then(|d| d.and_hms_opt(17, 5, 9))
            .unwrap()
    }

    #[test]
    fn counts_are_substituted() {
        let t = translator();
        let bindings = Bindings::new().with("conflicted_files", 3);
        let out = t.translate("en", "CONFLICTS_SYSTRAY", &bindings).unwrap();
        assert_eq!(out.text, "3 conflicts");
        assert!(out.is_complete());
        assert_eq!(out.locale, "en");
        assert_eq!(out.fallback, None);
        assert_eq!(
            t.translate("fr", "CONFLICTS_SYSTRAY", &bindings).unwrap().text,
            "3 conflits"
        );
    }

    #[test]
    fn missing_placeholder_is_reported() {
        let out = translator()
            .translate("en", "UPDATING_VERSION", &Bindings::new())
            .unwrap();
        assert!(out.text.contains("{{ version }}"));
        assert_eq!(out.missing, vec!["version"]);
        assert!(matches!(
            out.strict(),
            Err(LabelError::UnresolvedPlaceholders { key, .. }) if key == "UPDATING_VERSION"
        ));
    }

    #[test]
    fn strict_translator_rejects_partial_text() {
        let t = translator().with_strict(true);
        assert!(t.is_strict());
        assert!(t.translate("en", "UPDATING_VERSION", &Bindings::new()).is_err());
        assert_eq!(t.text("en", "QUIT").unwrap(), "Quit");
    }

    #[test]
    fn unknown_locale_falls_back() {
        let out = translator()
            .translate("de", "CONNECT", &Bindings::new())
            .unwrap();
        assert_eq!(out.text, "Connect");
        assert_eq!(out.fallback, Some(Fallback::UnknownLocale));
    }

    #[test]
    fn untranslated_key_falls_back() {
        let out = translator().translate("fr", "QUIT", &Bindings::new()).unwrap();
        assert_eq!(out.text, "Quit");
        assert_eq!(out.locale, "en");
        assert_eq!(out.fallback, Some(Fallback::MissingKey));
    }

    #[test]
    fn unknown_key_is_surfaced() {
        let err = translator()
            .translate("en", "NOT_A_LABEL", &Bindings::new())
            .unwrap_err();
        assert!(matches!(err, LabelError::UnknownLabel(ref k) if k == "NOT_A_LABEL"));
        assert!(err.is_programmer_error());
    }

    #[test]
    fn date_pattern_keys_render_the_bound_instant() {
        let t = translator();
        let bindings = Bindings::new().with(DATE_VAR, instant());
        assert_eq!(
            t.translate("fr", "DATETIME_FORMAT", &bindings).unwrap().text,
            "04/03/2016 17:05"
        );
        assert_eq!(
            t.translate("en", "DATE_FORMAT", &bindings).unwrap().text,
            "03/04/16"
        );
        // Without an instant the pattern itself comes back.
        assert_eq!(t.text("fr", "DATETIME_FORMAT").unwrap(), "%d/%m/%Y %H:%M");
    }

    #[test]
    fn date_pattern_without_instant_reports_date() {
        let t = translator();
        let out = t.translate("en", "DATETIME_FORMAT", &Bindings::new()).unwrap();
        assert_eq!(out.text, "%x %X");
        assert_eq!(out.missing, vec![DATE_VAR]);

        // A binding of the wrong kind is no better than none.
        let bindings = Bindings::new().with(DATE_VAR, "yesterday");
        let out = t.translate("fr", "DATETIME_FORMAT", &bindings).unwrap();
        assert_eq!(out.text, "%d/%m/%Y %H:%M");
        assert!(!out.is_complete());

        let strict = t.with_strict(true);
        for bindings in [Bindings::new(), bindings] {
            match strict.translate("en", "DATE_FORMAT", &bindings) {
                Err(LabelError::UnresolvedPlaceholders { key, names }) => {
                    assert_eq!(key, "DATE_FORMAT");
                    assert_eq!(names, vec![DATE_VAR]);
                }
                other => panic!("expected UnresolvedPlaceholders, got {other:?}"),
            }
        }
    }

    #[test]
    fn relative_diagnostics_describe_the_rendered_bucket() {
        let table = json!({
            "en": {
                "NOW": "Now",
                "MINS_AGO": "{{interval}} minutes ago",
                "HOURS_AGO": "{{interval}} hours ago"
            },
            "fr": { "MINS_AGO": "{{interval}} minutes" }
        });
        let t = Translator::new(Arc::new(LabelStore::load(&table, "en").unwrap()));

        let minutes = Bindings::new().with(INTERVAL_VAR, Value::interval(300));
        let out = t.translate("fr", "NOW", &minutes).unwrap();
        assert_eq!(out.text, "5 minutes");
        assert_eq!(out.key, "NOW");
        assert_eq!(out.locale, "fr");
        assert_eq!(out.fallback, None);

        let hours = Bindings::new().with(INTERVAL_VAR, Value::interval(7200));
        let out = t.translate("fr", "MINS_AGO", &hours).unwrap();
        assert_eq!(out.text, "2 hours ago");
        assert_eq!(out.locale, "en");
        assert_eq!(out.fallback, Some(Fallback::MissingKey));
    }

    #[test]
    fn relative_keys_render_the_bucket() {
        let t = translator();
        let bindings = Bindings::new().with(INTERVAL_VAR, Value::interval(7200));
        assert_eq!(
            t.translate("en", "MINS_AGO", &bindings).unwrap().text,
            "2 hours ago"
        );
        let bindings = Bindings::new().with(INTERVAL_VAR, Value::interval(300));
        assert_eq!(t.translate("fr", "NOW", &bindings).unwrap().text, "5 minutes");

        // A plain count is substituted as-is.
        let bindings = Bindings::new().with(INTERVAL_VAR, 4);
        assert_eq!(
            t.translate("en", "HOURS_AGO", &bindings).unwrap().text,
            "4 hours ago"
        );
    }

    #[test]
    fn temporal_bindings_are_localized() {
        let t = translator();
        let bindings = Bindings::new().with(DATE_VAR, instant());
        assert_eq!(
            t.translate("en", "LAST_SYNCHRONIZED", &bindings).unwrap().text,
            "Last synchronization: 03/04/16 17:05:09"
        );
        assert_eq!(
            t.translate("fr", "LAST_SYNCHRONIZED", &bindings).unwrap().text,
            "Dernière synchronisation: 04/03/2016 17:05"
        );

        let bindings = Bindings::new().with(DATE_VAR, Value::interval(120));
        assert_eq!(
            t.translate("en", "LAST_SYNCHRONIZED", &bindings).unwrap().text,
            "Last synchronization: 2 minutes ago"
        );
    }

    #[test]
    fn unreferenced_temporal_binding_is_ignored() {
        let table = json!({ "en": { "GREETING": "Hello {{ name }}" } });
        let t = Translator::new(Arc::new(LabelStore::load(&table, "en").unwrap()));
        // No DATETIME_FORMAT label exists, but `when` is never referenced.
        let bindings = Bindings::new().with("name", "Ann").with("when", instant());
        assert_eq!(t.translate("en", "GREETING", &bindings).unwrap().text, "Hello Ann");
    }

    #[test]
    fn scopes_are_independent() {
        let t = translator();
        let mut scope = t.scope("fr");
        let other = t.scope("en");
        assert_eq!(scope.text("CONNECT").unwrap(), "Connexion");
        assert_eq!(other.text("CONNECT").unwrap(), "Connect");

        scope.set_locale("de");
        assert_eq!(scope.locale(), "de");
        assert!(!scope.is_supported());
        assert_eq!(scope.text("CONNECT").unwrap(), "Connect");
        assert_eq!(scope.format_relative(30).unwrap().text, "Now");
        assert_eq!(scope.format_date(&instant(), "DATE_FORMAT").unwrap(), "03/04/16");
        assert_eq!(other.translator().default_locale(), "en");
    }

    #[test]
    fn translation_displays_its_text() {
        let out = translator().translate("en", "QUIT", &Bindings::new()).unwrap();
        assert_eq!(out.to_string(), "Quit");
    }

    #[cfg(not(feature = "minimal-logging"))]
    #[tracing_test::traced_test]
    #[test]
    fn fallback_is_traced_at_debug() {
        translator().text("de", "CONNECT").unwrap();
        assert!(logs_contain("unknown locale, using default"));
        translator().text("fr", "QUIT").unwrap();
        assert!(logs_contain("label not translated, using default"));
    }
}
