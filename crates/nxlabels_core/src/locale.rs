//! Picking a locale for the user.
//!
//! These helpers run before translation. The resolver itself never guesses:
//! a locale it does not know goes straight to the default locale, so
//! `fr-FR` must be negotiated down to `fr` here first.

use crate::store::LabelStore;

/// Environment variables consulted by [`detect_system_locale`], in order.
pub const LOCALE_ENV_VARS: [&str; 4] = ["NXLABELS_LOCALE", "LC_ALL", "LC_MESSAGES", "LANG"];

/// The user's locale from the environment, normalized.
pub fn detect_system_locale() -> Option<String> {
    detect_with(|name| std::env::var(name).ok())
}

/// [`detect_system_locale`] over an arbitrary variable source.
///
/// Empty values and the `C`/`POSIX` locales are skipped.
pub fn detect_with(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    LOCALE_ENV_VARS.iter().find_map(|var| {
        let raw = lookup(var)?;
        let tag = normalize_locale(&raw);
        match tag.as_str() {
            "" | "C" | "POSIX" => None,
            _ => Some(tag),
        }
    })
}

/// Turn POSIX-style tags into `lang-REGION`.
///
/// `fr_FR.UTF-8@euro` becomes `fr-FR`, `EN` becomes `en`.
#[must_use]
pub fn normalize_locale(raw: &str) -> String {
    let base = raw
        .trim()
        .split(['.', '@'])
        .next()
        .unwrap_or_default();
    if base.eq_ignore_ascii_case("C") || base.eq_ignore_ascii_case("POSIX") {
        return base.to_ascii_uppercase();
    }

    let mut parts = base.split(['_', '-']).filter(|p| !p.is_empty());
    let Some(language) = parts.next() else {
        return String::new();
    };
    let mut tag = language.to_ascii_lowercase();
    if let Some(region) = parts.next() {
        tag.push('-');
        tag.push_str(&region.to_ascii_uppercase());
    }
    tag
}

/// Best registered locale for `requested`: an exact match, then its bare
/// language, then the store's default.
pub fn negotiate<'a>(store: &'a LabelStore, requested: &str) -> &'a str {
    if let Some(tag) = store.locale_tag(requested) {
        return tag;
    }
    let normalized = normalize_locale(requested);
    if let Some(tag) = store.locale_tag(&normalized) {
        return tag;
    }
    let language = normalized.split('-').next().unwrap_or_default();
    store
        .locale_tag(language)
        .unwrap_or_else(|| store.default_locale())
}
