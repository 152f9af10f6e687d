//! Template lookup with default-locale fallback.
//!
//! 1. An unknown locale is replaced by the default locale.
//! 2. A key missing from the chosen locale is read from the default locale.
//! 3. A key missing from the default locale is [`LabelError::UnknownLabel`].
//!
//! Steps 1 and 2 are the normal path for partial translations and are
//! reported through [`Resolution::fallback`], never as errors.

use crate::error::{LabelError, LabelResult};
use crate::store::LabelStore;

/// Why a template came from the default locale instead of the requested one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// The requested locale is not registered.
    UnknownLocale,
    /// The requested locale exists but does not define the key.
    MissingKey,
}

/// A resolved template and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub template: &'a str,
    /// Locale that supplied the template.
    pub locale: &'a str,
    pub fallback: Option<Fallback>,
}

/// Stateless resolver over a borrowed store.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    store: &'a LabelStore,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a LabelStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &'a LabelStore {
        self.store
    }

    /// Resolve (`locale`, `key`) through the fallback chain.
    pub fn resolve(&self, locale: &str, key: &str) -> LabelResult<Resolution<'a>> {
        let store = self.store;
        let default = store.default_locale();

        let (locale, mut fallback) = match store.locale_tag(locale) {
            Some(tag) => (tag, None),
            None => (default, Some(Fallback::UnknownLocale)),
        };

        if let Some(template) = store.get(locale, key) {
            return Ok(Resolution {
                template,
                locale,
                fallback,
            });
        }

        if locale != default {
            fallback = Some(Fallback::MissingKey);
            if let Some(template) = store.get(default, key) {
                return Ok(Resolution {
                    template,
                    locale: default,
                    fallback,
                });
            }
        }

        Err(LabelError::UnknownLabel(key.to_string()))
    }

    /// Template text only.
    pub fn template(&self, locale: &str, key: &str) -> LabelResult<&'a str> {
        self.resolve(locale, key).map(|r| r.template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> LabelStore {
        let table = json!({
            "en": { "CONNECT": "Connect", "QUIT": "Quit" },
            "fr": { "CONNECT": "Connexion" }
        });
        LabelStore::load(&table, "en").unwrap()
    }

    #[test]
    fn direct_hit() {
        let store = store();
        let r = Resolver::new(&store).resolve("fr", "CONNECT").unwrap();
        assert_eq!(r.template, "Connexion");
        assert_eq!(r.locale, "fr");
        assert_eq!(r.fallback, None);
    }

    #[test]
    fn unknown_locale_uses_default() {
        let store = store();
        let r = Resolver::new(&store).resolve("de", "CONNECT").unwrap();
        assert_eq!(r.template, "Connect");
        assert_eq!(r.locale, "en");
        assert_eq!(r.fallback, Some(Fallback::UnknownLocale));
    }

    #[test]
    fn missing_key_uses_default() {
        let store = store();
        let resolver = Resolver::new(&store);
        let r = resolver.resolve("fr", "QUIT").unwrap();
        assert_eq!(r.template, "Quit");
        assert_eq!(r.locale, "en");
        assert_eq!(r.fallback, Some(Fallback::MissingKey));
        assert_eq!(
            resolver.template("fr", "QUIT").unwrap(),
            resolver.template("en", "QUIT").unwrap()
        );
    }

    #[test]
    fn unknown_key_is_an_error() {
        let store = store();
        let resolver = Resolver::new(&store);
        for locale in ["en", "fr", "de"] {
            match resolver.resolve(locale, "NOPE") {
                Err(LabelError::UnknownLabel(key)) => assert_eq!(key, "NOPE"),
                other => panic!("expected UnknownLabel, got {other:?}"),
            }
        }
    }

    #[test]
    fn key_only_in_translation_resolves_there() {
        let table = json!({
            "en": { "CONNECT": "Connect" },
            "fr": { "BETA": "Bêta" }
        });
        let store = LabelStore::load(&table, "en").unwrap();
        // Non-default locales may carry extra keys; they still resolve there.
        assert_eq!(Resolver::new(&store).template("fr", "BETA").unwrap(), "Bêta");
        assert!(Resolver::new(&store).resolve("en", "BETA").is_err());
    }
}
