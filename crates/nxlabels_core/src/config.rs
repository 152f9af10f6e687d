//! Configuration for embedding applications and the `nxlabels` CLI.
//!
//! ```toml
//! default_locale = "en"
//! table = "assets/i18n.js"
//! locale = "fr"
//! strict_placeholders = false
//!
//! [logging]
//! level = "info"
//! format = "compact"
//! ```
//!
//! Every field is optional. `NXLABELS_TABLE`, `NXLABELS_LOCALE`,
//! `NXLABELS_STRICT` and `NXLABELS_LOG` override the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{LabelError, LabelResult};
use crate::loader;
use crate::locale::{detect_system_locale, negotiate};
use crate::store::LabelStore;
use crate::translate::Translator;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelsConfig {
    pub default_locale: String,
    /// Table file; the bundled table when unset.
    pub table: Option<PathBuf>,
    /// Requested locale; detected from the environment when unset.
    pub locale: Option<String>,
    pub strict_placeholders: bool,
    pub logging: LoggingConfig,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            table: None,
            locale: None,
            strict_placeholders: false,
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `nxlabels_core=debug`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Json,
}

impl LabelsConfig {
    pub fn from_toml_str(text: &str) -> LabelResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> LabelResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LabelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply `NXLABELS_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> LabelResult<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply `NXLABELS_*` overrides from `lookup`. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> LabelResult<()> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(table) = get("NXLABELS_TABLE") {
            self.table = Some(PathBuf::from(table));
        }
        if let Some(locale) = get("NXLABELS_LOCALE") {
            self.locale = Some(locale);
        }
        if let Some(strict) = get("NXLABELS_STRICT") {
            self.strict_placeholders = parse_flag(&strict).ok_or_else(|| {
                LabelError::Config(format!("NXLABELS_STRICT must be a boolean, got {strict:?}"))
            })?;
        }
        if let Some(level) = get("NXLABELS_LOG") {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Build the configured store: the `table` file, or the bundled table.
    pub fn load_store(&self) -> LabelResult<LabelStore> {
        match &self.table {
            Some(path) => loader::load_store(path, &self.default_locale),
            None => LabelStore::load(&loader::bundled_table()?, &self.default_locale),
        }
    }

    /// Facade over [`Self::load_store`] honoring `strict_placeholders`.
    pub fn translator(&self) -> LabelResult<Translator> {
        Ok(Translator::new(Arc::new(self.load_store()?)).with_strict(self.strict_placeholders))
    }

    /// The configured or detected locale, negotiated against `store`.
    pub fn effective_locale(&self, store: &LabelStore) -> String {
        let requested = self.locale.clone().or_else(detect_system_locale);
        match requested {
            Some(requested) => negotiate(store, &requested).to_string(),
            None => store.default_locale().to_string(),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
