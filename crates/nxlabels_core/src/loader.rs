//! Reading label tables from disk.
//!
//! Three on-disk shapes are accepted, all describing the same
//! locale → key → template table:
//!
//! * `.json`: a plain two-level object.
//! * `.js`: the UI bundle form `LABELS={...}`, optionally declared with
//!   `var`/`let`/`const` and terminated with `;`.
//! * `.toml`: one table per locale.
//!
//! Files with any other extension are tried as JSON first, then as a bundle.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{LabelError, LabelResult};
use crate::store::LabelStore;

/// The Drive desktop label table, compiled in.
const DRIVE_LABELS: &str = include_str!("../assets/labels/drive.js");

/// Default locale of the bundled table.
pub const BUNDLED_DEFAULT_LOCALE: &str = "en";

/// Variable name a JS bundle assigns the table to.
const BUNDLE_VAR: &str = "LABELS";

/// Serialization of a table file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Json,
    JsBundle,
    Toml,
}

impl TableFormat {
    /// Format implied by the file extension, if it is a known one.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "js" => Some(Self::JsBundle),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Parse table text. `None` tries JSON, then the JS bundle form.
pub fn parse_table(text: &str, format: Option<TableFormat>) -> LabelResult<Value> {
    match format {
        Some(TableFormat::Json) => parse_json(text),
        Some(TableFormat::JsBundle) => parse_js_bundle(text),
        Some(TableFormat::Toml) => parse_toml(text),
        None => parse_json(text).or_else(|_| {
            parse_js_bundle(text).map_err(|_| {
                LabelError::malformed("content is neither a JSON object nor a LABELS bundle")
            })
        }),
    }
}

/// Parse `LABELS = {...};` into its JSON object.
pub fn parse_js_bundle(text: &str) -> LabelResult<Value> {
    let mut rest = text.trim_start_matches('\u{feff}').trim();
    for keyword in ["var", "let", "const"] {
        if let Some(after) = rest.strip_prefix(keyword) {
            if after.starts_with(char::is_whitespace) {
                rest = after.trim_start();
                break;
            }
        }
    }

    let rest = rest
        .strip_prefix(BUNDLE_VAR)
        .map(str::trim_start)
        .and_then(|r| r.strip_prefix('='))
        .ok_or_else(|| LabelError::malformed(format!("expected `{BUNDLE_VAR} = {{...}}`")))?;

    let body = rest.trim().trim_end_matches(';').trim_end();
    serde_json::from_str(body)
        .map_err(|e| LabelError::malformed(format!("invalid {BUNDLE_VAR} bundle: {e}")))
}

fn parse_json(text: &str) -> LabelResult<Value> {
    serde_json::from_str(text.trim_start_matches('\u{feff}'))
        .map_err(|e| LabelError::malformed(format!("invalid JSON: {e}")))
}

fn parse_toml(text: &str) -> LabelResult<Value> {
    toml::from_str(text).map_err(|e| LabelError::malformed(format!("invalid TOML: {e}")))
}

/// Read and parse a table file without validating its shape.
pub fn load_table(path: impl AsRef<Path>) -> LabelResult<Value> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LabelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_table(&text, TableFormat::from_path(path))
}

/// Read a table file and build a validated store from it.
pub fn load_store(path: impl AsRef<Path>, default_locale: &str) -> LabelResult<LabelStore> {
    let path = path.as_ref();
    let table = load_table(path)?;
    let store = LabelStore::load(&table, default_locale)?;
    nxl_log_info!(
        path = %path.display(),
        locales = store.locales().len(),
        default_locale,
        "label table loaded"
    );
    Ok(store)
}

/// The compiled-in table as untyped JSON.
pub fn bundled_table() -> LabelResult<Value> {
    parse_js_bundle(DRIVE_LABELS)
}

pub(crate) fn bundled() -> LabelResult<LabelStore> {
    LabelStore::load(&bundled_table()?, BUNDLED_DEFAULT_LOCALE)
}
