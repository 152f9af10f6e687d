//! Error types for label loading, resolution and rendering.

use std::path::PathBuf;

/// Result type for all NxLabels operations
pub type LabelResult<T> = Result<T, LabelError>;

/// Errors raised by the label engine and its loaders.
///
/// Locale-not-found and key-missing-in-a-translation are not errors: they
/// resolve through the default locale. Unresolved placeholders are reported
/// as diagnostics and only become [`LabelError::UnresolvedPlaceholders`] in
/// strict mode.
#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    /// The table is not a locale → key → string mapping, or the default
    /// locale is missing. Fatal at load time.
    #[error("Malformed label table: {0}")]
    MalformedTable(String),

    /// The key is not registered in the default locale.
    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    #[error("Invalid date pattern {pattern:?} for {key} in locale {locale}")]
    InvalidDatePattern {
        key: String,
        locale: String,
        pattern: String,
    },

    #[error("Unresolved placeholders in {key}: {}", names.join(", "))]
    UnresolvedPlaceholders { key: String, names: Vec<String> },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LabelError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedTable(msg.into())
    }

    /// Whether the error indicates a caller/table contract violation rather
    /// than an environmental failure.
    pub fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownLabel(_) | Self::UnresolvedPlaceholders { .. }
        )
    }
}
