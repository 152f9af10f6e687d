//! NxLabels core: localized UI labels with default-locale fallback,
//! `{{ name }}` interpolation and locale-aware date/relative-time rendering.
//!
//! ```no_run
//! use std::sync::Arc;
//! use nxlabels_core::{Bindings, LabelStore, Translator};
//!
//! let translator = Translator::new(Arc::new(LabelStore::bundled()?));
//! let text = translator.translate(
//!     "fr",
//!     "CONFLICTS_SYSTRAY",
//!     &Bindings::new().with("conflicted_files", 3),
//! )?;
//! println!("{text}");
//! # Ok::<(), nxlabels_core::LabelError>(())
//! ```

#[doc(hidden)]
pub use tracing as __tracing;

// Logging facade macros: call sites stay, formatting is stripped in minimal builds
#[cfg(feature = "minimal-logging")]
#[macro_export]
macro_rules! nxl_log_debug { ($($tt:tt)*) => { /* stripped in minimal build */ }; }
#[cfg(not(feature = "minimal-logging"))]
#[macro_export]
macro_rules! nxl_log_debug { ($($tt:tt)*) => { $crate::__tracing::debug!($($tt)*); }; }

#[cfg(feature = "minimal-logging")]
#[macro_export]
macro_rules! nxl_log_info { ($($tt:tt)*) => { /* stripped */ }; }
#[cfg(not(feature = "minimal-logging"))]
#[macro_export]
macro_rules! nxl_log_info { ($($tt:tt)*) => { $crate::__tracing::info!($($tt)*); }; }

#[cfg(feature = "minimal-logging")]
#[macro_export]
macro_rules! nxl_log_warn { ($($tt:tt)*) => { /* stripped */ }; }
#[cfg(not(feature = "minimal-logging"))]
#[macro_export]
macro_rules! nxl_log_warn { ($($tt:tt)*) => { $crate::__tracing::warn!($($tt)*); }; }

#[cfg(feature = "minimal-logging")]
#[macro_export]
macro_rules! nxl_log_error { ($($tt:tt)*) => { /* stripped */ }; }
#[cfg(not(feature = "minimal-logging"))]
#[macro_export]
macro_rules! nxl_log_error { ($($tt:tt)*) => { $crate::__tracing::error!($($tt)*); }; }

pub mod bindings;
pub mod config;
pub mod error;
pub mod formatter;
pub mod interpolate;
pub mod loader;
pub mod locale;
#[cfg(feature = "logging")]
pub mod logging;
pub mod reload;
pub mod resolver;
pub mod store;
pub mod translate;

pub use bindings::{Bindings, Value};
pub use config::{LabelsConfig, LogFormat, LoggingConfig};
pub use error::{LabelError, LabelResult};
pub use formatter::{LocaleFormatter, RelativeBucket};
pub use interpolate::{interpolate, placeholder_names, Interpolated, VarSource};
pub use loader::{load_store, TableFormat};
pub use locale::{detect_system_locale, negotiate, normalize_locale};
pub use reload::LabelHandle;
pub use resolver::{Fallback, Resolution, Resolver};
pub use store::{CoverageReport, LabelStore, Locale, LocaleCoverage, LocaleLabels};
pub use translate::{LocaleScope, Translation, Translator};
