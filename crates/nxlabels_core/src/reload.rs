//! Swapping label tables in a running process.
//!
//! Stores are immutable, so re-localizing means publishing a new one.
//! Readers take a snapshot with [`LabelHandle::current`] (wait-free) and
//! keep rendering from it even if a newer table lands mid-render.

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::error::LabelResult;
use crate::loader;
use crate::store::LabelStore;
use crate::translate::Translator;

/// Shared, atomically replaceable label store.
#[derive(Debug)]
pub struct LabelHandle {
    inner: ArcSwap<LabelStore>,
}

impl LabelHandle {
    pub fn new(store: LabelStore) -> Self {
        Self {
            inner: ArcSwap::from_pointee(store),
        }
    }

    /// Snapshot of the store in effect now.
    pub fn current(&self) -> Arc<LabelStore> {
        self.inner.load_full()
    }

    /// Publish `store`, returning the one it replaces.
    pub fn replace(&self, store: LabelStore) -> Arc<LabelStore> {
        let previous = self.inner.swap(Arc::new(store));
        nxl_log_info!(
            locales = self.inner.load().locales().len(),
            "label table replaced"
        );
        previous
    }

    /// Load `path` with the current default locale and publish it.
    ///
    /// On failure the current store stays in place.
    pub fn reload_from(&self, path: impl AsRef<Path>) -> LabelResult<()> {
        let path = path.as_ref();
        let default_locale = self.inner.load().default_locale().to_string();
        match loader::load_store(path, &default_locale) {
            Ok(store) => {
                self.replace(store);
                Ok(())
            }
            Err(err) => {
                nxl_log_warn!(path = %path.display(), error = %err, "label reload failed, keeping current table");
                Err(err)
            }
        }
    }

    /// Translator bound to the current snapshot.
    pub fn translator(&self) -> Translator {
        Translator::new(self.current())
    }
}

impl From<LabelStore> for LabelHandle {
    fn from(store: LabelStore) -> Self {
        Self::new(store)
    }
}
