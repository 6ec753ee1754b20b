use crate::catalog::intensity::IntensityLookup;
use crate::catalog::{Catalog, IntensityCatalog};
use crate::errors::CatalogError;
use crate::notes::Note;
use arc_swap::ArcSwapOption;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// A catalog read lazily from a YAML file and cached for the lifetime of the store.
///
/// Only successful loads are cached, so a lookup after a failed load retries the file.
#[derive(Debug)]
pub struct CatalogStore {
    path: PathBuf,
    cached: ArcSwapOption<Catalog>,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: ArcSwapOption::empty(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The parsed catalog, loading it from file on first use.
    pub fn catalog(&self) -> Result<Arc<Catalog>, CatalogError> {
        if let Some(catalog) = self.cached.load_full() {
            return Ok(catalog);
        }

        let catalog = Arc::new(Catalog::load(&self.path)?);
        info!(
            path = %self.path.display(),
            uses = catalog.uses().count(),
            "loaded standard intensity catalog"
        );
        self.cached.store(Some(catalog.clone()));

        Ok(catalog)
    }

    pub fn is_loaded(&self) -> bool {
        self.cached.load().is_some()
    }
}

impl IntensityCatalog for CatalogStore {
    fn lookup(&self, building_use: &str, zone: &str) -> IntensityLookup {
        match self.catalog() {
            Ok(catalog) => catalog.lookup(building_use, zone),
            Err(err) => {
                warn!(path = %self.path.display(), "{err}");
                IntensityLookup::Missing(Note::catalog_unavailable(&err.to_string()))
            }
        }
    }
}
