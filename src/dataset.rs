// Loaded dataset and its process-lifetime cache.
//
// The dataset is read once and shared immutably; every derived table is a
// fresh value computed from it. `DatasetCache::reload` is the only way to
// replace it.
use crate::error::Result;
use crate::loader::{load_prices, LoadReport};
use crate::types::PriceRecord;
use once_cell::sync::OnceCell;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Dataset {
    records: Arc<[PriceRecord]>,
}

impl Dataset {
    pub fn new(records: Vec<PriceRecord>) -> Self {
        Dataset {
            records: records.into(),
        }
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct product labels, sorted.
    pub fn products(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.product.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Distinct country codes, sorted.
    pub fn countries(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.country.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// Lazily loads the dataset from `path` on first use.
pub struct DatasetCache {
    path: PathBuf,
    loaded: OnceCell<(Dataset, LoadReport)>,
}

impl DatasetCache {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        DatasetCache {
            path: path.as_ref().to_path_buf(),
            loaded: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    /// The cached dataset, loading it on the first call. A failed load
    /// leaves the cache empty so the next call retries.
    pub fn get_or_load(&self) -> Result<&(Dataset, LoadReport)> {
        self.loaded.get_or_try_init(|| load_prices(&self.path))
    }

    /// Drop the cached dataset and load it again.
    pub fn reload(&mut self) -> Result<&(Dataset, LoadReport)> {
        self.loaded.take();
        self.get_or_load()
    }
}
