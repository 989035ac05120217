//! # Custom Price State

use std::sync::{Arc, Mutex, MutexGuard};

use paozinho_core::{CustomPrice, CustomPriceIndex};

/// Thread-safe cache of the custom prices fetched from the API.
#[derive(Debug, Clone, Default)]
pub struct PriceIndexState {
    index: Arc<Mutex<CustomPriceIndex>>,
}

impl PriceIndexState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CustomPriceIndex> {
        self.index.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replaces the cache with a fresh fetch.
    pub fn replace(&self, entries: Vec<CustomPrice>) {
        *self.lock() = CustomPriceIndex::from_entries(entries);
    }

    pub fn with_index<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CustomPriceIndex) -> R,
    {
        f(&self.lock())
    }

    pub fn with_index_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CustomPriceIndex) -> R,
    {
        f(&mut self.lock())
    }
}
