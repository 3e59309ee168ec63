//! In-process classification cache.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{CacheKey, ClassificationResult, Video};
use crate::error::Result;
use crate::port::outbound::cache::ClassificationCache;

/// A [`ClassificationCache`] backed by a `HashMap`, insert-if-absent.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, ClassificationResult>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait]
impl ClassificationCache for MemoryCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<ClassificationResult>> {
        Ok(self.entries.lock().get(key.as_str()).cloned())
    }

    async fn put(&self, key: &CacheKey, _video: &Video, result: &ClassificationResult) -> Result<bool> {
        let mut entries = self.entries.lock();
        if entries.contains_key(key.as_str()) {
            return Ok(false);
        }
        entries.insert(key.as_str().to_string(), result.clone());
        Ok(true)
    }
}
