use lazyload_types::ImageInfo;
use lru::LruCache;
use std::{
    num::NonZeroUsize,
    sync::{Arc, Mutex},
};

/// Images the fetcher already holds, keyed by their path below the fetcher's
/// root. A hit lets a load complete synchronously.
#[derive(Clone)]
pub struct ResidentCache {
    images: Arc<Mutex<LruCache<String, ImageInfo>>>,
}

impl std::fmt::Debug for ResidentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResidentCache")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl ResidentCache {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            images: Arc::new(Mutex::new(LruCache::new(capacity_of(capacity)))),
        }
    }

    pub fn get(&self, key: &str) -> Option<ImageInfo> {
        self.images.lock().ok()?.get(key).copied()
    }

    pub fn insert(&self, key: String, info: ImageInfo) {
        if let Ok(mut cache) = self.images.lock() {
            cache.put(key, info);
        }
    }

    pub fn len(&self) -> usize {
        self.images.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn capacity_of(capacity: usize) -> NonZeroUsize {
    NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN)
}
