use crate::cache::ResidentCache;
use image::ImageReader;
use lazyload_core::{Fetch, FetchError, FetchResult, ImageFetcher};
use lazyload_types::ImageInfo;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Fetches images from files below a root directory.
///
/// A fetch reads the image header on the rayon pool to confirm the file is an
/// image and learn its size; pixels are never decoded. Sources fetched
/// successfully stay resident in an LRU cache and load synchronously next
/// time.
#[derive(Debug, Clone)]
pub struct DiskFetcher {
    root: PathBuf,
    cache: ResidentCache,
}

impl DiskFetcher {
    pub fn new(root: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            root: root.into(),
            cache: ResidentCache::new(capacity),
        }
    }

    pub fn cache(&self) -> &ResidentCache {
        &self.cache
    }

    /// Normalizes a source to a `/`-separated path relative to the root. A
    /// leading `/` means the root itself and `.` segments are dropped, so
    /// `/a.png`, `a.png` and `./a.png` share one key. Sources that climb out of
    /// the root are rejected.
    pub fn key(&self, src: &str) -> FetchResult<String> {
        let trimmed = src.trim();
        if trimmed.is_empty() {
            return Err(FetchError::EmptySource);
        }

        let mut segments = Vec::new();
        for component in Path::new(trimmed.trim_start_matches('/')).components() {
            match component {
                Component::Normal(segment) => segments.push(segment.to_string_lossy()),
                Component::CurDir => {}
                _ => return Err(FetchError::OutsideRoot(src.to_string())),
            }
        }

        if segments.is_empty() {
            return Err(FetchError::OutsideRoot(src.to_string()));
        }

        Ok(segments.join("/"))
    }
}

impl ImageFetcher for DiskFetcher {
    fn fetch(&self, src: &str) -> Fetch {
        let key = match self.key(src) {
            Ok(key) => key,
            Err(err) => return Fetch::failed(err),
        };

        if let Some(info) = self.cache.get(&key) {
            return Fetch::Resident(info);
        }

        let cache = self.cache.clone();
        let path = self.root.join(&key);
        let src = src.to_string();

        Fetch::pending(async move {
            let result = probe(src, path).await;
            if let Ok(info) = &result {
                cache.insert(key, *info);
            }
            result
        })
    }
}

/// Reads the header of the image at `path` off the current thread.
pub async fn probe(src: String, path: PathBuf) -> FetchResult<ImageInfo> {
    let (tx, rx) = tokio::sync::oneshot::channel();

    rayon::spawn(move || {
        let result = probe_sync(&src, &path);
        let _ = tx.send(result);
    });

    rx.await.map_err(|_| FetchError::Cancelled)?
}

fn probe_sync(src: &str, path: &Path) -> FetchResult<ImageInfo> {
    let io_error = |source| FetchError::Io {
        src: src.to_string(),
        source,
    };

    let reader = ImageReader::open(path)
        .map_err(io_error)?
        .with_guessed_format()
        .map_err(io_error)?;

    let (width, height) = reader.into_dimensions().map_err(|e| FetchError::Decode {
        src: src.to_string(),
        reason: e.to_string(),
    })?;

    if width == 0 || height == 0 {
        return Err(FetchError::Decode {
            src: src.to_string(),
            reason: "image has no pixels".to_string(),
        });
    }

    debug!("Probed {:?}: {}x{}", path, width, height);
    Ok(ImageInfo::new(width, height))
}
