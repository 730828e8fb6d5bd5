pub mod cache;
pub mod fetcher;

pub use cache::ResidentCache;
pub use fetcher::{DiskFetcher, probe};
