// SQLite-backed key-value store
// Holds the persisted product collection between runs

pub mod cache;

pub use cache::CacheManager;
