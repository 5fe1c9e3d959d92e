// Core inventory logic: records, expiry classification, derived views, the store
pub mod advice;
pub mod config;
pub mod error;
pub mod expiry;
pub mod listing;
pub mod models;
pub mod providers;
pub mod scan;
pub mod seed;
pub mod stats;
pub mod store;

pub use advice::{AdviceOutcome, AdviceSession, AdviceState, Advisor};
pub use config::Config;
pub use error::Error;
pub use expiry::{classify, Expiry, ExpiryStatus};
pub use listing::{derive_list, derive_rows, ListRow};
pub use models::{Category, CategoryFilter, NewProduct, Product, StorageLocation};
pub use stats::{aggregate, ChartSlice, ProductStats};
pub use store::{KeyValueStore, MemoryStore, ProductStore};

pub type Result<T> = std::result::Result<T, Error>;
