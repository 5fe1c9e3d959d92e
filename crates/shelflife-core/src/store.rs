use chrono::{NaiveDate, Utc};
use shelflife_cache::CacheManager;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::models::{parse_date, NewProduct, Product};
use crate::seed::{placeholder_image, seed_products};
use crate::{Error, Result};

/// Key the whole collection is saved under
pub const PRODUCTS_KEY: &str = "products";

/// Where the collection goes between runs
///
/// String in, string out, whole values only. Implementations don't need to
/// know anything about products.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
}

impl KeyValueStore for CacheManager {
    fn load(&self, key: &str) -> Result<Option<String>> {
        self.get(key).map_err(|e| Error::StorageError(e.to_string()))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.set(key, value)
            .map_err(|e| Error::StorageError(e.to_string()))
    }
}

/// Non-persistent backend
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that already holds `value` under `key`
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value.to_string());
        store
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The product collection - single owner of the list
///
/// Every successful mutation writes the full list back to the backend before
/// returning. Reads hand out a shared slice so nobody edits it behind the
/// store's back.
pub struct ProductStore<S: KeyValueStore> {
    backend: S,
    products: Vec<Product>,
}

impl<S: KeyValueStore> ProductStore<S> {
    /// Load the saved collection, or fall back to the seed set.
    ///
    /// Missing, unreadable, malformed and empty saved data all count as
    /// "nothing saved". None of them is an error.
    pub fn open(backend: S, today: NaiveDate) -> Self {
        let products = match Self::load_saved(&backend) {
            Some(products) => {
                info!("Loaded {} saved products", products.len());
                products
            }
            None => {
                info!("No saved products - starting from the seed collection");
                seed_products(today)
            }
        };

        Self { backend, products }
    }

    fn load_saved(backend: &S) -> Option<Vec<Product>> {
        let raw = match backend.load(PRODUCTS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Could not read saved products: {}", e);
                return None;
            }
        };

        let products: Vec<Product> = match serde_json::from_str(&raw) {
            Ok(products) => products,
            Err(e) => {
                warn!("Saved products are malformed, ignoring them: {}", e);
                return None;
            }
        };

        if products.is_empty() {
            return None;
        }

        Some(dedup_ids(products))
    }

    /// Current snapshot
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Add a product from a draft.
    ///
    /// Returns `Ok(None)` without touching anything when the draft has no name
    /// or its expiry date isn't a real `YYYY-MM-DD` date. Backend write errors
    /// are passed straight up; the product is already in memory by then.
    pub fn add(&mut self, draft: NewProduct) -> Result<Option<Product>> {
        let name = draft.name.trim();
        if name.is_empty() {
            debug!("Ignoring product draft without a name");
            return Ok(None);
        }

        let Some(expiry_date) = parse_date(&draft.expiry_date) else {
            debug!("Ignoring '{}': bad expiry date '{}'", name, draft.expiry_date);
            return Ok(None);
        };

        let opened_date = draft.opened_date.as_deref().and_then(parse_date);

        let image = draft
            .image
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| placeholder_image(Utc::now().timestamp_millis()));

        let product = Product {
            id: self.next_id(),
            name: name.to_string(),
            category: draft.category,
            expiry_date,
            location: draft.location,
            opened_date,
            image: Some(image),
        };

        self.products.push(product.clone());
        info!("Added {} ({})", product.name, product.id);

        self.flush()?;
        Ok(Some(product))
    }

    /// Remove by id. Unknown ids leave the list as it was, which still gets
    /// written back like any other remove.
    ///
    /// Returns the removed product, if there was one.
    pub fn remove(&mut self, id: &str) -> Result<Option<Product>> {
        let removed = match self.products.iter().position(|p| p.id == id) {
            Some(index) => {
                let removed = self.products.remove(index);
                info!("Removed {} ({})", removed.name, removed.id);
                Some(removed)
            }
            None => {
                debug!("Nothing to remove for id {}", id);
                None
            }
        };

        self.flush()?;
        Ok(removed)
    }

    fn next_id(&self) -> String {
        loop {
            let id = uuid::Uuid::new_v4().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    /// Write the whole collection back to the backend
    fn flush(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.products)?;
        self.backend.save(PRODUCTS_KEY, &json)?;
        debug!("Persisted {} products", self.products.len());
        Ok(())
    }
}

/// Keep the first product for each id; saved data from elsewhere might repeat one
fn dedup_ids(products: Vec<Product>) -> Vec<Product> {
    let mut seen = HashSet::new();
    let before = products.len();

    let unique: Vec<Product> = products
        .into_iter()
        .filter(|p| seen.insert(p.id.clone()))
        .collect();

    if unique.len() < before {
        warn!("Dropped {} products with duplicate ids", before - unique.len());
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, StorageLocation};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn seeded() -> ProductStore<MemoryStore> {
        ProductStore::open(MemoryStore::new(), today())
    }

    #[test]
    fn test_open_without_saved_data_uses_seed() {
        let store = seeded();
        assert_eq!(store.all(), seed_products(today()).as_slice());
        // Opening alone doesn't write anything
        assert_eq!(store.backend().get(PRODUCTS_KEY), None);
    }

    #[test]
    fn test_open_with_malformed_data_uses_seed() {
        for raw in ["not json", "{\"id\": 1}", "[]", "[{\"id\":\"1\",\"expiryDate\":\"2023-02-30\"}]"] {
            let store = ProductStore::open(MemoryStore::with_value(PRODUCTS_KEY, raw), today());
            assert_eq!(store.len(), 5, "raw value {:?}", raw);
        }
    }

    #[test]
    fn test_open_with_read_error_uses_seed() {
        let mut backend = MockKeyValueStore::new();
        backend
            .expect_load()
            .times(1)
            .returning(|_| Err(Error::StorageError("disk on fire".into())));

        let store = ProductStore::open(backend, today());
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_open_loads_saved_products() {
        let raw = r#"[{"id":"x","name":"Milk","category":"Food","expiryDate":"2025-03-12","location":"Fridge"}]"#;
        let store = ProductStore::open(MemoryStore::with_value(PRODUCTS_KEY, raw), today());

        assert_eq!(store.len(), 1);
        let milk = store.get("x").unwrap();
        assert_eq!(milk.category, Category::Food);
        assert_eq!(milk.location, StorageLocation::Fridge);
    }

    #[test]
    fn test_open_drops_duplicate_ids() {
        let raw = r#"[
            {"id":"x","name":"Milk","category":"Food","expiryDate":"2025-03-12","location":"Fridge"},
            {"id":"x","name":"Cheese","category":"Food","expiryDate":"2025-04-12","location":"Fridge"}
        ]"#;
        let store = ProductStore::open(MemoryStore::with_value(PRODUCTS_KEY, raw), today());

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("x").unwrap().name, "Milk");
    }

    #[test]
    fn test_add_assigns_id_and_image_and_persists() {
        let mut store = seeded();
        let draft = NewProduct::new("  Eye Drops ", "2025-04-01")
            .with_location(StorageLocation::Bathroom)
            .with_opened_date("2025-03-01");

        let added = store.add(draft).unwrap().unwrap();

        assert_eq!(added.name, "Eye Drops");
        assert_eq!(added.category, Category::Medicine);
        assert_eq!(added.opened_date, NaiveDate::from_ymd_opt(2025, 3, 1));
        assert!(added
            .image
            .as_deref()
            .unwrap()
            .starts_with("https://picsum.photos/100/100?random="));
        assert_eq!(store.len(), 6);
        assert_eq!(store.all().last(), Some(&added));

        let saved: Vec<Product> =
            serde_json::from_str(store.backend().get(PRODUCTS_KEY).unwrap()).unwrap();
        assert_eq!(saved, store.all());
    }

    #[test]
    fn test_add_keeps_supplied_image() {
        let mut store = seeded();
        let added = store
            .add(NewProduct::new("Soap", "2026-01-01").with_image("https://example.com/soap.png"))
            .unwrap()
            .unwrap();
        assert_eq!(added.image.as_deref(), Some("https://example.com/soap.png"));
    }

    #[test]
    fn test_add_ids_are_unique() {
        let mut store = seeded();
        let mut ids = HashSet::new();
        for i in 0..50 {
            let added = store
                .add(NewProduct::new(format!("Item {}", i), "2026-01-01"))
                .unwrap()
                .unwrap();
            assert!(ids.insert(added.id));
        }
        let all_ids: HashSet<_> = store.all().iter().map(|p| p.id.clone()).collect();
        assert_eq!(all_ids.len(), store.len());
    }

    #[test]
    fn test_invalid_drafts_change_nothing() {
        let mut store = seeded();
        let before = store.all().to_vec();

        for draft in [
            NewProduct::new("", "2025-04-01"),
            NewProduct::new("   ", "2025-04-01"),
            NewProduct::new("Eye Drops", ""),
            NewProduct::new("Eye Drops", "2025-02-30"),
            NewProduct::new("Eye Drops", "next tuesday"),
        ] {
            assert_eq!(store.add(draft).unwrap(), None);
        }

        assert_eq!(store.all(), before.as_slice());
        assert_eq!(store.backend().get(PRODUCTS_KEY), None);
    }

    #[test]
    fn test_unparseable_opened_date_is_dropped() {
        let mut store = seeded();
        let added = store
            .add(NewProduct::new("Eye Drops", "2025-04-01").with_opened_date("yesterday"))
            .unwrap()
            .unwrap();
        assert_eq!(added.opened_date, None);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut store = seeded();
        assert_eq!(store.remove("nope").unwrap(), None);
        assert_eq!(store.len(), 5);

        let saved: Vec<Product> =
            serde_json::from_str(store.backend().get(PRODUCTS_KEY).unwrap()).unwrap();
        assert_eq!(saved, seed_products(today()));
    }

    #[test]
    fn test_remove_persists() {
        let mut store = seeded();
        let removed = store.remove("3").unwrap().unwrap();
        assert_eq!(removed.name, "Antibiotic Ointment");
        assert!(store.get("3").is_none());

        let saved: Vec<Product> =
            serde_json::from_str(store.backend().get(PRODUCTS_KEY).unwrap()).unwrap();
        assert_eq!(saved.len(), 4);
    }

    #[test]
    fn test_add_then_remove_restores_collection() {
        let mut store = seeded();
        let before = store.all().to_vec();

        let added = store
            .add(NewProduct::new("Aspirin 500mg", "2025-08-01"))
            .unwrap()
            .unwrap();
        store.remove(&added.id).unwrap();

        assert_eq!(store.all(), before.as_slice());
    }

    #[test]
    fn test_write_failure_propagates() {
        let mut backend = MockKeyValueStore::new();
        backend.expect_load().returning(|_| Ok(None));
        backend
            .expect_save()
            .times(1)
            .returning(|_, _| Err(Error::StorageError("read-only".into())));

        let mut store = ProductStore::open(backend, today());
        let result = store.add(NewProduct::new("Eye Drops", "2025-04-01"));

        assert!(matches!(result, Err(Error::StorageError(_))));
    }
}
