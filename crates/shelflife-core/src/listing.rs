// List view-model: filter, search, sort by expiry
use chrono::NaiveDateTime;

use crate::expiry::{classify, Expiry};
use crate::models::{CategoryFilter, Product};

/// A product plus its classification for one derivation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub product: Product,
    pub expiry: Expiry,
}

/// Filter by category, then by case-insensitive name substring, then sort by
/// expiry date (earliest first).
///
/// The sort is stable, so products sharing an expiry date keep their input
/// order. The source slice is never touched; an empty result is fine.
pub fn derive_list(products: &[Product], filter: CategoryFilter, search: &str) -> Vec<Product> {
    let needle = search.to_lowercase();

    let mut matches: Vec<Product> = products
        .iter()
        .filter(|p| filter.matches(p.category))
        .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    matches.sort_by_key(|p| p.expiry_date);
    matches
}

/// [`derive_list`] with every row classified against the same `now`
pub fn derive_rows(
    products: &[Product],
    filter: CategoryFilter,
    search: &str,
    now: NaiveDateTime,
) -> Vec<ListRow> {
    derive_list(products, filter, search)
        .into_iter()
        .map(|product| ListRow {
            expiry: classify(product.expiry_date, now),
            product,
        })
        .collect()
}
