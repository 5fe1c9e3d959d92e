// Built-in data: the first-run collection and the fake barcode catalogue
use chrono::{Duration, NaiveDate};

use crate::models::{Category, NewProduct, Product, StorageLocation};

const IBUPROFEN_EXPIRY: NaiveDate = match NaiveDate::from_ymd_opt(2023, 10, 15) {
    Some(date) => date,
    None => panic!("invalid seed date"),
};

const SUNSCREEN_EXPIRY: NaiveDate = match NaiveDate::from_ymd_opt(2023, 12, 1) {
    Some(date) => date,
    None => panic!("invalid seed date"),
};

/// Placeholder thumbnail for a product with no picture
pub fn placeholder_image(seed: impl std::fmt::Display) -> String {
    format!("https://picsum.photos/100/100?random={}", seed)
}

/// The collection used when nothing has been saved yet.
///
/// Two items are long expired, two are due within the month and one is good
/// for over a year, relative to `today`.
pub fn seed_products(today: NaiveDate) -> Vec<Product> {
    let seed = |id: &str, name: &str, category, expiry_date, location| Product {
        id: id.to_string(),
        name: name.to_string(),
        category,
        expiry_date,
        location,
        opened_date: None,
        image: Some(placeholder_image(id)),
    };

    vec![
        seed(
            "1",
            "Ibuprofen Tablets",
            Category::Medicine,
            IBUPROFEN_EXPIRY,
            StorageLocation::MedicineCabinet,
        ),
        seed(
            "2",
            "Vitamin C Serum",
            Category::Cosmetics,
            today + Duration::days(20),
            StorageLocation::Bathroom,
        ),
        seed(
            "3",
            "Antibiotic Ointment",
            Category::Medicine,
            today + Duration::days(400),
            StorageLocation::Fridge,
        ),
        seed(
            "4",
            "Sunscreen SPF 50",
            Category::Cosmetics,
            SUNSCREEN_EXPIRY,
            StorageLocation::Bedroom,
        ),
        seed(
            "5",
            "Cough Syrup",
            Category::Medicine,
            today + Duration::days(15),
            StorageLocation::MedicineCabinet,
        ),
    ]
}

/// What a barcode scan can identify: a name and a category, nothing more
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedItem {
    pub name: &'static str,
    pub category: Category,
}

impl ScannedItem {
    /// Start an add-form draft from the scan; the user still picks the dates
    pub fn into_draft(self, expiry_date: impl Into<String>) -> NewProduct {
        NewProduct::new(self.name, expiry_date).with_category(self.category)
    }
}

pub const SCAN_FIXTURE: [ScannedItem; 3] = [
    ScannedItem {
        name: "Aspirin 500mg",
        category: Category::Medicine,
    },
    ScannedItem {
        name: "Moisturizing Cream",
        category: Category::Cosmetics,
    },
    ScannedItem {
        name: "Eye Drops",
        category: Category::Medicine,
    },
];
