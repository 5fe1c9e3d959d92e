use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What kind of thing is sitting on the shelf
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    Medicine,
    Cosmetics,
    Food,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Medicine => "Medicine",
            Category::Cosmetics => "Cosmetics",
            Category::Food => "Food",
            Category::Other => "Other",
        }
    }

    pub fn all() -> Vec<Category> {
        vec![
            Category::Medicine,
            Category::Cosmetics,
            Category::Food,
            Category::Other,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let wanted = s.trim();
        Category::all()
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| crate::Error::InvalidInput(format!("unknown category '{}'", s)))
    }
}

/// Where in the house the product is kept
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StorageLocation {
    Fridge,
    #[serde(rename = "Medicine Cabinet")]
    MedicineCabinet,
    Bathroom,
    Bedroom,
}

impl StorageLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageLocation::Fridge => "Fridge",
            StorageLocation::MedicineCabinet => "Medicine Cabinet",
            StorageLocation::Bathroom => "Bathroom",
            StorageLocation::Bedroom => "Bedroom",
        }
    }

    pub fn all() -> Vec<StorageLocation> {
        vec![
            StorageLocation::Fridge,
            StorageLocation::MedicineCabinet,
            StorageLocation::Bathroom,
            StorageLocation::Bedroom,
        ]
    }
}

impl std::fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageLocation {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        // "Medicine Cabinet" is awkward to type on a command line
        let wanted = s.trim().replace(['-', '_'], " ");
        if wanted.eq_ignore_ascii_case("cabinet") {
            return Ok(StorageLocation::MedicineCabinet);
        }

        StorageLocation::all()
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| crate::Error::InvalidInput(format!("unknown location '{}'", s)))
    }
}

/// Category selector for the list view. `All` means no filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        CategoryFilter::Only(category)
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("All"),
            CategoryFilter::Only(category) => write!(f, "{}", category),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            s.parse().map(CategoryFilter::Only)
        }
    }
}

/// A tracked product
///
/// Field names on the wire match what's been persisted all along
/// (`expiryDate`, `openedDate`), hence the camelCase rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: Category,
    /// Calendar date, serialized as `YYYY-MM-DD`
    pub expiry_date: NaiveDate,
    pub location: StorageLocation,
    /// Reserved - nothing classifies on this yet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opened_date: Option<NaiveDate>,
    /// Thumbnail URL, never fetched by the core
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// User input for a product that doesn't exist yet
///
/// Dates stay as raw text here; `ProductStore::add` decides whether they're
/// good enough to turn into a `Product`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub category: Category,
    pub expiry_date: String,
    pub location: StorageLocation,
    pub opened_date: Option<String>,
    pub image: Option<String>,
}

impl NewProduct {
    /// Draft with the same defaults the add form starts with
    pub fn new(name: impl Into<String>, expiry_date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: Category::Medicine,
            expiry_date: expiry_date.into(),
            location: StorageLocation::MedicineCabinet,
            opened_date: None,
            image: None,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_location(mut self, location: StorageLocation) -> Self {
        self.location = location;
        self
    }

    pub fn with_opened_date(mut self, opened_date: impl Into<String>) -> Self {
        self.opened_date = Some(opened_date.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Parse a strict `YYYY-MM-DD` calendar date
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}
