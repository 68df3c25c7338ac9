use crate::core::error::GlowError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

/// A catalog entry. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub brand: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    products: Vec<Product>,
}

/// Source of product records.
pub trait CatalogSource: Send + Sync {
    fn load(&self) -> Result<Vec<Product>, GlowError>;
}

/// Reads `{ "products": [...] }` from disk on every `load` call.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for JsonFileCatalog {
    fn load(&self) -> Result<Vec<Product>, GlowError> {
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            GlowError::Catalog(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        let parsed: CatalogFile = serde_json::from_str(&contents).map_err(|e| {
            GlowError::Catalog(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;
        tracing::debug!(
            path = %self.path.display(),
            count = parsed.products.len(),
            "catalog loaded"
        );
        Ok(parsed.products)
    }
}

/// Distinct category names, sorted.
pub fn categories(products: &[Product]) -> Vec<String> {
    products
        .iter()
        .map(|p| p.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn filter_by_category(products: Vec<Product>, category: &str) -> Vec<Product> {
    products
        .into_iter()
        .filter(|p| p.category == category)
        .collect()
}

#[cfg(test)]
pub(crate) fn sample_product(id: &str, category: &str) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {}", id),
        brand: "CeraVe".to_string(),
        image: format!("https://example.com/{}.jpg", id),
        description: format!("Description of {}", id),
        category: category.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CATALOG: &str = r#"{
        "products": [
            { "id": "1", "name": "Foaming Cleanser", "brand": "CeraVe",
              "image": "https://example.com/1.jpg", "description": "Gel cleanser",
              "category": "cleanser" },
            { "id": "2", "name": "Daily Lotion", "brand": "CeraVe",
              "image": "https://example.com/2.jpg", "description": "Lightweight lotion",
              "category": "moisturizer" },
            { "id": "3", "name": "Hydrating Cleanser", "brand": "La Roche-Posay",
              "image": "https://example.com/3.jpg", "description": "Cream cleanser",
              "category": "cleanser" }
        ]
    }"#;

    fn write_catalog(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_products_from_json_file() {
        let file = write_catalog(CATALOG);
        let catalog = JsonFileCatalog::new(file.path());

        let products = catalog.load().unwrap();
        assert_eq!(products.len(), 3);
        assert_eq!(products[1].name, "Daily Lotion");
    }

    #[test]
    fn reload_sees_file_changes() {
        let file = write_catalog(CATALOG);
        let catalog = JsonFileCatalog::new(file.path());
        assert_eq!(catalog.load().unwrap().len(), 3);

        fs::write(file.path(), r#"{ "products": [] }"#).unwrap();
        assert!(catalog.load().unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_a_catalog_error() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = JsonFileCatalog::new(dir.path().join("absent.json"));
        assert!(matches!(catalog.load(), Err(GlowError::Catalog(_))));
    }

    #[test]
    fn malformed_file_is_a_catalog_error() {
        let file = write_catalog(r#"{ "items": [] }"#);
        let catalog = JsonFileCatalog::new(file.path());
        assert!(matches!(catalog.load(), Err(GlowError::Catalog(_))));
    }

    #[test]
    fn categories_are_sorted_and_unique() {
        let file = write_catalog(CATALOG);
        let products = JsonFileCatalog::new(file.path()).load().unwrap();
        assert_eq!(categories(&products), vec!["cleanser", "moisturizer"]);
    }

    #[test]
    fn filter_matches_category_exactly() {
        let file = write_catalog(CATALOG);
        let products = JsonFileCatalog::new(file.path()).load().unwrap();

        let cleansers = filter_by_category(products.clone(), "cleanser");
        let ids: Vec<_> = cleansers.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);

        assert!(filter_by_category(products, "Cleanser").is_empty());
    }
}
