//! Product catalog and hero copy for the current drop

use std::{collections::HashSet, fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a catalog file
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog contains no products")]
    Empty,

    #[error("duplicate product id: {0}")]
    DuplicateId(String),
}

/// A product in the lookbook grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Display price, currency symbol included
    pub price: String,
    pub image: String,
    pub description: String,
    pub available: bool,
}

impl Product {
    fn new(
        id: &str,
        name: &str,
        price: &str,
        image: &str,
        description: &str,
        available: bool,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            price: price.to_string(),
            image: image.to_string(),
            description: description.to_string(),
            available,
        }
    }

    pub fn availability_label(&self) -> &'static str {
        if self.available { "Available" } else { "Sold Out" }
    }
}

/// Read-only list of products for the landing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting empty lists and duplicate ids
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        if products.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(product.id.as_str()) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }

        Ok(Self { products })
    }

    /// Load a JSON array of products
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)?;
        let products: Vec<Product> = serde_json::from_str(&raw)?;
        Self::new(products)
    }

    /// The BLACK GOLD drop shipped with the server
    pub fn default_drop() -> Self {
        Self {
            products: vec![
                Product::new(
                    "1",
                    "BLACK GOLD HOODIE",
                    "₵850",
                    "https://images.unsplash.com/photo-1556821840-3a63f95609a7?w=800&q=80",
                    "Premium heavyweight cotton hoodie with reflective gold Adinkra symbol print. Limited to 50 pieces worldwide.",
                    true,
                ),
                Product::new(
                    "2",
                    "ACCRA NIGHTS TEE",
                    "₵450",
                    "https://images.unsplash.com/photo-1503342217505-b0a15ec3261c?w=800&q=80",
                    "Oversized cotton tee featuring Accra skyline silhouette with gold foil details. Each piece individually numbered.",
                    true,
                ),
                Product::new(
                    "3",
                    "HERITAGE CARGO PANTS",
                    "₵950",
                    "https://images.unsplash.com/photo-1509551388413-e18d05a2016a?w=800&q=80",
                    "Technical cargo pants with traditional Kente-inspired pocket details and adjustable ankles.",
                    false,
                ),
                Product::new(
                    "4",
                    "ADINKRA SNAPBACK",
                    "₵350",
                    "https://images.unsplash.com/photo-1576871337622-98d48d1cf531?w=800&q=80",
                    "Black snapback cap with embroidered Adinkra symbols representing strength and wisdom.",
                    true,
                ),
                Product::new(
                    "5",
                    "GOLD DUST BOMBER",
                    "₵1250",
                    "https://images.unsplash.com/photo-1551537482-f2075a1d41f2?w=800&q=80",
                    "Premium satin bomber jacket with hand-painted gold accents inspired by traditional Ashanti goldwork.",
                    true,
                ),
                Product::new(
                    "6",
                    "FREEDOM SOCKS",
                    "₵150",
                    "https://images.unsplash.com/photo-1586350977771-b3b0abd50c82?w=800&q=80",
                    "Premium knit socks with reflective gold threading and FreeFall logo. Comes in a collector's box.",
                    true,
                ),
            ],
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::default_drop()
    }
}

/// Copy shown in the hero banner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroContent {
    pub title: String,
    pub subtitle: String,
    pub tagline: String,
    pub drop_name: String,
}

impl HeroContent {
    pub fn with_drop_name(drop_name: impl Into<String>) -> Self {
        Self {
            drop_name: drop_name.into(),
            ..Self::default()
        }
    }
}

impl Default for HeroContent {
    fn default() -> Self {
        Self {
            title: "FREEFALL".to_string(),
            subtitle: "FIGURE OF ART".to_string(),
            tagline: "Fall Free or Don't Fall At All".to_string(),
            drop_name: "BLACK GOLD".to_string(),
        }
    }
}
