//! Catalog product type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::ProductId;

/// A product in the catalog.
///
/// Products are supplied by the catalog source and never mutated by the
/// stores; cart lines and wishlist entries hold a clone taken when they were
/// added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Full description.
    #[serde(default)]
    pub description: String,
    /// List price in currency units.
    pub price: f64,
    /// Sale price, when the product is discounted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<f64>,
    /// Image URLs, first one is the cover.
    #[serde(default)]
    pub images: Vec<String>,
    /// Top-level category name.
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// Size options offered.
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Color options offered.
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Average review rating.
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    /// Units available.
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Create a product with the given list price and empty option lists.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: f64) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            discount_price: None,
            images: Vec::new(),
            category: String::new(),
            subcategory: None,
            sizes: Vec::new(),
            colors: Vec::new(),
            tags: Vec::new(),
            rating: 0.0,
            review_count: 0,
            stock: 0,
            featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the sale price.
    pub fn with_discount_price(mut self, discount_price: f64) -> Self {
        self.discount_price = Some(discount_price);
        self
    }

    /// Set the category and optional subcategory.
    pub fn with_category(mut self, category: impl Into<String>, subcategory: Option<&str>) -> Self {
        self.category = category.into();
        self.subcategory = subcategory.map(str::to_string);
        self
    }

    /// Set the size options.
    pub fn with_sizes<I, S>(mut self, sizes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sizes = sizes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the color options.
    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    /// Set the units in stock.
    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    /// Price actually charged: the sale price when present, else the list price.
    pub fn effective_price(&self) -> f64 {
        self.discount_price.unwrap_or(self.price)
    }

    /// Whether a sale price below the list price is set.
    pub fn is_on_sale(&self) -> bool {
        matches!(self.discount_price, Some(d) if d < self.price)
    }

    /// Sale discount as a whole percentage of the list price.
    pub fn discount_percent(&self) -> Option<u32> {
        if !self.is_on_sale() || self.price <= 0.0 {
            return None;
        }
        let discount = self.discount_price?;
        Some((((self.price - discount) / self.price) * 100.0).round() as u32)
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Whether `size` is one of the offered sizes.
    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }

    /// Whether `color` is one of the offered colors.
    pub fn offers_color(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c == color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_price_prefers_discount() {
        let product = Product::new("p1", "Linen Shirt", 12.0).with_discount_price(8.0);
        assert_eq!(product.effective_price(), 8.0);
        assert!(product.is_on_sale());
    }

    #[test]
    fn test_effective_price_without_discount() {
        let product = Product::new("p1", "Linen Shirt", 12.0);
        assert_eq!(product.effective_price(), 12.0);
        assert!(!product.is_on_sale());
        assert_eq!(product.discount_percent(), None);
    }

    #[test]
    fn test_discount_percent() {
        let product = Product::new("p1", "Dress", 500_000.0).with_discount_price(400_000.0);
        assert_eq!(product.discount_percent(), Some(20));
    }

    #[test]
    fn test_options_and_stock() {
        let product = Product::new("p1", "Tee", 10.0)
            .with_sizes(["S", "M"])
            .with_colors(["Red"])
            .with_stock(3);
        assert!(product.offers_size("M"));
        assert!(!product.offers_size("XL"));
        assert!(product.offers_color("Red"));
        assert!(product.in_stock());
        assert!(!Product::new("p2", "Sold out", 1.0).in_stock());
    }

    #[test]
    fn test_deserializes_catalog_json() {
        let json = r#"{
            "id": "1",
            "name": "Áo sơ mi",
            "description": "Cotton",
            "price": 350000,
            "discountPrice": 299000,
            "images": ["a.jpg"],
            "category": "Men",
            "subcategory": "Shirts",
            "sizes": ["M", "L"],
            "colors": ["White"],
            "rating": 4.5,
            "reviewCount": 120,
            "stock": 50,
            "tags": ["new"],
            "featured": true,
            "createdAt": "2024-01-15T00:00:00Z",
            "updatedAt": "2024-01-15T00:00:00Z"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "1");
        assert_eq!(product.effective_price(), 299_000.0);
        assert_eq!(product.subcategory.as_deref(), Some("Shirts"));
        assert_eq!(product.review_count, 120);
    }
}
