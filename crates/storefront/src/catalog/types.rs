//! Wire types of the product API.

use serde::{Deserialize, Serialize};

use cornershop_core::{Money, ProductId};

/// A catalog product.
///
/// Only the fields the storefront displays are kept; unknown fields in the
/// API payload are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// Unit price.
    pub price: Money,
    pub category: String,
    /// Image URL for list views.
    #[serde(default)]
    pub thumbnail: String,
    /// Average rating, 0 to 5.
    #[serde(default)]
    pub rating: f64,
    /// Units in stock.
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub description: String,
}

/// Response body of `GET /products`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductList {
    pub products: Vec<Product>,
    /// Total number of products the API knows about.
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub skip: u32,
    #[serde(default)]
    pub limit: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_api_payload() {
        let json = r#"{
            "products": [{
                "id": 1,
                "title": "Essence Mascara Lash Princess",
                "description": "Volumizing mascara.",
                "category": "beauty",
                "price": 9.99,
                "discountPercentage": 7.17,
                "rating": 4.94,
                "stock": 5,
                "tags": ["beauty", "mascara"],
                "thumbnail": "https://cdn.example.com/1/thumbnail.png"
            }],
            "total": 194,
            "skip": 0,
            "limit": 1
        }"#;

        let list: ProductList = serde_json::from_str(json).unwrap();
        assert_eq!(list.total, 194);
        let product = &list.products[0];
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price.display(), "9.99");
        assert_eq!(product.stock, 5);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{"id": 7, "title": "Apple", "price": 1.99, "category": "groceries"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.thumbnail.is_empty());
        assert!(product.rating.abs() < f64::EPSILON);
    }
}
