//! Wire types for the product API.
//!
//! Only the fields the storefront renders are modeled. Unknown fields are
//! ignored and optional fields fall back to their defaults, so a sparse
//! product (as returned by some mock servers) still decodes.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A product as returned by `/products`, `/products/search` and
/// `/products/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub images: Vec<String>,

    // Detail-view extras
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub availability_status: Option<String>,
    #[serde(default)]
    pub discount_percentage: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// A customer review attached to a product.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Usually a whole number of stars, but fractional values occur.
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
    /// RFC 3339 timestamp, e.g. `2024-05-23T08:56:21.618Z`.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reviewer_name: String,
}

/// One page of a listing or search response.
///
/// `products` keeps server order. A missing `total` decodes as 0.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductPage {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: u64,
}

impl Product {
    /// The image shown first in the detail view: the first gallery image,
    /// falling back to the thumbnail.
    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .first()
            .map(String::as_str)
            .or_else(|| (!self.thumbnail.is_empty()).then_some(self.thumbnail.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FULL_PRODUCT: &str = r#"{
        "id": 1,
        "title": "Essence Mascara Lash Princess",
        "description": "A popular mascara.",
        "category": "beauty",
        "price": 9.99,
        "discountPercentage": 7.17,
        "rating": 4.94,
        "stock": 5,
        "tags": ["beauty", "mascara"],
        "brand": "Essence",
        "sku": "RCH45Q1A",
        "weight": 2,
        "dimensions": {"width": 23.17, "height": 14.43, "depth": 28.01},
        "availabilityStatus": "Low Stock",
        "reviews": [
            {
                "rating": 2,
                "comment": "Very unhappy with my purchase!",
                "date": "2024-05-23T08:56:21.618Z",
                "reviewerName": "John Doe",
                "reviewerEmail": "john.doe@x.dummyjson.com"
            }
        ],
        "images": ["https://cdn.dummyjson.com/products/images/beauty/1.png"],
        "thumbnail": "https://cdn.dummyjson.com/products/images/beauty/thumbnail.png"
    }"#;

    #[test]
    fn decodes_full_product_and_ignores_unknown_fields() {
        let product: Product = serde_json::from_str(FULL_PRODUCT).unwrap();
        assert_eq!(product.id, 1);
        assert_eq!(product.category, "beauty");
        assert_eq!(product.brand.as_deref(), Some("Essence"));
        assert_eq!(product.stock, Some(5));
        assert_eq!(product.availability_status.as_deref(), Some("Low Stock"));
        assert_eq!(product.tags, vec!["beauty", "mascara"]);
        assert_eq!(product.reviews.len(), 1);
        assert_eq!(product.reviews[0].reviewer_name, "John Doe");
        assert!(product.reviews[0].date.is_some());
    }

    #[test]
    fn decodes_fractional_review_rating() {
        let product: Product = serde_json::from_str(
            r#"{"id": 3, "title": "Lamp", "reviews": [{"rating": 4.5, "comment": "Bright"}, {"rating": 2}]}"#,
        )
        .unwrap();
        assert_eq!(product.reviews[0].rating, 4.5);
        assert_eq!(product.reviews[1].rating, 2.0);
        assert_eq!(product.reviews[0].reviewer_name, "");
    }

    #[test]
    fn decodes_sparse_product_with_defaults() {
        let product: Product =
            serde_json::from_str(r#"{"id": 7, "title": "Bare", "price": 3.5}"#).unwrap();
        assert_eq!(product.description, "");
        assert_eq!(product.rating, 0.0);
        assert!(product.images.is_empty());
        assert!(product.brand.is_none());
        assert!(product.reviews.is_empty());
    }

    #[test]
    fn page_without_total_defaults_to_zero() {
        let page: ProductPage =
            serde_json::from_str(r#"{"products": [{"id": 1, "title": "A"}]}"#).unwrap();
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.total, 0);

        let empty: ProductPage = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, ProductPage::default());
    }

    #[test]
    fn primary_image_prefers_gallery_then_thumbnail() {
        let mut product: Product = serde_json::from_str(FULL_PRODUCT).unwrap();
        assert_eq!(
            product.primary_image(),
            Some("https://cdn.dummyjson.com/products/images/beauty/1.png")
        );

        product.images.clear();
        assert_eq!(
            product.primary_image(),
            Some("https://cdn.dummyjson.com/products/images/beauty/thumbnail.png")
        );

        product.thumbnail.clear();
        assert_eq!(product.primary_image(), None);
    }
}
