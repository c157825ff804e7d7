//! Product catalog access.
//!
//! This module provides:
//!
//! - [`CatalogClient`]: typed HTTP client for the DummyJSON product API
//!   (paged listing, search, single product, full set)
//! - [`Product`], [`Review`], [`ProductPage`]: response types
//! - [`distinct_categories`]: category discovery over a product set

pub mod categories;
pub mod client;
pub mod types;

pub use categories::distinct_categories;
pub use client::{CatalogClient, CatalogError, PageRequest, DEFAULT_API_BASE, DEFAULT_TIMEOUT};
pub use types::{Product, ProductPage, Review};
