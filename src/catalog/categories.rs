use crate::catalog::types::Product;
use std::collections::HashSet;

/// Distinct categories in first-seen order.
///
/// Matching is exact and case-sensitive, and empty category strings are
/// skipped since they cannot be selected.
pub fn distinct_categories(products: &[Product]) -> Vec<String> {
    let mut seen = HashSet::new();
    products
        .iter()
        .filter(|p| !p.category.is_empty())
        .filter(|p| seen.insert(p.category.as_str()))
        .map(|p| p.category.clone())
        .collect()
}
