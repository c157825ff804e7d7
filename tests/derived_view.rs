//! Property tests for the client-side filter/sort pipeline and pagination.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use storefront::catalog::Product;
use storefront::filter::{derive_view, page_buttons, total_pages, FilterState, SortMode};

const CATEGORIES: [&str; 4] = ["beauty", "fragrances", "furniture", "groceries"];

fn product(id: u64, category: &str, price: f64, rating: f64) -> Product {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": format!("Product {}", id),
        "category": category,
        "price": price,
        "rating": rating,
    }))
    .unwrap()
}

/// A page of up to 12 products with ids in server order.
fn arb_page() -> impl Strategy<Value = Vec<Product>> {
    prop::collection::vec((0..CATEGORIES.len(), 0u32..200_000, 0u32..=50), 0..=12).prop_map(
        |rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (cat, cents, rating))| {
                    product(
                        i as u64 + 1,
                        CATEGORIES[cat],
                        f64::from(cents) / 100.0,
                        f64::from(rating) / 10.0,
                    )
                })
                .collect()
        },
    )
}

fn arb_sort() -> impl Strategy<Value = SortMode> {
    prop_oneof![
        Just(SortMode::All),
        Just(SortMode::PriceLowToHigh),
        Just(SortMode::PriceHighToLow),
        Just(SortMode::MostPopular),
    ]
}

fn arb_bound() -> impl Strategy<Value = Option<f64>> {
    prop::option::of((0u32..2000).prop_map(f64::from))
}

fn ids(view: &[&Product]) -> Vec<u64> {
    view.iter().map(|p| p.id).collect()
}

proptest! {
    #[test]
    fn prop_category_filter_only_keeps_that_category(
        page in arb_page(),
        cat in 0..CATEGORIES.len(),
        sort in arb_sort(),
    ) {
        let mut filters = FilterState::new();
        filters.set_selected_category(CATEGORIES[cat]);
        for p in derive_view(&page, &filters, sort) {
            prop_assert_eq!(p.category.as_str(), CATEGORIES[cat]);
        }
    }

    #[test]
    fn prop_prices_lie_within_bounds(
        page in arb_page(),
        min in arb_bound(),
        max in arb_bound(),
        sort in arb_sort(),
    ) {
        let mut filters = FilterState::new();
        filters.set_min_price(min);
        filters.set_max_price(max);
        let view = derive_view(&page, &filters, sort);
        for p in &view {
            prop_assert!(min.map_or(true, |m| p.price >= m));
            prop_assert!(max.map_or(true, |m| p.price <= m));
        }
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                prop_assert!(view.is_empty());
            }
        }
    }

    #[test]
    fn prop_sort_orders_hold(page in arb_page()) {
        let filters = FilterState::new();

        let asc = derive_view(&page, &filters, SortMode::PriceLowToHigh);
        prop_assert!(asc.windows(2).all(|w| w[0].price <= w[1].price));

        let desc = derive_view(&page, &filters, SortMode::PriceHighToLow);
        prop_assert!(desc.windows(2).all(|w| w[0].price >= w[1].price));

        let popular = derive_view(&page, &filters, SortMode::MostPopular);
        prop_assert!(popular.windows(2).all(|w| w[0].rating >= w[1].rating));
    }

    #[test]
    fn prop_derivation_keeps_a_subset(page in arb_page(), sort in arb_sort()) {
        let view = derive_view(&page, &FilterState::new(), sort);
        prop_assert_eq!(view.len(), page.len());
        let mut got = ids(&view);
        got.sort_unstable();
        let want: Vec<u64> = page.iter().map(|p| p.id).collect();
        prop_assert_eq!(got, want);
    }

    #[test]
    fn prop_reset_reproduces_server_order(
        page in arb_page(),
        cat in 0..CATEGORIES.len(),
        min in arb_bound(),
        sort in arb_sort(),
    ) {
        let mut filters = FilterState::new();
        filters.set_selected_category(CATEGORIES[cat]);
        filters.set_min_price(min);
        filters.set_keyword("Apple");
        let _ = derive_view(&page, &filters, sort);

        filters.set_search_query("");
        filters.set_selected_category("");
        filters.set_min_price(None);
        filters.set_max_price(None);
        filters.set_keyword("");
        prop_assert!(filters.is_cleared());

        let view = derive_view(&page, &filters, SortMode::All);
        let want: Vec<u64> = page.iter().map(|p| p.id).collect();
        prop_assert_eq!(ids(&view), want);
    }

    #[test]
    fn prop_page_buttons_stay_in_range(total in 0u64..5_000, current in 0u32..500) {
        let pages = total_pages(total);
        prop_assert_eq!(u64::from(pages), total.div_ceil(12));

        let buttons = page_buttons(current, pages);
        prop_assert_eq!(buttons.len() as u32, pages.min(5));
        for b in &buttons {
            prop_assert!(*b >= 1 && *b <= pages);
        }
        prop_assert!(buttons.windows(2).all(|w| w[1] == w[0] + 1));
    }
}

#[test]
fn beauty_between_10_and_50_keeps_relative_order() {
    let page = vec![
        product(1, "beauty", 9.99, 4.9),
        product(2, "beauty", 14.99, 4.1),
        product(3, "fragrances", 29.99, 4.0),
        product(4, "beauty", 49.99, 3.5),
        product(5, "beauty", 50.01, 4.8),
        product(6, "furniture", 20.0, 4.2),
        product(7, "beauty", 10.0, 2.9),
        product(8, "groceries", 12.0, 4.4),
        product(9, "beauty", 5.0, 4.0),
        product(10, "fragrances", 45.0, 3.9),
        product(11, "beauty", 99.0, 4.7),
        product(12, "groceries", 30.0, 4.5),
    ];
    let mut filters = FilterState::new();
    filters.set_selected_category("beauty");
    filters.set_min_price(Some(10.0));
    filters.set_max_price(Some(50.0));

    let view = derive_view(&page, &filters, SortMode::All);
    assert_eq!(ids(&view), vec![2, 4, 7]);
}

#[test]
fn thirty_seven_products_make_four_pages() {
    assert_eq!(total_pages(37), 4);
    assert_eq!(page_buttons(4, 4), vec![1, 2, 3, 4]);
}

#[test]
fn sort_ties_keep_server_order() {
    let page = vec![
        product(1, "a", 10.0, 4.0),
        product(2, "a", 5.0, 4.0),
        product(3, "a", 10.0, 4.0),
    ];
    let filters = FilterState::new();
    assert_eq!(
        ids(&derive_view(&page, &filters, SortMode::PriceLowToHigh)),
        vec![2, 1, 3]
    );
    assert_eq!(
        ids(&derive_view(&page, &filters, SortMode::MostPopular)),
        vec![1, 2, 3]
    );
}
