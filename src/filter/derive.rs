use crate::catalog::Product;
use crate::filter::state::FilterState;
use crate::util::lowercase_first;
use std::borrow::Cow;

/// Ordering applied to the filtered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Server order.
    #[default]
    All,
    PriceLowToHigh,
    PriceHighToLow,
    MostPopular,
}

impl SortMode {
    /// Entries of the sort dropdown, in display order.
    pub const CHOICES: [SortMode; 3] = [
        SortMode::PriceLowToHigh,
        SortMode::PriceHighToLow,
        SortMode::MostPopular,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::PriceLowToHigh => "Price: Low to High",
            Self::PriceHighToLow => "Price: High to Low",
            Self::MostPopular => "Most Popular",
        }
    }

    /// Text on the closed dropdown button: "Filter" until a mode is chosen,
    /// then the mode label with a lower-cased first letter.
    pub fn header_label(self) -> Cow<'static, str> {
        match self {
            Self::All => Cow::Borrowed("Filter"),
            mode => Cow::Owned(lowercase_first(mode.label())),
        }
    }
}

/// Filter and sort one fetched page for display.
///
/// Applied in order: exact category match, `price >= min`, `price <= max`,
/// then the sort mode. Sorting is stable, so ties keep server order. Nothing
/// is cached; call this on every render.
pub fn derive_view<'a>(
    products: &'a [Product],
    filters: &FilterState,
    sort: SortMode,
) -> Vec<&'a Product> {
    let category = filters.selected_category();
    let min = filters.min_price();
    let max = filters.max_price();

    let mut view: Vec<&Product> = products
        .iter()
        .filter(|p| category.is_empty() || p.category == category)
        .filter(|p| min.map_or(true, |min| p.price >= min))
        .filter(|p| max.map_or(true, |max| p.price <= max))
        .collect();

    match sort {
        SortMode::All => {}
        SortMode::PriceLowToHigh => view.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortMode::PriceHighToLow => view.sort_by(|a, b| b.price.total_cmp(&a.price)),
        SortMode::MostPopular => view.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
    }

    view
}
