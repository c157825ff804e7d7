/// Session-lifetime filter state shared by the filter sidebar and the
/// product list.
///
/// Created empty at startup and owned by `App`. There is no `reset` method;
/// the reset actions clear each field through its setter.
///
/// `min_price > max_price` is representable; it simply filters everything
/// out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    search_query: String,
    selected_category: String,
    min_price: Option<f64>,
    max_price: Option<f64>,
    keyword: String,
}

/// The part of the state that decides what the server is asked for.
///
/// The product list compares this against the key of the last request it
/// issued; category and price are applied locally and are not part of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchKey {
    pub page: u32,
    pub search_query: String,
    pub keyword: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Selected category; empty means no category filter.
    pub fn selected_category(&self) -> &str {
        &self.selected_category
    }

    pub fn set_selected_category(&mut self, category: impl Into<String>) {
        self.selected_category = category.into();
    }

    pub fn min_price(&self) -> Option<f64> {
        self.min_price
    }

    pub fn set_min_price(&mut self, price: Option<f64>) {
        self.min_price = price;
    }

    pub fn max_price(&self) -> Option<f64> {
        self.max_price
    }

    pub fn set_max_price(&mut self, price: Option<f64>) {
        self.max_price = price;
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn set_keyword(&mut self, keyword: impl Into<String>) {
        self.keyword = keyword.into();
    }

    /// The term sent to the search endpoint.
    ///
    /// The typed query wins over the keyword shortcut; `None` when both are
    /// empty.
    pub fn search_term(&self) -> Option<&str> {
        if !self.search_query.is_empty() {
            Some(&self.search_query)
        } else if !self.keyword.is_empty() {
            Some(&self.keyword)
        } else {
            None
        }
    }

    pub fn fetch_key(&self, page: u32) -> FetchKey {
        FetchKey {
            page,
            search_query: self.search_query.clone(),
            keyword: self.keyword.clone(),
        }
    }

    /// True when every field is back at its initial value.
    pub fn is_cleared(&self) -> bool {
        *self == Self::default()
    }
}
