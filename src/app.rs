use crate::catalog::{CatalogClient, CatalogError, PageRequest, Product, ProductPage};
use crate::filter::{self, FetchKey, FilterState, SortMode, ITEMS_PER_PAGE};
use crate::keybindings::{Context, KeybindingRegistry};
use crate::theme::{StyleMap, ThemeVariant};
use crate::util::MAX_SEARCH_QUERY_LENGTH;
use ratatui::style::Style;
use std::borrow::Cow;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Maximum scroll offset for the detail view (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

// ============================================================================
// View and Focus Enums
// ============================================================================

/// Current view mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Browse, // Filter sidebar + product grid
    Detail, // Full-screen product page
}

/// Which panel has focus in Browse view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Products,
}

/// One selectable row of the filter sidebar, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarItem {
    Search,
    MinPrice,
    MaxPrice,
    /// Index into `App::categories`.
    Category(usize),
    /// Index into `App::keywords`.
    Keyword(usize),
    ResetFilters,
}

// ============================================================================
// Text Input
// ============================================================================

/// Sidebar field being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Search,
    MinPrice,
    MaxPrice,
}

impl InputField {
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Search => "Search products...",
            Self::MinPrice => "Min",
            Self::MaxPrice => "Max",
        }
    }
}

/// An in-progress edit of one sidebar field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    pub field: InputField,
    pub buffer: String,
}

/// A price field that is neither blank nor a finite number.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Invalid price '{0}'")]
pub struct InvalidPrice(pub String);

/// Parse a price input. Blank input clears the bound.
pub fn parse_price(input: &str) -> Result<Option<f64>, InvalidPrice> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(InvalidPrice(trimmed.to_string())),
    }
}

/// Render a committed bound back into an editable string.
pub fn price_to_input(price: Option<f64>) -> String {
    price.map(|p| p.to_string()).unwrap_or_default()
}

// ============================================================================
// Detail and Event Types
// ============================================================================

/// Loading state of the product detail view.
///
/// A failed fetch leaves the state at `Loading`; the error is only logged.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Idle,
    Loading { product_id: u64 },
    Loaded(Box<Product>),
}

/// Events from background tasks
#[derive(Debug)]
pub enum AppEvent {
    /// A listing or search request finished.
    ///
    /// `generation` is the page generation captured when the request was
    /// issued; responses from superseded requests are dropped.
    PageLoaded {
        generation: u64,
        request: PageRequest,
        result: Result<ProductPage, CatalogError>,
    },
    /// Category discovery finished.
    CategoriesLoaded(Result<Vec<String>, CatalogError>),
    /// A single product for the detail view finished loading.
    ProductLoaded {
        product_id: u64,
        generation: u64,
        result: Result<Product, CatalogError>,
    },
    /// A background task panicked.
    ///
    /// Fields:
    /// - `task`: Name of the task that panicked (e.g., "page_fetch")
    /// - `error`: The panic message extracted from the panic payload
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub client: CatalogClient,

    // Theme
    /// Current theme variant (for cycling).
    pub theme_variant: ThemeVariant,
    /// Active style map for all UI rendering.
    pub theme: StyleMap,

    /// Keybinding registry for action-key mapping with config overrides.
    pub keybindings: KeybindingRegistry,

    // Filters
    pub filters: FilterState,
    pub sort_mode: SortMode,
    /// Highlighted entry of the open sort menu, or `None` when closed.
    pub sort_menu: Option<usize>,

    // Product list
    /// 1-based page of the listing.
    pub current_page: u32,
    /// Last successfully fetched page, in server order.
    pub page: ProductPage,
    /// Index into the derived view.
    pub selected_product: usize,
    pub page_loading: bool,
    /// Key of the most recently issued page fetch.
    pub last_fetch_key: Option<FetchKey>,
    /// Generation counter for page fetches.
    ///
    /// Bumped for every issued request. `PageLoaded` events carrying an older
    /// generation are discarded, so a slow response can never overwrite a
    /// newer one.
    pub page_generation: u64,
    /// Handle to the in-flight page fetch, aborted when superseded.
    pub page_handle: Option<JoinHandle<()>>,

    // Sidebar
    /// Distinct categories in first-seen order.
    pub categories: Vec<String>,
    pub keywords: Vec<String>,
    pub sidebar_selected: usize,
    pub input: Option<InputState>,
    /// Debounce timer for search typing
    pub search_debounce: Option<Instant>,
    /// Search text waiting for the debounce to elapse
    pub pending_search: Option<String>,

    // UI State
    pub view: View,
    pub focus: Focus,

    // Detail view
    pub detail: DetailState,
    /// Generation counter for detail fetches, same scheme as `page_generation`.
    pub detail_generation: u64,
    pub detail_handle: Option<JoinHandle<()>>,
    pub scroll_offset: usize,
    /// Last known detail viewport height, excluding borders.
    pub detail_visible_lines: usize,
    /// Wrapped line count of the last rendered detail page.
    pub detail_content_lines: usize,

    /// Whether the help overlay is currently displayed.
    pub show_help: bool,
    /// Scroll offset in the help screen for long keybinding lists.
    pub help_scroll_offset: usize,

    /// Status message with expiry
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,
}

impl App {
    pub fn new(client: CatalogClient, keywords: Vec<String>) -> Self {
        Self {
            client,
            theme_variant: ThemeVariant::Dark,
            theme: StyleMap::from_palette(&ThemeVariant::Dark.palette()),
            keybindings: KeybindingRegistry::new(),
            filters: FilterState::new(),
            sort_mode: SortMode::All,
            sort_menu: None,
            current_page: 1,
            page: ProductPage::default(),
            selected_product: 0,
            page_loading: false,
            last_fetch_key: None,
            page_generation: 0,
            page_handle: None,
            categories: Vec::new(),
            keywords,
            sidebar_selected: 0,
            input: None,
            search_debounce: None,
            pending_search: None,
            view: View::Browse,
            focus: Focus::Products,
            detail: DetailState::Idle,
            detail_generation: 0,
            detail_handle: None,
            scroll_offset: 0,
            detail_visible_lines: 0,
            detail_content_lines: 0,
            show_help: false,
            help_scroll_offset: 0,
            status_message: None,
            needs_redraw: true,
        }
    }

    /// Resolve a semantic role name to its `Style`.
    ///
    /// Returns `Style::default()` for unknown roles.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    /// Switch to a different theme variant at runtime.
    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant (Dark → Light → Dark).
    ///
    /// Returns the name of the new theme for status display.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    /// Keybinding context for the current mode.
    pub fn key_context(&self) -> Context {
        if self.input.is_some() {
            Context::Input
        } else if self.view == View::Detail {
            Context::Detail
        } else {
            match self.focus {
                Focus::Sidebar => Context::Sidebar,
                Focus::Products => Context::Products,
            }
        }
    }

    // ------------------------------------------------------------------------
    // Page fetching
    // ------------------------------------------------------------------------

    /// Key describing what the listing should currently show.
    pub fn fetch_key(&self) -> FetchKey {
        self.filters.fetch_key(self.current_page)
    }

    /// True when the page, search query or keyword changed since the last
    /// issued fetch (or nothing has been fetched yet).
    pub fn needs_fetch(&self) -> bool {
        self.last_fetch_key.as_ref() != Some(&self.fetch_key())
    }

    /// Start a new page fetch if one is due.
    ///
    /// Aborts the previous in-flight request, bumps the page generation and
    /// returns the generation and request to run.
    pub fn begin_page_fetch(&mut self) -> Option<(u64, PageRequest)> {
        if !self.needs_fetch() {
            return None;
        }

        if let Some(handle) = self.page_handle.take() {
            handle.abort();
            tracing::debug!("Aborted previous page fetch");
        }

        self.page_generation = self.page_generation.wrapping_add(1);
        self.last_fetch_key = Some(self.fetch_key());
        self.page_loading = true;

        let request = PageRequest::new(
            self.current_page,
            ITEMS_PER_PAGE,
            self.filters.search_term(),
        );
        tracing::debug!(
            page = request.page,
            skip = request.skip(),
            search = ?request.search,
            generation = self.page_generation,
            "Starting page fetch"
        );
        Some((self.page_generation, request))
    }

    /// Apply a finished page fetch.
    ///
    /// Returns `false` when the response was stale and ignored. On success
    /// the page is replaced wholesale; if the request carried a search term
    /// and was not for page 1, the listing jumps back to page 1. Errors are
    /// logged and the previous page stays on screen.
    pub fn apply_page_result(
        &mut self,
        generation: u64,
        request: &PageRequest,
        result: Result<ProductPage, CatalogError>,
    ) -> bool {
        if generation != self.page_generation {
            tracing::debug!(
                generation,
                current = self.page_generation,
                "Discarding stale page response"
            );
            return false;
        }

        self.page_loading = false;
        self.page_handle = None;

        match result {
            Ok(page) => {
                tracing::debug!(
                    count = page.products.len(),
                    total = page.total,
                    page = request.page,
                    "Page loaded"
                );
                self.page = page;
                if request.search.is_some() && request.page != 1 {
                    self.current_page = 1;
                }
                self.clamp_selections();
            }
            Err(e) => {
                tracing::error!(error = %e, page = request.page, "Failed to fetch products");
            }
        }
        true
    }

    /// Store discovered categories, or log the failure.
    pub fn apply_categories(&mut self, result: Result<Vec<String>, CatalogError>) {
        match result {
            Ok(categories) => {
                tracing::info!(count = categories.len(), "Categories loaded");
                self.categories = categories;
                self.clamp_selections();
            }
            Err(e) => tracing::error!(error = %e, "Failed to fetch categories"),
        }
    }

    // ------------------------------------------------------------------------
    // Derived view and pagination
    // ------------------------------------------------------------------------

    /// The current page after category/price filtering and sorting.
    pub fn derived_view(&self) -> Vec<&Product> {
        filter::derive_view(&self.page.products, &self.filters, self.sort_mode)
    }

    pub fn total_pages(&self) -> u32 {
        filter::total_pages(self.page.total)
    }

    /// Move to `page` if it lies in `1..=total_pages`.
    pub fn go_to_page(&mut self, page: u32) -> bool {
        if !filter::is_valid_page(page, self.total_pages()) {
            return false;
        }
        if page != self.current_page {
            self.current_page = page;
            self.selected_product = 0;
        }
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.current_page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> bool {
        self.go_to_page(self.current_page.saturating_sub(1))
    }

    /// Move to the page on the `button`-th visible page button (1-based).
    pub fn go_to_page_button(&mut self, button: u8) -> bool {
        let buttons = filter::page_buttons(self.current_page, self.total_pages());
        match usize::from(button)
            .checked_sub(1)
            .and_then(|index| buttons.get(index))
        {
            Some(&page) => self.go_to_page(page),
            None => false,
        }
    }

    /// Clear the five filter fields one by one. Sort order is kept.
    pub fn reset_filter_fields(&mut self) {
        self.filters.set_search_query("");
        self.filters.set_selected_category("");
        self.filters.set_min_price(None);
        self.filters.set_max_price(None);
        self.filters.set_keyword("");
        self.pending_search = None;
        self.search_debounce = None;
        self.clamp_selections();
    }

    /// Clear every filter field and the sort order.
    pub fn reset_all_filters(&mut self) {
        self.reset_filter_fields();
        self.sort_mode = SortMode::All;
        self.sort_menu = None;
    }

    // ------------------------------------------------------------------------
    // Sort menu
    // ------------------------------------------------------------------------

    pub fn toggle_sort_menu(&mut self) {
        self.sort_menu = match self.sort_menu {
            Some(_) => None,
            None => Some(
                SortMode::CHOICES
                    .iter()
                    .position(|m| *m == self.sort_mode)
                    .unwrap_or(0),
            ),
        };
    }

    /// Apply the highlighted sort entry and close the menu.
    pub fn choose_sort(&mut self) {
        if let Some(mode) = self
            .sort_menu
            .take()
            .and_then(|i| SortMode::CHOICES.get(i))
        {
            self.sort_mode = *mode;
            self.clamp_selections();
        }
    }

    // ------------------------------------------------------------------------
    // Sidebar
    // ------------------------------------------------------------------------

    pub fn sidebar_items(&self) -> Vec<SidebarItem> {
        let mut items = vec![
            SidebarItem::Search,
            SidebarItem::MinPrice,
            SidebarItem::MaxPrice,
        ];
        items.extend((0..self.categories.len()).map(SidebarItem::Category));
        items.extend((0..self.keywords.len()).map(SidebarItem::Keyword));
        items.push(SidebarItem::ResetFilters);
        items
    }

    pub fn selected_sidebar_item(&self) -> Option<SidebarItem> {
        self.sidebar_items().get(self.sidebar_selected).copied()
    }

    /// Activate the highlighted sidebar row.
    pub fn activate_sidebar_item(&mut self) {
        match self.selected_sidebar_item() {
            Some(SidebarItem::Search) => self.begin_input(InputField::Search),
            Some(SidebarItem::MinPrice) => self.begin_input(InputField::MinPrice),
            Some(SidebarItem::MaxPrice) => self.begin_input(InputField::MaxPrice),
            Some(SidebarItem::Category(i)) => {
                if let Some(category) = self.categories.get(i).cloned() {
                    tracing::debug!(category = %category, "Category selected");
                    self.filters.set_selected_category(category);
                    self.clamp_selections();
                }
            }
            Some(SidebarItem::Keyword(i)) => {
                if let Some(keyword) = self.keywords.get(i).cloned() {
                    tracing::debug!(keyword = %keyword, "Keyword selected");
                    self.filters.set_keyword(keyword);
                }
            }
            Some(SidebarItem::ResetFilters) => {
                self.reset_filter_fields();
                self.set_status("Filters reset");
            }
            None => {}
        }
    }

    // ------------------------------------------------------------------------
    // Text input
    // ------------------------------------------------------------------------

    /// Start editing a sidebar field, prefilled with its current value.
    pub fn begin_input(&mut self, field: InputField) {
        let buffer = match field {
            InputField::Search => self.filters.search_query().to_string(),
            InputField::MinPrice => price_to_input(self.filters.min_price()),
            InputField::MaxPrice => price_to_input(self.filters.max_price()),
        };
        self.sort_menu = None;
        self.input = Some(InputState { field, buffer });
    }

    pub fn input_push(&mut self, c: char) {
        if let Some(input) = self.input.as_mut() {
            input.buffer.push(c);
        }
        self.schedule_search();
    }

    pub fn input_backspace(&mut self) {
        if let Some(input) = self.input.as_mut() {
            input.buffer.pop();
        }
        self.schedule_search();
    }

    /// Restart the search debounce after an edit of the search box.
    fn schedule_search(&mut self) {
        if let Some(InputState {
            field: InputField::Search,
            buffer,
        }) = &self.input
        {
            self.pending_search = Some(buffer.clone());
            self.search_debounce = Some(Instant::now());
        }
    }

    /// Apply the debounced search text, if any.
    pub fn apply_pending_search(&mut self) {
        self.search_debounce = None;
        if let Some(query) = self.pending_search.take() {
            self.apply_search_query(query);
        }
    }

    /// Write the search query into the filter state, rejecting overlong input.
    pub fn apply_search_query(&mut self, query: String) -> bool {
        if query.len() > MAX_SEARCH_QUERY_LENGTH {
            self.set_status(format!(
                "Search query too long (max {} chars)",
                MAX_SEARCH_QUERY_LENGTH
            ));
            return false;
        }
        if query != self.filters.search_query() {
            tracing::debug!(query = %query, "Search query changed");
            self.filters.set_search_query(query);
        }
        true
    }

    /// Commit the edited field.
    ///
    /// Returns `false` and keeps editing when the value is rejected.
    pub fn commit_input(&mut self) -> bool {
        let Some(input) = self.input.take() else {
            return true;
        };

        match input.field {
            InputField::Search => {
                self.pending_search = None;
                self.search_debounce = None;
                if !self.apply_search_query(input.buffer.clone()) {
                    self.input = Some(input);
                    return false;
                }
            }
            InputField::MinPrice | InputField::MaxPrice => match parse_price(&input.buffer) {
                Ok(price) => {
                    if input.field == InputField::MinPrice {
                        self.filters.set_min_price(price);
                    } else {
                        self.filters.set_max_price(price);
                    }
                }
                Err(e) => {
                    self.set_status(e.to_string());
                    self.input = Some(input);
                    return false;
                }
            },
        }
        self.clamp_selections();
        true
    }

    /// Leave the field without applying unsent edits.
    pub fn cancel_input(&mut self) {
        self.input = None;
        self.pending_search = None;
        self.search_debounce = None;
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// Keep selection indices inside their lists.
    pub fn clamp_selections(&mut self) {
        let view_len = self.derived_view().len();
        self.selected_product = self.selected_product.min(view_len.saturating_sub(1));
        let sidebar_len = self.sidebar_items().len();
        self.sidebar_selected = self.sidebar_selected.min(sidebar_len.saturating_sub(1));
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Sidebar => Focus::Products,
            Focus::Products => Focus::Sidebar,
        };
        self.sort_menu = None;
    }

    /// Navigate up in current list
    pub fn nav_up(&mut self) {
        if let Some(i) = self.sort_menu.as_mut() {
            *i = i.saturating_sub(1);
            return;
        }
        match self.focus {
            Focus::Sidebar => self.sidebar_selected = self.sidebar_selected.saturating_sub(1),
            Focus::Products => self.selected_product = self.selected_product.saturating_sub(1),
        }
    }

    /// Navigate down in current list
    pub fn nav_down(&mut self) {
        if let Some(i) = self.sort_menu.as_mut() {
            *i = (*i + 1).min(SortMode::CHOICES.len() - 1);
            return;
        }
        match self.focus {
            Focus::Sidebar => {
                let max_index = self.sidebar_items().len().saturating_sub(1);
                self.sidebar_selected = self.sidebar_selected.saturating_add(1).min(max_index);
            }
            Focus::Products => {
                let max_index = self.derived_view().len().saturating_sub(1);
                self.selected_product = self.selected_product.saturating_add(1).min(max_index);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Detail view
    // ------------------------------------------------------------------------

    /// Enter the detail view for the selected product.
    ///
    /// Returns the product id to fetch.
    pub fn open_selected_product(&mut self) -> Option<u64> {
        let product_id = self.derived_view().get(self.selected_product)?.id;
        self.view = View::Detail;
        self.scroll_offset = 0;
        self.detail_content_lines = 0;
        Some(product_id)
    }

    /// Start a detail fetch, superseding any in-flight one.
    pub fn begin_detail_fetch(&mut self, product_id: u64) -> u64 {
        if let Some(handle) = self.detail_handle.take() {
            handle.abort();
            tracing::debug!("Aborted previous product fetch");
        }
        self.detail_generation = self.detail_generation.wrapping_add(1);
        self.detail = DetailState::Loading { product_id };
        tracing::debug!(
            product_id,
            generation = self.detail_generation,
            "Starting product fetch"
        );
        self.detail_generation
    }

    /// Apply a finished detail fetch. Returns `false` for stale responses.
    pub fn apply_detail_result(
        &mut self,
        product_id: u64,
        generation: u64,
        result: Result<Product, CatalogError>,
    ) -> bool {
        if generation != self.detail_generation
            || self.detail != (DetailState::Loading { product_id })
        {
            tracing::debug!(
                product_id,
                generation,
                current = self.detail_generation,
                "Discarding stale product response"
            );
            return false;
        }

        self.detail_handle = None;
        match result {
            Ok(product) => self.detail = DetailState::Loaded(Box::new(product)),
            Err(e) => tracing::error!(product_id, error = %e, "Failed to fetch product"),
        }
        true
    }

    /// Back to products; filters, page and selection are untouched.
    pub fn exit_detail(&mut self) {
        if let Some(handle) = self.detail_handle.take() {
            handle.abort();
            tracing::debug!("Aborted product fetch on detail exit");
        }
        self.view = View::Browse;
        self.detail = DetailState::Idle;
        self.scroll_offset = 0;
    }

    pub fn detail_product(&self) -> Option<&Product> {
        match &self.detail {
            DetailState::Loaded(product) => Some(product),
            _ => None,
        }
    }

    /// Scroll up in detail view
    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    /// Scroll down in detail view, clamped to the last rendered content.
    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
        self.clamp_scroll();
    }

    pub fn clamp_scroll(&mut self) {
        let max_scroll = self
            .detail_content_lines
            .saturating_sub(self.detail_visible_lines);
        self.scroll_offset = self.scroll_offset.min(max_scroll).min(MAX_SCROLL);
    }

    // ------------------------------------------------------------------------
    // Status bar
    // ------------------------------------------------------------------------

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

// ============================================================================
// Resource Cleanup
// ============================================================================

/// Abort all in-flight fetches on App drop.
impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.page_handle.take() {
            handle.abort();
            tracing::debug!("Aborted page fetch on App drop");
        }
        if let Some(handle) = self.detail_handle.take() {
            handle.abort();
            tracing::debug!("Aborted product fetch on App drop");
        }
    }
}
