//! Filter state and the derived product view.
//!
//! - [`FilterState`]: the five user-controlled filter fields
//! - [`derive_view`]: page-local category/price filtering plus [`SortMode`]
//! - [`pagination`]: page math and the page-button window

pub mod derive;
pub mod pagination;
pub mod state;

pub use derive::{derive_view, SortMode};
pub use pagination::{is_valid_page, page_buttons, total_pages, ITEMS_PER_PAGE};
pub use state::{FetchKey, FilterState};
