//! Utility functions for common operations.
//!
//! - **URL validation**: API base checks and safe-to-open checks for links
//!   that come from the product API
//! - **Text processing**: Unicode-aware width/truncation, control character
//!   stripping, and small display formatters
//!
//! # Examples
//!
//! ```
//! use storefront::util::{capitalize_first, format_price, truncate_to_width};
//!
//! assert_eq!(capitalize_first("smartphones"), "Smartphones");
//! assert_eq!(format_price(549.0), "$549.00");
//! assert_eq!(truncate_to_width("iPhone 9", 20), "iPhone 9");
//! ```

mod text;
mod url_validator;

pub use text::{
    capitalize_first, display_width, format_price, lowercase_first, strip_control_chars,
    truncate_to_width,
};
pub use url_validator::{validate_api_base, validate_url_for_open, UrlValidationError};

/// Maximum length of the search box contents.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
