//! Terminal storefront for a DummyJSON-compatible product API.
//!
//! The binary in `main.rs` wires these modules together; they are exposed as
//! a library so integration tests can drive the catalog client and the
//! filtering logic directly.

pub mod app;
pub mod catalog;
pub mod config;
pub mod filter;
pub mod keybindings;
pub mod logging;
pub mod theme;
pub mod ui;
pub mod util;
