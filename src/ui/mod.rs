//! Terminal User Interface module.
//!
//! This module provides the TUI for the storefront, including:
//! - Main event loop (`run`)
//! - Input handling for browsing, text entry and the detail page
//! - Rendering for the filter sidebar, product grid and detail views
//! - Background fetch tasks and their event processing
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `helpers` - Fetch task spawning and shared actions
//! - `render` - View rendering dispatch
//! - `sidebar` - Filter sidebar widget
//! - `products` - Product grid, empty state and pagination
//! - `detail` - Product detail page
//! - `help` - Keybinding overlay
//! - `status` - Status bar widget

mod detail;
mod events;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod products;
mod render;
mod sidebar;
mod status;

// Re-export the public API
pub use detail::format_relative;
pub use helpers::{spawn_category_fetch, spawn_page_fetch, spawn_product_fetch, sync_page_fetch};
pub use loop_runner::{run, Action};
