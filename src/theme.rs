//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes,
//! and `StyleMap` resolves role names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
///
/// Each field corresponds to a specific visual element in the TUI.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Product cards --
    pub product_title: Style,
    pub product_selected: Style,
    pub product_price: Style,
    pub product_rating: Style,
    pub product_category: Style,

    // -- Filter sidebar --
    pub sidebar_heading: Style,
    pub sidebar_selected: Style,
    pub option_active: Style,
    pub input_active: Style,
    pub input_placeholder: Style,

    // -- Pagination + sort --
    pub page_current: Style,
    pub page_other: Style,
    pub page_disabled: Style,
    pub menu_selected: Style,
    pub empty_state: Style,

    // -- Detail view --
    pub detail_heading: Style,
    pub detail_body: Style,
    pub detail_metadata: Style,
    pub detail_price: Style,
    pub detail_button: Style,
    pub detail_link: Style,
    pub detail_review_author: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            // Product cards
            product_title: Style::default().add_modifier(Modifier::BOLD),
            product_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            product_price: Style::default().fg(Color::Green),
            product_rating: Style::default().fg(Color::Yellow),
            product_category: Style::default().fg(Color::Gray),

            // Sidebar
            sidebar_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            sidebar_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            option_active: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            input_active: Style::default().fg(Color::Yellow),
            input_placeholder: Style::default().fg(Color::DarkGray),

            // Pagination + sort
            page_current: Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            page_other: Style::default().fg(Color::White),
            page_disabled: Style::default().fg(Color::DarkGray),
            menu_selected: Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            empty_state: Style::default().fg(Color::Gray),

            // Detail
            detail_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            detail_body: Style::default(),
            detail_metadata: Style::default().fg(Color::DarkGray),
            detail_price: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            detail_button: Style::default().bg(Color::Blue).fg(Color::White),
            detail_link: Style::default().fg(Color::Blue),
            detail_review_author: Style::default().add_modifier(Modifier::BOLD),

            // Chrome
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
        }
    }

    /// Light palette, adapted for light terminal backgrounds.
    fn light() -> Self {
        Self {
            // Product cards
            product_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            product_selected: Style::default().bg(Color::Blue).fg(Color::White),
            product_price: Style::default().fg(Color::Green),
            product_rating: Style::default().fg(Color::Magenta),
            product_category: Style::default().fg(Color::DarkGray),

            // Sidebar
            sidebar_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            sidebar_selected: Style::default().bg(Color::Blue).fg(Color::White),
            option_active: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            input_active: Style::default().fg(Color::Magenta),
            input_placeholder: Style::default().fg(Color::Gray),

            // Pagination + sort
            page_current: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            page_other: Style::default().fg(Color::Black),
            page_disabled: Style::default().fg(Color::Gray),
            menu_selected: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            empty_state: Style::default().fg(Color::DarkGray),

            // Detail
            detail_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            detail_body: Style::default().fg(Color::Black),
            detail_metadata: Style::default().fg(Color::DarkGray),
            detail_price: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            detail_button: Style::default().bg(Color::Black).fg(Color::White),
            detail_link: Style::default().fg(Color::Blue),
            detail_review_author: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            // Chrome
            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
        }
    }
}

// ============================================================================
// Style Map (string-keyed lookup)
// ============================================================================

/// String-keyed style lookup.
///
/// Built from a `ColorPalette`, this allows resolving role names (e.g.
/// `"detail_heading"`) to their concrete `Style` at runtime.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 25] = [
    "product_title",
    "product_selected",
    "product_price",
    "product_rating",
    "product_category",
    "sidebar_heading",
    "sidebar_selected",
    "option_active",
    "input_active",
    "input_placeholder",
    "page_current",
    "page_other",
    "page_disabled",
    "menu_selected",
    "empty_state",
    "detail_heading",
    "detail_body",
    "detail_metadata",
    "detail_price",
    "detail_button",
    "detail_link",
    "detail_review_author",
    "status_bar",
    "panel_border",
    "panel_border_focused",
];

impl StyleMap {
    /// Build a `StyleMap` from a `ColorPalette`.
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 25] = [
            p.product_title,
            p.product_selected,
            p.product_price,
            p.product_rating,
            p.product_category,
            p.sidebar_heading,
            p.sidebar_selected,
            p.option_active,
            p.input_active,
            p.input_placeholder,
            p.page_current,
            p.page_other,
            p.page_disabled,
            p.menu_selected,
            p.empty_state,
            p.detail_heading,
            p.detail_body,
            p.detail_metadata,
            p.detail_price,
            p.detail_button,
            p.detail_link,
            p.detail_review_author,
            p.status_bar,
            p.panel_border,
            p.panel_border_focused,
        ];

        let map = ROLE_NAMES
            .iter()
            .zip(styles.iter())
            .map(|(name, style)| (*name, *style))
            .collect();

        Self { map }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================
