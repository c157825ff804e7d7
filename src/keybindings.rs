//! Keybinding registry mapping key events to actions, with config overrides.
//!
//! Bindings are data: each (context, key) pair resolves to one [`Action`],
//! and users can rebind any action by name from `config.toml`.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    CycleFocus,
    Back,
    Select,
    EnterSearch,
    EditMinPrice,
    EditMaxPrice,
    NextPage,
    PrevPage,
    /// Jump to the page shown on the n-th visible page button (1-based).
    PageButton(u8),
    ToggleSortMenu,
    ResetFilters,
    ResetAll,
    OpenImage,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    ExitDetail,
    CancelInput,
    CommitInput,
    CycleTheme,
    ShowHelp,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavDown => "Navigate down",
            Self::NavUp => "Navigate up",
            Self::CycleFocus => "Switch between filters and products",
            Self::Back => "Close menu / leave input",
            Self::Select => "Select / open product",
            Self::EnterSearch => "Edit search box",
            Self::EditMinPrice => "Edit minimum price",
            Self::EditMaxPrice => "Edit maximum price",
            Self::NextPage => "Next page",
            Self::PrevPage => "Previous page",
            Self::PageButton(_) => "Jump to visible page button",
            Self::ToggleSortMenu => "Open sort menu",
            Self::ResetFilters => "Reset filters",
            Self::ResetAll => "Reset filters and sort order",
            Self::OpenImage => "Open product image in browser",
            Self::ScrollDown => "Scroll down one line",
            Self::ScrollUp => "Scroll up one line",
            Self::PageDown => "Scroll down one page",
            Self::PageUp => "Scroll up one page",
            Self::ExitDetail => "Back to products",
            Self::CancelInput => "Discard input",
            Self::CommitInput => "Apply input",
            Self::CycleTheme => "Cycle theme",
            Self::ShowHelp => "Show help",
        }
    }
}

/// Parse an action name string (from config) into an Action.
fn parse_action_name(name: &str) -> Option<Action> {
    let action = match name.to_lowercase().replace('-', "_").as_str() {
        "quit" => Action::Quit,
        "nav_down" | "down" => Action::NavDown,
        "nav_up" | "up" => Action::NavUp,
        "cycle_focus" | "focus" => Action::CycleFocus,
        "back" => Action::Back,
        "select" | "open" => Action::Select,
        "enter_search" | "search" => Action::EnterSearch,
        "edit_min_price" | "min_price" => Action::EditMinPrice,
        "edit_max_price" | "max_price" => Action::EditMaxPrice,
        "next_page" => Action::NextPage,
        "prev_page" | "previous_page" => Action::PrevPage,
        "page_button_1" => Action::PageButton(1),
        "page_button_2" => Action::PageButton(2),
        "page_button_3" => Action::PageButton(3),
        "page_button_4" => Action::PageButton(4),
        "page_button_5" => Action::PageButton(5),
        "toggle_sort_menu" | "sort" => Action::ToggleSortMenu,
        "reset_filters" | "reset" => Action::ResetFilters,
        "reset_all" => Action::ResetAll,
        "open_image" | "open_in_browser" => Action::OpenImage,
        "scroll_down" => Action::ScrollDown,
        "scroll_up" => Action::ScrollUp,
        "page_down" => Action::PageDown,
        "page_up" => Action::PageUp,
        "exit_detail" => Action::ExitDetail,
        "cancel_input" => Action::CancelInput,
        "commit_input" => Action::CommitInput,
        "cycle_theme" | "theme" => Action::CycleTheme,
        "show_help" | "help" => Action::ShowHelp,
        _ => return None,
    };
    Some(action)
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context: determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    Sidebar,
    Products,
    Detail,
    Input,
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "/"
/// - Named keys: "Enter", "Esc", "Tab", "Up", "Down", "Left", "Right",
///   "Backspace", "Space", "PageUp", "PageDown"
/// - Ctrl combos: "Ctrl+d"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::ctrl(c)),
            _ => None,
        };
    }

    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "backspace" => Some(KeyCode::Backspace),
        "pageup" => Some(KeyCode::PageUp),
        "pagedown" => Some(KeyCode::PageDown),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(n) = s
        .strip_prefix(['F', 'f'])
        .and_then(|n| n.parse::<u8>().ok())
    {
        return (1..=12).contains(&n).then(|| KeySpec::plain(KeyCode::F(n)));
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::char(c)),
        _ => None,
    }
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

const DEFAULT_BINDINGS: &[(Context, KeySpec, Action)] = &[
    // General
    (Context::Global, KeySpec::char('q'), Action::Quit),
    (Context::Global, KeySpec::char('j'), Action::NavDown),
    (Context::Global, KeySpec::plain(KeyCode::Down), Action::NavDown),
    (Context::Global, KeySpec::char('k'), Action::NavUp),
    (Context::Global, KeySpec::plain(KeyCode::Up), Action::NavUp),
    (Context::Global, KeySpec::plain(KeyCode::Tab), Action::CycleFocus),
    (Context::Global, KeySpec::plain(KeyCode::Esc), Action::Back),
    (Context::Global, KeySpec::plain(KeyCode::Enter), Action::Select),
    (Context::Global, KeySpec::char('/'), Action::EnterSearch),
    (Context::Global, KeySpec::char('['), Action::EditMinPrice),
    (Context::Global, KeySpec::char(']'), Action::EditMaxPrice),
    (Context::Global, KeySpec::char('x'), Action::ResetFilters),
    (Context::Global, KeySpec::char('T'), Action::CycleTheme),
    (Context::Global, KeySpec::char('?'), Action::ShowHelp),
    // Product grid
    (Context::Products, KeySpec::char('n'), Action::NextPage),
    (Context::Products, KeySpec::plain(KeyCode::Right), Action::NextPage),
    (Context::Products, KeySpec::char('p'), Action::PrevPage),
    (Context::Products, KeySpec::plain(KeyCode::Left), Action::PrevPage),
    (Context::Products, KeySpec::char('1'), Action::PageButton(1)),
    (Context::Products, KeySpec::char('2'), Action::PageButton(2)),
    (Context::Products, KeySpec::char('3'), Action::PageButton(3)),
    (Context::Products, KeySpec::char('4'), Action::PageButton(4)),
    (Context::Products, KeySpec::char('5'), Action::PageButton(5)),
    (Context::Products, KeySpec::char('s'), Action::ToggleSortMenu),
    (Context::Products, KeySpec::char('X'), Action::ResetAll),
    // Detail view
    (Context::Detail, KeySpec::char('q'), Action::Quit),
    (Context::Detail, KeySpec::char('b'), Action::ExitDetail),
    (Context::Detail, KeySpec::plain(KeyCode::Esc), Action::ExitDetail),
    (Context::Detail, KeySpec::char('j'), Action::ScrollDown),
    (Context::Detail, KeySpec::plain(KeyCode::Down), Action::ScrollDown),
    (Context::Detail, KeySpec::char('k'), Action::ScrollUp),
    (Context::Detail, KeySpec::plain(KeyCode::Up), Action::ScrollUp),
    (Context::Detail, KeySpec::ctrl('d'), Action::PageDown),
    (Context::Detail, KeySpec::plain(KeyCode::PageDown), Action::PageDown),
    (Context::Detail, KeySpec::ctrl('u'), Action::PageUp),
    (Context::Detail, KeySpec::plain(KeyCode::PageUp), Action::PageUp),
    (Context::Detail, KeySpec::char('o'), Action::OpenImage),
    // Text input
    (Context::Input, KeySpec::plain(KeyCode::Esc), Action::CancelInput),
    (Context::Input, KeySpec::plain(KeyCode::Enter), Action::CommitInput),
];

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// Lookup is O(1) via HashMap. The same key can map to different actions in
/// different contexts; lookups fall back to [`Context::Global`].
pub struct KeybindingRegistry {
    /// Primary lookup: (Context, KeySpec) -> Action
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings in registration order, for the help screen
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    /// Create a registry with the default bindings.
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        for &(context, key, action) in DEFAULT_BINDINGS {
            registry.bind(context, key, action);
        }
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    /// Apply user overrides from the config `[keybindings]` table.
    ///
    /// Keys in the map are action names (e.g., "quit", "next_page").
    /// Values are key strings (e.g., "q", "Ctrl+d", "F5"). The new key
    /// replaces every existing key for that action, in the same contexts.
    ///
    /// Returns a list of warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };
            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = self
                .bindings
                .iter()
                .filter(|(_, _, a)| *a == action)
                .map(|(c, _, _)| *c)
                .collect();
            contexts.dedup();

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a given key in a given context.
    ///
    /// Tries the specific context first, then falls back to Global.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers);
        self.lookup
            .get(&(context, key))
            .or_else(|| self.lookup.get(&(Context::Global, key)))
            .copied()
    }

    /// Get all bindings for the help screen.
    ///
    /// Returns (context, key_display_string, action, description) tuples.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
