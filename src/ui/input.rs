//! Input handling for the TUI.
//!
//! This module processes keyboard input and dispatches to the appropriate
//! handler based on current view and mode.

use crate::app::{App, AppEvent, Focus, InputField, SidebarItem, View};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::util::MAX_SEARCH_QUERY_LENGTH;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{open_product_image, start_product_fetch};
use super::Action;

/// Main input dispatch function.
///
/// Routes input to the appropriate handler based on current mode and view.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    // Help overlay captures all keys when visible
    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    if app.input.is_some() {
        return Ok(handle_text_input(app, code, modifiers));
    }

    match app.view {
        View::Browse => Ok(handle_browse_input(app, code, modifiers, event_tx)),
        View::Detail => Ok(handle_detail_input(app, code, modifiers)),
    }
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Handle keys shared by every non-input context.
///
/// Returns `None` when the action was not one of the shared ones.
fn handle_common_action(app: &mut App, action: KbAction) -> Option<Action> {
    match action {
        KbAction::Quit => return Some(Action::Quit),
        KbAction::CycleTheme => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        _ => return None,
    }
    Some(Action::Continue)
}

/// Handle input in browse view (sidebar + product grid).
fn handle_browse_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, app.key_context())
    else {
        return Action::Continue;
    };

    if let Some(result) = handle_common_action(app, action) {
        return result;
    }

    match action {
        KbAction::Back => {
            app.sort_menu = None;
        }
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::CycleFocus => app.cycle_focus(),
        KbAction::Select => handle_select(app, event_tx),
        KbAction::EnterSearch => edit_field(app, InputField::Search),
        KbAction::EditMinPrice => edit_field(app, InputField::MinPrice),
        KbAction::EditMaxPrice => edit_field(app, InputField::MaxPrice),
        KbAction::NextPage => {
            if !app.next_page() {
                tracing::debug!(page = app.current_page, "Already on last page");
            }
        }
        KbAction::PrevPage => {
            if !app.prev_page() {
                tracing::debug!(page = app.current_page, "Already on first page");
            }
        }
        KbAction::PageButton(button) => {
            if !app.go_to_page_button(button) {
                tracing::debug!(button, "No such page button");
            }
        }
        KbAction::ToggleSortMenu => app.toggle_sort_menu(),
        KbAction::ResetFilters => {
            app.reset_filter_fields();
            app.set_status("Filters reset");
        }
        KbAction::ResetAll => {
            app.reset_all_filters();
            app.set_status("All filters reset");
        }
        _ => {}
    }
    Action::Continue
}

/// Enter: choose a sort entry, activate a sidebar row, or open a product.
fn handle_select(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    if app.sort_menu.is_some() {
        app.choose_sort();
        return;
    }

    match app.focus {
        Focus::Sidebar => app.activate_sidebar_item(),
        Focus::Products => {
            if app.derived_view().is_empty() {
                // Empty-state button
                app.reset_all_filters();
                app.set_status("All filters reset");
            } else if let Some(product_id) = app.open_selected_product() {
                start_product_fetch(app, product_id, event_tx);
            }
        }
    }
}

/// Jump to a sidebar field and start editing it.
fn edit_field(app: &mut App, field: InputField) {
    let item = match field {
        InputField::Search => SidebarItem::Search,
        InputField::MinPrice => SidebarItem::MinPrice,
        InputField::MaxPrice => SidebarItem::MaxPrice,
    };
    if let Some(index) = app.sidebar_items().iter().position(|i| *i == item) {
        app.sidebar_selected = index;
    }
    app.focus = Focus::Sidebar;
    app.begin_input(field);
}

/// Handle keys while a sidebar field is being edited.
fn handle_text_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    match app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Input)
    {
        Some(KbAction::CancelInput) => {
            app.cancel_input();
            return Action::Continue;
        }
        Some(KbAction::CommitInput) => {
            app.commit_input();
            return Action::Continue;
        }
        _ => {}
    }

    match code {
        KeyCode::Backspace => app.input_backspace(),
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) && !c.is_control() => {
            let len = app.input.as_ref().map_or(0, |i| i.buffer.len());
            if len >= MAX_SEARCH_QUERY_LENGTH {
                app.set_status(format!(
                    "Input at max length ({} chars)",
                    MAX_SEARCH_QUERY_LENGTH
                ));
                return Action::Continue;
            }
            app.input_push(c);
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input in the product detail view.
fn handle_detail_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Detail)
    else {
        return Action::Continue;
    };

    if let Some(result) = handle_common_action(app, action) {
        return result;
    }

    let page = app.detail_visible_lines.max(1);
    match action {
        KbAction::ExitDetail => app.exit_detail(),
        KbAction::ScrollDown => app.scroll_down(1),
        KbAction::ScrollUp => app.scroll_up(1),
        KbAction::PageDown => app.scroll_down(page),
        KbAction::PageUp => app.scroll_up(page),
        KbAction::OpenImage => open_product_image(app),
        _ => {}
    }
    Action::Continue
}
