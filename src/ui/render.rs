//! Render functions for the TUI.
//!
//! This module handles all rendering logic, dispatching to the appropriate
//! view based on application state.

use crate::app::{App, View};
use crate::filter::SortMode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{detail, help, products, sidebar, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 12;

/// Width of the filter sidebar in columns.
const SIDEBAR_WIDTH: u16 = 30;

/// Main render dispatch function.
///
/// Routes to the appropriate view renderer based on current application state.
/// Handles terminal size validation before rendering.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    match app.view {
        View::Browse => render_browse(f, app, chunks[0]),
        View::Detail => detail::render(f, app, chunks[0]),
    }
    status::render(f, app, chunks[1]);

    // Help overlay sits on top of any view
    if app.show_help {
        help::render(f, app);
    }
}

/// Render the browse view (sidebar + product grid).
fn render_browse(f: &mut Frame, app: &App, area: Rect) {
    let sidebar_width = SIDEBAR_WIDTH.min(area.width / 2);
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_width), Constraint::Min(0)])
        .split(area);

    sidebar::render(f, app, main_chunks[0]);
    products::render(f, app, main_chunks[1]);

    if let Some(highlighted) = app.sort_menu {
        render_sort_menu(f, app, main_chunks[1], highlighted);
    }
}

/// Render the sort dropdown below the top-right corner of the product panel.
fn render_sort_menu(f: &mut Frame, app: &App, anchor: Rect, highlighted: usize) {
    let width = SortMode::CHOICES
        .iter()
        .map(|m| m.label().len() as u16)
        .max()
        .unwrap_or(0)
        + 6;
    let height = SortMode::CHOICES.len() as u16 + 2;
    if anchor.width < width + 2 || anchor.height < height + 1 {
        return;
    }

    let overlay = Rect::new(
        anchor.x + anchor.width - width - 1,
        anchor.y + 1,
        width,
        height,
    );
    f.render_widget(Clear, overlay);

    let lines: Vec<Line> = SortMode::CHOICES
        .iter()
        .enumerate()
        .map(|(i, mode)| {
            if i == highlighted {
                Line::from(Span::styled(
                    format!("> {}", mode.label()),
                    app.style("menu_selected"),
                ))
            } else {
                Line::from(format!("  {}", mode.label()))
            }
        })
        .collect();

    let menu = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.style("panel_border_focused"))
            .title(" Sort "),
    );
    f.render_widget(menu, overlay);
}
