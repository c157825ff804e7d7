//! Keyboard reference overlay, opened with `?`.
//!
//! Keys are listed in the order a shopper meets them: the product grid, the
//! filter sidebar, a product page, then text entry. Keys bound to the same
//! action share one row, and user overrides from config show up as bound.

use crate::app::App;
use crate::keybindings::Context;
use crate::util::display_width;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const SECTIONS: [(Context, &str); 5] = [
    (Context::Products, "Browsing products"),
    (Context::Sidebar, "Filter sidebar"),
    (Context::Detail, "Product page"),
    (Context::Input, "Editing search or price"),
    (Context::Global, "General"),
];

/// Width of the key column, including its indent.
const KEY_COLUMN: usize = 22;
const MAX_WIDTH: u16 = 64;

/// One row of the reference: every key for an action within a section.
struct Entry {
    keys: Vec<String>,
    description: &'static str,
}

fn section_entries(app: &App, context: Context) -> Vec<Entry> {
    let mut entries: Vec<Entry> = Vec::new();
    for (ctx, key, _, description) in app.keybindings.all_bindings() {
        if ctx != context {
            continue;
        }
        match entries.iter_mut().find(|e| e.description == description) {
            Some(entry) => entry.keys.push(key),
            None => entries.push(Entry {
                keys: vec![key],
                description,
            }),
        }
    }
    entries
}

/// Join keys for display; a run of consecutive digits collapses to `1-5`.
fn key_label(keys: &[String]) -> String {
    let digits: Option<Vec<u32>> = keys
        .iter()
        .map(|k| {
            let mut chars = k.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => c.to_digit(10),
                _ => None,
            }
        })
        .collect();

    if let Some(digits) = digits {
        if digits.len() > 2 && digits.windows(2).all(|w| w[1] == w[0] + 1) {
            return format!("{}-{}", digits[0], digits[digits.len() - 1]);
        }
    }
    keys.join(" / ")
}

/// Every line of the reference, before scrolling.
fn help_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (context, heading) in SECTIONS {
        let entries = section_entries(app, context);
        if entries.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(heading, app.style("sidebar_heading"))));

        for entry in entries {
            let keys = format!("  {}", key_label(&entry.keys));
            let pad = KEY_COLUMN.saturating_sub(display_width(&keys)).max(1);
            lines.push(Line::from(vec![
                Span::styled(keys, app.style("page_current")),
                Span::raw(" ".repeat(pad)),
                Span::raw(entry.description),
            ]));
        }
    }
    lines
}

/// Draw the reference centered over whatever view is showing.
pub fn render(f: &mut Frame, app: &App) {
    let lines = help_lines(app);
    let area = overlay_area(f.area(), lines.len());
    if area.width < 24 || area.height < 6 {
        return;
    }

    let visible = usize::from(area.height.saturating_sub(2));
    let max_scroll = lines.len().saturating_sub(visible);
    let scroll = app.help_scroll_offset.min(max_scroll);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border_focused"))
        .title(" Keys ")
        .title_bottom(Line::from(" ? or Esc closes ").right_aligned());
    if max_scroll > 0 {
        block = block.title(
            Line::from(format!(" j/k {}/{} ", scroll + 1, max_scroll + 1)).right_aligned(),
        );
    }

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .style(app.style("detail_body"))
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0)),
        area,
    );
}

/// Centered box sized to the content, leaving a one-row margin.
fn overlay_area(area: Rect, line_count: usize) -> Rect {
    let width = area.width.saturating_sub(4).min(MAX_WIDTH);
    let wanted = u16::try_from(line_count.saturating_add(2)).unwrap_or(u16::MAX);
    let height = area.height.saturating_sub(2).min(wanted);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
