use crate::app::{price_to_input, App, Focus, InputField, SidebarItem};
use crate::util::{capitalize_first, strip_control_chars, truncate_to_width};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Render the filter sidebar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let is_focused = app.focus == Focus::Sidebar;
    let inner_width = area.width.saturating_sub(2) as usize;
    let selected = app.selected_sidebar_item();

    let mut items: Vec<ListItem> = Vec::new();
    // List row of the highlighted sidebar item, for scrolling
    let mut selected_row = None;

    for item in app.sidebar_items() {
        if item == SidebarItem::ResetFilters {
            items.push(ListItem::new(""));
        }
        if let Some(heading) = heading_before(item) {
            if !items.is_empty() {
                items.push(ListItem::new(""));
            }
            items.push(ListItem::new(Line::from(Span::styled(
                heading,
                app.style("sidebar_heading"),
            ))));
        }

        let is_selected = is_focused && selected == Some(item);
        if is_selected {
            selected_row = Some(items.len());
        }

        let line = item_line(app, item, is_selected, inner_width);
        items.push(ListItem::new(line));
    }

    let border_style = if is_focused {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Filters "),
    );

    let mut state = ListState::default().with_selected(selected_row);
    f.render_stateful_widget(list, area, &mut state);
}

/// Section heading shown above the first row of each group.
fn heading_before(item: SidebarItem) -> Option<&'static str> {
    match item {
        SidebarItem::Search => Some("Search"),
        SidebarItem::MinPrice => Some("Price Range"),
        SidebarItem::Category(0) => Some("Categories"),
        SidebarItem::Keyword(0) => Some("Popular Keywords"),
        _ => None,
    }
}

fn item_line(app: &App, item: SidebarItem, is_selected: bool, width: usize) -> Line<'static> {
    let selected_style = app.style("sidebar_selected");

    let (text, style): (String, Style) = match item {
        SidebarItem::Search => field_text(app, InputField::Search, app.filters.search_query()),
        SidebarItem::MinPrice => {
            let value = price_to_input(app.filters.min_price());
            let (text, style) = field_text(app, InputField::MinPrice, &value);
            (format!("Min: {}", text), style)
        }
        SidebarItem::MaxPrice => {
            let value = price_to_input(app.filters.max_price());
            let (text, style) = field_text(app, InputField::MaxPrice, &value);
            (format!("Max: {}", text), style)
        }
        SidebarItem::Category(i) => {
            let category = app.categories.get(i).map(String::as_str).unwrap_or("");
            let active = !category.is_empty() && app.filters.selected_category() == category;
            let marker = if active { "(•)" } else { "( )" };
            let style = if active {
                app.style("option_active")
            } else {
                Style::default()
            };
            (
                format!("{} {}", marker, capitalize_first(&strip_control_chars(category))),
                style,
            )
        }
        SidebarItem::Keyword(i) => {
            let keyword = app.keywords.get(i).map(String::as_str).unwrap_or("");
            let style = if !keyword.is_empty() && app.filters.keyword() == keyword {
                app.style("option_active")
            } else {
                Style::default()
            };
            (format!("# {}", strip_control_chars(keyword)), style)
        }
        SidebarItem::ResetFilters => ("[ Reset Filters ]".to_string(), Style::default()),
    };

    let text = truncate_to_width(&text, width).into_owned();
    let style = if is_selected {
        style.patch(selected_style)
    } else {
        style
    };
    Line::from(Span::styled(text, style))
}

/// Text for an editable field: the live buffer while editing, the committed
/// value otherwise, or the placeholder when empty.
fn field_text(app: &App, field: InputField, committed: &str) -> (String, Style) {
    if let Some(input) = app.input.as_ref().filter(|i| i.field == field) {
        return (format!("{}_", input.buffer), app.style("input_active"));
    }
    if committed.is_empty() {
        (field.placeholder().to_string(), app.style("input_placeholder"))
    } else {
        (strip_control_chars(committed).into_owned(), Style::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogClient;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::Duration;
    use url::Url;

    fn test_app() -> App {
        let base = Url::parse("http://127.0.0.1:9").unwrap();
        let client = CatalogClient::new(base, Duration::from_secs(1)).unwrap();
        let mut app = App::new(client, vec!["Apple".to_string(), "Watch".to_string()]);
        app.apply_categories(Ok(vec!["beauty".into(), "groceries".into()]));
        app
    }

    fn draw(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render(f, app, area)
            })
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn shows_sections_and_placeholders() {
        let app = test_app();
        let screen = draw(&app, 30, 30);
        assert!(screen.contains("Search products..."));
        assert!(screen.contains("Price Range"));
        assert!(screen.contains("Min: Min"));
        assert!(screen.contains("( ) Beauty"));
        assert!(screen.contains("Popular Keywords"));
        assert!(screen.contains("# Watch"));
        assert!(screen.contains("[ Reset Filters ]"));
    }

    #[test]
    fn active_category_and_edit_buffer_render() {
        let mut app = test_app();
        app.filters.set_selected_category("groceries");
        app.begin_input(InputField::Search);
        app.input_push('t');
        let screen = draw(&app, 30, 30);
        assert!(screen.contains("(•) Groceries"));
        assert!(screen.contains("t_"));
    }

    #[test]
    fn committed_prices_show_the_filtering_value() {
        let mut app = test_app();
        app.filters.set_min_price(Some(10.555));
        app.filters.set_max_price(Some(50.0));
        let screen = draw(&app, 30, 30);
        assert!(screen.contains("Min: 10.555"));
        assert!(screen.contains("Max: 50"));
        assert!(!screen.contains("10.56"));
    }
}
