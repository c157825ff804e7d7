use crate::app::{App, Focus};
use crate::catalog::Product;
use crate::filter;
use crate::util::{capitalize_first, format_price, strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Narrowest a product card may get before the grid drops a column.
const CARD_MIN_WIDTH: u16 = 24;
/// Card height including borders: title, price, rating, category.
const CARD_HEIGHT: u16 = 6;

/// Render the product panel: card grid, empty state and pagination.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let is_focused = app.focus == Focus::Products;
    let border_style = if is_focused {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };

    let sort_title = Line::from(format!(" {} ▾ ", app.sort_mode.header_label())).right_aligned();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Our Products ")
        .title_top(sort_title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let view = app.derived_view();

    if view.is_empty() {
        if app.page_loading && app.page.products.is_empty() {
            let loading = Paragraph::new("Loading...")
                .style(app.style("empty_state"))
                .alignment(Alignment::Center);
            f.render_widget(loading, inner);
        } else {
            render_empty_state(f, app, inner);
        }
        return;
    }

    let total_pages = app.total_pages();
    let (grid_area, pagination_area) = if total_pages > 1 && inner.height > 2 {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);
        (chunks[0], Some(chunks[1]))
    } else {
        (inner, None)
    };

    render_grid(f, app, &view, grid_area, is_focused);

    if let Some(bar) = pagination_area {
        f.render_widget(
            Paragraph::new(pagination_line(app, total_pages)).alignment(Alignment::Center),
            bar,
        );
    }
}

/// Cards laid out left to right, scrolled so the selected card stays visible.
fn render_grid(f: &mut Frame, app: &App, view: &[&Product], area: Rect, is_focused: bool) {
    let columns = (area.width / CARD_MIN_WIDTH).max(1);
    let visible_rows = (area.height / CARD_HEIGHT).max(1);
    let card_width = area.width / columns;

    let selected_row = (app.selected_product / usize::from(columns)) as u16;
    let first_row = selected_row.saturating_sub(visible_rows - 1);

    for (i, product) in view.iter().enumerate() {
        let row = (i / usize::from(columns)) as u16;
        if row < first_row {
            continue;
        }
        let row = row - first_row;
        if row >= visible_rows {
            break;
        }
        let col = (i % usize::from(columns)) as u16;
        let card = Rect::new(
            area.x + col * card_width,
            area.y + row * CARD_HEIGHT,
            card_width,
            CARD_HEIGHT.min(area.height.saturating_sub(row * CARD_HEIGHT)),
        );
        let is_selected = is_focused && i == app.selected_product;
        render_card(f, app, product, card, is_selected);
    }
}

fn render_card(f: &mut Frame, app: &App, product: &Product, area: Rect, is_selected: bool) {
    let width = area.width.saturating_sub(2) as usize;
    let title = strip_control_chars(&product.title);

    let mut lines = vec![
        Line::from(Span::styled(
            truncate_to_width(&title, width).into_owned(),
            app.style("product_title"),
        )),
        Line::from(Span::styled(
            format_price(product.price),
            app.style("product_price"),
        )),
    ];
    if product.rating > 0.0 {
        lines.push(Line::from(Span::styled(
            format!("★ {:.1}", product.rating),
            app.style("product_rating"),
        )));
    } else {
        lines.push(Line::from(""));
    }
    if !product.category.is_empty() {
        let category = capitalize_first(&strip_control_chars(&product.category));
        lines.push(Line::from(Span::styled(
            truncate_to_width(&category, width).into_owned(),
            app.style("product_category"),
        )));
    }

    let border_style = if is_selected {
        app.style("product_selected")
    } else {
        app.style("panel_border")
    };
    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    f.render_widget(card, area);
}

fn render_empty_state(f: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("No products found", app.style("detail_heading"))),
        Line::from(""),
        Line::from(Span::styled(
            "Try adjusting your search or filter to find what you're looking for.",
            app.style("empty_state"),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[ Reset all filters ]",
            app.style("detail_button"),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// "Previous 1 2 3 4 5 Next" with the ends disabled on the first and last page.
fn pagination_line(app: &App, total_pages: u32) -> Line<'static> {
    let current = app.current_page;
    let edge_style = |enabled: bool| {
        if enabled {
            app.style("page_other")
        } else {
            app.style("page_disabled")
        }
    };

    let mut spans = vec![
        Span::styled("‹ Previous", edge_style(current > 1)),
        Span::raw("  "),
    ];
    for page in filter::page_buttons(current, total_pages) {
        let style = if page == current {
            app.style("page_current")
        } else {
            app.style("page_other")
        };
        spans.push(Span::styled(format!(" {} ", page), style));
    }
    spans.push(Span::raw("  "));
    spans.push(Span::styled("Next ›", edge_style(current < total_pages)));
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogClient, ProductPage};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::Duration;
    use url::Url;

    fn test_app() -> App {
        let base = Url::parse("http://127.0.0.1:9").unwrap();
        let client = CatalogClient::new(base, Duration::from_secs(1)).unwrap();
        App::new(client, Vec::new())
    }

    fn page(products: serde_json::Value, total: u64) -> ProductPage {
        ProductPage {
            products: serde_json::from_value(products).unwrap(),
            total,
        }
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
    fn card_shows_price_rating_and_category() {
        let mut app = test_app();
        app.page = page(
            serde_json::json!([
                { "id": 1, "title": "Lipstick", "category": "beauty", "price": 12.5, "rating": 4.56 }
            ]),
            1,
        );
        let screen = draw(&app, 80, 20);
        assert!(screen.contains("Lipstick"));
        assert!(screen.contains("$12.50"));
        assert!(screen.contains("★ 4.6"));
        assert!(screen.contains("Beauty"));
        // Single page: no pagination bar
        assert!(!screen.contains("Previous"));
    }

    #[test]
    fn zero_rating_is_omitted() {
        let mut app = test_app();
        app.page = page(
            serde_json::json!([{ "id": 1, "title": "Unrated", "price": 1.0 }]),
            1,
        );
        let screen = draw(&app, 80, 20);
        assert!(!screen.contains("★"));
    }

    #[test]
    fn loading_shown_before_first_page() {
        let mut app = test_app();
        app.page_loading = true;
        let screen = draw(&app, 80, 20);
        assert!(screen.contains("Loading..."));
        assert!(!screen.contains("No products found"));
    }

    #[test]
    fn header_shows_sort_label() {
        let mut app = test_app();
        assert!(draw(&app, 80, 20).contains("Filter"));
        app.sort_mode = crate::filter::SortMode::PriceHighToLow;
        assert!(draw(&app, 80, 20).contains("price: High to Low"));
    }

    #[test]
    fn last_page_still_renders_controls() {
        let mut app = test_app();
        app.page = page(serde_json::json!([{ "id": 37, "title": "Last", "price": 1.0 }]), 37);
        app.current_page = 4;
        let screen = draw(&app, 100, 20);
        assert!(screen.contains("Previous"));
        assert!(screen.contains(" 4 "));
        assert!(screen.contains("Next"));
    }

    #[test]
    fn pagination_window_follows_current_page() {
        let mut app = test_app();
        app.current_page = 9;
        let line = pagination_line(&app, 17);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains(" 7  8  9  10  11 "));
        assert!(!text.contains(" 6 "));
    }
}
