use crate::app::{App, DetailState, MAX_SCROLL};
use crate::catalog::{Product, Review};
use crate::util::{capitalize_first, display_width, format_price, strip_control_chars};
use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Image links listed under the gallery heading.
const MAX_IMAGE_LINKS: usize = 4;

/// Format a review date relative to `now`, e.g. "3 days ago".
pub fn format_relative(date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(date) = date else {
        return String::new();
    };

    let diff = now.signed_duration_since(date);
    // Future dates (clock skew)
    if diff.num_seconds() < 60 {
        return "just now".to_string();
    }

    let (value, unit) = if diff.num_hours() < 1 {
        (diff.num_minutes(), "minute")
    } else if diff.num_days() < 1 {
        (diff.num_hours(), "hour")
    } else if diff.num_days() < 30 {
        (diff.num_days(), "day")
    } else if diff.num_days() < 365 {
        (diff.num_days() / 30, "month")
    } else {
        (diff.num_days() / 365, "year")
    };

    if value == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", value, unit)
    }
}

/// Five-star bar for a review rating, rounded to whole stars.
fn stars(rating: f64) -> String {
    let filled = rating.round().clamp(0.0, 5.0) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Rows a line occupies once word-wrapped to `width` columns.
fn wrapped_height(line: &Line, width: usize) -> usize {
    if width == 0 {
        return 1;
    }
    let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();

    let mut rows = 1;
    let mut used = 0;
    for word in text.split(' ') {
        let w = display_width(word);
        let needed = if used == 0 { w } else { used + 1 + w };
        if needed <= width {
            used = needed;
        } else if w > width {
            // Long words are broken across rows
            if used > 0 {
                rows += 1;
            }
            rows += (w - 1) / width;
            used = w % width;
        } else {
            rows += 1;
            used = w;
        }
    }
    rows
}

/// Render the product detail page
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    app.detail_visible_lines = area.height.saturating_sub(2) as usize;

    let lines = match &app.detail {
        DetailState::Loaded(product) => product_lines(app, product, Utc::now()),
        DetailState::Loading { .. } | DetailState::Idle => vec![Line::from(Span::styled(
            "Loading...",
            app.style("empty_state"),
        ))],
    };

    app.detail_content_lines = lines.iter().map(|l| wrapped_height(l, inner_width)).sum();
    app.clamp_scroll();

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(" Product "),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset.min(MAX_SCROLL) as u16, 0));

    f.render_widget(paragraph, area);
}

fn product_lines(app: &App, product: &Product, now: DateTime<Utc>) -> Vec<Line<'static>> {
    let heading = app.style("detail_heading");
    let body = app.style("detail_body");
    let meta = app.style("detail_metadata");

    let mut lines = vec![
        Line::from(Span::styled("← Back to products", app.style("detail_link"))),
        Line::from(""),
        Line::from(Span::styled(strip_control_chars(&product.title).into_owned(), heading)),
        Line::from(vec![
            Span::styled(format!("★ {}", product.rating), app.style("product_rating")),
            Span::styled(format!("    SKU: {}", product.id), meta),
        ]),
        Line::from(""),
    ];

    let mut price = vec![Span::styled(format_price(product.price), app.style("detail_price"))];
    if let Some(discount) = product.discount_percentage.filter(|d| *d > 0.0) {
        price.push(Span::styled(format!("  (-{:.0}%)", discount), meta));
    }
    lines.push(Line::from(price));
    lines.push(Line::from(""));

    for paragraph in strip_control_chars(&product.description).lines() {
        lines.push(Line::from(Span::styled(paragraph.to_string(), body)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("[ Add to Cart ]", app.style("detail_button")),
        Span::raw("  "),
        Span::styled("[ ♡ ]", app.style("detail_button")),
    ]));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("Product Details", heading)));
    let brand = product
        .brand
        .as_deref()
        .filter(|b| !b.is_empty())
        .unwrap_or("Generic");
    let category = if product.category.is_empty() {
        "N/A".to_string()
    } else {
        capitalize_first(&product.category)
    };
    let availability = product
        .availability_status
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or("In Stock");
    let stock = match product.stock {
        Some(count) => format!("{} ({} left)", availability, count),
        None => availability.to_string(),
    };
    for (label, value) in [("Brand", brand.to_string()), ("Category", category), ("Stock", stock)] {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<10}", label), meta),
            Span::styled(strip_control_chars(&value).into_owned(), body),
        ]));
    }
    if !product.tags.is_empty() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<10}", "Tags"), meta),
            Span::styled(strip_control_chars(&product.tags.join(", ")).into_owned(), body),
        ]));
    }

    let images: Vec<&String> = product.images.iter().take(MAX_IMAGE_LINKS).collect();
    if !images.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Images", heading)));
        for (i, url) in images.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("  [{}] ", i + 1), meta),
                Span::styled(strip_control_chars(url).into_owned(), app.style("detail_link")),
            ]));
        }
        lines.push(Line::from(Span::styled("  o to open the first image", meta)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Reviews ({})", product.reviews.len()),
        heading,
    )));
    if product.reviews.is_empty() {
        lines.push(Line::from(Span::styled("  No reviews yet", meta)));
    }
    for review in &product.reviews {
        lines.extend(review_lines(app, review, now));
    }

    lines
}

fn review_lines(app: &App, review: &Review, now: DateTime<Utc>) -> Vec<Line<'static>> {
    let when = format_relative(review.date, now);
    let mut header = vec![
        Span::styled(format!("  {} ", stars(review.rating)), app.style("product_rating")),
        Span::styled(
            strip_control_chars(&review.reviewer_name).into_owned(),
            app.style("detail_review_author"),
        ),
    ];
    if !when.is_empty() {
        header.push(Span::styled(format!(" · {}", when), app.style("detail_metadata")));
    }

    vec![
        Line::from(header),
        Line::from(Span::styled(
            format!("    {}", strip_control_chars(&review.comment)),
            app.style("detail_body"),
        )),
    ]
}
