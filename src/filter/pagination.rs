/// Products requested per page.
pub const ITEMS_PER_PAGE: u32 = 12;

/// Most page-number buttons shown at once.
pub const MAX_PAGE_BUTTONS: u32 = 5;

/// Number of pages for a server-reported total: `ceil(total / 12)`.
pub fn total_pages(total: u64) -> u32 {
    let pages = total.div_ceil(u64::from(ITEMS_PER_PAGE));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Whether a page change to `page` should be accepted.
pub fn is_valid_page(page: u32, total_pages: u32) -> bool {
    page >= 1 && page <= total_pages
}

/// Page numbers for the button row.
///
/// A window of up to five consecutive pages, centered on `current` where
/// possible and shifted near either end so the row always holds
/// `min(5, total_pages)` buttons inside `1..=total_pages`. An out-of-range
/// `current` is clamped first.
pub fn page_buttons(current: u32, total_pages: u32) -> Vec<u32> {
    if total_pages == 0 {
        return Vec::new();
    }
    if total_pages <= MAX_PAGE_BUTTONS {
        return (1..=total_pages).collect();
    }

    let half = MAX_PAGE_BUTTONS / 2;
    let current = current.clamp(1, total_pages);
    let start = if current <= half + 1 {
        1
    } else if current >= total_pages - half {
        total_pages - MAX_PAGE_BUTTONS + 1
    } else {
        current - half
    };

    (start..start + MAX_PAGE_BUTTONS).collect()
}
