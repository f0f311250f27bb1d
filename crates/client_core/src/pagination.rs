//! Page arithmetic for the data grid. Pages are 1-indexed; store ranges are
//! zero-based and inclusive.

use storage::RowRange;

/// Rows shown per page.
pub const PAGE_SIZE: u64 = 10;

/// Page links shown on each side of the current page.
const WINDOW_RADIUS: u32 = 2;

pub fn total_pages(total_records: u64, page_size: u64) -> u32 {
    if page_size == 0 {
        return 0;
    }
    u32::try_from(total_records.div_ceil(page_size)).unwrap_or(u32::MAX)
}

pub fn page_range(page: u32, page_size: u64) -> RowRange {
    let start = u64::from(page.saturating_sub(1)) * page_size;
    RowRange::new(start, start + page_size.saturating_sub(1))
}

/// Serial number continuous across pages.
pub fn serial_number(current_page: u32, page_size: u64, index_within_page: usize) -> u64 {
    u64::from(current_page.saturating_sub(1)) * page_size + index_within_page as u64 + 1
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub number: u32,
    pub active: bool,
}

/// Previous/Next control. `target` is `None` when the control is disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepLink {
    pub target: Option<u32>,
}

impl StepLink {
    pub fn is_disabled(&self) -> bool {
        self.target.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationControls {
    pub previous: StepLink,
    pub pages: Vec<PageLink>,
    pub next: StepLink,
}

/// Compact window of at most five page links centred on `current_page`.
/// Returns `None` when there is at most one page.
pub fn pagination_controls(current_page: u32, total_pages: u32) -> Option<PaginationControls> {
    if total_pages <= 1 {
        return None;
    }

    let start = current_page.saturating_sub(WINDOW_RADIUS).max(1);
    let end = current_page.saturating_add(WINDOW_RADIUS).min(total_pages);
    let pages = (start..=end)
        .map(|number| PageLink {
            number,
            active: number == current_page,
        })
        .collect();

    Some(PaginationControls {
        previous: StepLink {
            target: previous_page(current_page, total_pages),
        },
        pages,
        next: StepLink {
            target: next_page(current_page, total_pages),
        },
    })
}

pub fn previous_page(current_page: u32, total_pages: u32) -> Option<u32> {
    (current_page > 1).then(|| (current_page - 1).min(total_pages.max(1)))
}

pub fn next_page(current_page: u32, total_pages: u32) -> Option<u32> {
    (current_page < total_pages).then(|| current_page + 1)
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
